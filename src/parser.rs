//! Single-pass in-place scanner for the flat scalar dialect.
//!
//! The scanner walks a private mutable copy of the input exactly once, with
//! one byte of lookahead and no backtracking. Token boundaries are fixed in
//! place: the `:` closing a label and the newline (or closing quote) ending a
//! value are overwritten with a terminator byte, so every token becomes an
//! independently addressable region of the buffer. The scanner itself emits
//! byte spans and classifications ([`RawRecord`]); materializing records is
//! the document layer's job.
//!
//! The grammar is one flat level of `label: value` lines, which keeps the
//! scan a single finite-state loop with no recursion or mode stack.

use crate::error::ScanError;

/// In-place terminator byte. Written over structural bytes as tokens close.
const TERM: u8 = 0;

/// Bare values matching one of these exact byte strings become `true`.
const TRUE_LITERALS: [&[u8]; 4] = [b"true", b"yes", b"TRUE", b"True"];

/// Bare values matching one of these exact byte strings become `false`.
const FALSE_LITERALS: [&[u8]; 4] = [b"false", b"no", b"FALSE", b"False"];

/// Byte range in the scanner's buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[inline]
    pub(crate) fn slice<'b>(&self, buf: &'b [u8]) -> &'b [u8] {
        &buf[self.start..self.end]
    }
}

/// A scanned value, classified but not yet stored.
///
/// Numbers are converted eagerly (the span is fully known once the line end
/// is found); string payloads stay as spans until the document copies them
/// into its arena.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum RawValue {
    Number(f64),
    Str(Span),
    Bool(bool),
}

/// One scanned `label: value` line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RawRecord {
    pub label: Span,
    pub value: RawValue,
}

// Character classes are fixed by the dialect, not configurable.

#[inline]
fn is_symbol(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$' || b == b'-'
}

#[inline]
fn is_digit_or_dot(b: u8) -> bool {
    b.is_ascii_digit() || b == b'.'
}

#[inline]
fn is_blank(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

#[inline]
fn is_newline(b: u8) -> bool {
    b == b'\n' || b == b'\r'
}

#[inline]
fn is_quote(b: u8) -> bool {
    b == b'\'' || b == b'"'
}

/// Reclassify a bare value as a boolean if it matches a literal exactly.
/// Quoted strings never reach this check.
fn bool_override(bytes: &[u8]) -> Option<bool> {
    if TRUE_LITERALS.contains(&bytes) {
        return Some(true);
    }
    if FALSE_LITERALS.contains(&bytes) {
        return Some(false);
    }
    None
}

/// Convert a numeric span to f64 after the line end is found.
///
/// No separate numeric grammar is applied during the scan; conversion uses
/// atof semantics: the longest leading prefix that parses as a float wins
/// (`1.2.3` reads as 1.2, `42.5abc` as 42.5), and a span with no numeric
/// prefix reads as 0.0.
fn parse_number(bytes: &[u8]) -> f64 {
    for end in (1..=bytes.len()).rev() {
        if let Ok(s) = core::str::from_utf8(&bytes[..end]) {
            if let Ok(n) = s.trim().parse() {
                return n;
            }
        }
    }
    0.0
}

/// Scanner state over the document's private buffer.
pub(crate) struct Scanner<'a> {
    buf: &'a mut [u8],
    pos: usize,
    line: usize,
}

impl<'a> Scanner<'a> {
    /// Wrap a buffer for scanning.
    ///
    /// The final byte of the buffer is overwritten with the terminator, so
    /// the input's last raw byte is never visible to the scan. Input that
    /// ends with a newline loses only that newline; input that does not
    /// loses its last content byte.
    pub(crate) fn new(buf: &'a mut [u8]) -> Self {
        if let Some(last) = buf.last_mut() {
            *last = TERM;
        }
        Self { buf, pos: 0, line: 1 }
    }

    /// Borrow the bytes of a span produced by this scanner.
    #[inline]
    pub(crate) fn bytes(&self, span: Span) -> &[u8] {
        span.slice(self.buf)
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.buf.get(self.pos).copied()
    }

    #[inline]
    fn advance(&mut self) {
        if self.pos < self.buf.len() {
            if self.buf[self.pos] == b'\n' {
                self.line += 1;
            }
            self.pos += 1;
        }
    }

    fn skip_blanks(&mut self) {
        while let Some(b) = self.peek() {
            if is_blank(b) {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn skip_newlines(&mut self) {
        while let Some(b) = self.peek() {
            if is_newline(b) {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Consume up to the next newline or terminator and return the end of
    /// the consumed span, then step past the line break.
    fn read_to_line_end(&mut self) -> usize {
        while let Some(b) = self.peek() {
            if b == TERM || is_newline(b) {
                break;
            }
            self.advance();
        }
        let end = self.pos;
        self.consume_line_break();
        end
    }

    /// Terminate the value span in place and advance past the line break:
    /// by 2 for `\r` (assumed to be followed by `\n`), by 1 for `\n`.
    fn consume_line_break(&mut self) {
        match self.peek() {
            Some(b'\r') => {
                self.buf[self.pos] = TERM;
                self.pos += 2;
                self.line += 1;
            }
            Some(b'\n') => {
                self.buf[self.pos] = TERM;
                self.pos += 1;
                self.line += 1;
            }
            // Terminator or end of buffer: stay put so the caller sees it
            _ => {}
        }
    }

    /// Scan the next `label: value` line.
    ///
    /// Returns `Ok(None)` at the terminator. Any error stops the scan for
    /// good; the scanner must not be pumped again after an error.
    pub(crate) fn next_record(&mut self) -> Result<Option<RawRecord>, ScanError> {
        loop {
            let b = match self.peek() {
                Some(b) => b,
                None => return Ok(None),
            };

            if b == TERM {
                return Ok(None);
            }
            if is_blank(b) {
                self.skip_blanks();
            } else if is_newline(b) {
                self.skip_newlines();
            } else if is_symbol(b) {
                return self.scan_line().map(Some);
            } else {
                return Err(ScanError::InvalidLabelStart {
                    offset: self.pos,
                    line: self.line,
                    found: b as char,
                });
            }
        }
    }

    /// Scan one line, starting at a symbol byte.
    fn scan_line(&mut self) -> Result<RawRecord, ScanError> {
        let label_start = self.pos;

        // Blanks and digits are legal inside a label token; trailing blanks
        // before ':' are not trimmed.
        while let Some(b) = self.peek() {
            if is_symbol(b) || is_blank(b) || is_digit_or_dot(b) {
                self.advance();
            } else {
                break;
            }
        }

        if self.peek() != Some(b':') {
            return Err(ScanError::MissingColon {
                offset: self.pos,
                line: self.line,
            });
        }
        let label = Span {
            start: label_start,
            end: self.pos,
        };
        self.buf[self.pos] = TERM;
        self.advance();

        // Exactly one blank is mandatory after ':'; further blanks are
        // skipped along with it.
        match self.peek() {
            Some(b) if is_blank(b) => self.skip_blanks(),
            _ => {
                return Err(ScanError::NoSpaceAfterColon {
                    offset: self.pos,
                    line: self.line,
                });
            }
        }

        let value = match self.peek() {
            Some(q) if is_quote(q) => self.scan_quoted(q)?,
            first => {
                let start = self.pos;
                let numeric = matches!(first, Some(b) if is_digit_or_dot(b));
                let end = self.read_to_line_end();
                let span = Span { start, end };
                if numeric {
                    RawValue::Number(parse_number(span.slice(self.buf)))
                } else if let Some(flag) = bool_override(span.slice(self.buf)) {
                    RawValue::Bool(flag)
                } else {
                    RawValue::Str(span)
                }
            }
        };

        Ok(RawRecord { label, value })
    }

    /// Scan a quoted string value. The closing quote must match the opening
    /// kind; trailing bytes before the newline are consumed and discarded.
    fn scan_quoted(&mut self, quote: u8) -> Result<RawValue, ScanError> {
        let start_offset = self.pos;
        let line = self.line;
        self.advance();
        let start = self.pos;

        loop {
            match self.peek() {
                None | Some(TERM) => {
                    return Err(ScanError::NonMatchingQuote {
                        start_offset,
                        line,
                        quote: quote as char,
                    });
                }
                Some(b) if is_quote(b) => break,
                _ => self.advance(),
            }
        }

        // Stopped at a quote of either kind; only the opening kind closes.
        if self.peek() != Some(quote) {
            return Err(ScanError::NonMatchingQuote {
                start_offset,
                line,
                quote: quote as char,
            });
        }

        let span = Span {
            start,
            end: self.pos,
        };
        self.buf[self.pos] = TERM;
        self.advance();
        self.read_to_line_end();

        Ok(RawValue::Str(span))
    }
}
