//! Fixed-capacity arena with first-fit slot reuse.
//!
//! The arena owns one byte block of fixed capacity, never resized after
//! creation, and hands out allocations as stable integer handles ([`SlotId`])
//! rather than raw addresses. A slot table ordered by ascending block offset
//! records each allocation's start, size, and freed flag.
//!
//! Allocation is first-fit: the lowest-offset freed slot whose recorded size
//! covers the request is reused without splitting, so reusing an oversized
//! slot permanently wastes the remainder. Release only marks a slot freed;
//! the used-byte counter never decreases and neighbors are never merged.
//! Fragmentation is permanent for the arena's lifetime, which is acceptable
//! because an arena lives exactly as long as one document and is dropped in
//! bulk.

#[cfg(not(test))]
use alloc::vec::Vec;

use crate::error::ArenaError;

/// Stable handle to an arena slot.
///
/// Handles are only produced by [`Arena::allocate`] and remain valid until
/// the arena is dropped. A released slot's handle must not be used again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(u32);

/// One entry in the slot table.
#[derive(Debug, Clone, Copy)]
struct Slot {
    /// Offset of the slot's first byte in the block
    start: usize,
    /// Size of the most recent request served by this slot
    size: usize,
    /// Freed slots are eligible for first-fit reuse
    freed: bool,
}

/// Fixed-capacity byte arena with first-fit reuse.
#[derive(Debug)]
pub struct Arena {
    block: Vec<u8>,
    capacity: usize,
    /// Total bytes ever committed to fresh slots; never decremented
    used: usize,
    /// Ordered by ascending `start`
    slots: Vec<Slot>,
    allocations: u64,
    releases: u64,
}

impl Arena {
    /// Create an arena backed by a block of exactly `capacity` bytes.
    ///
    /// Fails with [`ArenaError::OutOfMemory`] if the backing block cannot
    /// be obtained.
    pub fn with_capacity(capacity: usize) -> Result<Self, ArenaError> {
        let mut block = Vec::new();
        block
            .try_reserve_exact(capacity)
            .map_err(|_| ArenaError::OutOfMemory {
                requested: capacity,
                remaining: 0,
            })?;
        block.resize(capacity, 0);

        Ok(Self {
            block,
            capacity,
            used: 0,
            slots: Vec::new(),
            allocations: 0,
            releases: 0,
        })
    }

    /// Allocate `size` bytes, reusing the first adequate freed slot.
    ///
    /// On reuse, the slot's recorded size shrinks to the new request; the
    /// remainder of an oversized slot is wasted, not split off. A failed
    /// request leaves the slot table exactly as it was, so later smaller
    /// requests may still succeed.
    pub fn allocate(&mut self, size: usize) -> Result<SlotId, ArenaError> {
        if size > 0 {
            for (idx, slot) in self.slots.iter_mut().enumerate() {
                if slot.freed && slot.size >= size {
                    slot.freed = false;
                    slot.size = size;
                    self.allocations += 1;
                    return Ok(SlotId(idx as u32));
                }
            }
        }

        // Fresh slot immediately after the last one. The capacity check
        // happens before any bookkeeping is touched.
        let start = self.slots.last().map_or(0, |s| s.start + s.size);
        let total = self.used.checked_add(size);
        if total.map_or(true, |total| total > self.capacity) {
            return Err(ArenaError::OutOfMemory {
                requested: size,
                remaining: self.capacity - self.used,
            });
        }

        self.slots.push(Slot {
            start,
            size,
            freed: false,
        });
        self.used += size;
        self.allocations += 1;
        Ok(SlotId(self.slots.len() as u32 - 1))
    }

    /// Copy `bytes` into a newly allocated slot.
    pub fn store(&mut self, bytes: &[u8]) -> Result<SlotId, ArenaError> {
        let id = self.allocate(bytes.len())?;
        self.get_mut(id).copy_from_slice(bytes);
        Ok(id)
    }

    /// Mark a slot freed, making it eligible for reuse.
    ///
    /// Does not decrement the used-byte counter and does not merge with
    /// neighboring slots.
    pub fn release(&mut self, id: SlotId) {
        self.slots[id.0 as usize].freed = true;
        self.releases += 1;
    }

    /// Borrow a slot's bytes.
    #[inline]
    pub fn get(&self, id: SlotId) -> &[u8] {
        let slot = self.slots[id.0 as usize];
        debug_assert!(!slot.freed, "read from a freed slot");
        &self.block[slot.start..slot.start + slot.size]
    }

    /// Borrow a slot's bytes mutably.
    #[inline]
    pub fn get_mut(&mut self, id: SlotId) -> &mut [u8] {
        let slot = self.slots[id.0 as usize];
        debug_assert!(!slot.freed, "write to a freed slot");
        &mut self.block[slot.start..slot.start + slot.size]
    }

    /// Offset of a slot's first byte in the block.
    #[inline]
    pub fn slot_offset(&self, id: SlotId) -> usize {
        self.slots[id.0 as usize].start
    }

    /// Total capacity of the backing block in bytes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes committed to fresh slots so far. Never decreases; reuse of a
    /// freed slot does not grow it.
    #[inline]
    pub fn used_bytes(&self) -> usize {
        self.used
    }

    /// Number of successful `allocate` calls over the arena's lifetime.
    #[inline]
    pub fn allocations(&self) -> u64 {
        self.allocations
    }

    /// Number of `release` calls over the arena's lifetime.
    #[inline]
    pub fn releases(&self) -> u64 {
        self.releases
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn allocate_write_read() {
        let mut arena = Arena::with_capacity(64).unwrap();
        let id = arena.store(b"hello").unwrap();
        assert_eq!(arena.get(id), b"hello");
        assert_eq!(arena.used_bytes(), 5);
        assert_eq!(arena.allocations(), 1);
    }

    #[test]
    fn fresh_slots_are_adjacent_and_disjoint() {
        let mut arena = Arena::with_capacity(64).unwrap();
        let a = arena.allocate(8).unwrap();
        let b = arena.allocate(8).unwrap();
        let c = arena.allocate(4).unwrap();
        assert_eq!(arena.slot_offset(a), 0);
        assert_eq!(arena.slot_offset(b), 8);
        assert_eq!(arena.slot_offset(c), 16);
        assert_eq!(arena.used_bytes(), 20);
    }

    #[test]
    fn release_then_smaller_request_reuses_same_offset() {
        let mut arena = Arena::with_capacity(64).unwrap();
        let a = arena.allocate(16).unwrap();
        let _b = arena.allocate(8).unwrap();
        let offset = arena.slot_offset(a);
        let used_before = arena.used_bytes();

        arena.release(a);
        let c = arena.allocate(10).unwrap();
        assert_eq!(arena.slot_offset(c), offset);
        // Reuse does not grow the used counter
        assert_eq!(arena.used_bytes(), used_before);
    }

    #[test]
    fn first_fit_picks_lowest_offset_freed_slot() {
        let mut arena = Arena::with_capacity(64).unwrap();
        let a = arena.allocate(8).unwrap();
        let b = arena.allocate(8).unwrap();
        let c = arena.allocate(8).unwrap();
        arena.release(a);
        arena.release(c);

        let d = arena.allocate(4).unwrap();
        assert_eq!(arena.slot_offset(d), arena.slot_offset(a));
        let _keep = b;
    }

    #[test]
    fn oversized_reuse_wastes_the_remainder() {
        let mut arena = Arena::with_capacity(64).unwrap();
        let a = arena.allocate(16).unwrap();
        arena.release(a);

        // The 16-byte slot now serves a 4-byte request; its recorded size
        // shrinks, so a later 16-byte request no longer fits in it.
        let b = arena.allocate(4).unwrap();
        assert_eq!(arena.get(b).len(), 4);

        arena.release(b);
        let c = arena.allocate(16).unwrap();
        assert_ne!(arena.slot_offset(c), arena.slot_offset(b));
    }

    #[test]
    fn exhaustion_leaves_arena_usable() {
        let mut arena = Arena::with_capacity(16).unwrap();
        let _a = arena.allocate(12).unwrap();

        let err = arena.allocate(8).unwrap_err();
        assert_eq!(
            err,
            ArenaError::OutOfMemory {
                requested: 8,
                remaining: 4
            }
        );

        // A smaller request still succeeds after the failure
        let b = arena.allocate(4).unwrap();
        assert_eq!(arena.slot_offset(b), 12);
        assert_eq!(arena.used_bytes(), 16);
    }

    #[test]
    fn huge_request_fails_cleanly() {
        let mut arena = Arena::with_capacity(16).unwrap();
        let _a = arena.allocate(1).unwrap();

        // used + usize::MAX must not wrap around into an accepted request
        let err = arena.allocate(usize::MAX).unwrap_err();
        assert_eq!(
            err,
            ArenaError::OutOfMemory {
                requested: usize::MAX,
                remaining: 15
            }
        );

        let b = arena.allocate(4).unwrap();
        assert_eq!(arena.slot_offset(b), 1);
    }

    #[test]
    fn zero_capacity_arena_rejects_everything() {
        let mut arena = Arena::with_capacity(0).unwrap();
        assert!(arena.allocate(1).is_err());
    }

    #[test]
    fn counters_track_calls() {
        let mut arena = Arena::with_capacity(32).unwrap();
        let a = arena.allocate(4).unwrap();
        let b = arena.allocate(4).unwrap();
        arena.release(a);
        arena.release(b);
        let _c = arena.allocate(2).unwrap();
        assert_eq!(arena.allocations(), 3);
        assert_eq!(arena.releases(), 2);
    }

    #[test]
    fn empty_slot_is_allowed() {
        let mut arena = Arena::with_capacity(8).unwrap();
        let id = arena.store(b"").unwrap();
        assert_eq!(arena.get(id), b"");
        assert_eq!(arena.used_bytes(), 0);
    }

    proptest! {
        /// For any allocate/release sequence within capacity, live slots'
        /// byte ranges stay pairwise disjoint and the table stays usable.
        #[test]
        fn live_ranges_stay_disjoint(
            ops in proptest::collection::vec((any::<bool>(), 1usize..48), 1..64)
        ) {
            let mut arena = Arena::with_capacity(2048).unwrap();
            let mut live: Vec<SlotId> = Vec::new();

            for (is_alloc, size) in ops {
                if is_alloc {
                    if let Ok(id) = arena.allocate(size) {
                        arena.get_mut(id).fill(0xAB);
                        live.push(id);
                    }
                } else if let Some(id) = live.pop() {
                    arena.release(id);
                }

                for i in 0..live.len() {
                    for j in i + 1..live.len() {
                        let (a, b) = (live[i], live[j]);
                        let (sa, ea) = (arena.slot_offset(a), arena.slot_offset(a) + arena.get(a).len());
                        let (sb, eb) = (arena.slot_offset(b), arena.slot_offset(b) + arena.get(b).len());
                        prop_assert!(ea <= sb || eb <= sa, "live ranges overlap");
                    }
                }
            }

            prop_assert!(arena.used_bytes() <= arena.capacity());
        }
    }
}
