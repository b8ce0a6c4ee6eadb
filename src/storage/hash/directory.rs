use std::collections::HashSet;

use crate::common::record::Key;

/// Largest useful global depth: distinct keys always differ within their
/// 32 bits, so splitting never needs to look further.
pub const MAX_GLOBAL_DEPTH: u32 = Key::BITS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BucketId(pub usize);

/// `2^global_depth` slots, slot `i` serving keys whose low `global_depth`
/// bits equal `i`.
#[derive(Debug, Clone)]
pub struct Directory {
    global_depth: u32,
    slots: Vec<BucketId>,
}

impl Directory {
    pub fn new(global_depth: u32, slots: Vec<BucketId>) -> Self {
        debug_assert_eq!(slots.len(), 1 << global_depth);
        Self {
            global_depth,
            slots,
        }
    }

    pub fn global_depth(&self) -> u32 {
        self.global_depth
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Low `global_depth` bits of the key.
    pub fn slot_of(&self, key: Key) -> usize {
        let mask = (1u64 << self.global_depth) - 1;
        ((key as u32 as u64) & mask) as usize
    }

    pub fn bucket_for(&self, key: Key) -> BucketId {
        self.slots[self.slot_of(key)]
    }

    pub fn slots(&self) -> &[BucketId] {
        &self.slots
    }

    /// Adds one bit to the global depth. Slot `i + old_len` becomes a twin
    /// of slot `i`, since both share the old low bits.
    pub fn double(&mut self) {
        self.slots.extend_from_within(..);
        self.global_depth += 1;
    }

    /// After `old` split on `bit`, slots with that bit set move to `upper`.
    /// The others keep pointing at `old`, which now holds the lower half.
    pub fn redirect(&mut self, old: BucketId, upper: BucketId, bit: u32) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if *slot == old && (i >> bit) & 1 == 1 {
                *slot = upper;
            }
        }
    }

    pub fn distinct_buckets(&self) -> usize {
        self.slots.iter().collect::<HashSet<_>>().len()
    }
}
