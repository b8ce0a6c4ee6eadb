use crate::common::record::{Key, Record};

pub enum InsertOutcome {
    Inserted,
    Duplicate,
    /// No room; the record is handed back so the caller can retry after a split.
    Full(Record),
}

/// Fixed-capacity, unordered store of `(key, record)` pairs. All keys share
/// their low `local_depth` bits.
#[derive(Debug, Clone)]
pub struct Bucket {
    local_depth: u32,
    capacity: usize,
    entries: Vec<(Key, Record)>,
}

impl Bucket {
    pub fn new(local_depth: u32, capacity: usize) -> Self {
        Self {
            local_depth,
            capacity,
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn local_depth(&self) -> u32 {
        self.local_depth
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    pub fn keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    pub fn insert(&mut self, key: Key, record: Record) -> InsertOutcome {
        if self.search(key).is_some() {
            return InsertOutcome::Duplicate;
        }
        if self.is_full() {
            return InsertOutcome::Full(record);
        }

        self.entries.push((key, record));
        InsertOutcome::Inserted
    }

    pub fn search(&self, key: Key) -> Option<&Record> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, r)| r)
    }

    pub fn delete(&mut self, key: Key) -> Option<Record> {
        let pos = self.entries.iter().position(|(k, _)| *k == key)?;
        Some(self.entries.remove(pos).1)
    }

    /// Splits on bit `local_depth` of the key: clear goes to the first
    /// bucket, set to the second. Both come back one level deeper.
    pub fn split(self) -> (Bucket, Bucket) {
        let depth = self.local_depth + 1;
        let mut lower = Bucket::new(depth, self.capacity);
        let mut upper = Bucket::new(depth, self.capacity);

        for (key, record) in self.entries {
            if key_bit(key, self.local_depth) {
                upper.entries.push((key, record));
            } else {
                lower.entries.push((key, record));
            }
        }

        (lower, upper)
    }
}

/// Bit `bit` of the key's two's-complement representation.
pub fn key_bit(key: Key, bit: u32) -> bool {
    ((key as u32) >> bit) & 1 == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(k: Key) -> Record {
        Record::new(vec![k, 0])
    }

    #[test]
    fn rejects_duplicates_before_capacity() {
        let mut b = Bucket::new(1, 2);
        assert!(matches!(b.insert(2, rec(2)), InsertOutcome::Inserted));
        assert!(matches!(b.insert(4, rec(4)), InsertOutcome::Inserted));

        assert!(matches!(b.insert(2, rec(2)), InsertOutcome::Duplicate));
        match b.insert(6, rec(6)) {
            InsertOutcome::Full(r) => assert_eq!(r, rec(6)),
            _ => panic!("expected a full bucket"),
        }
    }

    #[test]
    fn split_uses_next_bit() {
        let mut b = Bucket::new(1, 4);
        for k in [0, 2, 4, 6] {
            b.insert(k, rec(k));
        }

        let (lower, upper) = b.split();

        assert_eq!(lower.local_depth(), 2);
        assert_eq!(lower.keys().collect::<Vec<_>>(), vec![0, 4]);
        assert_eq!(upper.keys().collect::<Vec<_>>(), vec![2, 6]);
    }

    #[test]
    fn negative_keys_use_twos_complement_bits() {
        assert!(key_bit(-1, 0));
        assert!(key_bit(-1, 31));
        assert!(!key_bit(-2, 0));
    }
}
