use std::collections::HashMap;
use std::fmt;

use crate::{
    common::{
        config::{IndexConfig, MIN_BUCKET_CAPACITY},
        record::{Key, Record},
    },
    db_debug, db_trace,
    debugger::Component,
    storage::{
        errors::{IndexError, IndexResult},
        hash::{
            bucket::{Bucket, InsertOutcome, key_bit},
            directory::{BucketId, Directory, MAX_GLOBAL_DEPTH},
        },
        index::Index,
        stats::{Counter, HashStats, StatsMap},
    },
};

const NAME: &str = "hash";

#[derive(Debug, Default)]
struct HashCounters {
    bucket_reads: Counter,
    bucket_writes: Counter,
    splits: Counter,
    directory_doublings: Counter,
}

/// Extendible hash table keyed on the low-order bits of the key itself.
///
/// Buckets live in an arena and directory slots hold arena ids. A split
/// keeps the lower half in the old id and appends the upper half, so every
/// arena bucket is reachable. Deletes never merge buckets or shrink the
/// directory.
pub struct ExtendibleHash {
    directory: Directory,
    buckets: Vec<Bucket>,
    bucket_capacity: usize,
    config: Option<IndexConfig>,
    len: usize,
    counters: HashCounters,
}

impl ExtendibleHash {
    pub fn new(config: IndexConfig) -> Self {
        let mut hash = Self::with_capacity(config.bucket_capacity());
        hash.config = Some(config);
        hash
    }

    /// Validates the geometry first; a bad page size or field count comes
    /// back as `IndexError::Config`.
    pub fn open(page_size: usize, num_fields: usize) -> IndexResult<Self> {
        Ok(Self::new(IndexConfig::new(page_size, num_fields)?))
    }

    /// Starts at global depth 1 with two empty buckets. Capacity is floored
    /// to 2.
    pub fn with_capacity(bucket_capacity: usize) -> Self {
        let bucket_capacity = bucket_capacity.max(MIN_BUCKET_CAPACITY);

        Self {
            directory: Directory::new(1, vec![BucketId(0), BucketId(1)]),
            buckets: vec![
                Bucket::new(1, bucket_capacity),
                Bucket::new(1, bucket_capacity),
            ],
            bucket_capacity,
            config: None,
            len: 0,
            counters: HashCounters::default(),
        }
    }

    pub fn bucket_capacity(&self) -> usize {
        self.bucket_capacity
    }

    pub fn global_depth(&self) -> u32 {
        self.directory.global_depth()
    }

    pub fn directory_size(&self) -> usize {
        self.directory.len()
    }

    pub fn num_buckets(&self) -> usize {
        self.buckets.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn config(&self) -> Option<&IndexConfig> {
        self.config.as_ref()
    }

    /// Directory slot for `key`, always in `[0, 2^global_depth)`.
    pub fn slot_of(&self, key: Key) -> usize {
        self.directory.slot_of(key)
    }

    /// Share of bucket slots in use across all buckets.
    pub fn load_factor(&self) -> f64 {
        let slots = self.buckets.len() * self.bucket_capacity;
        if slots == 0 {
            return 0.0;
        }
        self.len as f64 / slots as f64
    }

    fn locate(&self, key: Key) -> BucketId {
        self.counters.bucket_reads.incr();
        let id = self.directory.bucket_for(key);
        db_trace!(
            Component::HASH,
            "key {} -> slot {} -> bucket {}",
            key,
            self.directory.slot_of(key),
            id.0
        );
        id
    }

    pub fn insert(&mut self, key: Key, record: Record) -> bool {
        let mut record = record;

        loop {
            let id = self.locate(key);

            match self.buckets[id.0].insert(key, record) {
                InsertOutcome::Inserted => {
                    self.counters.bucket_writes.incr();
                    self.len += 1;
                    return true;
                }
                InsertOutcome::Duplicate => return false,
                InsertOutcome::Full(back) => {
                    record = back;
                    self.handle_overflow(id);
                }
            }
        }
    }

    /// Makes room in a full bucket, doubling the directory first when the
    /// bucket already uses every directory bit.
    fn handle_overflow(&mut self, id: BucketId) {
        let local_depth = self.buckets[id.0].local_depth();

        if local_depth == self.directory.global_depth() {
            // Keys sharing their low k bits force the directory to 2^(k+1)
            // slots before they separate. Near the key width that exhausts
            // memory long before this guard is reached.
            assert!(
                local_depth < MAX_GLOBAL_DEPTH,
                "bucket {} overflowed at maximum depth",
                id.0
            );
            self.double_directory();
        }

        self.split_bucket(id);
    }

    fn double_directory(&mut self) {
        self.directory.double();
        self.counters.directory_doublings.incr();

        db_debug!(
            Component::HASH,
            "directory doubled to {} slots (global depth {})",
            self.directory.len(),
            self.directory.global_depth()
        );
    }

    fn split_bucket(&mut self, id: BucketId) {
        self.counters.splits.incr();

        let placeholder = Bucket::new(0, self.bucket_capacity);
        let old = std::mem::replace(&mut self.buckets[id.0], placeholder);
        let bit = old.local_depth();
        let (lower, upper) = old.split();

        let upper_id = BucketId(self.buckets.len());
        self.buckets[id.0] = lower;
        self.buckets.push(upper);
        self.directory.redirect(id, upper_id, bit);
        self.counters.bucket_writes.add(2);

        db_debug!(
            Component::HASH,
            "split bucket {} on bit {}: {} stay, {} move to bucket {}",
            id.0,
            bit,
            self.buckets[id.0].len(),
            self.buckets[upper_id.0].len(),
            upper_id.0
        );
    }

    pub fn search(&self, key: Key) -> Option<&Record> {
        let id = self.locate(key);
        self.buckets[id.0].search(key)
    }

    pub fn delete(&mut self, key: Key) -> Option<Record> {
        let id = self.locate(key);
        let record = self.buckets[id.0].delete(key)?;

        self.counters.bucket_writes.incr();
        self.len -= 1;
        Some(record)
    }

    pub fn get_stats(&self) -> HashStats {
        HashStats {
            bucket_reads: self.counters.bucket_reads.get(),
            bucket_writes: self.counters.bucket_writes.get(),
            splits: self.counters.splits.get(),
            directory_doublings: self.counters.directory_doublings.get(),
            global_depth: u64::from(self.directory.global_depth()),
            num_buckets: self.directory.distinct_buckets() as u64,
            directory_size: self.directory.len() as u64,
        }
    }

    /// Zeroes access counters. Depth and sizes describe the structure and
    /// are left alone.
    pub fn reset_stats(&mut self) {
        self.counters.bucket_reads.reset();
        self.counters.bucket_writes.reset();
        self.counters.splits.reset();
        self.counters.directory_doublings.reset();
    }

    /// Checks directory fan-in, depth bookkeeping and entry placement.
    pub fn validate(&self) -> IndexResult<()> {
        let global_depth = self.directory.global_depth();

        if self.directory.len() != 1 << global_depth {
            return Err(IndexError::corrupted(
                NAME,
                format!(
                    "directory has {} slots at global depth {}",
                    self.directory.len(),
                    global_depth
                ),
            ));
        }

        let mut referrers: HashMap<BucketId, Vec<usize>> = HashMap::new();
        for (slot, id) in self.directory.slots().iter().enumerate() {
            referrers.entry(*id).or_default().push(slot);
        }

        if referrers.len() != self.buckets.len() {
            return Err(IndexError::corrupted(
                NAME,
                format!(
                    "{} buckets allocated, {} reachable",
                    self.buckets.len(),
                    referrers.len()
                ),
            ));
        }

        let mut total = 0;
        for (id, slots) in &referrers {
            let bucket = self.buckets.get(id.0).ok_or_else(|| {
                IndexError::corrupted(NAME, format!("slot points at missing bucket {}", id.0))
            })?;
            let depth = bucket.local_depth();

            if depth > global_depth {
                return Err(IndexError::corrupted(
                    NAME,
                    format!("bucket {} depth {} > global {}", id.0, depth, global_depth),
                ));
            }

            let expected = 1usize << (global_depth - depth);
            if slots.len() != expected {
                return Err(IndexError::corrupted(
                    NAME,
                    format!(
                        "bucket {} referenced {} times, expected {}",
                        id.0,
                        slots.len(),
                        expected
                    ),
                ));
            }

            let mask = (1usize << depth) - 1;
            let prefix = slots[0] & mask;
            if slots.iter().any(|s| s & mask != prefix) {
                return Err(IndexError::corrupted(
                    NAME,
                    format!("bucket {} slots disagree on low {} bits", id.0, depth),
                ));
            }

            if bucket.len() > bucket.capacity() {
                return Err(IndexError::corrupted(
                    NAME,
                    format!("bucket {} over capacity", id.0),
                ));
            }

            let mut keys: Vec<Key> = bucket.keys().collect();
            if let Some(stray) = keys
                .iter()
                .find(|k| (0..depth).any(|b| key_bit(**k, b) != ((prefix >> b) & 1 == 1)))
            {
                return Err(IndexError::corrupted(
                    NAME,
                    format!("key {} misplaced in bucket {}", stray, id.0),
                ));
            }

            keys.sort_unstable();
            keys.dedup();
            if keys.len() != bucket.len() {
                return Err(IndexError::corrupted(
                    NAME,
                    format!("bucket {} holds duplicate keys", id.0),
                ));
            }

            total += bucket.len();
        }

        if total != self.len {
            return Err(IndexError::corrupted(
                NAME,
                format!("{} records in buckets, {} counted", total, self.len),
            ));
        }

        Ok(())
    }
}

impl fmt::Display for ExtendibleHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ExtendibleHash(global_depth={}, buckets={}, directory_size={}, capacity={}, records={}, load={:.2}",
            self.directory.global_depth(),
            self.buckets.len(),
            self.directory.len(),
            self.bucket_capacity,
            self.len,
            self.load_factor()
        )?;
        if let Some(cfg) = &self.config {
            write!(
                f,
                ", page_size={}, num_fields={}",
                cfg.page_size(),
                cfg.num_fields()
            )?;
        }
        write!(f, ")")
    }
}

impl Index for ExtendibleHash {
    fn name(&self) -> &'static str {
        NAME
    }

    fn insert(&mut self, key: Key, record: Record) -> bool {
        ExtendibleHash::insert(self, key, record)
    }

    fn search(&self, key: Key) -> Option<&Record> {
        ExtendibleHash::search(self, key)
    }

    fn delete(&mut self, key: Key) -> Option<Record> {
        ExtendibleHash::delete(self, key)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn stats(&self) -> StatsMap {
        self.get_stats().to_map()
    }

    fn reset_stats(&mut self) {
        ExtendibleHash::reset_stats(self);
    }
}
