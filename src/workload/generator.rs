use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};

use crate::{
    common::record::{Key, Record},
    db_debug,
    debugger::Component,
    workload::{errors::WorkloadError, op::Operation},
};

pub const DEFAULT_SEED: u64 = 42;

/// Upper bound (inclusive) for random non-key fields.
const FIELD_MAX: i32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorParams {
    pub attributes: usize,
    pub insertions: usize,
    pub deletions: usize,
    pub searches: usize,
    pub seed: u64,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self {
            attributes: 10,
            insertions: 2000,
            deletions: 500,
            searches: 3000,
            seed: DEFAULT_SEED,
        }
    }
}

impl GeneratorParams {
    pub fn validate(&self) -> Result<(), WorkloadError> {
        if self.attributes < 1 {
            return Err(WorkloadError::InvalidParams(
                "number of attributes must be >= 1".into(),
            ));
        }
        if self.deletions > self.insertions {
            return Err(WorkloadError::InvalidParams(
                "number of deletions cannot be greater than insertions".into(),
            ));
        }
        if self.insertions > Key::MAX as usize {
            return Err(WorkloadError::InvalidParams(
                "insertions exceed the key space".into(),
            ));
        }
        Ok(())
    }
}

/// Seeded synthetic workload: rounds of insertions, searches and deletions
/// interleaved until every budget is spent.
///
/// Inserted keys are a shuffled permutation of `0..insertions`. Searches
/// pick keys in `1..=2 * live` so roughly half of them miss. Deletions only
/// target live keys.
pub struct Generator {
    params: GeneratorParams,
    rng: StdRng,
}

impl Generator {
    pub fn new(params: GeneratorParams) -> Result<Self, WorkloadError> {
        params.validate()?;
        Ok(Self {
            params,
            rng: StdRng::seed_from_u64(params.seed),
        })
    }

    pub fn generate(mut self) -> Vec<Operation> {
        let mut pending: Vec<Key> = (0..self.params.insertions as Key).collect();
        pending.shuffle(&mut self.rng);

        let mut live: Vec<Key> = Vec::new();
        let mut ops = Vec::new();

        let mut searches = self.params.searches;
        let mut deletions = self.params.deletions;

        while !pending.is_empty() || searches > 0 || deletions > 0 {
            self.insertions(&mut pending, &mut live, &mut ops);
            self.searches(&mut searches, &live, &mut ops);
            self.deletions(&mut deletions, &mut live, &mut ops);
        }

        db_debug!(
            Component::WORKLOAD,
            "generated {} operations ({} keys live at end)",
            ops.len(),
            live.len()
        );
        ops
    }

    fn insertions(&mut self, pending: &mut Vec<Key>, live: &mut Vec<Key>, ops: &mut Vec<Operation>) {
        if pending.is_empty() {
            return;
        }

        let n = self.rng.random_range(1..=pending.len());
        for key in pending.drain(..n) {
            let mut fields: Vec<i32> = (0..self.params.attributes)
                .map(|_| self.rng.random_range(0..=FIELD_MAX))
                .collect();
            fields[0] = key;

            ops.push(Operation::Insert(Record::new(fields)));
            live.push(key);
        }
    }

    fn searches(&mut self, budget: &mut usize, live: &[Key], ops: &mut Vec<Operation>) {
        if *budget == 0 {
            return;
        }

        let n = self.rng.random_range(1..=*budget);
        *budget -= n;

        for _ in 0..n {
            let key = if live.is_empty() {
                self.rng.random_range(1..=100)
            } else {
                let upper = (2 * live.len()).min(Key::MAX as usize) as Key;
                self.rng.random_range(1..=upper)
            };
            ops.push(Operation::Search(key));
        }
    }

    fn deletions(&mut self, budget: &mut usize, live: &mut Vec<Key>, ops: &mut Vec<Operation>) {
        if *budget == 0 {
            return;
        }

        let n = self.rng.random_range(1..=*budget);
        if n > live.len() {
            return;
        }

        live.shuffle(&mut self.rng);
        *budget -= n;

        for key in live.drain(..n) {
            ops.push(Operation::Delete(key));
        }
    }
}

/// Convenience wrapper around [`Generator`].
pub fn generate(params: GeneratorParams) -> Result<Vec<Operation>, WorkloadError> {
    Ok(Generator::new(params)?.generate())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn params() -> GeneratorParams {
        GeneratorParams {
            attributes: 4,
            insertions: 300,
            deletions: 80,
            searches: 200,
            seed: 7,
        }
    }

    #[test]
    fn budgets_are_spent_exactly() {
        let ops = generate(params()).unwrap();

        let count = |tag: &str| ops.iter().filter(|o| o.tag() == tag).count();
        assert_eq!(count("+"), 300);
        assert_eq!(count("?"), 200);
        assert_eq!(count("-"), 80);
    }

    #[test]
    fn deletes_only_touch_live_keys() {
        let ops = generate(params()).unwrap();
        let mut live = HashSet::new();

        for op in &ops {
            match op {
                Operation::Insert(r) => {
                    assert_eq!(r.num_fields(), 4);
                    assert!(live.insert(r.key()), "key {} inserted twice", r.key());
                }
                Operation::Delete(k) => assert!(live.remove(k), "key {} not live", k),
                Operation::Search(_) => {}
            }
        }
    }

    #[test]
    fn same_seed_same_workload() {
        assert_eq!(generate(params()).unwrap(), generate(params()).unwrap());

        let other = GeneratorParams { seed: 8, ..params() };
        assert_ne!(generate(params()).unwrap(), generate(other).unwrap());
    }

    #[test]
    fn rejects_more_deletions_than_insertions() {
        let bad = GeneratorParams {
            deletions: 500,
            ..params()
        };
        assert!(matches!(
            Generator::new(bad),
            Err(WorkloadError::InvalidParams(_))
        ));
    }
}
