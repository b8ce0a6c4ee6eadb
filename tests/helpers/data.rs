use pagedex::common::{Key, Record};
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

#[allow(dead_code)]
pub fn record(key: Key, num_fields: usize) -> Record {
    let mut fields = vec![key];
    fields.extend((1..num_fields as i32).map(|i| key.wrapping_mul(31).wrapping_add(i)));
    Record::new(fields)
}

#[allow(dead_code)]
pub fn shuffled_keys(range: std::ops::Range<Key>, seed: u64) -> Vec<Key> {
    let mut keys: Vec<Key> = range.collect();
    keys.shuffle(&mut StdRng::seed_from_u64(seed));
    keys
}
