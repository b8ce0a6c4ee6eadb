#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

    use crate::{
        common::{
            config::IndexConfig,
            record::{Key, Record},
        },
        storage::btree::b_plus_tree::BPlusTree,
    };

    fn rec(k: Key) -> Record {
        Record::new(vec![k, k * 2])
    }

    fn keys_of<'a>(it: impl Iterator<Item = &'a Record>) -> Vec<Key> {
        it.map(|r| r.key()).collect()
    }

    #[test]
    fn insert_and_get_single_key() {
        let mut tree = BPlusTree::with_order(4);

        assert!(tree.insert(10, rec(10)));
        assert_eq!(tree.search(10), Some(&rec(10)));
        assert_eq!(tree.search(11), None);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn duplicate_insert_keeps_first_record() {
        let mut tree = BPlusTree::with_order(3);
        for k in 0..10 {
            tree.insert(k, rec(k));
        }

        assert!(!tree.insert(5, Record::new(vec![5, 999])));
        assert_eq!(tree.search(5), Some(&rec(5)));
        assert_eq!(tree.len(), 10);
    }

    #[test]
    fn leaf_split_and_lookup() {
        let mut tree = BPlusTree::with_order(3);

        for i in 0..10 {
            tree.insert(i, rec(i));
        }

        for i in 0..10 {
            assert_eq!(tree.search(i), Some(&rec(i)));
        }
        assert!(tree.height() > 1);
        tree.validate().unwrap();
    }

    #[test]
    fn order_is_floored_at_three() {
        assert_eq!(BPlusTree::with_order(1).order(), 3);
    }

    #[test]
    fn first_split_creates_root() {
        let mut tree = BPlusTree::with_order(3);
        tree.insert(1, rec(1));
        tree.insert(2, rec(2));
        assert_eq!(tree.height(), 1);

        tree.insert(3, rec(3));

        let stats = tree.get_stats();
        assert_eq!(stats.splits, 1);
        assert_eq!(stats.height, 2);
        assert_eq!(tree.leaf_count(), 2);
        tree.validate().unwrap();
    }

    #[test]
    fn cascading_splits_keep_balance() {
        let mut tree = BPlusTree::with_order(3);
        for i in 0..200 {
            tree.insert(i, rec(i));
            tree.validate().unwrap();
        }
        assert!(tree.height() >= 5);
    }

    #[test]
    fn range_query_across_leaves() {
        let mut tree = BPlusTree::with_order(3);

        for i in 0..20 {
            tree.insert(i, rec(i));
        }

        let got = keys_of(tree.range_search(5, 12));
        assert_eq!(got, (5..=12).collect::<Vec<_>>());
    }

    #[test]
    fn range_outside_keys_is_empty() {
        let mut tree = BPlusTree::with_order(4);
        for i in 10..20 {
            tree.insert(i, rec(i));
        }

        assert_eq!(tree.range_search(30, 40).count(), 0);
        assert_eq!(tree.range_search(0, 5).count(), 0);
        assert_eq!(tree.range_search(12, 11).count(), 0);
        assert_eq!(keys_of(tree.range_search(-100, 10)), vec![10]);
    }

    #[test]
    fn range_counts_leaf_reads() {
        let mut tree = BPlusTree::with_order(3);
        for i in 0..30 {
            tree.insert(i, rec(i));
        }
        tree.reset_stats();

        let all = tree.range_search(0, 29).count();
        assert_eq!(all, 30);

        let height = tree.height();
        let leaves = tree.leaf_count() as u64;
        assert_eq!(tree.get_stats().page_reads, (height - 1) + leaves);
    }

    #[test]
    fn delete_then_search() {
        let mut tree = BPlusTree::with_order(3);

        for i in 0..10 {
            tree.insert(i, rec(i));
        }

        for i in 0..10 {
            assert_eq!(tree.delete(i), Some(rec(i)));
        }

        for i in 0..10 {
            assert_eq!(tree.search(i), None);
        }
        assert!(tree.is_empty());
        tree.validate().unwrap();
    }

    #[test]
    fn delete_missing_key_is_noop() {
        let mut tree = BPlusTree::with_order(3);
        for i in 0..5 {
            tree.insert(i, rec(i));
        }
        tree.reset_stats();

        assert_eq!(tree.delete(42), None);
        assert_eq!(tree.get_stats().page_writes, 0);
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn delete_all_and_reinsert() {
        let mut tree = BPlusTree::with_order(3);

        for i in 0..20 {
            tree.insert(i, rec(i));
        }
        let height = tree.height();

        for i in 0..20 {
            tree.delete(i);
        }
        // no merges, the shape stays
        assert_eq!(tree.height(), height);
        assert_eq!(tree.get_stats().merges, 0);

        for i in 0..20 {
            assert!(tree.insert(i, rec(i)));
        }

        for i in 0..20 {
            assert_eq!(tree.search(i), Some(&rec(i)));
        }
        tree.validate().unwrap();
    }

    #[test]
    fn random_insert_delete_stress() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut tree = BPlusTree::with_order(4);

        let mut keys: Vec<Key> = (0..500).collect();
        keys.shuffle(&mut rng);

        for k in &keys {
            assert!(tree.insert(*k, rec(*k)));
        }
        tree.validate().unwrap();

        keys.shuffle(&mut rng);
        let (gone, kept) = keys.split_at(250);

        for k in gone {
            assert_eq!(tree.delete(*k), Some(rec(*k)));
        }
        tree.validate().unwrap();

        for k in gone {
            assert_eq!(tree.search(*k), None);
        }
        for k in kept {
            assert_eq!(tree.search(*k), Some(&rec(*k)));
        }

        let mut expected = kept.to_vec();
        expected.sort();
        assert_eq!(keys_of(tree.range_search(Key::MIN, Key::MAX)), expected);
    }

    #[test]
    fn negative_keys_are_ordered() {
        let mut tree = BPlusTree::with_order(3);
        for k in [-5, 3, -1, 0, -20, 7] {
            tree.insert(k, rec(k));
        }

        assert_eq!(
            keys_of(tree.range_search(-10, 5)),
            vec![-5, -1, 0, 3]
        );
        tree.validate().unwrap();
    }

    #[test]
    fn page_geometry_scenario() {
        let cfg = IndexConfig::new(256, 2).unwrap();
        let mut tree = BPlusTree::new(cfg);
        assert!(tree.order() >= 3);

        for k in 1..=50 {
            tree.insert(k, Record::new(vec![k, k + 100]));
        }

        assert_eq!(tree.search(25), Some(&Record::new(vec![25, 125])));
        assert_eq!(keys_of(tree.range_search(10, 20)), (10..=20).collect::<Vec<_>>());
    }

    #[test]
    fn reset_keeps_height() {
        let mut tree = BPlusTree::with_order(3);
        for i in 0..10 {
            tree.insert(i, rec(i));
        }
        let height = tree.height();

        tree.reset_stats();
        let s = tree.get_stats();
        assert_eq!((s.page_reads, s.page_writes, s.splits), (0, 0, 0));
        assert_eq!(s.height, height);
    }
}
