pub mod b_plus_tree;
pub mod cursor;
pub mod internal;
pub mod leaf;
pub mod node;
pub mod unit_tests;

pub use b_plus_tree::BPlusTree;
pub use cursor::RangeIter;
