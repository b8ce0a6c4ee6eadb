pub mod btree;
pub mod errors;
pub mod hash;
pub mod index;
pub mod stats;

pub use btree::b_plus_tree::BPlusTree;
pub use errors::{IndexError, IndexResult};
pub use hash::extendible::ExtendibleHash;
pub use index::{Index, RangeIndex};
