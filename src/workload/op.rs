use std::fmt;

use crate::{
    common::record::{Key, Record},
    storage::index::Index,
};

/// One already-parsed workload step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Insert(Record),
    Delete(Key),
    Search(Key),
}

pub const INSERT_TAG: &str = "+";
pub const DELETE_TAG: &str = "-";
pub const SEARCH_TAG: &str = "?";

impl Operation {
    /// Builds an operation from its tag and fields. Deletes and searches
    /// only read the first field.
    pub fn from_fields(tag: &str, fields: Vec<i32>) -> Result<Self, String> {
        let key = *fields.first().ok_or("operation without fields")?;

        match tag {
            INSERT_TAG => Ok(Operation::Insert(Record::new(fields))),
            DELETE_TAG => Ok(Operation::Delete(key)),
            SEARCH_TAG => Ok(Operation::Search(key)),
            other => Err(format!("unknown operation tag '{}'", other)),
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Operation::Insert(_) => INSERT_TAG,
            Operation::Delete(_) => DELETE_TAG,
            Operation::Search(_) => SEARCH_TAG,
        }
    }

    pub fn key(&self) -> Key {
        match self {
            Operation::Insert(r) => r.key(),
            Operation::Delete(k) | Operation::Search(k) => *k,
        }
    }

    /// Applies the operation and reports whether it took effect (inserted,
    /// found or removed).
    pub fn apply(self, index: &mut dyn Index) -> bool {
        match self {
            Operation::Insert(r) => index.insert(r.key(), r),
            Operation::Delete(k) => index.delete(k).is_some(),
            Operation::Search(k) => index.search(k).is_some(),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Insert(r) => write!(f, "{} {}", self.tag(), r),
            _ => write!(f, "{} {}", self.tag(), self.key()),
        }
    }
}
