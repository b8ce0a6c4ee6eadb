use std::fmt;

use crate::common::{config::FIELD_SIZE, errors::ConfigError};

/// Index key. Fields are 4-byte signed integers and the key is the first one.
pub type Key = i32;

/// Fixed-shape tuple of integers. `fields[0]` is the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    fields: Vec<i32>,
}

impl Record {
    pub fn new(fields: Vec<i32>) -> Self {
        Self { fields }
    }

    /// Empty records report key 0.
    pub fn key(&self) -> Key {
        self.fields.first().copied().unwrap_or(0)
    }

    pub fn fields(&self) -> &[i32] {
        &self.fields
    }

    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    /// Fixed-width encoding: each field as a 4-byte little-endian `i32`.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.fields.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    /// Decodes the first `num_fields` fields of `data`. Trailing bytes are
    /// ignored; a short buffer is a shape error.
    pub fn from_bytes(data: &[u8], num_fields: usize) -> Result<Self, ConfigError> {
        let needed = num_fields * FIELD_SIZE;
        if data.len() < needed {
            return Err(ConfigError::RecordShape {
                expected: num_fields,
                got: data.len() / FIELD_SIZE,
            });
        }

        let fields = data[..needed]
            .chunks_exact(FIELD_SIZE)
            .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        Ok(Self { fields })
    }
}

impl From<Vec<i32>> for Record {
    fn from(fields: Vec<i32>) -> Self {
        Record::new(fields)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Record(key={}, fields={:?})", self.key(), self.fields)
    }
}
