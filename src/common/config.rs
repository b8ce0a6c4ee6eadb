use crate::common::{errors::ConfigError, record::Record};

pub const MIN_PAGE_SIZE: usize = 256;
pub const FIELD_SIZE: usize = 4;
pub const KEY_SIZE: usize = FIELD_SIZE;

/// Smallest tree order that still leaves both halves of a split non-empty.
pub const MIN_ORDER: usize = 3;
pub const MIN_BUCKET_CAPACITY: usize = 2;

/// Page geometry shared by both index engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexConfig {
    page_size: usize,
    num_fields: usize,
}

impl IndexConfig {
    pub fn new(page_size: usize, num_fields: usize) -> Result<Self, ConfigError> {
        if page_size < MIN_PAGE_SIZE {
            return Err(ConfigError::PageSizeTooSmall {
                page_size,
                min: MIN_PAGE_SIZE,
            });
        }

        if num_fields < 1 {
            return Err(ConfigError::NoFields);
        }

        Ok(Self {
            page_size,
            num_fields,
        })
    }

    pub fn small() -> Self {
        Self {
            page_size: 256,
            num_fields: 5,
        }
    }

    pub fn medium() -> Self {
        Self {
            page_size: 512,
            num_fields: 10,
        }
    }

    pub fn large() -> Self {
        Self {
            page_size: 1024,
            num_fields: 20,
        }
    }

    pub fn xlarge() -> Self {
        Self {
            page_size: 2048,
            num_fields: 50,
        }
    }

    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "small" => Some(Self::small()),
            "medium" => Some(Self::medium()),
            "large" => Some(Self::large()),
            "xlarge" => Some(Self::xlarge()),
            _ => None,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn num_fields(&self) -> usize {
        self.num_fields
    }

    pub fn record_size(&self) -> usize {
        self.num_fields * FIELD_SIZE
    }

    /// Key plus the full record, for both leaf slots and bucket slots.
    pub fn entry_size(&self) -> usize {
        KEY_SIZE + self.record_size()
    }

    fn entries_per_page(&self) -> usize {
        self.page_size / self.entry_size()
    }

    pub fn bplus_order(&self) -> usize {
        self.entries_per_page().max(MIN_ORDER)
    }

    pub fn bucket_capacity(&self) -> usize {
        self.entries_per_page().max(MIN_BUCKET_CAPACITY)
    }

    /// True when a page holds fewer entries than one of the floors, i.e. the
    /// derived order or bucket capacity was raised to its minimum.
    pub fn clamped(&self) -> bool {
        self.entries_per_page() < MIN_ORDER
    }

    /// Builds a record of this index's shape.
    pub fn record(&self, fields: Vec<i32>) -> Result<Record, ConfigError> {
        if fields.len() != self.num_fields {
            return Err(ConfigError::RecordShape {
                expected: self.num_fields,
                got: fields.len(),
            });
        }
        Ok(Record::new(fields))
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self::medium()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_small_pages() {
        assert_eq!(
            IndexConfig::new(128, 2),
            Err(ConfigError::PageSizeTooSmall {
                page_size: 128,
                min: MIN_PAGE_SIZE
            })
        );
    }

    #[test]
    fn rejects_zero_fields() {
        assert_eq!(IndexConfig::new(512, 0), Err(ConfigError::NoFields));
    }

    #[test]
    fn order_derived_from_page_size() {
        // entry = 4 + 4*2 = 12 bytes, 256 / 12 = 21
        let cfg = IndexConfig::new(256, 2).unwrap();
        assert_eq!(cfg.entry_size(), 12);
        assert_eq!(cfg.bplus_order(), 21);
        assert_eq!(cfg.bucket_capacity(), 21);
        assert!(!cfg.clamped());
    }

    #[test]
    fn floors_apply_to_wide_records() {
        // entry = 4 + 4*100 = 404 bytes, does not fit a 256 byte page at all
        let cfg = IndexConfig::new(256, 100).unwrap();
        assert_eq!(cfg.bplus_order(), MIN_ORDER);
        assert_eq!(cfg.bucket_capacity(), MIN_BUCKET_CAPACITY);
        assert!(cfg.clamped());
    }

    #[test]
    fn medium_preset_matches_default() {
        let cfg = IndexConfig::default();
        assert_eq!(cfg, IndexConfig::preset("medium").unwrap());
        // entry = 44 bytes, 512 / 44 = 11
        assert_eq!(cfg.bplus_order(), 11);
        assert!(IndexConfig::preset("huge").is_none());
    }

    #[test]
    fn record_shape_is_checked() {
        let cfg = IndexConfig::new(256, 3).unwrap();
        assert!(cfg.record(vec![1, 2, 3]).is_ok());
        assert_eq!(
            cfg.record(vec![1]),
            Err(ConfigError::RecordShape {
                expected: 3,
                got: 1
            })
        );
    }
}
