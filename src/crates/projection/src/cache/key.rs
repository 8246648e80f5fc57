//! Cache key derivation

use std::fmt;

use crate::model::{DateRange, GroupBy};

/// Deterministic address of a projection within a building's cache namespace
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    range: DateRange,
    group_by: GroupBy,
    encoded: String,
}

impl CacheKey {
    pub fn new(range: DateRange, group_by: GroupBy) -> Self {
        let encoded = format!(
            "projection:{}:{}:{}",
            range.start.format("%Y-%m-%d"),
            range.end.format("%Y-%m-%d"),
            group_by
        );
        Self {
            range,
            group_by,
            encoded,
        }
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn group_by(&self) -> GroupBy {
        self.group_by
    }

    pub fn as_str(&self) -> &str {
        &self.encoded
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_deterministic() {
        let range = DateRange::years(2024, 2026).unwrap();
        let a = CacheKey::new(range, GroupBy::Monthly);
        let b = CacheKey::new(range, GroupBy::Monthly);

        assert_eq!(a, b);
        assert_eq!(a.as_str(), "projection:2024-01-01:2026-12-31:monthly");
    }

    #[test]
    fn test_grouping_changes_key() {
        let range = DateRange::years(2024, 2024).unwrap();
        assert_ne!(
            CacheKey::new(range, GroupBy::Monthly).as_str(),
            CacheKey::new(range, GroupBy::Yearly).as_str()
        );
    }
}
