use serde::{Deserialize, Serialize};
use std::fmt;

/// An inclusive span of 1-based record offsets owned by one worker.
///
/// `start > end` encodes an empty range; it happens when there are fewer
/// records than workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkRange {
    pub start: u64,
    pub end: u64,
}

impl WorkRange {
    pub fn new(start: u64, end: u64) -> Self {
        WorkRange { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start == 0 || self.start > self.end
    }

    /// Number of records in the range.
    pub fn len(&self) -> u64 {
        if self.is_empty() {
            0
        } else {
            self.end - self.start + 1
        }
    }

    /// Row count for a `LIMIT` clause.
    pub fn limit(&self) -> u64 {
        self.len()
    }

    /// Rows to skip for an `OFFSET` clause.
    pub fn offset(&self) -> u64 {
        self.start.saturating_sub(1)
    }
}

impl fmt::Display for WorkRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_and_offset_follow_the_range() {
        let range = WorkRange::new(9, 11);
        assert_eq!(range.limit(), 3);
        assert_eq!(range.offset(), 8);
    }

    #[test]
    fn inverted_range_is_empty() {
        let range = WorkRange::new(1, 0);
        assert!(range.is_empty());
        assert_eq!(range.len(), 0);
    }
}
