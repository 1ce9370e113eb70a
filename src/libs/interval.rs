use crate::libs::error::FormatError;
use std::fmt;

/// A 0-based, half-open `[start, end)` range on a named sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Interval {
    seq: String,
    start: u64,
    end: u64,
}

impl Interval {
    /// ```
    /// # use seqcov::libs::interval::Interval;
    /// let iv = Interval::new("chr1", 5, 15).unwrap();
    /// assert_eq!(iv.len(), 10);
    /// assert!(Interval::new("chr1", 15, 15).is_err());
    /// ```
    pub fn new(seq: &str, start: u64, end: u64) -> Result<Self, FormatError> {
        if start >= end {
            return Err(FormatError::EmptyInterval {
                seq: seq.to_string(),
                start,
                end,
            });
        }
        Ok(Self {
            seq: seq.to_string(),
            start,
            end,
        })
    }

    /// From 1-based, fully closed coordinates as used by GFF/GTF and `chr:start-end`.
    ///
    /// ```
    /// # use seqcov::libs::interval::Interval;
    /// let iv = Interval::from_one_based("chr1", 1, 10).unwrap();
    /// assert_eq!((iv.start(), iv.end()), (0, 10));
    /// assert!(Interval::from_one_based("chr1", 0, 10).is_err());
    /// ```
    pub fn from_one_based(seq: &str, start: u64, end: u64) -> Result<Self, FormatError> {
        if start == 0 {
            return Err(FormatError::InvalidField {
                line: 0,
                field: "1-based start",
                value: start.to_string(),
            });
        }
        Self::new(seq, start - 1, end)
    }

    pub fn seq(&self) -> &str {
        &self.seq
    }
    pub fn start(&self) -> u64 {
        self.start
    }
    pub fn end(&self) -> u64 {
        self.end
    }

    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    /// Always false, intervals are never empty
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn overlaps(&self, other: &Interval) -> bool {
        self.seq == other.seq && self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for Interval {
    /// 1-based, closed, as in `chr1:1-10`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.seq, self.start + 1, self.end)
    }
}

/// Anything able to hand its coverage to the sweep engine as intervals.
pub trait IntervalSource {
    fn intervals(&self) -> Vec<Interval>;
}

impl IntervalSource for Interval {
    fn intervals(&self) -> Vec<Interval> {
        vec![self.clone()]
    }
}

impl<T: IntervalSource> IntervalSource for [T] {
    fn intervals(&self) -> Vec<Interval> {
        self.iter().flat_map(|e| e.intervals()).collect()
    }
}

impl<T: IntervalSource> IntervalSource for Vec<T> {
    fn intervals(&self) -> Vec<Interval> {
        self.as_slice().intervals()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_one_based() {
        let iv = Interval::new("chr1", 0, 10).unwrap();
        assert_eq!(iv.to_string(), "chr1:1-10");
    }

    #[test]
    fn test_overlaps() {
        let a = Interval::new("chr1", 0, 10).unwrap();
        let b = Interval::new("chr1", 10, 20).unwrap();
        let c = Interval::new("chr1", 9, 11).unwrap();
        let d = Interval::new("chr2", 0, 10).unwrap();
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(b.overlaps(&c));
        assert!(!a.overlaps(&d));
    }

    #[test]
    fn test_reversed_is_rejected() {
        let err = Interval::new("chr1", 10, 5).unwrap_err();
        assert_eq!(
            err,
            FormatError::EmptyInterval {
                seq: "chr1".to_string(),
                start: 10,
                end: 5
            }
        );
    }

    #[test]
    fn test_source_flattens() {
        let list = vec![
            Interval::new("chr1", 0, 10).unwrap(),
            Interval::new("chr2", 3, 4).unwrap(),
        ];
        assert_eq!(list.intervals().len(), 2);
    }
}
