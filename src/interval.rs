//! Half-open genomic intervals and their compaction into distinct positions.
//!
//! Intervals arrive sorted by start coordinate but may nest or overlap arbitrarily. The
//! compactor walks them once while tracking a single virtual interval: the right edge of
//! the contiguous coverage seen so far. Because starts never decrease, any position
//! already emitted must lie below that edge, so only the part of each interval past it is
//! new. The cost is proportional to the number of distinct positions rather than the
//! summed interval lengths.

use std::ops::Range;
use std::slice::Iter;

use crate::error::SketchError;

pub type Position = u32;

/// Half-open interval `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Interval {
    pub start: Position,
    pub end: Position,
}

impl Interval {
    pub fn new(start: Position, end: Position) -> Self {
        Interval { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Verify intervals are non-empty, well formed, and sorted by start.
pub fn validate_intervals(intervals: &[Interval]) -> Result<(), SketchError> {
    if intervals.is_empty() {
        return Err(SketchError::EmptyInput);
    }

    let mut prev_start = intervals[0].start;
    for (index, interval) in intervals.iter().enumerate() {
        if interval.is_empty() {
            return Err(SketchError::InvalidInterval {
                index,
                start: interval.start,
                end: interval.end,
                reason: "start must be less than end",
            });
        }

        if interval.start < prev_start {
            return Err(SketchError::InvalidInterval {
                index,
                start: interval.start,
                end: interval.end,
                reason: "intervals must be sorted by start coordinate",
            });
        }
        prev_start = interval.start;
    }

    Ok(())
}

/// Validate intervals and return an iterator over the newly covered ranges.
///
/// The ranges are disjoint and their union equals the union of the input intervals.
pub fn compact(intervals: &[Interval]) -> Result<NewCoverage<'_>, SketchError> {
    validate_intervals(intervals)?;

    Ok(NewCoverage {
        intervals: intervals.iter(),
        virtual_end: None,
    })
}

/// Lazily yields the portion of each interval not covered by earlier intervals.
#[derive(Clone, Debug)]
pub struct NewCoverage<'a> {
    intervals: Iter<'a, Interval>,
    // right edge of the virtual interval; None until seeded by the first interval
    virtual_end: Option<Position>,
}

impl NewCoverage<'_> {
    /// Number of distinct positions covered by the intervals.
    pub fn position_count(self) -> u64 {
        self.map(|r| (r.end - r.start) as u64).sum()
    }
}

impl Iterator for NewCoverage<'_> {
    type Item = Range<Position>;

    fn next(&mut self) -> Option<Self::Item> {
        for interval in self.intervals.by_ref() {
            let Some(virtual_end) = self.virtual_end else {
                self.virtual_end = Some(interval.end);
                return Some(interval.start..interval.end);
            };

            if interval.end <= virtual_end {
                // fully contained in coverage already emitted
                continue;
            }

            self.virtual_end = Some(interval.end);
            if interval.start >= virtual_end {
                return Some(interval.start..interval.end);
            }

            return Some(virtual_end..interval.end);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn intervals(pairs: &[(u32, u32)]) -> Vec<Interval> {
        pairs.iter().map(|&(s, e)| Interval::new(s, e)).collect()
    }

    fn naive_union(intervals: &[Interval]) -> BTreeSet<u32> {
        intervals.iter().flat_map(|iv| iv.start..iv.end).collect()
    }

    fn random_sorted_intervals(rng: &mut StdRng, n: usize) -> Vec<Interval> {
        let mut start = rng.random_range(0..20);
        let mut result = Vec::with_capacity(n);
        for _ in 0..n {
            start += rng.random_range(0..15);
            let len = rng.random_range(1..40);
            result.push(Interval::new(start, start + len));
        }
        result
    }

    #[test]
    fn test_single_interval() {
        let data = intervals(&[(1, 4)]);
        let positions: Vec<u32> = compact(&data).unwrap().flatten().collect();
        assert_eq!(positions, vec![1, 2, 3]);
    }

    #[test]
    fn test_contained_disjoint_and_partial_overlap() {
        // (3, 5) is nested, (4, 12) extends, (20, 22) is disjoint
        let data = intervals(&[(1, 10), (3, 5), (4, 12), (20, 22)]);
        let ranges: Vec<Range<u32>> = compact(&data).unwrap().collect();
        assert_eq!(ranges, vec![1..10, 10..12, 20..22]);
    }

    #[test]
    fn test_adjacent_intervals_are_disjoint_case() {
        let data = intervals(&[(1, 5), (5, 8)]);
        let ranges: Vec<Range<u32>> = compact(&data).unwrap().collect();
        assert_eq!(ranges, vec![1..5, 5..8]);
    }

    #[test]
    fn test_identical_starts() {
        let data = intervals(&[(5, 7), (5, 9), (5, 6)]);
        let positions: Vec<u32> = compact(&data).unwrap().flatten().collect();
        assert_eq!(positions, vec![5, 6, 7, 8]);
    }

    #[test]
    fn test_matches_naive_union() {
        let mut rng = StdRng::seed_from_u64(42);
        for n in 1..60 {
            let data = random_sorted_intervals(&mut rng, n);
            let positions: Vec<u32> = compact(&data).unwrap().flatten().collect();

            let unique: BTreeSet<u32> = positions.iter().copied().collect();
            assert_eq!(unique.len(), positions.len(), "duplicate positions emitted");
            assert_eq!(unique, naive_union(&data));
        }
    }

    #[test]
    fn test_position_count_bounded_by_union() {
        let data = intervals(&[(1, 100), (2, 50), (10, 90), (20, 110), (30, 60)]);
        let naive_total: u64 = data.iter().map(|iv| (iv.end - iv.start) as u64).sum();
        let count = compact(&data).unwrap().position_count();

        assert_eq!(count, naive_union(&data).len() as u64);
        assert!(count < naive_total);
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(compact(&[]), Err(SketchError::EmptyInput)));
    }

    #[test]
    fn test_zero_length_interval() {
        let data = intervals(&[(1, 4), (6, 6)]);
        assert!(matches!(
            compact(&data),
            Err(SketchError::InvalidInterval { index: 1, .. })
        ));
    }

    #[test]
    fn test_inverted_interval() {
        let data = intervals(&[(8, 3)]);
        assert!(matches!(
            compact(&data),
            Err(SketchError::InvalidInterval { index: 0, .. })
        ));
    }

    #[test]
    fn test_unsorted_starts() {
        let data = intervals(&[(10, 14), (3, 5)]);
        assert!(matches!(
            compact(&data),
            Err(SketchError::InvalidInterval { index: 1, .. })
        ));
    }
}
