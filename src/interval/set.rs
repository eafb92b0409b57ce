//! A sorted, merged set of intervals for each sequence.

use std::collections::HashMap;

use omics::coordinate::position::Number;
use rust_lapper as lapper;

use crate::interval::Interval;

/// The inner value of the interval lookup data structure.
type Iv = lapper::Interval<Number, Interval>;

/// A set of non-overlapping, non-adjacent intervals for each sequence.
///
/// The set is built once by merging any intervals that overlap or touch.
/// Lookups are backed by a [`lapper::Lapper`] for each sequence.
#[derive(Debug, Default)]
pub struct Set {
    /// The merged intervals for each sequence.
    inner: HashMap<String, lapper::Lapper<Number, Interval>>,
}

impl Set {
    /// Merges intervals into a [`Set`].
    ///
    /// Within each sequence, intervals are sorted by start position and any
    /// two intervals where the first ends at or after the start of the second
    /// are merged into one interval spanning both.
    ///
    /// # Examples
    ///
    /// ```
    /// use mafkit::interval::Interval;
    /// use mafkit::interval::Set;
    ///
    /// let set = Set::merge(vec![
    ///     "chr1:20-30".parse::<Interval>()?,
    ///     "chr1:0-10".parse::<Interval>()?,
    ///     "chr1:5-12".parse::<Interval>()?,
    ///     "chr1:12-15".parse::<Interval>()?,
    /// ]);
    ///
    /// assert_eq!(
    ///     set.intervals("chr1"),
    ///     vec!["chr1:0-15".parse::<Interval>()?, "chr1:20-30".parse()?]
    /// );
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn merge<I>(intervals: I) -> Self
    where
        I: IntoIterator<Item = Interval>,
    {
        let mut by_sequence = HashMap::<String, Vec<Interval>>::new();

        for interval in intervals {
            by_sequence
                .entry(interval.sequence().to_string())
                .or_default()
                .push(interval);
        }

        let inner = by_sequence
            .into_iter()
            .map(|(sequence, intervals)| {
                let entries = merge_sorted(intervals)
                    .into_iter()
                    .map(|interval| Iv {
                        start: interval.start(),
                        stop: interval.end(),
                        val: interval,
                    })
                    .collect::<Vec<_>>();

                (sequence, lapper::Lapper::new(entries))
            })
            .collect();

        Self { inner }
    }

    /// Gets the merged intervals for a sequence in ascending order.
    pub fn intervals(&self, sequence: &str) -> Vec<Interval> {
        let mut intervals = match self.inner.get(sequence) {
            Some(entry) => entry.iter().map(|iv| iv.val.clone()).collect::<Vec<_>>(),
            None => return Vec::new(),
        };

        intervals.sort_by_key(|interval| interval.start());
        intervals
    }

    /// Gets every merged interval on `sequence` that overlaps or touches the
    /// half-open range `[start, end)`, in ascending order.
    ///
    /// Intervals that merely touch the range (ending exactly at `start` or
    /// starting exactly at `end`) are included.
    ///
    /// # Examples
    ///
    /// ```
    /// use mafkit::interval::Interval;
    /// use mafkit::interval::Set;
    ///
    /// let set = Set::merge(vec![
    ///     "chr1:0-10".parse::<Interval>()?,
    ///     "chr1:30-40".parse::<Interval>()?,
    ///     "chr1:50-60".parse::<Interval>()?,
    /// ]);
    ///
    /// let hits = set.overlapping("chr1", 10, 30);
    /// assert_eq!(hits, vec!["chr1:0-10".parse::<Interval>()?, "chr1:30-40".parse()?]);
    ///
    /// assert!(set.overlapping("chr1", 11, 29).is_empty());
    /// assert!(set.overlapping("chr2", 0, 100).is_empty());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn overlapping(&self, sequence: &str, start: Number, end: Number) -> Vec<Interval> {
        let entry = match self.inner.get(sequence) {
            Some(entry) => entry,
            None => return Vec::new(),
        };

        // The lapper only reports strict overlaps, so the query is widened by
        // one on either side to pick up adjacent intervals.
        let mut hits = entry
            .find(start.saturating_sub(1), end.saturating_add(1))
            .map(|iv| iv.val.clone())
            .filter(|interval| interval.start() <= end && start <= interval.end())
            .collect::<Vec<_>>();

        hits.sort_by_key(|interval| interval.start());
        hits
    }

    /// Gets the names of the sequences within the set in sorted order.
    pub fn sequences(&self) -> Vec<&str> {
        let mut sequences = self.inner.keys().map(String::as_str).collect::<Vec<_>>();
        sequences.sort_unstable();
        sequences
    }

    /// Returns whether the set contains any intervals for `sequence`.
    pub fn contains_sequence(&self, sequence: &str) -> bool {
        self.inner.contains_key(sequence)
    }

    /// Gets the total number of merged intervals.
    pub fn len(&self) -> usize {
        self.inner.values().map(|entry| entry.len()).sum()
    }

    /// Returns whether the set holds no intervals.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<Interval> for Set {
    fn from_iter<T: IntoIterator<Item = Interval>>(iter: T) -> Self {
        Self::merge(iter)
    }
}

/// Sorts the intervals of a single sequence and merges those that overlap or
/// touch.
fn merge_sorted(mut intervals: Vec<Interval>) -> Vec<Interval> {
    intervals.sort_by(|a, b| a.start.cmp(&b.start).then(a.end.cmp(&b.end)));

    let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());

    for interval in intervals {
        match merged.last_mut() {
            Some(last) if interval.start <= last.end => {
                last.end = last.end.max(interval.end);
            }
            _ => merged.push(interval),
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intervals(values: &[&str]) -> Vec<Interval> {
        values.iter().map(|value| value.parse().unwrap()).collect()
    }

    #[test]
    fn test_merge_overlapping_and_adjacent() {
        let set = Set::merge(intervals(&[
            "chr1:5-10",
            "chr1:0-6",
            "chr1:10-12",
            "chr1:20-25",
            "chr1:21-22",
            "chr2:0-5",
        ]));

        assert_eq!(set.len(), 3);
        assert_eq!(set.intervals("chr1"), intervals(&["chr1:0-12", "chr1:20-25"]));
        assert_eq!(set.intervals("chr2"), intervals(&["chr2:0-5"]));
        assert_eq!(set.sequences(), vec!["chr1", "chr2"]);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let input = intervals(&["chr1:30-40", "chr1:0-10", "chr1:8-20", "chr1:41-45"]);
        let once = Set::merge(input);
        let twice = Set::merge(once.intervals("chr1"));

        assert_eq!(once.intervals("chr1"), twice.intervals("chr1"));
    }

    #[test]
    fn test_merge_preserves_the_union() {
        let input = intervals(&["chr1:3-9", "chr1:0-4", "chr1:12-14", "chr1:13-20", "chr1:25-26"]);
        let set = input.iter().cloned().collect::<Set>();
        let merged = set.intervals("chr1");

        for position in 0..30 {
            let covered_by_input = input
                .iter()
                .any(|i| i.start() <= position && position < i.end());
            let covered_by_merged = merged
                .iter()
                .any(|i| i.start() <= position && position < i.end());
            assert_eq!(covered_by_input, covered_by_merged, "position {position}");
        }

        for pair in merged.windows(2) {
            assert!(pair[0].end() < pair[1].start());
        }
    }

    #[test]
    fn test_overlapping_includes_touching_intervals() {
        let set = Set::merge(intervals(&["chr1:0-10", "chr1:20-30"]));

        assert_eq!(set.overlapping("chr1", 10, 20), intervals(&["chr1:0-10", "chr1:20-30"]));
        assert_eq!(set.overlapping("chr1", 5, 6), intervals(&["chr1:0-10"]));
        assert!(set.overlapping("chr1", 31, 40).is_empty());
        assert!(set.overlapping("chr3", 0, 10).is_empty());
    }

    #[test]
    fn test_empty_set() {
        let set = Set::default();
        assert!(set.is_empty());
        assert!(!set.contains_sequence("chr1"));
    }
}
