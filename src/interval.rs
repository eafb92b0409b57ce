//! A 0-based, half-open genomic interval on the forward strand.
//!
//! Intervals follow BED conventions: the start position is included and the
//! end position is excluded, and both are counted from the beginning of the
//! forward strand of the sequence.
//!
//! ```text
//! ================ seq0 ===============
//!
//! | 0 | 1 | 2 | 3 | 4 | 5 | 6 | 7 | 8 |
//! -------------------------------------
//! |   |   | X | X | X | X | O |   |   |  <= seq0:2-6
//! ```

use std::num::ParseIntError;
use std::str::FromStr;

use omics::coordinate::position::Number;

pub mod set;

pub use set::Set;

/// An error related to an interval.
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// The start position equals the end position, which would result in a
    /// zero-sized interval.
    ZeroSizedInterval,

    /// The start position is greater than the end position.
    StartGreaterThanEnd(Number, Number),

    /// Could not parse an interval from the given value.
    Parse(String),

    /// Could not parse a position within an interval.
    InvalidPosition(ParseIntError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::ZeroSizedInterval => write!(
                f,
                "start position equals end position, which is a zero-sized interval"
            ),
            Error::StartGreaterThanEnd(start, end) => write!(
                f,
                "start position ({start}) cannot be greater than the end position ({end})"
            ),
            Error::Parse(value) => write!(f, "could not parse interval from the value: {value}"),
            Error::InvalidPosition(err) => write!(f, "invalid position: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// A half-open interval on the forward strand of a named sequence.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Interval {
    /// The sequence name.
    sequence: String,

    /// The start position (inclusive).
    start: Number,

    /// The end position (exclusive).
    end: Number,
}

impl Interval {
    /// Attempts to create a new [`Interval`].
    ///
    /// # Examples
    ///
    /// ```
    /// use mafkit::interval::Error;
    /// use mafkit::interval::Interval;
    ///
    /// let interval = Interval::try_new("chr1", 10, 20)?;
    /// assert_eq!(interval.len(), 10);
    ///
    /// assert_eq!(
    ///     Interval::try_new("chr1", 10, 10).unwrap_err(),
    ///     Error::ZeroSizedInterval
    /// );
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_new(sequence: impl Into<String>, start: Number, end: Number) -> Result<Self> {
        if start == end {
            return Err(Error::ZeroSizedInterval);
        }

        if start > end {
            return Err(Error::StartGreaterThanEnd(start, end));
        }

        Ok(Self {
            sequence: sequence.into(),
            start,
            end,
        })
    }

    /// Gets the sequence name.
    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    /// Gets the start position.
    pub fn start(&self) -> Number {
        self.start
    }

    /// Gets the end position.
    pub fn end(&self) -> Number {
        self.end
    }

    /// Gets the number of positions within the interval.
    ///
    /// This is never zero.
    pub fn len(&self) -> Number {
        self.end - self.start
    }

    /// Returns whether this interval shares at least one position with
    /// `other`.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.sequence == other.sequence && self.start < other.end && other.start < self.end
    }

    /// Returns whether this interval overlaps `other` or is directly adjacent
    /// to it.
    pub fn touches(&self, other: &Interval) -> bool {
        self.sequence == other.sequence && self.start <= other.end && other.start <= self.end
    }

    /// Intersects two intervals.
    ///
    /// Returns [`None`] if the intervals are on different sequences or if the
    /// intersection would be empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use mafkit::interval::Interval;
    ///
    /// let a = "chr1:10-20".parse::<Interval>()?;
    /// let b = "chr1:15-30".parse::<Interval>()?;
    /// assert_eq!(a.intersect(&b), Some("chr1:15-20".parse()?));
    ///
    /// // Adjacent intervals do not intersect.
    /// let c = "chr1:20-30".parse::<Interval>()?;
    /// assert_eq!(a.intersect(&c), None);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn intersect(&self, other: &Interval) -> Option<Interval> {
        if self.sequence != other.sequence {
            return None;
        }

        let start = self.start.max(other.start);
        let end = self.end.min(other.end);

        Interval::try_new(self.sequence.clone(), start, end).ok()
    }
}

impl FromStr for Interval {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (sequence, range) = s
            .rsplit_once(':')
            .ok_or_else(|| Error::Parse(s.to_string()))?;
        let (start, end) = range
            .split_once('-')
            .ok_or_else(|| Error::Parse(s.to_string()))?;

        if sequence.is_empty() {
            return Err(Error::Parse(s.to_string()));
        }

        let start = start.parse().map_err(Error::InvalidPosition)?;
        let end = end.parse().map_err(Error::InvalidPosition)?;

        Interval::try_new(sequence, start, end)
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}-{}", self.sequence, self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_intervals() {
        assert_eq!(
            Interval::try_new("chr1", 5, 5).unwrap_err(),
            Error::ZeroSizedInterval
        );

        let err = Interval::try_new("chr1", 6, 5).unwrap_err();
        assert_eq!(
            err.to_string(),
            "start position (6) cannot be greater than the end position (5)"
        );
    }

    #[test]
    fn test_parse() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let interval = "chr1:0-1000".parse::<Interval>()?;
        assert_eq!(interval.sequence(), "chr1");
        assert_eq!(interval.start(), 0);
        assert_eq!(interval.end(), 1000);

        let interval = "A.chr1:5-6".parse::<Interval>()?;
        assert_eq!(interval.sequence(), "A.chr1");

        let err = "chr1".parse::<Interval>().unwrap_err();
        assert_eq!(err.to_string(), "could not parse interval from the value: chr1");

        let err = "chr1:a-5".parse::<Interval>().unwrap_err();
        assert_eq!(err.to_string(), "invalid position: invalid digit found in string");

        Ok(())
    }

    #[test]
    fn test_intersect() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let a = "chr1:10-20".parse::<Interval>()?;

        assert_eq!(a.intersect(&"chr1:0-100".parse()?), Some(a.clone()));
        assert_eq!(a.intersect(&"chr1:19-25".parse()?), Some("chr1:19-20".parse()?));
        assert_eq!(a.intersect(&"chr1:0-10".parse()?), None);
        assert_eq!(a.intersect(&"chr2:10-20".parse()?), None);

        Ok(())
    }

    #[test]
    fn test_overlaps_and_touches() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let a = "chr1:10-20".parse::<Interval>()?;
        let adjacent = "chr1:20-30".parse::<Interval>()?;
        let inside = "chr1:12-13".parse::<Interval>()?;

        assert!(!a.overlaps(&adjacent));
        assert!(a.touches(&adjacent));
        assert!(a.overlaps(&inside));
        assert!(a.touches(&inside));
        assert!(!a.touches(&"chr1:21-30".parse()?));

        Ok(())
    }

    #[test]
    fn test_display() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let interval = Interval::try_new("chr1", 1, 7)?;
        assert_eq!(interval.to_string(), "chr1:1-7");
        Ok(())
    }
}
