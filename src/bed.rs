//! Reading of genomic intervals from BED files.

use std::io::BufRead;
use std::io::{self};
use std::num::ParseIntError;
use std::str::FromStr;

use omics::coordinate::position::Number;

use crate::interval::Interval;
use crate::reader::read_line;

/// The delimiter between fields of a BED record.
pub const DELIMITER: char = '\t';

/// The minimum number of fields in a BED record.
pub const MIN_FIELDS: usize = 3;

/// The prefixes of lines that are skipped when reading records.
pub const SKIPPED_PREFIXES: [&str; 3] = ["#", "track", "browser"];

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error associated with parsing a BED record.
#[derive(Debug, Eq, PartialEq)]
pub enum ParseError {
    /// Too few fields in the record.
    IncorrectNumberOfFields(usize),

    /// An invalid start position.
    InvalidStart(ParseIntError),

    /// An invalid end position.
    InvalidEnd(ParseIntError),

    /// The start position is greater than the end position.
    StartGreaterThanEnd(Number, Number),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::IncorrectNumberOfFields(fields) => write!(
                f,
                "invalid number of fields in record: expected at least {MIN_FIELDS} \
                 tab-delimited fields, found {fields} fields"
            ),
            ParseError::InvalidStart(err) => write!(f, "invalid start: {err}"),
            ParseError::InvalidEnd(err) => write!(f, "invalid end: {err}"),
            ParseError::StartGreaterThanEnd(start, end) => write!(
                f,
                "start position ({start}) cannot be greater than the end position ({end})"
            ),
        }
    }
}

impl std::error::Error for ParseError {}

/// An error related to reading a BED file.
#[derive(Debug)]
pub enum Error {
    /// An I/O error.
    Io(io::Error),

    /// A parse error at the given (one-based) line number.
    Parse(usize, ParseError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err) => write!(f, "i/o error: {err}"),
            Error::Parse(line_no, err) => write!(f, "parse error at line {line_no}: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////
// Record
////////////////////////////////////////////////////////////////////////////////////////

/// The first three fields of a BED record.
///
/// Any fields past the third are accepted and ignored.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Record {
    /// The sequence name (`chrom`).
    sequence: String,

    /// The start position (inclusive).
    start: Number,

    /// The end position (exclusive).
    end: Number,
}

impl Record {
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

    /// Converts the record into an [`Interval`].
    ///
    /// Returns [`None`] for zero-length records.
    ///
    /// # Examples
    ///
    /// ```
    /// use mafkit::bed::Record;
    ///
    /// let record = "chr1\t10\t20\tname".parse::<Record>()?;
    /// assert_eq!(record.into_interval().unwrap().to_string(), "chr1:10-20");
    ///
    /// let record = "chr1\t10\t10".parse::<Record>()?;
    /// assert!(record.into_interval().is_none());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn into_interval(self) -> Option<Interval> {
        Interval::try_new(self.sequence, self.start, self.end).ok()
    }
}

impl FromStr for Record {
    type Err = ParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let parts = s.split(DELIMITER).collect::<Vec<_>>();
        if parts.len() < MIN_FIELDS {
            return Err(ParseError::IncorrectNumberOfFields(parts.len()));
        }

        let start = parts[1].trim().parse().map_err(ParseError::InvalidStart)?;
        let end = parts[2].trim().parse().map_err(ParseError::InvalidEnd)?;

        if start > end {
            return Err(ParseError::StartGreaterThanEnd(start, end));
        }

        Ok(Self {
            sequence: parts[0].trim().to_string(),
            start,
            end,
        })
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Reader
////////////////////////////////////////////////////////////////////////////////////////

/// A BED file reader.
#[derive(Debug)]
pub struct Reader<T>(T)
where
    T: BufRead;

impl<T> Reader<T>
where
    T: BufRead,
{
    /// Creates a BED file reader.
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    /// Consumes self and returns the inner reader.
    pub fn into_inner(self) -> T {
        self.0
    }

    /// Returns an iterator over the records in the underlying reader.
    ///
    /// Blank lines, comments, and `track` and `browser` lines are skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// let data = b"track name=test\n# comment\nchr1\t0\t10\n\nchr2\t5\t6\tfoo\n";
    /// let mut reader = mafkit::bed::Reader::new(&data[..]);
    ///
    /// let records = reader.records().collect::<Result<Vec<_>, _>>()?;
    /// assert_eq!(records.len(), 2);
    /// assert_eq!(records[1].sequence(), "chr2");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn records(&mut self) -> impl Iterator<Item = Result<Record>> + '_ {
        let mut buffer = String::new();
        let mut line_no = 0usize;

        std::iter::from_fn(move || loop {
            match read_line(&mut self.0, &mut buffer) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(err) => return Some(Err(Error::Io(err))),
            }

            line_no += 1;

            let line = buffer.trim_end();
            if line.trim().is_empty()
                || SKIPPED_PREFIXES
                    .iter()
                    .any(|prefix| line.starts_with(prefix))
            {
                continue;
            }

            return Some(
                line.parse::<Record>()
                    .map_err(|err| Error::Parse(line_no, err)),
            );
        })
    }

    /// Reads every record and converts it to an [`Interval`], dropping
    /// zero-length records.
    pub fn intervals(&mut self) -> Result<Vec<Interval>> {
        let mut intervals = Vec::new();

        for result in self.records() {
            if let Some(interval) = result?.into_interval() {
                intervals.push(interval);
            }
        }

        Ok(intervals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_record() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let record = "chr1\t100\t200".parse::<Record>()?;
        assert_eq!(record.sequence(), "chr1");
        assert_eq!(record.start(), 100);
        assert_eq!(record.end(), 200);

        let record = "A.chr1\t0\t5\tregion\t0\t+".parse::<Record>()?;
        assert_eq!(record.sequence(), "A.chr1");

        Ok(())
    }

    #[test]
    fn test_invalid_records() {
        let err = "chr1 100 200".parse::<Record>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid number of fields in record: expected at least 3 tab-delimited fields, \
             found 1 fields"
        );

        let err = "chr1\tx\t200".parse::<Record>().unwrap_err();
        assert_eq!(err.to_string(), "invalid start: invalid digit found in string");

        let err = "chr1\t0\t-1".parse::<Record>().unwrap_err();
        assert_eq!(err.to_string(), "invalid end: invalid digit found in string");

        let err = "chr1\t20\t10".parse::<Record>().unwrap_err();
        assert_eq!(err, ParseError::StartGreaterThanEnd(20, 10));
    }

    #[test]
    fn test_reader_reports_line_numbers() {
        let data = b"chr1\t0\t10\n\nchr1\t5\n";
        let mut reader = Reader::new(&data[..]);

        let results = reader.records().collect::<Vec<_>>();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());

        let err = results[1].as_ref().unwrap_err();
        assert_eq!(
            err.to_string(),
            "parse error at line 3: invalid number of fields in record: expected at least 3 \
             tab-delimited fields, found 2 fields"
        );
    }

    #[test]
    fn test_intervals_drop_zero_length_records() -> std::result::Result<(), Box<dyn std::error::Error>>
    {
        let data = b"browser position chr1\nchr1\t0\t10\r\nchr1\t4\t4\nchr2\t1\t2\n";
        let mut reader = Reader::new(&data[..]);

        let intervals = reader.intervals()?;
        let intervals = intervals
            .iter()
            .map(|interval| interval.to_string())
            .collect::<Vec<_>>();
        assert_eq!(intervals, vec!["chr1:0-10", "chr2:1-2"]);

        Ok(())
    }
}
