//! A sequence row (`s` line) within an alignment block.

use std::num::ParseIntError;
use std::ops::Range;
use std::str::FromStr;

use omics::coordinate::Strand;
use omics::coordinate::position::Number;
use omics::coordinate::strand;

use crate::alignment::count_bases;

/// The prefix for a sequence row.
pub const ROW_PREFIX: &str = "s";

/// The delimiter used when writing a sequence row.
pub const DELIMITER: char = ' ';

/// The number of expected fields in a sequence row.
pub const NUM_ROW_FIELDS: usize = 7;

/// The separator between the sample and the sequence in a source name.
pub const SOURCE_SEPARATOR: char = '.';

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error associated with parsing a sequence row.
#[derive(Debug)]
pub enum ParseError {
    /// An incorrect number of fields in the row.
    IncorrectNumberOfFields(usize),

    /// An invalid prefix.
    InvalidPrefix(String),

    /// An invalid start position.
    InvalidStart(ParseIntError),

    /// An invalid ungapped size.
    InvalidSize(ParseIntError),

    /// An invalid strand.
    InvalidStrand(strand::Error),

    /// An invalid source size.
    InvalidSourceSize(ParseIntError),

    /// The aligned text contains non-ASCII characters.
    InvalidText,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::IncorrectNumberOfFields(fields) => write!(
                f,
                "invalid number of fields in sequence row: expected {NUM_ROW_FIELDS} fields, \
                 found {fields} fields"
            ),
            ParseError::InvalidPrefix(prefix) => {
                write!(
                    f,
                    "invalid prefix: expected \"{ROW_PREFIX}\", found \"{prefix}\""
                )
            }
            ParseError::InvalidStart(err) => write!(f, "invalid start: {err}"),
            ParseError::InvalidSize(err) => write!(f, "invalid size: {err}"),
            ParseError::InvalidStrand(err) => write!(f, "invalid strand: {err}"),
            ParseError::InvalidSourceSize(err) => write!(f, "invalid source size: {err}"),
            ParseError::InvalidText => write!(f, "aligned text must be ASCII"),
        }
    }
}

impl std::error::Error for ParseError {}

/// An error related to a [`Row`].
#[derive(Debug)]
pub enum Error {
    /// A parse error.
    Parse(ParseError),

    /// The declared size does not match the bases in the aligned text.
    SizeMismatch(String, Number, Number),

    /// The end position exceeds the size of the source sequence.
    EndPositionExceedsSize(String, Number, Number),

    /// The start plus the size does not fit in a position.
    ///
    /// The fields are the name, the start and the size.
    EndPositionOverflow(String, Number, Number),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Parse(err) => write!(f, "parse error: {err}"),
            Error::SizeMismatch(name, declared, found) => write!(
                f,
                "the declared size of `{name}` ({declared}) does not match the number of \
                 bases in the aligned text ({found})"
            ),
            Error::EndPositionExceedsSize(name, end, size) => write!(
                f,
                "the end position ({end}) exceeds the size of the source sequence `{name}` \
                 ({size})"
            ),
            Error::EndPositionOverflow(name, start, size) => write!(
                f,
                "the end position of `{name}` overflows (start {start}, size {size})"
            ),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////
// Row
////////////////////////////////////////////////////////////////////////////////////////

/// A single aligned sequence within an alignment block.
///
/// Positions are zero-based and given in the direction of the row's strand:
/// when the strand is [`Strand::Negative`], `start` counts from the end of the
/// source sequence (i.e., within its reverse complement), exactly as MAF
/// stores them.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Row {
    /// The source name (e.g., `hg38.chr1`).
    name: String,

    /// The start of the aligned region.
    start: Number,

    /// The number of bases (non-gap characters) in the aligned region.
    size: Number,

    /// The strand.
    strand: Strand,

    /// The size of the entire source sequence.
    source_size: Number,

    /// The aligned text.
    text: String,
}

impl Row {
    /// Attempts to create a new [`Row`].
    ///
    /// # Examples
    ///
    /// ```
    /// use mafkit::alignment::Row;
    /// use omics::coordinate::Strand;
    ///
    /// let row = Row::try_new("A.chr1", 10, 4, Strand::Positive, 100, "AC--GT")?;
    ///
    /// assert_eq!(row.name(), "A.chr1");
    /// assert_eq!(row.size(), 4);
    /// assert_eq!(row.len(), 6);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_new(
        name: impl Into<String>,
        start: Number,
        size: Number,
        strand: Strand,
        source_size: Number,
        text: impl Into<String>,
    ) -> Result<Self> {
        let name = name.into();
        let text = text.into();

        if !text.is_ascii() {
            return Err(Error::Parse(ParseError::InvalidText));
        }

        let bases = count_bases(text.as_bytes());
        if bases != size {
            return Err(Error::SizeMismatch(name, size, bases));
        }

        let end = match start.checked_add(size) {
            Some(end) => end,
            None => return Err(Error::EndPositionOverflow(name, start, size)),
        };

        if end > source_size {
            return Err(Error::EndPositionExceedsSize(name, end, source_size));
        }

        Ok(Self {
            name,
            start,
            size,
            strand,
            source_size,
            text,
        })
    }

    /// Gets the source name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the sample portion of the source name.
    ///
    /// This is everything before the first `.` in the source name, or the
    /// entire name if it contains no `.`.
    ///
    /// # Examples
    ///
    /// ```
    /// use mafkit::alignment::Row;
    /// use omics::coordinate::Strand;
    ///
    /// let row = Row::try_new("hg38.chr1", 0, 2, Strand::Positive, 10, "AC")?;
    /// assert_eq!(row.sample(), "hg38");
    /// assert_eq!(row.sequence(), "chr1");
    ///
    /// let row = Row::try_new("A", 0, 2, Strand::Positive, 10, "AC")?;
    /// assert_eq!(row.sample(), "A");
    /// assert_eq!(row.sequence(), "A");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn sample(&self) -> &str {
        match self.name.split_once(SOURCE_SEPARATOR) {
            Some((sample, _)) => sample,
            None => &self.name,
        }
    }

    /// Gets the sequence portion of the source name.
    ///
    /// This is everything after the first `.` in the source name, or the
    /// entire name if it contains no `.`.
    pub fn sequence(&self) -> &str {
        match self.name.split_once(SOURCE_SEPARATOR) {
            Some((_, sequence)) => sequence,
            None => &self.name,
        }
    }

    /// Gets the start position (in the direction of the strand).
    pub fn start(&self) -> Number {
        self.start
    }

    /// Gets the end position (in the direction of the strand).
    pub fn end(&self) -> Number {
        self.start + self.size
    }

    /// Gets the number of bases in the aligned text.
    pub fn size(&self) -> Number {
        self.size
    }

    /// Gets the strand.
    pub fn strand(&self) -> &Strand {
        &self.strand
    }

    /// Gets the size of the source sequence.
    pub fn source_size(&self) -> Number {
        self.source_size
    }

    /// Gets the aligned text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Gets the number of alignment columns spanned by the row.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Returns whether the row spans no alignment columns.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Slices the row to a half-open range of alignment columns.
    ///
    /// The new start is advanced by the number of bases that precede the
    /// range. Because MAF stores negative-stranded rows in reverse-complement
    /// coordinates, the same arithmetic holds for both strands.
    ///
    /// The caller must ensure that `columns` is within the row.
    pub(crate) fn slice(&self, columns: Range<usize>) -> Row {
        let before = count_bases(&self.text.as_bytes()[..columns.start]);
        let text = self.text[columns].to_string();
        let size = count_bases(text.as_bytes());

        Row {
            name: self.name.clone(),
            start: self.start + before,
            size,
            strand: self.strand.clone(),
            source_size: self.source_size,
            text,
        }
    }
}

impl FromStr for Row {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts = s.split_whitespace().collect::<Vec<_>>();
        if parts.len() != NUM_ROW_FIELDS {
            return Err(Error::Parse(ParseError::IncorrectNumberOfFields(
                parts.len(),
            )));
        }

        let prefix = parts[0];
        if prefix != ROW_PREFIX {
            return Err(Error::Parse(ParseError::InvalidPrefix(prefix.into())));
        }

        let start = parts[2]
            .parse()
            .map_err(|err| Error::Parse(ParseError::InvalidStart(err)))?;
        let size = parts[3]
            .parse()
            .map_err(|err| Error::Parse(ParseError::InvalidSize(err)))?;
        let strand = parts[4]
            .parse()
            .map_err(|err| Error::Parse(ParseError::InvalidStrand(err)))?;
        let source_size = parts[5]
            .parse()
            .map_err(|err| Error::Parse(ParseError::InvalidSourceSize(err)))?;

        Row::try_new(parts[1], start, size, strand, source_size, parts[6])
    }
}

impl std::fmt::Display for Row {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{ROW_PREFIX}{DELIMITER}{}{DELIMITER}{}{DELIMITER}{}{DELIMITER}{}{DELIMITER}{}{DELIMITER}{}",
            self.name, self.start, self.size, self.strand, self.source_size, self.text
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    pub fn parse() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let row = "s A.chr1 10 4 - 100 AC--GT".parse::<Row>()?;

        assert_eq!(row.name(), "A.chr1");
        assert_eq!(row.sample(), "A");
        assert_eq!(row.sequence(), "chr1");
        assert_eq!(row.start(), 10);
        assert_eq!(row.end(), 14);
        assert_eq!(row.size(), 4);
        assert_eq!(row.strand(), &Strand::Negative);
        assert_eq!(row.source_size(), 100);
        assert_eq!(row.text(), "AC--GT");
        assert_eq!(row.len(), 6);

        Ok(())
    }

    #[test]
    fn parse_with_padding() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let row = "s A.chr1     10   4 +  100   AC--GT".parse::<Row>()?;
        assert_eq!(row.start(), 10);
        assert_eq!(row.text(), "AC--GT");
        Ok(())
    }

    #[test]
    fn incorrect_number_of_fields() {
        let err = "s A.chr1 10 4 + 100".parse::<Row>().unwrap_err();

        assert!(matches!(
            err,
            Error::Parse(ParseError::IncorrectNumberOfFields(6))
        ));
        assert_eq!(
            err.to_string(),
            "parse error: invalid number of fields in sequence row: expected 7 fields, found 6 \
             fields"
        );
    }

    #[test]
    fn invalid_prefix() {
        let err = "x A.chr1 10 4 + 100 ACGT".parse::<Row>().unwrap_err();

        assert!(matches!(err, Error::Parse(ParseError::InvalidPrefix(_))));
        assert_eq!(
            err.to_string(),
            "parse error: invalid prefix: expected \"s\", found \"x\""
        );
    }

    #[test]
    fn invalid_start() {
        let err = "s A.chr1 ? 4 + 100 ACGT".parse::<Row>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "parse error: invalid start: invalid digit found in string"
        );
    }

    #[test]
    fn invalid_size() {
        let err = "s A.chr1 0 ? + 100 ACGT".parse::<Row>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "parse error: invalid size: invalid digit found in string"
        );
    }

    #[test]
    fn invalid_strand() {
        let err = "s A.chr1 0 4 ? 100 ACGT".parse::<Row>().unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::InvalidStrand(_))));
        assert!(err.to_string().starts_with("parse error: invalid strand: "));
    }

    #[test]
    fn invalid_source_size() {
        let err = "s A.chr1 0 4 + ? ACGT".parse::<Row>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "parse error: invalid source size: invalid digit found in string"
        );
    }

    #[test]
    fn size_mismatch() {
        let err = "s A.chr1 0 5 + 100 AC-GT".parse::<Row>().unwrap_err();

        assert!(matches!(err, Error::SizeMismatch(_, 5, 4)));
        assert_eq!(
            err.to_string(),
            "the declared size of `A.chr1` (5) does not match the number of bases in the \
             aligned text (4)"
        );
    }

    #[test]
    fn end_is_greater_than_source_size() {
        let err = "s A.chr1 98 4 + 100 ACGT".parse::<Row>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "the end position (102) exceeds the size of the source sequence `A.chr1` (100)"
        );
    }

    #[test]
    fn end_position_overflows() {
        let err = "s A.chr1 18446744073709551615 1 + 10 A"
            .parse::<Row>()
            .unwrap_err();

        assert!(matches!(err, Error::EndPositionOverflow(_, u64::MAX, 1)));
        assert_eq!(
            err.to_string(),
            "the end position of `A.chr1` overflows (start 18446744073709551615, size 1)"
        );
    }

    #[test]
    fn slice() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let row = "s A.chr1 10 6 + 100 AC--GTAA".parse::<Row>()?;

        let sliced = row.slice(1..5);
        assert_eq!(sliced.text(), "C--G");
        assert_eq!(sliced.start(), 11);
        assert_eq!(sliced.size(), 2);
        assert_eq!(sliced.source_size(), 100);

        let gaps = row.slice(2..4);
        assert_eq!(gaps.text(), "--");
        assert_eq!(gaps.start(), 12);
        assert_eq!(gaps.size(), 0);

        Ok(())
    }

    #[test]
    pub fn display() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let row = "s A.chr1   10 4 -   100 AC--GT".parse::<Row>()?;
        assert_eq!(row.to_string(), "s A.chr1 10 4 - 100 AC--GT");
        Ok(())
    }
}
