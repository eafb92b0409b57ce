//! A line within a MAF file.

use std::str::FromStr;

use crate::alignment::block::BLOCK_PREFIX;
use crate::alignment::block::row;
use crate::alignment::block::row::ROW_PREFIX;
use crate::alignment::Row;

/// The prefix for the header line of a MAF file.
pub const HEADER_PREFIX: &str = "##maf";

/// The prefix for a comment line.
pub const COMMENT_PREFIX: char = '#';

/// The prefixes for lines that annotate a block but are not carried through
/// (information, empty-region, and quality lines).
pub const AUXILIARY_PREFIXES: [&str; 3] = ["i", "e", "q"];

/// An error associated with parsing a MAF file.
#[derive(Debug)]
pub enum ParseError {
    /// An invalid sequence row.
    InvalidRow(row::Error, String),

    /// A line that does not begin with a recognized prefix.
    UnrecognizedLine(String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::InvalidRow(err, line) => {
                write!(f, "invalid sequence row: {err}\n\nline: {line}")
            }
            ParseError::UnrecognizedLine(line) => {
                write!(f, "unrecognized line: {line}")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// A line within a MAF file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Line {
    /// An empty line (which terminates a block).
    Empty,
    /// The `##maf` header line.
    Header(String),
    /// A comment line.
    Comment(String),
    /// An `a` line that opens an alignment block, holding its attributes.
    Block(String),
    /// An `s` line holding an aligned sequence.
    Row(Row),
    /// An `i`, `e`, or `q` line.
    Auxiliary(String),
}

impl std::fmt::Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Line::Empty => write!(f, ""),
            Line::Header(line) => write!(f, "{line}"),
            Line::Comment(line) => write!(f, "{line}"),
            Line::Block(attributes) if attributes.is_empty() => write!(f, "{BLOCK_PREFIX}"),
            Line::Block(attributes) => write!(f, "{BLOCK_PREFIX} {attributes}"),
            Line::Row(row) => write!(f, "{row}"),
            Line::Auxiliary(line) => write!(f, "{line}"),
        }
    }
}

impl FromStr for Line {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Ok(Self::Empty);
        }

        if s.starts_with(HEADER_PREFIX) {
            return Ok(Self::Header(s.into()));
        }

        if s.starts_with(COMMENT_PREFIX) {
            return Ok(Self::Comment(s.into()));
        }

        let (prefix, rest) = s
            .trim_start()
            .split_once(char::is_whitespace)
            .unwrap_or((s.trim(), ""));

        match prefix {
            BLOCK_PREFIX => Ok(Self::Block(rest.trim().into())),
            ROW_PREFIX => s
                .parse::<Row>()
                .map(Line::Row)
                .map_err(|e| ParseError::InvalidRow(e, s.into())),
            p if AUXILIARY_PREFIXES.contains(&p) => Ok(Self::Auxiliary(s.into())),
            _ => Err(ParseError::UnrecognizedLine(s.into())),
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    pub fn test_valid_lines() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!("".parse::<Line>()?, Line::Empty);
        assert_eq!("   ".parse::<Line>()?, Line::Empty);
        assert!(matches!(
            "##maf version=1 scoring=none".parse::<Line>()?,
            Line::Header(_)
        ));
        assert!(matches!("# a comment".parse::<Line>()?, Line::Comment(_)));
        assert!(matches!(
            "i B.chr1 N 0 C 0".parse::<Line>()?,
            Line::Auxiliary(_)
        ));
        assert!(matches!(
            "s A.chr1 0 4 + 10 ACGT".parse::<Line>()?,
            Line::Row(_)
        ));
        Ok(())
    }

    #[test]
    pub fn test_block_line_attributes() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!(
            "a score=23.0 pass=2".parse::<Line>()?,
            Line::Block(String::from("score=23.0 pass=2"))
        );
        assert_eq!("a".parse::<Line>()?, Line::Block(String::new()));
        Ok(())
    }

    #[test]
    pub fn test_invalid_row_line() {
        let err = "s A.chr1 0 4 + 10".parse::<Line>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid sequence row: parse error: invalid number of fields in sequence row: \
             expected 7 fields, found 6 fields\n\nline: s A.chr1 0 4 + 10"
        );
    }

    #[test]
    pub fn test_unrecognized_line() {
        let err = "x marks the spot".parse::<Line>().unwrap_err();
        assert_eq!(err.to_string(), "unrecognized line: x marks the spot");
    }

    #[test]
    pub fn test_display_round_trips_block_lines() -> Result<(), Box<dyn std::error::Error>> {
        let line = "a score=1".parse::<Line>()?;
        assert_eq!(line.to_string(), "a score=1");
        Ok(())
    }
}
