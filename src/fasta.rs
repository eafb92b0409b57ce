//! Reading and writing of aligned FASTA files.
//!
//! Records are [`noodles::fasta::Record`]s. The functions in this module add
//! what aligned sequences need on top of them: construction from a name and
//! gapped text, gap checks, and base composition.

use std::borrow::Cow;
use std::io::BufRead;
use std::io::Write;
use std::io::{self};

use noodles::fasta;
use noodles::fasta::record::Definition;
use noodles::fasta::record::Sequence;
use noodles::fasta::record::definition::ParseError;

use crate::alignment::is_gap;

pub mod concat;

pub use noodles::fasta::Record;

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error related to reading a FASTA file.
#[derive(Debug)]
pub enum Error {
    /// An I/O error.
    Io(io::Error),

    /// A (one-based) record does not start with a `>` header line.
    MissingHeader(usize),

    /// A (one-based) record has a header line without an identifier.
    EmptyId(usize),
}

impl Error {
    /// Classifies an error raised while reading the given (one-based) record.
    fn from_io(record_no: usize, err: io::Error) -> Self {
        match err
            .get_ref()
            .and_then(|inner| inner.downcast_ref::<ParseError>())
        {
            Some(ParseError::MissingName) => Error::EmptyId(record_no),
            Some(_) => Error::MissingHeader(record_no),
            None => Error::Io(err),
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err) => write!(f, "i/o error: {err}"),
            Error::MissingHeader(record_no) => {
                write!(f, "record {record_no} does not start with a header line")
            }
            Error::EmptyId(record_no) => {
                write!(f, "record {record_no} has a header without an identifier")
            }
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////
// Records
////////////////////////////////////////////////////////////////////////////////////////

/// Creates a record from an identifier and a (possibly gapped) sequence.
///
/// # Examples
///
/// ```
/// let record = mafkit::fasta::record("A", "AC-GT");
/// assert_eq!(mafkit::fasta::name(&record), "A");
/// assert_eq!(record.sequence().len(), 5);
/// ```
pub fn record(name: impl Into<String>, sequence: impl Into<Vec<u8>>) -> Record {
    Record::new(
        Definition::new(name.into(), None),
        Sequence::from(sequence.into()),
    )
}

/// Gets the identifier of a record as text.
pub fn name(record: &Record) -> Cow<'_, str> {
    String::from_utf8_lossy(record.name())
}

/// Returns whether every character of a record's sequence is a gap.
pub fn is_all_gaps(record: &Record) -> bool {
    let sequence: &[u8] = record.sequence().as_ref();
    sequence.iter().copied().all(is_gap)
}

////////////////////////////////////////////////////////////////////////////////////////
// Composition
////////////////////////////////////////////////////////////////////////////////////////

/// The base composition of a sequence.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Composition {
    /// The number of `A`s.
    pub a: usize,

    /// The number of `C`s.
    pub c: usize,

    /// The number of `G`s.
    pub g: usize,

    /// The number of `T`s.
    pub t: usize,

    /// The number of `N`s and any other characters.
    pub other: usize,

    /// The number of gaps.
    pub gaps: usize,
}

impl Composition {
    /// Counts the characters of a sequence (ignoring case).
    ///
    /// # Examples
    ///
    /// ```
    /// use mafkit::fasta::Composition;
    ///
    /// let composition = Composition::of(b"ACgt-nA");
    /// assert_eq!(composition.a, 2);
    /// assert_eq!(composition.g, 1);
    /// assert_eq!(composition.other, 1);
    /// assert_eq!(composition.gaps, 1);
    /// ```
    pub fn of(sequence: &[u8]) -> Self {
        let mut composition = Self::default();

        for c in sequence {
            match c.to_ascii_uppercase() {
                b'A' => composition.a += 1,
                b'C' => composition.c += 1,
                b'G' => composition.g += 1,
                b'T' => composition.t += 1,
                c if is_gap(c) => composition.gaps += 1,
                _ => composition.other += 1,
            }
        }

        composition
    }
}

impl std::fmt::Display for Composition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "A={} C={} G={} T={} N/other={} gaps={}",
            self.a, self.c, self.g, self.t, self.other, self.gaps
        )
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Reader
////////////////////////////////////////////////////////////////////////////////////////

/// A FASTA file reader.
pub struct Reader<T>(fasta::io::Reader<T>)
where
    T: BufRead;

impl<T> std::fmt::Debug for Reader<T>
where
    T: BufRead,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reader").finish_non_exhaustive()
    }
}

impl<T> Reader<T>
where
    T: BufRead,
{
    /// Creates a FASTA file reader.
    pub fn new(inner: T) -> Self {
        Self(fasta::io::Reader::new(inner))
    }

    /// Returns an iterator over the records in the underlying reader.
    ///
    /// Sequences may be wrapped over any number of lines. The iterator stops
    /// after the first error.
    ///
    /// # Examples
    ///
    /// ```
    /// let data = b">A desc\nAC-\nGT\n>B\nACCGT\n";
    /// let mut reader = mafkit::fasta::Reader::new(&data[..]);
    ///
    /// let records = reader.records().collect::<Result<Vec<_>, _>>()?;
    /// assert_eq!(records.len(), 2);
    /// assert_eq!(mafkit::fasta::name(&records[0]), "A");
    ///
    /// let sequence: &[u8] = records[0].sequence().as_ref();
    /// assert_eq!(sequence, b"AC-GT");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn records(&mut self) -> impl Iterator<Item = Result<Record>> + '_ {
        let mut records = self.0.records();
        let mut record_no = 0usize;
        let mut failed = false;

        std::iter::from_fn(move || {
            if failed {
                return None;
            }

            let result = records.next()?;
            record_no += 1;

            Some(result.map_err(|err| {
                failed = true;
                Error::from_io(record_no, err)
            }))
        })
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Writer
////////////////////////////////////////////////////////////////////////////////////////

/// A FASTA file writer.
///
/// Sequences are written on a single line.
#[derive(Debug)]
pub struct Writer<T>(T)
where
    T: Write;

impl<T> Writer<T>
where
    T: Write,
{
    /// Creates a FASTA file writer.
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    /// Consumes self and returns the inner writer.
    pub fn into_inner(self) -> T {
        self.0
    }

    /// Writes a record.
    ///
    /// # Examples
    ///
    /// ```
    /// use mafkit::fasta::Writer;
    ///
    /// let mut writer = Writer::new(Vec::new());
    /// writer.write_record(&mafkit::fasta::record("A", "AC-GT"))?;
    /// assert_eq!(writer.into_inner(), b">A\nAC-GT\n");
    ///
    /// # Ok::<(), std::io::Error>(())
    /// ```
    pub fn write_record(&mut self, record: &Record) -> io::Result<()> {
        // One line per sequence.
        let line_base_count = record.sequence().len().max(1);

        fasta::io::writer::Builder::default()
            .set_line_base_count(line_base_count)
            .build_from_writer(&mut self.0)
            .write_record(record)
    }

    /// Flushes the inner writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_wrapped_records() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let data = b">A\nAC\nGT\n>B_1 extra words\n--GT\n";
        let mut reader = Reader::new(&data[..]);

        let records = reader.records().collect::<Result<Vec<_>>>()?;
        assert_eq!(records, vec![record("A", "ACGT"), record("B_1", "--GT")]);
        assert_eq!(name(&records[1]), "B_1");

        Ok(())
    }

    #[test]
    fn empty_input() {
        let mut reader = Reader::new(&b""[..]);
        assert!(reader.records().next().is_none());
    }

    #[test]
    fn missing_header() {
        let mut reader = Reader::new(&b"ACGT\n>A\nAC\n"[..]);
        let results = reader.records().collect::<Vec<_>>();
        assert_eq!(results.len(), 1);
        assert_eq!(
            results[0].as_ref().unwrap_err().to_string(),
            "record 1 does not start with a header line"
        );
    }

    #[test]
    fn empty_id() {
        let mut reader = Reader::new(&b">A\nAC\n>\nAC\n"[..]);
        let results = reader.records().collect::<Vec<_>>();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert_eq!(
            results[1].as_ref().unwrap_err().to_string(),
            "record 2 has a header without an identifier"
        );
    }

    #[test]
    fn long_sequences_stay_on_one_line() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let sequence = "ACGT-".repeat(40);
        let mut writer = Writer::new(Vec::new());
        writer.write_record(&record("A", sequence.as_str()))?;
        writer.write_record(&record("B", "AC"))?;

        assert_eq!(
            String::from_utf8(writer.into_inner())?,
            format!(">A\n{sequence}\n>B\nAC\n")
        );

        Ok(())
    }

    #[test]
    fn all_gaps() {
        assert!(is_all_gaps(&record("A", "----")));
        assert!(!is_all_gaps(&record("A", "--A-")));
    }

    #[test]
    fn composition_display() {
        assert_eq!(
            Composition::of(b"AACGTN--").to_string(),
            "A=2 C=1 G=1 T=1 N/other=1 gaps=2"
        );
    }
}
