//! Concatenation of aligned FASTA files sample by sample.
//!
//! Each file holds one alignment in which every record has the same length.
//! For every requested sample, the records belonging to that sample are pulled
//! from each file in turn and appended to the sample's growing sequence.
//!
//! A record belongs to a sample when its identifier is the sample name, or the
//! sample name followed by the split delimiter and any suffix (e.g., `A_1` and
//! `A_2` both belong to `A`). Multiple records for one sample are merged
//! column by column, keeping the first base found in each column.

use regex::Regex;
use tracing::debug;
use tracing::warn;

use crate::alignment::GAP;
use crate::alignment::is_gap;
use crate::fasta;
use crate::fasta::Record;

/// The default delimiter between a sample name and a split suffix.
pub const DEFAULT_SPLIT_DELIMITER: char = '_';

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error related to concatenating FASTA files.
#[derive(Debug)]
pub enum Error {
    /// No samples were requested.
    NoSamples,

    /// A sample was requested more than once.
    DuplicateSample(String),

    /// The split-id pattern for a sample could not be compiled.
    InvalidPattern(regex::Error),

    /// The records within a file have different lengths.
    ///
    /// The fields are the name of the file and the identifier and length of
    /// each record.
    LengthMismatch(String, Vec<(String, usize)>),

    /// Some samples hold nothing but gaps after concatenation.
    OnlyGaps(Vec<String>),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::NoSamples => write!(f, "no samples were requested"),
            Error::DuplicateSample(sample) => {
                write!(f, "sample `{sample}` was requested more than once")
            }
            Error::InvalidPattern(err) => write!(f, "invalid split-id pattern: {err}"),
            Error::LengthMismatch(name, lengths) => {
                let lengths = lengths
                    .iter()
                    .map(|(id, len)| format!("{id}={len}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(
                    f,
                    "Not all sequences are of the same length: {name} ({lengths})"
                )
            }
            Error::OnlyGaps(samples) => write!(
                f,
                "{} sequence(s) contain only gaps: {}",
                samples.len(),
                samples.join(", ")
            ),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////
// Builder
////////////////////////////////////////////////////////////////////////////////////////

/// A builder for a [`Concatenator`].
#[derive(Debug)]
pub struct Builder {
    /// The requested samples, in output order.
    samples: Vec<String>,

    /// The delimiter between a sample name and a split suffix.
    delimiter: char,

    /// Whether samples holding only gaps are kept rather than rejected.
    keep_gaps_only: bool,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            samples: Vec::new(),
            delimiter: DEFAULT_SPLIT_DELIMITER,
            keep_gaps_only: false,
        }
    }
}

impl Builder {
    /// Sets the requested samples.
    pub fn samples<I, S>(mut self, samples: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.samples = samples.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the delimiter between a sample name and a split suffix.
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether samples holding only gaps are kept.
    pub fn keep_gaps_only(mut self, keep_gaps_only: bool) -> Self {
        self.keep_gaps_only = keep_gaps_only;
        self
    }

    /// Consumes `self` to attempt to build a [`Concatenator`].
    ///
    /// # Examples
    ///
    /// ```
    /// use mafkit::fasta::concat::Builder;
    ///
    /// let err = Builder::default().samples(["A", "B", "A"]).try_build().unwrap_err();
    /// assert_eq!(err.to_string(), "sample `A` was requested more than once");
    /// ```
    pub fn try_build(self) -> Result<Concatenator> {
        if self.samples.is_empty() {
            return Err(Error::NoSamples);
        }

        let mut patterns = Vec::with_capacity(self.samples.len());

        for (i, sample) in self.samples.iter().enumerate() {
            if self.samples[..i].contains(sample) {
                return Err(Error::DuplicateSample(sample.clone()));
            }

            let pattern = format!(
                "^{}(?:{}.*)?$",
                regex::escape(sample),
                regex::escape(&self.delimiter.to_string())
            );
            patterns.push(Regex::new(&pattern).map_err(Error::InvalidPattern)?);
        }

        let sequences = vec![Vec::new(); self.samples.len()];

        Ok(Concatenator {
            samples: self.samples,
            patterns,
            keep_gaps_only: self.keep_gaps_only,
            sequences,
        })
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Concatenator
////////////////////////////////////////////////////////////////////////////////////////

/// Concatenates aligned FASTA files sample by sample.
#[derive(Debug)]
pub struct Concatenator {
    /// The requested samples, in output order.
    samples: Vec<String>,

    /// The split-id pattern for each sample.
    patterns: Vec<Regex>,

    /// Whether samples holding only gaps are kept rather than rejected.
    keep_gaps_only: bool,

    /// The sequence concatenated so far for each sample.
    sequences: Vec<Vec<u8>>,
}

impl Concatenator {
    /// Gets the requested samples.
    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    /// Finds the sample a record identifier belongs to.
    ///
    /// An exact match wins over a split-id match. Among split-id matches, the
    /// longest sample name wins.
    fn sample_for(&self, id: &str) -> Option<usize> {
        if let Some(i) = self.samples.iter().position(|sample| sample == id) {
            return Some(i);
        }

        self.patterns
            .iter()
            .enumerate()
            .filter(|(_, pattern)| pattern.is_match(id))
            .max_by_key(|(i, _)| self.samples[*i].len())
            .map(|(i, _)| i)
    }

    /// Appends the records of one file.
    ///
    /// `name` identifies the file in error messages.
    ///
    /// # Examples
    ///
    /// ```
    /// use mafkit::fasta::concat::Builder;
    /// use mafkit::fasta::record;
    ///
    /// let mut concatenator = Builder::default().samples(["A", "B"]).try_build()?;
    /// concatenator.push("one.fa", vec![record("B", "AC"), record("A", "GT")])?;
    /// concatenator.push("two.fa", vec![record("A", "TTT")])?;
    ///
    /// let records = concatenator.finish()?;
    /// assert_eq!(records[0], record("A", "GTTTT"));
    /// assert_eq!(records[1], record("B", "AC---"));
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn push(&mut self, name: &str, records: Vec<Record>) -> Result<()> {
        let length = records
            .first()
            .map(|record| record.sequence().len())
            .unwrap_or_default();

        if records
            .iter()
            .any(|record| record.sequence().len() != length)
        {
            return Err(Error::LengthMismatch(
                name.to_string(),
                records
                    .iter()
                    .map(|record| (fasta::name(record).into_owned(), record.sequence().len()))
                    .collect(),
            ));
        }

        let mut parts = vec![Vec::<&Record>::new(); self.samples.len()];
        for record in records.iter() {
            let id = fasta::name(record);
            match self.sample_for(&id) {
                Some(i) => parts[i].push(record),
                None => debug!("{name}: record `{id}` is not a requested sample"),
            }
        }

        for (i, parts) in parts.into_iter().enumerate() {
            let sample = &self.samples[i];

            let merged = match parts.split_first() {
                Some((first, rest)) => {
                    let sequence: &[u8] = first.sequence().as_ref();
                    let mut merged = sequence.to_vec();
                    let conflicts = merge_parts(&mut merged, rest);

                    if conflicts > 0 {
                        warn!(
                            "{name}: the {} split parts of `{sample}` disagree at {conflicts} \
                             column(s); the first base was kept",
                            rest.len() + 1
                        );
                    }

                    merged
                }
                None => {
                    debug!("{name}: sample `{sample}` is absent and is filled with gaps");
                    vec![GAP; length]
                }
            };

            self.sequences[i].extend(merged);
        }

        Ok(())
    }

    /// Consumes `self` and returns one record per requested sample, in the
    /// requested order.
    ///
    /// Samples holding only gaps are an error unless they were configured to
    /// be kept.
    pub fn finish(self) -> Result<Vec<Record>> {
        let records = self
            .samples
            .into_iter()
            .zip(self.sequences)
            .map(|(sample, sequence)| fasta::record(sample, sequence))
            .collect::<Vec<_>>();

        let gaps_only = records
            .iter()
            .filter(|record| fasta::is_all_gaps(record))
            .map(|record| fasta::name(record).into_owned())
            .collect::<Vec<_>>();

        if !gaps_only.is_empty() {
            if !self.keep_gaps_only {
                return Err(Error::OnlyGaps(gaps_only));
            }

            warn!(
                "keeping {} sequence(s) that contain only gaps: {}",
                gaps_only.len(),
                gaps_only.join(", ")
            );
        }

        Ok(records)
    }
}

/// Merges split parts into `merged` column by column.
///
/// A gap is filled by the first part holding a base in that column. Returns
/// the number of columns where two parts hold different bases.
fn merge_parts(merged: &mut [u8], parts: &[&Record]) -> usize {
    let mut conflicts = 0;

    for part in parts {
        let sequence: &[u8] = part.sequence().as_ref();

        for (current, &candidate) in merged.iter_mut().zip(sequence) {
            if is_gap(candidate) {
                continue;
            }

            if is_gap(*current) {
                *current = candidate;
            } else if !current.eq_ignore_ascii_case(&candidate) {
                conflicts += 1;
            }
        }
    }

    conflicts
}
