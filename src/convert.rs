//! Flattening of MAF alignment blocks into one FASTA record per sample.

use crate::alignment::Block;
use crate::alignment::GAP;
use crate::alignment::block::blocks;
use crate::fasta;
use crate::fasta::Record;

/// An error related to converting alignment blocks to FASTA.
#[derive(Debug)]
pub enum Error {
    /// No samples were requested.
    NoSamples,

    /// A sample was requested more than once.
    DuplicateRequest(String),

    /// A (one-based) block holds more than one row for a requested sample.
    DuplicateSample(usize, String),

    /// An error reading the alignment blocks.
    Blocks(blocks::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::NoSamples => write!(f, "no samples were requested"),
            Error::DuplicateRequest(sample) => {
                write!(f, "sample `{sample}` was requested more than once")
            }
            Error::DuplicateSample(block_no, sample) => write!(
                f,
                "block #{block_no} contains more than one row for sample `{sample}`"
            ),
            Error::Blocks(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// Concatenates the aligned text of each requested sample across blocks.
///
/// Records are returned in the requested order. A block without a row for a
/// sample contributes a run of gaps as long as the block.
///
/// # Examples
///
/// ```
/// use mafkit::convert::maf_to_fasta;
/// use mafkit::fasta::record;
///
/// let data = b"a\ns A.chr1 0 3 + 10 AC-G\ns B.chr1 0 4 + 10 ACTG\n\n\
///              a\ns B.chr1 4 2 + 10 TT\n";
/// let mut reader = mafkit::Reader::new(&data[..]);
///
/// let records = maf_to_fasta(reader.blocks(), &["B", "A"])?;
/// assert_eq!(
///     records,
///     vec![record("B", "ACTGTT"), record("A", "AC-G--")]
/// );
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn maf_to_fasta<I, S>(blocks: I, samples: &[S]) -> Result<Vec<Record>>
where
    I: IntoIterator<Item = std::result::Result<Block, blocks::Error>>,
    S: AsRef<str>,
{
    if samples.is_empty() {
        return Err(Error::NoSamples);
    }

    for (i, sample) in samples.iter().enumerate() {
        if samples[..i].iter().any(|s| s.as_ref() == sample.as_ref()) {
            return Err(Error::DuplicateRequest(sample.as_ref().to_string()));
        }
    }

    let mut sequences = vec![Vec::new(); samples.len()];

    for (i, result) in blocks.into_iter().enumerate() {
        let block = result.map_err(Error::Blocks)?;
        let block_no = i + 1;

        for (sample, sequence) in samples.iter().zip(sequences.iter_mut()) {
            let sample = sample.as_ref();
            let mut rows = block.rows_for(sample);

            match (rows.next(), rows.next()) {
                (Some(row), None) => sequence.extend_from_slice(row.text().as_bytes()),
                (None, _) => sequence.resize(sequence.len() + block.len(), GAP),
                (Some(_), Some(_)) => {
                    return Err(Error::DuplicateSample(block_no, sample.to_string()));
                }
            }
        }
    }

    Ok(samples
        .iter()
        .zip(sequences)
        .map(|(sample, sequence)| fasta::record(sample.as_ref(), sequence))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Reader;

    #[test]
    fn duplicate_sample_in_block() {
        let data = b"a\ns A.chr1 0 2 + 10 AC\ns A.chr2 0 2 + 10 GT\n";
        let mut reader = Reader::new(&data[..]);

        let err = maf_to_fasta(reader.blocks(), &["A"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "block #1 contains more than one row for sample `A`"
        );
    }

    #[test]
    fn requested_samples_are_validated() {
        let mut reader = Reader::new(&b""[..]);
        let err = maf_to_fasta(reader.blocks(), &[] as &[&str]).unwrap_err();
        assert_eq!(err.to_string(), "no samples were requested");

        let mut reader = Reader::new(&b""[..]);
        let err = maf_to_fasta(reader.blocks(), &["A", "A"]).unwrap_err();
        assert_eq!(err.to_string(), "sample `A` was requested more than once");
    }

    #[test]
    fn block_errors_are_propagated() {
        let data = b"a\ns A.chr1 0 2 + 10 AC\ns B.chr1 0 3 + 10 ACG\n";
        let mut reader = Reader::new(&data[..]);

        let err = maf_to_fasta(reader.blocks(), &["A"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid block #1: row `B.chr1` spans 3 alignment columns, but the block spans 2"
        );
    }

    #[test]
    fn missing_samples_are_gaps() -> Result<()> {
        let data = b"a\ns A.chr1 0 2 + 10 AC\n";
        let mut reader = Reader::new(&data[..]);

        let records = maf_to_fasta(reader.blocks(), &["A", "C"])?;
        assert_eq!(records[1], fasta::record("C", "--"));

        Ok(())
    }
}
