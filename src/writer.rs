//! A MAF file writer.

use std::io::Write;
use std::io::{self};

use crate::alignment::Block;

/// The header written at the top of every MAF file.
pub const HEADER: &str = "##maf version=1";

/// A MAF file writer.
///
/// The header is written lazily, immediately before the first block, so a
/// writer that never receives a block produces no output at all.
#[derive(Debug)]
pub struct Writer<T>
where
    T: Write,
{
    /// The inner writer.
    inner: T,

    /// Whether the header has been written.
    wrote_header: bool,

    /// The number of blocks written.
    blocks: usize,
}

impl<T> Writer<T>
where
    T: Write,
{
    /// Creates a MAF file writer.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            wrote_header: false,
            blocks: 0,
        }
    }

    /// Gets a reference to the inner writer.
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Consumes self and returns the inner writer.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Gets the number of blocks written so far.
    pub fn blocks_written(&self) -> usize {
        self.blocks
    }

    /// Writes a block followed by a blank line.
    ///
    /// # Examples
    ///
    /// ```
    /// use mafkit::writer::Writer;
    ///
    /// let data = b"a score=1\ns A.chr1 0 4 + 10 ACGT\ns B.chr1 1 3 - 9 AC-T\n";
    /// let mut reader = mafkit::Reader::new(&data[..]);
    /// let block = reader.blocks().next().unwrap()?;
    ///
    /// let mut writer = Writer::new(Vec::new());
    /// writer.write_block(&block)?;
    ///
    /// assert_eq!(
    ///     String::from_utf8(writer.into_inner())?,
    ///     "##maf version=1\na score=1\ns A.chr1 0 4 + 10 ACGT\ns B.chr1 1 3 - 9 AC-T\n\n"
    /// );
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn write_block(&mut self, block: &Block) -> io::Result<()> {
        if !self.wrote_header {
            writeln!(self.inner, "{HEADER}")?;
            self.wrote_header = true;
        }

        writeln!(self.inner, "{block}")?;
        self.blocks += 1;

        Ok(())
    }

    /// Flushes the inner writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Reader;

    #[test]
    fn empty_output() -> Result<(), Box<dyn std::error::Error>> {
        let writer = Writer::new(Vec::new());
        assert_eq!(writer.blocks_written(), 0);
        assert!(writer.into_inner().is_empty());
        Ok(())
    }

    #[test]
    fn header_is_written_once() -> Result<(), Box<dyn std::error::Error>> {
        let data = b"a\ns A.chr1 0 4 + 10 ACGT\n\na\ns A.chr1 4 2 + 10 AC\n";
        let mut reader = Reader::new(&data[..]);
        let mut writer = Writer::new(Vec::new());

        for result in reader.blocks() {
            writer.write_block(&result?)?;
        }

        assert_eq!(writer.blocks_written(), 2);
        assert_eq!(
            String::from_utf8(writer.into_inner())?,
            "##maf version=1\na\ns A.chr1 0 4 + 10 ACGT\n\na\ns A.chr1 4 2 + 10 AC\n\n"
        );

        Ok(())
    }
}
