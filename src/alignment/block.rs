//! Alignment blocks within a MAF file.

use std::ops::Range;

use nonempty::NonEmpty;

mod builder;
pub mod blocks;
pub mod columns;
pub mod row;

pub use builder::Builder;
pub use builder::Error as BuilderError;
pub use blocks::Blocks;
pub use columns::Columns;
pub use row::Row;

/// The prefix for the line that opens an alignment block.
pub const BLOCK_PREFIX: &str = "a";

/// An alignment block.
///
/// Every row within a block spans the same number of alignment columns, and
/// a block always has at least one row. By convention, the first row is the
/// reference row.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Block {
    /// The attributes of the `a` line (e.g., `score=23.0`), verbatim.
    attributes: String,

    /// The rows.
    rows: NonEmpty<Row>,

    /// The `i`, `e` and `q` lines, verbatim, each paired with the number of
    /// rows that precede it.
    annotations: Vec<(usize, String)>,
}

impl Block {
    /// Gets the attributes of the `a` line.
    pub fn attributes(&self) -> &str {
        &self.attributes
    }

    /// Gets the rows by reference.
    ///
    /// # Examples
    ///
    /// ```
    /// let data = b"a score=1\ns A.chr1 0 4 + 10 ACGT\ns B.chr2 3 3 - 9 AC-T\n";
    /// let mut reader = mafkit::Reader::new(&data[..]);
    ///
    /// let block = reader.blocks().next().unwrap()?;
    /// let names = block.rows().iter().map(|row| row.name()).collect::<Vec<_>>();
    /// assert_eq!(names, vec!["A.chr1", "B.chr2"]);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn rows(&self) -> &NonEmpty<Row> {
        &self.rows
    }

    /// Gets the `i`, `e` and `q` lines of the block, in input order.
    ///
    /// # Examples
    ///
    /// ```
    /// let data = b"a\ns A.chr1 0 4 + 10 ACGT\ns B.chr1 0 4 + 10 ACGT\ni B.chr1 N 0 C 0\n";
    /// let mut reader = mafkit::Reader::new(&data[..]);
    ///
    /// let block = reader.blocks().next().unwrap()?;
    /// assert_eq!(block.annotations().collect::<Vec<_>>(), vec!["i B.chr1 N 0 C 0"]);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn annotations(&self) -> impl Iterator<Item = &str> {
        self.annotations.iter().map(|(_, line)| line.as_str())
    }

    /// Gets the reference row (the first row of the block).
    pub fn reference(&self) -> &Row {
        self.rows.first()
    }

    /// Gets the rows belonging to a sample.
    pub fn rows_for<'a>(&'a self, sample: &'a str) -> impl Iterator<Item = &'a Row> + 'a {
        self.rows.iter().filter(move |row| row.sample() == sample)
    }

    /// Gets the number of alignment columns within the block.
    pub fn len(&self) -> usize {
        self.rows.first().len()
    }

    /// Returns whether the block spans no alignment columns.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Slices every row of the block to a half-open range of alignment
    /// columns.
    ///
    /// Returns [`None`] if the range is empty, extends past the block, or
    /// leaves the reference row without any bases. The `i`, `e` and `q` lines
    /// describe the whole block, so they are only kept when the range spans
    /// every column.
    ///
    /// # Examples
    ///
    /// ```
    /// let data = b"a\ns A.chr1 10 6 + 100 AC--GTAA\ns B.chr1 0 8 - 50 ACTTGTAA\n";
    /// let mut reader = mafkit::Reader::new(&data[..]);
    /// let block = reader.blocks().next().unwrap()?;
    ///
    /// let sliced = block.slice(1..5).unwrap();
    /// assert_eq!(sliced.reference().to_string(), "s A.chr1 11 2 + 100 C--G");
    /// assert_eq!(sliced.rows().get(1).unwrap().to_string(), "s B.chr1 1 4 - 50 CTTG");
    ///
    /// // Only gaps remain in the reference row.
    /// assert!(block.slice(2..4).is_none());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn slice(&self, columns: Range<usize>) -> Option<Block> {
        if columns.start >= columns.end || columns.end > self.len() {
            return None;
        }

        let reference = self.reference().slice(columns.clone());
        if reference.size() == 0 {
            return None;
        }

        let mut rows = NonEmpty::new(reference);
        for row in self.rows.tail() {
            rows.push(row.slice(columns.clone()));
        }

        let annotations = match columns.len() == self.len() {
            true => self.annotations.clone(),
            false => Vec::new(),
        };

        Some(Block {
            attributes: self.attributes.clone(),
            rows,
            annotations,
        })
    }
}

impl std::fmt::Display for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.attributes.is_empty() {
            true => writeln!(f, "{BLOCK_PREFIX}")?,
            false => writeln!(f, "{BLOCK_PREFIX} {}", self.attributes)?,
        }

        let mut annotations = self.annotations.iter().peekable();

        for (i, row) in self.rows.iter().enumerate() {
            while let Some((_, line)) = annotations.next_if(|(before, _)| *before <= i) {
                writeln!(f, "{line}")?;
            }

            writeln!(f, "{row}")?;
        }

        for (_, line) in annotations {
            writeln!(f, "{line}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::Reader;

    use super::*;

    fn parse_block(data: &[u8]) -> Block {
        let mut reader = Reader::new(data);
        reader.blocks().next().unwrap().unwrap()
    }

    #[test]
    fn slicing_to_the_full_span_is_a_noop() {
        let block = parse_block(b"a score=3\ns A.chr1 10 6 + 100 AC--GTAA\ns B.chr1 0 7 - 50 A-TTGTAA\n");
        assert_eq!(block.slice(0..block.len()), Some(block.clone()));
    }

    #[test]
    fn slicing_keeps_rows_in_order() {
        let block = parse_block(
            b"a\ns A.chr1 0 4 + 10 ACGT\ns B.chr1 0 4 + 10 ACGT\ns C.chr1 0 2 + 10 A--T\n",
        );

        let sliced = block.slice(1..3).unwrap();
        let names = sliced
            .rows()
            .iter()
            .map(|row| row.name())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["A.chr1", "B.chr1", "C.chr1"]);
        assert_eq!(sliced.rows().get(2).unwrap().text(), "--");
        assert_eq!(sliced.rows().get(2).unwrap().size(), 0);
        assert_eq!(sliced.rows().get(2).unwrap().start(), 1);
    }

    #[test]
    fn invalid_ranges_produce_nothing() {
        let block = parse_block(b"a\ns A.chr1 0 4 + 10 ACGT\n");
        assert!(block.slice(2..2).is_none());
        assert!(block.slice(3..5).is_none());
    }

    #[test]
    fn annotations_are_kept_in_place_for_the_full_span() {
        let data = b"a score=3\ns A.chr1 0 4 + 10 ACGT\ns B.chr1 0 4 + 10 ACGT\n\
                     i B.chr1 N 0 C 0\ns C.chr1 0 4 + 10 ACGT\ne D.chr1 0 4 + 10 I\n";
        let block = parse_block(data);

        assert_eq!(
            block.to_string(),
            "a score=3\ns A.chr1 0 4 + 10 ACGT\ns B.chr1 0 4 + 10 ACGT\ni B.chr1 N 0 C 0\n\
             s C.chr1 0 4 + 10 ACGT\ne D.chr1 0 4 + 10 I\n"
        );
        assert_eq!(block.slice(0..4), Some(block.clone()));

        let sliced = block.slice(1..3).unwrap();
        assert_eq!(sliced.annotations().count(), 0);
    }

    #[test]
    fn display() {
        let block = parse_block(b"a score=3\ns A.chr1 0 4 + 10 ACGT\n");
        assert_eq!(block.to_string(), "a score=3\ns A.chr1 0 4 + 10 ACGT\n");

        let block = parse_block(b"a\ns A.chr1 0 4 + 10 ACGT\n");
        assert_eq!(block.to_string(), "a\ns A.chr1 0 4 + 10 ACGT\n");
    }
}
