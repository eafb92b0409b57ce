//! Mapping between ungapped sequence offsets and alignment columns.
//!
//! Within a row, an _offset_ is the zero-based index of a base among the
//! row's bases (gaps are skipped) and a _column_ is the zero-based index of a
//! character within the aligned text. For example, given the aligned text
//! `AC--GT`:
//!
//! ```text
//! column | 0 | 1 | 2 | 3 | 4 | 5 |
//! text   | A | C | - | - | G | T |
//! offset | 0 | 1 |   |   | 2 | 3 |
//! ```

use std::ops::Range;

use omics::coordinate::position::Number;

use crate::alignment::is_gap;

/// A precomputed prefix count of bases for each column of an aligned text.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Columns {
    /// `prefix[c]` is the number of bases within columns `0..c`.
    prefix: Vec<Number>,
}

impl Columns {
    /// Builds the prefix counts for an aligned text.
    ///
    /// # Examples
    ///
    /// ```
    /// use mafkit::alignment::block::Columns;
    ///
    /// let columns = Columns::new("AC--GT");
    /// assert_eq!(columns.len(), 6);
    /// assert_eq!(columns.bases(), 4);
    /// ```
    pub fn new(text: &str) -> Self {
        let mut prefix = Vec::with_capacity(text.len() + 1);
        let mut bases = 0;

        prefix.push(bases);
        for c in text.bytes() {
            if !is_gap(c) {
                bases += 1;
            }
            prefix.push(bases);
        }

        Self { prefix }
    }

    /// Gets the number of columns.
    pub fn len(&self) -> usize {
        self.prefix.len() - 1
    }

    /// Returns whether there are no columns.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Gets the total number of bases.
    pub fn bases(&self) -> Number {
        self.prefix[self.len()]
    }

    /// Gets the number of bases strictly before `column`.
    ///
    /// Returns [`None`] if `column` is past the end of the columns.
    pub fn bases_before(&self, column: usize) -> Option<Number> {
        self.prefix.get(column).copied()
    }

    /// Maps an ungapped offset to the column holding that base.
    ///
    /// This is the column whose prefix count first reaches `offset + 1`.
    /// Returns [`None`] if the offset is past the last base.
    ///
    /// # Examples
    ///
    /// ```
    /// use mafkit::alignment::block::Columns;
    ///
    /// let columns = Columns::new("AC--GT");
    /// assert_eq!(columns.genomic_to_column(0), Some(0));
    /// assert_eq!(columns.genomic_to_column(2), Some(4));
    /// assert_eq!(columns.genomic_to_column(4), None);
    /// ```
    pub fn genomic_to_column(&self, offset: Number) -> Option<usize> {
        if offset >= self.bases() {
            return None;
        }

        // The first index where the prefix count exceeds `offset` is one past
        // the column that holds the base.
        Some(self.prefix.partition_point(|&count| count <= offset) - 1)
    }

    /// Maps a column to the ungapped offset of the base it holds.
    ///
    /// Returns [`None`] for gap columns and columns past the end.
    ///
    /// # Examples
    ///
    /// ```
    /// use mafkit::alignment::block::Columns;
    ///
    /// let columns = Columns::new("AC--GT");
    /// assert_eq!(columns.column_to_genomic(1), Some(1));
    /// assert_eq!(columns.column_to_genomic(2), None);
    /// assert_eq!(columns.column_to_genomic(5), Some(3));
    /// ```
    pub fn column_to_genomic(&self, column: usize) -> Option<Number> {
        let before = *self.prefix.get(column)?;
        let after = *self.prefix.get(column + 1)?;

        (after > before).then_some(before)
    }

    /// Maps a half-open range of ungapped offsets to the half-open range of
    /// columns spanning exactly those bases.
    ///
    /// The range starts at the column of the first base and ends just after
    /// the column of the last base, so gap columns at either edge are not
    /// included. Returns [`None`] if the range is empty or extends past the
    /// last base.
    ///
    /// # Examples
    ///
    /// ```
    /// use mafkit::alignment::block::Columns;
    ///
    /// let columns = Columns::new("AC--GT");
    /// assert_eq!(columns.columns_for(1..3), Some(1..5));
    /// assert_eq!(columns.columns_for(0..4), Some(0..6));
    /// assert_eq!(columns.columns_for(2..2), None);
    /// ```
    pub fn columns_for(&self, offsets: Range<Number>) -> Option<Range<usize>> {
        if offsets.start >= offsets.end {
            return None;
        }

        let start = self.genomic_to_column(offsets.start)?;
        let end = self.genomic_to_column(offsets.end - 1)? + 1;

        Some(start..end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_counts() {
        let columns = Columns::new("-A-CG--");
        assert_eq!(columns.len(), 7);
        assert_eq!(columns.bases(), 3);
        assert_eq!(columns.bases_before(0), Some(0));
        assert_eq!(columns.bases_before(2), Some(1));
        assert_eq!(columns.bases_before(7), Some(3));
        assert_eq!(columns.bases_before(8), None);
    }

    #[test]
    fn leading_gaps_are_skipped() {
        let columns = Columns::new("--AC");
        assert_eq!(columns.genomic_to_column(0), Some(2));
        assert_eq!(columns.genomic_to_column(1), Some(3));
        assert_eq!(columns.columns_for(0..2), Some(2..4));
    }

    #[test]
    fn all_gaps() {
        let columns = Columns::new("----");
        assert_eq!(columns.bases(), 0);
        assert_eq!(columns.genomic_to_column(0), None);
        assert_eq!(columns.columns_for(0..1), None);
        assert!((0..4).all(|c| columns.column_to_genomic(c).is_none()));
    }

    #[test]
    fn round_trip_over_bases() {
        let text = "A--CG-T---AC-";
        let columns = Columns::new(text);

        for (column, c) in text.bytes().enumerate() {
            match columns.column_to_genomic(column) {
                Some(offset) => {
                    assert!(!is_gap(c));
                    assert_eq!(columns.genomic_to_column(offset), Some(column));
                }
                None => assert!(is_gap(c)),
            }
        }

        for offset in 0..columns.bases() {
            let column = columns.genomic_to_column(offset).unwrap();
            assert_eq!(columns.column_to_genomic(column), Some(offset));
        }
    }

    #[test]
    fn ranges_past_the_end() {
        let columns = Columns::new("AC-G");
        assert_eq!(columns.columns_for(0..3), Some(0..4));
        assert_eq!(columns.columns_for(2..4), None);
    }
}
