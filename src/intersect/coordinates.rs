//! Conversions between forward-strand coordinates and row-local offsets.
//!
//! A row's _forward span_ is the half-open range of forward-strand positions
//! its bases cover. A _row-local offset_ counts bases from the first base of
//! the row's aligned text, in the direction of the row's strand.
//!
//! MAF stores negative-stranded rows against the reverse complement of the
//! source sequence. For a row with start `s`, size `n`, and source size `S`,
//! the forward span is therefore `[S - s - n, S - s)` and the first base of
//! the aligned text sits at the _high_ end of that span.
//!
//! ```text
//! forward  | 0 | 1 | 2 | 3 | 4 | 5 | 6 | 7 | 8 | 9 |
//!                      |<------ row ------>|
//! + local  |           | 0 | 1 | 2 | 3 | 4 |
//! - local  |           | 4 | 3 | 2 | 1 | 0 |
//! ```

use std::ops::Range;

use omics::coordinate::Strand;
use omics::coordinate::position::Number;

use crate::alignment::Row;

/// Gets the forward-strand span of a row's bases.
///
/// # Examples
///
/// ```
/// use mafkit::alignment::Row;
/// use mafkit::intersect::coordinates::forward_span;
///
/// let row = "s A.chr1 3 5 + 10 ACGTA".parse::<Row>()?;
/// assert_eq!(forward_span(&row), 3..8);
///
/// let row = "s A.chr1 3 5 - 10 ACGTA".parse::<Row>()?;
/// assert_eq!(forward_span(&row), 2..7);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn forward_span(row: &Row) -> Range<Number> {
    match row.strand() {
        Strand::Positive => row.start()..row.end(),
        Strand::Negative => (row.source_size() - row.end())..(row.source_size() - row.start()),
    }
}

/// Converts a forward-strand range into row-local offsets.
///
/// The range must lie within the [`forward_span()`] of the row.
///
/// # Examples
///
/// ```
/// use mafkit::alignment::Row;
/// use mafkit::intersect::coordinates::to_row_local;
///
/// let row = "s A.chr1 3 5 + 10 ACGTA".parse::<Row>()?;
/// assert_eq!(to_row_local(&row, 4..6), 1..3);
///
/// // The same forward range is mirrored on the negative strand.
/// let row = "s A.chr1 3 5 - 10 ACGTA".parse::<Row>()?;
/// assert_eq!(to_row_local(&row, 3..5), 2..4);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn to_row_local(row: &Row, forward: Range<Number>) -> Range<Number> {
    match row.strand() {
        Strand::Positive => (forward.start - row.start())..(forward.end - row.start()),
        Strand::Negative => {
            let high = row.source_size() - row.start();
            (high - forward.end)..(high - forward.start)
        }
    }
}

/// Converts row-local offsets back into a forward-strand range.
///
/// This is the inverse of [`to_row_local()`].
pub fn to_forward(row: &Row, local: Range<Number>) -> Range<Number> {
    match row.strand() {
        Strand::Positive => (row.start() + local.start)..(row.start() + local.end),
        Strand::Negative => {
            let high = row.source_size() - row.start();
            (high - local.end)..(high - local.start)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions_are_inverses() -> Result<(), Box<dyn std::error::Error>> {
        for line in ["s A.chr1 20 10 + 100 ACGTACGTAC", "s A.chr1 20 10 - 100 ACGTACGTAC"] {
            let row = line.parse::<Row>()?;
            let span = forward_span(&row);

            for start in span.clone() {
                for end in (start + 1)..=span.end {
                    let local = to_row_local(&row, start..end);
                    assert!(local.end <= row.size());
                    assert_eq!(local.end - local.start, end - start);
                    assert_eq!(to_forward(&row, local), start..end);
                }
            }
        }

        Ok(())
    }

    #[test]
    fn full_span_maps_to_all_bases() -> Result<(), Box<dyn std::error::Error>> {
        let row = "s A.chr1 2 4 - 10 AC-GT".parse::<Row>()?;
        assert_eq!(forward_span(&row), 4..8);
        assert_eq!(to_row_local(&row, 4..8), 0..4);

        // The lowest forward position is the last base of the aligned text.
        assert_eq!(to_row_local(&row, 4..5), 3..4);

        Ok(())
    }
}
