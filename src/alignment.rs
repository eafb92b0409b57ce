//! Alignment blocks within a MAF file.

use omics::coordinate::position::Number;

pub mod block;

pub use block::Block;
pub use block::Row;

/// The character used to denote a gap within an aligned sequence.
pub const GAP: u8 = b'-';

/// Returns whether the aligned character is a gap.
pub fn is_gap(c: u8) -> bool {
    c == GAP
}

/// Counts the number of non-gap characters (bases) in an aligned sequence.
///
/// # Examples
///
/// ```
/// use mafkit::alignment::count_bases;
///
/// assert_eq!(count_bases(b"AC--GT"), 4);
/// assert_eq!(count_bases(b"----"), 0);
/// ```
pub fn count_bases(text: &[u8]) -> Number {
    text.iter().filter(|c| !is_gap(**c)).count() as Number
}
