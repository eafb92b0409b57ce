//! Intersection of MAF alignment blocks with genomic regions.
//!
//! For every block, the forward-strand span of the reference row is compared
//! against a merged [`Set`] of regions. Each region that overlaps the span is
//! clipped to it, mapped onto the alignment columns of the reference row, and
//! used to slice the whole block. Sliced blocks with fewer reference bases
//! than the configured minimum are discarded.
//!
//! ```text
//! region            |=========|
//! block      |------+---------+------|
//! output            |---------|
//! ```

use std::io::BufRead;
use std::io::Write;
use std::io::{self};

use omics::coordinate::position::Number;
use tracing::debug;
use tracing::trace;

use crate::Reader;
use crate::alignment::Block;
use crate::alignment::Row;
use crate::alignment::block::Columns;
use crate::alignment::block::blocks;
use crate::interval::Interval;
use crate::interval::Set;
use crate::writer::Writer;

pub mod builder;
pub mod coordinates;

pub use builder::Builder;

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error related to intersecting blocks with regions.
#[derive(Debug)]
pub enum Error {
    /// The first row of a block does not belong to the reference sample.
    ///
    /// The fields are the expected reference name, the (one-based) block
    /// number, and the name of the offending row.
    ReferenceMismatch(String, usize, String),

    /// An error reading the alignment blocks.
    Blocks(blocks::Error),

    /// An I/O error while writing blocks.
    Io(io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::ReferenceMismatch(reference, block_no, found) => write!(
                f,
                "maf file does not seem to use {reference} as a reference (block #{block_no} \
                 starts with `{found}`)"
            ),
            Error::Blocks(err) => write!(f, "{err}"),
            Error::Io(err) => write!(f, "i/o error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////
// Intersector
////////////////////////////////////////////////////////////////////////////////////////

/// What to do with a block that no region touches.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Unmatched {
    /// Write the block to the output unchanged, including its `i`, `e` and
    /// `q` lines.
    #[default]
    PassThrough,

    /// Leave the block out of the output.
    Drop,
}

/// The result of intersecting a single block.
#[derive(Debug, Eq, PartialEq)]
pub enum Intersection {
    /// No region overlaps or touches the reference span of the block.
    Unmatched,

    /// At least one region overlaps or touches the reference span.
    Hits {
        /// The sliced blocks, in ascending order of the regions.
        blocks: Vec<Block>,

        /// The number of regions that overlapped or touched the block.
        hits: usize,

        /// The number of regions that produced no block, either because the
        /// overlap was empty or because it was shorter than the minimum.
        discarded: usize,
    },
}

/// Counters for a single run of an [`Intersector`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Stats {
    /// The number of blocks read.
    pub blocks: usize,

    /// The number of unmatched blocks written unchanged.
    pub passed_through: usize,

    /// The number of unmatched blocks left out of the output.
    pub dropped_unmatched: usize,

    /// The number of region hits across all blocks.
    pub hits: usize,

    /// The number of sliced blocks written.
    pub emitted: usize,

    /// The number of hits that produced no block.
    pub discarded: usize,
}

impl std::fmt::Display for Stats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} blocks read, {} passed through, {} dropped as unmatched, {} hits, {} sub-blocks \
             emitted, {} hits discarded",
            self.blocks,
            self.passed_through,
            self.dropped_unmatched,
            self.hits,
            self.emitted,
            self.discarded
        )
    }
}

/// Slices alignment blocks down to a merged set of regions.
///
/// An [`Intersector`] is created with a [`Builder`].
#[derive(Debug)]
pub struct Intersector {
    /// The reference sample name.
    reference: String,

    /// The merged regions.
    regions: Set,

    /// The minimum number of reference bases in an emitted block.
    min_overlap: Number,

    /// What to do with blocks that no region touches.
    unmatched: Unmatched,
}

impl Intersector {
    /// Gets the reference sample name.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Gets the merged regions.
    pub fn regions(&self) -> &Set {
        &self.regions
    }

    /// Gets the minimum number of reference bases in an emitted block.
    pub fn min_overlap(&self) -> Number {
        self.min_overlap
    }

    /// Gets the policy for unmatched blocks.
    pub fn unmatched(&self) -> Unmatched {
        self.unmatched
    }

    /// Checks that the first row of a block belongs to the reference sample.
    ///
    /// A row matches when either its sample or its full source name equals the
    /// reference name.
    pub fn validate_reference<'a>(&self, block_no: usize, block: &'a Block) -> Result<&'a Row> {
        let row = block.reference();

        if row.sample() != self.reference && row.name() != self.reference {
            return Err(Error::ReferenceMismatch(
                self.reference.clone(),
                block_no,
                row.name().to_string(),
            ));
        }

        Ok(row)
    }

    /// Finds the name under which the regions for a row are stored.
    ///
    /// Regions may be named either by the full source name of the row (e.g.,
    /// `hg38.chr1`) or by its sequence part (e.g., `chr1`).
    fn region_sequence<'a>(&self, row: &'a Row) -> Option<&'a str> {
        [row.name(), row.sequence()]
            .into_iter()
            .find(|sequence| self.regions.contains_sequence(sequence))
    }

    /// Intersects a single block with the regions.
    ///
    /// # Examples
    ///
    /// ```
    /// use mafkit::bed;
    /// use mafkit::intersect::Builder;
    /// use mafkit::intersect::Intersection;
    ///
    /// let regions = b"A.chr1\t12\t14\n";
    /// let intersector = Builder::default()
    ///     .reference("A")?
    ///     .try_build_from(bed::Reader::new(&regions[..]))?;
    ///
    /// let data = b"a\ns A.chr1 10 6 + 100 AC--GTAA\ns B.chr1 0 8 + 50 ACTTGTAA\n";
    /// let mut reader = mafkit::Reader::new(&data[..]);
    /// let block = reader.blocks().next().unwrap()?;
    ///
    /// match intersector.intersect_block(1, &block)? {
    ///     Intersection::Hits { blocks, .. } => {
    ///         assert_eq!(blocks.len(), 1);
    ///         assert_eq!(blocks[0].reference().to_string(), "s A.chr1 12 2 + 100 GT");
    ///     }
    ///     Intersection::Unmatched => unreachable!(),
    /// }
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn intersect_block(&self, block_no: usize, block: &Block) -> Result<Intersection> {
        let reference = self.validate_reference(block_no, block)?;
        let span = coordinates::forward_span(reference);

        let hits = match self.region_sequence(reference) {
            Some(sequence) => self.regions.overlapping(sequence, span.start, span.end),
            None => Vec::new(),
        };

        if hits.is_empty() {
            trace!(
                "block #{block_no} ({}:{}-{}) is not touched by any region",
                reference.name(),
                span.start,
                span.end
            );
            return Ok(Intersection::Unmatched);
        }

        let columns = Columns::new(reference.text());
        let mut blocks = Vec::new();
        let mut discarded = 0usize;

        for hit in hits.iter() {
            match self.slice_to(block, reference, &columns, hit) {
                Some(sliced) => blocks.push(sliced),
                None => discarded += 1,
            }
        }

        debug!(
            "block #{block_no} ({}:{}-{}): {} hit(s), {} block(s) kept",
            reference.name(),
            span.start,
            span.end,
            hits.len(),
            blocks.len()
        );

        Ok(Intersection::Hits {
            blocks,
            hits: hits.len(),
            discarded,
        })
    }

    /// Slices a block to the portion covered by a single region.
    ///
    /// Returns [`None`] when the region does not share any bases with the
    /// reference row or when the result falls below the minimum overlap.
    fn slice_to(
        &self,
        block: &Block,
        reference: &Row,
        columns: &Columns,
        region: &Interval,
    ) -> Option<Block> {
        let span = coordinates::forward_span(reference);
        let overlap = Interval::try_new(region.sequence(), span.start, span.end)
            .ok()
            .and_then(|span| span.intersect(region));

        let overlap = match overlap {
            Some(overlap) => overlap,
            None => {
                trace!("region {region} only touches the block");
                return None;
            }
        };

        let local = coordinates::to_row_local(reference, overlap.start()..overlap.end());
        let sliced = block.slice(columns.columns_for(local)?)?;

        if sliced.reference().size() < self.min_overlap {
            trace!(
                "region {region} overlaps {} reference base(s), which is below the minimum \
                 of {}",
                sliced.reference().size(),
                self.min_overlap
            );
            return None;
        }

        Some(sliced)
    }

    /// Intersects every block in a MAF file with the regions and writes the
    /// results.
    ///
    /// The run stops at the first error.
    ///
    /// # Examples
    ///
    /// ```
    /// use mafkit::bed;
    /// use mafkit::intersect::Builder;
    /// use mafkit::writer::Writer;
    ///
    /// let regions = b"A.chr1\t2\t4\n";
    /// let intersector = Builder::default()
    ///     .reference("A")?
    ///     .try_build_from(bed::Reader::new(&regions[..]))?;
    ///
    /// let data = b"a score=1\ns A.chr1 0 6 + 10 ACGTAC\ns B.chr2 0 6 + 10 ACCTAC\n";
    /// let mut reader = mafkit::Reader::new(&data[..]);
    /// let mut writer = Writer::new(Vec::new());
    ///
    /// let stats = intersector.run(&mut reader, &mut writer)?;
    /// assert_eq!(stats.emitted, 1);
    /// assert_eq!(
    ///     String::from_utf8(writer.into_inner())?,
    ///     "##maf version=1\na score=1\ns A.chr1 2 2 + 10 GT\ns B.chr2 2 2 + 10 CT\n\n"
    /// );
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn run<R, W>(&self, reader: &mut Reader<R>, writer: &mut Writer<W>) -> Result<Stats>
    where
        R: BufRead,
        W: Write,
    {
        let mut stats = Stats::default();

        for (i, result) in reader.blocks().enumerate() {
            let block = result.map_err(Error::Blocks)?;
            let block_no = i + 1;
            stats.blocks += 1;

            match self.intersect_block(block_no, &block)? {
                Intersection::Unmatched => match self.unmatched {
                    Unmatched::PassThrough => {
                        writer.write_block(&block).map_err(Error::Io)?;
                        stats.passed_through += 1;
                    }
                    Unmatched::Drop => stats.dropped_unmatched += 1,
                },
                Intersection::Hits {
                    blocks,
                    hits,
                    discarded,
                } => {
                    stats.hits += hits;
                    stats.discarded += discarded;

                    for sliced in blocks {
                        writer.write_block(&sliced).map_err(Error::Io)?;
                        stats.emitted += 1;
                    }
                }
            }
        }

        writer.flush().map_err(Error::Io)?;

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intersector(regions: &[u8], min_overlap: Number) -> Intersector {
        Builder::default()
            .reference("A")
            .unwrap()
            .min_overlap(min_overlap)
            .try_build_from(crate::bed::Reader::new(regions))
            .unwrap()
    }

    fn parse_block(data: &[u8]) -> Block {
        let mut reader = Reader::new(data);
        reader.blocks().next().unwrap().unwrap()
    }

    fn sliced_blocks(intersection: Intersection) -> Vec<String> {
        match intersection {
            Intersection::Hits { blocks, .. } => blocks.iter().map(|b| b.to_string()).collect(),
            Intersection::Unmatched => panic!("expected hits"),
        }
    }

    #[test]
    fn reference_mismatch() {
        let intersector = intersector(b"chr1\t0\t10\n", 1);
        let block = parse_block(b"a\ns B.chr1 0 4 + 10 ACGT\ns A.chr1 0 4 + 10 ACGT\n");

        let err = intersector.intersect_block(3, &block).unwrap_err();
        assert_eq!(
            err.to_string(),
            "maf file does not seem to use A as a reference (block #3 starts with `B.chr1`)"
        );
    }

    #[test]
    fn regions_match_by_sequence_name() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let intersector = intersector(b"chr1\t1\t3\n", 1);
        let block = parse_block(b"a\ns A.chr1 0 4 + 10 ACGT\n");

        let blocks = sliced_blocks(intersector.intersect_block(1, &block)?);
        assert_eq!(blocks, vec!["a\ns A.chr1 1 2 + 10 CG\n"]);

        Ok(())
    }

    #[test]
    fn negative_strand_is_mirrored() -> std::result::Result<(), Box<dyn std::error::Error>> {
        // On the negative strand, the row covers forward positions 2..6 and
        // the first column holds forward position 5.
        let intersector = intersector(b"A.chr1\t4\t6\n", 1);
        let block = parse_block(b"a\ns A.chr1 4 4 - 10 ACGT\ns B.chr1 0 4 + 4 TTGG\n");

        let blocks = sliced_blocks(intersector.intersect_block(1, &block)?);
        assert_eq!(blocks, vec!["a\ns A.chr1 4 2 - 10 AC\ns B.chr1 0 2 + 4 TT\n"]);

        // The same forward region on a positive-stranded copy selects the
        // opposite end of the block.
        let block = parse_block(b"a\ns A.chr1 2 4 + 10 ACGT\ns B.chr1 0 4 + 4 TTGG\n");
        let blocks = sliced_blocks(intersector.intersect_block(1, &block)?);
        assert_eq!(blocks, vec!["a\ns A.chr1 4 2 + 10 GT\ns B.chr1 2 2 + 4 GG\n"]);

        Ok(())
    }

    #[test]
    fn gaps_at_region_edges_are_excluded() -> std::result::Result<(), Box<dyn std::error::Error>>
    {
        let intersector = intersector(b"A.chr1\t1\t3\n", 1);
        let block = parse_block(b"a\ns A.chr1 0 4 + 10 A-C-G-T\ns B.chr1 0 7 + 10 AXCYGZT\n");

        let blocks = sliced_blocks(intersector.intersect_block(1, &block)?);
        assert_eq!(blocks, vec!["a\ns A.chr1 1 2 + 10 C-G\ns B.chr1 2 3 + 10 CYG\n"]);

        Ok(())
    }

    #[test]
    fn touching_regions_suppress_pass_through() -> std::result::Result<(), Box<dyn std::error::Error>>
    {
        let intersector = intersector(b"A.chr1\t4\t8\n", 1);
        let block = parse_block(b"a\ns A.chr1 0 4 + 10 ACGT\n");

        assert_eq!(
            intersector.intersect_block(1, &block)?,
            Intersection::Hits {
                blocks: Vec::new(),
                hits: 1,
                discarded: 1
            }
        );

        Ok(())
    }

    #[test]
    fn minimum_overlap() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let block = parse_block(b"a\ns A.chr1 0 6 + 10 AC--GTAA\n");

        let blocks = sliced_blocks(intersector(b"A.chr1\t1\t4\n", 3).intersect_block(1, &block)?);
        assert_eq!(blocks, vec!["a\ns A.chr1 1 3 + 10 C--GT\n"]);

        let intersection = intersector(b"A.chr1\t1\t4\n", 4).intersect_block(1, &block)?;
        assert_eq!(
            intersection,
            Intersection::Hits {
                blocks: Vec::new(),
                hits: 1,
                discarded: 1
            }
        );

        Ok(())
    }

    #[test]
    fn unmatched_policy() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let data = b"a\ns A.chr1 0 4 + 10 ACGT\n\na\ns A.chr1 4 4 + 10 ACGT\n";

        let mut reader = Reader::new(&data[..]);
        let mut writer = Writer::new(Vec::new());
        let stats = intersector(b"A.chr1\t5\t6\n", 1).run(&mut reader, &mut writer)?;
        assert_eq!(stats.passed_through, 1);
        assert_eq!(stats.emitted, 1);
        assert_eq!(
            String::from_utf8(writer.into_inner())?,
            "##maf version=1\na\ns A.chr1 0 4 + 10 ACGT\n\na\ns A.chr1 5 1 + 10 C\n\n"
        );

        let intersector = Builder::default()
            .reference("A")?
            .unmatched(Unmatched::Drop)
            .try_build_from(crate::bed::Reader::new(&b"A.chr1\t5\t6\n"[..]))?;

        let mut reader = Reader::new(&data[..]);
        let mut writer = Writer::new(Vec::new());
        let stats = intersector.run(&mut reader, &mut writer)?;
        assert_eq!(stats.dropped_unmatched, 1);
        assert_eq!(
            String::from_utf8(writer.into_inner())?,
            "##maf version=1\na\ns A.chr1 5 1 + 10 C\n\n"
        );

        Ok(())
    }
}
