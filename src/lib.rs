//! `mafkit` is a crate for intersecting multiple alignment format (MAF) files
//! with genomic regions and for flattening alignments into FASTA.
//!
//! The crate provides three main points of entry:
//!
//! - Parsing and reading MAF files directly.
//! - Slicing alignment blocks down to the regions within a BED file.
//! - Converting alignments to (and concatenating) aligned FASTA files.
//!
//! ## Parsing and reading MAF files
//!
//! The [`Reader`] facility reads a MAF file line by line. Most users will want
//! to read the parsed [alignment blocks](crate::alignment::Block) using
//! [`Reader::blocks()`](crate::Reader::blocks()). Each block holds the
//! attributes of its `a` line and a non-empty list of
//! [rows](crate::alignment::Row), the first of which is, by convention, the
//! reference row.
//!
//! Positions within a row are given in the direction of the row's strand: for
//! a row on the negative strand, MAF counts from the end of the source
//! sequence. The [`intersect::coordinates`] module converts between these
//! positions and forward-strand positions.
//!
//! ```
//! let data = b"##maf version=1\na score=0\ns A.chr1 0 4 + 10 AC-GT\ns B.chr1 2 5 - 9 ACCGT\n";
//! let mut reader = mafkit::Reader::new(&data[..]);
//!
//! for result in reader.blocks() {
//!     let block = result?;
//!     println!("{} columns", block.len());
//!
//!     for row in block.rows().iter() {
//!         println!("{} {} {}", row.name(), row.start(), row.strand());
//!     }
//! }
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Intersecting with regions
//!
//! An [`intersect::Intersector`] is built from a BED file with
//! [`intersect::Builder`]. The regions are merged up front, and every block
//! whose reference row overlaps a region is sliced down to the overlapping
//! alignment columns. Blocks that no region touches are written unchanged by
//! default (see [`intersect::Unmatched`]).
//!
//! ```
//! use mafkit::bed;
//! use mafkit::intersect::Builder;
//! use mafkit::writer::Writer;
//!
//! let regions = b"A.chr1\t1\t3\n";
//! let intersector = Builder::default()
//!     .reference("A")?
//!     .try_build_from(bed::Reader::new(&regions[..]))?;
//!
//! let data = b"a\ns A.chr1 0 4 + 10 AC-GT\ns B.chr1 2 5 - 9 ACCGT\n";
//! let mut reader = mafkit::Reader::new(&data[..]);
//! let mut writer = Writer::new(Vec::new());
//! intersector.run(&mut reader, &mut writer)?;
//!
//! assert_eq!(
//!     String::from_utf8(writer.into_inner())?,
//!     "##maf version=1\na\ns A.chr1 1 2 + 10 C-G\ns B.chr1 3 3 - 9 CCG\n\n"
//! );
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## FASTA
//!
//! [`convert::maf_to_fasta()`] flattens blocks into one aligned record per
//! sample, and [`fasta::concat::Concatenator`] joins aligned FASTA files
//! sample by sample.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![warn(missing_debug_implementations)]
#![warn(clippy::missing_docs_in_private_items)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod alignment;
pub mod bed;
pub mod convert;
pub mod fasta;
pub mod file;
pub mod intersect;
pub mod interval;
pub mod line;
pub mod reader;
pub mod writer;

pub use line::Line;

pub use self::reader::Reader;
