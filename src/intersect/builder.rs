//! A builder for an [`Intersector`].

use std::io::BufRead;

use omics::coordinate::position::Number;

use crate::bed;
use crate::intersect::Intersector;
use crate::intersect::Unmatched;
use crate::interval::Set;

/// The default minimum number of reference bases in an emitted block.
pub const DEFAULT_MIN_OVERLAP: Number = 1;

/// An error that occurs when a required field was never provided to the
/// [`Builder`].
#[derive(Debug)]
pub enum MissingError {
    /// No reference sample was provided to the [`Builder`].
    Reference,
}

impl std::fmt::Display for MissingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingError::Reference => write!(f, "reference"),
        }
    }
}

impl std::error::Error for MissingError {}

/// An error that occurs when a singular field was provided multiple times to
/// the [`Builder`].
#[derive(Debug)]
pub enum MultipleError {
    /// The reference sample was provided multiple times to the [`Builder`].
    Reference,
}

impl std::fmt::Display for MultipleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MultipleError::Reference => write!(f, "reference"),
        }
    }
}

impl std::error::Error for MultipleError {}

/// An error related to building an [`Intersector`].
#[derive(Debug)]
pub enum Error {
    /// An error where a required field was never provided to the [`Builder`].
    Missing(MissingError),

    /// An error where a singular field was provided to the [`Builder`] more
    /// than once.
    Multiple(MultipleError),

    /// The reference sample name is empty.
    EmptyReference,

    /// An error reading the regions from a BED file.
    Bed(bed::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Missing(err) => write!(f, "missing required field: {err}"),
            Error::Multiple(err) => write!(f, "singular field set multiple times: {err}"),
            Error::EmptyReference => write!(f, "the reference sample name cannot be empty"),
            Error::Bed(err) => write!(f, "invalid bed file: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// A builder for an [`Intersector`].
#[derive(Debug, Default)]
pub struct Builder {
    /// The reference sample name.
    reference: Option<String>,

    /// The minimum number of reference bases in an emitted block.
    min_overlap: Option<Number>,

    /// What to do with blocks that no region touches.
    unmatched: Unmatched,
}

impl Builder {
    /// Sets the reference sample name.
    ///
    /// # Examples
    ///
    /// ```
    /// use mafkit::intersect::Builder;
    ///
    /// let builder = Builder::default().reference("hg38")?;
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn reference(mut self, reference: impl Into<String>) -> Result<Self> {
        if self.reference.is_some() {
            return Err(Error::Multiple(MultipleError::Reference));
        }

        let reference = reference.into();
        if reference.is_empty() {
            return Err(Error::EmptyReference);
        }

        self.reference = Some(reference);
        Ok(self)
    }

    /// Sets the minimum number of reference bases an emitted block must hold.
    pub fn min_overlap(mut self, min_overlap: Number) -> Self {
        self.min_overlap = Some(min_overlap);
        self
    }

    /// Sets the policy for blocks that no region touches.
    pub fn unmatched(mut self, unmatched: Unmatched) -> Self {
        self.unmatched = unmatched;
        self
    }

    /// Consumes `self` to attempt to build an [`Intersector`] over an
    /// existing set of regions.
    pub fn try_build(self, regions: Set) -> Result<Intersector> {
        let reference = self
            .reference
            .ok_or(Error::Missing(MissingError::Reference))?;

        Ok(Intersector {
            reference,
            regions,
            min_overlap: self.min_overlap.unwrap_or(DEFAULT_MIN_OVERLAP),
            unmatched: self.unmatched,
        })
    }

    /// Consumes `self` to attempt to build an [`Intersector`] from the
    /// regions within a BED file.
    ///
    /// The regions are merged before they are used.
    ///
    /// # Examples
    ///
    /// ```
    /// use mafkit::bed;
    /// use mafkit::intersect::Builder;
    ///
    /// let data = b"chr1\t0\t10\nchr1\t5\t20\n";
    /// let intersector = Builder::default()
    ///     .reference("A")?
    ///     .min_overlap(5)
    ///     .try_build_from(bed::Reader::new(&data[..]))?;
    ///
    /// assert_eq!(intersector.reference(), "A");
    /// assert_eq!(intersector.min_overlap(), 5);
    /// assert_eq!(intersector.regions().len(), 1);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_build_from<T>(self, mut reader: bed::Reader<T>) -> Result<Intersector>
    where
        T: BufRead,
    {
        let intervals = reader.intervals().map_err(Error::Bed)?;
        self.try_build(Set::merge(intervals))
    }
}
