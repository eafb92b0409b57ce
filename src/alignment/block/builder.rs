//! A builder for an alignment block.

use nonempty::NonEmpty;

use crate::alignment::Block;
use crate::alignment::block::Row;

/// An error that occurs when a required field was never provided to the
/// [`Builder`].
#[derive(Debug)]
pub enum MissingError {
    /// No attributes (`a` line) were provided to the [`Builder`].
    Attributes,

    /// No rows were provided to the [`Builder`].
    Rows,
}

impl std::fmt::Display for MissingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingError::Attributes => write!(f, "attributes"),
            MissingError::Rows => write!(f, "rows"),
        }
    }
}

impl std::error::Error for MissingError {}

/// An error that occurs when a singular field was provided multiple times to
/// the [`Builder`].
#[derive(Debug)]
pub enum MultipleError {
    /// The attributes field was provided multiple times to the [`Builder`].
    Attributes,
}

impl std::fmt::Display for MultipleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MultipleError::Attributes => write!(f, "attributes"),
        }
    }
}

impl std::error::Error for MultipleError {}

/// An error related to a [`Builder`].
#[derive(Debug)]
pub enum Error {
    /// An error where a required field was never provided to the [`Builder`].
    Missing(MissingError),

    /// An error where a singular field was provided to the [`Builder`] more
    /// than once.
    Multiple(MultipleError),

    /// A row spans a different number of alignment columns than the first row.
    MismatchedLength(String, usize, usize),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Missing(err) => write!(f, "missing required field: {err}"),
            Error::Multiple(err) => write!(f, "singular field set multiple times: {err}"),
            Error::MismatchedLength(name, expected, found) => write!(
                f,
                "row `{name}` spans {found} alignment columns, but the block spans {expected}"
            ),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// A builder for a [`Block`].
#[derive(Debug, Default)]
pub struct Builder {
    /// The attributes from the `a` line.
    attributes: Option<String>,

    /// The rows.
    rows: Option<NonEmpty<Row>>,

    /// The `i`, `e` and `q` lines, each with the number of rows before it.
    annotations: Vec<(usize, String)>,
}

impl Builder {
    /// Sets the attributes for the [`Builder`].
    ///
    /// # Examples
    ///
    /// ```
    /// use mafkit::alignment::block::Builder;
    ///
    /// let builder = Builder::default().attributes("score=0.0")?;
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn attributes(mut self, attributes: impl Into<String>) -> Result<Self> {
        if self.attributes.is_some() {
            return Err(Error::Multiple(MultipleError::Attributes));
        }

        self.attributes = Some(attributes.into());
        Ok(self)
    }

    /// Pushes a [`Row`] into the [`Builder`].
    ///
    /// # Examples
    ///
    /// ```
    /// use mafkit::alignment::Row;
    /// use mafkit::alignment::block::Builder;
    ///
    /// let row = "s A.chr1 0 4 + 10 ACGT".parse::<Row>()?;
    /// let builder = Builder::default().push_row(row);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn push_row(mut self, row: Row) -> Self {
        let rows = match self.rows {
            Some(mut rows) => {
                rows.push(row);
                rows
            }
            None => NonEmpty::new(row),
        };

        self.rows = Some(rows);
        self
    }

    /// Pushes an `i`, `e` or `q` line into the [`Builder`].
    ///
    /// The line is kept after the rows pushed so far.
    pub fn push_annotation(mut self, line: impl Into<String>) -> Self {
        let before = self.rows.as_ref().map(|rows| rows.len()).unwrap_or_default();
        self.annotations.push((before, line.into()));
        self
    }

    /// Consumes `self` to attempt to build a [`Block`].
    ///
    /// # Examples
    ///
    /// ```
    /// use mafkit::alignment::block::Builder;
    ///
    /// let block = Builder::default()
    ///     .attributes("score=0.0")?
    ///     .push_row("s A.chr1 0 4 + 10 ACGT".parse()?)
    ///     .push_row("s B.chr1 0 3 - 10 AC-T".parse()?)
    ///     .try_build()?;
    ///
    /// assert_eq!(block.attributes(), "score=0.0");
    /// assert_eq!(block.rows().len(), 2);
    /// assert_eq!(block.len(), 4);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_build(self) -> Result<Block> {
        let attributes = self
            .attributes
            .ok_or(Error::Missing(MissingError::Attributes))?;

        let rows = self.rows.ok_or(Error::Missing(MissingError::Rows))?;

        let expected = rows.first().len();
        if let Some(row) = rows.iter().find(|row| row.len() != expected) {
            return Err(Error::MismatchedLength(
                row.name().to_string(),
                expected,
                row.len(),
            ));
        }

        Ok(Block {
            attributes,
            rows,
            annotations: self.annotations,
        })
    }
}
