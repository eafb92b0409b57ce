//! An iterator over the [alignment blocks](crate::alignment::Block) in a MAF
//! file.

use std::io::BufRead;

use crate::Line;
use crate::Reader;
use crate::alignment::Block;
use crate::alignment::block::Builder;
use crate::alignment::block::builder;
use crate::reader;

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error related to the parsing of an alignment block.
#[derive(Debug)]
pub enum ParseError {
    /// A sequence row was found in between alignment blocks.
    RowBetweenBlocks(usize),

    /// An `i`, `e`, or `q` line was found in between alignment blocks.
    AuxiliaryBetweenBlocks(usize),

    /// A `##maf` header line was found within an alignment block.
    HeaderInBlock(usize),

    /// There was an issue reading from the underlying reader.
    Reader(usize, reader::Error),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::RowBetweenBlocks(line_no) => {
                write!(f, "found sequence row outside of an alignment block: line {line_no}")
            }
            ParseError::AuxiliaryBetweenBlocks(line_no) => {
                write!(
                    f,
                    "found annotation line outside of an alignment block: line {line_no}"
                )
            }
            ParseError::HeaderInBlock(line_no) => {
                write!(f, "found header in alignment block: line {line_no}")
            }
            ParseError::Reader(line_no, err) => write!(f, "reader error at line {line_no}: {err}"),
        }
    }
}

impl std::error::Error for ParseError {}

/// An error related to [`Blocks`].
#[derive(Debug)]
pub enum Error {
    /// A builder error for the numbered (one-based) block.
    Builder(usize, builder::Error),

    /// A parse error.
    Parse(ParseError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Builder(block_no, err) => write!(f, "invalid block #{block_no}: {err}"),
            Error::Parse(err) => write!(f, "parse error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////
// Blocks
////////////////////////////////////////////////////////////////////////////////////////

/// The state of the iterator.
#[derive(Debug)]
enum State {
    /// The reader is in-between alignment blocks.
    InBetweenBlocks,

    /// The reader is in the middle of an alignment block.
    ReadingBlock,
}

/// An iterator that traverses the alignment blocks while keeping track of the
/// current state of the reader.
///
/// A block is closed by a blank line, by the `a` line of the next block, or
/// by the end of the file.
#[derive(Debug)]
pub struct Blocks<'a, T>
where
    T: BufRead,
{
    /// The inner reader.
    reader: &'a mut Reader<T>,

    /// The state of the iterator.
    state: State,

    /// The block currently being read.
    builder: Option<Builder>,

    /// The line number.
    line_no: usize,

    /// The number of blocks opened so far.
    block_no: usize,

    /// The line buffer.
    buffer: String,
}

impl<'a, T> Blocks<'a, T>
where
    T: BufRead,
{
    /// Creates a new [`Blocks`].
    pub(crate) fn new(reader: &'a mut Reader<T>) -> Self {
        Self {
            reader,
            state: State::InBetweenBlocks,
            builder: None,
            line_no: 0usize,
            block_no: 0usize,
            buffer: String::new(),
        }
    }

    /// Closes the block currently being read, if there is one.
    fn finish_block(&mut self) -> Option<Result<Block>> {
        let block_no = self.block_no;
        let builder = self.builder.take()?;

        Some(
            builder
                .try_build()
                .map_err(|err| Error::Builder(block_no, err)),
        )
    }
}

impl<T> Iterator for Blocks<'_, T>
where
    T: BufRead,
{
    type Item = Result<Block>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            // (1) Reads the current line and returns an error if a parsing
            // error occurs within the reader.
            let line = match self.reader.read_line(&mut self.buffer) {
                Ok(l) => l,
                Err(err) => {
                    return Some(Err(Error::Parse(ParseError::Reader(
                        self.line_no + 1,
                        err,
                    ))));
                }
            };

            self.line_no += 1;

            // (2) If the file has ended, whatever block is open is complete.
            let line = match line {
                Some(l) => l,
                None => return self.finish_block(),
            };

            // (3) Gets the current state and errors out if we encounter a parse error.
            self.state = match get_state(&self.state, &line, self.line_no) {
                Ok(s) => s,
                Err(err) => return Some(Err(err)),
            };

            // (4) Performs the associated action for the line.
            match line {
                Line::Empty => {
                    if let Some(result) = self.finish_block() {
                        return Some(result);
                    }
                }
                Line::Block(attributes) => {
                    let finished = self.finish_block();
                    self.block_no += 1;

                    // SAFETY: the builder is freshly created, so setting the
                    // attributes for the first time will never error.
                    self.builder = Some(Builder::default().attributes(attributes).unwrap());

                    if let Some(result) = finished {
                        return Some(result);
                    }
                }
                Line::Row(row) => {
                    // The `get_state()` method only permits rows within a
                    // block, so the builder is always present here.
                    self.builder = self.builder.take().map(|builder| builder.push_row(row));
                }
                Line::Auxiliary(line) => {
                    // As with rows, `get_state()` only permits these within a
                    // block.
                    self.builder = self
                        .builder
                        .take()
                        .map(|builder| builder.push_annotation(line));
                }
                Line::Header(_) | Line::Comment(_) => {}
            }
        }
    }
}

/// Gets the current state given the previous state and the line that was just
/// read in from the [`Reader`].
fn get_state(last: &State, line: &Line, line_no: usize) -> Result<State> {
    match (last, line) {
        (State::InBetweenBlocks, Line::Empty | Line::Header(_) | Line::Comment(_)) => {
            Ok(State::InBetweenBlocks)
        }
        (_, Line::Block(_)) => Ok(State::ReadingBlock),
        (State::InBetweenBlocks, Line::Row(_)) => {
            Err(Error::Parse(ParseError::RowBetweenBlocks(line_no)))
        }
        (State::InBetweenBlocks, Line::Auxiliary(_)) => {
            Err(Error::Parse(ParseError::AuxiliaryBetweenBlocks(line_no)))
        }
        (State::ReadingBlock, Line::Empty) => Ok(State::InBetweenBlocks),
        (State::ReadingBlock, Line::Header(_)) => {
            Err(Error::Parse(ParseError::HeaderInBlock(line_no)))
        }
        (State::ReadingBlock, Line::Comment(_) | Line::Row(_) | Line::Auxiliary(_)) => {
            Ok(State::ReadingBlock)
        }
    }
}
