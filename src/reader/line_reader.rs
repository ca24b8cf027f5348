//! Line iteration with byte-offset and line-number bookkeeping.
//!
//! The frame reader needs to know where every line ends (to report the next frame's
//! offset and to come back to the start of the cell-centered data) and which line an error
//! occurred on. [`LineReader`] wraps the caller's stream and tracks both.

use std::io::{BufRead, Seek, SeekFrom};

use crate::tecplot_errors::TecplotError;

/// Position in the stream that the reader can come back to.
///
/// `line` is the number of lines consumed since the frame started, so the next line read
/// after a [`LineReader::rewind`] is numbered `line + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Checkpoint {
    pub offset: u64,
    pub line: usize,
}

pub(crate) struct LineReader<'a, R> {
    inner: &'a mut R,
    buf: String,
    offset: u64,
    line: usize,
}

impl<'a, R: BufRead + Seek> LineReader<'a, R> {
    /// Position `inner` at byte `offset` and start counting lines from there.
    pub(crate) fn at(inner: &'a mut R, offset: u64) -> Result<Self, TecplotError> {
        inner.seek(SeekFrom::Start(offset))?;
        Ok(LineReader {
            inner,
            buf: String::new(),
            offset,
            line: 0,
        })
    }

    /// Read the next line, without its line terminator.
    ///
    /// Returns the 1-based line number together with the text, or `None` at end of stream.
    pub(crate) fn next_line(&mut self) -> Result<Option<(usize, &str)>, TecplotError> {
        self.buf.clear();
        let read = self.inner.read_line(&mut self.buf)?;
        if read == 0 {
            return Ok(None);
        }
        self.offset += read as u64;
        self.line += 1;
        Ok(Some((self.line, self.buf.trim_end_matches(['\n', '\r']))))
    }

    /// Number of lines consumed so far.
    pub(crate) fn line_number(&self) -> usize {
        self.line
    }

    /// Byte offset just after the last line read.
    pub(crate) fn offset(&self) -> u64 {
        self.offset
    }

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            offset: self.offset,
            line: self.line,
        }
    }

    pub(crate) fn rewind(&mut self, checkpoint: Checkpoint) -> Result<(), TecplotError> {
        self.inner.seek(SeekFrom::Start(checkpoint.offset))?;
        self.offset = checkpoint.offset;
        self.line = checkpoint.line;
        Ok(())
    }
}
