//! # Multi-frame driver
//!
//! Hall2De "movie" files concatenate one frame per saved time step. [`TecplotFrames`] walks
//! such a stream: it parses the first frame at offset `0`, then keeps resuming at the
//! [`FrameCursor`] of the previous frame until the cursor reports
//! [`FrameCursor::End`](crate::reader::FrameCursor::End).
//!
//! The iterator yields `Result`s and is fused after the first error: the cursor of a frame
//! that failed to parse is undefined, so no later frame can be located.
//!
//! ```rust,no_run
//! use camino::Utf8Path;
//! use hallplot::frames::TecplotFrames;
//! use hallplot::reader::ReadOptions;
//!
//! let frames = TecplotFrames::open(Utf8Path::new("hall2de_movie.dat"), ReadOptions::default())?;
//! for frame in frames {
//!     let frame = frame?;
//!     println!("{} cells", frame.num_cells());
//! }
//! # Ok::<(), hallplot::tecplot_errors::TecplotError>(())
//! ```
//!
//! [`FrameCursor`]: crate::reader::FrameCursor
use std::fs::File;
use std::io::{BufRead, BufReader, Seek};
use std::iter::FusedIterator;

use camino::Utf8Path;
use log::debug;

use crate::reader::{read_frame, ReadOptions, TecplotFrame};
use crate::tecplot_errors::TecplotError;

/// Iterator over the frames of a Tecplot stream.
#[derive(Debug)]
pub struct TecplotFrames<R> {
    stream: R,
    options: ReadOptions,
    next_offset: Option<u64>,
    index: usize,
}

impl<R: BufRead + Seek> TecplotFrames<R> {
    /// Iterate over the frames of `stream`, starting at its first byte.
    pub fn new(stream: R, options: ReadOptions) -> Self {
        TecplotFrames {
            stream,
            options,
            next_offset: Some(0),
            index: 0,
        }
    }

    /// Number of frames successfully parsed so far.
    pub fn frame_index(&self) -> usize {
        self.index
    }

    pub fn into_inner(self) -> R {
        self.stream
    }
}

impl TecplotFrames<BufReader<File>> {
    /// Open `path` and iterate over its frames.
    ///
    /// Return
    /// ----------
    /// * The iterator, or [`TecplotError::IoError`] if the file cannot be opened.
    pub fn open(path: &Utf8Path, options: ReadOptions) -> Result<Self, TecplotError> {
        let file = File::open(path)?;
        debug!("Reading Tecplot frames from {path}");
        Ok(TecplotFrames::new(BufReader::new(file), options))
    }
}

impl<R: BufRead + Seek> Iterator for TecplotFrames<R> {
    type Item = Result<TecplotFrame, TecplotError>;

    fn next(&mut self) -> Option<Self::Item> {
        let offset = self.next_offset.take()?;
        let frame = match read_frame(&mut self.stream, offset, &self.options) {
            Ok(frame) => frame,
            Err(err) => {
                debug!("Frame {} at offset {offset} failed: {err}", self.index);
                return Some(Err(err));
            }
        };

        debug!(
            "Frame {} at offset {offset}: {} nodes, {} cells",
            self.index,
            frame.num_nodes(),
            frame.num_cells()
        );
        self.index += 1;
        self.next_offset = frame.cursor.next_offset();
        Some(Ok(frame))
    }
}

impl<R: BufRead + Seek> FusedIterator for TecplotFrames<R> {}

/// Parse every frame of the file at `path`.
///
/// Stops at the first error and returns it.
pub fn read_all_frames(
    path: &Utf8Path,
    options: ReadOptions,
) -> Result<Vec<TecplotFrame>, TecplotError> {
    TecplotFrames::open(path, options)?.collect()
}
