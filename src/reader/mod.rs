//! # Hall2De Tecplot frame reader
//!
//! Entry point of the parser: [`read_frame`] turns one frame of a Hall2De ASCII Tecplot file
//! into a [`TecplotFrame`] holding the nodal table, the cell table and the cursor of the
//! next frame.
//!
//! ## Layout of a frame
//! -----------------
//! ```text
//! TITLE = "Hall2De"                                   title, only read at offset 0
//! VARIABLES = "z(m)"                                  one quoted name per line
//! "r(m)"
//! "p"
//! ZONE N=4, E=1, VARLOCATION=([3-3]=CELLCENTERED)     node count, cell-centered range
//! 0.0                                                 N values per nodal variable
//! ...
//! 5.0                                                 one value per cell and cell variable
//! 1 2 3 4                                             one connectivity tuple per cell
//! TITLE = "t=2"                                       next frame, if any
//! ```
//!
//! The cell count is only known once the connectivity has been seen, but the
//! cell-centered values come before it. The reader therefore runs two passes over the
//! region that follows the nodal data:
//!
//! 1. [`connectivity`] scans ahead, collecting the tuples and locating the next `TITLE`,
//! 2. the reader rewinds to the checkpoint saved before the scan and [`section`] reads the
//!    cell-centered values with the now known cell count.
//!
//! ## Multi-frame files
//! -----------------
//! A movie file concatenates frames, each introduced by a `TITLE` line. The
//! [`FrameCursor`] of a frame is the byte offset just past the next `TITLE` line, or
//! [`FrameCursor::End`]. Feeding [`FrameCursor::next_offset`] back to [`read_frame`]
//! visits every frame once; [`crate::frames::TecplotFrames`] wraps that loop.
//!
//! ## Example
//! -----------------
//! ```rust
//! use std::io::Cursor;
//! use hallplot::reader::{read_frame, FrameCursor, ReadOptions};
//!
//! let text = "TITLE = \"demo\"\n\"z(m)\"\n\"r(m)\"\n\"p\"\n\
//!             ZONE N=4, VARLOCATION=([3-3]=CELLCENTERED)\n\
//!             0\n1\n1\n0\n0\n0\n1\n1\n5.0\n1 2 3 4\n";
//! let frame = read_frame(&mut Cursor::new(text), 0, &ReadOptions::default()).unwrap();
//!
//! assert_eq!(frame.num_cells(), 1);
//! assert_eq!(frame.cells.floats("p"), Some(&[5.0][..]));
//! assert_eq!(frame.cursor, FrameCursor::End);
//! ```
pub mod connectivity;
pub mod delimiters;
pub mod header;
pub(crate) mod line_reader;
pub mod options;
pub mod section;

use std::io::{BufRead, Seek};

use crate::constants::{Connectivity, END_OF_DATA};
use crate::geometry::build_cell_table;
use crate::interpolation::interpolate;
use crate::table::{ColumnRole, FieldTable};
use crate::tecplot_errors::TecplotError;

pub use header::{Header, ZoneInfo};
pub use options::{ReadOptions, ReadOptionsBuilder};

use connectivity::scan_connectivity;
use header::read_header;
use line_reader::LineReader;
use section::read_sections;

/// Where the next frame of the stream starts.
///
/// Variants
/// -----------------
/// * `Next(offset)` – Byte offset just past the `TITLE` line of the next frame.
/// * `End` – No frame follows. Its integer form is `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameCursor {
    Next(u64),
    End,
}

impl FrameCursor {
    /// Integer form of the cursor, `-1` meaning end of data.
    pub fn as_offset(self) -> i64 {
        match self {
            FrameCursor::Next(offset) => i64::try_from(offset).unwrap_or(i64::MAX),
            FrameCursor::End => END_OF_DATA,
        }
    }

    /// Inverse of [`FrameCursor::as_offset`]; any negative value is the end of data.
    pub fn from_offset(offset: i64) -> Self {
        u64::try_from(offset).map_or(FrameCursor::End, FrameCursor::Next)
    }

    pub fn is_end(self) -> bool {
        self == FrameCursor::End
    }

    pub fn next_offset(self) -> Option<u64> {
        match self {
            FrameCursor::Next(offset) => Some(offset),
            FrameCursor::End => None,
        }
    }
}

/// One parsed frame.
///
/// Fields
/// -----------------
/// * `variables` – Declared variable names, in header order.
/// * `zone` – Parsed `ZONE` line.
/// * `nodal` – One column per nodal variable, `N` rows.
/// * `cells` – `z(m), r(m), i0..i3` then the cell-centered variables, one row per cell.
/// * `connectivity` – Raw 1-based connectivity tuples.
/// * `cursor` – Position of the next frame.
#[derive(Debug, Clone, PartialEq)]
pub struct TecplotFrame {
    pub variables: Vec<String>,
    pub zone: ZoneInfo,
    pub nodal: FieldTable,
    pub cells: FieldTable,
    pub connectivity: Connectivity,
    pub cursor: FrameCursor,
}

impl TecplotFrame {
    /// Split the frame into its `(nodal, cells, cursor)` triple.
    pub fn into_parts(self) -> (FieldTable, FieldTable, FrameCursor) {
        (self.nodal, self.cells, self.cursor)
    }

    pub fn num_nodes(&self) -> usize {
        self.zone.node_count
    }

    pub fn num_cells(&self) -> usize {
        self.connectivity.len()
    }

    /// `true` if no frame follows this one.
    pub fn is_last(&self) -> bool {
        self.cursor.is_end()
    }

    /// Interpolated table of the frame, see [`crate::interpolation::interpolate`].
    pub fn interpolate(&self) -> Result<FieldTable, TecplotError> {
        interpolate(&self.nodal, &self.cells)
    }
}

/// Parse the frame starting at `resume_offset`.
///
/// Arguments
/// -----------------
/// * `stream` – Seekable text stream holding one or more frames.
/// * `resume_offset` – `0` for the first frame (its title line is consumed), otherwise the
///   [`FrameCursor::next_offset`] of the previous frame.
/// * `options` – Reader options, see [`ReadOptions`].
///
/// Return
/// ----------
/// * The parsed [`TecplotFrame`].
/// * A [`TecplotError`] on the first malformed line; format error line numbers count from
///   `resume_offset`. The stream position is unspecified afterwards.
///
/// See also
/// ----------
/// * [`crate::frames::TecplotFrames`] – iterator over every frame of a file.
pub fn read_frame<R: BufRead + Seek>(
    stream: &mut R,
    resume_offset: u64,
    options: &ReadOptions,
) -> Result<TecplotFrame, TecplotError> {
    let mut reader = LineReader::at(stream, resume_offset)?;
    let header = read_header(&mut reader, resume_offset == 0)?;

    let mut nodal = FieldTable::with_capacity(header.zone.num_nodal());
    read_sections(
        &mut reader,
        header.nodal_variables(),
        header.zone.node_count,
        ColumnRole::Nodal,
        options.sparse,
        &mut nodal,
    )?;

    let checkpoint = reader.checkpoint();
    let scan = scan_connectivity(&mut reader)?;
    reader.rewind(checkpoint)?;

    let mut declared = FieldTable::with_capacity(header.cell_variables().len());
    read_sections(
        &mut reader,
        header.cell_variables(),
        scan.cells.len(),
        ColumnRole::CellCentered,
        options.sparse,
        &mut declared,
    )?;

    let cells = build_cell_table(&nodal, &scan.cells, declared)?;
    let Header { variables, zone } = header;
    Ok(TecplotFrame {
        variables,
        zone,
        nodal,
        cells,
        connectivity: scan.cells,
        cursor: scan.cursor,
    })
}
