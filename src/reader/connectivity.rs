//! # Connectivity reader
//!
//! After the nodal sections, a Hall2De frame holds the cell-centered sections followed by
//! the cell connectivity. The number of cells is not declared anywhere, so the reader scans
//! ahead first:
//!
//! * a line starting with `TITLE` is the first line of the next frame; the scan stops and
//!   the offset just past that line becomes the [`FrameCursor`],
//! * a line with a single token (a cell-centered value) or no token at all is skipped,
//! * every other line is one cell: its whitespace-separated integers are the 1-based node
//!   numbers of its corners, stored with whatever arity the line has.
//!
//! The caller saves the offset before the scan and rewinds to it afterwards to read the
//! cell-centered sections, now that the cell count is known.
use std::io::{BufRead, Seek};

use super::line_reader::LineReader;
use super::FrameCursor;
use crate::constants::{Connectivity, NodeNumber, TITLE_MARKER};
use crate::tecplot_errors::{FormatErrorKind, TecplotError};

/// Result of the connectivity scan.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ConnectivityScan {
    pub cells: Connectivity,
    pub cursor: FrameCursor,
}

/// What a raw line of the scanned region holds.
#[derive(Debug, PartialEq)]
enum ScanLine {
    NextFrame,
    Noise,
    Cell(Vec<NodeNumber>),
}

fn classify_line(line_no: usize, text: &str) -> Result<ScanLine, TecplotError> {
    if text.trim_start().starts_with(TITLE_MARKER) {
        return Ok(ScanLine::NextFrame);
    }

    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() <= 1 {
        return Ok(ScanLine::Noise);
    }

    tokens
        .into_iter()
        .map(|token| {
            token.parse::<NodeNumber>().map_err(|_| {
                TecplotError::format(line_no, FormatErrorKind::InvalidInteger(token.to_string()))
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(ScanLine::Cell)
}

/// Scan forward for the connectivity of the current frame.
///
/// Arguments
/// -----------------
/// * `reader` – Line reader positioned just after the last nodal value.
///
/// Return
/// ----------
/// * The connectivity tuples in file order and the cursor of the next frame
///   ([`FrameCursor::End`] when the stream ends first).
/// * [`FormatErrorKind::InvalidInteger`] if a multi-token line holds a non-integer token.
///
/// The reader is left after the `TITLE` line or at the end of the stream; callers rewind
/// it themselves.
pub(crate) fn scan_connectivity<R: BufRead + Seek>(
    reader: &mut LineReader<'_, R>,
) -> Result<ConnectivityScan, TecplotError> {
    let mut cells = Vec::new();
    loop {
        let scanned = match reader.next_line()? {
            None => {
                return Ok(ConnectivityScan {
                    cells,
                    cursor: FrameCursor::End,
                })
            }
            Some((line_no, text)) => classify_line(line_no, text)?,
        };

        match scanned {
            ScanLine::NextFrame => {
                return Ok(ConnectivityScan {
                    cells,
                    cursor: FrameCursor::Next(reader.offset()),
                })
            }
            ScanLine::Noise => {}
            ScanLine::Cell(nodes) => cells.push(nodes),
        }
    }
}
