//! # Error taxonomy
//!
//! Every fallible operation of the crate returns [`TecplotError`]. The variants fall into
//! three families, queried with the `is_*` helpers:
//!
//! * **Format errors** – the text does not follow the Hall2De Tecplot layout
//!   ([`TecplotError::Format`]), or the parsed tables lack what the mesh needs
//!   ([`TecplotError::MissingColumn`], [`TecplotError::CellArity`]).
//! * **Range errors** – an index points outside the declared variables or nodes
//!   ([`TecplotError::Range`]).
//! * **Arithmetic errors** – a cell center coincides with one of its corners, so the
//!   inverse-squared-distance weight is singular ([`TecplotError::CoincidentCorner`]), or
//!   the squared distances leave the finite `f64` range ([`TecplotError::SingularWeights`]).
//!
//! I/O, CSV and clock failures of the output layer are wrapped as-is.
//!
//! None of these is recoverable for the current frame: the frame cursor of a stream that
//! failed mid-frame is undefined.
use thiserror::Error;

/// Detail of a format error.
///
/// Variants
/// -----------------
/// * `MissingZone` – The stream ended before a `ZONE` line closed the variable list.
/// * `UnquotedVariable` – A variable line carries no quoted name; payload is the line.
/// * `MissingDelimiter` – The opening delimiter was not found in the payload text.
/// * `UnterminatedDelimiter` – The closing delimiter was not found in the payload text.
/// * `MalformedZoneField` – A zone field is not a `key=value` pair.
/// * `MissingZoneKey` – A required zone key (`N`, `VARLOCATION`) is absent.
/// * `InvalidNodeCount` – `N` is not a positive integer.
/// * `MalformedVarLocation` – `VARLOCATION` has no `[lo-hi]` range.
/// * `InvalidFloat` – A data line is not a floating-point literal.
/// * `InvalidInteger` – A connectivity token is not an integer.
/// * `UnexpectedEof` – The stream ended in the middle of a section.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatErrorKind {
    #[error("no ZONE line found before the end of the stream")]
    MissingZone,
    #[error("expected a quoted variable name, found: {0}")]
    UnquotedVariable(String),
    #[error("missing opening delimiter '{open}' in: {text}")]
    MissingDelimiter { open: char, text: String },
    #[error("missing closing delimiter '{close}' in: {text}")]
    UnterminatedDelimiter { close: char, text: String },
    #[error("zone field is not a key=value pair: {0}")]
    MalformedZoneField(String),
    #[error("required zone key {0} is missing")]
    MissingZoneKey(&'static str),
    #[error("node count is not a positive integer: {0}")]
    InvalidNodeCount(String),
    #[error("VARLOCATION has no [lo-hi] range: {0}")]
    MalformedVarLocation(String),
    #[error("invalid floating-point value: {0}")]
    InvalidFloat(String),
    #[error("invalid integer value: {0}")]
    InvalidInteger(String),
    #[error("stream ended after {read} of {expected} values")]
    UnexpectedEof { expected: usize, read: usize },
}

/// Index checks performed on the header and on the connectivity.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RangeError {
    #[error("VARLOCATION range [{lo}-{hi}] is outside the {variables} declared variables")]
    VarLocation { lo: usize, hi: usize, variables: usize },
    #[error("cell {cell} references node {node}, valid nodes are 1..={nodes}")]
    NodeIndex { cell: usize, node: i64, nodes: usize },
}

#[derive(Error, Debug)]
pub enum TecplotError {
    #[error("Format error at line {line}: {kind}")]
    Format { line: usize, kind: FormatErrorKind },

    #[error("Required column {0} is missing")]
    MissingColumn(String),

    #[error("Cell {cell} has {arity} corners, expected 4")]
    CellArity { cell: usize, arity: usize },

    #[error("Index out of range: {0}")]
    Range(#[from] RangeError),

    #[error("Cell {cell} center coincides with its corner {corner}: interpolation weight is infinite")]
    CoincidentCorner { cell: usize, corner: usize },

    #[error("Cell {cell} has non-finite interpolation weights: corner distances underflow or overflow")]
    SingularWeights { cell: usize },

    #[error("Invalid option: {0}")]
    InvalidOption(String),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Unable to write delimited output: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Unable to read the system clock: {0}")]
    TimeError(#[from] hifitime::HifitimeError),
}

impl TecplotError {
    /// Shorthand for a [`TecplotError::Format`] at a 1-based line number.
    pub(crate) fn format(line: usize, kind: FormatErrorKind) -> Self {
        TecplotError::Format { line, kind }
    }

    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            TecplotError::Format { .. }
                | TecplotError::MissingColumn(_)
                | TecplotError::CellArity { .. }
        )
    }

    pub fn is_range_error(&self) -> bool {
        matches!(self, TecplotError::Range(_))
    }

    pub fn is_arithmetic_error(&self) -> bool {
        matches!(
            self,
            TecplotError::CoincidentCorner { .. } | TecplotError::SingularWeights { .. }
        )
    }
}

impl PartialEq for TecplotError {
    fn eq(&self, other: &Self) -> bool {
        use TecplotError::*;
        match (self, other) {
            (Format { line: l1, kind: k1 }, Format { line: l2, kind: k2 }) => l1 == l2 && k1 == k2,
            (MissingColumn(a), MissingColumn(b)) => a == b,
            (CellArity { cell: c1, arity: a1 }, CellArity { cell: c2, arity: a2 }) => {
                c1 == c2 && a1 == a2
            }
            (Range(a), Range(b)) => a == b,
            (
                CoincidentCorner {
                    cell: c1,
                    corner: k1,
                },
                CoincidentCorner {
                    cell: c2,
                    corner: k2,
                },
            ) => c1 == c2 && k1 == k2,
            (SingularWeights { cell: c1 }, SingularWeights { cell: c2 }) => c1 == c2,
            (InvalidOption(a), InvalidOption(b)) => a == b,

            // not comparable: same variant is enough
            (IoError(_), IoError(_)) => true,
            (CsvError(_), CsvError(_)) => true,
            (TimeError(_), TimeError(_)) => true,

            _ => false,
        }
    }
}
