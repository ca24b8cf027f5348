//! # Constants and type definitions for hallplot
//!
//! This module centralizes the **literal tokens**, **column names**, and **common type
//! definitions** shared by the reader, the geometizer and the interpolator.
//!
//! ## Overview
//!
//! - Line markers recognised in Hall2De Tecplot output (`TITLE`, `ZONE`)
//! - Required zone keys (`N`, `VARLOCATION`)
//! - Coordinate and synthetic node-index column names
//! - Scalar type aliases used across the crate

// -------------------------------------------------------------------------------------------------
// Format markers
// -------------------------------------------------------------------------------------------------

/// Leading token of a title line; also marks the start of the next frame in movie files
pub const TITLE_MARKER: &str = "TITLE";

/// Leading token of the zone declaration closing the variable list
pub const ZONE_MARKER: &str = "ZONE";

/// Zone key holding the node count
pub const NODE_COUNT_KEY: &str = "N";

/// Zone key holding the cell-centered variable range
pub const VARLOCATION_KEY: &str = "VARLOCATION";

/// Byte offset value used by the `-1` end-of-data convention
pub const END_OF_DATA: i64 = -1;

// -------------------------------------------------------------------------------------------------
// Column names
// -------------------------------------------------------------------------------------------------

/// Axial coordinate variable, always nodal and never sparse
pub const Z_COORD: &str = "z(m)";

/// Radial coordinate variable, always nodal and never sparse
pub const R_COORD: &str = "r(m)";

/// Number of corners of a Hall2De quadrilateral cell
pub const CELL_CORNERS: usize = 4;

/// Synthetic 0-based node-index columns, one per cell corner
pub const NODE_INDEX_COLUMNS: [&str; CELL_CORNERS] = ["i0", "i1", "i2", "i3"];

/// Weight applied to each corner when averaging the cell center
pub const CORNER_WEIGHT: f64 = 0.25;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Distance in meters
pub type Meter = f64;

/// 1-based node index as written in the connectivity block
pub type NodeNumber = i64;

/// Raw connectivity of a frame: one tuple of 1-based node numbers per cell
pub type Connectivity = Vec<Vec<NodeNumber>>;

/// Normalized inverse-squared-distance weights of the four corners of a cell
pub type CornerWeights = [f64; CELL_CORNERS];
