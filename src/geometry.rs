//! # Cell-center geometizer
//!
//! Builds the geometric part of the cell table from the nodal coordinates and the cell
//! connectivity:
//!
//! * `i0..i3` – 0-based node index of each corner (`connectivity[:, k] - 1`),
//! * `z(m)`, `r(m)` – approximate cell center, the plain average of the four corners.
//!
//! The average is accumulated corner by corner, `c += 0.25 * x[i_k]` for `k = 0..4`. It is
//! not the area centroid of the quadrilateral; downstream results depend on this exact
//! approximation and on the accumulation order.
//!
//! ## Table layout
//! -----------------
//! [`build_cell_table`] returns the columns in the fixed order
//! `z(m), r(m), i0, i1, i2, i3` followed by the declared cell-centered variables.
use crate::constants::{
    NodeNumber, CELL_CORNERS, CORNER_WEIGHT, NODE_INDEX_COLUMNS, R_COORD, Z_COORD,
};
use crate::table::{ColumnData, ColumnRole, FieldTable};
use crate::tecplot_errors::{RangeError, TecplotError};

/// Nodal coordinate column of `nodal`, or [`TecplotError::MissingColumn`].
pub(crate) fn coordinate<'a>(nodal: &'a FieldTable, name: &str) -> Result<&'a [f64], TecplotError> {
    nodal
        .floats(name)
        .ok_or_else(|| TecplotError::MissingColumn(name.to_string()))
}

/// Convert a 1-based node number to a 0-based index, checking it against the node count.
fn node_index(cell: usize, node: NodeNumber, nodes: usize) -> Result<usize, TecplotError> {
    usize::try_from(node)
        .ok()
        .filter(|&n| (1..=nodes).contains(&n))
        .map(|n| n - 1)
        .ok_or_else(|| RangeError::NodeIndex { cell, node, nodes }.into())
}

/// Compute the approximate center and the corner indices of every cell.
///
/// Arguments
/// -----------------
/// * `nodal` – Nodal table holding the `z(m)` and `r(m)` coordinates.
/// * `connectivity` – One tuple of 1-based node numbers per cell. Only the first four
///   entries of each tuple are used.
///
/// Return
/// ----------
/// * A table with the columns `z(m)`, `r(m)` ([`ColumnRole::CellCenter`]) and `i0..i3`
///   ([`ColumnRole::NodeIndex`]), one row per cell.
/// * [`TecplotError::MissingColumn`] if a coordinate is absent from `nodal`.
/// * [`TecplotError::CellArity`] if a tuple has fewer than four nodes.
/// * [`RangeError::NodeIndex`] if a node number is outside `1..=N`.
///
/// Examples
/// ----------
/// ```rust
/// use hallplot::geometry::cell_centers;
/// use hallplot::table::{ColumnData, ColumnRole, FieldTable};
///
/// let mut nodal = FieldTable::new();
/// nodal.insert("z(m)", ColumnRole::Nodal, ColumnData::Float(vec![0.0, 1.0, 1.0, 0.0]));
/// nodal.insert("r(m)", ColumnRole::Nodal, ColumnData::Float(vec![0.0, 0.0, 1.0, 1.0]));
///
/// let cells = cell_centers(&nodal, &[vec![1, 2, 3, 4]]).unwrap();
/// assert_eq!(cells.floats("z(m)"), Some(&[0.5][..]));
/// assert_eq!(cells.indices("i2"), Some(&[2][..]));
/// ```
pub fn cell_centers(
    nodal: &FieldTable,
    connectivity: &[Vec<NodeNumber>],
) -> Result<FieldTable, TecplotError> {
    let z = coordinate(nodal, Z_COORD)?;
    let r = coordinate(nodal, R_COORD)?;
    let nodes = z.len().min(r.len());
    let n_cells = connectivity.len();

    let mut corners: [Vec<usize>; CELL_CORNERS] =
        std::array::from_fn(|_| Vec::with_capacity(n_cells));
    for (cell, tuple) in connectivity.iter().enumerate() {
        if tuple.len() < CELL_CORNERS {
            return Err(TecplotError::CellArity {
                cell,
                arity: tuple.len(),
            });
        }
        for (k, column) in corners.iter_mut().enumerate() {
            column.push(node_index(cell, tuple[k], nodes)?);
        }
    }

    let mut z_c = vec![0.0; n_cells];
    let mut r_c = vec![0.0; n_cells];
    for column in &corners {
        for (cell, &i) in column.iter().enumerate() {
            z_c[cell] += CORNER_WEIGHT * z[i];
            r_c[cell] += CORNER_WEIGHT * r[i];
        }
    }

    let mut table = FieldTable::with_capacity(2 + CELL_CORNERS);
    table.insert(Z_COORD, ColumnRole::CellCenter, ColumnData::Float(z_c));
    table.insert(R_COORD, ColumnRole::CellCenter, ColumnData::Float(r_c));
    for (name, column) in NODE_INDEX_COLUMNS.iter().zip(corners) {
        table.insert(*name, ColumnRole::NodeIndex, ColumnData::Index(column));
    }
    Ok(table)
}

/// Assemble the full cell table: geometry first, then the declared cell-centered columns.
///
/// A declared variable named like a synthetic column replaces its values in place; the
/// geometry keeps its leading position.
pub fn build_cell_table(
    nodal: &FieldTable,
    connectivity: &[Vec<NodeNumber>],
    declared: FieldTable,
) -> Result<FieldTable, TecplotError> {
    let mut table = cell_centers(nodal, connectivity)?;
    for column in declared.into_columns() {
        table.insert(column.name, column.role, column.data);
    }
    Ok(table)
}
