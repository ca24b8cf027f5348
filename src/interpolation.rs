//! Inverse-squared-distance interpolation of nodal fields onto cell centers.
//!
//! Overview
//! -----------------
//! Every Hall2De cell is a quadrilateral whose four corners are mesh nodes. Once the
//! geometizer has placed an approximate center `(z_c, r_c)` in each cell, a nodal field
//! `v` is carried to that center with the weights
//!
//! ```text
//! w_k = 1 / ((z_k - z_c)^2 + (r_k - r_c)^2)        k = 0..4
//! w_k <- w_k / (w_0 + w_1 + w_2 + w_3)
//! v_c = w_0 v_0 + w_1 v_1 + w_2 v_2 + w_3 v_3
//! ```
//!
//! There is no smoothing term. A center lying exactly on one of its corners makes the
//! weight infinite; this is reported as [`TecplotError::CoincidentCorner`] rather than
//! guarded by an epsilon. Distances so small or so large that a weight or their sum leaves
//! the finite range are reported as [`TecplotError::SingularWeights`].
//!
//! The weights only depend on the geometry, so they are computed once per cell
//! ([`cell_weights`]) and reused for every nodal variable. Sums are evaluated left to right
//! in corner order.
//!
//! Output layout
//! -----------------
//! The table returned by [`interpolate`] holds, in order:
//! 1. `z(m)`, `r(m)` – the corner coordinates interpolated like any other nodal variable,
//! 2. every other nodal variable, interpolated, in declaration order,
//! 3. every declared cell-centered variable, copied as-is.
//!
//! The interpolated coordinates are not the geometizer centers: on a skewed cell the
//! weights pull them toward the nearest corners.
//!
//! The synthetic `i0..i3` columns are not carried over.
//!
//! See also
//! -----------------
//! * [`crate::geometry::cell_centers`] – builds the centers and corner indices used here.
//! * [`crate::reader::TecplotFrame::interpolate`] – convenience wrapper on a parsed frame.
use crate::constants::{CornerWeights, Meter, CELL_CORNERS, NODE_INDEX_COLUMNS, R_COORD, Z_COORD};
use crate::geometry::coordinate;
use crate::table::{ColumnData, ColumnRole, FieldTable};
use crate::tecplot_errors::{RangeError, TecplotError};

fn squared_distance(dz: Meter, dr: Meter) -> Meter {
    dz * dz + dr * dr
}

/// Corner index columns `i0..i3` of the cell table.
fn corner_columns(cells: &FieldTable) -> Result<[&[usize]; CELL_CORNERS], TecplotError> {
    let mut columns: [&[usize]; CELL_CORNERS] = [&[]; CELL_CORNERS];
    for (slot, name) in columns.iter_mut().zip(NODE_INDEX_COLUMNS) {
        *slot = cells
            .indices(name)
            .ok_or_else(|| TecplotError::MissingColumn(name.to_string()))?;
    }
    Ok(columns)
}

/// Value of a nodal array at a 0-based corner index.
fn at_node(values: &[f64], cell: usize, node: usize) -> Result<f64, TecplotError> {
    values.get(node).copied().ok_or_else(|| {
        RangeError::NodeIndex {
            cell,
            node: node as i64 + 1,
            nodes: values.len(),
        }
        .into()
    })
}

/// Normalized inverse-squared-distance weights of the four corners of every cell.
///
/// Arguments
/// -----------------
/// * `nodal` – Nodal table holding `z(m)` and `r(m)`.
/// * `cells` – Cell table holding the centers `z(m)`, `r(m)` and the corner indices `i0..i3`.
///
/// Return
/// ----------
/// * One `[w0, w1, w2, w3]` per cell, in cell order. Each row sums to `1` up to rounding.
/// * [`TecplotError::MissingColumn`] if a coordinate or index column is absent.
/// * [`RangeError::NodeIndex`] if a corner index is outside the nodal arrays.
/// * [`TecplotError::CoincidentCorner`] if a center coincides with one of its corners.
/// * [`TecplotError::SingularWeights`] if a weight or the sum of a cell's weights is not a
///   finite positive number.
pub fn cell_weights(
    nodal: &FieldTable,
    cells: &FieldTable,
) -> Result<Vec<CornerWeights>, TecplotError> {
    let z = coordinate(nodal, Z_COORD)?;
    let r = coordinate(nodal, R_COORD)?;
    let z_c = coordinate(cells, Z_COORD)?;
    let r_c = coordinate(cells, R_COORD)?;
    let corners = corner_columns(cells)?;

    let mut weights = Vec::with_capacity(z_c.len());
    for (cell, (&zc, &rc)) in z_c.iter().zip(r_c).enumerate() {
        let mut w: CornerWeights = [0.0; CELL_CORNERS];
        for (corner, column) in corners.iter().enumerate() {
            let node = *column.get(cell).ok_or_else(|| {
                TecplotError::MissingColumn(NODE_INDEX_COLUMNS[corner].to_string())
            })?;
            let d2 = squared_distance(at_node(z, cell, node)? - zc, at_node(r, cell, node)? - rc);
            if d2 == 0.0 {
                return Err(TecplotError::CoincidentCorner { cell, corner });
            }
            w[corner] = 1.0 / d2;
            if !w[corner].is_finite() {
                return Err(TecplotError::SingularWeights { cell });
            }
        }

        let sum = w[0] + w[1] + w[2] + w[3];
        if sum == 0.0 || !sum.is_finite() {
            return Err(TecplotError::SingularWeights { cell });
        }
        weights.push(w.map(|wk| wk / sum));
    }
    Ok(weights)
}

/// Interpolate every nodal variable onto the cell centers.
///
/// Arguments
/// -----------------
/// * `nodal` – Nodal table of the frame.
/// * `cells` – Cell table of the frame, as built by [`crate::geometry::build_cell_table`].
///
/// Return
/// ----------
/// * The interpolated table (see the module documentation for its column order), one row
///   per cell.
/// * The errors of [`cell_weights`].
///
/// Examples
/// ----------
/// ```rust
/// use hallplot::geometry::cell_centers;
/// use hallplot::interpolation::interpolate;
/// use hallplot::table::{ColumnData, ColumnRole, FieldTable};
///
/// let mut nodal = FieldTable::new();
/// nodal.insert("z(m)", ColumnRole::Nodal, ColumnData::Float(vec![0.0, 1.0, 1.0, 0.0]));
/// nodal.insert("r(m)", ColumnRole::Nodal, ColumnData::Float(vec![0.0, 0.0, 1.0, 1.0]));
/// nodal.insert("T", ColumnRole::Nodal, ColumnData::Float(vec![10.0, 20.0, 30.0, 40.0]));
///
/// let cells = cell_centers(&nodal, &[vec![1, 2, 3, 4]]).unwrap();
/// let table = interpolate(&nodal, &cells).unwrap();
/// assert_eq!(table.floats("T"), Some(&[25.0][..]));
/// ```
pub fn interpolate(nodal: &FieldTable, cells: &FieldTable) -> Result<FieldTable, TecplotError> {
    let weights = cell_weights(nodal, cells)?;
    let corners = corner_columns(cells)?;

    let mut table = FieldTable::new();
    for name in [Z_COORD, R_COORD] {
        let centers = coordinate(cells, name)?;
        table.insert(name, ColumnRole::CellCenter, ColumnData::Float(centers.to_vec()));
    }

    for column in nodal.with_role(ColumnRole::Nodal) {
        let Some(values) = column.data.as_floats() else {
            continue;
        };

        let mut interpolated = Vec::with_capacity(weights.len());
        for (cell, w) in weights.iter().enumerate() {
            let mut v = 0.0;
            for (corner, indices) in corners.iter().enumerate() {
                v += w[corner] * at_node(values, cell, indices[cell])?;
            }
            interpolated.push(v);
        }
        // coordinates keep their leading slot
        let role = if column.name == Z_COORD || column.name == R_COORD {
            ColumnRole::CellCenter
        } else {
            ColumnRole::Nodal
        };
        table.insert(column.name.as_str(), role, ColumnData::Float(interpolated));
    }

    for column in cells.with_role(ColumnRole::CellCentered) {
        table.insert(column.name.as_str(), column.role, column.data.clone());
    }
    Ok(table)
}

#[cfg(test)]
mod interpolation_test {
    use super::*;
    use crate::geometry::{build_cell_table, cell_centers};
    use approx::assert_relative_eq;

    fn nodal_table(z: Vec<f64>, r: Vec<f64>, fields: &[(&str, Vec<f64>)]) -> FieldTable {
        let mut nodal = FieldTable::new();
        nodal.insert(Z_COORD, ColumnRole::Nodal, ColumnData::Float(z));
        nodal.insert(R_COORD, ColumnRole::Nodal, ColumnData::Float(r));
        for (name, values) in fields {
            nodal.insert(*name, ColumnRole::Nodal, ColumnData::Float(values.clone()));
        }
        nodal
    }

    #[test]
    fn test_equidistant_corners() {
        let nodal = nodal_table(
            vec![0.0, 1.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0, 1.0],
            &[("T", vec![10.0, 20.0, 30.0, 40.0])],
        );
        let cells = cell_centers(&nodal, &[vec![1, 2, 3, 4]]).unwrap();

        let weights = cell_weights(&nodal, &cells).unwrap();
        assert_eq!(weights, vec![[0.25; 4]]);

        let table = interpolate(&nodal, &cells).unwrap();
        assert_eq!(table.names().collect::<Vec<_>>(), ["z(m)", "r(m)", "T"]);
        assert_eq!(table.floats("T"), Some(&[25.0][..]));
        assert_eq!(table.floats(Z_COORD), Some(&[0.5][..]));
    }

    #[test]
    fn test_weights_normalized_on_skewed_cells() {
        let nodal = nodal_table(
            vec![0.0, 3.0, 2.5, 0.1, 4.0, 5.5],
            vec![0.0, 0.2, 1.7, 1.0, 0.1, 2.0],
            &[],
        );
        let cells = cell_centers(&nodal, &[vec![1, 2, 3, 4], vec![2, 5, 6, 3]]).unwrap();

        for w in cell_weights(&nodal, &cells).unwrap() {
            assert_relative_eq!(w.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
            assert!(w.iter().all(|&wk| wk > 0.0));
        }
    }

    #[test]
    fn test_identical_corner_values() {
        let nodal = nodal_table(
            vec![0.0, 3.0, 2.5, 0.1],
            vec![0.0, 0.2, 1.7, 1.0],
            &[("phi", vec![7.5; 4])],
        );
        let cells = cell_centers(&nodal, &[vec![1, 2, 3, 4]]).unwrap();
        let table = interpolate(&nodal, &cells).unwrap();
        assert_relative_eq!(table.floats("phi").unwrap()[0], 7.5, epsilon = 1e-12);
    }

    #[test]
    fn test_coincident_corner() {
        // center of (0,0) (2,0) (0,2) (-2,-2) is the first corner
        let nodal = nodal_table(
            vec![0.0, 2.0, 0.0, -2.0],
            vec![0.0, 0.0, 2.0, -2.0],
            &[("T", vec![1.0; 4])],
        );
        let cells = cell_centers(&nodal, &[vec![1, 2, 3, 4]]).unwrap();
        let err = interpolate(&nodal, &cells).unwrap_err();
        assert_eq!(err, TecplotError::CoincidentCorner { cell: 0, corner: 0 });
        assert!(err.is_arithmetic_error());
    }

    #[test]
    fn test_coordinates_interpolated_on_skewed_cell() {
        let nodal = nodal_table(
            vec![0.0, 3.0, 2.5, 0.1],
            vec![0.0, 0.2, 1.7, 1.0],
            &[("T", vec![1.0; 4])],
        );
        let cells = cell_centers(&nodal, &[vec![1, 2, 3, 4]]).unwrap();
        assert_relative_eq!(cells.floats(Z_COORD).unwrap()[0], 1.4, epsilon = 1e-12);

        let table = interpolate(&nodal, &cells).unwrap();
        assert_eq!(table.names().collect::<Vec<_>>(), ["z(m)", "r(m)", "T"]);
        assert_eq!(table.get(Z_COORD).unwrap().role, ColumnRole::CellCenter);
        assert_relative_eq!(
            table.floats(Z_COORD).unwrap()[0],
            1.2732405760424386,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            table.floats(R_COORD).unwrap()[0],
            0.7979689543414096,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_underflowing_distances() {
        // unit square scaled down: squared distances are subnormal, weights overflow
        let s = 1e-160;
        let nodal = nodal_table(
            vec![0.0, s, s, 0.0],
            vec![0.0, 0.0, s, s],
            &[("T", vec![1.0, 2.0, 3.0, 4.0])],
        );
        let cells = cell_centers(&nodal, &[vec![1, 2, 3, 4]]).unwrap();
        let err = interpolate(&nodal, &cells).unwrap_err();
        assert_eq!(err, TecplotError::SingularWeights { cell: 0 });
        assert!(err.is_arithmetic_error());
    }

    #[test]
    fn test_overflowing_distances() {
        let s = 1e200;
        let nodal = nodal_table(
            vec![0.0, s, s, 0.0],
            vec![0.0, 0.0, s, s],
            &[("T", vec![1.0, 2.0, 3.0, 4.0])],
        );
        let cells = cell_centers(&nodal, &[vec![1, 2, 3, 4]]).unwrap();
        assert_eq!(
            cell_weights(&nodal, &cells),
            Err(TecplotError::SingularWeights { cell: 0 })
        );
    }

    #[test]
    fn test_column_order_with_cell_fields() {
        let nodal = nodal_table(
            vec![0.0, 1.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0, 1.0],
            &[("ni", vec![1.0; 4]), ("Te", vec![2.0; 4])],
        );
        let mut declared = FieldTable::new();
        declared.insert("p", ColumnRole::CellCentered, ColumnData::Float(vec![5.0]));
        let cells = build_cell_table(&nodal, &[vec![1, 2, 3, 4]], declared).unwrap();

        let table = interpolate(&nodal, &cells).unwrap();
        assert_eq!(
            table.names().collect::<Vec<_>>(),
            ["z(m)", "r(m)", "ni", "Te", "p"]
        );
        assert_eq!(table.floats("p"), Some(&[5.0][..]));
        assert_eq!(table.row_count(), Some(1));
    }

    #[test]
    fn test_missing_index_column() {
        let nodal = nodal_table(vec![0.0], vec![0.0], &[]);
        let mut cells = FieldTable::new();
        cells.insert(Z_COORD, ColumnRole::CellCenter, ColumnData::Float(vec![0.5]));
        cells.insert(R_COORD, ColumnRole::CellCenter, ColumnData::Float(vec![0.5]));
        assert_eq!(
            cell_weights(&nodal, &cells),
            Err(TecplotError::MissingColumn("i0".into()))
        );
    }
}
