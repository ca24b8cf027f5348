//! # Ordered field tables
//!
//! A [`FieldTable`] is the in-memory form of every table produced by the crate: the nodal
//! table, the cell table and the interpolated table. It is an **ordered** list of named
//! [`Column`]s, each tagged with a [`ColumnRole`] telling where its values live on the mesh.
//!
//! ## Roles
//! -----------------
//! The cell table mixes declared cell-centered variables with synthetic columns built by the
//! geometizer (`z(m)`, `r(m)`, `i0..i3`). Consumers select columns by role
//! ([`FieldTable::with_role`]) instead of by position.
//!
//! ## Insertion semantics
//! -----------------
//! [`FieldTable::insert`] appends a new column, or replaces the data and role of an existing
//! column with the same name **in place**: the column keeps its original position. Variable
//! names are assumed unique, so a later duplicate silently overwrites the earlier one.
//!
//! ## Example
//! -----------------
//! ```rust
//! use hallplot::table::{ColumnData, ColumnRole, FieldTable};
//!
//! let mut table = FieldTable::new();
//! table.insert("z(m)", ColumnRole::Nodal, ColumnData::Float(vec![0.0, 1.0]));
//! table.insert("ni", ColumnRole::Nodal, ColumnData::Float(vec![1e17, 2e17]));
//!
//! assert_eq!(table.names().collect::<Vec<_>>(), ["z(m)", "ni"]);
//! assert_eq!(table.floats("ni"), Some(&[1e17, 2e17][..]));
//! assert_eq!(table.row_count(), Some(2));
//! ```

/// Location of a column's values on the mesh.
///
/// Variants
/// -----------------
/// * `Nodal` – Declared variable sampled at mesh vertices.
/// * `CellCentered` – Declared variable sampled per cell.
/// * `CellCenter` – Synthetic cell-center coordinate (`z(m)`, `r(m)` of the cell table).
/// * `NodeIndex` – Synthetic 0-based corner node index (`i0..i3`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnRole {
    Nodal,
    CellCentered,
    CellCenter,
    NodeIndex,
}

impl ColumnRole {
    /// `true` for columns built by the geometizer rather than read from the file.
    pub fn is_synthetic(self) -> bool {
        matches!(self, ColumnRole::CellCenter | ColumnRole::NodeIndex)
    }
}

/// Values of a column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Float(Vec<f64>),
    Index(Vec<usize>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Float(v) => v.len(),
            ColumnData::Index(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_floats(&self) -> Option<&[f64]> {
        match self {
            ColumnData::Float(v) => Some(v),
            ColumnData::Index(_) => None,
        }
    }

    pub fn as_indices(&self) -> Option<&[usize]> {
        match self {
            ColumnData::Index(v) => Some(v),
            ColumnData::Float(_) => None,
        }
    }

    /// Text form of the value at `row`, as written by the delimited writer.
    ///
    /// Floats use Rust's shortest round-trip representation, indices are plain integers.
    pub fn format_value(&self, row: usize) -> Option<String> {
        match self {
            ColumnData::Float(v) => v.get(row).map(|x| x.to_string()),
            ColumnData::Index(v) => v.get(row).map(|i| i.to_string()),
        }
    }
}

/// A named column of a [`FieldTable`].
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub role: ColumnRole,
    pub data: ColumnData,
}

/// Ordered mapping from variable name to column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldTable {
    columns: Vec<Column>,
}

impl FieldTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        FieldTable {
            columns: Vec::with_capacity(capacity),
        }
    }

    /// Insert a column, replacing an existing column of the same name in place.
    pub fn insert(&mut self, name: impl Into<String>, role: ColumnRole, data: ColumnData) {
        let name = name.into();
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(column) => {
                column.role = role;
                column.data = data;
            }
            None => self.columns.push(Column { name, role, data }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Float values of `name`, `None` if absent or if the column holds indices.
    pub fn floats(&self, name: &str) -> Option<&[f64]> {
        self.get(name).and_then(|c| c.data.as_floats())
    }

    /// Index values of `name`, `None` if absent or if the column holds floats.
    pub fn indices(&self, name: &str) -> Option<&[usize]> {
        self.get(name).and_then(|c| c.data.as_indices())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Column> {
        self.columns.iter()
    }

    /// Columns carrying `role`, in table order.
    pub fn with_role(&self, role: ColumnRole) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(move |c| c.role == role)
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Number of rows, taken from the first column; `None` for an empty table.
    pub fn row_count(&self) -> Option<usize> {
        self.columns.first().map(|c| c.data.len())
    }

    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }
}

impl<'a> IntoIterator for &'a FieldTable {
    type Item = &'a Column;
    type IntoIter = std::slice::Iter<'a, Column>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

#[cfg(test)]
mod table_test {
    use super::*;

    #[test]
    fn test_insert_keeps_position_on_duplicate() {
        let mut table = FieldTable::new();
        table.insert("a", ColumnRole::Nodal, ColumnData::Float(vec![1.0]));
        table.insert("b", ColumnRole::Nodal, ColumnData::Float(vec![2.0]));
        table.insert("a", ColumnRole::Nodal, ColumnData::Float(vec![3.0]));

        assert_eq!(table.names().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(table.floats("a"), Some(&[3.0][..]));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_typed_accessors() {
        let mut table = FieldTable::new();
        table.insert("i0", ColumnRole::NodeIndex, ColumnData::Index(vec![0, 3]));
        table.insert("p", ColumnRole::CellCentered, ColumnData::Float(vec![5.0, 6.0]));

        assert_eq!(table.indices("i0"), Some(&[0, 3][..]));
        assert_eq!(table.floats("i0"), None);
        assert_eq!(table.indices("p"), None);
        assert_eq!(table.floats("missing"), None);
        assert!(!table.contains("missing"));
    }

    #[test]
    fn test_roles() {
        let mut table = FieldTable::new();
        table.insert("z(m)", ColumnRole::CellCenter, ColumnData::Float(vec![0.5]));
        table.insert("i0", ColumnRole::NodeIndex, ColumnData::Index(vec![0]));
        table.insert("p", ColumnRole::CellCentered, ColumnData::Float(vec![5.0]));

        let declared: Vec<_> = table
            .with_role(ColumnRole::CellCentered)
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(declared, ["p"]);
        assert!(ColumnRole::CellCenter.is_synthetic());
        assert!(ColumnRole::NodeIndex.is_synthetic());
        assert!(!ColumnRole::Nodal.is_synthetic());
    }

    #[test]
    fn test_format_value() {
        let floats = ColumnData::Float(vec![0.5, 1e-20]);
        let ints = ColumnData::Index(vec![7]);
        assert_eq!(floats.format_value(0).as_deref(), Some("0.5"));
        assert_eq!(floats.format_value(1).as_deref(), Some("0.00000000000000000001"));
        assert_eq!(ints.format_value(0).as_deref(), Some("7"));
        assert_eq!(ints.format_value(1), None);
    }

    #[test]
    fn test_empty_table() {
        let table = FieldTable::new();
        assert!(table.is_empty());
        assert_eq!(table.row_count(), None);
    }
}
