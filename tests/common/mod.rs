use approx::assert_relative_eq;
use camino::Utf8PathBuf;
use hallplot::table::FieldTable;

pub fn fixture(name: &str) -> Utf8PathBuf {
    Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

pub fn assert_column_close(table: &FieldTable, name: &str, expected: &[f64], max_relative: f64) {
    let actual = table
        .floats(name)
        .unwrap_or_else(|| panic!("column {name} is missing"));
    assert_eq!(actual.len(), expected.len(), "length of column {name}");
    for (a, e) in actual.iter().zip(expected) {
        assert_relative_eq!(*a, *e, max_relative = max_relative);
    }
}
