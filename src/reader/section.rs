//! # Section reader
//!
//! A section is the block of values of one variable: one floating-point literal per line,
//! `N` lines for a nodal variable, one line per cell for a cell-centered variable.
//! Sections follow each other in declaration order.
//!
//! In **sparse** mode a section whose values are all exactly `0.0` is read but not stored:
//! the variable is absent from the resulting table. The comparison is strict equality, a
//! section holding `1e-300` is kept.
use std::io::{BufRead, Seek};

use super::line_reader::LineReader;
use crate::table::{ColumnData, ColumnRole, FieldTable};
use crate::tecplot_errors::{FormatErrorKind, TecplotError};

/// Read exactly `n` values, one per line.
///
/// Return
/// ----------
/// * The parsed values, in stream order.
/// * [`FormatErrorKind::InvalidFloat`] at the first line that is not a float literal.
/// * [`FormatErrorKind::UnexpectedEof`] if the stream ends before `n` values are read.
pub(crate) fn read_values<R: BufRead + Seek>(
    reader: &mut LineReader<'_, R>,
    n: usize,
) -> Result<Vec<f64>, TecplotError> {
    let mut values = Vec::with_capacity(n);
    while values.len() < n {
        let eof_line = reader.line_number() + 1;
        let Some((line_no, text)) = reader.next_line()? else {
            return Err(TecplotError::format(
                eof_line,
                FormatErrorKind::UnexpectedEof {
                    expected: n,
                    read: values.len(),
                },
            ));
        };

        let literal = text.trim();
        let value = literal.parse::<f64>().map_err(|_| {
            TecplotError::format(line_no, FormatErrorKind::InvalidFloat(literal.to_string()))
        })?;
        values.push(value);
    }
    Ok(values)
}

/// `true` when a section only holds exact zeros and would be dropped in sparse mode.
///
/// An empty section is not considered all-zero: there is nothing to elide.
pub fn is_zero_section(values: &[f64]) -> bool {
    !values.is_empty() && values.iter().all(|&v| v == 0.0)
}

/// Read one section per variable of `names`, `n` values each, into `table`.
///
/// Arguments
/// -----------------
/// * `reader` – Line reader positioned on the first value of the first section.
/// * `names` – Variables to read, in declaration order.
/// * `n` – Number of values per section (node count or cell count).
/// * `role` – Role given to the inserted columns.
/// * `sparse` – Skip storing all-zero sections.
/// * `table` – Destination table; columns are appended in `names` order.
pub(crate) fn read_sections<R: BufRead + Seek>(
    reader: &mut LineReader<'_, R>,
    names: &[String],
    n: usize,
    role: ColumnRole,
    sparse: bool,
    table: &mut FieldTable,
) -> Result<(), TecplotError> {
    for name in names {
        let values = read_values(reader, n)?;
        if sparse && is_zero_section(&values) {
            continue;
        }
        table.insert(name.as_str(), role, ColumnData::Float(values));
    }
    Ok(())
}

#[cfg(test)]
mod section_test {
    use super::*;
    use std::io::Cursor;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_read_values() {
        let mut stream = Cursor::new("  1.5\n-2.0E+03 \n3\nnext");
        let mut reader = LineReader::at(&mut stream, 0).unwrap();
        assert_eq!(read_values(&mut reader, 3).unwrap(), vec![1.5, -2000.0, 3.0]);
        assert_eq!(reader.next_line().unwrap(), Some((4, "next")));
    }

    #[test]
    fn test_invalid_float() {
        let mut stream = Cursor::new("1.0\n1 2 3 4\n");
        let mut reader = LineReader::at(&mut stream, 0).unwrap();
        assert_eq!(
            read_values(&mut reader, 2),
            Err(TecplotError::format(
                2,
                FormatErrorKind::InvalidFloat("1 2 3 4".into())
            ))
        );
    }

    #[test]
    fn test_unexpected_eof() {
        let mut stream = Cursor::new("1.0\n2.0\n");
        let mut reader = LineReader::at(&mut stream, 0).unwrap();
        assert_eq!(
            read_values(&mut reader, 3),
            Err(TecplotError::format(
                3,
                FormatErrorKind::UnexpectedEof {
                    expected: 3,
                    read: 2
                }
            ))
        );
    }

    #[test]
    fn test_sparse_sections() {
        let text = "0.0\n0.0\n0.0\n-0.0\n1e-300\n0.0\n";
        let vars = names(&["a", "b", "c"]);

        let mut stream = Cursor::new(text);
        let mut reader = LineReader::at(&mut stream, 0).unwrap();
        let mut table = FieldTable::new();
        read_sections(&mut reader, &vars, 2, ColumnRole::Nodal, true, &mut table).unwrap();
        assert_eq!(table.names().collect::<Vec<_>>(), ["c"]);
        assert_eq!(table.floats("c"), Some(&[1e-300, 0.0][..]));

        let mut stream = Cursor::new(text);
        let mut reader = LineReader::at(&mut stream, 0).unwrap();
        let mut table = FieldTable::new();
        read_sections(&mut reader, &vars, 2, ColumnRole::Nodal, false, &mut table).unwrap();
        assert_eq!(table.names().collect::<Vec<_>>(), ["a", "b", "c"]);
        assert_eq!(table.floats("a"), Some(&[0.0, 0.0][..]));
    }

    #[test]
    fn test_is_zero_section() {
        assert!(is_zero_section(&[0.0, -0.0]));
        assert!(!is_zero_section(&[0.0, f64::MIN_POSITIVE]));
        assert!(!is_zero_section(&[]));
    }
}
