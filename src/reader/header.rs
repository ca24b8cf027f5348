//! # Header parser
//!
//! Reads the part of a frame that precedes the data sections:
//!
//! ```text
//! TITLE = "Hall2De output"            <- only at the true start of the file
//! VARIABLES = "z(m)"                  <- one quoted name per line
//! "r(m)"
//! "ni"
//! ZONE N=4, E=1, VARLOCATION=([3-3]=CELLCENTERED)
//! ```
//!
//! The variable names keep their declaration order: nodal variables are the first
//! `lo - 1` of them and cell-centered variables are `lo..=hi` (1-based), as declared by
//! the `VARLOCATION` range of the zone line.
//!
//! The zone line is split on commas into `key=value` fields; values may not contain
//! commas. The field and range grammars are written with `nom` combinators, bracket
//! payloads are extracted with [`extract_delimited`].
use std::collections::HashMap;
use std::io::{BufRead, Seek};
use std::ops::RangeInclusive;

use nom::{
    bytes::complete::take_till1,
    character::complete::{char, digit1, space0},
    combinator::{all_consuming, map_res, opt, rest},
    sequence::{delimited, preceded, separated_pair},
    IResult, Parser,
};

use super::delimiters::extract_delimited;
use super::line_reader::LineReader;
use crate::constants::{NODE_COUNT_KEY, VARLOCATION_KEY, ZONE_MARKER};
use crate::tecplot_errors::{FormatErrorKind, RangeError, TecplotError};

/// Parsed `ZONE` declaration.
///
/// Fields
/// -----------------
/// * `fields` – Every `key=value` pair of the zone line, keys and values trimmed.
/// * `node_count` – Value of `N`.
/// * `cell_range` – 1-based inclusive range of cell-centered variables from `VARLOCATION`.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneInfo {
    pub fields: HashMap<String, String>,
    pub node_count: usize,
    pub cell_range: RangeInclusive<usize>,
}

impl ZoneInfo {
    /// Raw value of a zone key, e.g. `zone.get("E")`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Number of nodal variables, i.e. the variables declared before the cell-centered range.
    pub fn num_nodal(&self) -> usize {
        self.cell_range.start() - 1
    }

    /// 0-based slice range of the cell-centered variables in the declaration list.
    pub fn cell_variable_range(&self) -> std::ops::Range<usize> {
        (self.cell_range.start() - 1)..*self.cell_range.end()
    }
}

/// Variable list and zone declaration of a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub variables: Vec<String>,
    pub zone: ZoneInfo,
}

impl Header {
    pub fn nodal_variables(&self) -> &[String] {
        &self.variables[..self.zone.num_nodal()]
    }

    pub fn cell_variables(&self) -> &[String] {
        &self.variables[self.zone.cell_variable_range()]
    }
}

/// Read the header of a frame.
///
/// Arguments
/// -----------------
/// * `reader` – Line reader positioned at the start of the frame.
/// * `skip_title` – Discard the first line (title of the file). Frames resumed from a frame
///   cursor start right after their `TITLE` line and pass `false`.
///
/// Return
/// ----------
/// * The variable names and the parsed zone line.
/// * A format error if the stream ends before a `ZONE` line, if a variable line carries no
///   quoted name, or if the zone line is malformed; a range error if the `VARLOCATION` range
///   falls outside the declared variables.
pub(crate) fn read_header<R: BufRead + Seek>(
    reader: &mut LineReader<'_, R>,
    skip_title: bool,
) -> Result<Header, TecplotError> {
    if skip_title && reader.next_line()?.is_none() {
        return Err(TecplotError::format(1, FormatErrorKind::MissingZone));
    }

    let mut variables = Vec::new();
    loop {
        let eof_line = reader.line_number() + 1;
        let Some((line_no, text)) = reader.next_line()? else {
            return Err(TecplotError::format(eof_line, FormatErrorKind::MissingZone));
        };

        if text.trim_start().starts_with(ZONE_MARKER) {
            let zone = parse_zone_line(text, variables.len())
                .map_err(|e| with_line(e, line_no))?;
            return Ok(Header { variables, zone });
        }

        if text.trim().is_empty() {
            continue;
        }

        let name = extract_delimited(text, '"', '"').map_err(|kind| {
            let kind = match kind {
                FormatErrorKind::MissingDelimiter { .. } => {
                    FormatErrorKind::UnquotedVariable(text.to_string())
                }
                other => other,
            };
            TecplotError::format(line_no, kind)
        })?;
        variables.push(name.to_string());
    }
}

/// Attach a line number to the format errors of [`parse_zone_line`].
fn with_line(err: TecplotError, line: usize) -> TecplotError {
    match err {
        TecplotError::Format { kind, .. } => TecplotError::format(line, kind),
        other => other,
    }
}

/// `key = value` field of the zone line.
fn zone_field(input: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(take_till1(|c: char| c == '='), char('='), rest).parse(input)
}

fn index(input: &str) -> IResult<&str, usize> {
    map_res(digit1, str::parse::<usize>).parse(input)
}

/// `lo-hi` or `lo` inside the brackets of `VARLOCATION`.
fn index_range(input: &str) -> IResult<&str, (usize, Option<usize>)> {
    all_consuming(delimited(
        space0,
        (index, opt(preceded(delimited(space0, char('-'), space0), index))),
        space0,
    ))
    .parse(input)
}

/// Parse a `VARLOCATION` value such as `([3-4]=CELLCENTERED)` into its 1-based bounds.
///
/// One layer of parentheses is removed, the part before the first `=` must hold a bracketed
/// `[lo-hi]` (or `[k]`) range.
pub fn parse_varlocation(value: &str) -> Result<(usize, usize), FormatErrorKind> {
    let malformed = || FormatErrorKind::MalformedVarLocation(value.to_string());

    let inner = extract_delimited(value, '(', ')')?;
    let location = inner.split('=').next().unwrap_or(inner);
    let bounds = extract_delimited(location, '[', ']').map_err(|_| malformed())?;

    let (_, (lo, hi)) = index_range(bounds).map_err(|_| malformed())?;
    Ok((lo, hi.unwrap_or(lo)))
}

/// Parse a `ZONE` line.
///
/// Arguments
/// -----------------
/// * `line` – The full line, starting with `ZONE`.
/// * `n_variables` – Number of variables declared before it, used to bound `VARLOCATION`.
///
/// Return
/// ----------
/// * The [`ZoneInfo`]; format errors carry line number `0` and are renumbered by the caller.
pub fn parse_zone_line(line: &str, n_variables: usize) -> Result<ZoneInfo, TecplotError> {
    let fail = |kind: FormatErrorKind| TecplotError::format(0, kind);

    let body = line
        .trim_start()
        .strip_prefix(ZONE_MARKER)
        .unwrap_or(line);

    let mut fields = HashMap::new();
    for field in body.split(',').map(str::trim).filter(|f| !f.is_empty()) {
        let (_, (key, value)) = zone_field(field)
            .map_err(|_| fail(FormatErrorKind::MalformedZoneField(field.to_string())))?;
        fields.insert(key.trim().to_string(), value.trim().to_string());
    }

    let node_text = fields
        .get(NODE_COUNT_KEY)
        .ok_or_else(|| fail(FormatErrorKind::MissingZoneKey(NODE_COUNT_KEY)))?;
    let node_count = node_text
        .parse::<usize>()
        .ok()
        .filter(|&n| n > 0)
        .ok_or_else(|| fail(FormatErrorKind::InvalidNodeCount(node_text.clone())))?;

    let location = fields
        .get(VARLOCATION_KEY)
        .ok_or_else(|| fail(FormatErrorKind::MissingZoneKey(VARLOCATION_KEY)))?;
    let (lo, hi) = parse_varlocation(location).map_err(fail)?;

    if lo < 1 || lo > hi || hi > n_variables {
        return Err(RangeError::VarLocation {
            lo,
            hi,
            variables: n_variables,
        }
        .into());
    }

    Ok(ZoneInfo {
        fields,
        node_count,
        cell_range: lo..=hi,
    })
}

#[cfg(test)]
mod header_test {
    use super::*;
    use std::io::Cursor;

    const ZONE: &str = "ZONE T=\"frame\", N=4, E=1, DATAPACKING=BLOCK, VARLOCATION=([3-4]=CELLCENTERED)";

    #[test]
    fn test_parse_zone_line() {
        let zone = parse_zone_line(ZONE, 4).unwrap();
        assert_eq!(zone.node_count, 4);
        assert_eq!(zone.cell_range, 3..=4);
        assert_eq!(zone.num_nodal(), 2);
        assert_eq!(zone.cell_variable_range(), 2..4);
        assert_eq!(zone.get("E"), Some("1"));
        assert_eq!(zone.get("T"), Some("\"frame\""));
        assert_eq!(zone.get("DATAPACKING"), Some("BLOCK"));
    }

    #[test]
    fn test_parse_varlocation() {
        assert_eq!(parse_varlocation("([3-4]=CELLCENTERED)"), Ok((3, 4)));
        assert_eq!(parse_varlocation("( [ 5 - 12 ] = CELLCENTERED )"), Ok((5, 12)));
        assert_eq!(parse_varlocation("([7]=CELLCENTERED)"), Ok((7, 7)));
        assert!(matches!(
            parse_varlocation("([a-b]=CELLCENTERED)"),
            Err(FormatErrorKind::MalformedVarLocation(_))
        ));
        assert!(matches!(
            parse_varlocation("(3-4=CELLCENTERED)"),
            Err(FormatErrorKind::MalformedVarLocation(_))
        ));
        assert!(matches!(
            parse_varlocation("([3-4]=CELLCENTERED"),
            Err(FormatErrorKind::UnterminatedDelimiter { .. })
        ));
    }

    #[test]
    fn test_zone_missing_keys() {
        assert_eq!(
            parse_zone_line("ZONE VARLOCATION=([1-1]=CELLCENTERED)", 1),
            Err(TecplotError::format(
                0,
                FormatErrorKind::MissingZoneKey(NODE_COUNT_KEY)
            ))
        );
        assert_eq!(
            parse_zone_line("ZONE N=4", 1),
            Err(TecplotError::format(
                0,
                FormatErrorKind::MissingZoneKey(VARLOCATION_KEY)
            ))
        );
    }

    #[test]
    fn test_zone_bad_values() {
        assert!(matches!(
            parse_zone_line("ZONE N=0, VARLOCATION=([1-1]=CELLCENTERED)", 1),
            Err(TecplotError::Format {
                kind: FormatErrorKind::InvalidNodeCount(_),
                ..
            })
        ));
        assert!(matches!(
            parse_zone_line("ZONE N=four, VARLOCATION=([1-1]=CELLCENTERED)", 1),
            Err(TecplotError::Format {
                kind: FormatErrorKind::InvalidNodeCount(_),
                ..
            })
        ));
        assert!(matches!(
            parse_zone_line("ZONE N=4, DATAPACKING, VARLOCATION=([1-1]=CELLCENTERED)", 1),
            Err(TecplotError::Format {
                kind: FormatErrorKind::MalformedZoneField(_),
                ..
            })
        ));
    }

    #[test]
    fn test_zone_range_errors() {
        let err = parse_zone_line("ZONE N=4, VARLOCATION=([3-5]=CELLCENTERED)", 4).unwrap_err();
        assert_eq!(
            err,
            TecplotError::Range(RangeError::VarLocation {
                lo: 3,
                hi: 5,
                variables: 4
            })
        );
        assert!(parse_zone_line("ZONE N=4, VARLOCATION=([0-2]=CELLCENTERED)", 4)
            .unwrap_err()
            .is_range_error());
        assert!(parse_zone_line("ZONE N=4, VARLOCATION=([3-2]=CELLCENTERED)", 4)
            .unwrap_err()
            .is_range_error());
    }

    #[test]
    fn test_read_header() {
        let text = format!("TITLE = \"run\"\nVARIABLES = \"z(m)\"\n\"r(m)\"\n\n\"p\"\n\"T\"\n{ZONE}\n1.0\n");
        let mut stream = Cursor::new(text);
        let mut reader = LineReader::at(&mut stream, 0).unwrap();
        let header = read_header(&mut reader, true).unwrap();

        assert_eq!(header.variables, ["z(m)", "r(m)", "p", "T"]);
        assert_eq!(header.nodal_variables(), ["z(m)", "r(m)"]);
        assert_eq!(header.cell_variables(), ["p", "T"]);
        assert_eq!(reader.line_number(), 7);
    }

    #[test]
    fn test_read_header_without_title() {
        let text = format!("\"z(m)\"\n\"r(m)\"\n\"p\"\n\"T\"\n{ZONE}\n");
        let mut stream = Cursor::new(text);
        let mut reader = LineReader::at(&mut stream, 0).unwrap();
        let header = read_header(&mut reader, false).unwrap();
        assert_eq!(header.variables.len(), 4);
    }

    #[test]
    fn test_read_header_errors() {
        let mut stream = Cursor::new("TITLE\n\"z(m)\"\n\"r(m)\"\n");
        let mut reader = LineReader::at(&mut stream, 0).unwrap();
        assert_eq!(
            read_header(&mut reader, true),
            Err(TecplotError::format(4, FormatErrorKind::MissingZone))
        );

        let mut stream = Cursor::new("TITLE\n\"z(m)\"\nr(m)\nZONE N=1\n");
        let mut reader = LineReader::at(&mut stream, 0).unwrap();
        assert_eq!(
            read_header(&mut reader, true),
            Err(TecplotError::format(
                3,
                FormatErrorKind::UnquotedVariable("r(m)".into())
            ))
        );

        let mut stream = Cursor::new("TITLE\n\"z(m)\"\nZONE N=1, VARLOCATION=([1-1]=CELLCENTERED\n");
        let mut reader = LineReader::at(&mut stream, 0).unwrap();
        assert!(matches!(
            read_header(&mut reader, true),
            Err(TecplotError::Format {
                line: 3,
                kind: FormatErrorKind::UnterminatedDelimiter { .. }
            })
        ));
    }
}
