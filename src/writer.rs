//! # Delimited text output
//!
//! Serializes the tables of parsed frames to delimited text files, one file per frame.
//!
//! Layout of an output file
//! -----------------
//! ```text
//! # source: run/hall2de_movie.dat
//! # generated: 2024-05-01T12:00:00 UTC
//! # table: interpolated
//! # case = baseline
//! "z(m)","r(m)","ni","Te"
//! 0.5,0.5,1e17,3.2
//! ...
//! ```
//!
//! * metadata lines start with the comment prefix (`"# "` by default), parameters follow
//!   as `key = value`,
//! * the header row quotes every column name,
//! * floats use Rust's shortest round-trip form, node-index columns are plain integers.
//!
//! Multi-frame inputs get one file per frame, named with a zero-padded index
//! (`out.csv` → `out_0000.csv`, `out_0001.csv`, …). A single-frame input is written to the
//! requested path as-is.
use std::borrow::Cow;
use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::str::FromStr;

use camino::{Utf8Path, Utf8PathBuf};
use hifitime::Epoch;
use itertools::Itertools;
use log::{info, warn};

use crate::frames::TecplotFrames;
use crate::reader::{ReadOptions, TecplotFrame};
use crate::table::FieldTable;
use crate::tecplot_errors::TecplotError;

/// Which table of a frame is written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TableKind {
    Nodal,
    Cell,
    #[default]
    Interpolated,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TableKind::Nodal => "nodal",
            TableKind::Cell => "cell",
            TableKind::Interpolated => "interpolated",
        };
        f.write_str(name)
    }
}

impl FromStr for TableKind {
    type Err = TecplotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        [TableKind::Nodal, TableKind::Cell, TableKind::Interpolated]
            .into_iter()
            .find(|kind| kind.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| TecplotError::InvalidOption(format!("unknown table kind: {s}")))
    }
}

/// Metadata written at the top of an output file.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputHeader {
    pub source: Utf8PathBuf,
    pub generated: Epoch,
    pub kind: TableKind,
}

/// Output configuration.
///
/// Fields
/// -----------------
/// * `delimiter` – Field separator. Default: `b','`.
/// * `table_kind` – Table written for each frame. Default: [`TableKind::Interpolated`].
/// * `frame_digits` – Width of the zero-padded frame index of multi-frame outputs. Default: `4`.
/// * `comment_prefix` – Prefix of the metadata lines. Default: `"# "`.
/// * `parameters` – Extra `key = value` pairs echoed in the metadata, in order.
/// * `read` – Options used to parse the input.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteOptions {
    pub delimiter: u8,
    pub table_kind: TableKind,
    pub frame_digits: usize,
    pub comment_prefix: String,
    pub parameters: Vec<(String, String)>,
    pub read: ReadOptions,
}

impl Default for WriteOptions {
    fn default() -> Self {
        WriteOptions {
            delimiter: b',',
            table_kind: TableKind::default(),
            frame_digits: 4,
            comment_prefix: "# ".to_string(),
            parameters: Vec::new(),
            read: ReadOptions::default(),
        }
    }
}

impl WriteOptions {
    pub fn builder() -> WriteOptionsBuilder {
        WriteOptionsBuilder::new()
    }
}

/// Builder for [`WriteOptions`], validated by [`WriteOptionsBuilder::build`].
///
/// ```rust
/// use hallplot::writer::{TableKind, WriteOptions};
///
/// let options = WriteOptions::builder()
///     .delimiter(b'\t')
///     .table_kind(TableKind::Cell)
///     .parameter("case", "baseline")
///     .build()
///     .unwrap();
/// assert_eq!(options.parameters, [("case".to_string(), "baseline".to_string())]);
///
/// assert!(WriteOptions::builder().frame_digits(0).build().is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct WriteOptionsBuilder {
    options: WriteOptions,
}

impl WriteOptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delimiter(mut self, v: u8) -> Self {
        self.options.delimiter = v;
        self
    }

    pub fn table_kind(mut self, v: TableKind) -> Self {
        self.options.table_kind = v;
        self
    }

    pub fn frame_digits(mut self, v: usize) -> Self {
        self.options.frame_digits = v;
        self
    }

    pub fn comment_prefix(mut self, v: impl Into<String>) -> Self {
        self.options.comment_prefix = v.into();
        self
    }

    /// Append one `key = value` metadata pair.
    pub fn parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.parameters.push((key.into(), value.into()));
        self
    }

    pub fn read(mut self, v: ReadOptions) -> Self {
        self.options.read = v;
        self
    }

    /// Validate and return the options.
    ///
    /// Return
    /// ----------
    /// * [`TecplotError::InvalidOption`] if the delimiter could appear inside a number, a
    ///   quoted name or a comment, if `frame_digits` is zero, or if the comment prefix or a
    ///   parameter spans several lines.
    pub fn build(self) -> Result<WriteOptions, TecplotError> {
        let o = &self.options;

        let d = o.delimiter;
        if !d.is_ascii()
            || d.is_ascii_alphanumeric()
            || matches!(d, b'"' | b'#' | b'\n' | b'\r' | b'.' | b'-' | b'+')
        {
            return Err(TecplotError::InvalidOption(format!(
                "delimiter {:?} is not usable",
                d as char
            )));
        }
        if o.frame_digits == 0 {
            return Err(TecplotError::InvalidOption(
                "frame_digits must be >= 1".into(),
            ));
        }
        if o.comment_prefix.is_empty() || o.comment_prefix.contains('\n') {
            return Err(TecplotError::InvalidOption(
                "comment_prefix must be a non-empty single line".into(),
            ));
        }
        if let Some((key, _)) = o
            .parameters
            .iter()
            .find(|(k, v)| k.contains('\n') || v.contains('\n'))
        {
            return Err(TecplotError::InvalidOption(format!(
                "parameter {key:?} spans several lines"
            )));
        }

        Ok(self.options)
    }
}

/// Write `table` as delimited text, preceded by its metadata lines.
///
/// Arguments
/// -----------------
/// * `writer` – Destination.
/// * `table` – Table to serialize; one row per node or cell.
/// * `header` – Metadata echoed in the comment lines.
/// * `options` – Delimiter, comment prefix and extra parameters.
pub fn write_table<W: Write>(
    mut writer: W,
    table: &FieldTable,
    header: &OutputHeader,
    options: &WriteOptions,
) -> Result<(), TecplotError> {
    let prefix = &options.comment_prefix;
    writeln!(writer, "{prefix}source: {}", header.source)?;
    writeln!(writer, "{prefix}generated: {}", header.generated)?;
    writeln!(writer, "{prefix}table: {}", header.kind)?;
    for (key, value) in &options.parameters {
        writeln!(writer, "{prefix}{key} = {value}")?;
    }

    let names = table
        .names()
        .map(|name| format!("\"{}\"", name.replace('"', "\"\"")))
        .join(&(options.delimiter as char).to_string());
    writeln!(writer, "{names}")?;

    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(options.delimiter)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);
    for row in 0..table.row_count().unwrap_or(0) {
        csv_writer.write_record(
            table
                .iter()
                .map(|column| column.data.format_value(row).unwrap_or_default()),
        )?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Output path of frame `frame_index`.
///
/// Single-frame inputs keep `base`; multi-frame inputs get `_{index}` zero-padded to
/// `digits` inserted before the extension.
///
/// ```rust
/// use camino::Utf8Path;
/// use hallplot::writer::frame_output_path;
///
/// let base = Utf8Path::new("out/cells.csv");
/// assert_eq!(frame_output_path(base, 3, true, 4), "out/cells_0003.csv");
/// assert_eq!(frame_output_path(base, 0, false, 4), "out/cells.csv");
/// ```
pub fn frame_output_path(
    base: &Utf8Path,
    frame_index: usize,
    multi_frame: bool,
    digits: usize,
) -> Utf8PathBuf {
    if !multi_frame {
        return base.to_path_buf();
    }

    let stem = base.file_stem().unwrap_or_default();
    let name = match base.extension() {
        Some(ext) => format!("{stem}_{frame_index:0digits$}.{ext}"),
        None => format!("{stem}_{frame_index:0digits$}"),
    };
    base.with_file_name(name)
}

/// Table of `frame` selected by `kind`; the interpolated table is computed on demand.
pub fn select_table(
    frame: &TecplotFrame,
    kind: TableKind,
) -> Result<Cow<'_, FieldTable>, TecplotError> {
    Ok(match kind {
        TableKind::Nodal => Cow::Borrowed(&frame.nodal),
        TableKind::Cell => Cow::Borrowed(&frame.cells),
        TableKind::Interpolated => Cow::Owned(frame.interpolate()?),
    })
}

fn write_frame_file(
    path: &Utf8Path,
    frame: &TecplotFrame,
    source: &Utf8Path,
    options: &WriteOptions,
) -> Result<(), TecplotError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    if path.exists() {
        warn!("Overwriting existing output {path}");
    }

    let table = select_table(frame, options.table_kind)?;
    let header = OutputHeader {
        source: source.to_path_buf(),
        generated: Epoch::now()?,
        kind: options.table_kind,
    };

    let mut file = BufWriter::new(File::create(path)?);
    write_table(&mut file, &table, &header, options)?;
    file.flush()?;
    info!(
        "Wrote {} table ({} rows) to {path}",
        options.table_kind,
        table.row_count().unwrap_or(0)
    );
    Ok(())
}

/// Convert every frame of `input` to delimited text.
///
/// Arguments
/// -----------------
/// * `input` – Hall2De Tecplot file.
/// * `output` – Output path; for multi-frame inputs it is the base of the per-frame names
///   (see [`frame_output_path`]). Missing parent directories are created.
/// * `options` – Output options; `options.read` drives the parser.
///
/// Return
/// ----------
/// * The number of frames written.
/// * The first parse, interpolation or I/O error. Files of the frames before it are kept.
pub fn convert_file(
    input: &Utf8Path,
    output: &Utf8Path,
    options: &WriteOptions,
) -> Result<usize, TecplotError> {
    let mut multi_frame = false;
    let mut written = 0;

    for (index, frame) in TecplotFrames::open(input, options.read.clone())?.enumerate() {
        let frame = frame?;
        if index == 0 {
            multi_frame = !frame.is_last();
        }

        let path = frame_output_path(output, index, multi_frame, options.frame_digits);
        write_frame_file(&path, &frame, input, options)?;
        written += 1;
    }
    Ok(written)
}
