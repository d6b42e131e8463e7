//! Rendering of normalized listings
//!
//! Two independent paths share one [`Table`]:
//! - persisted CSV (RFC4180, headered, `\n` terminated)
//! - terminal text (headerless, optionally colorized)

use crate::error::{ExportError, Result};
use owo_colors::{AnsiColors, OwoColorize};
use std::path::Path;

/// Separator between fields of a multi-column row on the terminal
pub const ROW_GLYPH: &str = " • ";

/// Separator between values of a single-column listing on the terminal
pub const VALUE_SEPARATOR: &str = ", ";

/// Ordered rows under named columns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Single-column table from already ordered values
    pub fn single(column: &str, values: Vec<String>) -> Self {
        Self {
            columns: vec![column.to_string()],
            rows: values.into_iter().map(|v| vec![v]).collect(),
        }
    }

    pub fn with_rows(mut self, rows: Vec<Vec<String>>) -> Self {
        self.rows = rows;
        self
    }

    pub fn is_single_column(&self) -> bool {
        self.columns.len() == 1
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn to_csv(&self) -> Result<String> {
        if self.is_single_column() {
            let values: Vec<&str> = self.rows.iter().map(|r| first(r)).collect();
            single_column_csv(&self.columns[0], &values)
        } else {
            multi_column_csv(&self.columns, &self.rows)
        }
    }
}

fn first(row: &[String]) -> &str {
    row.first().map(String::as_str).unwrap_or_default()
}

/// Quote a field only when it holds a comma, quote, CR or LF
pub fn escape_field(value: Option<&str>) -> String {
    let value = value.unwrap_or_default();
    if value.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// `album_artist` -> `Album Artist`
pub fn format_header(name: &str) -> String {
    name.split('_')
        .filter(|t| !t.is_empty())
        .map(|token| {
            let mut chars = token.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn writer() -> csv::Writer<Vec<u8>> {
    writer_into(Vec::new())
}

fn writer_into(buf: Vec<u8>) -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(buf)
}

fn into_bytes(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| ExportError::Csv(csv::Error::from(e.into_error())))
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = into_bytes(writer)?;
    String::from_utf8(bytes).map_err(|e| ExportError::Config(format!("non UTF-8 output: {}", e)))
}

/// Header line followed by one escaped value per line
///
/// An empty value is an empty line. The csv writer quotes a lone empty
/// field as `""`, so those lines bypass it.
pub fn single_column_csv<S: AsRef<str>>(header: &str, values: &[S]) -> Result<String> {
    let mut wtr = writer();
    wtr.write_record([format_header(header)])?;
    for value in values {
        let value = value.as_ref();
        if value.is_empty() {
            let mut buf = into_bytes(wtr)?;
            buf.push(b'\n');
            wtr = writer_into(buf);
        } else {
            wtr.write_record([value])?;
        }
    }
    finish(wtr)
}

/// Header line of formatted column names, then one comma-joined line per row
///
/// Rows shorter than the header are padded with empty fields.
pub fn multi_column_csv<C: AsRef<str>>(columns: &[C], rows: &[Vec<String>]) -> Result<String> {
    let mut wtr = writer();
    wtr.write_record(columns.iter().map(|c| format_header(c.as_ref())))?;
    for row in rows {
        wtr.write_record((0..columns.len()).map(|i| row.get(i).map(String::as_str).unwrap_or("")))?;
    }
    finish(wtr)
}

/// Display color for a column role
pub fn column_color(column: &str) -> AnsiColors {
    match column {
        "title" | "track" => AnsiColors::Cyan,
        "artist" => AnsiColors::Green,
        "album_artist" => AnsiColors::BrightGreen,
        "album" => AnsiColors::Blue,
        "playlist" => AnsiColors::Yellow,
        _ => AnsiColors::White,
    }
}

fn paint(value: &str, column: &str, colored: bool) -> String {
    if colored {
        value.color(column_color(column)).to_string()
    } else {
        value.to_string()
    }
}

/// Headerless terminal rendering
///
/// Single-column tables print as one comma-joined line; multi-column tables
/// print one row per line with fields joined by [`ROW_GLYPH`].
pub fn render_terminal(table: &Table, colored: bool) -> String {
    if table.is_empty() {
        return String::new();
    }

    if table.is_single_column() {
        let column = &table.columns[0];
        let line = table
            .rows
            .iter()
            .map(|r| paint(first(r), column, colored))
            .collect::<Vec<_>>()
            .join(VALUE_SEPARATOR);
        return format!("{}\n", line);
    }

    let glyph = if colored {
        ROW_GLYPH.dimmed().to_string()
    } else {
        ROW_GLYPH.to_string()
    };
    let mut out = String::new();
    for row in &table.rows {
        let fields: Vec<String> = table
            .columns
            .iter()
            .enumerate()
            .map(|(i, column)| paint(row.get(i).map(String::as_str).unwrap_or(""), column, colored))
            .collect();
        out.push_str(&fields.join(&glyph));
        out.push('\n');
    }
    out
}

/// Write `contents` to `path` in one piece
///
/// Data goes to a sibling temp file first and is renamed into place, so a
/// failed write never leaves a partial export behind.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let write_error = |e: std::io::Error| ExportError::FileWrite {
        path: path.to_path_buf(),
        detail: e.to_string(),
    };

    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    if let Err(e) = std::fs::write(&temp_path, contents) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(write_error(e));
    }
    if let Err(e) = std::fs::rename(&temp_path, path) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(write_error(e));
    }

    tracing::debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}
