//! Delimited text to [`Table`] and back, with encoding and delimiter detection.
//!
//! Reading:
//! 1. Decode: UTF-8 (BOM stripped), falling back to the single-byte
//!    encoding `chardet` guesses (Latin-1 / Windows-1252 in practice)
//! 2. Detect the delimiter from the header line
//! 3. Parse with the `csv` crate (quoted fields, ragged rows tolerated)
//!
//! No record-type logic lives here.

use std::path::Path;

use encoding_rs::{Encoding, WINDOWS_1252};
use serde::Serialize;

use crate::error::{CsvError, CsvResult};
use crate::models::{cell_text, text_cell, Record, Table};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Candidate delimiters. Earlier entries win ties.
const DELIMITERS: [char; 4] = [',', ';', '\t', '|'];

/// Overrides for auto-detection.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Encoding label (`utf-8`, `latin-1`, `windows-1252`, ...).
    pub encoding: Option<String>,
    pub delimiter: Option<char>,
}

/// A parsed table and how it was read.
#[derive(Debug, Clone, Serialize)]
pub struct ParsedTable {
    pub table: Table,
    pub encoding: String,
    pub delimiter: char,
}

/// Guess the encoding of bytes that are not valid UTF-8.
pub fn detect_encoding(bytes: &[u8]) -> String {
    let charset = chardet::detect(bytes).0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        "" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode with an explicit encoding label.
pub fn decode_with(bytes: &[u8], label: &str) -> CsvResult<String> {
    let label = label.trim().to_lowercase();
    if label == "utf-8" || label == "utf8" {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        return String::from_utf8(bytes.to_vec()).map_err(|e| CsvError::Encoding(e.to_string()));
    }
    let encoding = match label.as_str() {
        "latin-1" | "latin1" => WINDOWS_1252,
        other => Encoding::for_label(other.as_bytes())
            .ok_or_else(|| CsvError::Encoding(format!("unknown encoding '{}'", other)))?,
    };
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(CsvError::Encoding(format!(
            "content is not valid {}",
            encoding.name()
        )));
    }
    Ok(text.into_owned())
}

/// Decode as UTF-8, falling back to Latin-1 / Windows-1252.
///
/// Returns the text and the encoding label used.
pub fn decode_content(bytes: &[u8]) -> (String, String) {
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    if let Ok(text) = std::str::from_utf8(body) {
        return (text.to_string(), "utf-8".to_string());
    }

    // Latin-1 decodes as its Windows-1252 superset.
    let label = match detect_encoding(bytes).as_str() {
        "iso-8859-1" => "iso-8859-1",
        _ => "windows-1252",
    };
    let (text, _, _) = WINDOWS_1252.decode(bytes);
    (text.into_owned(), label.to_string())
}

/// Pick the candidate delimiter occurring most often on the header line;
/// comma when none occurs.
pub fn detect_delimiter(content: &str) -> char {
    let header = content.lines().next().unwrap_or("");
    let mut best = DELIMITERS[0];
    let mut best_count = 0;
    for &candidate in &DELIMITERS {
        let count = header.matches(candidate).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}

/// Repeated headers get `.1`, `.2`, ... suffixes.
fn dedupe_headers(raw: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for header in raw {
        let mut name = header.clone();
        let mut n = 1;
        while out.contains(&name) {
            name = format!("{}.{}", header, n);
            n += 1;
        }
        out.push(name);
    }
    out
}

/// Parse decoded text with an explicit delimiter.
///
/// Empty cells become empty values; blank lines are skipped; short rows are
/// padded and extra fields ignored.
pub fn parse_str(content: &str, delimiter: char) -> CsvResult<Table> {
    if content.trim().is_empty() {
        return Err(CsvError::EmptyFile);
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .flexible(true)
        .has_headers(true)
        .from_reader(content.as_bytes());

    let headers = dedupe_headers(
        reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect(),
    );
    if headers.iter().all(|h| h.is_empty()) {
        return Err(CsvError::EmptyFile);
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        let row: Record = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), text_cell(record.get(i).unwrap_or(""))))
            .collect();
        rows.push(row);
    }

    Ok(Table {
        columns: headers,
        rows,
    })
}

/// Parse raw bytes, detecting what `options` leaves open.
pub fn parse_bytes(bytes: &[u8], options: &ParseOptions) -> CsvResult<ParsedTable> {
    if bytes.is_empty() {
        return Err(CsvError::EmptyFile);
    }
    let (content, encoding) = match &options.encoding {
        Some(label) => (decode_with(bytes, label)?, label.trim().to_lowercase()),
        None => decode_content(bytes),
    };
    let delimiter = options
        .delimiter
        .unwrap_or_else(|| detect_delimiter(&content));
    let table = parse_str(&content, delimiter)?;
    Ok(ParsedTable {
        table,
        encoding,
        delimiter,
    })
}

/// Read and parse a file.
pub fn read_table_file<P: AsRef<Path>>(path: P, options: &ParseOptions) -> CsvResult<ParsedTable> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes(&bytes, options)
}

/// Render a table as comma-separated UTF-8 text with a header row.
pub fn write_csv(table: &Table) -> CsvResult<String> {
    let write_err = |e: csv::Error| CsvError::Write(e.to_string());
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(&table.columns).map_err(write_err)?;
    for row in &table.rows {
        writer
            .write_record(table.columns.iter().map(|c| cell_text(row, c)))
            .map_err(write_err)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| CsvError::Write(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| CsvError::Write(e.to_string()))
}

/// Write a table to a CSV file.
pub fn write_csv_file<P: AsRef<Path>>(table: &Table, path: P) -> CsvResult<()> {
    std::fs::write(path.as_ref(), write_csv(table)?)?;
    Ok(())
}
