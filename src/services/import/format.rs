//! Upload parsing: CSV and spreadsheet files into raw rows keyed by lowercase header

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use thiserror::Error;
use tracing::debug;

use crate::types::{RawRow, SourceRow};

/// Row number of the first data row; the header occupies row 1
pub const FIRST_DATA_ROW: usize = 2;

/// Delimiters tried when sniffing a CSV header line
const CSV_DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("Invalid file format. Only CSV, XLS, XLSX are supported.")]
    UnsupportedFormat,

    #[error("File is empty or invalid format")]
    EmptyFile,

    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to read spreadsheet: {0}")]
    Spreadsheet(String),
}

/// Supported upload formats, picked by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Csv,
    Xlsx,
    Xls,
}

impl FileFormat {
    fn from_file_name(file_name: &str) -> Result<Self, FormatError> {
        let lower = file_name.trim().to_lowercase();
        if lower.ends_with(".csv") {
            Ok(FileFormat::Csv)
        } else if lower.ends_with(".xlsx") {
            Ok(FileFormat::Xlsx)
        } else if lower.ends_with(".xls") {
            Ok(FileFormat::Xls)
        } else {
            Err(FormatError::UnsupportedFormat)
        }
    }
}

/// Parse an uploaded file into rows. Fails with `EmptyFile` when there is no data row.
///
/// Rows whose cells are all blank are kept; rejecting them is up to validation.
pub fn parse_upload(file_name: &str, bytes: &[u8]) -> Result<Vec<SourceRow>, FormatError> {
    let format = FileFormat::from_file_name(file_name)?;

    let rows = match format {
        FileFormat::Csv => parse_csv(bytes)?,
        FileFormat::Xlsx | FileFormat::Xls => parse_spreadsheet(bytes)?,
    };

    debug!("Parsed {} rows from '{}' ({:?})", rows.len(), file_name, format);

    if rows.is_empty() {
        return Err(FormatError::EmptyFile);
    }
    Ok(rows)
}

fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase()
}

/// Pick the delimiter that occurs most often in the header line
fn sniff_delimiter(content: &[u8]) -> u8 {
    let header_line = content
        .split(|&b| b == b'\n')
        .next()
        .unwrap_or_default();

    let mut best = (b',', 0usize);
    for delimiter in CSV_DELIMITERS {
        let count = header_line.iter().filter(|&&b| b == delimiter).count();
        if count > best.1 {
            best = (delimiter, count);
        }
    }
    best.0
}

fn parse_csv(bytes: &[u8]) -> Result<Vec<SourceRow>, FormatError> {
    let content = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(sniff_delimiter(content))
        .has_headers(true)
        .flexible(true)
        .from_reader(content);

    let headers: Vec<String> = reader.headers()?.iter().map(normalize_header).collect();

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        // csv skips empty lines; its line number still matches the source
        let number = record
            .position()
            .map(|pos| pos.line() as usize)
            .unwrap_or(idx + FIRST_DATA_ROW);

        let fields: RawRow = headers
            .iter()
            .zip(record.iter())
            .filter(|(header, _)| !header.is_empty())
            .map(|(header, value)| (header.clone(), value.to_string()))
            .collect();

        rows.push(SourceRow { number, fields });
    }
    Ok(rows)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}

fn parse_spreadsheet(bytes: &[u8]) -> Result<Vec<SourceRow>, FormatError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| FormatError::Spreadsheet(e.to_string()))?;

    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.map_err(|e| FormatError::Spreadsheet(e.to_string()))?,
        None => return Ok(Vec::new()),
    };

    let mut sheet_rows = range.rows();
    let headers: Vec<String> = match sheet_rows.next() {
        Some(header_row) => header_row
            .iter()
            .map(|cell| normalize_header(&cell_to_string(cell)))
            .collect(),
        None => return Ok(Vec::new()),
    };

    let mut rows = Vec::new();
    for (idx, cells) in sheet_rows.enumerate() {
        let fields: RawRow = headers
            .iter()
            .zip(cells.iter())
            .filter(|(header, cell)| !header.is_empty() && !matches!(cell, Data::Empty))
            .map(|(header, cell)| (header.clone(), cell_to_string(cell)))
            .collect();

        rows.push(SourceRow {
            number: idx + FIRST_DATA_ROW,
            fields,
        });
    }
    Ok(rows)
}
