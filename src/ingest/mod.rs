//! Upload file parsing.
//!
//! Turns a CSV or spreadsheet file into raw JSON objects keyed by the header
//! row. Headers are not reconciled with any schema here; the normalizer does
//! that.

use crate::error::{StatsError, StatsResult};
use crate::models::number_value;
use calamine::{open_workbook_auto, Data, Reader};
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{debug, info};

/// Raw object produced by the parser.
pub type RawRecord = Map<String, Value>;

/// File formats the parser accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Spreadsheet,
}

impl FileKind {
    /// Detect the format from the extension, rejecting anything else.
    pub fn from_path(path: &Path) -> StatsResult<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" | "xls" | "xlsm" | "ods" => Ok(Self::Spreadsheet),
            _ => Err(StatsError::UnsupportedFileType(path.display().to_string())),
        }
    }
}

/// Parse an upload file into raw objects.
pub fn parse_file(path: &Path) -> StatsResult<Vec<RawRecord>> {
    let kind = FileKind::from_path(path)?;
    info!("Parsing {:?} file: {}", kind, path.display());

    let (headers, rows) = match kind {
        FileKind::Csv => read_csv(path)?,
        FileKind::Spreadsheet => read_spreadsheet(path)?,
    };

    if headers.iter().all(|h| h.is_empty()) {
        return Err(StatsError::MissingHeader(path.display().to_string()));
    }

    let records = if is_wide_country_sheet(&headers) {
        debug!("Pivoting wide country-by-year sheet");
        pivot_country_years(&headers, &rows)
    } else {
        rows.into_iter().map(|row| zip_row(&headers, row)).collect()
    };

    info!("Parsed {} rows from {}", records.len(), path.display());
    Ok(records)
}

fn read_csv(path: &Path) -> StatsResult<(Vec<String>, Vec<Vec<Value>>)> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        rows.push(record.iter().map(|cell| Value::String(cell.to_string())).collect());
    }

    Ok((headers, rows))
}

fn read_spreadsheet(path: &Path) -> StatsResult<(Vec<String>, Vec<Vec<Value>>)> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| StatsError::MissingHeader(path.display().to_string()))??;

    let mut rows_iter = range.rows();
    let headers: Vec<String> = match rows_iter.next() {
        Some(row) => row.iter().map(header_text).collect(),
        None => return Err(StatsError::MissingHeader(path.display().to_string())),
    };

    let rows = rows_iter
        .filter(|row| !row.iter().all(|cell| matches!(cell, Data::Empty)))
        .map(|row| row.iter().map(cell_value).collect())
        .collect();

    Ok((headers, rows))
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        other => other.to_string().trim().to_string(),
    }
}

fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Int(i) => Value::from(*i),
        Data::Float(f) => number_value(*f),
        Data::Bool(b) => Value::Bool(*b),
        Data::Empty => Value::String(String::new()),
        other => Value::String(other.to_string()),
    }
}

/// Pair each cell with its header; short rows get empty strings.
fn zip_row(headers: &[String], row: Vec<Value>) -> RawRecord {
    let mut cells = row.into_iter();
    headers
        .iter()
        .map(|header| {
            let value = cells.next().unwrap_or_else(|| Value::String(String::new()));
            (header.clone(), value)
        })
        .filter(|(header, _)| !header.is_empty())
        .collect()
}

fn is_year_header(header: &str) -> bool {
    header.len() == 4 && header.chars().all(|c| c.is_ascii_digit())
}

/// First header names the country column and some header is a year.
pub fn is_wide_country_sheet(headers: &[String]) -> bool {
    headers
        .first()
        .is_some_and(|h| h.to_ascii_lowercase().contains("country"))
        && headers.iter().any(|h| is_year_header(h))
}

/// Turn `country, 1981, 1982, …` rows into one object per year.
fn pivot_country_years(headers: &[String], rows: &[Vec<Value>]) -> Vec<RawRecord> {
    let year_columns: Vec<(usize, &str)> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| is_year_header(h))
        .map(|(i, h)| (i, h.as_str()))
        .collect();

    let mut by_year: Vec<RawRecord> = year_columns
        .iter()
        .map(|(_, year)| {
            let mut record = Map::new();
            record.insert("year".to_string(), Value::String(year.to_string()));
            record
        })
        .collect();

    for row in rows {
        let country = match row.first() {
            Some(Value::String(name)) if !name.trim().is_empty() => name.trim().to_string(),
            _ => continue,
        };
        for (slot, (column, _)) in by_year.iter_mut().zip(&year_columns) {
            let value = row.get(*column).cloned().unwrap_or(Value::Null);
            slot.insert(country.clone(), value);
        }
    }

    by_year
}
