// Reading named sheets out of a spreadsheet into header + rows tables.
use crate::error::{ReportError, Result};
use crate::types::RawValue;
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub sheet: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<RawValue>>,
}

impl Table {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name.trim())
    }

    /// Values of one column, in row order.
    pub fn column(&self, idx: usize) -> Vec<RawValue> {
        self.rows
            .iter()
            .map(|r| r.get(idx).cloned().unwrap_or(RawValue::Missing))
            .collect()
    }

    /// Build a table from a header row and raw rows. Rows are padded or cut
    /// to the header width; fully empty rows are skipped.
    pub fn from_grid(sheet: &str, mut grid: impl Iterator<Item = Vec<RawValue>>) -> Result<Self> {
        let header_row = grid
            .by_ref()
            .find(|r| r.iter().any(|v| *v != RawValue::Missing))
            .ok_or_else(|| ReportError::EmptySheet(sheet.to_string()))?;
        let headers: Vec<String> = header_row
            .iter()
            .map(|v| match v {
                RawValue::Text(s) => s.trim().to_string(),
                RawValue::Number(n) => n.to_string(),
                RawValue::Date(d) => d.to_string(),
                RawValue::Missing => String::new(),
            })
            .collect();

        let width = headers.len();
        let rows = grid
            .filter(|r| r.iter().any(|v| *v != RawValue::Missing))
            .map(|mut r| {
                r.resize(width, RawValue::Missing);
                r
            })
            .collect();

        Ok(Table {
            sheet: sheet.to_string(),
            headers,
            rows,
        })
    }

    fn from_range(sheet: &str, range: &Range<Data>) -> Result<Self> {
        Self::from_grid(sheet, range.rows().map(|r| r.iter().map(cell_to_raw).collect()))
    }
}

pub fn cell_to_raw(cell: &Data) -> RawValue {
    match cell {
        Data::Float(v) => RawValue::Number(*v),
        Data::Int(v) => RawValue::Number(*v as f64),
        Data::String(s) => RawValue::Text(s.clone()),
        Data::Bool(b) => RawValue::Text(b.to_string()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(d) => RawValue::Date(d.date()),
            None => RawValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => RawValue::Text(s.clone()),
        Data::Error(_) | Data::Empty => RawValue::Missing,
    }
}

/// Read the named sheets from one workbook file, in the order asked for.
pub fn read_sheets(path: &Path, sheets: &[&str]) -> Result<Vec<Table>> {
    let mut workbook = open_workbook_auto(path)?;
    let available = workbook.sheet_names().to_owned();

    let mut tables = Vec::with_capacity(sheets.len());
    for name in sheets {
        if !available.iter().any(|s| s == name) {
            return Err(ReportError::SheetNotFound(name.to_string()));
        }
        let range = workbook.worksheet_range(name)?;
        let table = Table::from_range(name, &range)?;
        debug!(sheet = %name, rows = table.rows.len(), columns = table.headers.len(), "sheet read");
        tables.push(table);
    }
    Ok(tables)
}
