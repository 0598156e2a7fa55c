use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io;
use std::path::Path;

use super::columns::ColumnSelection;
use super::types::*;

/// Read the selected columns of every sheet in a workbook.
///
/// The first row of each sheet's used range is taken as the header row.
/// Selected columns lying beyond a sheet's used width are left out, so a
/// narrow sheet comes back with fewer columns than were asked for.
pub fn read_workbook(path: &Path, selection: &ColumnSelection) -> Result<Workbook, ExcelError> {
    if !path.exists() {
        return Err(ExcelError::FileNotFound(path.display().to_string()));
    }

    let mut workbook: Sheets<_> = open_workbook_auto(path)
        .map_err(|e| ExcelError::read_error(format!("Failed to open workbook: {}", e)))?;

    let sheet_names = workbook.sheet_names().to_vec();
    let mut result = Workbook::new();

    for name in sheet_names {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| ExcelError::read_error(format!("Failed to read sheet '{}': {}", name, e)))?;

        result.insert(sheet_from_range(&name, &range, selection));
    }

    Ok(result)
}

/// Build a sheet from a calamine range, keeping only the selected columns
fn sheet_from_range(name: &str, range: &Range<Data>, selection: &ColumnSelection) -> Sheet {
    if range.is_empty() {
        return Sheet::new(name, Vec::new());
    }

    let (row_count, col_count) = range.get_size();
    let (_, start_col) = range.start().unwrap_or((0, 0));
    let end_col = start_col + col_count as u32;

    // Absolute column -> position inside the range (None when left of it)
    let picked: Vec<Option<usize>> = selection
        .indices()
        .iter()
        .filter(|&&abs| abs < end_col)
        .map(|&abs| abs.checked_sub(start_col).map(|rel| rel as usize))
        .collect();

    let columns: Vec<String> = picked
        .iter()
        .enumerate()
        .map(|(pos, rel)| {
            let header = rel
                .and_then(|c| convert_cell_value(range.get((0, c))).as_text())
                .unwrap_or_default();
            if header.is_empty() {
                format!("Unnamed: {}", pos)
            } else {
                header
            }
        })
        .collect();

    let mut rows: Vec<Vec<CellValue>> = (1..row_count)
        .map(|row_idx| {
            picked
                .iter()
                .map(|rel| match rel {
                    Some(c) => convert_cell_value(range.get((row_idx, *c))),
                    None => CellValue::Empty,
                })
                .collect()
        })
        .collect();

    // Rows that are blank across the selection carry no data
    while rows
        .last()
        .map(|row| row.iter().all(CellValue::is_empty))
        .unwrap_or(false)
    {
        rows.pop();
    }

    Sheet::with_rows(name, columns, rows)
}

/// Convert calamine Data to our CellValue
fn convert_cell_value(cell: Option<&Data>) -> CellValue {
    match cell {
        None => CellValue::Empty,
        Some(data) => match data {
            Data::Empty => CellValue::Empty,
            Data::String(s) if s.is_empty() => CellValue::Empty,
            Data::String(s) => CellValue::String(s.clone()),
            Data::Float(f) => CellValue::Number(*f),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Bool(b) => CellValue::text(if *b { "True" } else { "False" }),
            Data::DateTime(dt) => CellValue::String(format_excel_datetime(dt.as_f64())),
            Data::DateTimeIso(s) => CellValue::String(s.clone()),
            Data::DurationIso(s) => CellValue::String(s.clone()),
            Data::Error(e) => CellValue::String(e.to_string()),
        },
    }
}

/// Excel serial date (days since 1899-12-30) as `YYYY-MM-DD HH:MM:SS`
fn format_excel_datetime(serial: f64) -> String {
    let millis = (serial * 86_400_000.0).round() as i64;
    chrono::NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|epoch| epoch + chrono::Duration::milliseconds(millis))
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| serial.to_string())
}

/// SHA-256 of a source file, hex encoded, for the run log
pub fn compute_checksum(path: &Path) -> Result<String, ExcelError> {
    let mut file = File::open(path)
        .map_err(|e| ExcelError::read_error(format!("Cannot open {} for checksum: {}", path.display(), e)))?;

    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)
        .map_err(|e| ExcelError::read_error(format!("Cannot hash {}: {}", path.display(), e)))?;

    Ok(format!("{:x}", hasher.finalize()))
}
