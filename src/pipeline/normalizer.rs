use crate::excel::{CellValue, Sheet};

use super::types::{SheetError, EXPECTED_SCHEMA};

/// Rename a raw sheet's columns onto the expected schema, by position.
///
/// The Nth raw column becomes the Nth schema column whatever its header
/// says. Columns past the schema width are dropped. Sheets with fewer
/// columns than the schema are rejected. Rows shorter than the schema are
/// padded with empty cells.
pub fn normalize(sheet: &Sheet) -> Result<Sheet, SheetError> {
    let expected = EXPECTED_SCHEMA.len();

    if sheet.col_count() < expected {
        return Err(SheetError::SchemaMismatch {
            found: sheet.col_count(),
            expected,
        });
    }

    Ok(Sheet {
        name: sheet.name.clone(),
        columns: EXPECTED_SCHEMA.iter().map(|c| c.to_string()).collect(),
        rows: sheet
            .rows
            .iter()
            .map(|row| {
                let mut row: Vec<CellValue> = row.iter().take(expected).cloned().collect();
                row.resize(expected, CellValue::Empty);
                row
            })
            .collect(),
    })
}
