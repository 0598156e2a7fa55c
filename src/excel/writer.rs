use std::path::Path;
use umya_spreadsheet::{new_file_empty_worksheet, writer, Worksheet};

use super::types::{CellValue, ExcelError, Sheet, Workbook};

/// Write every sheet of a workbook to a new `.xlsx` file.
///
/// The header row goes first, followed by the data rows. The file is built
/// in memory and written once.
pub fn write_workbook(workbook: &Workbook, output_path: &Path) -> Result<(), ExcelError> {
    if workbook.is_empty() {
        return Err(ExcelError::write_error("Workbook has no sheets to write"));
    }

    let mut book = new_file_empty_worksheet();

    for sheet in workbook.sheets() {
        let worksheet = book
            .new_sheet(&sheet.name)
            .map_err(|e| ExcelError::write_error(format!("Failed to create sheet '{}': {}", sheet.name, e)))?;
        fill_worksheet(worksheet, sheet);
    }

    writer::xlsx::write(&book, output_path)
        .map_err(|e| ExcelError::write_error(format!("Failed to write file: {}", e)))
}

fn fill_worksheet(worksheet: &mut Worksheet, sheet: &Sheet) {
    for (col_idx, header) in sheet.columns.iter().enumerate() {
        let col_num = (col_idx + 1) as u32;
        worksheet.get_cell_mut((col_num, 1)).set_value_string(header);
    }

    // Data starts below the header row; Excel uses 1-based indexing
    for (row_idx, row) in sheet.rows.iter().enumerate() {
        let row_num = row_idx as u32 + 2;

        for (col_idx, cell) in row.iter().enumerate() {
            let col_num = (col_idx + 1) as u32;

            match cell {
                CellValue::Empty => {}
                // Typed as text so values like "00123" or "TRUE" survive
                CellValue::String(s) => {
                    worksheet.get_cell_mut((col_num, row_num)).set_value_string(s);
                }
                CellValue::Number(n) => {
                    worksheet.get_cell_mut((col_num, row_num)).set_value_number(*n);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::excel::columns::ColumnSelection;
    use crate::excel::reader::read_workbook;

    #[test]
    fn test_write_then_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");

        let workbook: Workbook = vec![
            Sheet::with_rows(
                "First",
                vec!["Name".into(), "Count".into()],
                vec![
                    vec![CellValue::text("alpha"), CellValue::Number(3.0)],
                    vec![CellValue::text("beta"), CellValue::Empty],
                ],
            ),
            Sheet::with_rows("Second", vec!["Only".into()], vec![vec![CellValue::text("x")]]),
        ]
        .into_iter()
        .collect();

        write_workbook(&workbook, &path).unwrap();

        let selection = ColumnSelection::parse("A:B").unwrap();
        let read = read_workbook(&path, &selection).unwrap();

        let names: Vec<&str> = read.sheet_names().collect();
        assert_eq!(names, vec!["First", "Second"]);

        let first = read.get("First").unwrap();
        assert_eq!(first.columns, vec!["Name", "Count"]);
        assert_eq!(first.rows[0], vec![CellValue::text("alpha"), CellValue::Number(3.0)]);
        assert_eq!(first.rows[1], vec![CellValue::text("beta"), CellValue::Empty]);
    }

    #[test]
    fn test_numeric_looking_text_stays_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");

        let row = vec![CellValue::text("3"), CellValue::text("TRUE"), CellValue::text("00123")];
        let workbook: Workbook = vec![Sheet::with_rows(
            "S1",
            vec!["1".into(), "Code".into(), "Id".into()],
            vec![row.clone()],
        )]
        .into_iter()
        .collect();

        write_workbook(&workbook, &path).unwrap();

        let read = read_workbook(&path, &ColumnSelection::parse("A:C").unwrap()).unwrap();
        let sheet = read.get("S1").unwrap();
        assert_eq!(sheet.columns, vec!["1", "Code", "Id"]);
        assert_eq!(sheet.rows[0], row);
    }

    #[test]
    fn test_write_empty_workbook_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_workbook(&Workbook::new(), &dir.path().join("out.xlsx")).unwrap_err();
        assert!(matches!(err, ExcelError::Write(_)));
    }
}
