use crate::excel::{CellValue, Sheet};

use super::types::{COMMENTS, MODEL_REQUIREMENTS, NOT_AVAILABLE, REQUIREMENTS, SCENE, SHOOTING_REQUIREMENTS};

/// Fill placeholders and build `Shooting_Requirements` from the note columns.
///
/// `Shooting_Requirements = Comments + "\r" + Requirements`, with missing
/// values read as empty text. `Requirements` and `Comments` are dropped
/// afterwards. Returns a new sheet.
pub fn derive_fields(sheet: &Sheet) -> Sheet {
    let model_idx = sheet.column_index(MODEL_REQUIREMENTS);
    let scene_idx = sheet.column_index(SCENE);
    let comments_idx = sheet.column_index(COMMENTS);
    let requirements_idx = sheet.column_index(REQUIREMENTS);

    let mut columns = sheet.columns.clone();
    columns.push(SHOOTING_REQUIREMENTS.to_string());

    let rows = sheet
        .rows
        .iter()
        .map(|row| {
            let mut out = row.clone();
            out.resize(sheet.col_count(), CellValue::Empty);

            if let Some(i) = model_idx {
                if out[i].is_empty() {
                    out[i] = CellValue::text(NOT_AVAILABLE);
                }
            }
            if let Some(i) = scene_idx {
                out[i] = match &out[i] {
                    CellValue::Empty => CellValue::text(NOT_AVAILABLE),
                    other => CellValue::String(other.display()),
                };
            }

            let shooting = format!("{}\r{}", text_at(row, comments_idx), text_at(row, requirements_idx));
            out.push(CellValue::String(shooting));
            out
        })
        .collect();

    Sheet {
        name: sheet.name.clone(),
        columns,
        rows,
    }
    .without_columns(&[REQUIREMENTS, COMMENTS])
}

fn text_at(row: &[CellValue], idx: Option<usize>) -> String {
    idx.and_then(|i| row.get(i)).map(CellValue::display).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::{EXPECTED_SCHEMA, PRODUCT};

    fn normalized(rows: Vec<Vec<CellValue>>) -> Sheet {
        Sheet::with_rows(
            "S1",
            EXPECTED_SCHEMA.iter().map(|c| c.to_string()).collect(),
            rows,
        )
    }

    fn cell(sheet: &Sheet, row: usize, column: &str) -> CellValue {
        sheet.rows[row][sheet.column_index(column).unwrap()].clone()
    }

    #[test]
    fn test_shooting_requirements_joins_comments_then_requirements() {
        let mut row = vec![CellValue::Empty; 8];
        row[0] = CellValue::text("p");
        row[6] = CellValue::text("fix it");
        row[7] = CellValue::text("broken");

        let derived = derive_fields(&normalized(vec![row]));
        assert_eq!(cell(&derived, 0, SHOOTING_REQUIREMENTS), CellValue::text("broken\rfix it"));
        assert!(derived.column_index(REQUIREMENTS).is_none());
        assert!(derived.column_index(COMMENTS).is_none());
    }

    #[test]
    fn test_output_column_order() {
        let derived = derive_fields(&normalized(vec![]));
        assert_eq!(
            derived.columns,
            vec![PRODUCT, "ASIN", MODEL_REQUIREMENTS, "Total_Video", SCENE, "Pets", SHOOTING_REQUIREMENTS]
        );
    }

    #[test]
    fn test_missing_values_become_placeholders() {
        let row = vec![CellValue::Empty; 8];
        let derived = derive_fields(&normalized(vec![row]));

        assert_eq!(cell(&derived, 0, MODEL_REQUIREMENTS), CellValue::text("N/A"));
        assert_eq!(cell(&derived, 0, SCENE), CellValue::text("N/A"));
        assert_eq!(cell(&derived, 0, SHOOTING_REQUIREMENTS), CellValue::text("\r"));
    }

    #[test]
    fn test_scene_is_stringified_and_model_keeps_type() {
        let mut row = vec![CellValue::Empty; 8];
        row[2] = CellValue::Number(2.0);
        row[4] = CellValue::Number(3.0);
        row[7] = CellValue::Number(5.0);

        let derived = derive_fields(&normalized(vec![row]));
        assert_eq!(cell(&derived, 0, MODEL_REQUIREMENTS), CellValue::Number(2.0));
        assert_eq!(cell(&derived, 0, SCENE), CellValue::text("3"));
        assert_eq!(cell(&derived, 0, SHOOTING_REQUIREMENTS), CellValue::text("5\r"));
    }

    #[test]
    fn test_input_is_not_mutated() {
        let source = normalized(vec![vec![CellValue::Empty; 8]]);
        let _ = derive_fields(&source);
        assert_eq!(source.col_count(), 8);
        assert!(source.rows[0][2].is_empty());
    }
}
