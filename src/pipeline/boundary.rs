use std::collections::BTreeSet;

use crate::excel::{Sheet, Workbook};

use super::types::{NoNewRowsCause, SheetError, PRODUCT};

/// Where the unprocessed rows of a sheet begin
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Boundary {
    /// Nothing was processed before: the whole sheet is new
    Full,
    /// The marker sits at `marker_row`; new rows start right after it
    After { marker_row: usize },
    /// The marker is not in the sheet, so no row can be trusted as new
    MarkerMissing { marker: String },
}

impl Boundary {
    /// Index of the first unprocessed row, if any can be identified
    pub fn start_row(&self) -> Option<usize> {
        match self {
            Boundary::Full => Some(0),
            Boundary::After { marker_row } => Some(marker_row + 1),
            Boundary::MarkerMissing { .. } => None,
        }
    }

    /// Cut the already-processed rows off the front of `sheet`
    pub fn apply(&self, sheet: &Sheet) -> Result<Sheet, SheetError> {
        let start = match self {
            Boundary::MarkerMissing { marker } => {
                return Err(SheetError::NoNewRows(NoNewRowsCause::MarkerNotFound {
                    marker: marker.clone(),
                }));
            }
            other => other.start_row().unwrap_or(0),
        };

        let remaining = sheet.rows_from(start);
        if remaining.is_empty() {
            let cause = match self {
                Boundary::After { .. } => NoNewRowsCause::MarkerAtEnd,
                _ => NoNewRowsCause::NoDataRows,
            };
            return Err(SheetError::NoNewRows(cause));
        }

        Ok(remaining)
    }
}

/// Last non-missing `Product` value of a previous-run sheet
pub fn marker_value(previous_sheet: &Sheet) -> Option<String> {
    previous_sheet
        .column_values(PRODUCT)?
        .filter_map(|v| v.as_text())
        .last()
}

/// Find where unprocessed rows begin in a normalized incoming sheet.
///
/// When the marker occurs more than once, the first occurrence wins: rows
/// between duplicates are re-included rather than silently skipped.
pub fn resolve_boundary(
    sheet_name: &str,
    normalized: &Sheet,
    previous: &Workbook,
    added: &BTreeSet<String>,
) -> Boundary {
    if added.contains(sheet_name) {
        return Boundary::Full;
    }

    let Some(previous_sheet) = previous.get(sheet_name) else {
        return Boundary::Full;
    };

    let Some(marker) = marker_value(previous_sheet) else {
        return Boundary::Full;
    };

    let position = normalized
        .column_values(PRODUCT)
        .and_then(|mut values| values.position(|v| v.as_text().as_deref() == Some(marker.as_str())));

    match position {
        Some(marker_row) => Boundary::After { marker_row },
        None => Boundary::MarkerMissing { marker },
    }
}
