use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Represents a cell value with type information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum CellValue {
    Empty,
    String(String),
    Number(f64),
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Empty
    }
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::String(value.into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Display form used for comparisons, derivation and translation.
    ///
    /// Integral numbers render without a fractional part so that `42.0`
    /// read from one workbook matches the text `42` in another.
    pub fn display(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::String(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
        }
    }

    /// Display form, or `None` for an empty cell
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            other => Some(other.display()),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

static EMPTY_CELL: CellValue = CellValue::Empty;

/// A single worksheet: ordered header names plus row-major cell data.
///
/// `with_rows` sizes every row to `columns.len()` cells. Readers of the
/// rows treat a missing trailing cell as `Empty`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Sheet {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a sheet, padding or cutting each row to the header width
    pub fn with_rows(
        name: impl Into<String>,
        columns: Vec<String>,
        rows: Vec<Vec<CellValue>>,
    ) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Empty);
                row
            })
            .collect();

        Sheet {
            name: name.into(),
            columns,
            rows,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Iterate over the cells of a named column, top to bottom.
    /// Rows too short to reach the column yield `Empty`.
    pub fn column_values<'a>(&'a self, name: &str) -> Option<impl Iterator<Item = &'a CellValue> + 'a> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| row.get(idx).unwrap_or(&EMPTY_CELL)))
    }

    /// Copy of this sheet without the named columns. Unknown names are ignored.
    pub fn without_columns<S: AsRef<str>>(&self, names: &[S]) -> Sheet {
        let keep: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| !names.iter().any(|n| n.as_ref() == c.as_str()))
            .map(|(idx, _)| idx)
            .collect();

        Sheet {
            name: self.name.clone(),
            columns: keep.iter().map(|&i| self.columns[i].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| keep.iter().map(|&i| row.get(i).cloned().unwrap_or_default()).collect())
                .collect(),
        }
    }

    /// Copy of the rows starting at `start`; empty when `start` is past the end
    pub fn rows_from(&self, start: usize) -> Sheet {
        Sheet {
            name: self.name.clone(),
            columns: self.columns.clone(),
            rows: self.rows.iter().skip(start).cloned().collect(),
        }
    }
}

/// An ordered collection of uniquely named sheets
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Workbook::default()
    }

    /// Add a sheet, replacing any existing sheet with the same name in place
    pub fn insert(&mut self, sheet: Sheet) {
        match self.sheets.iter_mut().find(|s| s.name == sheet.name) {
            Some(existing) => *existing = sheet,
            None => self.sheets.push(sheet),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.iter().map(|s| s.name.as_str())
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn into_sheets(self) -> Vec<Sheet> {
        self.sheets
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

impl FromIterator<Sheet> for Workbook {
    fn from_iter<I: IntoIterator<Item = Sheet>>(iter: I) -> Self {
        let mut workbook = Workbook::new();
        for sheet in iter {
            workbook.insert(sheet);
        }
        workbook
    }
}

/// Excel-specific errors
#[derive(Debug, Error)]
pub enum ExcelError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid column selection '{0}'")]
    InvalidSelection(String),

    #[error("{0}")]
    Read(String),

    #[error("{0}")]
    Write(String),
}

impl ExcelError {
    pub fn read_error(message: impl Into<String>) -> Self {
        ExcelError::Read(message.into())
    }

    pub fn write_error(message: impl Into<String>) -> Self {
        ExcelError::Write(message.into())
    }
}
