use crate::excel::Workbook;

/// Drop excluded sheets, then excluded columns from the sheets that remain.
///
/// The same list applies to sheet names and column headers. Names that match
/// nothing are ignored. Sheet and column order is preserved.
pub fn filter_workbook<S: AsRef<str>>(workbook: &Workbook, exclusions: &[S]) -> Workbook {
    let is_excluded = |name: &str| exclusions.iter().any(|e| e.as_ref() == name);

    workbook
        .sheets()
        .iter()
        .filter(|sheet| !is_excluded(&sheet.name))
        .map(|sheet| sheet.without_columns(exclusions))
        .collect()
}
