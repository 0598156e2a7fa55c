use regex::Regex;
use std::sync::OnceLock;

use super::types::ExcelError;

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([A-Za-z]{1,3})(?::([A-Za-z]{1,3}))?$").expect("column token pattern is valid")
    })
}

/// A set of letter-addressed columns such as `"D"` or `"D:J,L"`.
///
/// Indices are 0-based, in the order they were listed, without duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSelection {
    indices: Vec<u32>,
}

impl ColumnSelection {
    /// Parse a comma-separated list of column letters and inclusive ranges
    pub fn parse(spec: &str) -> Result<Self, ExcelError> {
        let mut indices = Vec::new();

        for token in spec.split(',').map(str::trim) {
            let caps = token_pattern()
                .captures(token)
                .ok_or_else(|| ExcelError::InvalidSelection(spec.to_string()))?;

            let start = column_letter_to_index(&caps[1])
                .ok_or_else(|| ExcelError::InvalidSelection(spec.to_string()))?;
            let end = match caps.get(2) {
                Some(m) => column_letter_to_index(m.as_str())
                    .ok_or_else(|| ExcelError::InvalidSelection(spec.to_string()))?,
                None => start,
            };

            if end < start {
                return Err(ExcelError::InvalidSelection(spec.to_string()));
            }

            for idx in start..=end {
                if !indices.contains(&idx) {
                    indices.push(idx);
                }
            }
        }

        Ok(ColumnSelection { indices })
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Convert column index (0-based) to Excel column letter (A, B, ..., Z, AA, AB, ...)
pub fn column_index_to_letter(index: u32) -> String {
    let mut result = String::new();
    let mut n = index + 1;

    while n > 0 {
        n -= 1;
        let c = (b'A' + (n % 26) as u8) as char;
        result.insert(0, c);
        n /= 26;
    }

    result
}

/// Convert an Excel column letter to a 0-based index
pub fn column_letter_to_index(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }

    let mut n: u32 = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let digit = (c.to_ascii_uppercase() as u8 - b'A') as u32 + 1;
        n = n.checked_mul(26)?.checked_add(digit)?;
    }

    Some(n - 1)
}
