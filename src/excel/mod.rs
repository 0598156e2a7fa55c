//! Excel module for reading and writing multi-sheet workbooks.
//!
//! This module provides:
//! - Letter-addressed column selections (`"D"`, `"D:J,L"`)
//! - Reading the selected columns of every sheet
//! - Writing a multi-sheet workbook in one pass
//! - File checksums for run logs

pub mod columns;
pub mod types;
pub mod reader;
pub mod writer;

// Re-export commonly used types and functions
pub use columns::{column_index_to_letter, column_letter_to_index, ColumnSelection};
pub use types::*;
pub use reader::{compute_checksum, read_workbook};
pub use writer::write_workbook;
