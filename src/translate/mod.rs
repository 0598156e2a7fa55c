//! Translation provider seam and the column adapter built on it.

pub mod column;
pub mod deepl;
pub mod types;

#[cfg(test)]
pub mod testing;

pub use column::{translate_column, ColumnOutcome};
pub use deepl::DeepLClient;
pub use types::{TranslateError, Translator, DEFAULT_TARGET_LANG};
