use crate::excel::{CellValue, Sheet};
use crate::pipeline::events::EventSink;

use super::types::{TranslateError, Translator};

/// How a column translation ended
#[derive(Debug)]
pub enum ColumnOutcome {
    /// `count` values were translated (zero when the column had no text)
    Translated { count: usize },
    /// The column is not in the sheet
    Missing,
    /// The provider call failed; the column keeps its original text
    Failed(TranslateError),
}

/// Translate the non-empty values of one column in a single batch.
///
/// Non-empty values are converted to text and sent in row order; empty cells
/// are never sent and stay empty. Results are written back to exactly the
/// rows they came from. A failed call leaves the text untranslated.
pub async fn translate_column(
    sheet: &Sheet,
    column: &str,
    translator: &dyn Translator,
    target_lang: &str,
    sink: &EventSink,
) -> (Sheet, ColumnOutcome) {
    let Some(col_idx) = sheet.column_index(column) else {
        sink.warn(format!("Column {} not found, skipping translation.", column));
        return (sheet.clone(), ColumnOutcome::Missing);
    };

    let mut result = sheet.clone();
    let mut positions = Vec::new();
    let mut texts = Vec::new();

    for (row_idx, row) in result.rows.iter_mut().enumerate() {
        if row.len() <= col_idx {
            row.resize(col_idx + 1, CellValue::Empty);
        }
        if let Some(text) = row[col_idx].as_text() {
            row[col_idx] = CellValue::String(text.clone());
            positions.push(row_idx);
            texts.push(text);
        }
    }

    if texts.is_empty() {
        return (result, ColumnOutcome::Translated { count: 0 });
    }

    let translated = match translator.translate(&texts, target_lang).await {
        Ok(translated) if translated.len() == texts.len() => translated,
        Ok(translated) => {
            let e = TranslateError::LengthMismatch {
                expected: texts.len(),
                actual: translated.len(),
            };
            sink.error(format!("Error translating {}: {}", column, e));
            return (result, ColumnOutcome::Failed(e));
        }
        Err(e) => {
            sink.error(format!("Error translating {}: {}", column, e));
            return (result, ColumnOutcome::Failed(e));
        }
    };

    let count = translated.len();
    for (row_idx, text) in positions.into_iter().zip(translated) {
        result.rows[row_idx][col_idx] = CellValue::String(text);
    }

    (result, ColumnOutcome::Translated { count })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::events::{event_channel, LogLevel, PipelineEvent};
    use crate::translate::testing::ScriptedTranslator;

    fn sheet(values: Vec<CellValue>) -> Sheet {
        Sheet::with_rows(
            "S1",
            vec!["Scene".into(), "Other".into()],
            values.into_iter().map(|v| vec![v, CellValue::text("keep")]).collect(),
        )
    }

    #[tokio::test]
    async fn test_only_non_empty_values_are_sent_and_realigned() {
        let translator = ScriptedTranslator::upper();
        let source = sheet(vec![
            CellValue::text("a"),
            CellValue::Empty,
            CellValue::Number(3.0),
            CellValue::Empty,
            CellValue::text("e"),
        ]);

        let (out, outcome) =
            translate_column(&source, "Scene", &translator, "EN-US", &EventSink::disabled()).await;

        assert!(matches!(outcome, ColumnOutcome::Translated { count: 3 }));
        assert_eq!(translator.calls(), vec![vec!["a".to_string(), "3".to_string(), "e".to_string()]]);

        let scene: Vec<CellValue> = out.rows.iter().map(|r| r[0].clone()).collect();
        assert_eq!(
            scene,
            vec![
                CellValue::text("[EN-US] A"),
                CellValue::Empty,
                CellValue::text("[EN-US] 3"),
                CellValue::Empty,
                CellValue::text("[EN-US] E"),
            ]
        );
        assert!(out.rows.iter().all(|r| r[1] == CellValue::text("keep")));
    }

    #[tokio::test]
    async fn test_all_empty_column_makes_no_call() {
        let translator = ScriptedTranslator::upper();
        let source = sheet(vec![CellValue::Empty, CellValue::Empty]);

        let (out, outcome) =
            translate_column(&source, "Scene", &translator, "EN-US", &EventSink::disabled()).await;

        assert!(matches!(outcome, ColumnOutcome::Translated { count: 0 }));
        assert!(translator.calls().is_empty());
        assert_eq!(out, source);
    }

    #[tokio::test]
    async fn test_failure_keeps_original_text_and_logs_error() {
        let translator = ScriptedTranslator::failing();
        let source = sheet(vec![CellValue::text("a"), CellValue::Number(2.0)]);
        let (sink, mut rx) = event_channel();

        let (out, outcome) = translate_column(&source, "Scene", &translator, "EN-US", &sink).await;

        assert!(matches!(outcome, ColumnOutcome::Failed(_)));
        assert_eq!(out.rows[0][0], CellValue::text("a"));
        assert_eq!(out.rows[1][0], CellValue::text("2"));

        match rx.try_recv() {
            Ok(PipelineEvent::Log { level, message, .. }) => {
                assert_eq!(level, LogLevel::Error);
                assert!(message.starts_with("Error translating Scene"));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_short_result_is_treated_as_failure() {
        let translator = ScriptedTranslator::dropping_last();
        let source = sheet(vec![CellValue::text("a"), CellValue::text("b")]);

        let (out, outcome) =
            translate_column(&source, "Scene", &translator, "EN-US", &EventSink::disabled()).await;

        assert!(matches!(
            outcome,
            ColumnOutcome::Failed(TranslateError::LengthMismatch { expected: 2, actual: 1 })
        ));
        assert_eq!(out.rows[0][0], CellValue::text("a"));
    }

    #[tokio::test]
    async fn test_missing_column_is_skipped() {
        let translator = ScriptedTranslator::upper();
        let source = sheet(vec![CellValue::text("a")]);
        let (sink, mut rx) = event_channel();

        let (out, outcome) = translate_column(&source, "Nope", &translator, "EN-US", &sink).await;

        assert!(matches!(outcome, ColumnOutcome::Missing));
        assert_eq!(out, source);
        assert!(matches!(
            rx.try_recv(),
            Ok(PipelineEvent::Log { level: LogLevel::Warning, .. })
        ));
    }
}
