use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

use crate::config::PipelineConfig;
use crate::excel::{self, ColumnSelection, ExcelError, Sheet, Workbook};
use crate::translate::{translate_column, ColumnOutcome, Translator};

use super::boundary::resolve_boundary;
use super::deriver::derive_fields;
use super::events::{event_channel, EventSink, PipelineEvent};
use super::filter::filter_workbook;
use super::normalizer::normalize;
use super::reconciler::{format_names, reconcile};
use super::types::*;

/// A sheet that made it through the per-sheet pipeline
#[derive(Debug, Clone)]
pub struct ProcessedSheet {
    pub sheet: Sheet,
    /// Columns left untranslated because the provider call failed
    pub untranslated: Vec<String>,
}

/// Output of the in-memory part of a run
#[derive(Debug, Clone, Default)]
pub struct ProcessedWorkbooks {
    pub output: Workbook,
    pub outcomes: Vec<(String, SheetOutcome)>,
    pub reconciliation: Reconciliation,
    pub translation_failures: usize,
}

/// Normalize, cut, derive and translate one incoming sheet
pub async fn process_sheet(
    raw: &Sheet,
    previous: &Workbook,
    added: &BTreeSet<String>,
    translator: &dyn Translator,
    target_lang: &str,
    sink: &EventSink,
) -> Result<ProcessedSheet, SheetError> {
    let normalized = normalize(raw)?;

    let boundary = resolve_boundary(&raw.name, &normalized, previous, added);
    let unprocessed = boundary.apply(&normalized)?;

    let mut sheet = derive_fields(&unprocessed);
    let mut untranslated = Vec::new();

    for column in TRANSLATED_COLUMNS {
        let (translated, outcome) = translate_column(&sheet, column, translator, target_lang, sink).await;
        if let ColumnOutcome::Failed(_) = outcome {
            untranslated.push(column.to_string());
        }
        sheet = translated;
    }

    Ok(ProcessedSheet { sheet, untranslated })
}

/// Filter, reconcile and process every incoming sheet, in incoming order.
///
/// Sheet-level failures are logged and skipped; this never fails as a whole.
pub async fn process_workbooks(
    previous: &Workbook,
    incoming: &Workbook,
    exclusions: &[String],
    translator: &dyn Translator,
    target_lang: &str,
    sink: &EventSink,
) -> ProcessedWorkbooks {
    sink.state(RunState::Filtering);
    sink.info("Preprocessing sheets...");
    let filtered = filter_workbook(incoming, exclusions);

    sink.state(RunState::Reconciling);
    let reconciliation = reconcile(previous.sheet_names(), filtered.sheet_names());
    let previous_names: BTreeSet<String> = previous.sheet_names().map(str::to_string).collect();
    let latest_names: BTreeSet<String> = filtered.sheet_names().map(str::to_string).collect();
    sink.info(format!("Previous worksheets: {}", format_names(&previous_names)));
    sink.info(format!("Latest worksheets: {}", format_names(&latest_names)));
    sink.info(format!("Newly added worksheets: {}", format_names(&reconciliation.added)));
    sink.info(format!("Deleted worksheets: {}", format_names(&reconciliation.removed)));

    let mut result = ProcessedWorkbooks {
        reconciliation,
        ..ProcessedWorkbooks::default()
    };

    for raw in filtered.sheets() {
        sink.state(RunState::Processing(raw.name.clone()));
        sink.info(format!("Processing {}...", raw.name));

        let outcome = match process_sheet(
            raw,
            previous,
            &result.reconciliation.added,
            translator,
            target_lang,
            sink,
        )
        .await
        {
            Ok(processed) => {
                let rows = processed.sheet.row_count();
                sink.info(format!("{} processing complete.", raw.name));
                result.translation_failures += processed.untranslated.len();
                result.output.insert(processed.sheet);
                SheetOutcome::Written {
                    rows,
                    untranslated: processed.untranslated,
                }
            }
            Err(reason) => {
                match &reason {
                    SheetError::SchemaMismatch { found, expected } => sink.warn(format!(
                        "Skipping {} due to missing columns ({} of {}).",
                        raw.name, found, expected
                    )),
                    SheetError::NoNewRows(NoNewRowsCause::MarkerNotFound { marker }) => sink.info(format!(
                        "No new rows to translate in {} (last processed value '{}' not found).",
                        raw.name, marker
                    )),
                    SheetError::NoNewRows(_) => {
                        sink.info(format!("No new rows to translate in {}.", raw.name))
                    }
                }
                SheetOutcome::Skipped { reason }
            }
        };

        sink.emit(PipelineEvent::SheetFinished {
            sheet: raw.name.clone(),
            outcome: outcome.clone(),
        });
        result.outcomes.push((raw.name.clone(), outcome));
    }

    result
}

/// Read both workbooks, process them and write the output once.
///
/// Only configuration, source-read and output-write failures end the run.
pub async fn run_pipeline(
    config: &PipelineConfig,
    translator: &dyn Translator,
    sink: &EventSink,
) -> Result<RunSummary, PipelineError> {
    sink.state(RunState::Idle);
    if let Err(e) = config.validate() {
        sink.error(e.to_string());
        return Err(e.into());
    }

    let run_id = uuid::Uuid::new_v4().to_string();
    sink.info("Starting Excel processing...");

    sink.state(RunState::Reading);
    sink.info(format!("Reading previous file: {}", config.previous_path.display()));
    let previous = match read_source(&config.previous_path, PREVIOUS_COLUMNS, sink).await {
        Ok(workbook) => as_marker_workbook(workbook),
        Err(e) => return Err(fail(sink, e)),
    };

    sink.info(format!("Reading new file: {}", config.incoming_path.display()));
    let incoming = match read_source(&config.incoming_path, INCOMING_COLUMNS, sink).await {
        Ok(workbook) => workbook,
        Err(e) => return Err(fail(sink, e)),
    };

    let processed = process_workbooks(
        &previous,
        &incoming,
        &config.exclusions,
        translator,
        &config.target_lang,
        sink,
    )
    .await;

    let output_written = if processed.output.is_empty() {
        sink.warn(format!(
            "No sheet has new rows; {} was not written.",
            config.output_path.display()
        ));
        false
    } else {
        sink.state(RunState::Writing);
        sink.info(format!("Writing output to: {}", config.output_path.display()));
        if let Err(e) = write_output(processed.output.clone(), &config.output_path).await {
            return Err(fail(sink, e));
        }
        true
    };

    let (sheets_written, sheets_skipped) = split_outcomes(&processed.outcomes);
    let destination = if output_written {
        format!("Output saved to {}", config.output_path.display())
    } else {
        "No output file was written".to_string()
    };
    sink.info(format!(
        "Processing completed. {} sheet(s) written, {} skipped. {}",
        sheets_written.len(),
        sheets_skipped.len(),
        destination
    ));
    sink.state(RunState::Done);

    Ok(RunSummary {
        run_id,
        output_path: config.output_path.clone(),
        output_written,
        sheets_written,
        sheets_skipped,
        added_sheets: processed.reconciliation.added,
        removed_sheets: processed.reconciliation.removed,
        translation_failures: processed.translation_failures,
    })
}

/// Run the pipeline on a tokio task.
///
/// Returns the task handle and the receiving end of the run's event stream;
/// the stream closes once the run is over.
pub fn spawn_pipeline(
    config: PipelineConfig,
    translator: Arc<dyn Translator>,
) -> (
    JoinHandle<Result<RunSummary, PipelineError>>,
    UnboundedReceiver<PipelineEvent>,
) {
    let (sink, rx) = event_channel();

    let handle = tokio::spawn(async move { run_pipeline(&config, translator.as_ref(), &sink).await });

    (handle, rx)
}

/// The previous workbook only carries column D; call it `Product`
fn as_marker_workbook(previous: Workbook) -> Workbook {
    previous
        .into_sheets()
        .into_iter()
        .map(|mut sheet| {
            if let Some(first) = sheet.columns.first_mut() {
                *first = PRODUCT.to_string();
            }
            sheet
        })
        .collect()
}

fn split_outcomes(outcomes: &[(String, SheetOutcome)]) -> (Vec<String>, Vec<(String, SheetError)>) {
    let mut written = Vec::new();
    let mut skipped = Vec::new();

    for (name, outcome) in outcomes {
        match outcome {
            SheetOutcome::Written { .. } => written.push(name.clone()),
            SheetOutcome::Skipped { reason } => skipped.push((name.clone(), reason.clone())),
        }
    }

    (written, skipped)
}

fn fail(sink: &EventSink, error: PipelineError) -> PipelineError {
    sink.error(error.to_string());
    sink.state(RunState::Failed);
    error
}

async fn read_source(path: &Path, columns: &str, sink: &EventSink) -> Result<Workbook, PipelineError> {
    let source_error = |source: ExcelError| PipelineError::SourceRead {
        path: path.to_path_buf(),
        source,
    };

    let selection = ColumnSelection::parse(columns).map_err(source_error)?;
    let owned = path.to_path_buf();

    let (workbook, checksum) = tokio::task::spawn_blocking(move || -> Result<_, ExcelError> {
        let workbook = excel::read_workbook(&owned, &selection)?;
        let checksum = excel::compute_checksum(&owned)?;
        Ok((workbook, checksum))
    })
    .await
    .map_err(|e| PipelineError::Task(e.to_string()))?
    .map_err(source_error)?;

    sink.info(format!(
        "Read {} sheet(s) from {} (sha256 {})",
        workbook.len(),
        path.display(),
        checksum
    ));

    Ok(workbook)
}

async fn write_output(output: Workbook, path: &Path) -> Result<(), PipelineError> {
    let owned = path.to_path_buf();

    tokio::task::spawn_blocking(move || excel::write_workbook(&output, &owned))
        .await
        .map_err(|e| PipelineError::Task(e.to_string()))?
        .map_err(|source| PipelineError::OutputWrite {
            path: path.to_path_buf(),
            source,
        })
}
