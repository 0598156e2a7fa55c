//! Incremental diff-and-transform pipeline.
//!
//! Per run: filter the incoming workbook, reconcile its sheet names with the
//! previous run, then for each sheet normalize the columns, cut the rows that
//! were already processed, derive fields and translate.

pub mod boundary;
pub mod deriver;
pub mod events;
pub mod filter;
pub mod normalizer;
pub mod orchestrator;
pub mod reconciler;
pub mod types;

pub use boundary::{marker_value, resolve_boundary, Boundary};
pub use deriver::derive_fields;
pub use events::{event_channel, EventSink, LogLevel, PipelineEvent};
pub use filter::filter_workbook;
pub use normalizer::normalize;
pub use orchestrator::{process_sheet, process_workbooks, run_pipeline, spawn_pipeline, ProcessedSheet, ProcessedWorkbooks};
pub use reconciler::reconcile;
pub use types::*;
