pub mod cli;
pub mod config;
pub mod excel;
pub mod pipeline;
pub mod translate;

pub use cli::run;
pub use config::{AuthKey, ConfigError, PipelineConfig, Settings};
pub use pipeline::{run_pipeline, spawn_pipeline, EventSink, PipelineError, PipelineEvent, RunSummary};
pub use translate::{DeepLClient, TranslateError, Translator};
