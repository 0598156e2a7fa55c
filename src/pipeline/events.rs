use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use super::types::{RunState, SheetOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }
}

/// Progress and log events published while a run executes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineEvent {
    Log {
        level: LogLevel,
        message: String,
        /// Milliseconds since the Unix epoch
        timestamp: i64,
    },
    StateChanged {
        state: RunState,
    },
    SheetFinished {
        sheet: String,
        outcome: SheetOutcome,
    },
}

/// Where the pipeline sends its events.
///
/// A sink without a receiver (or whose receiver was dropped) swallows events.
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    tx: Option<mpsc::UnboundedSender<PipelineEvent>>,
}

impl EventSink {
    pub fn new(tx: mpsc::UnboundedSender<PipelineEvent>) -> Self {
        EventSink { tx: Some(tx) }
    }

    pub fn disabled() -> Self {
        EventSink { tx: None }
    }

    pub fn emit(&self, event: PipelineEvent) {
        if let Some(ref tx) = self.tx {
            let _ = tx.send(event);
        }
    }

    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        self.emit(PipelineEvent::Log {
            level,
            message: message.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        });
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.log(LogLevel::Warning, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    pub fn state(&self, state: RunState) {
        self.emit(PipelineEvent::StateChanged { state });
    }
}

/// Create an event channel and a sink feeding it.
///
/// The channel is unbounded so a run never stalls on a slow consumer.
pub fn event_channel() -> (EventSink, mpsc::UnboundedReceiver<PipelineEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSink::new(tx), rx)
}
