//! Command-line front end: collects paths and the credential, runs the
//! pipeline on a background task and prints its event stream.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use crate::config::{parse_exclusions, AuthKey, ConfigError, PipelineConfig, Settings, AUTH_KEY_ENV};
use crate::pipeline::{spawn_pipeline, LogLevel, PipelineEvent, RunSummary};
use crate::translate::{DeepLClient, Translator};

#[derive(Debug, Parser)]
#[command(name = "sheet-delta")]
#[command(about = "Process and translate the rows added to a workbook since the previous run", long_about = None)]
pub struct Cli {
    /// Previous processed workbook (column D holds the product of each row)
    #[arg(long)]
    pub previous: Option<PathBuf>,

    /// Newly exported workbook
    #[arg(long)]
    pub incoming: Option<PathBuf>,

    /// Output workbook (defaults to output.xlsx next to the incoming file)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Comma-separated sheet/column names to drop
    #[arg(long)]
    pub exclude: Option<String>,

    /// Target language code
    #[arg(long)]
    pub target_lang: Option<String>,

    /// DeepL API key (also read from DEEPL_AUTH_KEY)
    #[arg(long)]
    pub auth_key: Option<String>,

    /// Override the DeepL API base URL
    #[arg(long)]
    pub api_url: Option<String>,

    /// JSON settings file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> Settings {
        Settings {
            previous_path: self.previous.clone(),
            incoming_path: self.incoming.clone(),
            output_path: self.output.clone(),
            auth_key: self.auth_key.clone().map(AuthKey::new),
            exclusions: self.exclude.as_deref().map(parse_exclusions),
            target_lang: self.target_lang.clone(),
            api_url: self.api_url.clone(),
        }
    }

    /// Settings file, then environment, then flags
    pub fn resolve(&self) -> Result<PipelineConfig, ConfigError> {
        let file_settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => match Settings::default_path().filter(|p| p.exists()) {
                Some(path) => Settings::load(&path)?,
                None => Settings::default(),
            },
        };

        let env_settings = Settings {
            auth_key: std::env::var(AUTH_KEY_ENV)
                .ok()
                .filter(|key| !key.trim().is_empty())
                .map(AuthKey::new),
            ..Settings::default()
        };

        file_settings
            .merge(env_settings)
            .merge(self.overrides())
            .into_config()
    }
}

/// Render one event as `YYYY-MM-DD HH:MM:SS - LEVEL - message`
pub fn format_event(event: &PipelineEvent) -> Option<(LogLevel, String)> {
    match event {
        PipelineEvent::Log {
            level,
            message,
            timestamp,
        } => {
            let time = chrono::DateTime::<chrono::Utc>::from_timestamp_millis(*timestamp)
                .map(|t| t.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default();
            Some((*level, format!("{} - {} - {}", time, level.as_str(), message)))
        }
        _ => None,
    }
}

fn print_summary(summary: &RunSummary) {
    println!("Run {}", summary.run_id);
    println!("  Sheets written: {}", summary.sheets_written.len());
    for (sheet, reason) in &summary.sheets_skipped {
        println!("  Skipped {}: {}", sheet, reason);
    }
    if summary.translation_failures > 0 {
        println!("  Columns left untranslated: {}", summary.translation_failures);
    }
}

/// Entry point used by the binary
pub fn run() -> ExitCode {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let translator: Arc<dyn Translator> = match DeepLClient::new(config.auth_key.clone(), config.api_url.clone()) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to start async runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    runtime.block_on(async move {
        let (handle, mut rx) = spawn_pipeline(config, translator);

        while let Some(event) = rx.recv().await {
            match format_event(&event) {
                Some((LogLevel::Info, line)) => println!("{}", line),
                Some((_, line)) => eprintln!("{}", line),
                None => {}
            }
        }

        match handle.await {
            Ok(Ok(summary)) => {
                print_summary(&summary);
                ExitCode::SUCCESS
            }
            Ok(Err(_)) => ExitCode::FAILURE,
            Err(e) => {
                eprintln!("Task join error: {}", e);
                ExitCode::FAILURE
            }
        }
    })
}
