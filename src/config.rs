//! Run configuration.
//!
//! Settings come from an optional JSON file, the environment and the command
//! line; `Settings::into_config` validates the merged result before any
//! processing starts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::translate::DEFAULT_TARGET_LANG;

/// Environment variable holding the translation credential
pub const AUTH_KEY_ENV: &str = "DEEPL_AUTH_KEY";

/// Sheet and column names dropped by default (summary and image sheets)
pub const DEFAULT_EXCLUSIONS: [&str; 8] = [
    "1001总表", "829主图", "1001主图", "汇总", "401总表", "409主图", "5332", "25549",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Please select both previous and new Excel files.")]
    MissingSourcePath,

    #[error("Please specify an output file location.")]
    MissingOutputPath,

    #[error("Please enter a DeepL API key.")]
    MissingAuthKey,

    #[error("Failed to read settings file {path}: {message}")]
    SettingsFile { path: PathBuf, message: String },
}

/// Translation credential. Never printed: `Debug` and `Display` redact it.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthKey(String);

impl AuthKey {
    pub fn new(key: impl Into<String>) -> Self {
        AuthKey(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for AuthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthKey(***)")
    }
}

impl fmt::Display for AuthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// Validated configuration for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub previous_path: PathBuf,
    pub incoming_path: PathBuf,
    pub output_path: PathBuf,
    pub auth_key: AuthKey,
    pub exclusions: Vec<String>,
    pub target_lang: String,
    pub api_url: Option<String>,
}

impl PipelineConfig {
    /// Check required fields; nothing runs until this passes
    pub fn validate(&self) -> Result<(), ConfigError> {
        if is_blank(&self.previous_path) || is_blank(&self.incoming_path) {
            return Err(ConfigError::MissingSourcePath);
        }
        if is_blank(&self.output_path) {
            return Err(ConfigError::MissingOutputPath);
        }
        if self.auth_key.is_empty() {
            return Err(ConfigError::MissingAuthKey);
        }
        Ok(())
    }
}

fn is_blank(path: &Path) -> bool {
    path.as_os_str().is_empty()
}

/// Partial settings as found in a settings file or on the command line
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub previous_path: Option<PathBuf>,
    pub incoming_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub auth_key: Option<AuthKey>,
    pub exclusions: Option<Vec<String>>,
    pub target_lang: Option<String>,
    pub api_url: Option<String>,
}

impl Settings {
    /// `<config dir>/sheet-delta/settings.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sheet-delta").join("settings.json"))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SettingsFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| ConfigError::SettingsFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Overlay `other` on top of `self`; fields set in `other` win
    pub fn merge(self, other: Settings) -> Settings {
        Settings {
            previous_path: other.previous_path.or(self.previous_path),
            incoming_path: other.incoming_path.or(self.incoming_path),
            output_path: other.output_path.or(self.output_path),
            auth_key: other.auth_key.or(self.auth_key),
            exclusions: other.exclusions.or(self.exclusions),
            target_lang: other.target_lang.or(self.target_lang),
            api_url: other.api_url.or(self.api_url),
        }
    }

    /// Fill defaults and validate
    pub fn into_config(self) -> Result<PipelineConfig, ConfigError> {
        let previous_path = self.previous_path.unwrap_or_default();
        let incoming_path = self.incoming_path.unwrap_or_default();
        if is_blank(&previous_path) || is_blank(&incoming_path) {
            return Err(ConfigError::MissingSourcePath);
        }

        let output_path = match self.output_path {
            Some(path) => path,
            None => default_output_path(&incoming_path).ok_or(ConfigError::MissingOutputPath)?,
        };

        let config = PipelineConfig {
            previous_path,
            incoming_path,
            output_path,
            auth_key: self.auth_key.unwrap_or_default(),
            exclusions: self.exclusions.unwrap_or_else(default_exclusions),
            target_lang: self
                .target_lang
                .filter(|lang| !lang.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_TARGET_LANG.to_string()),
            api_url: self.api_url.filter(|url| !url.trim().is_empty()),
        };

        config.validate()?;
        Ok(config)
    }
}

pub fn default_exclusions() -> Vec<String> {
    DEFAULT_EXCLUSIONS.iter().map(|s| s.to_string()).collect()
}

/// Split a comma-separated name list, trimming blanks
pub fn parse_exclusions(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// `output.xlsx` next to the incoming file
pub fn default_output_path(incoming: &Path) -> Option<PathBuf> {
    if is_blank(incoming) {
        return None;
    }
    let dir = incoming.parent().unwrap_or_else(|| Path::new(""));
    Some(dir.join("output.xlsx"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_settings() -> Settings {
        Settings {
            previous_path: Some("prev.xlsx".into()),
            incoming_path: Some("data/new.xlsx".into()),
            output_path: Some("out.xlsx".into()),
            auth_key: Some(AuthKey::new("key")),
            ..Settings::default()
        }
    }

    #[test]
    fn test_parse_exclusions() {
        assert_eq!(parse_exclusions(" a, b,,c ,"), vec!["a", "b", "c"]);
        assert!(parse_exclusions("").is_empty());
    }

    #[test]
    fn test_defaults_are_filled() {
        let config = full_settings().into_config().unwrap();
        assert_eq!(config.target_lang, "EN-US");
        assert_eq!(config.exclusions.len(), 8);
        assert!(config.exclusions.contains(&"汇总".to_string()));
        assert!(config.api_url.is_none());
    }

    #[test]
    fn test_output_defaults_next_to_incoming() {
        let settings = Settings {
            output_path: None,
            ..full_settings()
        };
        let config = settings.into_config().unwrap();
        assert_eq!(config.output_path, PathBuf::from("data/output.xlsx"));
    }

    #[test]
    fn test_missing_fields_are_rejected() {
        let no_previous = Settings {
            previous_path: None,
            ..full_settings()
        };
        assert!(matches!(no_previous.into_config(), Err(ConfigError::MissingSourcePath)));

        let no_key = Settings {
            auth_key: Some(AuthKey::new("  ")),
            ..full_settings()
        };
        assert!(matches!(no_key.into_config(), Err(ConfigError::MissingAuthKey)));

        let nothing = Settings::default();
        assert!(matches!(nothing.into_config(), Err(ConfigError::MissingSourcePath)));

        let blank_output = Settings {
            output_path: Some(PathBuf::new()),
            ..full_settings()
        };
        assert!(matches!(blank_output.into_config(), Err(ConfigError::MissingOutputPath)));
    }

    #[test]
    fn test_merge_prefers_overlay() {
        let base = Settings {
            target_lang: Some("DE".into()),
            ..full_settings()
        };
        let overlay = Settings {
            output_path: Some("other.xlsx".into()),
            ..Settings::default()
        };

        let merged = base.merge(overlay);
        assert_eq!(merged.output_path, Some(PathBuf::from("other.xlsx")));
        assert_eq!(merged.target_lang.as_deref(), Some("DE"));
    }

    #[test]
    fn test_load_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{ "auth_key": "k:fx", "exclusions": ["S3"], "target_lang": "EN-GB" }"#,
        )
        .unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.auth_key, Some(AuthKey::new("k:fx")));
        assert_eq!(settings.exclusions, Some(vec!["S3".to_string()]));
        assert!(settings.previous_path.is_none());

        assert!(matches!(
            Settings::load(&dir.path().join("missing.json")),
            Err(ConfigError::SettingsFile { .. })
        ));
    }

    #[test]
    fn test_key_is_redacted() {
        let config = full_settings().into_config().unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("\"key\""));
        assert!(rendered.contains("AuthKey(***)"));
    }
}
