use futures::future::BoxFuture;
use thiserror::Error;

/// Default target language code
pub const DEFAULT_TARGET_LANG: &str = "EN-US";

/// A text translation service.
///
/// `translate` returns one string per input, in the same order.
pub trait Translator: Send + Sync {
    fn translate<'a>(
        &'a self,
        texts: &'a [String],
        target_lang: &'a str,
    ) -> BoxFuture<'a, Result<Vec<String>, TranslateError>>;
}

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("Failed to create HTTP client: {0}")]
    Client(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Authorization failed, check the API key")]
    Unauthorized,

    #[error("Translation quota exceeded")]
    QuotaExceeded,

    #[error("Too many requests, rate limited by the provider")]
    RateLimited,

    #[error("Provider returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Expected {expected} translations, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

impl From<reqwest::Error> for TranslateError {
    fn from(e: reqwest::Error) -> Self {
        TranslateError::Request(e.to_string())
    }
}
