use futures::future::BoxFuture;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::types::{TranslateError, Translator};
use crate::config::AuthKey;

const FREE_API_URL: &str = "https://api-free.deepl.com";
const PRO_API_URL: &str = "https://api.deepl.com";

/// Most texts DeepL accepts in one request
pub const MAX_TEXTS_PER_REQUEST: usize = 50;

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    text: &'a [String],
    target_lang: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
struct Translation {
    #[allow(dead_code)]
    detected_source_language: Option<String>,
    text: String,
}

/// DeepL v2 REST client
#[derive(Debug)]
pub struct DeepLClient {
    client: reqwest::Client,
    base_url: String,
    auth_key: AuthKey,
}

impl DeepLClient {
    /// Create a client. Free-plan keys (`...:fx`) go to the free endpoint
    /// unless `base_url` overrides it.
    pub fn new(auth_key: AuthKey, base_url: Option<String>) -> Result<Self, TranslateError> {
        // Connect timeout only: a slow translation is allowed to take its time
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| TranslateError::Client(e.to_string()))?;

        Ok(Self::with_client(client, auth_key, base_url))
    }

    /// Create a client around an already configured `reqwest::Client`
    pub fn with_client(client: reqwest::Client, auth_key: AuthKey, base_url: Option<String>) -> Self {
        let base_url = base_url
            .unwrap_or_else(|| default_base_url(&auth_key).to_string())
            .trim_end_matches('/')
            .to_string();

        Self {
            client,
            base_url,
            auth_key,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn translate_chunk(&self, texts: &[String], target_lang: &str) -> Result<Vec<String>, TranslateError> {
        let url = format!("{}/v2/translate", self.base_url);
        let body = TranslateRequest {
            text: texts,
            target_lang,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("DeepL-Auth-Key {}", self.auth_key.expose()))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(status_error(status, text));
        }

        let parsed: TranslateResponse = response.json().await?;
        let translated: Vec<String> = parsed.translations.into_iter().map(|t| t.text).collect();

        if translated.len() != texts.len() {
            return Err(TranslateError::LengthMismatch {
                expected: texts.len(),
                actual: translated.len(),
            });
        }

        Ok(translated)
    }
}

impl Translator for DeepLClient {
    fn translate<'a>(
        &'a self,
        texts: &'a [String],
        target_lang: &'a str,
    ) -> BoxFuture<'a, Result<Vec<String>, TranslateError>> {
        Box::pin(async move {
            let mut translated = Vec::with_capacity(texts.len());
            for chunk in texts.chunks(MAX_TEXTS_PER_REQUEST) {
                translated.extend(self.translate_chunk(chunk, target_lang).await?);
            }
            Ok(translated)
        })
    }
}

fn default_base_url(auth_key: &AuthKey) -> &'static str {
    if auth_key.expose().ends_with(":fx") {
        FREE_API_URL
    } else {
        PRO_API_URL
    }
}

fn status_error(status: StatusCode, body: String) -> TranslateError {
    match status.as_u16() {
        401 | 403 => TranslateError::Unauthorized,
        429 => TranslateError::RateLimited,
        456 => TranslateError::QuotaExceeded,
        code => TranslateError::Http { status: code, body },
    }
}
