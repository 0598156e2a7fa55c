//! In-memory translator used by the unit tests.

use futures::future::BoxFuture;
use std::sync::Mutex;

use super::types::{TranslateError, Translator};

#[derive(Debug, Clone, Copy)]
enum Mode {
    Upper,
    Fail,
    DropLast,
}

/// Records every batch it receives and answers according to its mode
#[derive(Debug)]
pub struct ScriptedTranslator {
    mode: Mode,
    calls: Mutex<Vec<Vec<String>>>,
}

impl ScriptedTranslator {
    /// Answers `"[<lang>] <TEXT IN UPPER CASE>"` for every input
    pub fn upper() -> Self {
        Self::with_mode(Mode::Upper)
    }

    /// Fails every call as an unauthorized request
    pub fn failing() -> Self {
        Self::with_mode(Mode::Fail)
    }

    /// Returns one translation fewer than requested
    pub fn dropping_last() -> Self {
        Self::with_mode(Mode::DropLast)
    }

    fn with_mode(mode: Mode) -> Self {
        ScriptedTranslator {
            mode,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

impl Translator for ScriptedTranslator {
    fn translate<'a>(
        &'a self,
        texts: &'a [String],
        target_lang: &'a str,
    ) -> BoxFuture<'a, Result<Vec<String>, TranslateError>> {
        self.calls.lock().unwrap().push(texts.to_vec());
        let mode = self.mode;

        Box::pin(async move {
            let upper = || {
                texts
                    .iter()
                    .map(|t| format!("[{}] {}", target_lang, t.to_uppercase()))
                    .collect::<Vec<_>>()
            };

            match mode {
                Mode::Upper => Ok(upper()),
                Mode::Fail => Err(TranslateError::Unauthorized),
                Mode::DropLast => {
                    let mut out = upper();
                    out.pop();
                    Ok(out)
                }
            }
        })
    }
}
