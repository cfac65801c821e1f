//! `Translator` trait and the HTTP translation client.
//!
//! [`HttpTranslator`] calls the `translate_a/single` endpoint (the `gtx`
//! client of Google Translate).  Base URL, languages and timeout come from
//! [`TranslationConfig`]; nothing is hardcoded beyond the request shape.

use async_trait::async_trait;
use thiserror::Error;

use crate::config::TranslationConfig;

// ---------------------------------------------------------------------------
// TranslateError
// ---------------------------------------------------------------------------

/// Errors that can occur while translating.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// HTTP transport or connection error.
    #[error("translation request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("translation request timed out")]
    Timeout,

    /// The service answered with a non-success status.
    #[error("translation service returned HTTP {0}")]
    Status(u16),

    /// The response body was not in the expected shape.
    #[error("failed to parse translation response: {0}")]
    Parse(String),

    /// The service returned no translated text.
    #[error("translation service returned an empty result")]
    EmptyResult,
}

impl From<reqwest::Error> for TranslateError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TranslateError::Timeout
        } else if let Some(status) = e.status() {
            TranslateError::Status(status.as_u16())
        } else {
            TranslateError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Translator trait
// ---------------------------------------------------------------------------

/// Async machine-translation interface.
///
/// Implementors are `Send + Sync` so they can live behind an
/// `Arc<dyn Translator>` inside the pipeline task.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` from the configured source into the target language.
    async fn translate(&self, text: &str) -> Result<String, TranslateError>;
}

// ---------------------------------------------------------------------------
// HttpTranslator
// ---------------------------------------------------------------------------

/// Translator backed by the `translate_a/single` HTTP endpoint.
pub struct HttpTranslator {
    client: reqwest::Client,
    config: TranslationConfig,
}

impl HttpTranslator {
    /// Build a translator from config.
    ///
    /// The HTTP client carries the per-request timeout from
    /// `config.timeout_secs`.
    pub fn from_config(config: &TranslationConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/translate_a/single",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate(&self, text: &str) -> Result<String, TranslateError> {
        let response = self
            .client
            .get(self.endpoint())
            .query(&[
                ("client", "gtx"),
                ("sl", self.config.source_language.as_str()),
                ("tl", self.config.target_language.as_str()),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?
            .error_for_status()?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TranslateError::Parse(e.to_string()))?;

        let translated = parse_response(&json)?;
        log::debug!(
            "translate: {} → {}: {:?}",
            self.config.source_language,
            self.config.target_language,
            translated
        );
        Ok(translated)
    }
}

/// Extract the translated text from a `translate_a/single` response.
///
/// The body is a nested array whose first element lists sentence segments;
/// each segment starts with its translated text:
///
/// ```
/// use speech_to_sign::translate::parse_response;
///
/// let body = serde_json::json!([[["Good ", "காலை ", null], ["morning", "வணக்கம்", null]], null, "ta"]);
/// assert_eq!(parse_response(&body).unwrap(), "Good morning");
/// ```
pub fn parse_response(json: &serde_json::Value) -> Result<String, TranslateError> {
    let segments = json
        .get(0)
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| TranslateError::Parse("missing sentence segments".into()))?;

    let text: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(serde_json::Value::as_str))
        .collect();

    let text = text.trim();
    if text.is_empty() {
        return Err(TranslateError::EmptyResult);
    }
    Ok(text.to_string())
}

// ---------------------------------------------------------------------------
// MockTranslator  (test-only)
// ---------------------------------------------------------------------------

/// Test double: returns a fixed translation, or fails every call.
#[cfg(test)]
pub struct MockTranslator {
    response: Option<String>,
}

#[cfg(test)]
impl MockTranslator {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            response: Some(text.into()),
        }
    }

    pub fn failing() -> Self {
        Self { response: None }
    }
}

#[cfg(test)]
#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, _text: &str) -> Result<String, TranslateError> {
        self.response
            .clone()
            .ok_or_else(|| TranslateError::Request("service unreachable".into()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_single_segment() {
        let body = json!([[["Thank you", "நன்றி", null, null, 10]], null, "ta"]);
        assert_eq!(parse_response(&body).unwrap(), "Thank you");
    }

    #[test]
    fn skips_segments_without_text() {
        let body = json!([[["Hello", "வணக்கம்"], [null, null, "Vaṇakkam"]], null, "ta"]);
        assert_eq!(parse_response(&body).unwrap(), "Hello");
    }

    #[test]
    fn null_segments_are_a_parse_error() {
        let body = json!([null, null, "ta"]);
        assert!(matches!(parse_response(&body), Err(TranslateError::Parse(_))));
    }

    #[test]
    fn non_array_body_is_a_parse_error() {
        let body = json!({"error": "quota"});
        assert!(matches!(parse_response(&body), Err(TranslateError::Parse(_))));
    }

    #[test]
    fn blank_translation_is_empty_result() {
        let body = json!([[["  ", "  "]], null, "ta"]);
        assert!(matches!(parse_response(&body), Err(TranslateError::EmptyResult)));
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let config = TranslationConfig {
            base_url: "http://localhost:5000/".into(),
            ..TranslationConfig::default()
        };
        let translator = HttpTranslator::from_config(&config);
        assert_eq!(translator.endpoint(), "http://localhost:5000/translate_a/single");
    }

    #[test]
    fn translator_is_object_safe() {
        let translator: Box<dyn Translator> =
            Box::new(HttpTranslator::from_config(&TranslationConfig::default()));
        drop(translator);
    }

    #[tokio::test]
    async fn unreachable_service_is_an_error() {
        let config = TranslationConfig {
            // Port 9 (discard) on localhost is closed in test environments.
            base_url: "http://127.0.0.1:9".into(),
            timeout_secs: 2,
            ..TranslationConfig::default()
        };
        let translator = HttpTranslator::from_config(&config);
        assert!(translator.translate("வணக்கம்").await.is_err());
    }
}
