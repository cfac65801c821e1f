//! Machine translation of recognised or typed text.
//!
//! * [`Translator`]: async trait the pipeline depends on.
//! * [`HttpTranslator`]: HTTP client configured from [`TranslationConfig`].
//! * [`TranslateError`]: failure variants.
//!
//! [`TranslationConfig`]: crate::config::TranslationConfig

pub mod client;

pub use client::{parse_response, HttpTranslator, TranslateError, Translator};

#[cfg(test)]
pub use client::MockTranslator;
