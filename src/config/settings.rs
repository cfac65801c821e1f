//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.
//! Every section is `#[serde(default)]`, so a partial `settings.toml` only
//! overrides the keys it names.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// AssetsConfig
// ---------------------------------------------------------------------------

/// Where the sign assets live.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Directory of single-letter images (`A.png`, `b.jpg`, …).
    pub images_dir: PathBuf,
    /// Directory of word/phrase animations (`hello.gif`, `thank you.gif`, …).
    pub gifs_dir: PathBuf,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            images_dir: PathBuf::from("images"),
            gifs_dir: PathBuf::from("gifs"),
        }
    }
}

// ---------------------------------------------------------------------------
// SttConfig
// ---------------------------------------------------------------------------

/// Settings for the Whisper STT engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SttConfig {
    /// Model id from the registry (e.g. `"whisper-medium"`), or a file stem
    /// under the models directory.
    pub model: String,
    /// Spoken language as an ISO-639-1 code, or `"auto"`.
    pub language: String,
    /// Attempt GPU-accelerated inference when available.
    pub use_gpu: bool,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            model: "whisper-medium".into(),
            language: "ta".into(),
            use_gpu: false,
        }
    }
}

// ---------------------------------------------------------------------------
// TranslationConfig
// ---------------------------------------------------------------------------

/// Settings for the machine-translation step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    /// Base URL of the translation endpoint.
    pub base_url: String,
    /// Language of the recognised / typed text.
    pub source_language: String,
    /// Language the sign assets are labelled in.
    pub target_language: String,
    /// Maximum seconds to wait for a translation response.
    pub timeout_secs: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            base_url: "https://translate.googleapis.com".into(),
            source_language: "ta".into(),
            target_language: "en".into(),
            timeout_secs: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// AudioConfig
// ---------------------------------------------------------------------------

/// Settings for microphone listening and audio guards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// RMS level above which a 30 ms frame counts as speech.
    pub vad_threshold: f32,
    /// How long to wait for speech to start before giving up.
    pub listen_timeout_secs: f32,
    /// Trailing silence that ends an utterance.
    pub pause_secs: f32,
    /// Hard cap on a single microphone utterance.
    pub phrase_limit_secs: f32,
    /// Minimum speech length in seconds before transcription is attempted.
    pub min_recording_secs: f32,
    /// Maximum clip length accepted for transcription.
    pub max_recording_secs: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            vad_threshold: 0.01,
            listen_timeout_secs: 5.0,
            pause_secs: 0.8,
            phrase_limit_secs: 30.0,
            min_recording_secs: 0.5,
            max_recording_secs: 60.0,
        }
    }
}

// ---------------------------------------------------------------------------
// HotkeyConfig
// ---------------------------------------------------------------------------

/// Global hotkey bindings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HotkeyConfig {
    /// Key that starts microphone listening (e.g. `"F9"`).
    pub listen_key: String,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            listen_key: "F9".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// Window settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Initial inner size `(width, height)` in points.
    pub window_size: (f32, f32),
    /// Keep the window above all others.
    pub always_on_top: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            window_size: (1100.0, 800.0),
            always_on_top: false,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// ```rust,no_run
/// use speech_to_sign::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
/// println!("assets in {}", config.assets.images_dir.display());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub assets: AssetsConfig,
    pub stt: SttConfig,
    pub translation: TranslationConfig,
    pub audio: AudioConfig,
    pub hotkey: HotkeyConfig,
    pub ui: UiConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let mut cfg = AppConfig::default();
        cfg.assets.images_dir = PathBuf::from("/srv/signs/letters");
        cfg.stt.language = "te".into();
        cfg.translation.source_language = "te".into();
        cfg.translation.timeout_secs = 30;
        cfg.audio.listen_timeout_secs = 8.0;
        cfg.hotkey.listen_key = "F10".into();
        cfg.ui.window_size = (800.0, 600.0);

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.assets.images_dir, PathBuf::from("/srv/signs/letters"));
        assert_eq!(loaded.assets.gifs_dir, PathBuf::from("gifs"));
        assert_eq!(loaded.stt.language, "te");
        assert_eq!(loaded.translation.source_language, "te");
        assert_eq!(loaded.translation.timeout_secs, 30);
        assert_eq!(loaded.audio.listen_timeout_secs, 8.0);
        assert_eq!(loaded.hotkey.listen_key, "F10");
        assert_eq!(loaded.ui.window_size, (800.0, 600.0));
    }

    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        assert_eq!(config.stt.model, SttConfig::default().model);
        assert_eq!(config.translation.base_url, TranslationConfig::default().base_url);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "[translation]\ntarget_language = \"fr\"\n").expect("write");

        let cfg = AppConfig::load_from(&path).expect("load");
        assert_eq!(cfg.translation.target_language, "fr");
        assert_eq!(cfg.translation.source_language, "ta");
        assert_eq!(cfg.audio.listen_timeout_secs, 5.0);
        assert_eq!(cfg.assets.gifs_dir, PathBuf::from("gifs"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "assets = [").expect("write");
        assert!(AppConfig::load_from(&path).is_err());
    }

    #[test]
    fn defaults_translate_tamil_to_english() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.stt.language, "ta");
        assert_eq!(cfg.translation.source_language, "ta");
        assert_eq!(cfg.translation.target_language, "en");
        assert_eq!(cfg.audio.listen_timeout_secs, 5.0);
        assert_eq!(cfg.hotkey.listen_key, "F9");
        assert_eq!(cfg.assets.images_dir, PathBuf::from("images"));
    }
}
