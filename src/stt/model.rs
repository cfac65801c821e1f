//! Whisper model registry and on-disk path resolution.
//!
//! Only multilingual models are listed: the spoken input (Tamil by default)
//! is not covered by the English-only `.en` variants.

use std::path::PathBuf;

use crate::config::AppPaths;

/// Approximate capacity tier of a Whisper GGML model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelSize {
    Small,
    Medium,
    Large,
}

/// Static metadata for one GGML model file.
#[derive(Debug)]
pub struct ModelInfo {
    /// Identifier used in `SttConfig::model`.
    pub id: &'static str,
    pub display_name: &'static str,
    pub size: ModelSize,
    /// File name under the models directory.
    pub file_name: &'static str,
    pub file_size_mb: u64,
    pub source_url: &'static str,
}

/// Multilingual Whisper models in GGML format.
pub const WHISPER_MODELS: &[ModelInfo] = &[
    ModelInfo {
        id: "whisper-small",
        display_name: "Whisper Small",
        size: ModelSize::Small,
        file_name: "ggml-small.bin",
        file_size_mb: 466,
        source_url: "https://huggingface.co/ggerganov/whisper.cpp",
    },
    ModelInfo {
        id: "whisper-medium",
        display_name: "Whisper Medium [Recommended]",
        size: ModelSize::Medium,
        file_name: "ggml-medium.bin",
        file_size_mb: 1_500,
        source_url: "https://huggingface.co/ggerganov/whisper.cpp",
    },
    ModelInfo {
        id: "whisper-large-v3",
        display_name: "Whisper Large-v3",
        size: ModelSize::Large,
        file_name: "ggml-large-v3.bin",
        file_size_mb: 3_100,
        source_url: "https://huggingface.co/ggerganov/whisper.cpp",
    },
];

/// Find a [`ModelInfo`] by its `id`.
pub fn find_model_by_id(id: &str) -> Option<&'static ModelInfo> {
    WHISPER_MODELS.iter().find(|m| m.id == id)
}

// ---------------------------------------------------------------------------
// ModelPaths
// ---------------------------------------------------------------------------

/// Resolves where model files live on disk.
#[derive(Debug, Clone)]
pub struct ModelPaths {
    pub models_dir: PathBuf,
}

impl ModelPaths {
    pub fn from_app_paths(app_paths: &AppPaths) -> Self {
        Self::new(app_paths.models_dir.clone())
    }

    pub fn new(models_dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: models_dir.into(),
        }
    }

    /// Path for a configured model name.
    ///
    /// Registry ids map to their file name; anything else is treated as a
    /// file stem, so custom fine-tunes can be dropped in as `<name>.bin`.
    ///
    /// ```
    /// use speech_to_sign::stt::ModelPaths;
    ///
    /// let paths = ModelPaths::new("/models");
    /// assert!(paths.resolve("whisper-medium").ends_with("ggml-medium.bin"));
    /// assert!(paths.resolve("tamil-ft").ends_with("tamil-ft.bin"));
    /// ```
    pub fn resolve(&self, model: &str) -> PathBuf {
        match find_model_by_id(model) {
            Some(info) => self.models_dir.join(info.file_name),
            None => self.models_dir.join(format!("{model}.bin")),
        }
    }

    /// Registry models present on disk.
    pub fn list_local_models(&self) -> Vec<&'static ModelInfo> {
        WHISPER_MODELS
            .iter()
            .filter(|m| self.models_dir.join(m.file_name).exists())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn find_model_by_id_known_and_unknown() {
        assert_eq!(
            find_model_by_id("whisper-medium").map(|m| m.size),
            Some(ModelSize::Medium)
        );
        assert!(find_model_by_id("does-not-exist").is_none());
    }

    #[test]
    fn ids_are_unique() {
        for (i, a) in WHISPER_MODELS.iter().enumerate() {
            for b in &WHISPER_MODELS[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn list_local_models_sees_only_present_files() {
        let dir = tempdir().expect("temp dir");
        std::fs::write(dir.path().join("ggml-small.bin"), b"").expect("write");

        let paths = ModelPaths::new(dir.path());
        let local: Vec<&str> = paths.list_local_models().iter().map(|m| m.id).collect();
        assert_eq!(local, vec!["whisper-small"]);
    }
}
