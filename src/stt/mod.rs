//! STT (Speech-to-Text) engine module.
//!
//! ```text
//!   SttConfig.model ──▶ ModelPaths::resolve ──▶ WhisperEngine::load
//!                                                     │
//!                        16 kHz mono f32 ──▶ SttEngine::transcribe ──▶ text
//! ```
//!
//! ```rust,no_run
//! use speech_to_sign::stt::{SttEngine, TranscribeParams, WhisperEngine};
//!
//! let engine = WhisperEngine::load("models/ggml-medium.bin", TranscribeParams::default())
//!     .expect("model not found");
//! let audio: Vec<f32> = vec![0.0; 16_000];
//! let text = engine.transcribe(&audio);
//! ```

pub mod engine;
pub mod model;
pub mod transcribe;

pub use engine::{
    is_blank_transcript, SttEngine, SttError, WhisperEngine, MAX_AUDIO_SAMPLES, MIN_AUDIO_SAMPLES,
};
pub use model::{find_model_by_id, ModelInfo, ModelPaths, ModelSize, WHISPER_MODELS};
pub use transcribe::{SamplingStrategy, Segment, TranscribeParams, TranscriptionResult};

#[cfg(test)]
pub use engine::MockSttEngine;
