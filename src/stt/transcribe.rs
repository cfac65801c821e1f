//! Transcription parameter and result types.

// ---------------------------------------------------------------------------
// SamplingStrategy
// ---------------------------------------------------------------------------

/// Owned, `Clone` mirror of `whisper_rs::SamplingStrategy`.
#[derive(Debug, Clone, PartialEq)]
pub enum SamplingStrategy {
    /// Single-pass decoding.
    Greedy { best_of: i32 },
    /// Beam search; slower, slightly more accurate.
    BeamSearch { beam_size: i32, patience: f32 },
}

impl Default for SamplingStrategy {
    fn default() -> Self {
        Self::Greedy { best_of: 1 }
    }
}

// ---------------------------------------------------------------------------
// TranscribeParams
// ---------------------------------------------------------------------------

/// Parameters for Whisper inference.
///
/// ```
/// use speech_to_sign::stt::TranscribeParams;
///
/// let params = TranscribeParams {
///     language: "te".into(),
///     ..TranscribeParams::default()
/// };
/// assert_eq!(params.language, "te");
/// ```
#[derive(Debug, Clone)]
pub struct TranscribeParams {
    /// ISO-639-1 language code, or `"auto"` for Whisper's detection.
    pub language: String,
    pub strategy: SamplingStrategy,
    /// CPU threads handed to Whisper, capped at 8.
    pub n_threads: i32,
    /// Request GPU inference when whisper-rs was built with a GPU backend.
    pub use_gpu: bool,
    /// Suppress Whisper's progress output to stderr.
    pub suppress_progress: bool,
}

impl Default for TranscribeParams {
    fn default() -> Self {
        Self {
            language: "ta".into(),
            strategy: SamplingStrategy::default(),
            n_threads: optimal_threads(),
            use_gpu: false,
            suppress_progress: true,
        }
    }
}

pub(crate) fn optimal_threads() -> i32 {
    std::thread::available_parallelism()
        .map(|n| n.get().min(8) as i32)
        .unwrap_or(4)
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Output of [`WhisperEngine::transcribe_full`](crate::stt::WhisperEngine::transcribe_full).
#[derive(Debug, Clone)]
pub struct TranscriptionResult {
    /// Concatenated, trimmed transcript.
    pub text: String,
    pub segments: Vec<Segment>,
    /// Wall-clock inference time.
    pub duration_ms: u128,
}

/// A single time-aligned text chunk.
#[derive(Debug, Clone)]
pub struct Segment {
    pub text: String,
    pub start_ms: u64,
    pub end_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_language_is_tamil() {
        assert_eq!(TranscribeParams::default().language, "ta");
    }

    #[test]
    fn optimal_threads_is_positive_and_at_most_8() {
        let t = optimal_threads();
        assert!((1..=8).contains(&t));
    }
}
