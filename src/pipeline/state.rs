//! Pipeline phases and the state shared with the UI.
//!
//! The orchestrator task writes [`AppState`]; the egui update loop reads it
//! every frame through [`SharedState`].

use std::sync::{Arc, Mutex};

use crate::pipeline::runner::{ErrorKind, SignOutcome};
use crate::sign::RenderPlan;

// ---------------------------------------------------------------------------
// PipelineState
// ---------------------------------------------------------------------------

/// Phase of the current (or last) run.
///
/// ```text
/// Idle ──text───────────────────────────────▶ Translating ──▶ Result
///      ──mic──▶ Listening ──▶ Transcribing ──▶ Translating ──▶ Result
///      ──file─▶ Decoding  ──▶ Transcribing ──▶ Translating ──▶ Result
/// any busy phase ──failure──▶ Error
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineState {
    #[default]
    Idle,
    /// Waiting for and recording speech from the microphone.
    Listening,
    /// Decoding an uploaded audio file.
    Decoding,
    /// Whisper is running on the blocking pool.
    Transcribing,
    /// Waiting for the translation service.
    Translating,
    /// A render plan is ready.
    Result,
    Error,
}

impl PipelineState {
    /// `true` while a run is in flight; the UI refuses new requests then.
    ///
    /// ```
    /// use speech_to_sign::pipeline::PipelineState;
    ///
    /// assert!(!PipelineState::Idle.is_busy());
    /// assert!(PipelineState::Listening.is_busy());
    /// assert!(PipelineState::Translating.is_busy());
    /// assert!(!PipelineState::Result.is_busy());
    /// assert!(!PipelineState::Error.is_busy());
    /// ```
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            PipelineState::Listening
                | PipelineState::Decoding
                | PipelineState::Transcribing
                | PipelineState::Translating
        )
    }

    /// Status-bar label.
    pub fn label(&self) -> &'static str {
        match self {
            PipelineState::Idle => "Ready",
            PipelineState::Listening => "Listening…",
            PipelineState::Decoding => "Decoding audio…",
            PipelineState::Transcribing => "Transcribing…",
            PipelineState::Translating => "Translating…",
            PipelineState::Result => "Done",
            PipelineState::Error => "Error",
        }
    }
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// Everything the window renders.
#[derive(Debug, Default)]
pub struct AppState {
    pub pipeline: PipelineState,
    /// Recognized or typed text of the last successful run.
    pub source_text: Option<String>,
    /// Its English translation.
    pub translated_text: Option<String>,
    pub plan: Option<RenderPlan>,
    /// Kind and message of the last failure; cleared when a run starts.
    pub error: Option<(ErrorKind, String)>,
    /// Bumped on every completed run so the UI knows to reload textures.
    pub generation: u64,
}

impl AppState {
    /// Enter a busy phase, clearing any previous failure.
    pub fn begin(&mut self, phase: PipelineState) {
        self.pipeline = phase;
        self.error = None;
    }

    pub fn complete(&mut self, outcome: SignOutcome) {
        self.pipeline = PipelineState::Result;
        self.source_text = Some(outcome.source_text);
        self.translated_text = Some(outcome.translated_text);
        self.plan = Some(outcome.plan);
        self.error = None;
        self.generation += 1;
    }

    /// Record a failure.  The previous result is dropped: no partial plan is
    /// ever shown next to an error.
    pub fn fail(&mut self, kind: ErrorKind, message: impl Into<String>) {
        self.pipeline = PipelineState::Error;
        self.source_text = None;
        self.translated_text = None;
        self.plan = None;
        self.error = Some((kind, message.into()));
        self.generation += 1;
    }
}

// ---------------------------------------------------------------------------
// SharedState
// ---------------------------------------------------------------------------

/// Thread-safe handle to [`AppState`].  Never hold the lock across `.await`.
pub type SharedState = Arc<Mutex<AppState>>;

pub fn new_shared_state() -> SharedState {
    Arc::new(Mutex::new(AppState::default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_phases() {
        for phase in [
            PipelineState::Listening,
            PipelineState::Decoding,
            PipelineState::Transcribing,
            PipelineState::Translating,
        ] {
            assert!(phase.is_busy(), "{phase:?}");
        }
        for phase in [PipelineState::Idle, PipelineState::Result, PipelineState::Error] {
            assert!(!phase.is_busy(), "{phase:?}");
        }
    }

    #[test]
    fn labels() {
        assert_eq!(PipelineState::Idle.label(), "Ready");
        assert_eq!(PipelineState::Result.label(), "Done");
        assert_eq!(PipelineState::Error.label(), "Error");
    }

    #[test]
    fn default_state_is_idle_and_empty() {
        let state = AppState::default();
        assert_eq!(state.pipeline, PipelineState::Idle);
        assert!(state.plan.is_none());
        assert!(state.error.is_none());
        assert_eq!(state.generation, 0);
    }

    #[test]
    fn complete_then_fail_clears_the_result() {
        let mut state = AppState::default();
        state.complete(SignOutcome {
            source_text: "வணக்கம்".into(),
            translated_text: "Hello".into(),
            plan: RenderPlan::default(),
        });
        assert_eq!(state.pipeline, PipelineState::Result);
        assert_eq!(state.translated_text.as_deref(), Some("Hello"));

        state.begin(PipelineState::Translating);
        state.fail(ErrorKind::TranslationFailure, "offline");
        assert_eq!(state.pipeline, PipelineState::Error);
        assert!(state.plan.is_none());
        assert!(state.source_text.is_none());
        assert_eq!(
            state.error,
            Some((ErrorKind::TranslationFailure, "offline".to_string()))
        );
        assert_eq!(state.generation, 2);
    }

    #[test]
    fn begin_clears_error() {
        let mut state = AppState::default();
        state.fail(ErrorKind::RecognitionTimeout, "quiet");
        state.begin(PipelineState::Listening);
        assert!(state.error.is_none());
        assert!(state.pipeline.is_busy());
    }

    #[test]
    fn shared_state_can_be_cloned_and_mutated() {
        let state = new_shared_state();
        let state2 = Arc::clone(&state);
        state.lock().unwrap().begin(PipelineState::Decoding);
        assert_eq!(state2.lock().unwrap().pipeline, PipelineState::Decoding);
    }
}
