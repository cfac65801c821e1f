//! Pipeline orchestrator: input → transcript → translation → render plan.
//!
//! ```text
//! InputSource::Text        ───────────────────────────────┐
//! InputSource::Microphone  → spawn_blocking(listen)  ─┐   │
//! InputSource::Upload      → spawn_blocking(decode)  ─┴─▶ spawn_blocking(stt)
//!                                                         │
//!                                   translator.translate ◀┘
//!                                           │
//!                                build_render_plan ─▶ SharedState
//! ```
//!
//! [`SignPipeline::run`] consumes a capacity-1 request channel one request
//! at a time; [`PipelineHandle::submit`] refuses new work while a run is in
//! flight.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::audio::{decode_upload, DecodeError, ListenError, SpeechSource, VadDetector, TARGET_RATE};
use crate::config::AudioConfig;
use crate::sign::{build_render_plan, AssetInventory, RenderPlan};
use crate::stt::{SttEngine, SttError};
use crate::translate::{TranslateError, Translator};

use super::state::{PipelineState, SharedState};

// ---------------------------------------------------------------------------
// InputSource
// ---------------------------------------------------------------------------

/// One request for the pipeline.
#[derive(Debug, Clone)]
pub enum InputSource {
    /// Typed text in the source language.
    Text(String),
    /// Listen once on the microphone.
    Microphone,
    /// Raw bytes of an uploaded audio file.
    Upload { bytes: Vec<u8>, file_name: String },
}

impl InputSource {
    /// Phase the run starts in.
    pub fn initial_phase(&self) -> PipelineState {
        match self {
            InputSource::Text(_) => PipelineState::Translating,
            InputSource::Microphone => PipelineState::Listening,
            InputSource::Upload { .. } => PipelineState::Decoding,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Category of a failed request, shown next to its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    RecognitionTimeout,
    RecognitionFailure,
    TranslationFailure,
    DecodeFailure,
    EmptyInput,
    Busy,
}

impl ErrorKind {
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::RecognitionTimeout => "Listening timed out",
            ErrorKind::RecognitionFailure => "Speech not recognized",
            ErrorKind::TranslationFailure => "Translation failed",
            ErrorKind::DecodeFailure => "Audio file unreadable",
            ErrorKind::EmptyInput => "Nothing to translate",
            ErrorKind::Busy => "Busy",
        }
    }
}

/// A request that produced no render plan.  None of these are fatal.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no speech was heard before the listen timeout")]
    RecognitionTimeout,

    #[error("could not recognize speech: {0}")]
    RecognitionFailure(String),

    #[error("could not translate the text: {0}")]
    TranslationFailure(String),

    #[error("could not decode the audio file: {0}")]
    DecodeFailure(String),

    #[error("enter some text first")]
    EmptyInput,

    #[error("still working on the previous request")]
    Busy,
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::RecognitionTimeout => ErrorKind::RecognitionTimeout,
            PipelineError::RecognitionFailure(_) => ErrorKind::RecognitionFailure,
            PipelineError::TranslationFailure(_) => ErrorKind::TranslationFailure,
            PipelineError::DecodeFailure(_) => ErrorKind::DecodeFailure,
            PipelineError::EmptyInput => ErrorKind::EmptyInput,
            PipelineError::Busy => ErrorKind::Busy,
        }
    }
}

impl From<ListenError> for PipelineError {
    fn from(e: ListenError) -> Self {
        match e {
            ListenError::WaitTimeout => PipelineError::RecognitionTimeout,
            other => PipelineError::RecognitionFailure(other.to_string()),
        }
    }
}

impl From<SttError> for PipelineError {
    fn from(e: SttError) -> Self {
        PipelineError::RecognitionFailure(e.to_string())
    }
}

impl From<TranslateError> for PipelineError {
    fn from(e: TranslateError) -> Self {
        PipelineError::TranslationFailure(e.to_string())
    }
}

impl From<DecodeError> for PipelineError {
    fn from(e: DecodeError) -> Self {
        PipelineError::DecodeFailure(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// SignOutcome
// ---------------------------------------------------------------------------

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct SignOutcome {
    pub source_text: String,
    pub translated_text: String,
    pub plan: RenderPlan,
}

// ---------------------------------------------------------------------------
// PipelineHandle
// ---------------------------------------------------------------------------

/// Capacity of the request channel.  One queued request at most.
pub const REQUEST_QUEUE: usize = 1;

/// UI-side sender that enforces one run at a time.
#[derive(Clone)]
pub struct PipelineHandle {
    tx: mpsc::Sender<InputSource>,
    state: SharedState,
}

impl PipelineHandle {
    pub fn new(tx: mpsc::Sender<InputSource>, state: SharedState) -> Self {
        Self { tx, state }
    }

    /// Queue `input` unless a run is already in flight.
    ///
    /// The shared state enters the request's first phase before this
    /// returns, so a second call made before the pipeline wakes up is refused
    /// too.
    pub fn submit(&self, input: InputSource) -> Result<(), PipelineError> {
        let mut st = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if st.pipeline.is_busy() {
            return Err(PipelineError::Busy);
        }
        let phase = input.initial_phase();
        self.tx.try_send(input).map_err(|e| {
            log::warn!("pipeline: request refused: {e}");
            PipelineError::Busy
        })?;
        st.begin(phase);
        Ok(())
    }
}

/// Request channel sized for one queued request.
pub fn request_channel(state: SharedState) -> (PipelineHandle, mpsc::Receiver<InputSource>) {
    let (tx, rx) = mpsc::channel(REQUEST_QUEUE);
    (PipelineHandle::new(tx, state), rx)
}

// ---------------------------------------------------------------------------
// SignPipeline
// ---------------------------------------------------------------------------

/// Owns the collaborators of one session and drives requests through them.
pub struct SignPipeline {
    state: SharedState,
    inventory: Arc<AssetInventory>,
    stt: Arc<dyn SttEngine>,
    translator: Arc<dyn Translator>,
    speech: Arc<dyn SpeechSource>,
    audio: AudioConfig,
}

impl SignPipeline {
    pub fn new(
        state: SharedState,
        inventory: Arc<AssetInventory>,
        stt: Arc<dyn SttEngine>,
        translator: Arc<dyn Translator>,
        speech: Arc<dyn SpeechSource>,
        audio: AudioConfig,
    ) -> Self {
        Self {
            state,
            inventory,
            stt,
            translator,
            speech,
            audio,
        }
    }

    /// Serve requests until every sender is dropped.
    pub async fn run(self, mut rx: mpsc::Receiver<InputSource>) {
        while let Some(input) = rx.recv().await {
            let result = self.process(input).await;
            let mut st = self.state.lock().unwrap_or_else(|e| e.into_inner());
            match result {
                Ok(outcome) => {
                    log::info!(
                        "pipeline: {:?} → {} unit(s)",
                        outcome.translated_text,
                        outcome.plan.len()
                    );
                    st.complete(outcome);
                }
                Err(e) => {
                    log::error!("pipeline error: {e}");
                    st.fail(e.kind(), e.to_string());
                }
            }
        }
        log::info!("pipeline: request channel closed, shutting down");
    }

    /// Run one request to completion.
    ///
    /// Updates the shared phase as it goes but leaves the final outcome to
    /// the caller.
    pub async fn process(&self, input: InputSource) -> Result<SignOutcome, PipelineError> {
        self.set_phase(input.initial_phase());

        let source_text = match input {
            InputSource::Text(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return Err(PipelineError::EmptyInput);
                }
                text.to_string()
            }
            InputSource::Microphone => {
                let speech = Arc::clone(&self.speech);
                let audio =
                    run_blocking(move || speech.listen(), PipelineError::RecognitionFailure).await?;
                self.transcribe(audio).await?
            }
            InputSource::Upload { bytes, file_name } => {
                let audio = run_blocking(
                    move || decode_upload(&bytes, &file_name),
                    PipelineError::DecodeFailure,
                )
                .await?;
                let vad = VadDetector::new(self.audio.vad_threshold);
                let speech = vad.trim_silence(&audio).to_vec();
                self.transcribe(speech).await?
            }
        };
        log::debug!("pipeline: source text = {source_text:?}");

        self.set_phase(PipelineState::Translating);
        let translated_text = self.translator.translate(&source_text).await?;

        let plan = build_render_plan(&translated_text, &self.inventory);
        Ok(SignOutcome {
            source_text,
            translated_text,
            plan,
        })
    }

    async fn transcribe(&self, audio: Vec<f32>) -> Result<String, PipelineError> {
        self.check_duration(&audio)?;
        self.set_phase(PipelineState::Transcribing);

        let stt = Arc::clone(&self.stt);
        let text = run_blocking(
            move || stt.transcribe(&audio),
            PipelineError::RecognitionFailure,
        )
        .await?;
        Ok(text.trim().to_string())
    }

    fn check_duration(&self, audio: &[f32]) -> Result<(), PipelineError> {
        let secs = audio.len() as f32 / TARGET_RATE as f32;
        if audio.is_empty() {
            return Err(PipelineError::RecognitionFailure(
                "no speech found in the audio".into(),
            ));
        }
        if secs < self.audio.min_recording_secs {
            return Err(PipelineError::RecognitionFailure(format!(
                "speech too short ({secs:.1}s, minimum {:.1}s)",
                self.audio.min_recording_secs
            )));
        }
        if secs > self.audio.max_recording_secs {
            return Err(PipelineError::RecognitionFailure(format!(
                "audio too long ({secs:.0}s, maximum {:.0}s)",
                self.audio.max_recording_secs
            )));
        }
        Ok(())
    }

    fn set_phase(&self, phase: PipelineState) {
        log::debug!("pipeline: → {}", phase.label());
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .begin(phase);
    }
}

/// Run a blocking stage on the blocking pool; a panicked task becomes
/// `on_panic(message)`.
async fn run_blocking<T, E, F>(
    f: F,
    on_panic: fn(String) -> PipelineError,
) -> Result<T, PipelineError>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<PipelineError> + Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result.map_err(Into::into),
        Err(e) => Err(on_panic(format!("worker task failed: {e}"))),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    use super::*;
    use crate::audio::decode::wav_bytes;
    use crate::audio::MockSpeechSource;
    use crate::pipeline::state::new_shared_state;
    use crate::sign::RenderUnit;
    use crate::stt::MockSttEngine;
    use crate::translate::MockTranslator;

    fn inventory() -> Arc<AssetInventory> {
        let letters: BTreeMap<String, PathBuf> = ["H", "I"]
            .iter()
            .map(|l| (l.to_string(), PathBuf::from(format!("images/{l}.png"))))
            .collect();
        let animations: BTreeMap<String, PathBuf> = ["HELLO", "THANK YOU"]
            .iter()
            .map(|l| (l.to_string(), PathBuf::from(format!("gifs/{l}.gif"))))
            .collect();
        Arc::new(AssetInventory::from_maps(letters, animations))
    }

    fn pipeline(
        stt: MockSttEngine,
        translator: MockTranslator,
        speech: MockSpeechSource,
    ) -> (SignPipeline, SharedState) {
        let state = new_shared_state();
        let p = SignPipeline::new(
            Arc::clone(&state),
            inventory(),
            Arc::new(stt),
            Arc::new(translator),
            Arc::new(speech),
            AudioConfig::default(),
        );
        (p, state)
    }

    fn one_second_of_speech() -> Vec<f32> {
        vec![0.3_f32; 16_000]
    }

    #[tokio::test]
    async fn typed_text_skips_recognition() {
        let (p, _) = pipeline(
            MockSttEngine::err(SttError::NoSpeech),
            MockTranslator::ok("Hello"),
            MockSpeechSource::silent(),
        );
        let outcome = p
            .process(InputSource::Text("  வணக்கம் ".into()))
            .await
            .expect("outcome");
        assert_eq!(outcome.source_text, "வணக்கம்");
        assert_eq!(outcome.translated_text, "Hello");
        assert!(outcome.plan.is_animation());
    }

    #[tokio::test]
    async fn blank_text_is_empty_input() {
        let (p, _) = pipeline(
            MockSttEngine::ok("x"),
            MockTranslator::ok("x"),
            MockSpeechSource::silent(),
        );
        let err = p.process(InputSource::Text("   ".into())).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyInput);
    }

    #[tokio::test]
    async fn microphone_flows_through_stt_and_translation() {
        let (p, _) = pipeline(
            MockSttEngine::ok("நன்றி"),
            MockTranslator::ok("Thankyou"),
            MockSpeechSource::audio(one_second_of_speech()),
        );
        let outcome = p.process(InputSource::Microphone).await.expect("outcome");
        assert_eq!(outcome.source_text, "நன்றி");
        match outcome.plan.units() {
            [RenderUnit::Animation { label, .. }] => assert_eq!(label, "THANK YOU"),
            other => panic!("unexpected plan: {other:?}"),
        }
    }

    #[tokio::test]
    async fn silent_microphone_times_out() {
        let (p, _) = pipeline(
            MockSttEngine::ok("x"),
            MockTranslator::ok("x"),
            MockSpeechSource::silent(),
        );
        let err = p.process(InputSource::Microphone).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RecognitionTimeout);
    }

    #[tokio::test]
    async fn short_speech_is_a_recognition_failure() {
        let (p, _) = pipeline(
            MockSttEngine::ok("x"),
            MockTranslator::ok("x"),
            MockSpeechSource::audio(vec![0.3; 1_600]),
        );
        let err = p.process(InputSource::Microphone).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RecognitionFailure);
    }

    #[tokio::test]
    async fn unintelligible_speech_is_a_recognition_failure() {
        let (p, _) = pipeline(
            MockSttEngine::err(SttError::NoSpeech),
            MockTranslator::ok("x"),
            MockSpeechSource::audio(one_second_of_speech()),
        );
        let err = p.process(InputSource::Microphone).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RecognitionFailure);
    }

    #[tokio::test]
    async fn translation_outage_is_a_translation_failure() {
        let (p, _) = pipeline(
            MockSttEngine::ok("வணக்கம்"),
            MockTranslator::failing(),
            MockSpeechSource::silent(),
        );
        let err = p
            .process(InputSource::Text("வணக்கம்".into()))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TranslationFailure);
    }

    #[tokio::test]
    async fn uploaded_wav_is_transcribed() {
        let (p, _) = pipeline(
            MockSttEngine::ok("வணக்கம்"),
            MockTranslator::ok("HI THERE"),
            MockSpeechSource::silent(),
        );
        let outcome = p
            .process(InputSource::Upload {
                bytes: wav_bytes(16_000, 1, 16_000),
                file_name: "hello.wav".into(),
            })
            .await
            .expect("outcome");
        assert_eq!(outcome.plan.len(), 2);
        assert!(!outcome.plan.is_animation());
    }

    #[tokio::test]
    async fn corrupt_upload_is_a_decode_failure() {
        let (p, _) = pipeline(
            MockSttEngine::ok("x"),
            MockTranslator::ok("x"),
            MockSpeechSource::silent(),
        );
        let err = p
            .process(InputSource::Upload {
                bytes: b"not audio at all".to_vec(),
                file_name: "clip.ogg".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DecodeFailure);
    }

    #[tokio::test]
    async fn run_publishes_results_and_errors() {
        let (p, state) = pipeline(
            MockSttEngine::ok("x"),
            MockTranslator::ok("Hello"),
            MockSpeechSource::silent(),
        );
        let (tx, rx) = mpsc::channel(4);
        tx.send(InputSource::Text("வணக்கம்".into())).await.unwrap();
        tx.send(InputSource::Microphone).await.unwrap();
        drop(tx);

        p.run(rx).await;

        let st = state.lock().unwrap();
        assert_eq!(st.pipeline, PipelineState::Error);
        assert_eq!(
            st.error.as_ref().map(|(kind, _)| *kind),
            Some(ErrorKind::RecognitionTimeout)
        );
        assert!(st.plan.is_none());
        assert_eq!(st.generation, 2);
    }

    #[tokio::test]
    async fn handle_refuses_a_second_request() {
        let state = new_shared_state();
        let (handle, mut rx) = request_channel(Arc::clone(&state));

        handle.submit(InputSource::Microphone).expect("first request");
        assert_eq!(state.lock().unwrap().pipeline, PipelineState::Listening);

        let err = handle
            .submit(InputSource::Text("hi".into()))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Busy);
        assert!(matches!(rx.recv().await, Some(InputSource::Microphone)));
    }

    #[test]
    fn full_channel_is_busy_even_when_idle() {
        let state = new_shared_state();
        let (handle, _rx) = request_channel(Arc::clone(&state));
        handle.submit(InputSource::Text("a".into())).expect("first");
        // Simulate the UI having reset the phase while the request is queued.
        state.lock().unwrap().pipeline = PipelineState::Idle;
        let err = handle.submit(InputSource::Text("b".into())).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Busy);
    }

    #[test]
    fn error_kinds_follow_their_source() {
        assert_eq!(
            PipelineError::from(ListenError::WaitTimeout).kind(),
            ErrorKind::RecognitionTimeout
        );
        assert_eq!(
            PipelineError::from(ListenError::StreamClosed).kind(),
            ErrorKind::RecognitionFailure
        );
        assert_eq!(
            PipelineError::from(TranslateError::Timeout).kind(),
            ErrorKind::TranslationFailure
        );
        assert_eq!(
            PipelineError::from(DecodeError::NoTrack).kind(),
            ErrorKind::DecodeFailure
        );
    }
}
