//! Request orchestration and the state shared with the window.
//!
//! ```text
//! SignApp ──PipelineHandle::submit──▶ mpsc(1) ──▶ SignPipeline::run (tokio task)
//!    ▲                                                  │
//!    └──────────── SharedState (Arc<Mutex<AppState>>) ◀─┘
//! ```
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use speech_to_sign::config::AppConfig;
//! use speech_to_sign::pipeline::{new_shared_state, request_channel, InputSource, SignPipeline};
//! # use speech_to_sign::{audio::SpeechSource, sign::AssetInventory, stt::SttEngine, translate::Translator};
//! # fn parts() -> (Arc<AssetInventory>, Arc<dyn SttEngine>, Arc<dyn Translator>, Arc<dyn SpeechSource>) { unimplemented!() }
//!
//! # async fn example() {
//! let config = AppConfig::default();
//! let state = new_shared_state();
//! let (inventory, stt, translator, speech) = parts();
//!
//! let (handle, rx) = request_channel(state.clone());
//! let pipeline = SignPipeline::new(state, inventory, stt, translator, speech, config.audio);
//! tokio::spawn(pipeline.run(rx));
//!
//! handle.submit(InputSource::Text("வணக்கம்".into())).expect("idle");
//! # }
//! ```

pub mod runner;
pub mod state;

pub use runner::{
    request_channel, ErrorKind, InputSource, PipelineError, PipelineHandle, SignOutcome,
    SignPipeline, REQUEST_QUEUE,
};
pub use state::{new_shared_state, AppState, PipelineState, SharedState};
