//! Speech-to-sign entry point.
//!
//! # Startup sequence
//!
//! 1. Logging and [`AppConfig`].
//! 2. Sign asset inventory; a missing or unreadable directory is fatal.
//! 3. Tokio runtime, Whisper engine (or a stand-in when no model is present),
//!    translator, microphone source.
//! 4. Pipeline task and request channel.
//! 5. Hotkey thread.
//! 6. [`eframe::run_native`], which blocks until the window closes.

use std::sync::Arc;

use anyhow::Context as _;
use eframe::egui;
use tokio::sync::mpsc;

use speech_to_sign::{
    app::SignApp,
    audio::{MicrophoneSource, SpeechSource},
    config::{AppConfig, AppPaths},
    hotkey::{parse_key, HotkeyEvent, HotkeyListener},
    pipeline::{new_shared_state, request_channel, SignPipeline},
    sign::AssetInventory,
    stt::{ModelPaths, SttEngine, SttError, TranscribeParams, WhisperEngine},
    translate::{HttpTranslator, Translator},
};

fn native_options(config: &AppConfig) -> eframe::NativeOptions {
    let (w, h) = config.ui.window_size;
    let mut vp = egui::ViewportBuilder::default()
        .with_title("Speech to Sign")
        .with_inner_size([w, h])
        .with_min_inner_size([480.0, 360.0]);

    if config.ui.always_on_top {
        vp = vp.with_always_on_top();
    }

    eframe::NativeOptions {
        viewport: vp,
        ..Default::default()
    }
}

fn load_stt(config: &AppConfig) -> Arc<dyn SttEngine> {
    let model_path = ModelPaths::from_app_paths(&AppPaths::new()).resolve(&config.stt.model);
    let params = TranscribeParams {
        language: config.stt.language.clone(),
        use_gpu: config.stt.use_gpu,
        ..TranscribeParams::default()
    };

    match WhisperEngine::load(&model_path, params) {
        Ok(engine) => {
            log::info!("Whisper model loaded: {}", model_path.display());
            Arc::new(engine)
        }
        Err(e) => {
            log::warn!(
                "could not load Whisper model ({}): {e}; typed text still works",
                model_path.display()
            );
            Arc::new(NoModelStt {
                path: model_path.display().to_string(),
            })
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("speech-to-sign starting up");

    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    let inventory = match AssetInventory::build(&config.assets.images_dir, &config.assets.gifs_dir)
    {
        Ok(inventory) => Arc::new(inventory),
        Err(e) => {
            log::error!("cannot start without sign assets: {e}");
            return Err(e).context("loading sign assets");
        }
    };
    if inventory.is_empty() {
        log::warn!("no sign assets found; every word will be finger-spelled as raw text");
    }

    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("creating tokio runtime")?;

    let stt = load_stt(&config);
    let translator: Arc<dyn Translator> = Arc::new(HttpTranslator::from_config(&config.translation));
    let speech: Arc<dyn SpeechSource> = Arc::new(MicrophoneSource::from_config(&config.audio));

    let state = new_shared_state();
    let (handle, request_rx) = request_channel(Arc::clone(&state));
    let pipeline = SignPipeline::new(
        Arc::clone(&state),
        inventory,
        stt,
        translator,
        speech,
        config.audio.clone(),
    );
    rt.spawn(pipeline.run(request_rx));

    let hotkey_key = parse_key(&config.hotkey.listen_key).unwrap_or_else(|| {
        log::warn!("unknown hotkey {:?}; using F9", config.hotkey.listen_key);
        rdev::Key::F9
    });
    let (hotkey_tx, hotkey_rx) = mpsc::channel::<HotkeyEvent>(4);
    let (_hotkey_listener, hotkey_rx) = match HotkeyListener::start(hotkey_key, hotkey_tx) {
        Ok(listener) => (Some(listener), Some(hotkey_rx)),
        Err(e) => {
            log::warn!("global hotkey unavailable: {e}");
            (None, None)
        }
    };

    let app = SignApp::new(state, handle, hotkey_rx, format!("{hotkey_key:?}"));
    eframe::run_native(
        "Speech to Sign",
        native_options(&config),
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("window error: {e}"))?;

    rt.shutdown_background();
    Ok(())
}

/// Stand-in engine when no Whisper model is on disk: speech input reports the
/// missing model, typed text is unaffected.
struct NoModelStt {
    path: String,
}

impl SttEngine for NoModelStt {
    fn transcribe(&self, _audio: &[f32]) -> Result<String, SttError> {
        Err(SttError::ModelNotFound(self.path.clone()))
    }
}
