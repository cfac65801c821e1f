//! Microphone listening: cpal capture plus utterance segmentation.
//!
//! ```text
//! cpal callback → AudioChunk (mpsc) → stereo_to_mono → resample_to_16k
//!              → 30 ms VAD frames → wait / record / pause → trim_silence
//! ```
//!
//! [`MicrophoneSource::listen`] blocks the calling thread; the pipeline runs
//! it under `spawn_blocking`.

use std::collections::VecDeque;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use thiserror::Error;

use crate::audio::resample::{resample_to_16k, stereo_to_mono, TARGET_RATE};
use crate::audio::vad::VadDetector;
use crate::config::AudioConfig;

/// Audio kept from before the first voiced frame so onsets are not clipped.
const PREROLL_SAMPLES: usize = TARGET_RATE as usize * 3 / 10;

// ---------------------------------------------------------------------------
// AudioChunk
// ---------------------------------------------------------------------------

/// One buffer of interleaved `f32` samples as delivered by the cpal callback.
#[derive(Debug, Clone)]
pub struct AudioChunk {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures while opening the input device.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no input device found on the default audio host")]
    NoDevice,

    #[error("failed to query default input config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build input stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
}

/// Failures of a single listen attempt.
#[derive(Debug, Error)]
pub enum ListenError {
    /// Nobody spoke before the wait timeout elapsed.
    #[error("no speech detected before the listen timeout")]
    WaitTimeout,

    /// The audio stream ended before any speech arrived.
    #[error("audio stream closed before speech was captured")]
    StreamClosed,

    #[error(transparent)]
    Capture(#[from] CaptureError),
}

// ---------------------------------------------------------------------------
// ListenParams
// ---------------------------------------------------------------------------

/// Timing and sensitivity of one listen attempt.
#[derive(Debug, Clone, Copy)]
pub struct ListenParams {
    /// Maximum wait for speech to start.
    pub timeout: Duration,
    /// Trailing silence that ends the utterance.
    pub pause: Duration,
    /// Hard cap on the recorded utterance.
    pub phrase_limit: Duration,
    pub vad: VadDetector,
}

impl ListenParams {
    pub fn from_config(cfg: &AudioConfig) -> Self {
        Self {
            timeout: secs(cfg.listen_timeout_secs),
            pause: secs(cfg.pause_secs),
            phrase_limit: secs(cfg.phrase_limit_secs),
            vad: VadDetector::new(cfg.vad_threshold),
        }
    }
}

impl Default for ListenParams {
    fn default() -> Self {
        Self::from_config(&AudioConfig::default())
    }
}

fn secs(value: f32) -> Duration {
    Duration::try_from_secs_f32(value.max(0.0)).unwrap_or(Duration::ZERO)
}

fn samples_for(duration: Duration) -> usize {
    (duration.as_secs_f64() * TARGET_RATE as f64).round() as usize
}

// ---------------------------------------------------------------------------
// Utterance segmentation
// ---------------------------------------------------------------------------

/// Where an [`Utterance`] stands after a frame has been fed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Waiting,
    Recording,
    /// Pause or phrase limit reached; the utterance is complete.
    Done,
    /// The wait budget ran out without speech.
    TimedOut,
}

/// Frame-by-frame state machine turning a 16 kHz stream into one utterance.
///
/// Time is counted in samples, so the outcome depends only on the audio fed,
/// not on how fast it arrives.
#[derive(Debug)]
pub struct Utterance {
    vad: VadDetector,
    wait_limit: usize,
    pause_limit: usize,
    phrase_limit: usize,
    pending: Vec<f32>,
    preroll: VecDeque<f32>,
    recorded: Vec<f32>,
    waited: usize,
    silence_run: usize,
    progress: Progress,
}

impl Utterance {
    pub fn new(params: &ListenParams) -> Self {
        Self {
            vad: params.vad,
            wait_limit: samples_for(params.timeout),
            pause_limit: samples_for(params.pause).max(1),
            phrase_limit: samples_for(params.phrase_limit).max(1),
            pending: Vec::new(),
            preroll: VecDeque::with_capacity(PREROLL_SAMPLES),
            recorded: Vec::new(),
            waited: 0,
            silence_run: 0,
            progress: Progress::Waiting,
        }
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn is_speaking(&self) -> bool {
        self.progress == Progress::Recording
    }

    /// Feed raw device audio; returns the state after consuming it.
    pub fn feed(&mut self, chunk: &AudioChunk) -> Progress {
        let mono = stereo_to_mono(&chunk.samples, chunk.channels);
        self.feed_16k(&resample_to_16k(&mono, chunk.sample_rate))
    }

    /// Feed audio that is already 16 kHz mono.
    pub fn feed_16k(&mut self, samples: &[f32]) -> Progress {
        if matches!(self.progress, Progress::Done | Progress::TimedOut) {
            return self.progress;
        }
        self.pending.extend_from_slice(samples);

        let frame_size = self.vad.frame_size();
        let mut consumed = 0;
        while self.pending.len() - consumed >= frame_size {
            let frame = &self.pending[consumed..consumed + frame_size];
            consumed += frame_size;
            let voiced = self.vad.is_voice_frame(frame);

            match self.progress {
                Progress::Waiting if voiced => {
                    self.recorded.extend(self.preroll.drain(..));
                    self.recorded.extend_from_slice(frame);
                    self.progress = Progress::Recording;
                }
                Progress::Waiting => {
                    self.waited += frame_size;
                    self.preroll.extend(frame.iter().copied());
                    let overflow = self.preroll.len().saturating_sub(PREROLL_SAMPLES);
                    self.preroll.drain(..overflow);
                    if self.waited >= self.wait_limit {
                        self.progress = Progress::TimedOut;
                    }
                }
                Progress::Recording => {
                    self.recorded.extend_from_slice(frame);
                    self.silence_run = if voiced {
                        0
                    } else {
                        self.silence_run + frame_size
                    };
                    if self.recorded.len() >= self.phrase_limit {
                        self.recorded.truncate(self.phrase_limit);
                        self.progress = Progress::Done;
                    } else if self.silence_run >= self.pause_limit {
                        self.progress = Progress::Done;
                    }
                }
                Progress::Done | Progress::TimedOut => {}
            }

            if matches!(self.progress, Progress::Done | Progress::TimedOut) {
                break;
            }
        }
        self.pending.drain(..consumed);
        self.progress
    }

    /// Recorded speech with leading and trailing silence removed.
    ///
    /// A partial frame still pending when the stream ended is kept.
    pub fn finish(mut self) -> Vec<f32> {
        if self.progress == Progress::Recording {
            self.recorded.append(&mut self.pending);
        }
        self.vad.trim_silence(&self.recorded).to_vec()
    }
}

/// Pull chunks from `rx` until one utterance has been captured.
///
/// Waits at most `params.timeout` (wall clock or stream time, whichever runs
/// out first) for speech to start.  Once speech has started, a closed or
/// stalled stream ends the utterance with whatever was recorded.
pub fn collect_utterance(
    rx: &mpsc::Receiver<AudioChunk>,
    params: &ListenParams,
) -> Result<Vec<f32>, ListenError> {
    let deadline = Instant::now() + params.timeout;
    let mut utterance = Utterance::new(params);

    loop {
        let received = if utterance.is_speaking() {
            rx.recv_timeout(params.pause.max(Duration::from_millis(100)))
        } else {
            rx.recv_timeout(deadline.saturating_duration_since(Instant::now()))
        };

        let chunk = match received {
            Ok(chunk) => chunk,
            Err(_) if utterance.is_speaking() => break,
            Err(mpsc::RecvTimeoutError::Timeout) => return Err(ListenError::WaitTimeout),
            Err(mpsc::RecvTimeoutError::Disconnected) => return Err(ListenError::StreamClosed),
        };

        match utterance.feed(&chunk) {
            Progress::Done => break,
            Progress::TimedOut => return Err(ListenError::WaitTimeout),
            Progress::Waiting | Progress::Recording => {}
        }
    }

    let audio = utterance.finish();
    log::debug!(
        "microphone: captured {:.2}s of speech",
        audio.len() as f32 / TARGET_RATE as f32
    );
    Ok(audio)
}

// ---------------------------------------------------------------------------
// SpeechSource
// ---------------------------------------------------------------------------

/// Blocking source of one spoken utterance as 16 kHz mono `f32`.
pub trait SpeechSource: Send + Sync {
    fn listen(&self) -> Result<Vec<f32>, ListenError>;
}

/// Live input from the default cpal device.
///
/// The device is opened per call and released when the call returns, so the
/// microphone is only held while listening.
#[derive(Debug, Clone)]
pub struct MicrophoneSource {
    params: ListenParams,
}

impl MicrophoneSource {
    pub fn new(params: ListenParams) -> Self {
        Self { params }
    }

    pub fn from_config(cfg: &AudioConfig) -> Self {
        Self::new(ListenParams::from_config(cfg))
    }
}

impl SpeechSource for MicrophoneSource {
    fn listen(&self) -> Result<Vec<f32>, ListenError> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or(CaptureError::NoDevice)?;
        let supported = device
            .default_input_config()
            .map_err(CaptureError::from)?;

        let channels = supported.channels();
        let sample_rate = supported.sample_rate().0;
        let config: cpal::StreamConfig = supported.into();
        log::debug!("microphone: {sample_rate} Hz, {channels} channel(s)");

        let (tx, rx) = mpsc::channel::<AudioChunk>();
        let stream = device
            .build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    // Receiver gone means listening already finished.
                    let _ = tx.send(AudioChunk {
                        samples: data.to_vec(),
                        sample_rate,
                        channels,
                    });
                },
                |err: cpal::StreamError| {
                    log::error!("cpal stream error: {err}");
                },
                None,
            )
            .map_err(CaptureError::from)?;
        stream.play().map_err(CaptureError::from)?;

        let result = collect_utterance(&rx, &self.params);
        drop(stream);
        result
    }
}

/// Test double yielding canned audio, or a wait timeout when empty.
#[cfg(test)]
pub struct MockSpeechSource {
    audio: Option<Vec<f32>>,
}

#[cfg(test)]
impl MockSpeechSource {
    pub fn audio(samples: Vec<f32>) -> Self {
        Self {
            audio: Some(samples),
        }
    }

    pub fn silent() -> Self {
        Self { audio: None }
    }
}

#[cfg(test)]
impl SpeechSource for MockSpeechSource {
    fn listen(&self) -> Result<Vec<f32>, ListenError> {
        self.audio.clone().ok_or(ListenError::WaitTimeout)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
