//! Audio input: microphone listening, upload decoding, resampling and VAD.
//!
//! Both sources end in the same format, 16 kHz mono `f32`:
//!
//! ```text
//! Microphone → cpal → AudioChunk → Utterance (VAD) ─┐
//!                                                   ├─▶ Vec<f32> @ 16 kHz
//! Upload bytes → TempUpload → symphonia → rubato ───┘
//! ```

pub mod decode;
pub mod microphone;
pub mod resample;
pub mod vad;

pub use decode::{decode_file, decode_upload, DecodeError, DecodedAudio, TempUpload, UPLOAD_EXTENSIONS};
pub use microphone::{
    collect_utterance, AudioChunk, CaptureError, ListenError, ListenParams, MicrophoneSource,
    Progress, SpeechSource, Utterance,
};
pub use resample::{resample_hq, resample_to_16k, stereo_to_mono, ResampleError, TARGET_RATE};
pub use vad::{VadDetector, VAD_FRAME};

#[cfg(test)]
pub use microphone::MockSpeechSource;
