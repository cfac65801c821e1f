//! Uploaded audio files → 16 kHz mono `f32`.
//!
//! Bytes are written to a scoped temp file ([`TempUpload`]) so symphonia can
//! probe a seekable source with the right extension hint.  The temp file is
//! removed when the guard drops, on success and on every error path.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::audio::resample::{resample_hq, stereo_to_mono, ResampleError};

/// Extensions offered in the upload picker.
pub const UPLOAD_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg"];

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("could not stage upload: {0}")]
    Io(#[from] io::Error),

    #[error("unsupported or corrupt audio: {0}")]
    Unsupported(String),

    #[error("file contains no audio track")]
    NoTrack,

    #[error("audio track does not declare a sample rate")]
    MissingSampleRate,

    #[error("decoding failed: {0}")]
    Decode(String),

    #[error("file decoded to zero samples")]
    Empty,

    #[error(transparent)]
    Resample(#[from] ResampleError),
}

// ---------------------------------------------------------------------------
// TempUpload
// ---------------------------------------------------------------------------

/// Uploaded bytes staged on disk for the lifetime of the guard.
pub struct TempUpload {
    file: NamedTempFile,
}

impl TempUpload {
    /// Write `bytes` to a fresh temp file, keeping the extension of
    /// `file_name` so format probing gets a hint.
    pub fn write(bytes: &[u8], file_name: &str) -> Result<Self, DecodeError> {
        let suffix = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e.to_ascii_lowercase()))
            .unwrap_or_default();

        let mut file = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(&suffix)
            .tempfile()?;
        file.write_all(bytes)?;
        file.flush()?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decoded mono audio at its native rate.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl DecodedAudio {
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// Decode the first audio track of `path`, downmixed to mono.
pub fn decode_file(path: &Path) -> Result<DecodedAudio, DecodeError> {
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| DecodeError::Unsupported(e.to_string()))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(DecodeError::NoTrack)?;
    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or(DecodeError::MissingSampleRate)?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| DecodeError::Unsupported(e.to_string()))?;

    let mut samples: Vec<f32> = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(DecodeError::Decode(e.to_string())),
        };
        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                let channels = spec.channels.count() as u16;
                let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                buf.copy_interleaved_ref(decoded);
                samples.extend(stereo_to_mono(buf.samples(), channels));
            }
            // A corrupt packet is skipped; the rest of the stream may be fine.
            Err(SymphoniaError::DecodeError(msg)) => {
                log::warn!("decode: skipping bad packet: {msg}");
            }
            Err(e) => return Err(DecodeError::Decode(e.to_string())),
        }
    }

    if samples.is_empty() {
        return Err(DecodeError::Empty);
    }
    Ok(DecodedAudio {
        samples,
        sample_rate,
    })
}

/// Stage `bytes`, decode them and resample to 16 kHz mono.
pub fn decode_upload(bytes: &[u8], file_name: &str) -> Result<Vec<f32>, DecodeError> {
    let staged = TempUpload::write(bytes, file_name)?;
    let decoded = decode_file(staged.path())?;
    log::debug!(
        "decode: {file_name}: {:.2}s @ {} Hz",
        decoded.duration_secs(),
        decoded.sample_rate
    );
    Ok(resample_hq(&decoded.samples, decoded.sample_rate)?)
}

#[cfg(test)]
/// Minimal 16-bit PCM WAV carrying a 440 Hz tone.
pub(crate) fn wav_bytes(sample_rate: u32, channels: u16, frames: usize) -> Vec<u8> {
    let data_len = (frames * channels as usize * 2) as u32;
    let mut out = Vec::with_capacity(44 + data_len as usize);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&channels.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&(sample_rate * channels as u32 * 2).to_le_bytes());
    out.extend_from_slice(&(channels * 2).to_le_bytes());
    out.extend_from_slice(&16u16.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    for i in 0..frames {
        let t = i as f32 / sample_rate as f32;
        let v = ((t * 440.0 * std::f32::consts::TAU).sin() * 8_000.0) as i16;
        for _ in 0..channels {
            out.extend_from_slice(&v.to_le_bytes());
        }
    }
    out
}
