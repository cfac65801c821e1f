//! Energy-based voice activity detection.
//!
//! Audio is split into 30 ms frames (480 samples @ 16 kHz).  A frame counts
//! as voice when its RMS amplitude exceeds the threshold.  The detector is
//! used twice: frame by frame while listening, to decide when the speaker has
//! paused, and once on the finished clip to trim leading and trailing silence
//! so Whisper does not hallucinate over quiet stretches.

/// Samples per analysis frame at 16 kHz.
pub const VAD_FRAME: usize = 480;

/// Energy-based silence detector.
///
/// ```rust
/// use speech_to_sign::audio::VadDetector;
///
/// let vad = VadDetector::new(0.01);
///
/// let mut audio = vec![0.0_f32; 480];
/// audio.extend(vec![0.5_f32; 480]);
/// audio.extend(vec![0.0_f32; 480]);
///
/// assert!(vad.has_voice(&audio));
/// assert_eq!(vad.trim_silence(&audio).len(), 480);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct VadDetector {
    rms_threshold: f32,
    frame_size: usize,
}

impl VadDetector {
    /// `rms_threshold` is in `[0.0, 1.0]`; `0.01` suits a quiet room,
    /// `0.02`–`0.05` a noisy one.
    pub fn new(rms_threshold: f32) -> Self {
        Self {
            rms_threshold,
            frame_size: VAD_FRAME,
        }
    }

    /// Detector with a custom frame size, for rates other than 16 kHz.
    ///
    /// A zero frame size is clamped to one sample.
    pub fn with_frame_size(rms_threshold: f32, frame_size: usize) -> Self {
        Self {
            rms_threshold,
            frame_size: frame_size.max(1),
        }
    }

    pub fn threshold(&self) -> f32 {
        self.rms_threshold
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// `true` when `chunk` is louder than the threshold.
    pub fn is_voice_frame(&self, chunk: &[f32]) -> bool {
        if chunk.is_empty() {
            return false;
        }
        let mean_sq: f32 = chunk.iter().map(|s| s * s).sum::<f32>() / chunk.len() as f32;
        mean_sq.sqrt() > self.rms_threshold
    }

    /// `true` when any frame of `audio` carries voice.
    pub fn has_voice(&self, audio: &[f32]) -> bool {
        audio
            .chunks(self.frame_size)
            .any(|frame| self.is_voice_frame(frame))
    }

    /// Trim leading and trailing silence from `audio`.
    ///
    /// Returns a sub-slice of the input; an all-silent signal yields an empty
    /// slice.
    pub fn trim_silence<'a>(&self, audio: &'a [f32]) -> &'a [f32] {
        let frame_size = self.frame_size;
        let mut voiced = audio
            .chunks(frame_size)
            .enumerate()
            .filter(|(_, frame)| self.is_voice_frame(frame))
            .map(|(i, _)| i);

        let Some(first) = voiced.next() else {
            return &audio[0..0];
        };
        let last = voiced.last().unwrap_or(first);

        let start = first * frame_size;
        let end = ((last + 1) * frame_size).min(audio.len());
        &audio[start..end]
    }
}
