//! Channel mixing and resampling to Whisper's 16 kHz mono `f32`.
//!
//! Two resamplers are provided:
//!
//! * [`resample_to_16k`]: linear interpolation, stateless, used per chunk on
//!   the live microphone path where latency matters more than fidelity.
//! * [`resample_hq`]: windowed-sinc resampling via `rubato`, used on whole
//!   uploaded files where quality matters and the clip is available at once.

use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use thiserror::Error;

/// Sample rate expected by the STT engine.
pub const TARGET_RATE: u32 = 16_000;

/// Input frames fed to the sinc resampler per call.
const HQ_CHUNK: usize = 1024;

/// The high-quality resampler rejected its input or configuration.
#[derive(Debug, Error)]
#[error("resampling failed: {0}")]
pub struct ResampleError(String);

/// Mix interleaved multi-channel audio down to mono by averaging.
///
/// ```rust
/// use speech_to_sign::audio::stereo_to_mono;
///
/// let stereo = vec![0.5_f32, -0.5, 0.2, 0.4]; // L R L R
/// let mono = stereo_to_mono(&stereo, 2);
/// assert_eq!(mono.len(), 2);
/// assert!((mono[1] - 0.3).abs() < 1e-6);
/// ```
pub fn stereo_to_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    match channels {
        0 => Vec::new(),
        1 => samples.to_vec(),
        n => {
            let n = n as usize;
            samples
                .chunks_exact(n)
                .map(|frame| frame.iter().sum::<f32>() / n as f32)
                .collect()
        }
    }
}

/// Resample `samples` from `source_rate` to 16 kHz with linear interpolation.
///
/// Already-16 kHz input is returned unchanged.
pub fn resample_to_16k(samples: &[f32], source_rate: u32) -> Vec<f32> {
    if source_rate == TARGET_RATE || samples.is_empty() || source_rate == 0 {
        return samples.to_vec();
    }

    let ratio = TARGET_RATE as f64 / source_rate as f64;
    let output_len = (samples.len() as f64 * ratio).ceil() as usize;

    (0..output_len)
        .map(|i| {
            let src_pos = i as f64 / ratio;
            let idx = src_pos as usize;
            let frac = (src_pos - idx as f64) as f32;
            match (samples.get(idx), samples.get(idx + 1)) {
                (Some(&a), Some(&b)) => a * (1.0 - frac) + b * frac,
                (Some(&a), None) => a,
                _ => 0.0,
            }
        })
        .collect()
}

/// Resample a whole mono clip to 16 kHz with a windowed-sinc filter.
///
/// The resampler's group delay is removed so the output lines up with the
/// input; the output length is `ceil(len · 16000 / source_rate)`.
pub fn resample_hq(samples: &[f32], source_rate: u32) -> Result<Vec<f32>, ResampleError> {
    if source_rate == TARGET_RATE || samples.is_empty() {
        return Ok(samples.to_vec());
    }
    if source_rate == 0 {
        return Err(ResampleError("source sample rate is 0".into()));
    }

    let ratio = TARGET_RATE as f64 / source_rate as f64;
    let expected = (samples.len() as f64 * ratio).ceil() as usize;

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };
    let mut resampler = SincFixedIn::<f32>::new(ratio, 1.0, params, HQ_CHUNK, 1)
        .map_err(|e| ResampleError(e.to_string()))?;

    let delay = resampler.output_delay();
    let mut output: Vec<f32> = Vec::with_capacity(expected + delay);

    for chunk in samples.chunks(HQ_CHUNK) {
        let input = [chunk];
        let frames = if chunk.len() == HQ_CHUNK {
            resampler.process(&input[..], None)
        } else {
            resampler.process_partial(Some(&input[..]), None)
        }
        .map_err(|e| ResampleError(e.to_string()))?;
        output.extend_from_slice(&frames[0]);
    }

    // Flush the filter tail until the delayed signal is fully out.
    while output.len() < expected + delay {
        let frames = resampler
            .process_partial(None::<&[&[f32]]>, None)
            .map_err(|e| ResampleError(e.to_string()))?;
        if frames[0].is_empty() {
            break;
        }
        output.extend_from_slice(&frames[0]);
    }

    let mut aligned: Vec<f32> = output.into_iter().skip(delay).take(expected).collect();
    aligned.resize(expected, 0.0);
    Ok(aligned)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
