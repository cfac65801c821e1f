//! Sign assets → egui textures.
//!
//! Letter images are resized to [`LETTER_DISPLAY_SIZE`]; GIF animations are
//! decoded frame by frame and played back with their own delays.  Decoding
//! happens once per path; failures are logged once and the cell falls back to
//! its raw character.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use eframe::egui;
use image::codecs::gif::GifDecoder;
use image::imageops::FilterType;
use image::AnimationDecoder;
use thiserror::Error;

use crate::sign::LETTER_DISPLAY_SIZE;

/// GIF delays at or below this are played at [`DEFAULT_FRAME_DELAY`].
const MIN_FRAME_DELAY: Duration = Duration::from_millis(10);
const DEFAULT_FRAME_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("cannot open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot decode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("animation has no frames")]
    NoFrames,
}

// ---------------------------------------------------------------------------
// Decoding (no egui context needed)
// ---------------------------------------------------------------------------

fn to_color_image(buffer: &image::RgbaImage) -> egui::ColorImage {
    let (w, h) = buffer.dimensions();
    egui::ColorImage::from_rgba_unmultiplied([w as usize, h as usize], buffer.as_raw())
}

/// Decode a letter image and resize it to the display size.
pub fn load_letter_image(path: &Path) -> Result<egui::ColorImage, TextureError> {
    let [w, h] = LETTER_DISPLAY_SIZE;
    let img = image::open(path)?.resize_exact(w, h, FilterType::Triangle);
    Ok(to_color_image(&img.to_rgba8()))
}

/// Decoded frames of one animation.
pub struct AnimationFrames {
    pub frames: Vec<egui::ColorImage>,
    pub delays: Vec<Duration>,
}

/// Decode every frame of a GIF.
pub fn load_animation(path: &Path) -> Result<AnimationFrames, TextureError> {
    let file = File::open(path).map_err(|source| TextureError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let decoder = GifDecoder::new(BufReader::new(file))?;
    let raw = decoder.into_frames().collect_frames()?;
    if raw.is_empty() {
        return Err(TextureError::NoFrames);
    }

    let mut frames = Vec::with_capacity(raw.len());
    let mut delays = Vec::with_capacity(raw.len());
    for frame in raw {
        let (numer, denom) = frame.delay().numer_denom_ms();
        let delay = if denom == 0 {
            DEFAULT_FRAME_DELAY
        } else {
            Duration::from_micros(numer as u64 * 1_000 / denom as u64)
        };
        delays.push(if delay <= MIN_FRAME_DELAY {
            DEFAULT_FRAME_DELAY
        } else {
            delay
        });
        frames.push(to_color_image(frame.buffer()));
    }
    Ok(AnimationFrames { frames, delays })
}

/// Index of the frame showing `elapsed` into a looping animation.
pub fn frame_at(delays: &[Duration], elapsed: Duration) -> usize {
    let total: Duration = delays.iter().sum();
    if total.is_zero() {
        return 0;
    }
    let mut t = Duration::from_nanos((elapsed.as_nanos() % total.as_nanos()) as u64);
    for (i, delay) in delays.iter().enumerate() {
        if t < *delay {
            return i;
        }
        t -= *delay;
    }
    delays.len() - 1
}

// ---------------------------------------------------------------------------
// Texture cache
// ---------------------------------------------------------------------------

/// Uploaded frames of a playing animation.
pub struct AnimatedTexture {
    frames: Vec<egui::TextureHandle>,
    delays: Vec<Duration>,
    started: Instant,
}

impl AnimatedTexture {
    /// Texture to draw now.
    pub fn current(&self) -> &egui::TextureHandle {
        let i = frame_at(&self.delays, self.started.elapsed());
        &self.frames[i.min(self.frames.len() - 1)]
    }

    /// `true` when there is more than one frame to cycle through.
    pub fn is_animated(&self) -> bool {
        self.frames.len() > 1
    }

    pub fn restart(&mut self) {
        self.started = Instant::now();
    }
}

/// Per-path texture cache; `None` entries remember failed loads.
#[derive(Default)]
pub struct TextureCache {
    letters: HashMap<PathBuf, Option<egui::TextureHandle>>,
    animations: HashMap<PathBuf, Option<AnimatedTexture>>,
}

impl TextureCache {
    pub fn letter(&mut self, ctx: &egui::Context, path: &Path) -> Option<&egui::TextureHandle> {
        self.letters
            .entry(path.to_path_buf())
            .or_insert_with(|| match load_letter_image(path) {
                Ok(img) => Some(ctx.load_texture(
                    path.display().to_string(),
                    img,
                    egui::TextureOptions::LINEAR,
                )),
                Err(e) => {
                    log::warn!("textures: {}: {e}", path.display());
                    None
                }
            })
            .as_ref()
    }

    pub fn animation(&mut self, ctx: &egui::Context, path: &Path) -> Option<&AnimatedTexture> {
        self.animations
            .entry(path.to_path_buf())
            .or_insert_with(|| match load_animation(path) {
                Ok(decoded) => {
                    let name = path.display().to_string();
                    let frames = decoded
                        .frames
                        .into_iter()
                        .enumerate()
                        .map(|(i, img)| {
                            ctx.load_texture(
                                format!("{name}#{i}"),
                                img,
                                egui::TextureOptions::LINEAR,
                            )
                        })
                        .collect();
                    Some(AnimatedTexture {
                        frames,
                        delays: decoded.delays,
                        started: Instant::now(),
                    })
                }
                Err(e) => {
                    log::warn!("textures: {}: {e}", path.display());
                    None
                }
            })
            .as_ref()
    }

    /// Start every cached animation from its first frame.
    pub fn restart_animations(&mut self) {
        self.animations
            .values_mut()
            .flatten()
            .for_each(AnimatedTexture::restart);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::gif::GifEncoder;
    use image::{Delay, Frame, Rgba, RgbaImage};
    use tempfile::tempdir;

    #[test]
    fn letter_images_are_resized() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("A.png");
        RgbaImage::from_pixel(40, 90, Rgba([255, 0, 0, 255]))
            .save(&path)
            .expect("write png");

        let img = load_letter_image(&path).expect("decode");
        assert_eq!(img.size, [150, 150]);
    }

    #[test]
    fn missing_letter_is_an_error() {
        assert!(load_letter_image(Path::new("/nonexistent/A.png")).is_err());
    }

    #[test]
    fn gif_frames_and_delays() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("HELLO.gif");
        {
            let file = File::create(&path).expect("create");
            let mut encoder = GifEncoder::new(file);
            let frames = [[255u8, 0, 0, 255], [0, 0, 255, 255]].map(|px| {
                Frame::from_parts(
                    RgbaImage::from_pixel(8, 8, Rgba(px)),
                    0,
                    0,
                    Delay::from_numer_denom_ms(200, 1),
                )
            });
            encoder.encode_frames(frames).expect("encode");
        }

        let anim = load_animation(&path).expect("decode");
        assert_eq!(anim.frames.len(), 2);
        assert_eq!(anim.frames[0].size, [8, 8]);
        assert_eq!(anim.delays, vec![Duration::from_millis(200); 2]);
    }

    #[test]
    fn frame_index_loops() {
        let delays = [Duration::from_millis(100), Duration::from_millis(300)];
        assert_eq!(frame_at(&delays, Duration::ZERO), 0);
        assert_eq!(frame_at(&delays, Duration::from_millis(99)), 0);
        assert_eq!(frame_at(&delays, Duration::from_millis(100)), 1);
        assert_eq!(frame_at(&delays, Duration::from_millis(399)), 1);
        assert_eq!(frame_at(&delays, Duration::from_millis(400)), 0);
        assert_eq!(frame_at(&[], Duration::from_secs(1)), 0);
    }
}
