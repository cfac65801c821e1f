//! Tamil speech or text → English → sign language rendering.
//!
//! * [`sign`]: asset inventory, phrase resolution and render planning.
//! * [`audio`] / [`stt`] / [`translate`]: the recognition and translation stages.
//! * [`pipeline`]: request orchestration and shared state.
//! * [`app`] / [`textures`]: the egui window.

pub mod app;
pub mod audio;
pub mod config;
pub mod hotkey;
pub mod pipeline;
pub mod sign;
pub mod stt;
pub mod textures;
pub mod translate;
