//! The speech-to-sign window.
//!
//! [`SignApp`] is the top-level [`eframe::App`].  It submits requests through
//! a [`PipelineHandle`] and renders whatever the pipeline last published in
//! [`SharedState`]:
//!
//! | Area | Content |
//! |------|---------|
//! | Input tabs | typed text · microphone (button or hotkey) · audio file |
//! | Status | current [`PipelineState`] label, transient notices |
//! | Result | recognized text, English translation, render plan |
//! | Error | [`ErrorKind`] label and message |

use std::path::Path;
use std::time::{Duration, Instant};

use eframe::egui;
use tokio::sync::mpsc;

use crate::audio::UPLOAD_EXTENSIONS;
use crate::hotkey::HotkeyEvent;
use crate::pipeline::{
    ErrorKind, InputSource, PipelineError, PipelineHandle, PipelineState, SharedState,
};
use crate::sign::{LetterCell, RenderPlan, RenderUnit, LETTER_DISPLAY_SIZE};
use crate::textures::TextureCache;

/// How long a refused-request notice stays on screen.
const NOTICE_TTL: Duration = Duration::from_secs(4);
/// Widest an animation is drawn.
const MAX_ANIMATION_WIDTH: f32 = 480.0;

const ACCENT: egui::Color32 = egui::Color32::from_rgb(68, 136, 255);
const OK_GREEN: egui::Color32 = egui::Color32::from_rgb(80, 200, 120);
const ERROR_ORANGE: egui::Color32 = egui::Color32::from_rgb(255, 136, 68);
const MUTED: egui::Color32 = egui::Color32::from_rgb(140, 140, 140);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputTab {
    Text,
    Voice,
    File,
}

/// Read an audio file from disk into an upload request.
///
/// Only the extensions the decoder is built for are accepted.
pub fn read_upload(path: &Path) -> Result<InputSource, PipelineError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if !UPLOAD_EXTENSIONS.contains(&ext.as_str()) {
        return Err(PipelineError::DecodeFailure(format!(
            "unsupported file type {:?} (expected one of: {})",
            ext,
            UPLOAD_EXTENSIONS.join(", ")
        )));
    }

    let bytes = std::fs::read(path)
        .map_err(|e| PipelineError::DecodeFailure(format!("{}: {e}", path.display())))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("upload.{ext}"));
    Ok(InputSource::Upload { bytes, file_name })
}

/// What the window shows this frame, copied out of the shared state.
struct Snapshot {
    pipeline: PipelineState,
    source_text: Option<String>,
    translated_text: Option<String>,
    plan: Option<RenderPlan>,
    error: Option<(ErrorKind, String)>,
    generation: u64,
}

impl Snapshot {
    fn take(state: &SharedState) -> Self {
        let st = state.lock().unwrap_or_else(|e| e.into_inner());
        Self {
            pipeline: st.pipeline,
            source_text: st.source_text.clone(),
            translated_text: st.translated_text.clone(),
            plan: st.plan.clone(),
            error: st.error.clone(),
            generation: st.generation,
        }
    }
}

/// eframe application.
pub struct SignApp {
    state: SharedState,
    handle: PipelineHandle,
    hotkey_rx: Option<mpsc::Receiver<HotkeyEvent>>,
    hotkey_name: String,

    tab: InputTab,
    text_input: String,
    file_path: String,
    notice: Option<(String, Instant)>,

    textures: TextureCache,
    seen_generation: u64,
}

impl SignApp {
    pub fn new(
        state: SharedState,
        handle: PipelineHandle,
        hotkey_rx: Option<mpsc::Receiver<HotkeyEvent>>,
        hotkey_name: impl Into<String>,
    ) -> Self {
        Self {
            state,
            handle,
            hotkey_rx,
            hotkey_name: hotkey_name.into(),
            tab: InputTab::Text,
            text_input: String::new(),
            file_path: String::new(),
            notice: None,
            textures: TextureCache::default(),
            seen_generation: 0,
        }
    }

    fn submit(&mut self, input: InputSource) {
        if let Err(e) = self.handle.submit(input) {
            log::info!("ui: {e}");
            self.notice = Some((e.to_string(), Instant::now()));
        }
    }

    fn poll_hotkey(&mut self) {
        let mut pressed = false;
        if let Some(rx) = self.hotkey_rx.as_mut() {
            while let Ok(HotkeyEvent::ListenPressed) = rx.try_recv() {
                pressed = true;
            }
        }
        if pressed {
            self.tab = InputTab::Voice;
            self.submit(InputSource::Microphone);
        }
    }

    // ── Input area ───────────────────────────────────────────────────────

    fn draw_inputs(&mut self, ui: &mut egui::Ui, busy: bool) {
        ui.horizontal(|ui| {
            ui.selectable_value(&mut self.tab, InputTab::Text, "Type text");
            ui.selectable_value(&mut self.tab, InputTab::Voice, "Speak");
            ui.selectable_value(&mut self.tab, InputTab::File, "Audio file");
        });
        ui.add_space(6.0);

        match self.tab {
            InputTab::Text => {
                ui.add(
                    egui::TextEdit::multiline(&mut self.text_input)
                        .hint_text("Type Tamil text…")
                        .desired_rows(3)
                        .desired_width(f32::INFINITY),
                );
                if ui.add_enabled(!busy, egui::Button::new("Translate")).clicked() {
                    let text = self.text_input.clone();
                    self.submit(InputSource::Text(text));
                }
            }
            InputTab::Voice => {
                let label = format!("Start listening ({})", self.hotkey_name);
                if ui.add_enabled(!busy, egui::Button::new(label)).clicked() {
                    self.submit(InputSource::Microphone);
                }
                ui.label(egui::RichText::new("Speak after pressing; a pause ends the phrase.").color(MUTED));
            }
            InputTab::File => {
                ui.horizontal(|ui| {
                    ui.label("Path:");
                    ui.add(
                        egui::TextEdit::singleline(&mut self.file_path)
                            .hint_text("/path/to/clip.wav")
                            .desired_width(360.0),
                    );
                });
                ui.label(
                    egui::RichText::new(format!("Accepted: {}", UPLOAD_EXTENSIONS.join(", ")))
                        .color(MUTED),
                );
                if ui.add_enabled(!busy, egui::Button::new("Translate file")).clicked() {
                    match read_upload(Path::new(self.file_path.trim())) {
                        Ok(input) => self.submit(input),
                        Err(e) => self.notice = Some((e.to_string(), Instant::now())),
                    }
                }
            }
        }
    }

    // ── Status and result ────────────────────────────────────────────────

    fn draw_status(&mut self, ui: &mut egui::Ui, snap: &Snapshot) {
        ui.horizontal(|ui| {
            let colour = match snap.pipeline {
                PipelineState::Result => OK_GREEN,
                PipelineState::Error => ERROR_ORANGE,
                s if s.is_busy() => ACCENT,
                _ => MUTED,
            };
            if snap.pipeline.is_busy() {
                ui.spinner();
            }
            ui.label(egui::RichText::new(snap.pipeline.label()).color(colour));
        });

        if let Some((text, since)) = &self.notice {
            if since.elapsed() < NOTICE_TTL {
                ui.label(egui::RichText::new(text.as_str()).color(ERROR_ORANGE).italics());
            } else {
                self.notice = None;
            }
        }
    }

    fn draw_outcome(&mut self, ui: &mut egui::Ui, ctx: &egui::Context, snap: &Snapshot) {
        if let Some((kind, message)) = &snap.error {
            ui.label(
                egui::RichText::new(kind.label())
                    .color(ERROR_ORANGE)
                    .strong(),
            );
            ui.label(message.as_str());
            return;
        }

        if let Some(source) = &snap.source_text {
            ui.label(egui::RichText::new("Recognized").color(MUTED));
            ui.label(egui::RichText::new(source.as_str()).size(16.0));
        }
        if let Some(translated) = &snap.translated_text {
            ui.add_space(4.0);
            ui.label(egui::RichText::new("English").color(MUTED));
            ui.label(egui::RichText::new(translated.as_str()).size(18.0).strong());
        }

        if let Some(plan) = &snap.plan {
            ui.add_space(8.0);
            ui.separator();
            if plan.is_empty() {
                ui.label(egui::RichText::new("No sign available for this text.").color(MUTED));
            } else {
                draw_plan(ui, ctx, &mut self.textures, plan);
            }
        }
    }
}

fn draw_plan(ui: &mut egui::Ui, ctx: &egui::Context, textures: &mut TextureCache, plan: &RenderPlan) {
    for unit in plan.units() {
        match unit {
            RenderUnit::Animation { label, path, .. } => {
                ui.heading(label.as_str());
                match textures.animation(ctx, path) {
                    Some(anim) => {
                        let tex = anim.current();
                        let mut size = tex.size_vec2();
                        if size.x > MAX_ANIMATION_WIDTH {
                            size *= MAX_ANIMATION_WIDTH / size.x;
                        }
                        ui.image((tex.id(), size));
                        if anim.is_animated() {
                            ctx.request_repaint_after(Duration::from_millis(30));
                        }
                    }
                    None => {
                        ui.label(egui::RichText::new("(animation could not be loaded)").color(MUTED));
                    }
                }
            }
            RenderUnit::Letters { word, rows } => {
                ui.add_space(6.0);
                ui.label(egui::RichText::new(word.as_str()).strong());
                for row in rows {
                    ui.horizontal(|ui| {
                        for cell in row.cells() {
                            draw_cell(ui, ctx, textures, cell);
                        }
                    });
                }
            }
        }
    }
}

fn draw_cell(ui: &mut egui::Ui, ctx: &egui::Context, textures: &mut TextureCache, cell: &LetterCell) {
    let size = egui::vec2(LETTER_DISPLAY_SIZE[0] as f32, LETTER_DISPLAY_SIZE[1] as f32);
    ui.vertical(|ui| {
        let texture = match cell {
            LetterCell::Resolved { image, .. } => textures.letter(ctx, image),
            LetterCell::Unresolved(_) => None,
        };
        match texture {
            Some(tex) => {
                ui.image((tex.id(), size));
            }
            None => {
                let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
                let painter = ui.painter();
                painter.rect_filled(rect, 6.0, egui::Color32::from_gray(40));
                painter.text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    cell.character(),
                    egui::FontId::proportional(64.0),
                    egui::Color32::from_gray(220),
                );
            }
        }
        ui.label(egui::RichText::new(cell.character().to_string()).color(MUTED));
    });
}

impl eframe::App for SignApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_hotkey();

        let snap = Snapshot::take(&self.state);
        if snap.generation != self.seen_generation {
            self.seen_generation = snap.generation;
            self.textures.restart_animations();
        }

        let busy = snap.pipeline.is_busy();
        if busy || self.notice.is_some() {
            ctx.request_repaint_after(Duration::from_millis(100));
        } else {
            // Keeps hotkey presses responsive while idle.
            ctx.request_repaint_after(Duration::from_millis(250));
        }

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.heading("Speech to Sign");
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_inputs(ui, busy);
            ui.add_space(6.0);
            self.draw_status(ui, &snap);
            ui.separator();
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| self.draw_outcome(ui, ctx, &snap));
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        log::info!("speech-to-sign window closing");
    }
}
