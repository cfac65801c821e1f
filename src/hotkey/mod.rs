//! Global "listen" hotkey, backed by `rdev`.
//!
//! `rdev::listen` blocks forever, so it runs on its own OS thread
//! ([`HotkeyListener`]).  Each physical press of the configured key sends one
//! [`HotkeyEvent::ListenPressed`]; auto-repeat while the key is held is
//! swallowed by [`KeyLatch`].
//!
//! ```no_run
//! use tokio::sync::mpsc;
//! use speech_to_sign::hotkey::{parse_key, HotkeyListener};
//!
//! let (tx, mut rx) = mpsc::channel(4);
//! let key = parse_key("F9").expect("unknown key");
//! let _listener = HotkeyListener::start(key, tx).expect("hotkey thread");
//! // The window polls `rx.try_recv()` once per frame.
//! ```

pub mod listener;

pub use listener::{HotkeyListener, KeyLatch};

/// Events emitted by the hotkey thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyEvent {
    /// The listen key went down: capture one utterance from the microphone.
    ListenPressed,
}

const KEY_NAMES: &[(&str, rdev::Key)] = &[
    ("F1", rdev::Key::F1),
    ("F2", rdev::Key::F2),
    ("F3", rdev::Key::F3),
    ("F4", rdev::Key::F4),
    ("F5", rdev::Key::F5),
    ("F6", rdev::Key::F6),
    ("F7", rdev::Key::F7),
    ("F8", rdev::Key::F8),
    ("F9", rdev::Key::F9),
    ("F10", rdev::Key::F10),
    ("F11", rdev::Key::F11),
    ("F12", rdev::Key::F12),
    ("Escape", rdev::Key::Escape),
    ("Esc", rdev::Key::Escape),
    ("Space", rdev::Key::Space),
    ("Return", rdev::Key::Return),
    ("Enter", rdev::Key::Return),
    ("Tab", rdev::Key::Tab),
    ("Home", rdev::Key::Home),
    ("End", rdev::Key::End),
    ("PageUp", rdev::Key::PageUp),
    ("PageDown", rdev::Key::PageDown),
    ("Insert", rdev::Key::Insert),
    ("ScrollLock", rdev::Key::ScrollLock),
    ("Pause", rdev::Key::Pause),
    ("PrintScreen", rdev::Key::PrintScreen),
];

const LETTER_KEYS: [rdev::Key; 26] = [
    rdev::Key::KeyA,
    rdev::Key::KeyB,
    rdev::Key::KeyC,
    rdev::Key::KeyD,
    rdev::Key::KeyE,
    rdev::Key::KeyF,
    rdev::Key::KeyG,
    rdev::Key::KeyH,
    rdev::Key::KeyI,
    rdev::Key::KeyJ,
    rdev::Key::KeyK,
    rdev::Key::KeyL,
    rdev::Key::KeyM,
    rdev::Key::KeyN,
    rdev::Key::KeyO,
    rdev::Key::KeyP,
    rdev::Key::KeyQ,
    rdev::Key::KeyR,
    rdev::Key::KeyS,
    rdev::Key::KeyT,
    rdev::Key::KeyU,
    rdev::Key::KeyV,
    rdev::Key::KeyW,
    rdev::Key::KeyX,
    rdev::Key::KeyY,
    rdev::Key::KeyZ,
];

/// Parse a key name from config (case-insensitive).
///
/// Accepts F1–F12, a handful of named keys and single ASCII letters.
///
/// ```
/// use speech_to_sign::hotkey::parse_key;
///
/// assert_eq!(parse_key("F9"), Some(rdev::Key::F9));
/// assert_eq!(parse_key("f9"), Some(rdev::Key::F9));
/// assert_eq!(parse_key("l"), Some(rdev::Key::KeyL));
/// assert_eq!(parse_key("Ctrl+L"), None);
/// ```
pub fn parse_key(name: &str) -> Option<rdev::Key> {
    let name = name.trim();
    if let Some((_, key)) = KEY_NAMES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(name))
    {
        return Some(*key);
    }

    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => {
            let index = (c.to_ascii_uppercase() as u8 - b'A') as usize;
            LETTER_KEYS.get(index).copied()
        }
        _ => None,
    }
}
