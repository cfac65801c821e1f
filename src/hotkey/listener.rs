//! Dedicated OS thread running `rdev::listen`.
//!
//! `rdev::listen` cannot be interrupted.  Dropping [`HotkeyListener`] sets a
//! stop flag so the callback forwards nothing more; the thread itself stays
//! parked in the OS event loop until the process exits.

use std::io;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use tokio::sync::mpsc;

use super::HotkeyEvent;

/// Turns raw press/release events for one key into one event per press.
#[derive(Debug, Clone)]
pub struct KeyLatch {
    key: rdev::Key,
    down: bool,
}

impl KeyLatch {
    pub fn new(key: rdev::Key) -> Self {
        Self { key, down: false }
    }

    /// Feed one input event; returns the event to forward, if any.
    pub fn on_event(&mut self, event: &rdev::EventType) -> Option<HotkeyEvent> {
        match event {
            rdev::EventType::KeyPress(k) if *k == self.key => {
                let first = !self.down;
                self.down = true;
                first.then_some(HotkeyEvent::ListenPressed)
            }
            rdev::EventType::KeyRelease(k) if *k == self.key => {
                self.down = false;
                None
            }
            _ => None,
        }
    }
}

/// Handle to the running listener thread.
pub struct HotkeyListener {
    stop: Arc<AtomicBool>,
    _thread: std::thread::JoinHandle<()>,
}

impl HotkeyListener {
    /// Spawn the listener thread watching `key`.
    ///
    /// Events are sent with `try_send`: a press while the window has not yet
    /// drained the previous one is dropped.
    pub fn start(key: rdev::Key, tx: mpsc::Sender<HotkeyEvent>) -> io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let thread = std::thread::Builder::new()
            .name("hotkey-listener".into())
            .spawn(move || {
                let mut latch = KeyLatch::new(key);
                let result = rdev::listen(move |event| {
                    if stop_flag.load(Ordering::Relaxed) {
                        return;
                    }
                    if let Some(ev) = latch.on_event(&event.event_type) {
                        if tx.try_send(ev).is_err() {
                            log::debug!("hotkey: press dropped, previous one still pending");
                        }
                    }
                });

                if let Err(e) = result {
                    log::error!("hotkey-listener: rdev::listen exited with error: {e:?}");
                }
            })?;

        log::info!("hotkey: listening for {key:?}");
        Ok(Self {
            stop,
            _thread: thread,
        })
    }
}

impl Drop for HotkeyListener {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdev::{EventType, Key};

    #[test]
    fn one_event_per_physical_press() {
        let mut latch = KeyLatch::new(Key::F9);
        assert_eq!(
            latch.on_event(&EventType::KeyPress(Key::F9)),
            Some(HotkeyEvent::ListenPressed)
        );
        // Auto-repeat while held.
        assert_eq!(latch.on_event(&EventType::KeyPress(Key::F9)), None);
        assert_eq!(latch.on_event(&EventType::KeyRelease(Key::F9)), None);
        assert_eq!(
            latch.on_event(&EventType::KeyPress(Key::F9)),
            Some(HotkeyEvent::ListenPressed)
        );
    }

    #[test]
    fn other_keys_are_ignored() {
        let mut latch = KeyLatch::new(Key::F9);
        assert_eq!(latch.on_event(&EventType::KeyPress(Key::F8)), None);
        assert_eq!(latch.on_event(&EventType::KeyRelease(Key::F8)), None);
        assert_eq!(
            latch.on_event(&EventType::KeyPress(Key::F9)),
            Some(HotkeyEvent::ListenPressed)
        );
    }
}
