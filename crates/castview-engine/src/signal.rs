#![forbid(unsafe_code)]

//! Finish-notification channel between an engine and the controller.
//!
//! Engines receive an [`EngineNotifier`] at construction and fire it when
//! the recording ends; the controller drains the paired [`SignalReceiver`]
//! from its timer tick. Signals may arrive at any time relative to the
//! controller's own scheduling — the channel decouples the two.

use std::sync::mpsc;

use tracing::debug;

/// Out-of-band notification from the playback engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineSignal {
    /// The recording reached its end.
    Finished,
}

/// Engine-side handle for raising signals. Cheap to clone.
#[derive(Debug, Clone)]
pub struct EngineNotifier {
    tx: mpsc::Sender<EngineSignal>,
}

impl EngineNotifier {
    /// Report that the recording finished. A no-op once the controller
    /// side is gone.
    pub fn finished(&self) {
        debug!("engine reported finish");
        let _ = self.tx.send(EngineSignal::Finished);
    }
}

/// Controller-side receiver for engine signals.
#[derive(Debug)]
pub struct SignalReceiver {
    rx: mpsc::Receiver<EngineSignal>,
}

impl SignalReceiver {
    /// Drain all signals raised since the last call.
    pub fn drain(&self) -> Vec<EngineSignal> {
        self.rx.try_iter().collect()
    }
}

/// Create a connected notifier/receiver pair.
#[must_use]
pub fn engine_signals() -> (EngineNotifier, SignalReceiver) {
    let (tx, rx) = mpsc::channel();
    (EngineNotifier { tx }, SignalReceiver { rx })
}
