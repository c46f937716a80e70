#![forbid(unsafe_code)]

//! Real-time drive loop.
//!
//! [`PlayerLoop`] is the host-side scheduler: it pumps the controller's
//! wall-clock tick and display-refresh frame once per refresh period,
//! feeds queued [`PlayerCommand`]s in, and invokes a render sink whenever
//! a pump produced visible changes. It blocks the calling thread; another
//! thread stops it through the [`StopHandle`].
//!
//! The loop always ends in a full controller teardown, so dropping out of
//! `run` — via quit command or stop handle — never leaks timers or the
//! refresh schedule.

use std::sync::mpsc;
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use tracing::debug;

use castview_core::event::KeyEvent;
use castview_core::metrics::{CharMetrics, ContainerSize};
use castview_engine::PlaybackEngine;

use crate::controller::PlayerController;
use crate::delta::StateDelta;

/// Default refresh period (~60 Hz).
pub const DEFAULT_REFRESH: Duration = Duration::from_millis(16);

/// Cancellation signal shared between the loop and its stop handle.
#[derive(Clone)]
pub struct StopSignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopSignal {
    fn new() -> (Self, StopHandle) {
        let inner = Arc::new((Mutex::new(false), Condvar::new()));
        (
            Self {
                inner: inner.clone(),
            },
            StopHandle { inner },
        )
    }

    /// Check if the signal has been raised.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        let (lock, _) = &*self.inner;
        *lock.lock().expect("stop signal lock poisoned")
    }

    /// Block for up to `duration` or until stopped, whichever comes first.
    ///
    /// Returns `true` if stopped. Loops over spurious condvar wakeups.
    pub fn wait_timeout(&self, duration: Duration) -> bool {
        let (lock, cvar) = &*self.inner;
        let mut stopped = lock.lock().expect("stop signal lock poisoned");
        let start = Instant::now();
        loop {
            if *stopped {
                return true;
            }
            let elapsed = start.elapsed();
            if elapsed >= duration {
                return false;
            }
            let (guard, _) = cvar
                .wait_timeout(stopped, duration - elapsed)
                .expect("stop signal lock poisoned");
            stopped = guard;
        }
    }
}

/// Stops a running [`PlayerLoop`]. Idempotent.
pub struct StopHandle {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopHandle {
    /// Raise the stop signal and wake the loop.
    pub fn stop(&self) {
        let (lock, cvar) = &*self.inner;
        let mut stopped = lock.lock().expect("stop signal lock poisoned");
        *stopped = true;
        cvar.notify_all();
    }
}

/// Input delivered to the loop from the embedding environment.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerCommand {
    /// Start playback (the start-overlay action).
    Play,
    /// Toggle pause/resume.
    TogglePause,
    /// A keyboard event.
    Key(KeyEvent),
    /// Toggle fullscreen.
    ToggleFullscreen,
    /// Pointer activity over the player (shows controls).
    Activity,
    /// Pointer left the player (hides controls immediately).
    HideControls,
    /// The hosting element was resized.
    Resize(ContainerSize),
    /// Cell metrics were measured.
    Measure(CharMetrics),
    /// Leave the loop and tear the player down.
    Quit,
}

/// Fixed-rate driver for a [`PlayerController`].
pub struct PlayerLoop {
    refresh: Duration,
    signal: StopSignal,
}

impl PlayerLoop {
    /// Create a loop with the given refresh period, plus its stop handle.
    #[must_use]
    pub fn new(refresh: Duration) -> (Self, StopHandle) {
        let (signal, handle) = StopSignal::new();
        (Self { refresh, signal }, handle)
    }

    /// Create a loop at the default ~60 Hz refresh.
    #[must_use]
    pub fn with_default_refresh() -> (Self, StopHandle) {
        Self::new(DEFAULT_REFRESH)
    }

    /// Drive the controller until a `Quit` command or the stop handle.
    ///
    /// `on_render` runs after any pump that changed state; it receives the
    /// controller (read-only) and the batched delta. The controller is
    /// fully torn down before `run` returns.
    pub fn run<E, F>(
        &self,
        controller: &mut PlayerController<E>,
        commands: &mpsc::Receiver<PlayerCommand>,
        mut on_render: F,
    ) where
        E: PlaybackEngine,
        F: FnMut(&PlayerController<E>, &StateDelta),
    {
        debug!(refresh_ms = self.refresh.as_millis() as u64, "player loop started");
        'outer: loop {
            let now = Instant::now();
            let mut delta = StateDelta::empty();
            let mut quit = false;

            for command in commands.try_iter() {
                match command {
                    PlayerCommand::Play => delta.merge(controller.play(now)),
                    PlayerCommand::TogglePause => delta.merge(controller.pause_or_resume(now)),
                    PlayerCommand::Key(key) => delta.merge(controller.handle_key(key, now)),
                    PlayerCommand::ToggleFullscreen => {
                        delta.merge(controller.toggle_fullscreen());
                    }
                    PlayerCommand::Activity => delta.merge(controller.user_activity(now)),
                    PlayerCommand::HideControls => delta.merge(controller.hide_controls()),
                    PlayerCommand::Resize(size) => delta.merge(controller.container_resized(size)),
                    PlayerCommand::Measure(metrics) => delta.merge(controller.measure(metrics)),
                    PlayerCommand::Quit => {
                        quit = true;
                        break;
                    }
                }
            }

            delta.merge(controller.tick(now));
            delta.merge(controller.frame());

            if !delta.is_empty() {
                on_render(controller, &delta);
            }

            if quit {
                break 'outer;
            }
            if self.signal.wait_timeout(self.refresh) {
                break 'outer;
            }
        }
        controller.teardown();
        debug!("player loop stopped");
    }
}
