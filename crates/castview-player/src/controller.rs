#![forbid(unsafe_code)]

//! The player controller.
//!
//! Owns the viewer lifecycle and the single mutable [`ViewState`],
//! composes the frame synchronizer and the timer facilities, and handles
//! user input. It is the only writer of shared view state; presentation
//! layers read through [`PlayerView`] and call back only through the
//! input methods exposed here.
//!
//! # Time domains
//!
//! The controller never reads a clock. Callers supply `now`:
//!
//! - [`frame`](PlayerController::frame) runs once per display-refresh
//!   opportunity and is guarded by the [`FrameSync`] handle,
//! - [`tick`](PlayerController::tick) pumps the wall-clock timers
//!   (progress poll, blink, loading grace, control auto-hide) and drains
//!   the external resolutions (engine start/preload, finish signal),
//! - geometry and input methods are called as their events arrive.
//!
//! No ordering holds across domains; within one call, all changes commit
//! as a single [`StateDelta`].
//!
//! # Lifecycle
//!
//! ```text
//! initial --play--> loading --grace 1s--> waiting
//!     loading|waiting --start resolves--> playing <--toggle--> paused
//!                                         playing --finish---> paused
//! ```
//!
//! Pause state belongs to the engine: the controller mirrors the flag
//! returned by `pause_or_resume()` and never computes its own.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use castview_core::cursor::CursorDescriptor;
use castview_core::event::{KeyCode, KeyEvent};
use castview_core::grid::GridSize;
use castview_core::layout::{Layout, SizingMode, compute_layout};
use castview_core::line::Line;
use castview_core::metrics::{CharMetrics, ContainerSize};
use castview_engine::{EngineError, EngineSignal, Pending, PlaybackEngine, SignalReceiver};

use crate::delta::{Changed, StateDelta};
use crate::frame_sync::FrameSync;
use crate::host::FullscreenHost;
use crate::state::{Lifecycle, ProgressSnapshot, ViewState};
use crate::timer::{DeadlineTimer, IntervalTimer};

/// How long loading may run before the wait indicator shows.
pub const GRACE_DELAY: Duration = Duration::from_millis(1000);
/// Progress poll period while playing.
pub const PROGRESS_PERIOD: Duration = Duration::from_millis(100);
/// Cursor blink period while playing.
pub const BLINK_PERIOD: Duration = Duration::from_millis(500);
/// Idle time before the control bar hides.
pub const CONTROLS_HIDE_DELAY: Duration = Duration::from_millis(2000);

/// Construction options for the controller.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerOptions {
    /// Fix the grid up front instead of adopting it from the engine.
    pub grid: Option<GridSize>,
    /// Responsive sizing mode; `None` renders the fixed placeholder.
    pub sizing: Option<SizingMode>,
    /// Ask the engine for recording metadata before the first play.
    pub preload: bool,
}

/// The viewer's top-level controller.
pub struct PlayerController<E: PlaybackEngine> {
    engine: E,
    signals: SignalReceiver,
    fullscreen: Box<dyn FullscreenHost>,
    state: ViewState,
    sizing: Option<SizingMode>,
    layout: Option<Layout>,
    frame_sync: FrameSync,
    progress_timer: IntervalTimer,
    blink_timer: IntervalTimer,
    grace_timer: DeadlineTimer,
    hide_timer: DeadlineTimer,
    pending_preload: Option<Pending<GridSize>>,
    pending_start: Option<Pending<Result<GridSize, EngineError>>>,
    last_error: Option<EngineError>,
    torn_down: bool,
}

impl<E: PlaybackEngine> PlayerController<E> {
    /// Create a controller around an engine and its signal channel.
    pub fn new(
        mut engine: E,
        signals: SignalReceiver,
        options: PlayerOptions,
        fullscreen: Box<dyn FullscreenHost>,
    ) -> Self {
        let pending_preload = if options.preload {
            engine.preload()
        } else {
            None
        };
        Self {
            engine,
            signals,
            fullscreen,
            state: ViewState::new(options.grid),
            sizing: options.sizing,
            layout: None,
            frame_sync: FrameSync::new(),
            progress_timer: IntervalTimer::new(PROGRESS_PERIOD),
            blink_timer: IntervalTimer::new(BLINK_PERIOD),
            grace_timer: DeadlineTimer::new(),
            hide_timer: DeadlineTimer::new(),
            pending_preload,
            pending_start: None,
            last_error: None,
            torn_down: false,
        }
    }

    // --- Playback actions --------------------------------------------------

    /// Request playback. Valid from `Initial`, or as a retry after a
    /// recorded start failure.
    pub fn play(&mut self, now: Instant) -> StateDelta {
        let mut delta = StateDelta::empty();
        if self.torn_down {
            return delta;
        }
        let retrying = self.last_error.is_some()
            && matches!(
                self.state.lifecycle,
                Lifecycle::Loading | Lifecycle::Waiting
            );
        if self.state.lifecycle != Lifecycle::Initial && !retrying {
            return delta;
        }

        info!(retrying, "play requested");
        self.last_error = None;
        self.set_lifecycle(Lifecycle::Loading, &mut delta);
        self.grace_timer.arm(now, GRACE_DELAY);
        self.pending_start = Some(self.engine.start());
        delta
    }

    /// Toggle pause. The engine's returned playing flag is ground truth.
    pub fn pause_or_resume(&mut self, now: Instant) -> StateDelta {
        let mut delta = StateDelta::empty();
        if self.torn_down
            || !matches!(
                self.state.lifecycle,
                Lifecycle::Playing | Lifecycle::Paused
            )
        {
            return delta;
        }

        if self.engine.pause_or_resume() {
            self.enter_playing(now, &mut delta);
        } else {
            self.enter_paused(&mut delta);
        }
        delta
    }

    // --- Scheduled work ----------------------------------------------------

    /// Pump wall-clock timers and externally resolving operations.
    pub fn tick(&mut self, now: Instant) -> StateDelta {
        let mut delta = StateDelta::empty();
        if self.torn_down {
            return delta;
        }

        if let Some(grid) = self.pending_preload.as_mut().and_then(Pending::try_take) {
            self.pending_preload = None;
            self.adopt_grid(grid, &mut delta);
        }

        let started = self.pending_start.as_mut().and_then(Pending::try_take);
        match started {
            Some(Ok(grid)) => {
                self.pending_start = None;
                self.grace_timer.cancel();
                info!(cols = grid.cols, rows = grid.rows, "playback started");
                self.adopt_grid(grid, &mut delta);
                self.set_lifecycle(Lifecycle::Playing, &mut delta);
                self.frame_sync.start();
                self.progress_timer.start(now);
                self.blink_timer.start(now);
            }
            Some(Err(error)) => {
                self.pending_start = None;
                self.grace_timer.cancel();
                warn!(%error, "engine start failed");
                self.last_error = Some(error);
                delta.mark(Changed::ERROR);
            }
            None => {}
        }

        if self.grace_timer.poll(now) && self.state.lifecycle == Lifecycle::Loading {
            self.set_lifecycle(Lifecycle::Waiting, &mut delta);
        }

        for signal in self.signals.drain() {
            match signal {
                EngineSignal::Finished => {
                    if self.state.lifecycle == Lifecycle::Playing {
                        info!("recording finished");
                        self.enter_paused(&mut delta);
                    }
                }
            }
        }

        if self.progress_timer.poll(now) > 0 {
            self.snapshot_progress(&mut delta);
        }

        // Odd period counts flip the phase; even counts cancel out.
        if self.blink_timer.poll(now) % 2 == 1 {
            self.state.blink = !self.state.blink;
            delta.mark(Changed::BLINK);
        }

        if self.hide_timer.poll(now) && self.state.show_controls {
            self.state.show_controls = false;
            delta.mark(Changed::CONTROLS);
        }

        delta
    }

    /// Run one display-refresh synchronization against the engine.
    pub fn frame(&mut self) -> StateDelta {
        if self.torn_down {
            return StateDelta::empty();
        }
        self.frame_sync.sync(&mut self.engine, &mut self.state)
    }

    // --- Input -------------------------------------------------------------

    /// Handle a key event. Unmodified space toggles pause; unmodified `f`
    /// toggles fullscreen; everything else is ignored.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> StateDelta {
        if !key.is_unmodified() {
            return StateDelta::empty();
        }
        match key.code {
            KeyCode::Char(' ') => self.pause_or_resume(now),
            KeyCode::Char('f') => self.toggle_fullscreen(),
            _ => StateDelta::empty(),
        }
    }

    /// Ask the host to toggle fullscreen. Best-effort: no view state
    /// changes here — the resize notification that follows a real switch
    /// is what drives the layout.
    pub fn toggle_fullscreen(&mut self) -> StateDelta {
        if self.torn_down {
            return StateDelta::empty();
        }
        let accepted = if self.fullscreen.is_active() {
            self.fullscreen.exit()
        } else {
            self.fullscreen.request()
        };
        if !accepted {
            debug!("fullscreen request rejected by host");
        }
        StateDelta::empty()
    }

    /// Report user activity: show the controls and re-arm the auto-hide
    /// debounce.
    pub fn user_activity(&mut self, now: Instant) -> StateDelta {
        let mut delta = StateDelta::empty();
        if self.torn_down {
            return delta;
        }
        self.hide_timer.arm(now, CONTROLS_HIDE_DELAY);
        if !self.state.show_controls {
            self.state.show_controls = true;
            delta.mark(Changed::CONTROLS);
        }
        delta
    }

    /// Hide the controls immediately and cancel any pending auto-hide.
    pub fn hide_controls(&mut self) -> StateDelta {
        let mut delta = StateDelta::empty();
        if self.torn_down {
            return delta;
        }
        self.hide_timer.cancel();
        if self.state.show_controls {
            self.state.show_controls = false;
            delta.mark(Changed::CONTROLS);
        }
        delta
    }

    // --- Geometry ----------------------------------------------------------

    /// Record measured cell metrics and recompute the layout.
    pub fn measure(&mut self, metrics: CharMetrics) -> StateDelta {
        let mut delta = StateDelta::empty();
        if self.torn_down {
            return delta;
        }
        if self.state.char_metrics != Some(metrics) {
            self.state.char_metrics = Some(metrics);
            delta.mark(Changed::METRICS);
        }
        self.refresh_layout(&mut delta);
        delta
    }

    /// Record a container resize and recompute the layout.
    pub fn container_resized(&mut self, size: ContainerSize) -> StateDelta {
        let mut delta = StateDelta::empty();
        if self.torn_down {
            return delta;
        }
        self.state.container = Some(size);
        self.refresh_layout(&mut delta);
        delta
    }

    // --- Teardown ----------------------------------------------------------

    /// Release everything: engine, wall-clock timers, refresh loop.
    /// Idempotent; safe even if play was never requested.
    pub fn teardown(&mut self) {
        self.engine.stop();
        self.progress_timer.stop();
        self.blink_timer.stop();
        self.grace_timer.cancel();
        self.hide_timer.cancel();
        self.frame_sync.stop();
        self.pending_preload = None;
        self.pending_start = None;
        if !self.torn_down {
            debug!("player torn down");
        }
        self.torn_down = true;
    }

    // --- Projections -------------------------------------------------------

    /// Read-only projection for the presentation layer.
    #[must_use]
    pub fn view(&self) -> PlayerView<'_> {
        PlayerView {
            lifecycle: self.state.lifecycle,
            grid: self.state.grid,
            lines: &self.state.lines,
            cursor: self.state.cursor,
            blink: self.state.blink,
            show_controls: self.state.show_controls,
            progress: self.state.progress,
            layout: self.layout,
            is_pausable: self.engine.is_pausable(),
            is_seekable: self.engine.is_seekable(),
        }
    }

    /// The full view state (read-only).
    #[must_use]
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.state.lifecycle
    }

    /// The memoized layout, if computable.
    #[must_use]
    pub fn layout(&self) -> Option<Layout> {
        self.layout
    }

    /// Last recorded playback error, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<&EngineError> {
        self.last_error.as_ref()
    }

    /// Whether the display-refresh synchronizer is scheduled.
    #[must_use]
    pub fn is_frame_sync_active(&self) -> bool {
        self.frame_sync.is_active()
    }

    /// Direct engine access, for tests that script resolutions.
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    // --- Internals ---------------------------------------------------------

    fn set_lifecycle(&mut self, lifecycle: Lifecycle, delta: &mut StateDelta) {
        if self.state.lifecycle != lifecycle {
            debug!(from = ?self.state.lifecycle, to = ?lifecycle, "lifecycle transition");
            self.state.lifecycle = lifecycle;
            delta.mark(Changed::LIFECYCLE);
        }
    }

    fn adopt_grid(&mut self, grid: GridSize, delta: &mut StateDelta) {
        if self.state.adopt_grid(grid) {
            debug!(cols = grid.cols, rows = grid.rows, "grid adopted");
            delta.mark(Changed::GRID);
            self.refresh_layout(delta);
        }
    }

    fn enter_playing(&mut self, now: Instant, delta: &mut StateDelta) {
        self.set_lifecycle(Lifecycle::Playing, delta);
        self.progress_timer.start(now);
        self.blink_timer.start(now);
    }

    fn enter_paused(&mut self, delta: &mut StateDelta) {
        self.set_lifecycle(Lifecycle::Paused, delta);
        self.snapshot_progress(delta);
        self.progress_timer.stop();
        self.blink_timer.stop();
        if !self.state.blink {
            self.state.blink = true;
            delta.mark(Changed::BLINK);
        }
    }

    fn snapshot_progress(&mut self, delta: &mut StateDelta) {
        let snapshot = ProgressSnapshot {
            current_time: self.engine.current_time(),
            remaining_time: self.engine.remaining_time(),
            ratio: self.engine.progress(),
        };
        if self.state.progress != Some(snapshot) {
            delta.mark(Changed::PROGRESS);
        }
        self.state.progress = Some(snapshot);
    }

    fn refresh_layout(&mut self, delta: &mut StateDelta) {
        let layout = compute_layout(
            self.state.char_metrics.as_ref(),
            self.state.grid,
            self.state.container.unwrap_or_default(),
            self.sizing,
            self.fullscreen.is_active(),
        );
        if layout != self.layout {
            self.layout = layout;
            delta.mark(Changed::LAYOUT);
        }
    }
}

/// Read-only projection of the controller for presentation components.
#[derive(Debug, Clone, Copy)]
pub struct PlayerView<'a> {
    /// Current lifecycle state.
    pub lifecycle: Lifecycle,
    /// Adopted grid, if known.
    pub grid: Option<GridSize>,
    /// Row contents.
    pub lines: &'a [Line],
    /// Cursor for the current frame.
    pub cursor: Option<CursorDescriptor>,
    /// Cursor blink phase.
    pub blink: bool,
    /// Control-bar visibility.
    pub show_controls: bool,
    /// Last polled progress.
    pub progress: Option<ProgressSnapshot>,
    /// Computed render layout.
    pub layout: Option<Layout>,
    /// Whether the pause control should be offered.
    pub is_pausable: bool,
    /// Whether the seek control should be offered.
    pub is_seekable: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use castview_core::event::Modifiers;
    use castview_engine::{ScriptedEngine, engine_signals};
    use crate::host::HeadlessFullscreen;

    const MS: Duration = Duration::from_millis(1);

    fn controller(
        engine: ScriptedEngine,
        options: PlayerOptions,
    ) -> PlayerController<ScriptedEngine> {
        let (_notifier, signals) = engine_signals();
        PlayerController::new(engine, signals, options, Box::new(HeadlessFullscreen::new()))
    }

    fn playing_controller(t0: Instant) -> PlayerController<ScriptedEngine> {
        let engine = ScriptedEngine::immediate(GridSize::new(80, 24));
        let mut player = controller(engine, PlayerOptions::default());
        let _ = player.play(t0);
        let _ = player.tick(t0 + MS);
        assert_eq!(player.lifecycle(), Lifecycle::Playing);
        player
    }

    #[test]
    fn play_is_only_valid_from_initial() {
        let t0 = Instant::now();
        let mut player = playing_controller(t0);
        let delta = player.play(t0 + 10 * MS);
        assert!(delta.is_empty());
        assert_eq!(player.engine_mut().start_calls, 1);
    }

    #[test]
    fn pause_before_play_is_a_no_op() {
        let t0 = Instant::now();
        let engine = ScriptedEngine::immediate(GridSize::DEFAULT);
        let mut player = controller(engine, PlayerOptions::default());

        let delta = player.pause_or_resume(t0);
        assert!(delta.is_empty());
        assert_eq!(player.engine_mut().pause_calls, 0);
    }

    #[test]
    fn blink_toggles_every_half_second_while_playing() {
        let t0 = Instant::now();
        let mut player = playing_controller(t0);
        let start = t0 + MS;

        assert!(player.state().blink);
        let delta = player.tick(start + 500 * MS);
        assert!(delta.contains(Changed::BLINK));
        assert!(!player.state().blink);

        let delta = player.tick(start + 1000 * MS);
        assert!(delta.contains(Changed::BLINK));
        assert!(player.state().blink);
    }

    #[test]
    fn stalled_tick_keeps_blink_parity() {
        let t0 = Instant::now();
        let mut player = playing_controller(t0);
        let start = t0 + MS;

        // Three periods elapse in one pump: net phase flip.
        let _ = player.tick(start + 1500 * MS);
        assert!(!player.state().blink);
    }

    #[test]
    fn pausing_forces_blink_steady_and_stops_polling() {
        let t0 = Instant::now();
        let mut player = playing_controller(t0);
        let start = t0 + MS;
        let _ = player.tick(start + 500 * MS);
        assert!(!player.state().blink);

        player.engine_mut().set_progress(12.0, 3.0, 0.8);
        let delta = player.pause_or_resume(start + 600 * MS);
        assert_eq!(player.lifecycle(), Lifecycle::Paused);
        assert!(player.state().blink);
        assert!(delta.contains(Changed::PROGRESS));
        assert_eq!(player.state().progress.unwrap().ratio, 0.8);

        // No further snapshots or blinks while paused.
        player.engine_mut().set_progress(99.0, 0.0, 1.0);
        let delta = player.tick(start + 5000 * MS);
        assert!(delta.is_empty());
        assert_eq!(player.state().progress.unwrap().ratio, 0.8);
    }

    #[test]
    fn progress_polls_every_hundred_millis() {
        let t0 = Instant::now();
        let mut player = playing_controller(t0);
        let start = t0 + MS;

        player.engine_mut().set_progress(1.0, 9.0, 0.1);
        assert!(player.tick(start + 99 * MS).is_empty());
        let delta = player.tick(start + 100 * MS);
        assert!(delta.contains(Changed::PROGRESS));
        assert_eq!(player.state().progress.unwrap().current_time, 1.0);
    }

    #[test]
    fn controls_hide_after_two_idle_seconds() {
        let t0 = Instant::now();
        let mut player = playing_controller(t0);

        let delta = player.user_activity(t0);
        assert!(delta.contains(Changed::CONTROLS));
        assert!(player.state().show_controls);

        let delta = player.tick(t0 + 2000 * MS);
        assert!(delta.contains(Changed::CONTROLS));
        assert!(!player.state().show_controls);
    }

    #[test]
    fn activity_at_the_boundary_extends_the_window() {
        let t0 = Instant::now();
        let mut player = playing_controller(t0);

        let _ = player.user_activity(t0);
        let _ = player.user_activity(t0 + 1999 * MS);

        let delta = player.tick(t0 + 2000 * MS);
        assert!(!delta.contains(Changed::CONTROLS));
        assert!(player.state().show_controls);

        let _ = player.tick(t0 + 3999 * MS);
        assert!(!player.state().show_controls);
    }

    #[test]
    fn explicit_hide_cancels_the_pending_timer() {
        let t0 = Instant::now();
        let mut player = playing_controller(t0);

        let _ = player.user_activity(t0);
        let delta = player.hide_controls();
        assert!(delta.contains(Changed::CONTROLS));
        assert!(!player.state().show_controls);

        // The cancelled deadline cannot resurface a hide notification.
        let delta = player.tick(t0 + 2000 * MS);
        assert!(!delta.contains(Changed::CONTROLS));
    }

    #[test]
    fn keyboard_space_toggles_pause() {
        let t0 = Instant::now();
        let mut player = playing_controller(t0);

        let delta = player.handle_key(KeyEvent::new(KeyCode::Char(' ')), t0 + 10 * MS);
        assert!(delta.contains(Changed::LIFECYCLE));
        assert_eq!(player.lifecycle(), Lifecycle::Paused);

        let _ = player.handle_key(KeyEvent::new(KeyCode::Char(' ')), t0 + 20 * MS);
        assert_eq!(player.lifecycle(), Lifecycle::Playing);
    }

    #[test]
    fn modified_keys_are_ignored() {
        let t0 = Instant::now();
        let mut player = playing_controller(t0);

        for modifiers in [
            Modifiers::CTRL,
            Modifiers::ALT,
            Modifiers::SHIFT,
            Modifiers::SUPER,
        ] {
            let key = KeyEvent::new(KeyCode::Char(' ')).with_modifiers(modifiers);
            assert!(player.handle_key(key, t0).is_empty());
        }
        assert_eq!(player.lifecycle(), Lifecycle::Playing);

        let delta = player.handle_key(KeyEvent::new(KeyCode::Char('x')), t0);
        assert!(delta.is_empty());
    }

    #[test]
    fn rejected_fullscreen_leaves_state_alone() {
        let t0 = Instant::now();
        let engine = ScriptedEngine::immediate(GridSize::DEFAULT);
        let (_notifier, signals) = engine_signals();
        let mut player = PlayerController::new(
            engine,
            signals,
            PlayerOptions {
                sizing: Some(SizingMode::FitWidth),
                ..PlayerOptions::default()
            },
            Box::new(HeadlessFullscreen::rejecting()),
        );
        let _ = player.measure(CharMetrics::new(8.0, 16.0));
        let _ = player.container_resized(ContainerSize::new(800.0, 600.0));
        let before = player.layout();

        let delta = player.handle_key(KeyEvent::new(KeyCode::Char('f')), t0);
        assert!(delta.is_empty());
        assert_eq!(player.layout(), before);
    }

    #[test]
    fn fullscreen_layout_updates_on_resize_not_on_request() {
        let engine = ScriptedEngine::immediate(GridSize::DEFAULT);
        let (_notifier, signals) = engine_signals();
        let mut player = PlayerController::new(
            engine,
            signals,
            PlayerOptions {
                sizing: Some(SizingMode::FitWidth),
                ..PlayerOptions::default()
            },
            Box::new(HeadlessFullscreen::new()),
        );
        let _ = player.measure(CharMetrics::new(10.0, 20.0));
        let _ = player.container_resized(ContainerSize::new(800.0, 400.0));

        // Wide container: in fullscreen the height axis would win, but the
        // request alone changes nothing until the host resizes us.
        let before = player.layout().unwrap();
        let _ = player.toggle_fullscreen();
        assert_eq!(player.layout().unwrap(), before);

        let delta = player.container_resized(ContainerSize::new(1920.0, 400.0));
        assert!(delta.contains(Changed::LAYOUT));
        assert_eq!(player.layout().unwrap().height, 400.0);
    }

    #[test]
    fn layout_recomputes_only_when_inputs_change() {
        let engine = ScriptedEngine::immediate(GridSize::DEFAULT);
        let mut player = controller(
            engine,
            PlayerOptions {
                sizing: Some(SizingMode::FitWidth),
                ..PlayerOptions::default()
            },
        );

        assert_eq!(player.layout(), None);
        let delta = player.measure(CharMetrics::new(8.0, 16.0));
        assert!(delta.contains(Changed::METRICS | Changed::LAYOUT));

        // Same container twice: second resize produces no layout change.
        let delta = player.container_resized(ContainerSize::new(640.0, 480.0));
        assert!(delta.contains(Changed::LAYOUT));
        let delta = player.container_resized(ContainerSize::new(640.0, 480.0));
        assert!(!delta.contains(Changed::LAYOUT));
    }

    #[test]
    fn start_failure_records_error_and_keeps_lifecycle() {
        let t0 = Instant::now();
        let engine = ScriptedEngine::held(GridSize::DEFAULT);
        let mut player = controller(engine, PlayerOptions::default());

        let _ = player.play(t0);
        player
            .engine_mut()
            .fail_start(castview_engine::EngineError::Source("offline".into()));
        let delta = player.tick(t0 + 10 * MS);

        assert!(delta.contains(Changed::ERROR));
        assert_eq!(player.lifecycle(), Lifecycle::Loading);
        assert!(player.last_error().is_some());
        assert!(!player.is_frame_sync_active());

        // Retry succeeds.
        let _ = player.play(t0 + 20 * MS);
        player.engine_mut().resolve_start();
        let _ = player.tick(t0 + 30 * MS);
        assert_eq!(player.lifecycle(), Lifecycle::Playing);
        assert!(player.last_error().is_none());
    }

    #[test]
    fn teardown_is_idempotent_and_safe_before_play() {
        let engine = ScriptedEngine::immediate(GridSize::DEFAULT);
        let mut player = controller(engine, PlayerOptions::default());
        player.teardown();
        player.teardown();
        assert_eq!(player.engine_mut().stop_calls, 2);

        // After teardown every entry point is inert.
        let t0 = Instant::now();
        assert!(player.play(t0).is_empty());
        assert!(player.tick(t0).is_empty());
        assert!(player.frame().is_empty());
        assert!(player.user_activity(t0).is_empty());
    }

    #[test]
    fn teardown_stops_running_playback() {
        let t0 = Instant::now();
        let mut player = playing_controller(t0);
        assert!(player.is_frame_sync_active());

        player.teardown();
        assert!(!player.is_frame_sync_active());
        assert!(!player.engine_mut().is_playing());
    }

    #[test]
    fn view_projects_capabilities_and_state() {
        let t0 = Instant::now();
        let engine =
            ScriptedEngine::immediate(GridSize::new(100, 30)).with_capabilities(true, true);
        let mut player = controller(engine, PlayerOptions::default());
        let _ = player.play(t0);
        let _ = player.tick(t0 + MS);

        let view = player.view();
        assert_eq!(view.lifecycle, Lifecycle::Playing);
        assert_eq!(view.grid, Some(GridSize::new(100, 30)));
        assert_eq!(view.lines.len(), 30);
        assert!(view.is_pausable);
        assert!(view.is_seekable);
    }

    #[test]
    fn preload_grid_is_adopted_before_play() {
        let t0 = Instant::now();
        let engine = ScriptedEngine::held(GridSize::new(100, 30))
            .with_preload(GridSize::new(120, 40));
        let mut player = controller(
            engine,
            PlayerOptions {
                preload: true,
                ..PlayerOptions::default()
            },
        );

        let delta = player.tick(t0);
        assert!(delta.contains(Changed::GRID));
        assert_eq!(player.state().grid, Some(GridSize::new(120, 40)));

        // The later start resolution does not overwrite it.
        let _ = player.play(t0 + MS);
        player.engine_mut().resolve_start();
        let _ = player.tick(t0 + 2 * MS);
        assert_eq!(player.state().grid, Some(GridSize::new(120, 40)));
        assert_eq!(player.state().lines.len(), 40);
    }
}
