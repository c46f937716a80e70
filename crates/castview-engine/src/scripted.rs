#![forbid(unsafe_code)]

//! Scriptable engine for deterministic controller tests.
//!
//! `ScriptedEngine` plays whatever the test tells it to: start resolution
//! is held until the test releases it (or resolves immediately), row
//! deltas and cursor states are queued by hand, and the finish signal is
//! raised on demand. Call counters let tests assert on how the controller
//! drove the engine.

use castview_core::cursor::CursorDescriptor;
use castview_core::grid::GridSize;
use castview_core::line::Line;

use crate::engine::{EngineError, PlaybackEngine};
use crate::pending::{Pending, Resolver};
use crate::signal::EngineNotifier;

/// A playback engine with fully scripted behavior.
pub struct ScriptedEngine {
    grid: GridSize,
    immediate_start: bool,
    preload_grid: Option<GridSize>,
    start_resolver: Option<Resolver<Result<GridSize, EngineError>>>,
    notifier: Option<EngineNotifier>,
    playing: bool,
    queued: Vec<(usize, Line)>,
    cursor: CursorDescriptor,
    current_time: f64,
    remaining_time: f64,
    progress: f64,
    pausable: bool,
    seekable: bool,
    /// Number of `start()` calls observed.
    pub start_calls: u32,
    /// Number of `pause_or_resume()` calls observed.
    pub pause_calls: u32,
    /// Number of `stop()` calls observed.
    pub stop_calls: u32,
}

impl ScriptedEngine {
    /// An engine whose `start()` stays pending until
    /// [`resolve_start`](Self::resolve_start) is called.
    #[must_use]
    pub fn held(grid: GridSize) -> Self {
        Self::build(grid, false)
    }

    /// An engine whose `start()` resolves on the first poll.
    #[must_use]
    pub fn immediate(grid: GridSize) -> Self {
        Self::build(grid, true)
    }

    fn build(grid: GridSize, immediate_start: bool) -> Self {
        Self {
            grid,
            immediate_start,
            preload_grid: None,
            start_resolver: None,
            notifier: None,
            playing: false,
            queued: Vec::new(),
            cursor: CursorDescriptor::HIDDEN,
            current_time: 0.0,
            remaining_time: 0.0,
            progress: 0.0,
            pausable: true,
            seekable: false,
            start_calls: 0,
            pause_calls: 0,
            stop_calls: 0,
        }
    }

    /// Make `preload()` answer with the given grid.
    #[must_use]
    pub fn with_preload(mut self, grid: GridSize) -> Self {
        self.preload_grid = Some(grid);
        self
    }

    /// Attach the finish-notification handle.
    #[must_use]
    pub fn with_notifier(mut self, notifier: EngineNotifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Set the capability flags surfaced to the control bar.
    #[must_use]
    pub fn with_capabilities(mut self, pausable: bool, seekable: bool) -> Self {
        self.pausable = pausable;
        self.seekable = seekable;
        self
    }

    /// Release a held `start()` with the engine's grid.
    ///
    /// # Panics
    ///
    /// Panics if `start()` was not called first or already resolved.
    pub fn resolve_start(&mut self) {
        let resolver = self
            .start_resolver
            .take()
            .expect("no held start to resolve");
        self.playing = true;
        resolver.resolve(Ok(self.grid));
    }

    /// Release a held `start()` with a failure.
    ///
    /// # Panics
    ///
    /// Panics if `start()` was not called first or already resolved.
    pub fn fail_start(&mut self, error: EngineError) {
        let resolver = self
            .start_resolver
            .take()
            .expect("no held start to resolve");
        resolver.resolve(Err(error));
    }

    /// Queue a changed row for the next `changed_lines()` call.
    pub fn push_changed(&mut self, row: usize, line: impl Into<Line>) {
        self.queued.push((row, line.into()));
    }

    /// Set the cursor reported on subsequent ticks.
    pub fn set_cursor(&mut self, cursor: CursorDescriptor) {
        self.cursor = cursor;
    }

    /// Set the time/progress values reported to the poller.
    pub fn set_progress(&mut self, current: f64, remaining: f64, ratio: f64) {
        self.current_time = current;
        self.remaining_time = remaining;
        self.progress = ratio;
    }

    /// Raise the finish signal, as the engine does at end of recording.
    ///
    /// # Panics
    ///
    /// Panics if no notifier was attached.
    pub fn finish(&mut self) {
        self.playing = false;
        self.notifier
            .as_ref()
            .expect("no notifier attached")
            .finished();
    }

    /// The engine's own playing flag.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing
    }
}

impl PlaybackEngine for ScriptedEngine {
    fn preload(&mut self) -> Option<Pending<GridSize>> {
        self.preload_grid.map(Pending::ready)
    }

    fn start(&mut self) -> Pending<Result<GridSize, EngineError>> {
        self.start_calls += 1;
        if self.immediate_start {
            self.playing = true;
            Pending::ready(Ok(self.grid))
        } else {
            let (resolver, pending) = Pending::channel();
            self.start_resolver = Some(resolver);
            pending
        }
    }

    fn pause_or_resume(&mut self) -> bool {
        self.pause_calls += 1;
        self.playing = !self.playing;
        self.playing
    }

    fn stop(&mut self) {
        self.stop_calls += 1;
        self.playing = false;
    }

    fn cursor(&self) -> CursorDescriptor {
        self.cursor
    }

    fn changed_lines(&mut self) -> Vec<(usize, Line)> {
        std::mem::take(&mut self.queued)
    }

    fn current_time(&self) -> f64 {
        self.current_time
    }

    fn remaining_time(&self) -> f64 {
        self.remaining_time
    }

    fn progress(&self) -> f64 {
        self.progress
    }

    fn is_pausable(&self) -> bool {
        self.pausable
    }

    fn is_seekable(&self) -> bool {
        self.seekable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::engine_signals;

    #[test]
    fn held_start_resolves_only_on_release() {
        let mut engine = ScriptedEngine::held(GridSize::new(100, 30));
        let mut pending = engine.start();
        assert!(pending.try_take().is_none());

        engine.resolve_start();
        let grid = pending.try_take().unwrap().unwrap();
        assert_eq!(grid, GridSize::new(100, 30));
        assert!(engine.is_playing());
    }

    #[test]
    fn immediate_start_resolves_on_first_poll() {
        let mut engine = ScriptedEngine::immediate(GridSize::DEFAULT);
        let mut pending = engine.start();
        assert!(pending.try_take().unwrap().is_ok());
        assert_eq!(engine.start_calls, 1);
    }

    #[test]
    fn failed_start_reports_the_error() {
        let mut engine = ScriptedEngine::held(GridSize::DEFAULT);
        let mut pending = engine.start();
        engine.fail_start(EngineError::Source("offline".into()));

        let err = pending.try_take().unwrap().unwrap_err();
        assert!(err.to_string().contains("offline"));
        assert!(!engine.is_playing());
    }

    #[test]
    fn changed_lines_drains_the_queue() {
        let mut engine = ScriptedEngine::immediate(GridSize::DEFAULT);
        engine.push_changed(2, "hello");
        engine.push_changed(5, "world");

        let changed = engine.changed_lines();
        assert_eq!(changed.len(), 2);
        assert_eq!(changed[1], (5, Line::new("world")));
        assert!(engine.changed_lines().is_empty());
    }

    #[test]
    fn finish_raises_the_signal() {
        let (notifier, signals) = engine_signals();
        let mut engine = ScriptedEngine::immediate(GridSize::DEFAULT).with_notifier(notifier);
        let _ = engine.start();
        engine.finish();

        assert!(!engine.is_playing());
        assert_eq!(signals.drain().len(), 1);
    }

    #[test]
    fn pause_toggle_flips_the_playing_flag() {
        let mut engine = ScriptedEngine::immediate(GridSize::DEFAULT);
        let _ = engine.start();
        assert!(!engine.pause_or_resume());
        assert!(engine.pause_or_resume());
        assert_eq!(engine.pause_calls, 2);
    }
}
