#![forbid(unsafe_code)]

//! Per-refresh frame synchronizer.
//!
//! Once started, one [`sync`](FrameSync::sync) runs per display-refresh
//! opportunity: the engine is asked for the current cursor and the rows
//! that changed since the previous query, and both are committed to the
//! view state as one batch. The synchronizer is not a play/pause signal —
//! it keeps running across pauses and simply produces empty deltas while
//! the engine reports no changes.
//!
//! # Contract
//!
//! - Cursor is applied wholesale every tick; rows only when reported.
//! - All changes of one tick land in a single [`StateDelta`]; the
//!   presentation never observes a half-updated frame.
//! - `stop` is idempotent and safe if the synchronizer never started.

use tracing::{trace, warn};

use castview_engine::PlaybackEngine;

use crate::delta::{Changed, StateDelta};
use crate::state::ViewState;

/// Owned handle for the display-refresh work.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameSync {
    active: bool,
}

impl FrameSync {
    /// Create a stopped synchronizer.
    #[must_use]
    pub const fn new() -> Self {
        Self { active: false }
    }

    /// Begin synchronizing. Idempotent.
    pub fn start(&mut self) {
        self.active = true;
    }

    /// Stop synchronizing. Idempotent; safe if never started.
    pub fn stop(&mut self) {
        self.active = false;
    }

    /// Whether the synchronizer is running.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Run one synchronization tick against the engine.
    ///
    /// Returns an empty delta while stopped or when nothing changed.
    pub fn sync<E: PlaybackEngine>(&self, engine: &mut E, state: &mut ViewState) -> StateDelta {
        let mut delta = StateDelta::empty();
        if !self.active {
            return delta;
        }

        let cursor = engine.cursor();
        if state.cursor != Some(cursor) {
            delta.mark(Changed::CURSOR);
        }
        state.cursor = Some(cursor);

        let changed = engine.changed_lines();
        if changed.is_empty() {
            return delta;
        }

        for (row, line) in changed {
            let Some(slot) = state.lines.get_mut(row) else {
                warn!(row, rows = state.lines.len(), "dropping out-of-range row");
                continue;
            };
            if *slot != line {
                *slot = line;
                delta.mark_row(row);
            }
        }
        trace!(rows = delta.rows.len(), "frame delta applied");
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use castview_core::cursor::CursorDescriptor;
    use castview_core::grid::GridSize;
    use castview_core::line::Line;
    use castview_engine::ScriptedEngine;

    fn setup() -> (FrameSync, ScriptedEngine, ViewState) {
        let mut sync = FrameSync::new();
        sync.start();
        let engine = ScriptedEngine::immediate(GridSize::new(80, 24));
        let state = ViewState::new(Some(GridSize::new(80, 24)));
        (sync, engine, state)
    }

    #[test]
    fn stopped_sync_does_nothing() {
        let (mut sync, mut engine, mut state) = setup();
        sync.stop();
        engine.push_changed(0, "should not land");
        engine.set_cursor(CursorDescriptor::at(1, 1));

        let delta = sync.sync(&mut engine, &mut state);
        assert!(delta.is_empty());
        assert_eq!(state.cursor, None);
        assert!(state.lines[0].is_empty());
    }

    #[test]
    fn cursor_and_rows_commit_in_one_delta() {
        let (sync, mut engine, mut state) = setup();
        engine.set_cursor(CursorDescriptor::at(4, 2));
        engine.push_changed(2, "updated");

        let delta = sync.sync(&mut engine, &mut state);
        assert!(delta.contains(Changed::CURSOR | Changed::LINES));
        assert_eq!(delta.rows, vec![2]);
        assert_eq!(state.cursor, Some(CursorDescriptor::at(4, 2)));
        assert_eq!(state.lines[2], Line::new("updated"));
    }

    #[test]
    fn empty_report_leaves_rows_untouched_but_moves_cursor() {
        let (sync, mut engine, mut state) = setup();
        engine.push_changed(1, "first");
        let _ = sync.sync(&mut engine, &mut state);

        engine.set_cursor(CursorDescriptor::at(9, 9));
        let delta = sync.sync(&mut engine, &mut state);
        assert!(delta.contains(Changed::CURSOR));
        assert!(!delta.contains(Changed::LINES));
        assert_eq!(state.lines[1], Line::new("first"));
    }

    #[test]
    fn unchanged_content_produces_no_row_delta() {
        let (sync, mut engine, mut state) = setup();
        engine.push_changed(3, "same");
        let _ = sync.sync(&mut engine, &mut state);

        engine.push_changed(3, "same");
        let delta = sync.sync(&mut engine, &mut state);
        assert!(!delta.contains(Changed::LINES));
    }

    #[test]
    fn out_of_range_rows_are_dropped() {
        let (sync, mut engine, mut state) = setup();
        engine.push_changed(24, "beyond the grid");
        engine.push_changed(0, "in range");

        let delta = sync.sync(&mut engine, &mut state);
        assert_eq!(delta.rows, vec![0]);
        assert_eq!(state.lines.len(), 24);
    }

    #[test]
    fn stop_twice_never_panics() {
        let mut sync = FrameSync::new();
        sync.stop();
        sync.stop();
        sync.start();
        sync.stop();
        sync.stop();
        assert!(!sync.is_active());
    }
}
