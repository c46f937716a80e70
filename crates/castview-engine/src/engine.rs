#![forbid(unsafe_code)]

//! The playback engine seam.
//!
//! Everything the viewer controller needs from a recording lives behind
//! [`PlaybackEngine`]: lifecycle (`start`/`pause_or_resume`/`stop`),
//! per-tick delta queries (`cursor`/`changed_lines`), and time queries.
//! Decoding, escape-sequence interpretation, and asset loading are the
//! engine's problem — the controller republishes reported state verbatim
//! and never fabricates rows or cursor positions.
//!
//! # Contract
//!
//! - `start()` resolves its [`Pending`] only when playback is actually
//!   underway; the resolved grid size is authoritative if the caller has
//!   not already fixed one.
//! - `pause_or_resume()` returns the engine's own playing flag after the
//!   toggle; callers must mirror it rather than compute their own.
//! - `stop()` is idempotent and must never panic, including before
//!   `start()`.
//! - `changed_lines()` reports only rows whose content changed since the
//!   previous call; an empty report means the display needs no row work.

use std::fmt;

use castview_core::cursor::CursorDescriptor;
use castview_core::grid::GridSize;
use castview_core::line::Line;

use crate::pending::Pending;

/// Recognized construction options for a playback engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Fixed grid columns, overriding whatever the recording declares.
    pub cols: Option<u16>,
    /// Fixed grid rows, overriding whatever the recording declares.
    pub rows: Option<u16>,
    /// Restart from the beginning instead of finishing.
    pub loop_playback: bool,
    /// Playback speed multiplier; `1.0` is real time.
    pub speed: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cols: None,
            rows: None,
            loop_playback: false,
            speed: 1.0,
        }
    }
}

impl EngineConfig {
    /// Grid implied by the configured overrides, if both are present.
    #[must_use]
    pub fn fixed_grid(&self) -> Option<GridSize> {
        match (self.cols, self.rows) {
            (Some(cols), Some(rows)) => Some(GridSize::new(cols, rows)),
            _ => None,
        }
    }
}

/// Failure while bringing a recording to life.
#[derive(Debug)]
pub enum EngineError {
    /// I/O failure reading the recording source.
    Io(std::io::Error),
    /// The recording source is missing or unreachable.
    Source(String),
    /// The recording is corrupt or in an unsupported format.
    Decode(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Io(e) => write!(f, "I/O error: {e}"),
            EngineError::Source(msg) => write!(f, "recording source unavailable: {msg}"),
            EngineError::Decode(msg) => write!(f, "recording decode failed: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Io(e) => Some(e),
            EngineError::Source(_) | EngineError::Decode(_) => None,
        }
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// A source of decoded terminal frames under playback control.
pub trait PlaybackEngine {
    /// Begin fetching recording metadata ahead of playback.
    ///
    /// Engines that cannot answer before `start()` return `None`.
    fn preload(&mut self) -> Option<Pending<GridSize>> {
        None
    }

    /// Begin playback. The pending resolves with the recording's grid once
    /// playback is underway, or with an error if the source cannot play.
    fn start(&mut self) -> Pending<Result<GridSize, EngineError>>;

    /// Toggle pause. Returns `true` when the engine is playing after the
    /// toggle — the authoritative playing flag.
    fn pause_or_resume(&mut self) -> bool;

    /// Tear playback down. Idempotent; safe before `start()`.
    fn stop(&mut self);

    /// Cursor state for the current frame.
    fn cursor(&self) -> CursorDescriptor;

    /// Rows whose content changed since the previous call, by index.
    fn changed_lines(&mut self) -> Vec<(usize, Line)>;

    /// Seconds of recording time elapsed.
    fn current_time(&self) -> f64;

    /// Seconds of recording time left.
    fn remaining_time(&self) -> f64;

    /// Playback position in `[0, 1]`.
    fn progress(&self) -> f64;

    /// Whether the pause control should be offered.
    fn is_pausable(&self) -> bool {
        true
    }

    /// Whether the seek control should be offered.
    fn is_seekable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_plays_once_at_real_time() {
        let cfg = EngineConfig::default();
        assert!(!cfg.loop_playback);
        assert_eq!(cfg.speed, 1.0);
        assert_eq!(cfg.fixed_grid(), None);
    }

    #[test]
    fn fixed_grid_requires_both_dimensions() {
        let cfg = EngineConfig {
            cols: Some(100),
            rows: None,
            ..EngineConfig::default()
        };
        assert_eq!(cfg.fixed_grid(), None);

        let cfg = EngineConfig {
            cols: Some(100),
            rows: Some(30),
            ..EngineConfig::default()
        };
        assert_eq!(cfg.fixed_grid(), Some(GridSize::new(100, 30)));
    }

    #[test]
    fn error_display_names_the_failure() {
        let err = EngineError::Decode("bad header".into());
        assert!(err.to_string().contains("bad header"));
        let err = EngineError::Source("gone".into());
        assert!(err.to_string().contains("unavailable"));
    }
}
