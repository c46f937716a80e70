#![forbid(unsafe_code)]

//! Digital-clock synthetic driver.
//!
//! Renders the local wall-clock time as a centered `HH:MM` row, updating
//! once per minute. The recording notionally spans one day; progress is
//! the minute-of-day over 24×60. Crossing midnight ends the recording
//! unless looping is configured.

use chrono::{Local, Timelike};
use tracing::debug;

use castview_core::cursor::CursorDescriptor;
use castview_core::grid::GridSize;
use castview_core::line::Line;

use crate::engine::{EngineConfig, EngineError, PlaybackEngine};
use crate::pending::Pending;
use crate::signal::EngineNotifier;

/// Minutes in the notional one-day recording.
const DAY_MINUTES: f64 = 24.0 * 60.0;

/// Grid used when the caller does not override dimensions.
const DEFAULT_GRID: GridSize = GridSize::new(5, 1);

/// Synthetic engine displaying the local time of day.
pub struct ClockSource {
    grid: GridSize,
    loop_playback: bool,
    notifier: EngineNotifier,
    started: bool,
    playing: bool,
    shown_minute: Option<u32>,
}

impl ClockSource {
    /// Create a clock driver. Without grid overrides a 5×1 grid is used,
    /// just wide enough for `HH:MM`.
    #[must_use]
    pub fn new(config: EngineConfig, notifier: EngineNotifier) -> Self {
        Self {
            grid: config.fixed_grid().unwrap_or(DEFAULT_GRID),
            loop_playback: config.loop_playback,
            notifier,
            started: false,
            playing: false,
            shown_minute: None,
        }
    }

    /// Row index the time is rendered on.
    #[must_use]
    pub fn display_row(&self) -> usize {
        usize::from(self.grid.rows / 2)
    }

    fn minute_of_day() -> u32 {
        let now = Local::now();
        now.hour() * 60 + now.minute()
    }
}

/// Format one clock row: a zero-padded `HH:MM` centered in `cols` cells.
#[must_use]
pub fn format_clock_row(hour: u32, minute: u32, cols: u16) -> Line {
    let left_pad = usize::from(cols / 2).saturating_sub(2);
    Line::new(format!("{}{hour:02}:{minute:02}", " ".repeat(left_pad)))
}

impl PlaybackEngine for ClockSource {
    fn start(&mut self) -> Pending<Result<GridSize, EngineError>> {
        self.started = true;
        self.playing = true;
        self.shown_minute = None;
        debug!(cols = self.grid.cols, rows = self.grid.rows, "clock source started");
        Pending::ready(Ok(self.grid))
    }

    fn pause_or_resume(&mut self) -> bool {
        if !self.started {
            return false;
        }
        self.playing = !self.playing;
        self.playing
    }

    fn stop(&mut self) {
        self.playing = false;
        self.started = false;
        self.shown_minute = None;
    }

    fn cursor(&self) -> CursorDescriptor {
        CursorDescriptor::HIDDEN
    }

    fn changed_lines(&mut self) -> Vec<(usize, Line)> {
        if !self.playing {
            return Vec::new();
        }
        let minute = Self::minute_of_day();
        if self.shown_minute == Some(minute) {
            return Vec::new();
        }
        if let Some(last) = self.shown_minute
            && minute < last
        {
            // Wrapped past midnight: the notional recording is over.
            if !self.loop_playback {
                self.playing = false;
                self.notifier.finished();
                return Vec::new();
            }
        }
        self.shown_minute = Some(minute);
        vec![(
            self.display_row(),
            format_clock_row(minute / 60, minute % 60, self.grid.cols),
        )]
    }

    fn current_time(&self) -> f64 {
        f64::from(Self::minute_of_day())
    }

    fn remaining_time(&self) -> f64 {
        DAY_MINUTES - self.current_time()
    }

    fn progress(&self) -> f64 {
        self.current_time() / DAY_MINUTES
    }
}
