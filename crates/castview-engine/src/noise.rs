#![forbid(unsafe_code)]

//! Random-output synthetic driver.
//!
//! Feeds the viewer a stream of random row updates at a fixed cadence —
//! useful for exercising the controller and renderer without a recording.
//! The stream is endless, so this driver never raises a finish signal.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use castview_core::clock::Clock;
use castview_core::cursor::CursorDescriptor;
use castview_core::grid::GridSize;
use castview_core::line::Line;

use crate::engine::{EngineConfig, EngineError, PlaybackEngine};
use crate::pending::Pending;

/// Base emission cadence before the speed multiplier is applied.
const BASE_INTERVAL: Duration = Duration::from_millis(33);

/// Default RNG seed; noise needs no entropy, only variety.
const DEFAULT_SEED: u64 = 0x6e6f_6973_65;

/// Synthetic engine producing random row content at ~30 rows/second.
pub struct NoiseSource {
    grid: GridSize,
    interval: Duration,
    speed: f64,
    clock: Box<dyn Clock>,
    rng: StdRng,
    started: bool,
    playing: bool,
    played: Duration,
    resumed_at: Option<Instant>,
    last_emit: Option<Instant>,
}

impl NoiseSource {
    /// Create a noise driver. Grid overrides in `config` apply; otherwise
    /// the 80×24 default is used.
    #[must_use]
    pub fn new(config: EngineConfig, clock: Box<dyn Clock>) -> Self {
        let grid = config.fixed_grid().unwrap_or(GridSize::DEFAULT);
        let speed = if config.speed > 0.0 { config.speed } else { 1.0 };
        Self {
            grid,
            interval: BASE_INTERVAL.div_f64(speed),
            speed,
            clock,
            rng: StdRng::seed_from_u64(DEFAULT_SEED),
            started: false,
            playing: false,
            played: Duration::ZERO,
            resumed_at: None,
            last_emit: None,
        }
    }

    /// Replace the RNG seed (the stream is pseudo-random by design).
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    fn random_line(&mut self) -> Line {
        let len = self.rng.random_range(1..=usize::from(self.grid.cols.max(1)));
        let text: String = (0..len)
            .map(|_| char::from(b'0' + self.rng.random_range(0..10u8)))
            .collect();
        Line::new(text)
    }

    fn running_time(&self) -> Duration {
        match self.resumed_at {
            Some(at) => self.played + self.clock.now().saturating_duration_since(at),
            None => self.played,
        }
    }
}

impl PlaybackEngine for NoiseSource {
    fn start(&mut self) -> Pending<Result<GridSize, EngineError>> {
        let now = self.clock.now();
        self.started = true;
        self.playing = true;
        self.played = Duration::ZERO;
        self.resumed_at = Some(now);
        self.last_emit = Some(now);
        debug!(cols = self.grid.cols, rows = self.grid.rows, "noise source started");
        Pending::ready(Ok(self.grid))
    }

    fn pause_or_resume(&mut self) -> bool {
        if !self.started {
            return false;
        }
        let now = self.clock.now();
        if self.playing {
            self.played = self.running_time();
            self.resumed_at = None;
            self.playing = false;
        } else {
            self.resumed_at = Some(now);
            self.last_emit = Some(now);
            self.playing = true;
        }
        self.playing
    }

    fn stop(&mut self) {
        if self.started {
            debug!("noise source stopped");
        }
        self.playing = false;
        self.started = false;
        self.resumed_at = None;
        self.last_emit = None;
    }

    fn cursor(&self) -> CursorDescriptor {
        CursorDescriptor::HIDDEN
    }

    fn changed_lines(&mut self) -> Vec<(usize, Line)> {
        if !self.playing {
            return Vec::new();
        }
        let now = self.clock.now();
        let Some(last) = self.last_emit else {
            return Vec::new();
        };
        let elapsed = now.saturating_duration_since(last);
        let due = (elapsed.as_nanos() / self.interval.as_nanos().max(1)) as u32;
        if due == 0 {
            return Vec::new();
        }
        self.last_emit = Some(last + self.interval * due);

        // One batch per poll; more than a screenful of backlog collapses.
        let rows = usize::from(self.grid.rows.max(1));
        let count = (due as usize).min(rows);
        (0..count)
            .map(|_| {
                let row = self.rng.random_range(0..rows);
                (row, self.random_line())
            })
            .collect()
    }

    fn current_time(&self) -> f64 {
        self.running_time().as_secs_f64() * self.speed
    }

    fn remaining_time(&self) -> f64 {
        0.0
    }

    fn progress(&self) -> f64 {
        0.0
    }
}
