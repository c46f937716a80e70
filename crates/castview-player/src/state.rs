#![forbid(unsafe_code)]

//! The view state owned by the player controller.
//!
//! A single mutable structure; the controller is its only writer. All
//! other components read through [`PlayerView`](crate::PlayerView)
//! projections. Row content and the cursor come exclusively from the
//! playback engine — nothing here is fabricated locally.

use castview_core::cursor::CursorDescriptor;
use castview_core::grid::GridSize;
use castview_core::line::Line;
use castview_core::metrics::{CharMetrics, ContainerSize};

/// Playback lifecycle of the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    /// No playback attempted yet; the start overlay is showing.
    #[default]
    Initial,
    /// Start requested; the engine has not resolved yet.
    Loading,
    /// Loading exceeded the grace period; a wait indicator is showing.
    /// Purely cosmetic — the pending start is unaffected.
    Waiting,
    /// Playback underway.
    Playing,
    /// Playback paused (by the user or by end of recording).
    Paused,
}

/// Polled time/progress snapshot. Stale between polls by design.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProgressSnapshot {
    /// Seconds of recording time elapsed.
    pub current_time: f64,
    /// Seconds of recording time left.
    pub remaining_time: f64,
    /// Position in `[0, 1]`.
    pub ratio: f64,
}

/// Everything the presentation layer renders from.
#[derive(Debug)]
pub struct ViewState {
    /// Current lifecycle state.
    pub lifecycle: Lifecycle,
    /// Grid dimensions; `None` until adopted. First writer wins.
    pub grid: Option<GridSize>,
    /// Row contents; `lines.len() == grid.rows` once the grid is known.
    pub lines: Vec<Line>,
    /// Cursor descriptor; replaced wholesale each synchronizer tick.
    pub cursor: Option<CursorDescriptor>,
    /// Cell and border pixel metrics; `None` until measured.
    pub char_metrics: Option<CharMetrics>,
    /// Hosting element size; `None` until observed.
    pub container: Option<ContainerSize>,
    /// Cursor blink phase. Always `true` (steady) when not playing.
    pub blink: bool,
    /// Whether the control bar is showing.
    pub show_controls: bool,
    /// Last polled progress; `None` until the first poll.
    pub progress: Option<ProgressSnapshot>,
}

impl ViewState {
    /// Create the initial state, optionally with a pre-fixed grid.
    #[must_use]
    pub fn new(grid: Option<GridSize>) -> Self {
        let mut state = Self {
            lifecycle: Lifecycle::Initial,
            grid: None,
            lines: Vec::new(),
            cursor: None,
            char_metrics: None,
            container: None,
            blink: true,
            show_controls: false,
            progress: None,
        };
        if let Some(grid) = grid {
            state.adopt_grid(grid);
        }
        state
    }

    /// Adopt grid dimensions. First writer wins: once a grid is set,
    /// later adoptions are ignored and `false` is returned.
    pub fn adopt_grid(&mut self, grid: GridSize) -> bool {
        if self.grid.is_some() {
            return false;
        }
        self.grid = Some(grid);
        self.lines = vec![Line::default(); usize::from(grid.rows)];
        true
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(None)
    }
}
