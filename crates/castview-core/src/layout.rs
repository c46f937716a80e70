#![forbid(unsafe_code)]

//! Responsive terminal layout calculator.
//!
//! Maps the fixed character grid into an arbitrary pixel container. Pure:
//! same inputs, same output, no host queries.
//!
//! # Decision Rule
//!
//! 1) No cell metrics yet → no layout (caller renders a zero-height
//!    placeholder).
//! 2) No sizing mode requested → fixed 200×100 placeholder at scale 1.
//! 3) Sizing mode [`SizingMode::FitBoth`] or fullscreen → compare container
//!    aspect ratio against the terminal's; a relatively wider container
//!    fits by height, otherwise by width.
//! 4) Any other sized case fits by width.
//!
//! # Invariants
//!
//! - Scaled output preserves the terminal aspect ratio exactly.
//! - Scale is never negative and never non-finite; degenerate inputs
//!   (zero container, zero metrics) clamp to scale 0 rather than erroring.

use crate::grid::GridSize;
use crate::metrics::{CharMetrics, ContainerSize};

/// Width of the placeholder layout used when no sizing mode is requested.
pub const PLACEHOLDER_WIDTH: f64 = 200.0;
/// Height of the placeholder layout used when no sizing mode is requested.
pub const PLACEHOLDER_HEIGHT: f64 = 100.0;

/// Requested responsive sizing behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizingMode {
    /// Always fill the container width; height follows the aspect ratio.
    FitWidth,
    /// Fit whichever axis is binding, keeping the whole terminal visible.
    FitBoth,
}

/// Computed render scale and pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Layout {
    /// Uniform scale factor applied to the natural terminal size.
    pub scale: f64,
    /// Output width in pixels.
    pub width: f64,
    /// Output height in pixels.
    pub height: f64,
}

/// Natural (unscaled) pixel size of the terminal grid.
///
/// Falls back to the 80×24 default when the grid is not yet known.
#[must_use]
pub fn natural_size(metrics: &CharMetrics, grid: Option<GridSize>) -> (f64, f64) {
    let grid = grid.unwrap_or(GridSize::DEFAULT);
    let width = metrics.char_w * f64::from(grid.cols) + metrics.border_w;
    let height = metrics.char_h * f64::from(grid.rows) + metrics.border_h;
    (width, height)
}

/// Compute the render layout for the current geometry.
///
/// Returns `None` until cell metrics are known. See the module docs for
/// the full decision rule.
#[must_use]
pub fn compute_layout(
    metrics: Option<&CharMetrics>,
    grid: Option<GridSize>,
    container: ContainerSize,
    sizing: Option<SizingMode>,
    fullscreen: bool,
) -> Option<Layout> {
    let metrics = metrics?;

    let Some(sizing) = sizing else {
        return Some(Layout {
            scale: 1.0,
            width: PLACEHOLDER_WIDTH,
            height: PLACEHOLDER_HEIGHT,
        });
    };

    let (terminal_w, terminal_h) = natural_size(metrics, grid);

    let fit_height = if sizing == SizingMode::FitBoth || fullscreen {
        // A container relatively wider than the terminal is height-bound.
        container.aspect_ratio() > terminal_w / terminal_h
    } else {
        false
    };

    let layout = if fit_height {
        let scale = container.height / terminal_h;
        Layout {
            scale,
            width: terminal_w * scale,
            height: container.height,
        }
    } else {
        let scale = container.width / terminal_w;
        Layout {
            scale,
            width: container.width,
            height: terminal_h * scale,
        }
    };

    Some(sanitize(layout))
}

/// Clamp degenerate outputs (zero metrics or container) to a zero layout.
fn sanitize(layout: Layout) -> Layout {
    let clamp = |v: f64| if v.is_finite() && v >= 0.0 { v } else { 0.0 };
    let scale = clamp(layout.scale);
    if scale == 0.0 {
        return Layout {
            scale: 0.0,
            width: 0.0,
            height: 0.0,
        };
    }
    Layout {
        scale,
        width: clamp(layout.width),
        height: clamp(layout.height),
    }
}
