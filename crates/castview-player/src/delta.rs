#![forbid(unsafe_code)]

//! Batched change descriptions.
//!
//! Instead of fine-grained reactive tracking, every mutation of the view
//! state is reported through a [`StateDelta`]: a set of changed aspects
//! plus the indices of rows that changed. One delta per entry point —
//! all changes within a synchronizer tick or timer pump commit as a
//! single observable unit.

use bitflags::bitflags;

bitflags! {
    /// Aspects of the view state that changed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Changed: u16 {
        /// Lifecycle state moved.
        const LIFECYCLE = 1 << 0;
        /// Grid dimensions were adopted.
        const GRID      = 1 << 1;
        /// One or more rows changed (see [`StateDelta::rows`]).
        const LINES     = 1 << 2;
        /// The cursor descriptor changed.
        const CURSOR    = 1 << 3;
        /// The blink phase flipped.
        const BLINK     = 1 << 4;
        /// Control-bar visibility changed.
        const CONTROLS  = 1 << 5;
        /// A fresh progress snapshot was published.
        const PROGRESS  = 1 << 6;
        /// The computed layout changed.
        const LAYOUT    = 1 << 7;
        /// Cell metrics were (re)measured.
        const METRICS   = 1 << 8;
        /// A playback error was recorded.
        const ERROR     = 1 << 9;
    }
}

/// What one controller entry point changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateDelta {
    /// Changed aspects.
    pub changed: Changed,
    /// Indices of rows that changed, deduplicated, in report order.
    pub rows: Vec<usize>,
}

impl StateDelta {
    /// A delta reporting no changes.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            changed: Changed::empty(),
            rows: Vec::new(),
        }
    }

    /// Whether nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }

    /// Record a changed aspect.
    pub fn mark(&mut self, aspect: Changed) {
        self.changed |= aspect;
    }

    /// Record a changed row.
    pub fn mark_row(&mut self, row: usize) {
        self.changed |= Changed::LINES;
        if !self.rows.contains(&row) {
            self.rows.push(row);
        }
    }

    /// Fold another delta into this one.
    pub fn merge(&mut self, other: Self) {
        self.changed |= other.changed;
        for row in other.rows {
            if !self.rows.contains(&row) {
                self.rows.push(row);
            }
        }
    }

    /// Whether the given aspect changed.
    #[must_use]
    pub fn contains(&self, aspect: Changed) -> bool {
        self.changed.contains(aspect)
    }
}

impl Default for StateDelta {
    fn default() -> Self {
        Self::empty()
    }
}
