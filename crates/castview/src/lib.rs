#![forbid(unsafe_code)]

//! castview public facade crate.
//!
//! This crate provides the stable, ergonomic surface area for embedders.
//! It re-exports common types from the internal crates and offers a
//! lightweight prelude for day-to-day usage.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use castview_core::clock::{Clock, ManualClock, SystemClock};
pub use castview_core::cursor::{CursorDescriptor, CursorShape};
pub use castview_core::event::{KeyCode, KeyEvent, Modifiers};
pub use castview_core::grid::GridSize;
pub use castview_core::layout::{Layout, SizingMode, compute_layout};
pub use castview_core::line::Line;
pub use castview_core::metrics::{CharMetrics, ContainerSize};

// --- Engine re-exports -----------------------------------------------------

pub use castview_engine::{
    ClockSource, EngineConfig, EngineError, EngineNotifier, EngineSignal, NoiseSource, Pending,
    PlaybackEngine, Resolver, ScriptedEngine, SignalReceiver, engine_signals,
};

// --- Player re-exports -----------------------------------------------------

pub use castview_player::{
    Changed, FullscreenHost, HeadlessFullscreen, Lifecycle, PlayerCommand, PlayerController,
    PlayerLoop, PlayerOptions, PlayerView, ProgressSnapshot, StateDelta, StopHandle, ViewState,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for castview embedders.
#[derive(Debug)]
pub enum Error {
    /// Playback engine failure.
    Engine(EngineError),
    /// Host environment error with message.
    Host(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Engine(err) => write!(f, "{err}"),
            Self::Host(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Engine(err) => Some(err),
            Self::Host(_) => None,
        }
    }
}

impl From<EngineError> for Error {
    fn from(err: EngineError) -> Self {
        Self::Engine(err)
    }
}

/// Standard result type for castview APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Changed, EngineConfig, Error, GridSize, KeyCode, KeyEvent, Lifecycle, PlaybackEngine,
        PlayerCommand, PlayerController, PlayerLoop, PlayerOptions, Result, SizingMode,
        StateDelta,
    };

    pub use crate::{core, engine, player};
}

pub use castview_core as core;
pub use castview_engine as engine;
pub use castview_player as player;
