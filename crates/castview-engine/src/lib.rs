#![forbid(unsafe_code)]

//! Playback engine interface and synthetic drivers.
//!
//! The viewer controller consumes recordings through the [`PlaybackEngine`]
//! trait: start/pause/stop lifecycle, per-tick cursor and changed-line
//! queries, and time/progress queries. Long-running operations resolve
//! through [`Pending`] handles; end-of-recording is reported through the
//! [`EngineNotifier`] channel handed to the engine at construction.
//!
//! # Key Components
//!
//! - [`PlaybackEngine`] - the engine seam the controller drives
//! - [`EngineConfig`] - recognized construction options (grid, loop, speed)
//! - [`Pending`] / [`Resolver`] - one-shot deferred resolution
//! - [`EngineNotifier`] / [`SignalReceiver`] - finish notification channel
//! - [`NoiseSource`] / [`ClockSource`] - synthetic drivers for exercising
//!   the controller without a real recording
//! - [`ScriptedEngine`] - fully scriptable test double

pub mod clock_source;
pub mod engine;
pub mod noise;
pub mod pending;
pub mod scripted;
pub mod signal;

pub use clock_source::ClockSource;
pub use engine::{EngineConfig, EngineError, PlaybackEngine};
pub use noise::NoiseSource;
pub use pending::{Pending, Resolver};
pub use scripted::ScriptedEngine;
pub use signal::{EngineNotifier, EngineSignal, SignalReceiver, engine_signals};
