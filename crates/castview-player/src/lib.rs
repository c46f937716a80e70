#![forbid(unsafe_code)]

//! Player runtime: lifecycle controller, frame synchronizer, and timers.
//!
//! This crate ties the data model and the playback engine seam into a
//! working viewer. The [`PlayerController`] owns the single mutable
//! [`ViewState`](state::ViewState) and reconciles three scheduling
//! domains:
//!
//! - display refresh ([`PlayerController::frame`], guarded by
//!   [`FrameSync`]),
//! - wall-clock timers ([`PlayerController::tick`] pumping the
//!   [`timer`] facilities),
//! - external resolutions (engine start/preload pendings and the finish
//!   signal, drained inside `tick`).
//!
//! Every mutating entry point returns a [`StateDelta`] describing exactly
//! what changed, batched per call, so presentation layers re-render
//! minimally and never observe a half-updated frame.

pub mod controller;
pub mod delta;
pub mod frame_sync;
pub mod host;
pub mod runtime;
pub mod state;
pub mod timer;

pub use controller::{PlayerController, PlayerOptions, PlayerView};
pub use delta::{Changed, StateDelta};
pub use frame_sync::FrameSync;
pub use host::{FullscreenHost, HeadlessFullscreen};
pub use runtime::{PlayerCommand, PlayerLoop, StopHandle, StopSignal};
pub use state::{Lifecycle, ProgressSnapshot, ViewState};
pub use timer::{DeadlineTimer, IntervalTimer};
