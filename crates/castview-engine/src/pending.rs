#![forbid(unsafe_code)]

//! One-shot deferred resolution.
//!
//! A [`Pending`] stands for an operation whose result arrives later —
//! typically the engine's `start()` call, which resolves only when
//! playback is actually underway. The holder polls [`Pending::try_take`]
//! from its own loop; no async runtime is involved.

use std::sync::mpsc;

/// A value that will arrive at most once.
#[derive(Debug)]
pub struct Pending<T> {
    inner: Inner<T>,
}

#[derive(Debug)]
enum Inner<T> {
    Ready(Option<T>),
    Waiting(mpsc::Receiver<T>),
}

impl<T> Pending<T> {
    /// A pending that resolves immediately on the first poll.
    #[must_use]
    pub fn ready(value: T) -> Self {
        Self {
            inner: Inner::Ready(Some(value)),
        }
    }

    /// Create an unresolved pending plus the [`Resolver`] that completes it.
    #[must_use]
    pub fn channel() -> (Resolver<T>, Self) {
        let (tx, rx) = mpsc::channel();
        (
            Resolver { tx },
            Self {
                inner: Inner::Waiting(rx),
            },
        )
    }

    /// Take the value if it has arrived.
    ///
    /// Returns `Some` exactly once; later polls return `None`. A dropped
    /// [`Resolver`] leaves the pending unresolved forever, which is also
    /// reported as `None`.
    pub fn try_take(&mut self) -> Option<T> {
        match &mut self.inner {
            Inner::Ready(value) => value.take(),
            Inner::Waiting(rx) => rx.try_recv().ok(),
        }
    }
}

/// Completes a [`Pending`] created with [`Pending::channel`].
#[derive(Debug)]
pub struct Resolver<T> {
    tx: mpsc::Sender<T>,
}

impl<T> Resolver<T> {
    /// Deliver the value. A no-op if the pending side was dropped.
    pub fn resolve(self, value: T) {
        let _ = self.tx.send(value);
    }
}
