//! Timer capability for auto-update
//!
//! The engine owns the decision of when timers exist; the host owns the
//! machinery that makes them fire. A [`Scheduler`] installs and cancels
//! timers, and on every expiry the host calls
//! [`Relatime::refresh`](crate::Relatime::refresh). The engine never runs a
//! thread or an event loop of its own.

use std::time::Duration;

/// Opaque identifier for an installed timer.
pub type TimerId = u64;

/// Trait for installing host timers.
pub trait Scheduler {
    /// Install a repeating timer firing every `every`.
    fn install(&mut self, every: Duration) -> TimerId;

    /// Install a timer that fires once after `after`.
    fn install_once(&mut self, after: Duration) -> TimerId;

    /// Cancel an installed timer. Unknown ids are ignored.
    fn cancel(&mut self, id: TimerId);
}
