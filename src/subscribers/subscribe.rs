//! # Event subscriber trait.
//!
//! Provides [`Subscribe`], the extension point for plugging custom event
//! handlers (timing collectors, log sinks, progress UIs) into the scheduler.
//!
//! Each subscriber gets:
//! - **Dedicated worker task** (runs independently)
//! - **Per-subscriber bounded queue** (capacity via [`Subscribe::queue_capacity`])
//! - **Panic isolation** (panics are caught and logged, never propagated)
//!
//! ## Rules
//! - A slow subscriber only affects its own queue.
//! - Queue overflow drops the event **for this subscriber only**; other
//!   subscribers are unaffected.
//! - Events are processed sequentially (FIFO) per subscriber.
//! - Subscribers do not block publishers or each other.

use async_trait::async_trait;

use crate::events::Event;

/// Event subscriber for scheduling observability.
///
/// The `InitStarting`/`InitCompleted` pair is the natural hook for an
/// elapsed-time collector: stamp on starting, report on completed.
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the executor.
/// - Handle errors internally; do not panic.
/// - Slow processing affects only this subscriber's queue.
///
/// # Example
/// ```rust
/// use async_trait::async_trait;
/// use initvisor::{Event, EventKind, Subscribe};
///
/// struct Timings;
///
/// #[async_trait]
/// impl Subscribe for Timings {
///     async fn on_event(&self, ev: &Event) {
///         if matches!(ev.kind, EventKind::InitCompleted) {
///             // record elapsed duration for ev.init, etc.
///         }
///     }
///
///     fn name(&self) -> &'static str { "timings" }
/// }
/// ```
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Processes a single event.
    ///
    /// Called from a dedicated worker task, not in the publisher context.
    /// Events are delivered in FIFO order per subscriber.
    async fn on_event(&self, event: &Event);

    /// Returns the subscriber name used in logs for overflow/panic reports.
    ///
    /// Prefer short, descriptive names (e.g., "timings", "audit"). The
    /// default uses `type_name::<Self>()`, which can be verbose.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Returns the preferred queue capacity for this subscriber.
    ///
    /// On overflow the new event is dropped for this subscriber only and a
    /// warning is logged. The runtime clamps capacity to a minimum of 1.
    ///
    /// Default: 1024.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
