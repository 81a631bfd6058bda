//! # Scheduling events published by the registry and the engine.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Registration events**: accepted, rejected, cycle detected
//! - **Round events**: node starting, node completed, start failure
//! - **Graph diagnostics**: missing prerequisite evaluations
//!
//! [`Event`] carries the metadata a kind sets: the node's identity, the round
//! number, a human-readable reason.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order when events are
//! delivered out of order.
//!
//! ## Example
//! ```rust
//! use initvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::InitStarting)
//!     .with_init("auth")
//!     .with_round(1);
//!
//! assert_eq!(ev.kind, EventKind::InitStarting);
//! assert_eq!(ev.init.as_deref(), Some("auth"));
//! assert_eq!(ev.round, Some(1));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of scheduling events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Registration events ===
    /// An initializer was accepted into the registry.
    ///
    /// Sets:
    /// - `init`: the registered identity
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    InitRegistered,

    /// A registration was discarded (duplicate identity, or a cycle under the
    /// rejecting policy). The registry is unchanged.
    ///
    /// Sets:
    /// - `init`: the rejected identity
    /// - `reason`: why it was discarded
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    RegistrationRejected,

    /// The registration-time probe found a prerequisite path leading back to
    /// the candidate's own identity.
    ///
    /// Sets:
    /// - `init`: the candidate identity
    /// - `reason`: the offending path
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    CycleDetected,

    // === Round events ===
    /// A node is about to receive its start signal.
    ///
    /// Sets:
    /// - `init`: node identity
    /// - `round`: the round it was started in
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    InitStarting,

    /// A node signaled completion (first signal only; duplicates are silent).
    ///
    /// Sets:
    /// - `init`: node identity
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    InitCompleted,

    /// A node's start future returned an error. The node will never complete.
    ///
    /// Sets:
    /// - `init`: node identity
    /// - `reason`: the error message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    InitFailed,

    // === Graph diagnostics ===
    /// A declared prerequisite resolves to no registered node; the dependent
    /// cannot start. Published on every round that evaluates the dependent.
    ///
    /// Sets:
    /// - `init`: the dependent node
    /// - `reason`: the missing identity
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    DependencyMissing,
}

/// Scheduling event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Identity of the node, if applicable.
    pub init: Option<Arc<str>>,
    /// Round number, for round events.
    pub round: Option<u64>,
    /// Human-readable reason (rejections, cycles, missing identities).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next
    /// sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            init: None,
            round: None,
            reason: None,
        }
    }

    /// Attaches a node identity.
    #[inline]
    pub fn with_init(mut self, init: impl Into<Arc<str>>) -> Self {
        self.init = Some(init.into());
        self
    }

    /// Attaches a round number.
    #[inline]
    pub fn with_round(mut self, round: u64) -> Self {
        self.round = Some(round);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}
