//! Error types used by the scheduler and by initializer implementations.
//!
//! Three enums cover the taxonomy:
//!
//! - [`RegistryError`] — a registration was discarded (duplicate identity, or
//!   a prerequisite cycle under the rejecting policy).
//! - [`SchedulerError`] — engine-level misuse or a failed precondition check.
//! - [`InitError`] — what an initializer's start future may return.
//!
//! All variants provide `as_label()` for stable snake_case log/metric labels.
//! Graph-shape anomalies discovered *during* scheduling (missing
//! prerequisites, stray completion signals) are never propagated as errors;
//! they are logged and published as events, and the affected branch stalls.

use thiserror::Error;

use crate::inits::InitId;

/// # Errors produced by the registration operation.
///
/// Registration never panics and never corrupts the registry: on any of these
/// the registry is left exactly as it was, and the first registered instance
/// of an identity stays authoritative.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RegistryError {
    /// A second initializer was registered under an identity already claimed.
    #[error("identity {id} is already registered; keeping the first instance")]
    DuplicateId {
        /// The contested identity.
        id: InitId,
    },

    /// The candidate's prerequisites lead back to its own identity.
    ///
    /// Only returned under [`CyclePolicy::Reject`](crate::CyclePolicy::Reject);
    /// the log-only compatibility mode registers the node anyway.
    #[error("registering {id} would close a prerequisite cycle: {path}")]
    DependencyCycle {
        /// The candidate identity.
        id: InitId,
        /// The offending prerequisite path, rendered for the log.
        path: String,
    },
}

impl RegistryError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            RegistryError::DuplicateId { .. } => "registry_duplicate_id",
            RegistryError::DependencyCycle { .. } => "registry_dependency_cycle",
        }
    }
}

/// # Errors produced by the scheduling engine.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SchedulerError {
    /// `start()` was called more than once for the same session.
    #[error("scheduler already started")]
    AlreadyStarted,

    /// A declared prerequisite identity has no registered initializer.
    ///
    /// Returned by the opt-in [`validate`](crate::Scheduler::validate) pass;
    /// without it the dependent node stalls forever at runtime.
    #[error("{init} requires {requires}, which has no registered initializer")]
    MissingDependency {
        /// The dependent node.
        init: InitId,
        /// The identity that never registered.
        requires: InitId,
    },

    /// The registered graph contains a prerequisite cycle.
    ///
    /// Returned by [`validate`](crate::Scheduler::validate); catches cycles
    /// admitted under the log-only policy as well as cycles closed by late
    /// registrations that the per-registration probe cannot see.
    #[error("prerequisite cycle involving {id}")]
    DependencyCycle {
        /// A member of the cycle (first in registration order).
        id: InitId,
    },
}

impl SchedulerError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use initvisor::SchedulerError;
    ///
    /// assert_eq!(SchedulerError::AlreadyStarted.as_label(), "scheduler_already_started");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SchedulerError::AlreadyStarted => "scheduler_already_started",
            SchedulerError::MissingDependency { .. } => "scheduler_missing_dependency",
            SchedulerError::DependencyCycle { .. } => "scheduler_dependency_cycle",
        }
    }
}

/// # Errors produced by an initializer's start future.
///
/// The engine logs the error and publishes
/// [`EventKind::InitFailed`](crate::EventKind::InitFailed); the node never
/// completes and everything depending on it stalls. There is no retry.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum InitError {
    /// The subsystem could not begin its startup work.
    #[error("initializer failed: {error}")]
    Failed {
        /// The underlying error message.
        error: String,
    },
}

impl InitError {
    /// Convenience constructor.
    pub fn failed(error: impl Into<String>) -> Self {
        InitError::Failed {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use initvisor::InitError;
    ///
    /// let err = InitError::failed("dns lookup");
    /// assert_eq!(err.as_label(), "init_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            InitError::Failed { .. } => "init_failed",
        }
    }
}
