//! # Scheduler configuration.
//!
//! Provides [`Config`], the settings handed to
//! [`Scheduler::builder`](crate::Scheduler::builder), and [`CyclePolicy`],
//! the registration-time cycle handling mode.

/// What to do when the registration-time probe finds a prerequisite cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CyclePolicy {
    /// Reject the registration with
    /// [`RegistryError::DependencyCycle`](crate::RegistryError::DependencyCycle).
    ///
    /// The default: a broken graph is refused up front instead of stalling
    /// silently at startup.
    #[default]
    Reject,

    /// Log the cycle and register the node anyway.
    ///
    /// Compatibility mode. The cyclic branch never becomes eligible, so every
    /// node on it stalls permanently; the only trace is the warning logged
    /// here and the per-round diagnostics.
    LogOnly,
}

/// Configuration for the scheduler.
///
/// ## Field semantics
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped by the bus)
/// - `cycle_policy`: registration-time cycle handling (reject vs. log-only)
///
/// All fields are public; construct with struct update syntax over
/// [`Config::default`].
#[derive(Clone, Debug)]
pub struct Config {
    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow subscribers that lag behind more than `bus_capacity` events will
    /// observe `Lagged` and skip older items. Minimum value is 1.
    pub bus_capacity: usize,

    /// How a prerequisite cycle detected at registration time is handled.
    pub cycle_policy: CyclePolicy,
}

impl Config {
    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `bus_capacity = 1024` (good baseline)
    /// - `cycle_policy = CyclePolicy::Reject`
    fn default() -> Self {
        Self {
            bus_capacity: 1024,
            cycle_policy: CyclePolicy::default(),
        }
    }
}
