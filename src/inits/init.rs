//! # Initializer contract.
//!
//! This module defines the [`Init`] trait, the interface every startup
//! participant implements: declare the identities it depends on, accept a
//! start signal, and report a short description. The common handle type is
//! [`InitRef`], an `Arc<dyn Init>` suitable for sharing across the runtime.
//!
//! Identity is a plain value ([`InitId`]), chosen by the integrating
//! application. The scheduler never inspects types; two initializers are "the
//! same kind" exactly when their ids are equal.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::core::CompletionHandle;
use crate::error::InitError;

/// Stable identity tag naming one kind of initializer.
///
/// Used both to declare prerequisites ("depends on the kind named X") and to
/// enforce that at most one instance of each kind is registered. Cheap to
/// clone; constructible from `&'static str` or `String`.
///
/// # Example
/// ```
/// use initvisor::InitId;
///
/// let id: InitId = "network".into();
/// assert_eq!(id.as_str(), "network");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InitId(Cow<'static, str>);

impl InitId {
    /// Creates an identity from any string-like value.
    pub fn new(id: impl Into<Cow<'static, str>>) -> Self {
        Self(id.into())
    }

    /// Returns the identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for InitId {
    fn from(id: &'static str) -> Self {
        Self(Cow::Borrowed(id))
    }
}

impl From<String> for InitId {
    fn from(id: String) -> Self {
        Self(Cow::Owned(id))
    }
}

impl fmt::Display for InitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shared handle to an initializer.
pub type InitRef = Arc<dyn Init>;

/// # One unit of startup work.
///
/// An `Init` has a stable [`id`](Init::id), an optional list of prerequisite
/// identities ([`requires`](Init::requires)), and a [`start`](Init::start)
/// method invoked exactly once by the scheduler when every prerequisite has
/// signaled completion.
///
/// ## Completion protocol
/// `start` receives a [`CompletionHandle`] and must arrange for
/// [`CompletionHandle::complete`] to be called **exactly once** with this
/// initializer's id — either inline before the start future resolves, or
/// later from any task once the subsystem's own asynchronous work is done.
/// The start future itself must return promptly: long-running work belongs in
/// a task the initializer spawns, not in the future the scheduler awaits.
///
/// Returning an `Err` from `start` is logged and published as an event; the
/// node then simply never completes, and everything depending on it stalls.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use initvisor::{CompletionHandle, Init, InitError, InitId};
///
/// struct Network;
///
/// #[async_trait]
/// impl Init for Network {
///     fn id(&self) -> InitId {
///         "network".into()
///     }
///
///     fn describe(&self) -> &str {
///         "network"
///     }
///
///     async fn start(&self, handle: CompletionHandle) -> Result<(), InitError> {
///         // connect, hand the rest to a background task, ...
///         handle.complete(&self.id()).await;
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Init: Send + Sync + 'static {
    /// Returns the identity this instance registers under.
    fn id(&self) -> InitId;

    /// Identities that must have completed before this node may start.
    ///
    /// Must be stable for the lifetime of the node. Order is not significant.
    /// Default: no prerequisites (eligible in the very first round).
    fn requires(&self) -> Vec<InitId> {
        Vec::new()
    }

    /// Short human-readable description used in diagnostics and the round log.
    fn describe(&self) -> &str;

    /// Accepts the start signal.
    ///
    /// Invoked exactly once per scheduling session, after all prerequisites
    /// completed. See the trait-level docs for the completion protocol.
    async fn start(&self, handle: CompletionHandle) -> Result<(), InitError>;
}
