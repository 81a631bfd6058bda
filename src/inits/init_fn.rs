//! # Function-backed initializer (`InitFn`)
//!
//! [`InitFn`] wraps a closure `F: Fn(CompletionHandle) -> Fut`, producing a
//! fresh future per start signal. Handy for wiring small subsystems without
//! declaring a struct per node.
//!
//! ## Example
//! ```rust
//! use initvisor::{CompletionHandle, InitError, InitFn, InitId, InitRef};
//!
//! let auth: InitRef = InitFn::arc("auth", vec!["network".into()], |handle: CompletionHandle| async move {
//!     // token refresh, session restore, ...
//!     handle.complete(&"auth".into()).await;
//!     Ok::<_, InitError>(())
//! });
//!
//! assert_eq!(auth.id(), InitId::from("auth"));
//! assert_eq!(auth.requires(), vec![InitId::from("network")]);
//! ```

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::core::CompletionHandle;
use crate::error::InitError;
use crate::inits::init::{Init, InitId};

/// Closure-backed initializer.
///
/// Wraps a closure that *creates* a new future per start signal. The id
/// doubles as the diagnostic description.
pub struct InitFn<F> {
    id: InitId,
    requires: Vec<InitId>,
    f: F,
}

impl<F> InitFn<F> {
    /// Creates a new function-backed initializer.
    ///
    /// Prefer [`InitFn::arc`] when you immediately need an [`InitRef`](crate::InitRef).
    pub fn new(id: impl Into<InitId>, requires: Vec<InitId>, f: F) -> Self {
        Self {
            id: id.into(),
            requires,
            f,
        }
    }

    /// Creates the initializer and returns it as a shared handle.
    pub fn arc(id: impl Into<InitId>, requires: Vec<InitId>, f: F) -> Arc<Self> {
        Arc::new(Self::new(id, requires, f))
    }
}

#[async_trait]
impl<F, Fut> Init for InitFn<F>
where
    F: Fn(CompletionHandle) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), InitError>> + Send + 'static,
{
    fn id(&self) -> InitId {
        self.id.clone()
    }

    fn requires(&self) -> Vec<InitId> {
        self.requires.clone()
    }

    fn describe(&self) -> &str {
        self.id.as_str()
    }

    async fn start(&self, handle: CompletionHandle) -> Result<(), InitError> {
        (self.f)(handle).await
    }
}
