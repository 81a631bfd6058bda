//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints events to stdout in a human-readable format.
//!
//! ## Output format
//! ```text
//! [registered] init=net
//! [starting] init=net round=0
//! [completed] init=net
//! [rejected] init=net reason="duplicate identity"
//! [cycle] init=session path="session -> auth -> session"
//! [missing-dep] init=stats requires=auth
//! [failed] init=assets err="initializer failed: manifest fetch"
//! ```
//!
//! Enabled via the `logging` feature. Not intended for production use —
//! implement a custom [`Subscribe`] for structured logging or metrics.

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Simple stdout logging subscriber.
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::InitRegistered => {
                println!("[registered] init={}", fmt(&e.init));
            }
            EventKind::RegistrationRejected => {
                println!(
                    "[rejected] init={} reason={:?}",
                    fmt(&e.init),
                    e.reason.as_deref().unwrap_or("")
                );
            }
            EventKind::CycleDetected => {
                println!(
                    "[cycle] init={} path={:?}",
                    fmt(&e.init),
                    e.reason.as_deref().unwrap_or("")
                );
            }
            EventKind::InitStarting => {
                if let (Some(init), Some(round)) = (&e.init, e.round) {
                    println!("[starting] init={init} round={round}");
                }
            }
            EventKind::InitCompleted => {
                println!("[completed] init={}", fmt(&e.init));
            }
            EventKind::InitFailed => {
                println!(
                    "[failed] init={} err={:?}",
                    fmt(&e.init),
                    e.reason.as_deref().unwrap_or("")
                );
            }
            EventKind::DependencyMissing => {
                println!(
                    "[missing-dep] init={} requires={}",
                    fmt(&e.init),
                    e.reason.as_deref().unwrap_or("?")
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "log_writer"
    }
}

fn fmt(init: &Option<std::sync::Arc<str>>) -> &str {
    init.as_deref().unwrap_or("?")
}
