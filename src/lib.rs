//! # initvisor
//!
//! **Initvisor** is a dependency-driven asynchronous initialization scheduler
//! for Rust.
//!
//! A set of independently-implemented subsystems ("initializers") declare
//! which other subsystems must finish starting before they may begin. The
//! scheduler brings them up in **rounds** that respect the declared partial
//! order — each round starts every node whose prerequisites have all signaled
//! completion — without any subsystem needing to know about any other.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │   InitRef    │   │   InitRef    │   │   InitRef    │
//!     │ (subsystem 1)│   │ (subsystem 2)│   │ (subsystem 3)│
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼ register()       ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Scheduler                                                        │
//! │  - Registry (identity → node + ExecState)                         │
//! │  - cycle probe per registration (reject or log-only)              │
//! │  - round loop (starts eligible nodes in registration order)       │
//! │  - Bus (broadcast events)                                         │
//! └──────┬──────────────────────┬─────────────────────────┬───────────┘
//!        ▼ start(handle)        ▼                         │
//!     subsystem 1            subsystem 2                  │ events
//!        │                      │                         ▼
//!        │ handle.complete(id)  │              ┌──────────────────────┐
//!        └──────────────────────┴─────────────►│    SubscriberSet     │
//!                 (next round)                 │ (per-sub queues +    │
//!                                              │  worker tasks)       │
//!                                              └──────────────────────┘
//! ```
//!
//! ### Lifecycle
//! ```text
//! Scheduler::builder(cfg).build()
//!   ├─► register(init) for every subsystem     (duplicates discarded,
//!   │                                           cycles rejected or logged)
//!   ├─► validate()                             (optional fail-fast pass)
//!   ├─► start()                                (round 0 + every round a
//!   │                                           synchronous completion
//!   │                                           cascades into)
//!   ├─► handle.complete(id) per subsystem      (each completion triggers
//!   │                                           the next round)
//!   └─► reset()                                (explicit reuse only)
//! ```
//!
//! A node may complete *inside* its own start call — a chain of such nodes
//! cascades through multiple dependency layers before `start()` returns — or
//! arbitrarily later from any task, for subsystems that genuinely wait on
//! network round-trips or background loading.
//!
//! ## Features
//! | Area              | Description                                                         | Key types / traits                    |
//! |-------------------|---------------------------------------------------------------------|---------------------------------------|
//! | **Contract**      | Define startup units with declared prerequisites.                   | [`Init`], [`InitFn`], [`InitId`]      |
//! | **Scheduling**    | Round-based partial-order startup with re-entrant completion.       | [`Scheduler`], [`CompletionHandle`]   |
//! | **Validation**    | Registration-time cycle probe plus opt-in fail-fast graph check.    | [`CyclePolicy`], [`Scheduler::validate`] |
//! | **Diagnostics**   | Expanded prerequisite report and per-round start log.               | [`Scheduler::report`], [`Scheduler::round_log`] |
//! | **Observability** | Subscribe to registration/round/completion events.                  | [`Subscribe`], [`Event`], [`EventKind`] |
//! | **Errors**        | Typed errors for registration, engine misuse, and start failures.   | [`RegistryError`], [`SchedulerError`], [`InitError`] |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use initvisor::{CompletionHandle, Config, InitError, InitFn, InitRef, Scheduler};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let scheduler = Scheduler::builder(Config::default()).build();
//!
//!     // No prerequisites: starts in round 0 and completes on the spot.
//!     let net: InitRef = InitFn::arc("net", vec![], |h: CompletionHandle| async move {
//!         h.complete(&"net".into()).await;
//!         Ok::<_, InitError>(())
//!     });
//!
//!     // Depends on net; a real subsystem would hand its slow work to a task
//!     // and signal completion from there.
//!     let auth: InitRef = InitFn::arc("auth", vec!["net".into()], |h: CompletionHandle| async move {
//!         h.complete(&"auth".into()).await;
//!         Ok::<_, InitError>(())
//!     });
//!
//!     scheduler.register(net).await?;
//!     scheduler.register(auth).await?;
//!     scheduler.validate().await?;
//!     scheduler.start().await?;
//!
//!     assert!(scheduler.is_completed(&"auth".into()).await);
//!     println!("{}", scheduler.report().await);
//!     Ok(())
//! }
//! ```

mod config;
mod core;
mod error;
mod events;
mod inits;
mod subscribers;

// ---- Public re-exports ----

pub use config::{Config, CyclePolicy};
pub use core::{CompletionHandle, ExecState, Scheduler, SchedulerBuilder};
pub use error::{InitError, RegistryError, SchedulerError};
pub use events::{Bus, Event, EventKind};
pub use inits::{Init, InitFn, InitId, InitRef};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
