//! # Scheduler: dependency-ordered startup in rounds.
//!
//! The [`Scheduler`] owns the registry of initializers, the round counter,
//! and the event bus. External code registers every participant, calls
//! [`Scheduler::start`] once, and each participant signals completion through
//! the [`CompletionHandle`] it received — synchronously from inside its own
//! start call, or from any task arbitrarily later.
//!
//! ## High-level flow
//! ```text
//! register(init) ─► Registry (identity → node + ExecState)
//!                      │ cycle probe per registration (reject or log-only)
//!                      ▼
//! start() ──► round 0: start every node with zero unmet prerequisites
//!                      │
//!   handle.complete(id) ──► mark completed ──► next round: start every node
//!                      │                        whose prerequisites are all
//!                      │                        completed and that has not
//!                      │                        started yet
//!                      └─ repeats until no node can be unblocked
//! ```
//!
//! ## Rounds
//! A round snapshots the set of eligible nodes before starting any of them,
//! then starts them in registration order. Eligibility only changes when a
//! node completes, so starting a node never affects a sibling within the same
//! round. Rounds are numbered from 0; a pass that starts nothing consumes no
//! number, which keeps duplicate completion signals numbering-neutral.
//!
//! ## Re-entrancy
//! A node may signal completion from inside its own start call. The round
//! loop runs behind a `draining` guard: a nested signal only marks state, and
//! the one active loop picks the new completion up on its next pass. Chains
//! of instantly-completing nodes therefore cascade through arbitrarily many
//! rounds without growing the stack, all before `start()` returns.
//!
//! ## Termination
//! There is no "all done" signal. External code knows its own node set and
//! observes completion per node ([`Scheduler::state_of`], the event bus, or a
//! sentinel node that depends on everything that must finish first). A node
//! whose prerequisites can never be satisfied stalls forever and is surfaced
//! only through per-round diagnostics — or up front via
//! [`Scheduler::validate`].

use std::sync::Weak;
use std::time::SystemTime;

use tokio::sync::RwLock;

use crate::config::{Config, CyclePolicy};
use crate::error::{RegistryError, SchedulerError};
use crate::events::{Bus, Event, EventKind};
use crate::inits::{InitId, InitRef};

use super::registry::{ExecState, Registry};
use super::report;
use super::validate;

struct Inner {
    registry: Registry,
    round: u64,
    round_log: Vec<(u64, String)>,
    engine_started: bool,
    draining: bool,
}

/// Dependency-driven initialization scheduler.
///
/// Explicitly constructed via [`Scheduler::builder`] and shared as an
/// `Arc<Scheduler>`; there is no ambient global instance. Lifecycle:
/// create → register all → [`start`](Scheduler::start) → observe completions
/// → [`reset`](Scheduler::reset) if the startup sequence runs again in the
/// same process.
///
/// All shared state lives behind one async lock; the lock is never held
/// across a call into initializer code, so completion signals may arrive
/// from any task — including from inside a start call — without deadlock.
///
/// # Example
/// ```
/// use initvisor::{CompletionHandle, Config, InitError, InitFn, InitRef, Scheduler};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let scheduler = Scheduler::builder(Config::default()).build();
///
/// let net: InitRef = InitFn::arc("net", vec![], |h: CompletionHandle| async move {
///     h.complete(&"net".into()).await;
///     Ok::<_, InitError>(())
/// });
/// let auth: InitRef = InitFn::arc("auth", vec!["net".into()], |h: CompletionHandle| async move {
///     h.complete(&"auth".into()).await;
///     Ok::<_, InitError>(())
/// });
///
/// scheduler.register(net).await?;
/// scheduler.register(auth).await?;
/// scheduler.validate().await?;
/// scheduler.start().await?;
///
/// // Both completed synchronously, cascading across two rounds.
/// assert_eq!(scheduler.round_log().await, vec![(0, "net".into()), (1, "auth".into())]);
/// # Ok(())
/// # }
/// ```
pub struct Scheduler {
    cfg: Config,
    bus: Bus,
    inner: RwLock<Inner>,
    self_ref: Weak<Scheduler>,
}

/// Handle an initializer uses to signal that its startup work finished.
///
/// Cloneable and callable from any task. Holds only a weak reference to the
/// scheduler; signaling after the scheduler is gone is a no-op.
#[derive(Clone)]
pub struct CompletionHandle {
    sched: Weak<Scheduler>,
}

impl CompletionHandle {
    /// Signals that the node with the given identity completed its startup.
    ///
    /// Must be called exactly once per started node. An unknown identity is
    /// ignored (a stray or duplicate callback must not corrupt shared state);
    /// a repeated signal re-stamps the completion time and nothing else.
    /// Triggers the next scheduling round.
    pub async fn complete(&self, id: &InitId) {
        if let Some(sched) = self.sched.upgrade() {
            sched.signal_completed(id).await;
        }
    }
}

impl Scheduler {
    /// Returns a builder for a scheduler with the given configuration.
    pub fn builder(cfg: Config) -> super::builder::SchedulerBuilder {
        super::builder::SchedulerBuilder::new(cfg)
    }

    pub(crate) fn new_internal(cfg: Config, bus: Bus, self_ref: Weak<Scheduler>) -> Self {
        Self {
            cfg,
            bus,
            inner: RwLock::new(Inner {
                registry: Registry::new(),
                round: 0,
                round_log: Vec::new(),
                engine_started: false,
                draining: false,
            }),
            self_ref,
        }
    }

    /// Registers one initializer under its declared identity.
    ///
    /// Runs the cycle probe before insertion. A duplicate identity is logged
    /// and discarded — the first registration stays authoritative. A detected
    /// cycle is rejected under [`CyclePolicy::Reject`] and logged-but-admitted
    /// under [`CyclePolicy::LogOnly`].
    ///
    /// Registration is expected to happen before [`start`](Scheduler::start);
    /// a later registration is tolerated with a warning and joins the next
    /// round like any other node.
    pub async fn register(&self, init: InitRef) -> Result<(), RegistryError> {
        let id = init.id();
        let requires = init.requires();
        let mut inner = self.inner.write().await;

        if inner.registry.contains(&id) {
            tracing::error!(init = %id, "duplicate identity registration discarded; first instance wins");
            self.bus.publish(
                Event::new(EventKind::RegistrationRejected)
                    .with_init(id.as_str())
                    .with_reason("duplicate identity"),
            );
            return Err(RegistryError::DuplicateId { id });
        }

        if let Some(cycle) = validate::find_cycle(&inner.registry, &id, &requires) {
            let path = validate::render_path(&id, &cycle);
            self.bus.publish(
                Event::new(EventKind::CycleDetected)
                    .with_init(id.as_str())
                    .with_reason(path.clone()),
            );
            match self.cfg.cycle_policy {
                CyclePolicy::Reject => {
                    tracing::error!(init = %id, %path, "prerequisite cycle; registration rejected");
                    self.bus.publish(
                        Event::new(EventKind::RegistrationRejected)
                            .with_init(id.as_str())
                            .with_reason("prerequisite cycle"),
                    );
                    return Err(RegistryError::DependencyCycle { id, path });
                }
                CyclePolicy::LogOnly => {
                    tracing::warn!(init = %id, %path, "prerequisite cycle; registering anyway");
                }
            }
        }

        if inner.engine_started {
            tracing::warn!(init = %id, "registration after start; node joins the next round");
        }

        inner.registry.insert(init);
        self.bus
            .publish(Event::new(EventKind::InitRegistered).with_init(id.as_str()));
        tracing::debug!(init = %id, "initializer registered");
        Ok(())
    }

    /// Fail-fast precondition check, intended to run between the last
    /// registration and [`start`](Scheduler::start).
    ///
    /// Verifies that every declared prerequisite identity resolves to a
    /// registered node and that the whole graph is acyclic. Without this
    /// call, a misconfigured branch is discovered only through per-round
    /// error logs while it stalls.
    pub async fn validate(&self) -> Result<(), SchedulerError> {
        let inner = self.inner.read().await;
        validate::check_registered(&inner.registry)
    }

    /// Begins the startup sequence. Call exactly once per session.
    ///
    /// Performs round 0 (every node with no prerequisites) and keeps running
    /// rounds as long as nodes complete synchronously from inside their own
    /// start calls. Returns once no further node can be unblocked without an
    /// asynchronous completion; it never waits for in-flight subsystems.
    pub async fn start(&self) -> Result<(), SchedulerError> {
        {
            let mut inner = self.inner.write().await;
            if inner.engine_started {
                tracing::error!("start() called more than once");
                return Err(SchedulerError::AlreadyStarted);
            }
            inner.engine_started = true;
            inner.draining = true;
        }
        tracing::debug!("startup sequence begins");
        self.drain().await;
        Ok(())
    }

    /// Returns a completion handle for this scheduler.
    ///
    /// The engine passes one to every node it starts; external drivers (tests,
    /// bridges from non-tokio threads) may fetch their own.
    pub fn handle(&self) -> CompletionHandle {
        CompletionHandle {
            sched: self.self_ref.clone(),
        }
    }

    /// Clears all state — registry, round counter, round log — for reuse of
    /// the same scheduler across repeated startup sequences in one process.
    ///
    /// Never triggered implicitly. Callers must ensure no initializer from
    /// the previous session is still about to signal completion.
    pub async fn reset(&self) {
        let mut inner = self.inner.write().await;
        inner.registry.clear();
        inner.round = 0;
        inner.round_log.clear();
        inner.engine_started = false;
        inner.draining = false;
        tracing::debug!("scheduler state cleared");
    }

    // --- introspection & diagnostics ---

    /// Identities in registration order.
    pub async fn registered(&self) -> Vec<InitId> {
        let inner = self.inner.read().await;
        inner.registry.ids_in_order().to_vec()
    }

    /// Execution state of one node, if registered.
    pub async fn state_of(&self, id: &InitId) -> Option<ExecState> {
        let inner = self.inner.read().await;
        inner.registry.get(id).map(|node| *node.state())
    }

    /// True if the node is registered and has signaled completion.
    pub async fn is_completed(&self, id: &InitId) -> bool {
        let inner = self.inner.read().await;
        inner
            .registry
            .get(id)
            .map(|node| node.state().completed)
            .unwrap_or(false)
    }

    /// Number of rounds executed so far.
    pub async fn rounds(&self) -> u64 {
        self.inner.read().await.round
    }

    /// Ordered "(round, description)" pairs, one per started node.
    pub async fn round_log(&self) -> Vec<(u64, String)> {
        self.inner.read().await.round_log.clone()
    }

    /// Textual listing of every node with its expanded (transitive)
    /// prerequisite set, fewest transitive prerequisites first.
    pub async fn report(&self) -> String {
        let inner = self.inner.read().await;
        report::render_report(&inner.registry)
    }

    /// Transitive closure of a node's prerequisites, in discovered order.
    pub async fn expanded_requires(&self, id: &InitId) -> Vec<InitId> {
        let inner = self.inner.read().await;
        report::expanded_requires(&inner.registry, id)
    }

    /// The event bus; subscribe for raw [`Event`]s.
    pub fn bus(&self) -> Bus {
        self.bus.clone()
    }

    // --- engine internals ---

    async fn signal_completed(&self, id: &InitId) {
        let (first, should_drain) = {
            let mut guard = self.inner.write().await;
            let inner = &mut *guard;
            let Some(node) = inner.registry.get_mut(id) else {
                tracing::debug!(init = %id, "completion signal for unknown identity ignored");
                return;
            };
            let state = node.state_mut();
            if !state.started {
                // Keeps `completed implies started` even for misbehaving callers.
                tracing::warn!(init = %id, "completion signaled for a node that was never started");
                state.started = true;
                state.started_at = Some(SystemTime::now());
            }
            let first = !state.completed;
            state.completed = true;
            state.completed_at = Some(SystemTime::now());

            let should_drain = !inner.draining;
            if should_drain {
                inner.draining = true;
            }
            (first, should_drain)
        };

        if first {
            tracing::debug!(init = %id, "initializer completed");
            self.bus
                .publish(Event::new(EventKind::InitCompleted).with_init(id.as_str()));
        }
        if should_drain {
            self.drain().await;
        }
    }

    /// Runs rounds until a pass starts nothing. Exactly one drain loop is
    /// active at a time; completion signals arriving meanwhile only mark
    /// state and are observed on the next pass.
    async fn drain(&self) {
        loop {
            let (round, batch) = {
                let mut guard = self.inner.write().await;
                let inner = &mut *guard;
                let eligible = self.collect_eligible(&inner.registry);
                if eligible.is_empty() {
                    inner.draining = false;
                    return;
                }

                let round = inner.round;
                inner.round += 1;
                let now = SystemTime::now();
                let mut batch = Vec::with_capacity(eligible.len());
                for id in eligible {
                    // collect_eligible only returns registered ids
                    if let Some(node) = inner.registry.get_mut(&id) {
                        let state = node.state_mut();
                        state.started = true;
                        state.started_at = Some(now);
                        let description = node.describe().to_string();
                        inner.round_log.push((round, description));
                        batch.push((id, node.init().clone()));
                    }
                }
                (round, batch)
            };

            for (id, init) in batch {
                self.bus.publish(
                    Event::new(EventKind::InitStarting)
                        .with_init(id.as_str())
                        .with_round(round),
                );
                tracing::debug!(init = %id, round, "starting initializer");
                if let Err(err) = init.start(self.handle()).await {
                    tracing::error!(init = %id, error = %err, "initializer start failed");
                    self.bus.publish(
                        Event::new(EventKind::InitFailed)
                            .with_init(id.as_str())
                            .with_reason(err.to_string()),
                    );
                }
            }
        }
    }

    /// Snapshot of every not-yet-started node whose prerequisites have all
    /// completed, in registration order. Logs each prerequisite identity that
    /// resolves to no registered node — on every round that evaluates the
    /// dependent, by design of the compatibility behavior.
    fn collect_eligible(&self, registry: &Registry) -> Vec<InitId> {
        let mut eligible = Vec::new();
        for (id, node) in registry.iter_in_order() {
            if node.state().started {
                continue;
            }
            let mut ready = true;
            for req in node.requires() {
                match registry.get(req) {
                    Some(dep) => {
                        if !dep.state().completed {
                            ready = false;
                        }
                    }
                    None => {
                        ready = false;
                        tracing::error!(
                            init = %id,
                            requires = %req,
                            "prerequisite has no registered initializer; node cannot start"
                        );
                        self.bus.publish(
                            Event::new(EventKind::DependencyMissing)
                                .with_init(id.as_str())
                                .with_reason(req.as_str()),
                        );
                    }
                }
            }
            if ready {
                eligible.push(id.clone());
            }
        }
        eligible
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::error::InitError;
    use crate::inits::InitFn;

    fn sched() -> Arc<Scheduler> {
        Scheduler::builder(Config::default()).build()
    }

    fn sched_with(cfg: Config) -> Arc<Scheduler> {
        Scheduler::builder(cfg).build()
    }

    /// A node that does nothing on start; completion is driven externally.
    fn manual(id: &'static str, requires: &[&'static str]) -> InitRef {
        let requires = requires.iter().map(|r| InitId::from(*r)).collect();
        InitFn::arc(id, requires, |_handle: CompletionHandle| async {
            Ok::<(), InitError>(())
        })
    }

    /// A node that signals completion from inside its own start call.
    fn instant(id: &'static str, requires: &[&'static str]) -> InitRef {
        let requires = requires.iter().map(|r| InitId::from(*r)).collect();
        let ident = InitId::from(id);
        InitFn::arc(id, requires, move |handle: CompletionHandle| {
            let ident = ident.clone();
            async move {
                handle.complete(&ident).await;
                Ok::<(), InitError>(())
            }
        })
    }

    #[tokio::test(flavor = "current_thread")]
    async fn zero_dependency_nodes_start_in_round_zero() {
        let s = sched();
        s.register(manual("net", &[])).await.unwrap();
        s.register(manual("assets", &[])).await.unwrap();
        s.register(manual("auth", &["net"])).await.unwrap();
        s.start().await.unwrap();

        assert!(s.state_of(&"net".into()).await.unwrap().started);
        assert!(s.state_of(&"assets".into()).await.unwrap().started);
        assert!(!s.state_of(&"auth".into()).await.unwrap().started);
        assert_eq!(
            s.round_log().await,
            vec![(0, "net".into()), (0, "assets".into())]
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn rounds_follow_completion_order() {
        let s = sched();
        s.register(manual("net", &[])).await.unwrap();
        s.register(manual("auth", &["net"])).await.unwrap();
        s.register(manual("stats", &["net", "auth"])).await.unwrap();
        s.start().await.unwrap();

        let handle = s.handle();
        handle.complete(&"net".into()).await;
        assert!(s.state_of(&"auth".into()).await.unwrap().started);
        assert!(!s.state_of(&"stats".into()).await.unwrap().started);

        handle.complete(&"auth".into()).await;
        assert!(s.state_of(&"stats".into()).await.unwrap().started);
        handle.complete(&"stats".into()).await;

        assert!(s.is_completed(&"net".into()).await);
        assert!(s.is_completed(&"auth".into()).await);
        assert!(s.is_completed(&"stats".into()).await);
        assert_eq!(
            s.round_log().await,
            vec![
                (0, "net".into()),
                (1, "auth".into()),
                (2, "stats".into())
            ]
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn synchronous_cascade_settles_before_start_returns() {
        let s = sched();
        s.register(instant("a", &[])).await.unwrap();
        s.register(instant("b", &["a"])).await.unwrap();
        s.register(instant("c", &["b"])).await.unwrap();
        s.start().await.unwrap();

        for id in ["a", "b", "c"] {
            assert!(s.is_completed(&id.into()).await, "{id} not completed");
        }
        assert_eq!(
            s.round_log().await,
            vec![(0, "a".into()), (1, "b".into()), (2, "c".into())]
        );
        assert_eq!(s.rounds().await, 3);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn duplicate_completion_is_a_noop() {
        let s = sched();
        s.register(manual("net", &[])).await.unwrap();
        s.register(manual("auth", &["net"])).await.unwrap();
        s.start().await.unwrap();

        let handle = s.handle();
        handle.complete(&"net".into()).await;
        let log_after_first = s.round_log().await;
        let rounds_after_first = s.rounds().await;

        handle.complete(&"net".into()).await;
        assert_eq!(s.round_log().await, log_after_first);
        assert_eq!(s.rounds().await, rounds_after_first);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn completion_for_unknown_identity_is_ignored() {
        let s = sched();
        s.register(manual("net", &[])).await.unwrap();
        s.start().await.unwrap();

        s.handle().complete(&"nobody".into()).await;
        assert!(s.state_of(&"nobody".into()).await.is_none());
        assert!(!s.is_completed(&"net".into()).await);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn early_completion_marks_node_started_too() {
        let s = sched();
        s.register(manual("net", &[])).await.unwrap();
        s.register(manual("auth", &["net"])).await.unwrap();
        s.start().await.unwrap();

        // auth signals before it was ever started; state stays coherent.
        s.handle().complete(&"auth".into()).await;
        let auth = s.state_of(&"auth".into()).await.unwrap();
        assert!(auth.completed);
        assert!(auth.started);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn completion_from_a_spawned_task_unblocks_dependents() {
        let s = sched();
        s.register(manual("net", &[])).await.unwrap();
        s.register(manual("auth", &["net"])).await.unwrap();
        s.start().await.unwrap();

        let handle = s.handle();
        let worker = tokio::spawn(async move {
            handle.complete(&"net".into()).await;
        });
        worker.await.unwrap();

        assert!(s.state_of(&"auth".into()).await.unwrap().started);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn duplicate_identity_keeps_first_registration() {
        let s = sched();
        s.register(manual("net", &[])).await.unwrap();
        let err = s.register(manual("net", &["auth"])).await.unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateId { .. }));

        assert_eq!(s.registered().await, vec![InitId::from("net")]);
        // The first instance (no prerequisites) stays authoritative.
        assert!(s.expanded_requires(&"net".into()).await.is_empty());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn missing_prerequisite_stalls_forever() {
        let s = sched();
        s.register(manual("net", &[])).await.unwrap();
        s.register(manual("ui", &["ghost"])).await.unwrap();
        s.start().await.unwrap();

        s.handle().complete(&"net".into()).await;
        let state = s.state_of(&"ui".into()).await.unwrap();
        assert!(!state.started);
        assert!(state.started_at.is_none());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn cycle_is_rejected_by_default() {
        let s = sched();
        s.register(manual("x", &["y"])).await.unwrap();
        let err = s.register(manual("y", &["x"])).await.unwrap_err();
        assert!(matches!(err, RegistryError::DependencyCycle { .. }));
        assert_eq!(s.registered().await, vec![InitId::from("x")]);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn log_only_cycle_registers_and_mutually_stalls() {
        let s = sched_with(Config {
            cycle_policy: CyclePolicy::LogOnly,
            ..Config::default()
        });
        s.register(manual("x", &["y"])).await.unwrap();
        s.register(manual("y", &["x"])).await.unwrap();
        assert_eq!(
            s.registered().await,
            vec![InitId::from("x"), InitId::from("y")]
        );

        s.start().await.unwrap();
        assert!(!s.state_of(&"x".into()).await.unwrap().started);
        assert!(!s.state_of(&"y".into()).await.unwrap().started);
        assert_eq!(s.rounds().await, 0);
        assert!(s.round_log().await.is_empty());

        // The up-front pass still catches what the probe admitted.
        let err = s.validate().await.unwrap_err();
        assert!(matches!(err, SchedulerError::DependencyCycle { .. }));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn validate_fails_fast_on_missing_prerequisite() {
        let s = sched();
        s.register(manual("ui", &["ghost"])).await.unwrap();

        match s.validate().await {
            Err(SchedulerError::MissingDependency { init, requires }) => {
                assert_eq!(init, InitId::from("ui"));
                assert_eq!(requires, InitId::from("ghost"));
            }
            other => panic!("expected MissingDependency, got {other:?}"),
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn second_start_is_rejected() {
        let s = sched();
        s.register(manual("net", &[])).await.unwrap();
        s.start().await.unwrap();

        let err = s.start().await.unwrap_err();
        assert!(matches!(err, SchedulerError::AlreadyStarted));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn starting_event_precedes_the_start_call() {
        let s = sched();
        let mut rx = s.bus().subscribe();
        s.register(instant("net", &[])).await.unwrap();
        s.start().await.unwrap();

        // Registration, then starting in round 0, then completion.
        let mut kinds = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            kinds.push(ev.kind);
        }
        assert_eq!(
            kinds,
            vec![
                EventKind::InitRegistered,
                EventKind::InitStarting,
                EventKind::InitCompleted
            ]
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn elapsed_is_reported_once_completed() {
        let s = sched();
        s.register(instant("net", &[])).await.unwrap();
        s.start().await.unwrap();

        let state = s.state_of(&"net".into()).await.unwrap();
        assert!(state.started_at.is_some());
        assert!(state.completed_at.is_some());
        assert!(state.elapsed().is_some());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn reset_returns_scheduler_to_pristine_state() {
        let s = sched();
        s.register(instant("net", &[])).await.unwrap();
        s.start().await.unwrap();
        assert_eq!(s.rounds().await, 1);

        s.reset().await;
        assert!(s.registered().await.is_empty());
        assert_eq!(s.rounds().await, 0);
        assert!(s.round_log().await.is_empty());

        // A fresh session on the same instance works end to end.
        s.register(instant("net", &[])).await.unwrap();
        s.start().await.unwrap();
        assert!(s.is_completed(&"net".into()).await);
        assert_eq!(s.round_log().await, vec![(0, "net".into())]);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn diamond_starts_top_only_after_both_branches() {
        let s = sched();
        s.register(manual("base", &[])).await.unwrap();
        s.register(manual("left", &["base"])).await.unwrap();
        s.register(manual("right", &["base"])).await.unwrap();
        s.register(manual("top", &["left", "right"])).await.unwrap();
        s.start().await.unwrap();

        let handle = s.handle();
        handle.complete(&"base".into()).await;
        // left and right start together in the same round, in registration order.
        assert_eq!(
            s.round_log().await,
            vec![
                (0, "base".into()),
                (1, "left".into()),
                (1, "right".into())
            ]
        );

        handle.complete(&"left".into()).await;
        assert!(!s.state_of(&"top".into()).await.unwrap().started);
        handle.complete(&"right".into()).await;
        assert!(s.state_of(&"top".into()).await.unwrap().started);
        assert_eq!(s.round_log().await.last(), Some(&(2, "top".into())));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn failed_start_leaves_dependents_stalled() {
        let s = sched();
        let failing: InitRef = InitFn::arc("db", vec![], |_handle: CompletionHandle| async {
            Err::<(), InitError>(InitError::failed("no such host"))
        });
        s.register(failing).await.unwrap();
        s.register(manual("api", &["db"])).await.unwrap();
        s.start().await.unwrap();

        let db = s.state_of(&"db".into()).await.unwrap();
        assert!(db.started);
        assert!(!db.completed);
        assert!(!s.state_of(&"api".into()).await.unwrap().started);
    }
}
