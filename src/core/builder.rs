use std::sync::Arc;

use crate::config::Config;
use crate::events::Bus;
use crate::subscribers::{Subscribe, SubscriberSet};

use super::scheduler::Scheduler;

/// Builder for constructing a [`Scheduler`] with optional subscribers.
pub struct SchedulerBuilder {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl SchedulerBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
        }
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive scheduling events (registrations, round starts,
    /// completions, graph diagnostics) through dedicated workers with
    /// bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Adds a single subscriber.
    pub fn with_subscriber(mut self, subscriber: Arc<dyn Subscribe>) -> Self {
        self.subscribers.push(subscriber);
        self
    }

    /// Builds and returns the scheduler.
    ///
    /// Wires the event bus and, when subscribers are present, spawns their
    /// workers plus the bus listener that fans events out to them — which
    /// requires running inside a tokio runtime.
    pub fn build(self) -> Arc<Scheduler> {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let scheduler = Arc::new_cyclic(|self_ref| {
            Scheduler::new_internal(self.cfg, bus.clone(), self_ref.clone())
        });

        if !self.subscribers.is_empty() {
            let set = Arc::new(SubscriberSet::new(self.subscribers));
            let mut rx = bus.subscribe();
            tokio::spawn(async move {
                loop {
                    match rx.recv().await {
                        Ok(ev) => set.emit(&ev),
                        Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "event listener lagged; events skipped");
                            continue;
                        }
                        Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                    }
                }
            });
        }

        scheduler
    }
}
