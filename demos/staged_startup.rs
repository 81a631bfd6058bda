//! # Staged application startup
//!
//! Demonstrates the scheduler with genuinely asynchronous subsystems:
//! - network comes up first (no prerequisites)
//! - auth and asset loading wait on the network, run concurrently
//! - stats waits on net + auth
//! - "ready" depends on everything and marks the app playable
//!
//! Each subsystem sleeps to simulate I/O and signals completion from its own
//! spawned task.

use std::time::Duration;

use tokio::time::sleep;

use initvisor::{
    CompletionHandle, Config, InitError, InitFn, InitId, InitRef, LogWriter, Scheduler,
};

/// A subsystem that "works" for the given duration on its own task, then
/// signals completion.
fn subsystem(id: &'static str, requires: &[&'static str], work: Duration) -> InitRef {
    let requires = requires.iter().map(|r| InitId::from(*r)).collect();
    let ident = InitId::from(id);

    InitFn::arc(id, requires, move |handle: CompletionHandle| {
        let ident = ident.clone();
        async move {
            tokio::spawn(async move {
                sleep(work).await;
                handle.complete(&ident).await;
            });
            Ok::<_, InitError>(())
        }
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let scheduler = Scheduler::builder(Config::default())
        .with_subscriber(std::sync::Arc::new(LogWriter))
        .build();

    scheduler
        .register(subsystem("net", &[], Duration::from_millis(120)))
        .await?;
    scheduler
        .register(subsystem("auth", &["net"], Duration::from_millis(80)))
        .await?;
    scheduler
        .register(subsystem("assets", &["net"], Duration::from_millis(200)))
        .await?;
    scheduler
        .register(subsystem("stats", &["net", "auth"], Duration::from_millis(40)))
        .await?;
    scheduler
        .register(subsystem(
            "ready",
            &["auth", "assets", "stats"],
            Duration::from_millis(10),
        ))
        .await?;

    scheduler.validate().await?;

    println!("--- dependency report ---");
    println!("{}", scheduler.report().await);
    println!("-------------------------");

    scheduler.start().await?;

    // "ready" transitively depends on everything; once it completes the
    // whole sequence is done.
    let ready: InitId = "ready".into();
    while !scheduler.is_completed(&ready).await {
        sleep(Duration::from_millis(10)).await;
    }

    println!("--- round log ---");
    for (round, description) in scheduler.round_log().await {
        let elapsed = scheduler
            .state_of(&description.clone().into())
            .await
            .and_then(|state| state.elapsed());
        println!("round {round}: {description} (elapsed: {elapsed:?})");
    }

    Ok(())
}
