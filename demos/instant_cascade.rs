//! # Instantly-completing cascade
//!
//! A chain of subsystems that each complete synchronously from inside their
//! own start call. A single `start()` walks the whole chain — one round per
//! dependency layer — before it returns.

use initvisor::{CompletionHandle, Config, InitError, InitFn, InitId, InitRef, LogWriter, Scheduler};

fn instant(id: &'static str, requires: &[&'static str]) -> InitRef {
    let requires = requires.iter().map(|r| InitId::from(*r)).collect();
    let ident = InitId::from(id);

    InitFn::arc(id, requires, move |handle: CompletionHandle| {
        let ident = ident.clone();
        async move {
            handle.complete(&ident).await;
            Ok::<_, InitError>(())
        }
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let scheduler = Scheduler::builder(Config::default())
        .with_subscriber(std::sync::Arc::new(LogWriter))
        .build();

    scheduler.register(instant("config", &[])).await?;
    scheduler.register(instant("cache", &["config"])).await?;
    scheduler.register(instant("api", &["cache"])).await?;
    scheduler.register(instant("ui", &["api"])).await?;

    scheduler.start().await?;

    // Everything already completed: the cascade ran inside start().
    println!("--- round log ---");
    for (round, description) in scheduler.round_log().await {
        println!("round {round}: {description}");
    }
    assert_eq!(scheduler.rounds().await, 4);

    Ok(())
}
