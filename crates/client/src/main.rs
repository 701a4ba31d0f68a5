//! Arena client entry point.
//!
//! Composition root: reads configuration, installs logging, starts the
//! runtime with a stdout observer and turns Ctrl-C into a graceful shutdown.
mod config;
mod console;
mod logging;

use anyhow::Result;
use config::{ArenaConfig, EventFormat};
use console::{ConsoleObserver, JsonObserver};
use runtime::{ArenaExit, RunSummary, Runtime};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ArenaConfig::from_env();
    let _log_guard = logging::setup_logging()?;
    tracing::info!("Starting arena with {:?}", config);

    let builder = Runtime::builder()
        .config(config.runtime.clone())
        .hero(config.hero.build()?);
    let builder = match config.event_format {
        EventFormat::Text => builder.observer(ConsoleObserver),
        EventFormat::Json => builder.observer(JsonObserver),
    };
    let runtime = builder.build().await?;

    let handle = runtime.handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Ctrl-C received, closing the arena");
            handle.request_shutdown();
        }
    });

    let summary = runtime.wait().await?;
    tracing::info!("Final metrics: {:?}", summary.metrics);
    if config.event_format == EventFormat::Text {
        print_summary(&summary);
    }

    Ok(())
}

fn print_summary(summary: &RunSummary) {
    let metrics = &summary.metrics;
    if summary.exit == ArenaExit::Shutdown {
        println!("\nArena closed.");
    }
    println!("{}", summary.hero);
    println!(
        "Battles: {} (won {}, lost {}, drawn {}), rounds: {}",
        summary.battles,
        metrics.battles_won,
        metrics.battles_lost,
        metrics.battles_drawn,
        metrics.rounds
    );
    println!(
        "Monsters spawned: {}, still waiting: {}, peak queue: {}",
        summary.spawned, metrics.queue_depth, metrics.peak_queue_depth
    );
}
