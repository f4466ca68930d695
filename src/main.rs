//! Headless runner: generates a scene, drives it from the feed and logs
//! periodic frame summaries. A real renderer would consume the same
//! snapshots instead of logging them.
//!
//! Run with: LEDGERBLOOM_API_KEY=... cargo run -- <wallet address>
//! See `--help` for the remaining options.

use std::time::Duration;

use ledgerbloom_lib::models::snapshot::SceneSnapshot;
use clap::Parser;
use ledgerbloom_lib::{Args, FeedManager, RenderEngine, Settings};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn summarize(frame: u64, snap: &SceneSnapshot) {
    let effect = snap
        .active_effect
        .as_ref()
        .map(|e| format!("{} {:.0}%", e.kind.as_str(), e.progress * 100.0))
        .unwrap_or_else(|| "none".to_string());
    log::info!(
        "[frame {frame}] t={:.1}s nodes={} particles={} effect={effect}",
        snap.time,
        snap.nodes.len(),
        snap.particles.len()
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Also bridges `log` records from the library crates.
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::from_args(&Args::parse());

    let engine = RenderEngine::new(&settings.seed, settings.width, settings.height);
    let initial = engine.snapshot();
    log::info!(
        "[ledgerbloom] seed {} -> {} nodes, {} particles, palette {}, turbulence {:.2}",
        initial.seed,
        initial.nodes.len(),
        initial.particles.len(),
        initial.palette.name,
        initial.turbulence
    );

    let snapshot_every = settings.snapshot_every;
    let render_task = engine.spawn_render_loop(
        Duration::from_millis(settings.frame_interval_ms),
        move |frame, snap| {
            if frame % snapshot_every == 0 {
                summarize(frame, &snap);
            }
        },
    );

    let feed = FeedManager::new();
    feed.start(&settings, engine.clone()).await?;

    let mut stats_tick = tokio::time::interval(Duration::from_secs(5));
    let deadline = async {
        match settings.run_for_secs {
            Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                log::info!("[ledgerbloom] interrupted");
                break;
            }
            _ = &mut deadline => break,
            _ = stats_tick.tick() => {
                if let Some(stats) = feed.stats().await {
                    log::info!(
                        "[ledgerbloom] feed {:?}: {} events, last {}ms ago",
                        stats.state,
                        stats.event_count,
                        stats.ms_since_last_event.map(|ms| ms.to_string()).unwrap_or_else(|| "-".into())
                    );
                }
            }
        }
    }

    feed.stop().await?;
    render_task.abort();
    Ok(())
}
