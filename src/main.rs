//! Accessibility Monitor - snapshot replay entry point
//!
//! Feeds one or more JSON tree snapshot files through the monitor as
//! window-content-changed events, with a configurable delay between them.

use accessibility_monitor::{
    Config, EventKind, Monitor, ReplaySource, SnapshotTree, TracingWriter, UiEvent,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    let config = Config::load();
    let level = config.general.log_level.parse().unwrap_or(Level::INFO);
    let _subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .init();

    info!("Starting accessibility monitor");

    let paths: Vec<String> = std::env::args().skip(1).collect();
    if paths.is_empty() {
        info!("No snapshot files given, nothing to replay");
        return Ok(());
    }

    let source = Arc::new(ReplaySource::new());
    let monitor = Monitor::new(&config, Arc::clone(&source), TracingWriter);

    let mut tick = tokio::time::interval(Duration::from_millis(config.replay.interval_ms));

    for path in &paths {
        tick.tick().await;

        match SnapshotTree::from_file(path) {
            Ok(tree) => {
                info!("Replaying snapshot {} ({} nodes)", path, tree.node_count());
                source.set(Some(tree));
            }
            Err(e) => {
                error!("Failed to load snapshot {}: {}", path, e);
                source.set(None);
            }
        }

        let event = UiEvent::new(EventKind::WindowContentChanged).with_package("replay");
        monitor.handle_event(&event);
    }

    let stats = monitor.stats();
    info!(
        "Replayed {} events: {} nodes visited, {} records written, {} suppressed",
        stats.events_handled, stats.nodes_visited, stats.sink.written, stats.sink.suppressed
    );

    monitor.shutdown();
    Ok(())
}
