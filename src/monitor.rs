//! Event dispatch and session lifecycle.
//!
//! The monitor is the single entry point for platform UI change
//! notifications. Per event it logs the event header, pushes the event's
//! text fragments through the dedup sink, asks the tree source for the
//! current root, runs the walker, and releases the root handle.
//!
//! Notification delivery is treated as potentially concurrent: the whole
//! traversal-and-emit sequence runs under one mutex, which also closes the
//! check-then-insert race inside the sink.

use crate::config::Config;
use crate::dedup::{DedupSink, LogWriter, SinkStats};
use crate::types::{UiEvent, UiTreeSource};
use crate::walker::TreeWalker;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// Cumulative session counters
#[derive(Debug, Clone, Copy, Default)]
pub struct MonitorStats {
    /// Events handled since the session started
    pub events_handled: u64,
    /// Nodes extracted across all walks
    pub nodes_visited: u64,
    /// Branches abandoned by the depth guard
    pub branches_depth_limited: u64,
    /// Handle releases that reported an error
    pub release_failures: u64,
    /// Sink counters
    pub sink: SinkStats,
}

struct Inner<W> {
    walker: TreeWalker,
    sink: DedupSink<W>,
    events_handled: u64,
    nodes_visited: u64,
    branches_depth_limited: u64,
    release_failures: u64,
}

/// UI change monitor for one session.
pub struct Monitor<S, W> {
    source: S,
    inner: Mutex<Inner<W>>,
}

impl<S: UiTreeSource, W: LogWriter> Monitor<S, W> {
    pub fn new(config: &Config, source: S, writer: W) -> Self {
        Self {
            source,
            inner: Mutex::new(Inner {
                walker: TreeWalker::new(config.walker.max_depth),
                sink: DedupSink::new(config.dedup.capacity, writer),
                events_handled: 0,
                nodes_visited: 0,
                branches_depth_limited: 0,
                release_failures: 0,
            }),
        }
    }

    /// Handle one UI change notification end to end.
    pub fn handle_event(&self, event: &UiEvent) {
        let mut guard = self.lock();
        let inner = &mut *guard;

        debug!(
            "EVENT: {} PACKAGE: {}",
            event.kind,
            event.package.as_deref().unwrap_or("<unknown>")
        );

        for fragment in &event.text_fragments {
            inner.sink.emit(&format!("EVENT_TEXT: {}", fragment));
        }

        match self.source.active_root() {
            Some(root) => {
                let summary = inner.walker.walk(root.as_ref(), &mut inner.sink);
                inner.nodes_visited += summary.nodes_visited;
                inner.branches_depth_limited += summary.branches_depth_limited;
                inner.release_failures += summary.release_failures;

                // The walker leaves the root handle to its caller.
                if let Err(err) = root.release() {
                    warn!("root handle release failed: {}", err);
                    inner.release_failures += 1;
                }
            }
            None => {
                inner.sink.emit("no content available");
            }
        }

        inner.events_handled += 1;
    }

    /// Snapshot of the session counters
    pub fn stats(&self) -> MonitorStats {
        let inner = self.lock();
        MonitorStats {
            events_handled: inner.events_handled,
            nodes_visited: inner.nodes_visited,
            branches_depth_limited: inner.branches_depth_limited,
            release_failures: inner.release_failures,
            sink: inner.sink.stats(),
        }
    }

    /// End the session: log totals and drop the dedup window.
    pub fn shutdown(&self) {
        let mut inner = self.lock();
        let sink = inner.sink.stats();
        info!(
            "session ended: {} events, {} records written, {} suppressed, {} release failures",
            inner.events_handled, sink.written, sink.suppressed, inner.release_failures
        );
        inner.sink.clear();
    }

    fn lock(&self) -> MutexGuard<'_, Inner<W>> {
        // Cache contents are only a dedup hint; recovering from a poisoned
        // lock risks duplicate emission, not corruption.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
