//! Accessibility Monitor - UI tree change logger
//!
//! This crate observes an externally-owned hierarchical UI tree whenever the
//! host platform signals a change, extracts a one-line text record per
//! visible node, and forwards each unique record to a log sink exactly once
//! per dedup window.
//!
//! # Architecture
//!
//! - [`extractor`]: one node handle + depth -> canonical record line
//! - [`walker`]: depth-first traversal with scoped handle release
//! - [`dedup`]: capacity-bounded dedup cache in front of the log writer
//! - [`monitor`]: event dispatch, serialization, session lifecycle
//! - [`snapshot`]: JSON tree snapshots standing in for the live platform

pub mod config;
pub mod dedup;
pub mod extractor;
pub mod monitor;
pub mod snapshot;
pub mod types;
pub mod walker;

// Re-export commonly used types
pub use config::Config;
pub use dedup::{BufferWriter, DedupSink, EvictionPolicy, LogWriter, SinkStats, TracingWriter};
pub use extractor::extract;
pub use monitor::{Monitor, MonitorStats};
pub use snapshot::{HandleLedger, ReplaySource, SnapshotNode, SnapshotTree};
pub use types::{EventKind, MonitorError, NodeBounds, NodeError, UiEvent, UiNode, UiTreeSource};
pub use walker::{TreeWalker, WalkSummary};
