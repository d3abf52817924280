//! Deduplicating log sink with a capacity-bounded cache.
//!
//! Each distinct record string is written to the underlying log exactly once
//! per freshness window. The cache holds at most `capacity` entries; when an
//! insertion pushes it past that, the whole cache is reset rather than
//! evicting individual entries. Bounded memory at the cost of occasional
//! duplicate re-emission right after a reset.
//!
//! Not internally thread-safe; the `Monitor` serializes access.

use std::collections::HashSet;
use tracing::{debug, info};

/// Default cache capacity
pub const DEFAULT_CAPACITY: usize = 500;

/// Line-oriented destination for record strings.
///
/// One UTF-8 record per call, append-only, assumed always available.
/// Implementations must not propagate write failures.
pub trait LogWriter {
    fn write_line(&mut self, line: &str);
}

/// Production writer: routes records to the tracing log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingWriter;

impl LogWriter for TracingWriter {
    fn write_line(&mut self, line: &str) {
        info!("{}", line);
    }
}

/// In-memory writer collecting lines, shared across clones. Used by tests
/// and by callers that want to inspect emitted output.
#[derive(Debug, Default, Clone)]
pub struct BufferWriter {
    lines: std::sync::Arc<std::sync::Mutex<Vec<String>>>,
}

impl BufferWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all lines written so far
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LogWriter for BufferWriter {
    fn write_line(&mut self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(line.to_string());
    }
}

/// What to do when an insertion pushes the cache past capacity.
///
/// Kept explicit so a future revision can slot in LRU semantics without
/// touching the emit path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionPolicy {
    /// Forget everything; the record that triggered the overflow survives.
    ClearAll,
}

/// Snapshot of sink counters
#[derive(Debug, Clone, Copy, Default)]
pub struct SinkStats {
    /// Records currently cached
    pub entries: usize,
    /// Cache capacity
    pub capacity: usize,
    /// Records written to the log since creation
    pub written: u64,
    /// Records suppressed as duplicates since creation
    pub suppressed: u64,
}

/// Deduplicating sink in front of a [`LogWriter`].
pub struct DedupSink<W> {
    seen: HashSet<String>,
    capacity: usize,
    policy: EvictionPolicy,
    writer: W,
    written: u64,
    suppressed: u64,
}

impl<W: LogWriter> DedupSink<W> {
    pub fn new(capacity: usize, writer: W) -> Self {
        Self::with_policy(capacity, EvictionPolicy::ClearAll, writer)
    }

    pub fn with_policy(capacity: usize, policy: EvictionPolicy, writer: W) -> Self {
        Self {
            seen: HashSet::new(),
            capacity,
            policy,
            writer,
            written: 0,
            suppressed: 0,
        }
    }

    /// Write `record` to the log unless it was already emitted in the
    /// current freshness window.
    pub fn emit(&mut self, record: &str) {
        if self.seen.contains(record) {
            self.suppressed += 1;
            return;
        }

        self.writer.write_line(record);
        self.written += 1;
        self.seen.insert(record.to_string());

        if self.seen.len() > self.capacity {
            match self.policy {
                EvictionPolicy::ClearAll => {
                    debug!(
                        "dedup cache overflow ({} entries), resetting",
                        self.seen.len()
                    );
                    self.seen.clear();
                    self.seen.insert(record.to_string());
                }
            }
        }
    }

    /// Number of records currently cached
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Forget all cached records, starting a fresh dedup window.
    pub fn clear(&mut self) {
        self.seen.clear();
    }

    pub fn stats(&self) -> SinkStats {
        SinkStats {
            entries: self.seen.len(),
            capacity: self.capacity,
            written: self.written,
            suppressed: self.suppressed,
        }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }
}
