//! Depth-first traversal of the platform UI tree.
//!
//! Visits every reachable node pre-order, emitting one record per node
//! through the dedup sink. Child handles are owned for exactly the scope of
//! their subtree and released through a drop guard, so release happens on
//! every exit path without manual balancing.

use crate::dedup::{DedupSink, LogWriter};
use crate::extractor;
use crate::types::UiNode;
use std::cell::Cell;
use tracing::{debug, warn};

/// Default recursion limit. The platform guarantees an acyclic, finite tree,
/// but traversal must not bet its stack on that.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Per-walk outcome counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkSummary {
    /// Nodes extracted and submitted to the sink
    pub nodes_visited: u64,
    /// Branches abandoned by the depth guard
    pub branches_depth_limited: u64,
    /// Child handles whose release reported an error
    pub release_failures: u64,
}

/// Recursive pre-order tree walker.
pub struct TreeWalker {
    max_depth: usize,
}

impl TreeWalker {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Traverse the tree rooted at `root`, emitting every node's record.
    ///
    /// The root handle itself belongs to the caller and is not released
    /// here. Missing children are skipped silently; branches past the depth
    /// limit fail individually without aborting the walk.
    pub fn walk<W: LogWriter>(&self, root: &dyn UiNode, sink: &mut DedupSink<W>) -> WalkSummary {
        let tally = Tally::default();
        self.visit(root, 0, sink, &tally);
        WalkSummary {
            nodes_visited: tally.visited.get(),
            branches_depth_limited: tally.depth_limited.get(),
            release_failures: tally.release_failures.get(),
        }
    }

    fn visit<W: LogWriter>(
        &self,
        node: &dyn UiNode,
        depth: usize,
        sink: &mut DedupSink<W>,
        tally: &Tally,
    ) {
        if depth > self.max_depth {
            debug!("branch exceeds depth limit {}, skipping", self.max_depth);
            tally.depth_limited.set(tally.depth_limited.get() + 1);
            return;
        }

        sink.emit(&extractor::extract(node, depth));
        tally.visited.set(tally.visited.get() + 1);

        for index in 0..node.child_count() {
            let Some(child) = node.child(index) else {
                // Reference did not resolve; continue with siblings.
                continue;
            };
            let guard = ChildGuard {
                node: child,
                release_failures: &tally.release_failures,
            };
            self.visit(&*guard.node, depth + 1, sink, tally);
            // Guard drops here, releasing the child handle.
        }
    }
}

impl Default for TreeWalker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

#[derive(Default)]
struct Tally {
    visited: Cell<u64>,
    depth_limited: Cell<u64>,
    release_failures: Cell<u64>,
}

/// Releases a child handle when its traversal scope ends.
struct ChildGuard<'a> {
    node: Box<dyn UiNode + 'a>,
    release_failures: &'a Cell<u64>,
}

impl Drop for ChildGuard<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.node.release() {
            // Repeated leaks could exhaust platform handle quotas, so each
            // failure is reported rather than swallowed.
            warn!("child handle release failed: {}", err);
            self.release_failures
                .set(self.release_failures.get() + 1);
        }
    }
}
