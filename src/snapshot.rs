//! JSON tree snapshots implementing the platform traits.
//!
//! A snapshot is an owned copy of a UI tree that stands in for the live
//! platform: it implements [`UiNode`] and [`UiTreeSource`] and keeps a
//! ledger of handle obtain/release calls so resource discipline stays
//! observable in tests and replays.

use crate::types::{MonitorError, NodeBounds, NodeError, UiNode, UiTreeSource};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// One node of a snapshot tree.
///
/// All fields except `bounds` are optional in the JSON form;
/// `fail_id_lookup` makes the identifier accessor fail, mirroring platforms
/// where that lookup throws for certain nodes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotNode {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub bounds: NodeBounds,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub fail_id_lookup: bool,
    #[serde(default)]
    pub children: Vec<SnapshotNode>,
}

impl SnapshotNode {
    /// Total nodes in this subtree, self included
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SnapshotNode::node_count).sum::<usize>()
    }
}

/// Obtain/release bookkeeping for snapshot handles.
#[derive(Debug, Default)]
pub struct HandleLedger {
    obtained: AtomicU64,
    released: AtomicU64,
}

impl HandleLedger {
    pub fn obtained(&self) -> u64 {
        self.obtained.load(Ordering::Relaxed)
    }

    pub fn released(&self) -> u64 {
        self.released.load(Ordering::Relaxed)
    }

    /// True when every handle handed out has been released
    pub fn is_balanced(&self) -> bool {
        self.obtained() == self.released()
    }

    fn note_obtained(&self) {
        self.obtained.fetch_add(1, Ordering::Relaxed);
    }

    fn note_released(&self) {
        self.released.fetch_add(1, Ordering::Relaxed);
    }
}

/// An owned UI tree snapshot acting as a [`UiTreeSource`].
pub struct SnapshotTree {
    root: Arc<SnapshotNode>,
    ledger: Arc<HandleLedger>,
}

impl SnapshotTree {
    pub fn new(root: SnapshotNode) -> Self {
        Self {
            root: Arc::new(root),
            ledger: Arc::new(HandleLedger::default()),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, MonitorError> {
        let root: SnapshotNode = serde_json::from_str(json)?;
        Ok(Self::new(root))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, MonitorError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    pub fn ledger(&self) -> Arc<HandleLedger> {
        Arc::clone(&self.ledger)
    }
}

impl UiTreeSource for SnapshotTree {
    fn active_root(&self) -> Option<Box<dyn UiNode>> {
        self.ledger.note_obtained();
        Some(Box::new(SnapshotHandle {
            node: Arc::clone(&self.root),
            ledger: Arc::clone(&self.ledger),
        }))
    }
}

struct SnapshotHandle {
    node: Arc<SnapshotNode>,
    ledger: Arc<HandleLedger>,
}

impl UiNode for SnapshotHandle {
    fn view_id(&self) -> Result<Option<String>, NodeError> {
        if self.node.fail_id_lookup {
            Err(NodeError::AttributeUnavailable("view id"))
        } else {
            Ok(self.node.id.clone())
        }
    }

    fn class_name(&self) -> Option<String> {
        self.node.class.clone()
    }

    fn bounds(&self) -> NodeBounds {
        self.node.bounds
    }

    fn text(&self) -> Option<String> {
        self.node.text.clone()
    }

    fn description(&self) -> Option<String> {
        self.node.desc.clone()
    }

    fn child_count(&self) -> usize {
        self.node.children.len()
    }

    fn child(&self, index: usize) -> Option<Box<dyn UiNode + '_>> {
        let child = self.node.children.get(index)?;
        self.ledger.note_obtained();
        // Snapshot trees are small; cloning the subtree keeps each handle
        // self-contained.
        Some(Box::new(SnapshotHandle {
            node: Arc::new(child.clone()),
            ledger: Arc::clone(&self.ledger),
        }))
    }

    fn release(&self) -> Result<(), NodeError> {
        self.ledger.note_released();
        Ok(())
    }
}

/// Mutable tree source for replay sessions: the current snapshot is swapped
/// between events, the way the live platform's active window changes.
#[derive(Default)]
pub struct ReplaySource {
    current: Mutex<Option<SnapshotTree>>,
}

impl ReplaySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the active tree; `None` models "no window content".
    pub fn set(&self, tree: Option<SnapshotTree>) {
        let mut guard = self
            .current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = tree;
    }
}

impl UiTreeSource for ReplaySource {
    fn active_root(&self) -> Option<Box<dyn UiNode>> {
        let guard = self
            .current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.as_ref().and_then(|tree| tree.active_root())
    }
}
