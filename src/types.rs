//! Core types shared across the monitor.
//!
//! This module defines the platform-facing traits (`UiNode`, `UiTreeSource`),
//! the event payload delivered by the host, and the error taxonomy.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Screen-space bounds of a UI node: left, top, right, bottom.
///
/// Serialized as a four-element array `[l, t, r, b]` in snapshot files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "(i32, i32, i32, i32)", into = "(i32, i32, i32, i32)")]
pub struct NodeBounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl NodeBounds {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

impl From<(i32, i32, i32, i32)> for NodeBounds {
    fn from((left, top, right, bottom): (i32, i32, i32, i32)) -> Self {
        Self::new(left, top, right, bottom)
    }
}

impl From<NodeBounds> for (i32, i32, i32, i32) {
    fn from(b: NodeBounds) -> Self {
        (b.left, b.top, b.right, b.bottom)
    }
}

impl fmt::Display for NodeBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{},{},{}]", self.left, self.top, self.right, self.bottom)
    }
}

/// Platform UI change notification types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    ViewClicked,
    ViewFocused,
    ViewLongClicked,
    ViewSelected,
    ViewTextChanged,
    WindowStateChanged,
    WindowContentChanged,
    NotificationStateChanged,
    /// Any event type the platform delivers that we do not name.
    Other(i32),
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::ViewClicked => f.write_str("TYPE_VIEW_CLICKED"),
            EventKind::ViewFocused => f.write_str("TYPE_VIEW_FOCUSED"),
            EventKind::ViewLongClicked => f.write_str("TYPE_VIEW_LONG_CLICKED"),
            EventKind::ViewSelected => f.write_str("TYPE_VIEW_SELECTED"),
            EventKind::ViewTextChanged => f.write_str("TYPE_VIEW_TEXT_CHANGED"),
            EventKind::WindowStateChanged => f.write_str("TYPE_WINDOW_STATE_CHANGED"),
            EventKind::WindowContentChanged => f.write_str("TYPE_WINDOW_CONTENT_CHANGED"),
            EventKind::NotificationStateChanged => f.write_str("TYPE_NOTIFICATION_STATE_CHANGED"),
            EventKind::Other(raw) => write!(f, "TYPE_OTHER({})", raw),
        }
    }
}

/// A UI change notification delivered by the host platform.
#[derive(Debug, Clone)]
pub struct UiEvent {
    /// What kind of change occurred
    pub kind: EventKind,
    /// Package/application identifier of the event source, if known
    pub package: Option<String>,
    /// Text fragments the platform attached to the event
    pub text_fragments: Vec<String>,
}

impl UiEvent {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            package: None,
            text_fragments: Vec::new(),
        }
    }

    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    pub fn with_text_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.text_fragments.push(fragment.into());
        self
    }
}

/// Errors reported by platform node handles
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    /// An attribute lookup failed for this node; the caller treats the
    /// attribute as absent.
    #[error("attribute unavailable: {0}")]
    AttributeUnavailable(&'static str),

    /// Releasing the handle back to the platform failed.
    #[error("handle release failed: {0}")]
    ReleaseFailed(String),
}

/// Errors from loading configuration or snapshot input
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One element of the platform's accessibility tree.
///
/// Handles are owned by the platform and reference-counted; every handle
/// obtained through `child` (or from a `UiTreeSource`) must be released
/// exactly once, even on early-return paths. Attribute accessors read the
/// node's current state and never mutate it.
pub trait UiNode {
    /// Resource identifier of the node. The lookup itself can fail on some
    /// nodes; callers map failure to "absent".
    fn view_id(&self) -> Result<Option<String>, NodeError>;

    /// Class/type name of the node
    fn class_name(&self) -> Option<String>;

    /// Bounds of the node in screen coordinates
    fn bounds(&self) -> NodeBounds;

    /// Visible text content, if any
    fn text(&self) -> Option<String>;

    /// Accessible description, if any
    fn description(&self) -> Option<String>;

    /// Number of children, known up front
    fn child_count(&self) -> usize;

    /// Obtain the child handle at `index`. `None` means the reference did
    /// not resolve; callers skip it and continue with siblings.
    fn child(&self, index: usize) -> Option<Box<dyn UiNode + '_>>;

    /// Release this handle back to the platform.
    fn release(&self) -> Result<(), NodeError>;
}

/// Provider of the current root node handle.
pub trait UiTreeSource {
    /// Root of the active window's tree, or `None` when no content is
    /// available for the current event.
    fn active_root(&self) -> Option<Box<dyn UiNode>>;
}

impl<T: UiTreeSource + ?Sized> UiTreeSource for Arc<T> {
    fn active_root(&self) -> Option<Box<dyn UiNode>> {
        (**self).active_root()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_display() {
        let bounds = NodeBounds::new(0, 0, 100, 50);
        assert_eq!(bounds.to_string(), "[0,0,100,50]");

        let negative = NodeBounds::new(-10, -20, 30, 40);
        assert_eq!(negative.to_string(), "[-10,-20,30,40]");
    }

    #[test]
    fn test_bounds_dimensions() {
        let bounds = NodeBounds::new(10, 20, 110, 70);
        assert_eq!(bounds.width(), 100);
        assert_eq!(bounds.height(), 50);
    }

    #[test]
    fn test_bounds_json_array_form() {
        let bounds: NodeBounds = serde_json::from_str("[1,2,3,4]").unwrap();
        assert_eq!(bounds, NodeBounds::new(1, 2, 3, 4));

        let json = serde_json::to_string(&bounds).unwrap();
        assert_eq!(json, "[1,2,3,4]");
    }

    #[test]
    fn test_event_kind_names() {
        assert_eq!(EventKind::ViewClicked.to_string(), "TYPE_VIEW_CLICKED");
        assert_eq!(EventKind::ViewFocused.to_string(), "TYPE_VIEW_FOCUSED");
        assert_eq!(
            EventKind::WindowContentChanged.to_string(),
            "TYPE_WINDOW_CONTENT_CHANGED"
        );
        assert_eq!(
            EventKind::NotificationStateChanged.to_string(),
            "TYPE_NOTIFICATION_STATE_CHANGED"
        );
        assert_eq!(EventKind::Other(4096).to_string(), "TYPE_OTHER(4096)");
    }

    #[test]
    fn test_event_builder() {
        let event = UiEvent::new(EventKind::ViewTextChanged)
            .with_package("com.example.app")
            .with_text_fragment("hello")
            .with_text_fragment("world");

        assert_eq!(event.kind, EventKind::ViewTextChanged);
        assert_eq!(event.package.as_deref(), Some("com.example.app"));
        assert_eq!(event.text_fragments, vec!["hello", "world"]);
    }
}
