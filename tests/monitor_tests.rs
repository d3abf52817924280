//! End-to-end tests driving the monitor with snapshot trees.

use accessibility_monitor::{
    BufferWriter, Config, EventKind, Monitor, ReplaySource, SnapshotTree, UiEvent,
};
use std::sync::Arc;

const LOGIN_SCREEN: &str = r#"{
    "class": "FrameLayout",
    "bounds": [0, 0, 1080, 1920],
    "children": [
        {
            "class": "Button",
            "bounds": [0, 0, 100, 50],
            "text": "Login"
        }
    ]
}"#;

fn small_config(capacity: usize) -> Config {
    let mut config = Config::default();
    config.dedup.capacity = capacity;
    config
}

#[test]
fn full_walk_emits_expected_records() {
    let writer = BufferWriter::new();
    let tree = SnapshotTree::from_json(LOGIN_SCREEN).unwrap();
    let monitor = Monitor::new(&Config::default(), tree, writer.clone());

    monitor.handle_event(&UiEvent::new(EventKind::WindowContentChanged));

    assert_eq!(
        writer.lines(),
        vec![
            "NODE [class=FrameLayout] [bounds=[0,0,1080,1920]] ".to_string(),
            "  NODE [class=Button] [bounds=[0,0,100,50]]  text:'Login'".to_string(),
        ]
    );
}

#[test]
fn repeated_event_writes_nothing_new() {
    let writer = BufferWriter::new();
    let tree = SnapshotTree::from_json(LOGIN_SCREEN).unwrap();
    let monitor = Monitor::new(&Config::default(), tree, writer.clone());

    let event = UiEvent::new(EventKind::WindowContentChanged);
    monitor.handle_event(&event);
    monitor.handle_event(&event);

    assert_eq!(writer.len(), 2);
    let stats = monitor.stats();
    assert_eq!(stats.events_handled, 2);
    assert_eq!(stats.nodes_visited, 4);
    assert_eq!(stats.sink.written, 2);
    assert_eq!(stats.sink.suppressed, 2);
}

#[test]
fn handles_stay_balanced_across_events() {
    let tree = SnapshotTree::from_json(LOGIN_SCREEN).unwrap();
    let ledger = tree.ledger();
    let monitor = Monitor::new(&Config::default(), tree, BufferWriter::new());

    for _ in 0..5 {
        monitor.handle_event(&UiEvent::new(EventKind::WindowContentChanged));
    }

    // 5 events x (root + one child)
    assert_eq!(ledger.obtained(), 10);
    assert!(ledger.is_balanced());
}

#[test]
fn replay_source_mixes_trees_and_no_content() {
    let writer = BufferWriter::new();
    let source = Arc::new(ReplaySource::new());
    let monitor = Monitor::new(&Config::default(), Arc::clone(&source), writer.clone());

    source.set(Some(SnapshotTree::from_json(r#"{"text": "screen one"}"#).unwrap()));
    monitor.handle_event(&UiEvent::new(EventKind::WindowStateChanged));

    source.set(None);
    monitor.handle_event(&UiEvent::new(EventKind::WindowContentChanged));

    source.set(Some(SnapshotTree::from_json(r#"{"text": "screen two"}"#).unwrap()));
    monitor.handle_event(&UiEvent::new(EventKind::WindowStateChanged));

    let lines = writer.lines();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("text:'screen one'"));
    assert_eq!(lines[1], "no content available");
    assert!(lines[2].contains("text:'screen two'"));
}

#[test]
fn event_fragments_are_deduplicated_too() {
    let writer = BufferWriter::new();
    let source = ReplaySource::new();
    let monitor = Monitor::new(&Config::default(), source, writer.clone());

    let event = UiEvent::new(EventKind::ViewTextChanged)
        .with_package("com.example.app")
        .with_text_fragment("hello");
    monitor.handle_event(&event);
    monitor.handle_event(&event);

    let hello_lines = writer
        .lines()
        .iter()
        .filter(|l| *l == "EVENT_TEXT: hello")
        .count();
    assert_eq!(hello_lines, 1);
}

#[test]
fn cache_overflow_resets_through_monitor_path() {
    let writer = BufferWriter::new();
    let source = ReplaySource::new();
    let monitor = Monitor::new(&small_config(4), source, writer.clone());

    let mut event = UiEvent::new(EventKind::NotificationStateChanged);
    for i in 0..10 {
        event = event.with_text_fragment(format!("notification {}", i));
    }
    monitor.handle_event(&event);

    // All ten fragments plus the no-content line were distinct writes,
    // but the cache never grew past its capacity.
    assert_eq!(monitor.stats().sink.written, 11);
    assert!(monitor.stats().sink.entries <= 4);
}

#[test]
fn concurrent_events_keep_capacity_invariant() {
    let source = Arc::new(ReplaySource::new());
    let monitor = Arc::new(Monitor::new(
        &small_config(8),
        Arc::clone(&source),
        BufferWriter::new(),
    ));

    std::thread::scope(|scope| {
        for thread in 0..4 {
            let monitor = Arc::clone(&monitor);
            scope.spawn(move || {
                for i in 0..50 {
                    let event = UiEvent::new(EventKind::ViewTextChanged)
                        .with_text_fragment(format!("t{}-{}", thread, i));
                    monitor.handle_event(&event);
                }
            });
        }
    });

    let stats = monitor.stats();
    assert_eq!(stats.events_handled, 200);
    assert!(stats.sink.entries <= 8);
}

#[test]
fn shutdown_opens_new_dedup_window() {
    let writer = BufferWriter::new();
    let tree = SnapshotTree::from_json(LOGIN_SCREEN).unwrap();
    let monitor = Monitor::new(&Config::default(), tree, writer.clone());

    monitor.handle_event(&UiEvent::new(EventKind::WindowContentChanged));
    monitor.shutdown();
    monitor.handle_event(&UiEvent::new(EventKind::WindowContentChanged));

    // Both events wrote the full tree.
    assert_eq!(writer.len(), 4);
}
