use super::*;

#[test]
fn recording_sink_keeps_order() {
    let sink = RecordingSink::new();
    sink.emit(RepoEvent::PendingReset {
        panel_name: "A".to_string(),
    });
    sink.emit(RepoEvent::OmimMissing {
        panel_name: "OMIM-AUTO".to_string(),
    });
    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], RepoEvent::PendingReset { .. }));
    assert_eq!(sink.take().len(), 2);
    assert!(sink.events().is_empty());
}

#[test]
fn tracing_sink_accepts_every_event() {
    let sink = TracingSink;
    sink.emit(RepoEvent::PanelUpdated {
        panel_name: "A".to_string(),
        change: PanelChange::Maintainer {
            from: vec![],
            to: vec!["user@example.org".to_string()],
        },
    });
    sink.emit(RepoEvent::OmimUnchanged {
        panel_name: "OMIM-AUTO".to_string(),
        reason: OmimSkip::NoNewGenes,
    });
}
