use super::*;
use crate::events::RecordingSink;
use crate::model::GeneEntry;
use crate::model::dates::parse_date;
use crate::panels::{DefaultPanelBuilder, NoGeneIndex, loader::parse_panel_toml};
use crate::store::MemoryStore;

fn repo() -> (PanelRepository<MemoryStore>, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::new());
    let repo = PanelRepository::with_events(MemoryStore::new(), sink.clone());
    (repo, sink)
}

fn panel(name: &str, version: f64) -> Panel {
    let mut p = Panel::new(name, "cust000", version, parse_date("2024-01-01").expect("date"));
    p.genes.push(GeneEntry::new(10, "X"));
    p
}

#[test]
fn duplicate_version_is_refused() {
    let (repo, _) = repo();
    repo.save(panel("PANEL1", 1.0), false).expect("save");
    let err = repo.save(panel("PANEL1", 1.0), false).unwrap_err();
    match err {
        PanelError::DuplicateVersion {
            panel_name,
            version,
        } => {
            assert_eq!(panel_name, "PANEL1");
            assert_eq!(version, 1.0);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(repo.store().len(), 1);
}

#[test]
fn replace_keeps_identity() {
    let (repo, sink) = repo();
    let id = repo.save(panel("PANEL1", 1.0), false).expect("save");
    let mut newer = panel("PANEL1", 1.0);
    newer.genes.push(GeneEntry::new(20, "Y"));
    let replaced = repo.save(newer, true).expect("replace");
    assert_eq!(replaced, id);
    assert_eq!(repo.store().len(), 1);
    let stored = repo.panel_by_id(&id).expect("fetch").expect("present");
    assert_eq!(stored.genes.len(), 2);
    assert!(
        sink.events()
            .iter()
            .any(|e| matches!(e, RepoEvent::PanelReplaced { .. }))
    );
}

#[test]
fn tolerant_identity_lookup() {
    let (repo, sink) = repo();
    let id = repo.save(panel("PANEL1", 1.0), false).expect("save");
    assert!(repo.panel(&id.to_string()).expect("fetch").is_some());
    assert!(repo.panel("not-an-id").expect("fetch").is_none());
    assert!(
        sink.events()
            .iter()
            .any(|e| matches!(e, RepoEvent::InvalidIdentity { raw, .. } if raw == "not-an-id"))
    );
    let unknown = DocumentId::generate();
    assert!(repo.panel(&unknown.to_string()).expect("fetch").is_none());
}

#[test]
fn latest_is_numerically_greatest() {
    let (repo, _) = repo();
    repo.save(panel("PANEL1", 2.0), false).expect("save");
    repo.save(panel("PANEL1", 10.0), false).expect("save");
    repo.save(panel("PANEL1", 9.5), false).expect("save");
    let latest = repo.gene_panel("PANEL1", None).expect("fetch").expect("present");
    assert_eq!(latest.version, 10.0);
    let exact = repo
        .gene_panel("PANEL1", Some(2.0))
        .expect("fetch")
        .expect("present");
    assert_eq!(exact.version, 2.0);
    assert!(repo.gene_panel("PANEL1", Some(3.0)).expect("fetch").is_none());
    assert!(repo.gene_panel("OTHER", None).expect("fetch").is_none());
}

#[test]
fn listing_filters_hidden() {
    let (repo, _) = repo();
    repo.save(panel("A", 1.0), false).expect("save");
    let mut hidden = panel("B", 1.0);
    hidden.hidden = Some(true);
    repo.save(hidden, false).expect("save");
    let mut shown = panel("C", 1.0);
    shown.hidden = Some(false);
    repo.save(shown, false).expect("save");

    let visible = repo.gene_panels(None, None, None, false).expect("list").count();
    assert_eq!(visible, 2);
    let all = repo.gene_panels(None, None, None, true).expect("list").count();
    assert_eq!(all, 3);
    let by_name = repo
        .gene_panels(Some("A"), Some("cust000"), Some(1.0), false)
        .expect("list")
        .count();
    assert_eq!(by_name, 1);
    let other_institute = repo
        .gene_panels(None, Some("cust999"), None, true)
        .expect("list")
        .count();
    assert_eq!(other_institute, 0);
}

#[test]
fn latest_panels_per_name() {
    let (repo, _) = repo();
    repo.save(panel("A", 1.0), false).expect("save");
    repo.save(panel("A", 2.0), false).expect("save");
    repo.save(panel("B", 1.0), false).expect("save");
    let mut foreign = panel("C", 1.0);
    foreign.institute = "cust001".to_string();
    repo.save(foreign, false).expect("save");

    let mut latest: Vec<(String, f64)> = repo
        .latest_panels("cust000", false)
        .expect("latest")
        .map(|p| p.map(|p| (p.panel_name, p.version)))
        .collect::<Result<_, _>>()
        .expect("panels");
    latest.sort_by(|a, b| a.0.cmp(&b.0));
    assert_eq!(latest, vec![("A".to_string(), 2.0), ("B".to_string(), 1.0)]);
}

#[test]
fn delete_is_idempotent() {
    let (repo, _) = repo();
    let id = repo.save(panel("A", 1.0), false).expect("save");
    let stored = repo.panel_by_id(&id).expect("fetch").expect("present");
    assert_eq!(repo.delete_panel(&stored).expect("delete"), 1);
    assert_eq!(repo.delete_panel(&stored).expect("delete"), 0);
    assert_eq!(repo.delete_panel(&panel("A", 1.0)).expect("delete"), 0);
}

#[test]
fn update_version_keeps_date() {
    let (repo, _) = repo();
    let id = repo.save(panel("A", 1.0), false).expect("save");
    let stored = repo.panel_by_id(&id).expect("fetch").expect("present");
    let updated = repo
        .update_panel(&stored, Some(1.5), None, None)
        .expect("update")
        .expect("present");
    assert_eq!(updated.version, 1.5);
    assert_eq!(updated.date, stored.date);
    assert_eq!(updated.id, Some(id));
}

#[test]
fn update_maintainer_only() {
    let (repo, _) = repo();
    let id = repo.save(panel("A", 1.0), false).expect("save");
    let stored = repo.panel_by_id(&id).expect("fetch").expect("present");
    let users = vec!["curator@example.org".to_string()];
    let updated = repo
        .update_panel(&stored, None, None, Some(users.clone()))
        .expect("update")
        .expect("present");
    assert_eq!(updated.maintainer, users);
    assert_eq!(updated.date, stored.date);
    assert_eq!(updated.version, 1.0);
}

#[test]
fn update_without_arguments_bumps_date() {
    let (repo, _) = repo();
    let id = repo.save(panel("A", 1.0), false).expect("save");
    let stored = repo.panel_by_id(&id).expect("fetch").expect("present");
    let updated = repo
        .update_panel(&stored, None, None, None)
        .expect("update")
        .expect("present");
    assert!(updated.date > stored.date);

    let given = parse_date("2030-05-05").expect("date");
    let updated = repo
        .update_panel(&updated, None, Some(given), None)
        .expect("update")
        .expect("present");
    assert_eq!(updated.date, given);
}

#[test]
fn update_requires_identity() {
    let (repo, _) = repo();
    let err = repo
        .update_panel(&panel("A", 1.0), None, None, None)
        .unwrap_err();
    assert!(matches!(err, PanelError::MissingIdentity(_)));
}

#[test]
fn add_pending_validates_action() {
    let (repo, _) = repo();
    let id = repo.save(panel("A", 1.0), false).expect("save");
    let stored = repo.panel_by_id(&id).expect("fetch").expect("present");
    let gene = HgncGene::new(20, "Y");
    let err = repo.add_pending(&stored, &gene, "replace", None).unwrap_err();
    assert!(matches!(err, PanelError::InvalidAction(_)));
    let unchanged = repo.panel_by_id(&id).expect("fetch").expect("present");
    assert_eq!(unchanged.pending, None);
}

#[test]
fn add_pending_deduplicates_and_reset_clears() {
    let (repo, _) = repo();
    let id = repo.save(panel("A", 1.0), false).expect("save");
    let stored = repo.panel_by_id(&id).expect("fetch").expect("present");
    let gene = HgncGene::new(20, "Y");
    repo.add_pending(&stored, &gene, "add", None).expect("stage");
    let staged = repo
        .add_pending(&stored, &gene, "add", None)
        .expect("stage")
        .expect("present");
    assert_eq!(staged.pending_changes().len(), 1);
    assert_eq!(staged.pending_changes()[0].symbol, "Y");

    let edit_info = GeneInfo {
        comment: Some("note".to_string()),
        ..GeneInfo::default()
    };
    let staged = repo
        .add_pending(&staged, &HgncGene::new(10, "X"), "edit", Some(edit_info))
        .expect("stage")
        .expect("present");
    assert_eq!(staged.pending_changes().len(), 2);

    let cleared = repo.reset_pending(&staged).expect("reset").expect("present");
    assert_eq!(cleared.pending, None);
    assert_eq!(cleared.genes, staged.genes);
}

#[test]
fn load_panel_builds_and_saves() {
    let (repo, _) = repo();
    let raw = parse_panel_toml(
        r#"
panel_name = "FROMFILE"
institute = "cust000"
version = 1.0

[[gene]]
hgnc_id = 1
symbol = "A"
"#,
        "inline",
    )
    .expect("parse");
    let id = repo
        .load_panel(raw.clone(), &DefaultPanelBuilder, &NoGeneIndex, false)
        .expect("load");
    assert!(repo.panel_by_id(&id).expect("fetch").is_some());
    assert!(matches!(
        repo.load_panel(raw, &DefaultPanelBuilder, &NoGeneIndex, false),
        Err(PanelError::DuplicateVersion { .. })
    ));
}

#[test]
fn update_rejects_unusable_versions() {
    let (repo, _) = repo();
    let id = repo.save(panel("A", 1.0), false).expect("save");
    let stored = repo.panel_by_id(&id).expect("fetch").expect("present");
    for bad in [f64::NAN, f64::INFINITY, 0.0, -1.0] {
        let err = repo.update_panel(&stored, Some(bad), None, None).unwrap_err();
        assert!(matches!(err, PanelError::InvalidVersion { .. }));
    }
    let unchanged = repo.panel_by_id(&id).expect("fetch").expect("present");
    assert_eq!(unchanged.version, 1.0);
}

#[test]
fn update_refuses_taken_version() {
    let (repo, _) = repo();
    let id = repo.save(panel("A", 1.0), false).expect("save");
    repo.save(panel("A", 2.0), false).expect("save");
    let stored = repo.panel_by_id(&id).expect("fetch").expect("present");

    let err = repo.update_panel(&stored, Some(2.0), None, None).unwrap_err();
    assert!(matches!(err, PanelError::DuplicateVersion { version, .. } if version == 2.0));
    assert_eq!(
        repo.gene_panels(Some("A"), None, None, true)
            .expect("list")
            .count(),
        2
    );

    let same = repo
        .update_panel(&stored, Some(1.0), None, None)
        .expect("update")
        .expect("present");
    assert_eq!(same.version, 1.0);
}
