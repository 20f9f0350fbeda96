use super::*;
use crate::model::dates::parse_date;

fn sample_panel() -> Panel {
    let date = parse_date("2024-01-01").expect("date");
    let mut panel = Panel::new("PANEL1", "cust000", 1.0, date);
    panel.genes = vec![GeneEntry::new(10, "X"), GeneEntry::new(20, "Y")];
    panel
}

#[test]
fn action_parsing() {
    assert_eq!("add".parse::<PendingAction>(), Ok(PendingAction::Add));
    assert_eq!("delete".parse::<PendingAction>(), Ok(PendingAction::Delete));
    assert_eq!("edit".parse::<PendingAction>(), Ok(PendingAction::Edit));
    let err = "remove".parse::<PendingAction>().unwrap_err();
    assert_eq!(err, InvalidActionError("remove".to_string()));
    assert!(err.to_string().contains("remove"));
}

#[test]
fn absent_fields_are_not_serialized() {
    let panel = sample_panel();
    let value = serde_json::to_value(&panel).expect("json");
    assert!(value.get("_id").is_none());
    assert!(value.get("pending").is_none());
    assert!(value.get("hidden").is_none());
    assert_eq!(value["type"], "clinical");
    let gene = &value["genes"][0];
    assert_eq!(gene["hgnc_id"], 10);
    assert!(gene.get("comment").is_none());
    assert!(gene.get("database_entry_version").is_none());
}

#[test]
fn gene_info_is_flattened() {
    let raw = r#"{"hgnc_id": 5, "symbol": "G", "database_entry_version": 2.0,
                  "inheritance_models": ["AD"], "reduced_penetrance": true}"#;
    let gene: GeneEntry = serde_json::from_str(raw).expect("gene");
    assert_eq!(gene.database_entry_version, Some(2.0));
    assert_eq!(gene.info.inheritance_models, Some(vec!["AD".to_string()]));
    assert_eq!(gene.info.reduced_penetrance, Some(true));
    assert_eq!(gene.info.mosaicism, None);
}

#[test]
fn empty_pending_is_distinct_from_absent() {
    let mut panel = sample_panel();
    panel.pending = Some(Vec::new());
    let value = serde_json::to_value(&panel).expect("json");
    assert_eq!(value["pending"], serde_json::json!([]));
    assert!(panel.pending_changes().is_empty());
}

#[test]
fn panel_lookups() {
    let panel = sample_panel();
    assert!(panel.contains_gene(10));
    assert!(!panel.contains_gene(30));
    assert_eq!(panel.gene(20).map(|g| g.symbol.as_str()), Some("Y"));
    assert_eq!(panel.hgnc_ids().len(), 2);
    assert!(!panel.is_hidden());
    assert_eq!(panel.label(), "PANEL1 v1");
}

#[test]
fn dedup_keeps_first_entry() {
    let genes = dedup_genes(vec![
        GeneEntry::new(1, "A"),
        GeneEntry::new(2, "B"),
        GeneEntry::new(1, "A-dup"),
    ]);
    assert_eq!(genes.len(), 2);
    assert_eq!(genes[0].symbol, "A");
}

#[test]
fn gene_format_render() {
    let gene = GeneEntry::new(7, "SYM");
    assert_eq!(GeneFormat::Symbol.render(&gene), "SYM");
    assert_eq!(GeneFormat::HgncId.render(&gene), "7");
}
