use super::*;
use crate::model::GeneInfo;
use crate::model::dates::parse_date;

#[test]
fn writes_headers_and_rows() {
    let mut panel = Panel::new("PANEL1", "cust000", 2.0, parse_date("2024-03-04").expect("date"));
    panel.display_name = "Panel one".to_string();
    let mut annotated = GeneEntry::new(10, "X").with_info(GeneInfo {
        inheritance_models: Some(vec!["AD".to_string(), "AR".to_string()]),
        reduced_penetrance: Some(true),
        comment: Some("checked".to_string()),
        ..GeneInfo::default()
    });
    annotated.database_entry_version = Some(1.5);
    panel.genes = vec![annotated, GeneEntry::new(20, "Y")];

    let mut buf = Vec::new();
    write_panel_tsv(&mut buf, &panel).expect("write");
    let text = String::from_utf8(buf).expect("utf8");
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "##panel_id=PANEL1");
    assert_eq!(lines[2], "##version=2");
    assert_eq!(lines[3], "##date=2024-03-04");
    assert_eq!(lines[4], "##display_name=Panel one");
    assert!(lines[5].starts_with("#hgnc_id\thgnc_symbol\t"));
    assert_eq!(lines[6], "10\tX\t\tTrue\t\t1.5\tAD,AR\t\tchecked");
    assert_eq!(lines[7], "20\tY\t\t\t\t\t\t\t");
    assert_eq!(lines.len(), 8);
}

#[test]
fn separators_inside_text_stay_in_their_cell() {
    let mut panel = Panel::new("PANEL1", "cust000", 1.0, parse_date("2024-03-04").expect("date"));
    panel.display_name = "two\tparts".to_string();
    panel.genes = vec![GeneEntry::new(10, "X").with_info(GeneInfo {
        comment: Some("line one\nline\ttwo".to_string()),
        ..GeneInfo::default()
    })];

    let mut buf = Vec::new();
    write_panel_tsv(&mut buf, &panel).expect("write");
    let text = String::from_utf8(buf).expect("utf8");
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 7);
    assert_eq!(lines[4], "##display_name=two parts");
    let row: Vec<&str> = lines[6].split('\t').collect();
    assert_eq!(row.len(), PANEL_COLUMNS.len());
    assert_eq!(row[8], "line one line two");
}
