use super::*;

fn lines(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

#[test]
fn finds_release_date_in_header() {
    let genemap = lines(&[
        "# Copyright (c) 1966-2023 Johns Hopkins University",
        "# Generated: 2023-06-12",
        "# Chromosome\tGenomic Position Start",
    ]);
    assert_eq!(release_date_text(&genemap), Some("2023-06-12"));
}

#[test]
fn first_marker_line_wins() {
    let genemap = lines(&["# Generated: 2023-01-01", "# Generated: 2024-01-01"]);
    assert_eq!(release_date_text(&genemap), Some("2023-01-01"));
}

#[test]
fn missing_marker_is_none() {
    assert_eq!(release_date_text(&lines(&["# Chromosome"])), None);
}
