use std::io::Write;

use crate::model::{GeneEntry, Panel};

pub const PANEL_COLUMNS: [&str; 9] = [
    "hgnc_id",
    "hgnc_symbol",
    "disease_associated_transcripts",
    "reduced_penetrance",
    "mosaicism",
    "database_entry_version",
    "inheritance_models",
    "custom_inheritance_models",
    "comment",
];

/// Writes `##key=value` panel headers, a `#` column header and one row per gene.
pub fn write_panel_tsv<W: Write>(out: W, panel: &Panel) -> anyhow::Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Never)
        .has_headers(false)
        .flexible(true)
        .from_writer(out);

    let date = panel.date.format("%Y-%m-%d").to_string();
    let version = panel.version.to_string();
    for (key, value) in [
        ("panel_id", panel.panel_name.as_str()),
        ("institute", panel.institute.as_str()),
        ("version", version.as_str()),
        ("date", date.as_str()),
        ("display_name", panel.display_name.as_str()),
    ] {
        writer.write_record([format!("##{key}={}", clean(value))])?;
    }

    let mut header: Vec<String> = PANEL_COLUMNS.iter().map(|c| c.to_string()).collect();
    header[0] = format!("#{}", header[0]);
    writer.write_record(&header)?;

    for gene in &panel.genes {
        writer.write_record(gene_row(gene))?;
    }
    writer.flush()?;
    Ok(())
}

fn gene_row(gene: &GeneEntry) -> [String; 9] {
    let info = &gene.info;
    [
        gene.hgnc_id.to_string(),
        clean(&gene.symbol),
        join(info.disease_associated_transcripts.as_deref()),
        flag(info.reduced_penetrance),
        flag(info.mosaicism),
        gene.database_entry_version
            .map(|v| v.to_string())
            .unwrap_or_default(),
        join(info.inheritance_models.as_deref()),
        join(info.custom_inheritance_models.as_deref()),
        info.comment.as_deref().map(clean).unwrap_or_default(),
    ]
}

fn join(values: Option<&[String]>) -> String {
    values
        .map(|v| v.iter().map(|s| clean(s)).collect::<Vec<_>>().join(","))
        .unwrap_or_default()
}

/// Cells are unquoted, so field and record separators inside text become spaces.
fn clean(value: &str) -> String {
    value.replace(['\t', '\r', '\n'], " ")
}

fn flag(value: Option<bool>) -> String {
    match value {
        Some(true) => "True".to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/tsv.rs"]
mod tests;
