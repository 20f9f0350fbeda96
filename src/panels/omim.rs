use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::GeneEntry;

pub const OMIM_PANEL_NAME: &str = "OMIM-AUTO";
pub const OMIM_DEFAULT_INSTITUTE: &str = "cust002";

const RELEASE_MARKER: &str = "Generated";

/// Canonical gene an alias resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasGene {
    pub true_id: Option<u32>,
    pub ids: Vec<u32>,
}

pub type AliasMap = HashMap<String, AliasGene>;

pub trait AliasResolver {
    fn genes_by_alias(&self) -> anyhow::Result<AliasMap>;
}

/// Turns genemap2/mim2gene lines into panel gene entries.
pub trait OmimGeneParser {
    fn parse(
        &self,
        genemap2_lines: &[String],
        mim2gene_lines: &[String],
        alias_genes: &AliasMap,
    ) -> anyhow::Result<Vec<GeneEntry>>;
}

/// Text after the last `:` of the first header line carrying the release marker.
pub fn release_date_text(genemap2_lines: &[String]) -> Option<&str> {
    genemap2_lines
        .iter()
        .find(|line| line.contains(RELEASE_MARKER))
        .and_then(|line| line.rsplit(':').next())
        .map(str::trim)
}

#[cfg(test)]
#[path = "../../tests/src_inline/panels/omim.rs"]
mod tests;
