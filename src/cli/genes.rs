use clap::{Args, ValueEnum};

use crate::cli::Context;
use crate::model::GeneFormat;
use crate::repo::PanelLookup;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeneFormatArg {
    Symbol,
    HgncId,
}

impl From<GeneFormatArg> for GeneFormat {
    fn from(value: GeneFormatArg) -> Self {
        match value {
            GeneFormatArg::Symbol => GeneFormat::Symbol,
            GeneFormatArg::HgncId => GeneFormat::HgncId,
        }
    }
}

#[derive(Args, Debug)]
pub struct GenesArgs {
    /// Latest version of these panels (repeatable)
    #[arg(long = "panel")]
    pub(crate) panels: Vec<String>,

    /// Exact stored panel documents by id (repeatable)
    #[arg(long = "panel-id")]
    pub(crate) panel_ids: Vec<String>,

    #[arg(long, value_enum, default_value = "symbol")]
    pub(crate) format: GeneFormatArg,
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    #[arg(long)]
    pub(crate) hgnc_id: u32,
}

pub fn genes(ctx: &Context, args: GenesArgs) -> anyhow::Result<()> {
    let lookups: Vec<PanelLookup> = if args.panel_ids.is_empty() {
        args.panels.into_iter().map(PanelLookup::Name).collect()
    } else {
        args.panel_ids.into_iter().map(PanelLookup::Id).collect()
    };
    if lookups.is_empty() {
        anyhow::bail!("give at least one --panel or --panel-id");
    }
    for gene in ctx.repo.panels_to_genes(&lookups, args.format.into())? {
        println!("{gene}");
    }
    Ok(())
}

pub fn search(ctx: &Context, args: SearchArgs) -> anyhow::Result<()> {
    println!("display_name\tversions");
    for hit in ctx.repo.search_panels_hgnc_id(args.hgnc_id)? {
        let versions: Vec<String> = hit.versions.iter().map(|v| v.to_string()).collect();
        println!("{}\t{}", hit.display_name, versions.join(","));
    }
    Ok(())
}
