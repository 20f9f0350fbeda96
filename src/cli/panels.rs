use std::path::PathBuf;

use clap::{Args, ValueEnum};

use crate::cli::{Context, resolve_panel};
use crate::report::json::write_panel_json;
use crate::report::tsv::write_panel_tsv;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only panels owned by this institute
    #[arg(long)]
    pub(crate) institute: Option<String>,

    /// Only versions of this panel
    #[arg(long)]
    pub(crate) panel: Option<String>,

    /// Include hidden panels
    #[arg(long, default_value_t = false)]
    pub(crate) include_hidden: bool,

    /// Latest version per panel name (requires --institute or the configured default)
    #[arg(long, default_value_t = false)]
    pub(crate) latest: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Tsv,
    Json,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    #[arg(long)]
    pub(crate) panel: String,

    /// Defaults to the latest version
    #[arg(long)]
    pub(crate) panel_version: Option<f64>,

    #[arg(long, value_enum, default_value = "tsv")]
    pub(crate) format: ExportFormat,

    /// Output file; TSV goes to stdout when omitted
    #[arg(long)]
    pub(crate) out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    #[arg(long)]
    pub(crate) panel: String,

    #[arg(long)]
    pub(crate) panel_version: f64,
}

pub fn list(ctx: &Context, args: ListArgs) -> anyhow::Result<()> {
    println!("panel_name\tversion\tinstitute\tn_genes\tn_pending\tarchived\tdisplay_name");
    let print = |panel: &crate::model::Panel| {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            panel.panel_name,
            panel.version,
            panel.institute,
            panel.genes.len(),
            panel.pending_changes().len(),
            panel.is_archived,
            panel.display_name
        );
    };

    if args.latest {
        let institute = args
            .institute
            .unwrap_or_else(|| ctx.config.default_institute.clone());
        for panel in ctx.repo.latest_panels(&institute, args.include_hidden)? {
            print(&panel?);
        }
        return Ok(());
    }

    for panel in ctx.repo.gene_panels(
        args.panel.as_deref(),
        args.institute.as_deref(),
        None,
        args.include_hidden,
    )? {
        print(&panel);
    }
    Ok(())
}

pub fn export(ctx: &Context, args: ExportArgs) -> anyhow::Result<()> {
    let panel = resolve_panel(ctx, &args.panel, args.panel_version)?;
    match (args.format, args.out) {
        (ExportFormat::Tsv, Some(path)) => write_panel_tsv(std::fs::File::create(path)?, &panel),
        (ExportFormat::Tsv, None) => write_panel_tsv(std::io::stdout().lock(), &panel),
        (ExportFormat::Json, Some(path)) => write_panel_json(&path, &panel),
        (ExportFormat::Json, None) => {
            println!("{}", serde_json::to_string_pretty(&panel)?);
            Ok(())
        }
    }
}

pub fn delete(ctx: &Context, args: DeleteArgs) -> anyhow::Result<()> {
    let panel = resolve_panel(ctx, &args.panel, Some(args.panel_version))?;
    let deleted = ctx.repo.delete_panel(&panel)?;
    println!("deleted\t{deleted}");
    Ok(())
}
