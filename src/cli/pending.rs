use clap::{Args, Subcommand};

use crate::cli::{Context, resolve_panel};
use crate::model::{GeneInfo, HgncGene};

#[derive(Args, Debug)]
pub struct PendingArgs {
    #[command(subcommand)]
    pub(crate) command: PendingCommand,
}

#[derive(Subcommand, Debug)]
pub enum PendingCommand {
    Add(AddArgs),
    Reset(PanelArg),
    Apply(ApplyArgs),
}

#[derive(Args, Debug)]
pub struct PanelArg {
    #[arg(long)]
    pub(crate) panel: String,

    /// Defaults to the latest version
    #[arg(long)]
    pub(crate) panel_version: Option<f64>,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    #[command(flatten)]
    pub(crate) target: PanelArg,

    #[arg(long)]
    pub(crate) hgnc_id: u32,

    #[arg(long)]
    pub(crate) symbol: String,

    /// One of add, delete, edit
    #[arg(long)]
    pub(crate) action: String,

    /// Gene annotation as a JSON object
    #[arg(long)]
    pub(crate) info: Option<String>,
}

#[derive(Args, Debug)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub(crate) target: PanelArg,

    /// Version of the result; equal to the current version updates in place
    #[arg(long)]
    pub(crate) new_version: f64,
}

pub fn handle(ctx: &Context, args: PendingArgs) -> anyhow::Result<()> {
    match args.command {
        PendingCommand::Add(args) => {
            let panel = resolve_panel(ctx, &args.target.panel, args.target.panel_version)?;
            let info: Option<GeneInfo> = args
                .info
                .as_deref()
                .map(serde_json::from_str)
                .transpose()?;
            let gene = HgncGene::new(args.hgnc_id, args.symbol);
            let updated = ctx.repo.add_pending(&panel, &gene, &args.action, info)?;
            let staged = updated.map(|p| p.pending_changes().len()).unwrap_or(0);
            println!("pending\t{staged}");
        }
        PendingCommand::Reset(args) => {
            let panel = resolve_panel(ctx, &args.panel, args.panel_version)?;
            ctx.repo.reset_pending(&panel)?;
            println!("pending\t0");
        }
        PendingCommand::Apply(args) => {
            let panel = resolve_panel(ctx, &args.target.panel, args.target.panel_version)?;
            let id = ctx.repo.apply_pending(&panel, args.new_version)?;
            println!("{id}");
        }
    }
    Ok(())
}
