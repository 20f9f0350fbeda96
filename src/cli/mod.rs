use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::info;

use crate::config::RepoConfig;
use crate::repo::PanelRepository;
use crate::store::JsonFileStore;

mod genes;
mod load;
mod panels;
mod pending;

#[derive(Parser, Debug)]
#[command(name = "kira-genepanels", version, about = "Kira gene panel repository CLI")]
pub struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// Optional TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Panel store file, overrides the config
    #[arg(long, global = true)]
    store: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a TOML panel file
    Load(load::LoadArgs),
    /// List stored panels
    List(panels::ListArgs),
    /// Export one panel version as TSV or JSON
    Export(panels::ExportArgs),
    /// Delete one panel version
    Delete(panels::DeleteArgs),
    /// Print the genes of a panel
    Genes(genes::GenesArgs),
    /// Find panels containing a gene
    Search(genes::SearchArgs),
    /// Stage, clear or apply pending changes
    Pending(pending::PendingArgs),
}

pub(crate) struct Context {
    pub config: RepoConfig,
    pub repo: PanelRepository<JsonFileStore>,
}

impl Cli {
    pub fn dispatch(self) -> anyhow::Result<()> {
        let mut config = RepoConfig::load(self.global.config.as_deref())?;
        if let Some(store) = self.global.store {
            config.store = store;
        }
        let store = JsonFileStore::open(&config.store)?;
        info!(store = %config.store.display(), "opened panel store");
        let ctx = Context {
            config,
            repo: PanelRepository::new(store),
        };

        match self.command {
            Command::Load(args) => load::handle(&ctx, args),
            Command::List(args) => panels::list(&ctx, args),
            Command::Export(args) => panels::export(&ctx, args),
            Command::Delete(args) => panels::delete(&ctx, args),
            Command::Genes(args) => genes::genes(&ctx, args),
            Command::Search(args) => genes::search(&ctx, args),
            Command::Pending(args) => pending::handle(&ctx, args),
        }
    }
}

/// Panel version named on the command line, or the latest one.
pub(crate) fn resolve_panel(
    ctx: &Context,
    panel: &str,
    version: Option<f64>,
) -> anyhow::Result<crate::model::Panel> {
    ctx.repo
        .gene_panel(panel, version)?
        .ok_or_else(|| match version {
            Some(v) => anyhow::anyhow!("panel {panel} version {v} not found"),
            None => anyhow::anyhow!("panel {panel} not found"),
        })
}

#[cfg(test)]
#[path = "../../tests/src_inline/cli/mod.rs"]
mod tests;
