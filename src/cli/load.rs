use std::path::PathBuf;

use clap::Args;

use crate::cli::Context;
use crate::panels::{DefaultPanelBuilder, NoGeneIndex, load_panel_file};

#[derive(Args, Debug)]
pub struct LoadArgs {
    /// TOML panel file
    #[arg(long)]
    pub(crate) file: PathBuf,

    /// Owner institute when the file does not name one
    #[arg(long)]
    pub(crate) institute: Option<String>,

    /// Replace an existing panel with the same name and version
    #[arg(long, default_value_t = false)]
    pub(crate) replace: bool,
}

pub fn handle(ctx: &Context, args: LoadArgs) -> anyhow::Result<()> {
    let mut raw = load_panel_file(&args.file)?;
    if raw.institute.trim().is_empty() {
        raw.institute = args
            .institute
            .unwrap_or_else(|| ctx.config.default_institute.clone());
    }
    let id = ctx
        .repo
        .load_panel(raw, &DefaultPanelBuilder, &NoGeneIndex, args.replace)?;
    println!("{id}");
    Ok(())
}
