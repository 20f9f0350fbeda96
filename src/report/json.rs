use std::path::Path;

use crate::model::Panel;

pub fn write_panel_json(path: &Path, panel: &Panel) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(panel)?;
    std::fs::write(path, json)?;
    Ok(())
}
