pub mod builder;
pub mod loader;
pub mod omim;

pub use builder::{BuildError, DefaultPanelBuilder, GeneResolver, NoGeneIndex, PanelBuilder};
pub use loader::{LoadError, RawGene, RawPanel, load_panel_file, load_panels_from_dir};
pub use omim::{AliasMap, AliasResolver, OmimGeneParser};
