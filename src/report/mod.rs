pub mod json;
pub mod tsv;
