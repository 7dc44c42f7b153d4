use crate::{BusinessRecord, ClusteringConfig};
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser)]
pub struct DatasetArgs {
    /// Path to a JSON array of business rows
    pub dataset: PathBuf,

    /// Optional JSON file overriding the default clustering config
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn load_businesses(path: &Path) -> Vec<BusinessRecord> {
    let raw = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&raw).unwrap()
}

pub fn load_config(path: Option<&Path>) -> ClusteringConfig {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path).unwrap();
            serde_json::from_str(&raw).unwrap()
        }
        None => ClusteringConfig::default(),
    }
}

pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .compact()
        .init();
}
