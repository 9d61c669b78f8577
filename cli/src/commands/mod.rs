pub mod check;
pub mod import;
pub mod lookup;

use anyhow::{Context, Result};
use nystax::{EmptyDataset, Engine, TaxConfig};

use crate::cli::Cli;

/// Build an engine from the global options and load `boundaries` into it.
pub fn open_engine(cli: &Cli, boundaries: &std::path::Path) -> Result<Engine> {
    let config = match &cli.config {
        Some(path) => TaxConfig::from_json_file(path)?,
        None => TaxConfig::default(),
    };
    let empty = if cli.allow_empty { EmptyDataset::RejectAll } else { EmptyDataset::Fail };

    let engine = Engine::new(config)?.with_empty_dataset(empty);
    engine.load(boundaries)
        .with_context(|| format!("[cli] failed to load boundaries from {}", boundaries.display()))?;
    Ok(engine)
}
