use std::fs::File;

use anyhow::{Context, Result};
use nystax::EnrichOptions;
use tracing::info;

use crate::cli::{Cli, ImportArgs};
use super::open_engine;

pub fn run(cli: &Cli, args: &ImportArgs) -> Result<()> {
    let engine = open_engine(cli, &args.boundaries)?;
    let rows = nystax::read_order_rows(&args.orders)?;
    info!(rows = rows.len(), path = %args.orders.display(), "[import] read order rows");

    // Row numbers in the report count the header line.
    let options = EnrichOptions { header_offset: 1, max_reported_errors: args.max_errors };
    let enrichment = engine.enrich(&rows, &options)?;
    let report = enrichment.report();

    if let Some(path) = &args.output {
        let file = File::create(path)
            .with_context(|| format!("[import] failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(file, enrichment.priced())
            .with_context(|| format!("[import] failed to write priced records to {}", path.display()))?;
        info!(records = enrichment.priced().len(), path = %path.display(), "[import] wrote priced records");
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
