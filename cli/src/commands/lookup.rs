use anyhow::Result;

use crate::cli::{Cli, LookupArgs};
use super::open_engine;

pub fn run(cli: &Cli, args: &LookupArgs) -> Result<()> {
    let subtotal = nystax::parse_subtotal(&args.subtotal)?;
    let engine = open_engine(cli, &args.boundaries)?;

    let record = engine.lookup(args.latitude, args.longitude, subtotal)?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}
