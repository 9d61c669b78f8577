use anyhow::Result;
use serde::Serialize;

use crate::cli::{CheckArgs, Cli};
use super::open_engine;

#[derive(Serialize)]
struct CheckOutput<'a> {
    dataset: &'a nystax::DatasetInfo,
    counties: Vec<&'a str>,
    /// [min_lon, min_lat, max_lon, max_lat] of the buffered boundaries.
    bounds: Option<[f64; 4]>,
}

pub fn run(cli: &Cli, args: &CheckArgs) -> Result<()> {
    let engine = open_engine(cli, &args.boundaries)?;
    let snapshot = engine.snapshot()?;
    let index = snapshot.index();

    let mut counties = index.polygons().iter().map(|p| p.county().name()).collect::<Vec<_>>();
    counties.sort_unstable();
    counties.dedup();

    let output = CheckOutput {
        dataset: snapshot.info(),
        counties,
        bounds: index.bounds().map(|r| [r.min().x, r.min().y, r.max().x, r.max().y]),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
