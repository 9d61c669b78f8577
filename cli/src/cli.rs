use std::path::PathBuf;

/// Sales-tax lookup for New York State coordinates
#[derive(clap::Parser, Debug)]
#[command(name = "nystax", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// JSON tax configuration, defaults to the built-in NYS rates
    #[arg(short, long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Serve "outside jurisdiction" for every point when the dataset has no usable polygons
    #[arg(long, global = true)]
    pub allow_empty: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Price a single order and print the record as JSON
    Lookup(LookupArgs),

    /// Price every row of an order CSV and print the import report as JSON
    Import(ImportArgs),

    /// Load a boundary dataset and print what was indexed
    Check(CheckArgs),
}

#[derive(clap::Args, Debug)]
pub struct LookupArgs {
    /// County boundary dataset (GeoJSON or .shp)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub boundaries: PathBuf,

    /// Latitude in decimal degrees
    #[arg(allow_hyphen_values = true)]
    pub latitude: f64,

    /// Longitude in decimal degrees
    #[arg(allow_hyphen_values = true)]
    pub longitude: f64,

    /// Order subtotal, e.g. 100.00
    pub subtotal: String,
}

#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    /// County boundary dataset (GeoJSON or .shp)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub boundaries: PathBuf,

    /// Order CSV with latitude, longitude, subtotal and optional timestamp columns
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub orders: PathBuf,

    /// Write priced records to this JSON file
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Maximum row errors listed in the report
    #[arg(long, default_value_t = nystax::MAX_REPORTED_ERRORS)]
    pub max_errors: usize,
}

#[derive(clap::Args, Debug)]
pub struct CheckArgs {
    /// County boundary dataset (GeoJSON or .shp)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub boundaries: PathBuf,
}
