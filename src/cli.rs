use clap::{Args, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

/// Parcel dashboard CLI (argument schema only)
#[derive(Parser, Debug)]
#[command(name = "parcelscope", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Filter a category and write the WGS84 GeoJSON for map display
    Map(MapArgs),

    /// Filter a category and export the constituent-parcel table
    Parcels(ParcelsArgs),

    /// Show record counts and attribute ranges per category
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
pub struct MapArgs {
    /// Catalog file mapping categories to datasets
    #[arg(value_hint = ValueHint::FilePath)]
    pub catalog: PathBuf,

    /// Category name, as listed in the catalog
    pub category: String,

    /// Keep records with elongation_index >= this bound
    #[arg(long)]
    pub elongation: Option<f64>,

    /// Keep records with the category's surface attribute >= this bound
    #[arg(long)]
    pub surface: Option<f64>,

    /// Output GeoJSON file
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: PathBuf,

    /// Overwrite if the file exists
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct ParcelsArgs {
    /// Catalog file mapping categories to datasets
    #[arg(value_hint = ValueHint::FilePath)]
    pub catalog: PathBuf,

    /// Category name, as listed in the catalog
    pub category: String,

    /// Keep records with elongation_index >= this bound
    #[arg(long)]
    pub elongation: Option<f64>,

    /// Keep records with the category's surface attribute >= this bound
    #[arg(long)]
    pub surface: Option<f64>,

    /// Output CSV file (prints to stdout when omitted)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Overwrite if the file exists
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Catalog file mapping categories to datasets
    #[arg(value_hint = ValueHint::FilePath)]
    pub catalog: PathBuf,

    /// Restrict to one category (all categories when omitted)
    pub category: Option<String>,
}
