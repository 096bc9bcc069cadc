use anyhow::Result;
use clap::Parser;

use parcelscope::cli::{Cli, Commands};
use parcelscope::commands;

fn main() -> Result<()> {
    let cli = Cli::parse();
    match &cli.command {
        Commands::Map(args) => commands::map(&cli, args),
        Commands::Parcels(args) => commands::parcels(&cli, args),
        Commands::Inspect(args) => commands::inspect(&cli, args),
    }
}
