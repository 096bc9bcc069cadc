use std::path::Path;

use anyhow::{bail, Result};

use crate::catalog::{Catalog, Category};
use crate::cli::{Cli, InspectArgs, MapArgs, ParcelsArgs};
use crate::collection::ParcelCollection;
use crate::filter::{FilterCriteria, ELONGATION_COLUMN};
use crate::io::geojson;
use crate::pipeline::recompute;
use crate::table;

pub fn map(cli: &Cli, args: &MapArgs) -> Result<()> {
    let catalog = Catalog::from_path(&args.catalog)?;
    let category = catalog.get(&args.category)?;
    let criteria = FilterCriteria {
        elongation_min: args.elongation,
        surface_min: args.surface,
    };

    if cli.verbose > 0 {
        eprintln!("[map] category={} file={}", category.name, category.path.display());
    }

    let output = recompute(category, &criteria)?;
    report_surface_skip(output.surface_filter_active, &criteria, category);

    println!("{} polygons", output.count);
    if cli.verbose > 0 {
        match output.bounds {
            Some([min_lon, min_lat, max_lon, max_lat]) => {
                eprintln!("[map] bounds lon {min_lon:.6}..{max_lon:.6} lat {min_lat:.6}..{max_lat:.6}")
            }
            None => eprintln!("[map] empty result, nothing to draw"),
        }
    }

    require_writable(&args.output, args.force)?;
    geojson::write_to_path(&output.collection, &args.output)?;
    if cli.verbose > 0 {
        eprintln!("[map] -> {}", args.output.display());
    }
    Ok(())
}

pub fn parcels(cli: &Cli, args: &ParcelsArgs) -> Result<()> {
    let catalog = Catalog::from_path(&args.catalog)?;
    let category = catalog.get(&args.category)?;
    let criteria = FilterCriteria {
        elongation_min: args.elongation,
        surface_min: args.surface,
    };

    if cli.verbose > 0 {
        eprintln!("[parcels] category={} file={}", category.name, category.path.display());
    }

    let output = recompute(category, &criteria)?;
    report_surface_skip(output.surface_filter_active, &criteria, category);

    match table::explode_parcels(&output.collection)? {
        Some(mut df) => match &args.output {
            Some(path) => {
                require_writable(path, args.force)?;
                table::write_csv(&mut df, path)?;
                if cli.verbose > 0 {
                    eprintln!("[parcels] {} rows -> {}", df.height(), path.display());
                }
            }
            None => print!("{}", table::to_csv_string(&mut df)?),
        },
        None => println!("No matching parcels to display."),
    }
    Ok(())
}

pub fn inspect(cli: &Cli, args: &InspectArgs) -> Result<()> {
    let catalog = Catalog::from_path(&args.catalog)?;
    let categories: Vec<&Category> = match &args.category {
        Some(name) => vec![catalog.get(name)?],
        None => catalog.categories().iter().collect(),
    };

    for category in categories {
        if cli.verbose > 0 {
            eprintln!("[inspect] reading {}", category.path.display());
        }
        let collection = geojson::read_from_path(&category.path)?;
        println!("{}: {} records", category.name, collection.len());
        print_range(&collection, ELONGATION_COLUMN);
        if collection.has_column(&category.surface_column) {
            print_range(&collection, &category.surface_column);
        } else {
            println!(
                "  {}: missing, surface filtering disabled",
                category.surface_column
            );
        }
    }
    Ok(())
}

fn print_range(collection: &ParcelCollection, column: &str) {
    match collection.column_stats(column) {
        Some(stats) => println!("  {column}: {} .. {}", stats.min, stats.max),
        None => println!("  {column}: no numeric values"),
    }
}

/// The skipped surface filter is informational, never fatal.
fn report_surface_skip(active: bool, criteria: &FilterCriteria, category: &Category) {
    if criteria.surface_min.is_some() && !active {
        println!(
            "Column {:?} does not exist in this category; surface filtering is disabled.",
            category.surface_column
        );
    }
}

fn require_writable(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("output file exists (use --force to overwrite): {}", path.display());
    }
    Ok(())
}
