use anyhow::{Context, Result};
use serde_json::Value;

use crate::{
    catalog::Category,
    collection::ParcelCollection,
    filter::{self, FilterCriteria},
    io::geojson,
    proj,
};

/// Everything one pipeline run hands to the presentation layer.
#[derive(Debug)]
pub struct PipelineOutput {
    /// WGS84 FeatureCollection of the surviving records, ready for a map.
    pub geojson: Value,
    /// Number of surviving records.
    pub count: usize,
    /// Total bounds [min_lon, min_lat, max_lon, max_lat] of the survivors,
    /// `None` when nothing survived. Used to fit the map view.
    pub bounds: Option<[f64; 4]>,
    /// False when a surface bound was requested but the dataset has no
    /// surface column, so the caller can report filtering as unavailable.
    pub surface_filter_active: bool,
    /// The surviving records themselves, for table expansion.
    pub collection: ParcelCollection,
}

/// Run one full pass: fresh file read, Lambert-93 → WGS84 reprojection,
/// threshold filter, GeoJSON serialization.
///
/// There is no cache: the presentation layer calls this again with the
/// current parameters on every interaction, and each run is a pure function
/// of the file contents and the criteria.
pub fn recompute(category: &Category, criteria: &FilterCriteria) -> Result<PipelineOutput> {
    let loaded = geojson::read_from_path(&category.path)
        .with_context(|| format!("loading category {:?}", category.name))?;
    let projected = proj::to_wgs84(&loaded)
        .with_context(|| format!("reprojecting category {:?}", category.name))?;
    let outcome = filter::apply(&projected, &category.surface_column, criteria);

    Ok(PipelineOutput {
        geojson: geojson::to_value(&outcome.collection),
        count: outcome.collection.len(),
        bounds: outcome.collection.bounds(),
        surface_filter_active: outcome.surface_filter_active,
        collection: outcome.collection,
    })
}
