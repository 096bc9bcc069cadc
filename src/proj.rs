use anyhow::{anyhow, Context, Result};
use geo::{Coord, MapCoords};
use proj4rs::{proj::Proj as Proj4, transform::transform};

use crate::collection::ParcelCollection;

/// Source CRS of every dataset on disk: Lambert-93 (EPSG:2154), meters.
const LAMBERT93_PROJ4: &str = "+proj=lcc +lat_1=49 +lat_2=44 +lat_0=46.5 +lon_0=3 \
     +x_0=700000 +y_0=6600000 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs +type=crs";

/// Display CRS: WGS84 (EPSG:4326), degrees.
const WGS84_PROJ4: &str = "+proj=longlat +datum=WGS84 +no_defs +type=crs";

/// Reproject every shape from Lambert-93 to WGS84 lon/lat degrees.
///
/// Pure coordinate transform: attributes are carried over untouched and an
/// empty collection is a no-op. Coordinates are trusted to be Lambert-93
/// meters; out-of-range input produces out-of-range output, not an error.
pub fn to_wgs84(collection: &ParcelCollection) -> Result<ParcelCollection> {
    let from = Proj4::from_proj_string(LAMBERT93_PROJ4)
        .with_context(|| anyhow!("failed to build source PROJ.4: {LAMBERT93_PROJ4}"))?;
    let to = Proj4::from_proj_string(WGS84_PROJ4)
        .with_context(|| anyhow!("failed to build target PROJ.4: {WGS84_PROJ4}"))?;

    // Meters in, radians out for a longlat target.
    let shapes = collection
        .shapes()
        .iter()
        .map(|shape| {
            shape.try_map_coords(|coord: Coord<f64>| {
                let mut point = (coord.x, coord.y, 0.0);
                transform(&from, &to, &mut point)
                    .map_err(|err| anyhow!("CRS transform failed at ({}, {}): {err}", coord.x, coord.y))?;
                Ok::<_, anyhow::Error>(Coord { x: point.0.to_degrees(), y: point.1.to_degrees() })
            })
        })
        .collect::<Result<Vec<_>>>()?;

    ParcelCollection::new(shapes, collection.properties().to_vec())
}
