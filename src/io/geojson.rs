//! GeoJSON FeatureCollection reading and writing.
//!
//! The loader accepts Polygon and MultiPolygon features; polygons are
//! promoted to single-member multipolygons so the rest of the pipeline works
//! with one geometry type. The writer emits MultiPolygon features with the
//! full property map, so a loaded collection round-trips losslessly.

use std::{fs, path::Path};

use anyhow::{anyhow, bail, Context, Result};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde_json::{json, Map, Value};

use crate::collection::ParcelCollection;

/// Read a GeoJSON FeatureCollection file into a collection.
pub fn read_from_path(path: &Path) -> Result<ParcelCollection> {
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read GeoJSON file: {}", path.display()))?;
    read_from_bytes(&bytes)
        .with_context(|| format!("invalid GeoJSON document: {}", path.display()))
}

/// Read a GeoJSON FeatureCollection from bytes.
pub fn read_from_bytes(bytes: &[u8]) -> Result<ParcelCollection> {
    let value: Value = serde_json::from_slice(bytes).context("failed to parse JSON")?;

    if let Some(ty) = value.get("type").and_then(Value::as_str) {
        if ty != "FeatureCollection" {
            bail!("expected a FeatureCollection, found type {ty:?}");
        }
    }
    let features = value
        .get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow!("document has no \"features\" array"))?;

    let mut shapes = Vec::with_capacity(features.len());
    let mut properties = Vec::with_capacity(features.len());
    for (idx, feature) in features.iter().enumerate() {
        let geometry = feature
            .get("geometry")
            .and_then(Value::as_object)
            .ok_or_else(|| anyhow!("feature {idx} has no geometry object"))?;
        shapes.push(parse_geometry(geometry).with_context(|| format!("feature {idx}"))?);

        properties.push(match feature.get("properties") {
            Some(Value::Object(map)) => map.clone(),
            Some(Value::Null) | None => Map::new(),
            Some(other) => bail!("feature {idx} properties is not an object: {other}"),
        });
    }

    ParcelCollection::new(shapes, properties)
}

/// Serialize a collection as a GeoJSON FeatureCollection value.
pub fn to_value(collection: &ParcelCollection) -> Value {
    let features: Vec<Value> = collection
        .shapes()
        .iter()
        .zip(collection.properties())
        .map(|(shape, props)| {
            json!({
                "type": "Feature",
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": multipolygon_coords(shape),
                },
                "properties": props,
            })
        })
        .collect();

    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

/// Write a collection to a GeoJSON file.
pub fn write_to_path(collection: &ParcelCollection, path: &Path) -> Result<()> {
    let bytes = serde_json::to_vec(&to_value(collection)).context("failed to serialize GeoJSON")?;
    fs::write(path, bytes)
        .with_context(|| format!("failed to write GeoJSON file: {}", path.display()))
}

fn multipolygon_coords(shape: &MultiPolygon<f64>) -> Value {
    let polygons: Vec<Value> = shape.0.iter()
        .map(|polygon| {
            let mut rings = vec![ring_coords(polygon.exterior())];
            rings.extend(polygon.interiors().iter().map(ring_coords));
            json!(rings)
        })
        .collect();
    json!(polygons)
}

fn ring_coords(ring: &LineString<f64>) -> Value {
    let coords: Vec<Vec<f64>> = ring.coords().map(|c| vec![c.x, c.y]).collect();
    json!(coords)
}

fn parse_geometry(geometry: &Map<String, Value>) -> Result<MultiPolygon<f64>> {
    let ty = geometry
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("geometry has no type"))?;
    let coords = geometry
        .get("coordinates")
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow!("geometry has no coordinates array"))?;

    match ty {
        "Polygon" => Ok(MultiPolygon(vec![parse_polygon(coords)?])),
        "MultiPolygon" => {
            let polygons = coords.iter()
                .map(|rings| {
                    rings.as_array()
                        .ok_or_else(|| anyhow!("MultiPolygon member is not an array"))
                        .and_then(|rings| parse_polygon(rings))
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(MultiPolygon(polygons))
        }
        other => bail!("unsupported geometry type {other:?}, expected Polygon or MultiPolygon"),
    }
}

/// Parse a GeoJSON polygon: first ring exterior, remaining rings holes.
fn parse_polygon(rings: &[Value]) -> Result<Polygon<f64>> {
    let exterior = rings
        .first()
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow!("polygon has no exterior ring"))?;
    let interiors = rings[1..].iter()
        .map(|ring| {
            ring.as_array()
                .ok_or_else(|| anyhow!("polygon interior ring is not an array"))
                .and_then(|ring| parse_ring(ring))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Polygon::new(parse_ring(exterior)?, interiors))
}

fn parse_ring(coords: &[Value]) -> Result<LineString<f64>> {
    let mut points = Vec::with_capacity(coords.len());
    for pair in coords {
        let pair = pair
            .as_array()
            .filter(|p| p.len() >= 2)
            .ok_or_else(|| anyhow!("ring position is not an [x, y] pair"))?;
        let x = pair[0].as_f64().ok_or_else(|| anyhow!("x must be a number"))?;
        let y = pair[1].as_f64().ok_or_else(|| anyhow!("y must be a number"))?;
        points.push(Coord { x, y });
    }

    // Tolerate unclosed source rings.
    if !points.is_empty() && points[0] != points[points.len() - 1] {
        points.push(points[0]);
    }

    Ok(LineString(points))
}
