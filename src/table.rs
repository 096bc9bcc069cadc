//! Tabular expansion of the nested constituent-parcel attribute.

use std::{fs::File, path::Path};

use anyhow::{Context, Result};
use polars::{frame::DataFrame, io::SerWriter, prelude::{Column, CsvWriter}};
use serde_json::Value;

use crate::collection::ParcelCollection;

/// Nested attribute listing the source parcels a polygon was aggregated from.
pub const PARCELS_COLUMN: &str = "parcelles_composantes";

/// Explode the constituent-parcel lists into one row per (polygon, parcel)
/// pair, with columns `polygon` (record index) and `parcelle`.
///
/// Returns `None` when no record carries the attribute at all, so the caller
/// can report "no matching parcels" instead of showing an empty table. A
/// collection that has the column produces a frame even if every list is
/// empty (zero rows).
pub fn explode_parcels(collection: &ParcelCollection) -> Result<Option<DataFrame>> {
    if !collection.has_column(PARCELS_COLUMN) {
        return Ok(None);
    }

    let mut polygon_idx: Vec<u32> = Vec::new();
    let mut parcelle: Vec<String> = Vec::new();
    for (idx, props) in collection.properties().iter().enumerate() {
        if let Some(Value::Array(entries)) = props.get(PARCELS_COLUMN) {
            for entry in entries {
                polygon_idx.push(idx as u32);
                parcelle.push(parcel_id(entry));
            }
        }
    }

    let df = DataFrame::new(vec![
        Column::new("polygon".into(), polygon_idx),
        Column::new("parcelle".into(), parcelle),
    ])
    .context("failed to build parcel table")?;
    Ok(Some(df))
}

/// Write the parcel table to a CSV file.
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create CSV file: {}", path.display()))?;
    CsvWriter::new(file)
        .finish(df)
        .with_context(|| format!("failed to write CSV to {}", path.display()))
}

/// Write the parcel table to a CSV string, for printing to a terminal.
pub fn to_csv_string(df: &mut DataFrame) -> Result<String> {
    let mut buffer = Vec::new();
    CsvWriter::new(&mut buffer)
        .finish(df)
        .context("failed to write CSV to string")?;
    String::from_utf8(buffer).context("CSV output is not valid UTF-8")
}

/// Parcel identifiers are usually strings, but some datasets carry numeric
/// ids; both render as their plain text form.
fn parcel_id(entry: &Value) -> String {
    match entry {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{LineString, MultiPolygon, Polygon};
    use serde_json::{json, Map};

    fn dataset(parcel_lists: &[Option<Value>]) -> ParcelCollection {
        let shape = MultiPolygon(vec![Polygon::new(
            LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]),
            vec![],
        )]);
        let shapes = parcel_lists.iter().map(|_| shape.clone()).collect();
        let properties = parcel_lists
            .iter()
            .map(|list| {
                let mut props = Map::new();
                if let Some(value) = list {
                    props.insert(PARCELS_COLUMN.to_string(), value.clone());
                }
                props
            })
            .collect();
        ParcelCollection::new(shapes, properties).unwrap()
    }

    #[test]
    fn absent_column_yields_none() {
        let collection = dataset(&[None, None]);
        assert!(explode_parcels(&collection).unwrap().is_none());
    }

    #[test]
    fn one_row_per_polygon_parcel_pair() {
        let collection = dataset(&[
            Some(json!(["A-1", "A-2"])),
            None,
            Some(json!(["B-1"])),
        ]);
        let df = explode_parcels(&collection).unwrap().unwrap();
        assert_eq!(df.height(), 3);

        let polygons: Vec<u32> = df.column("polygon").unwrap().u32().unwrap()
            .into_no_null_iter().collect();
        assert_eq!(polygons, vec![0, 0, 2]);

        let parcels: Vec<&str> = df.column("parcelle").unwrap().str().unwrap()
            .into_no_null_iter().collect();
        assert_eq!(parcels, vec!["A-1", "A-2", "B-1"]);
    }

    #[test]
    fn numeric_parcel_ids_render_as_text() {
        let collection = dataset(&[Some(json!([1042, "Z-9"]))]);
        let df = explode_parcels(&collection).unwrap().unwrap();
        let parcels: Vec<&str> = df.column("parcelle").unwrap().str().unwrap()
            .into_no_null_iter().collect();
        assert_eq!(parcels, vec!["1042", "Z-9"]);
    }

    #[test]
    fn empty_lists_produce_empty_frame() {
        let collection = dataset(&[Some(json!([]))]);
        let df = explode_parcels(&collection).unwrap().unwrap();
        assert_eq!(df.height(), 0);
    }
}
