// End-to-end pipeline tests: load -> reproject -> filter -> serialize over
// GeoJSON fixtures written to a temp directory.

use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use tempfile::TempDir;

use parcelscope::catalog::{Catalog, Category};
use parcelscope::filter::FilterCriteria;
use parcelscope::io::geojson;
use parcelscope::pipeline::recompute;
use parcelscope::table;

/// A 100 m square in Lambert-93 near the projection's false origin.
fn square_lambert93(offset_m: f64) -> Value {
    let x = 650_000.0 + offset_m;
    let y = 6_860_000.0;
    json!([[
        [x, y],
        [x + 100.0, y],
        [x + 100.0, y + 100.0],
        [x, y + 100.0],
        [x, y],
    ]])
}

/// Ten polygons with elongation_index 1.0, 1.2, .., 2.8. Even-indexed records
/// carry a surface value and a constituent-parcel list.
fn write_fixture(dir: &Path, with_surface: bool) -> PathBuf {
    let features: Vec<Value> = (0..10)
        .map(|i| {
            let mut properties = json!({
                "elongation_index": 1.0 + 0.2 * i as f64,
            });
            if with_surface {
                properties["surf_poly_agreg"] = json!(100.0 * (i + 1) as f64);
            }
            if i % 2 == 0 {
                properties["parcelles_composantes"] = json!([
                    format!("P-{i}-a"),
                    format!("P-{i}-b"),
                ]);
            }
            json!({
                "type": "Feature",
                "geometry": { "type": "Polygon", "coordinates": square_lambert93(i as f64 * 200.0) },
                "properties": properties,
            })
        })
        .collect();

    let path = dir.join(if with_surface { "with_surface.geojson" } else { "no_surface.geojson" });
    std::fs::write(
        &path,
        serde_json::to_vec(&json!({ "type": "FeatureCollection", "features": features })).unwrap(),
    )
    .unwrap();
    path
}

fn category(dir: &Path, with_surface: bool) -> Category {
    Category {
        name: "test".to_string(),
        path: write_fixture(dir, with_surface),
        surface_column: "surf_poly_agreg".to_string(),
    }
}

#[test]
fn elongation_threshold_scenario() {
    let dir = TempDir::new().unwrap();
    let category = category(dir.path(), true);
    let criteria = FilterCriteria { elongation_min: Some(1.5), surface_min: None };

    let output = recompute(&category, &criteria).unwrap();
    assert_eq!(output.count, 7);

    // Original order is preserved: elongation values come back ascending.
    let values: Vec<f64> = (0..output.count)
        .map(|i| output.collection.numeric(i, "elongation_index").unwrap())
        .collect();
    let mut sorted = values.clone();
    sorted.sort_by(f64::total_cmp);
    assert_eq!(values, sorted);
    assert!(values.iter().all(|&v| v >= 1.5));
}

#[test]
fn surface_and_elongation_are_anded() {
    let dir = TempDir::new().unwrap();
    let category = category(dir.path(), true);
    let criteria = FilterCriteria { elongation_min: Some(1.5), surface_min: Some(850.0) };

    let output = recompute(&category, &criteria).unwrap();
    assert!(output.surface_filter_active);
    // Surface >= 850 keeps records 8 and 9; both also pass elongation >= 1.5.
    assert_eq!(output.count, 2);
    for i in 0..output.count {
        assert!(output.collection.numeric(i, "elongation_index").unwrap() >= 1.5);
        assert!(output.collection.numeric(i, "surf_poly_agreg").unwrap() >= 850.0);
    }
}

#[test]
fn missing_surface_column_degrades_gracefully() {
    let dir = TempDir::new().unwrap();
    let category = category(dir.path(), false);
    let criteria = FilterCriteria { elongation_min: Some(1.5), surface_min: Some(850.0) };

    let output = recompute(&category, &criteria).unwrap();
    assert!(!output.surface_filter_active);
    assert_eq!(output.count, 7);
}

#[test]
fn recompute_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let category = category(dir.path(), true);
    let criteria = FilterCriteria { elongation_min: Some(1.3), surface_min: Some(200.0) };

    let first = recompute(&category, &criteria).unwrap();
    let second = recompute(&category, &criteria).unwrap();
    assert_eq!(first.count, second.count);
    assert_eq!(first.bounds, second.bounds);
    assert_eq!(first.geojson, second.geojson);
}

#[test]
fn record_count_is_monotone_in_threshold() {
    let dir = TempDir::new().unwrap();
    let category = category(dir.path(), true);

    let mut previous = usize::MAX;
    for step in 0..12 {
        let criteria = FilterCriteria {
            elongation_min: Some(0.8 + 0.2 * step as f64),
            surface_min: None,
        };
        let count = recompute(&category, &criteria).unwrap().count;
        assert!(count <= previous);
        previous = count;
    }
    assert_eq!(previous, 0);
}

#[test]
fn empty_result_is_a_valid_outcome() {
    let dir = TempDir::new().unwrap();
    let category = category(dir.path(), true);
    let criteria = FilterCriteria { elongation_min: Some(100.0), surface_min: None };

    let output = recompute(&category, &criteria).unwrap();
    assert_eq!(output.count, 0);
    assert!(output.bounds.is_none());
    assert_eq!(output.geojson["features"].as_array().unwrap().len(), 0);
    assert!(table::explode_parcels(&output.collection).unwrap().is_none());
}

#[test]
fn serialized_output_reparses_within_tolerance() {
    let dir = TempDir::new().unwrap();
    let category = category(dir.path(), true);
    let output = recompute(&category, &FilterCriteria::default()).unwrap();

    let bytes = serde_json::to_vec(&output.geojson).unwrap();
    let reparsed = geojson::read_from_bytes(&bytes).unwrap();
    assert_eq!(reparsed.len(), output.collection.len());
    assert_eq!(reparsed.properties(), output.collection.properties());

    for (a, b) in reparsed.shapes().iter().zip(output.collection.shapes()) {
        let coords_a: Vec<_> = a.0.iter().flat_map(|p| p.exterior().coords()).collect();
        let coords_b: Vec<_> = b.0.iter().flat_map(|p| p.exterior().coords()).collect();
        assert_eq!(coords_a.len(), coords_b.len());
        for (ca, cb) in coords_a.iter().zip(&coords_b) {
            assert!((ca.x - cb.x).abs() < 1e-9);
            assert!((ca.y - cb.y).abs() < 1e-9);
        }
    }
}

#[test]
fn reprojected_bounds_are_in_wgs84_range() {
    let dir = TempDir::new().unwrap();
    let category = category(dir.path(), true);
    let output = recompute(&category, &FilterCriteria::default()).unwrap();

    let [min_lon, min_lat, max_lon, max_lat] = output.bounds.unwrap();
    assert!(min_lon > -6.0 && max_lon < 10.0);
    assert!(min_lat > 41.0 && max_lat < 52.0);
    assert!(min_lon < max_lon && min_lat < max_lat);
}

#[test]
fn parcel_table_follows_the_filter() {
    let dir = TempDir::new().unwrap();
    let category = category(dir.path(), true);
    let criteria = FilterCriteria { elongation_min: Some(1.5), surface_min: None };

    let output = recompute(&category, &criteria).unwrap();
    let df = table::explode_parcels(&output.collection).unwrap().unwrap();
    // Survivors are records 3..=9; the even ones (4, 6, 8) carry two parcels each.
    assert_eq!(df.height(), 6);
}

#[test]
fn missing_file_is_a_fatal_error() {
    let category = Category {
        name: "ghost".to_string(),
        path: PathBuf::from("/nonexistent/dataset.geojson"),
        surface_column: "surf_poly_agreg".to_string(),
    };
    let err = recompute(&category, &FilterCriteria::default()).unwrap_err();
    assert!(err.to_string().contains("ghost"));
}

#[test]
fn catalog_round_trip_from_json_file() {
    let dir = TempDir::new().unwrap();
    let data_path = write_fixture(dir.path(), true);
    let catalog_path = dir.path().join("catalog.json");
    std::fs::write(
        &catalog_path,
        serde_json::to_vec(&json!([
            { "name": "c1", "path": data_path, "surface_column": "surf_poly_agreg" },
        ]))
        .unwrap(),
    )
    .unwrap();

    let catalog = Catalog::from_path(&catalog_path).unwrap();
    let category = catalog.get("c1").unwrap();
    let output = recompute(category, &FilterCriteria::default()).unwrap();
    assert_eq!(output.count, 10);
    assert!(catalog.get("c9").is_err());
}
