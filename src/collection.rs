use anyhow::{bail, Result};
use geo::{BoundingRect, MultiPolygon};
use serde_json::{Map, Value};

/// Min/max of a numeric attribute column, used to seed slider bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnStats {
    pub min: f64,
    pub max: f64,
}

/// An in-memory dataset of polygon records: one multipolygon shape plus one
/// property map per record, kept in parallel vectors. Record identity is the
/// positional index; there is no persistent key.
#[derive(Debug, Clone, Default)]
pub struct ParcelCollection {
    shapes: Vec<MultiPolygon<f64>>,
    properties: Vec<Map<String, Value>>,
}

impl ParcelCollection {
    pub fn new(shapes: Vec<MultiPolygon<f64>>, properties: Vec<Map<String, Value>>) -> Result<Self> {
        if shapes.len() != properties.len() {
            bail!(
                "[collection] length mismatch: {} shapes for {} property maps",
                shapes.len(),
                properties.len(),
            );
        }
        Ok(Self { shapes, properties })
    }

    /// Number of records.
    #[inline] pub fn len(&self) -> usize { self.shapes.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.shapes.is_empty() }

    /// Read-only view of record geometries, indexed by record.
    #[inline] pub fn shapes(&self) -> &[MultiPolygon<f64>] { &self.shapes }

    /// Read-only view of record property maps, indexed by record.
    #[inline] pub fn properties(&self) -> &[Map<String, Value>] { &self.properties }

    /// True if any record carries the named attribute. Mirrors a tabular
    /// "column exists" check: the column set is the union over all records.
    pub fn has_column(&self, name: &str) -> bool {
        self.properties.iter().any(|props| props.contains_key(name))
    }

    /// Numeric value of `name` for record `idx`, or `None` if the attribute
    /// is absent or not a number.
    pub fn numeric(&self, idx: usize, name: &str) -> Option<f64> {
        self.properties.get(idx)?.get(name)?.as_f64()
    }

    /// Min/max over the named column, skipping records where it is absent or
    /// non-numeric. `None` when no record has a numeric value.
    pub fn column_stats(&self, name: &str) -> Option<ColumnStats> {
        let mut stats: Option<ColumnStats> = None;
        for idx in 0..self.len() {
            if let Some(value) = self.numeric(idx, name) {
                stats = Some(match stats {
                    None => ColumnStats { min: value, max: value },
                    Some(s) => ColumnStats { min: s.min.min(value), max: s.max.max(value) },
                });
            }
        }
        stats
    }

    /// Total bounds of all shapes as [min_x, min_y, max_x, max_y],
    /// or `None` for an empty collection.
    pub fn bounds(&self) -> Option<[f64; 4]> {
        let mut bounds: Option<[f64; 4]> = None;
        for shape in &self.shapes {
            if let Some(rect) = shape.bounding_rect() {
                let (min, max) = (rect.min(), rect.max());
                bounds = Some(match bounds {
                    None => [min.x, min.y, max.x, max.y],
                    Some([x0, y0, x1, y1]) => {
                        [x0.min(min.x), y0.min(min.y), x1.max(max.x), y1.max(max.y)]
                    }
                });
            }
        }
        bounds
    }

    /// New collection holding clones of the records at `indices`, in the
    /// order given. Callers pass indices in ascending order to preserve the
    /// original record order.
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            shapes: indices.iter().map(|&i| self.shapes[i].clone()).collect(),
            properties: indices.iter().map(|&i| self.properties[i].clone()).collect(),
        }
    }
}
