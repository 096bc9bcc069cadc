use crate::collection::ParcelCollection;

/// Attribute every dataset is expected to carry.
pub const ELONGATION_COLUMN: &str = "elongation_index";

/// Inclusive lower bounds on record attributes. `None` means the predicate
/// is not applied.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FilterCriteria {
    pub elongation_min: Option<f64>,
    pub surface_min: Option<f64>,
}

/// Result of a filter pass. `surface_filter_active` is false when a surface
/// bound was requested but the dataset lacks the surface column, so the
/// caller can tell the user filtering was unavailable rather than applied.
#[derive(Debug)]
pub struct FilterOutcome {
    pub collection: ParcelCollection,
    pub surface_filter_active: bool,
}

/// Retain records meeting all active bounds, preserving record order.
///
/// A record whose bounded attribute is missing or non-numeric cannot satisfy
/// an inclusive `>=` and is dropped. The surface bound only participates if
/// the dataset actually has `surface_column`; otherwise it is skipped
/// entirely, which is a recognized state and not an error.
pub fn apply(
    collection: &ParcelCollection,
    surface_column: &str,
    criteria: &FilterCriteria,
) -> FilterOutcome {
    let surface_bound = criteria
        .surface_min
        .filter(|_| collection.has_column(surface_column));
    let surface_filter_active = surface_bound.is_some();

    let indices: Vec<usize> = (0..collection.len())
        .filter(|&idx| {
            if let Some(bound) = criteria.elongation_min {
                let passes = collection
                    .numeric(idx, ELONGATION_COLUMN)
                    .is_some_and(|value| value >= bound);
                if !passes { return false }
            }
            if let Some(bound) = surface_bound {
                let passes = collection
                    .numeric(idx, surface_column)
                    .is_some_and(|value| value >= bound);
                if !passes { return false }
            }
            true
        })
        .collect();

    FilterOutcome {
        collection: collection.select(&indices),
        surface_filter_active,
    }
}
