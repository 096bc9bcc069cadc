use std::{fs, path::{Path, PathBuf}};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// One dataset category: a display name bound to exactly one source file and
/// one surface-attribute column. Both bindings are fixed at configuration
/// time; the surface column name varies per category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub path: PathBuf,
    pub surface_column: String,
}

/// The full category→dataset mapping, passed explicitly into the pipeline
/// instead of living in ambient state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    categories: Vec<Category>,
}

impl Catalog {
    pub fn new(categories: Vec<Category>) -> Result<Self> {
        for (idx, category) in categories.iter().enumerate() {
            if categories[..idx].iter().any(|other| other.name == category.name) {
                bail!("duplicate category name: {}", category.name);
            }
        }
        Ok(Self { categories })
    }

    /// Load a catalog from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)
            .with_context(|| format!("failed to read catalog file: {}", path.display()))?;
        let categories: Vec<Category> = serde_json::from_slice(&bytes)
            .with_context(|| format!("invalid catalog file: {}", path.display()))?;
        Self::new(categories)
    }

    /// The reference deployment: three categories under `base_dir`, each with
    /// its own surface column.
    pub fn reference(base_dir: &Path) -> Self {
        let category = |name: &str, file: &str, surface_column: &str| Category {
            name: name.to_string(),
            path: base_dir.join("data").join(file),
            surface_column: surface_column.to_string(),
        };
        Self {
            categories: vec![
                category("categorie_1", "Allongement_suite_agreg_C_1_test.geojson", "surf_poly_agreg"),
                category("categorie_2", "Allongement_suite_agreg_C_2_test.geojson", "surf_agreg_c_2"),
                category("categorie_3", "Allongement_suite_agreg_C_3_test.geojson", "surf_poly_agreg_c3"),
            ],
        }
    }

    #[inline] pub fn categories(&self) -> &[Category] { &self.categories }

    pub fn get(&self, name: &str) -> Result<&Category> {
        self.categories.iter().find(|c| c.name == name).ok_or_else(|| {
            let known: Vec<&str> = self.categories.iter().map(|c| c.name.as_str()).collect();
            anyhow::anyhow!("unknown category {name:?}, expected one of {known:?}")
        })
    }
}
