#![doc = "Parcelscope public API"]
pub mod catalog;
pub mod cli;
pub mod collection;
pub mod commands;
pub mod filter;
pub mod io;
pub mod pipeline;
pub mod proj;
pub mod table;

#[doc(inline)]
pub use catalog::{Catalog, Category};

#[doc(inline)]
pub use collection::{ColumnStats, ParcelCollection};

#[doc(inline)]
pub use filter::{FilterCriteria, ELONGATION_COLUMN};

#[doc(inline)]
pub use pipeline::{recompute, PipelineOutput};
