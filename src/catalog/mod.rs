// Candidate catalog
// Items and actions the engine ranks, plus the static YAML-backed catalog

pub mod manager;
pub mod types;

pub use manager::{Catalog, StaticCatalog};
pub use types::{Candidate, ItemKind, KindSet, Searchable};
