// Wiring shared by the CLI commands

use crate::catalog::{Candidate, Catalog, StaticCatalog};
use crate::config::Config;
use crate::search::SearchEngine;
use crate::store::{self, RelevanceStore};
use anyhow::{Context, Result};
use log::info;
use std::path::Path;
use std::sync::Arc;

/// Configuration, catalog, store and engine for one CLI invocation
pub struct App {
    pub config: Config,
    pub catalog: StaticCatalog,
    pub store: Option<Arc<dyn RelevanceStore>>,
    pub engine: SearchEngine,
}

impl App {
    /// Build from a loaded configuration; `catalog_override` replaces `catalog_path`
    pub fn new(config: Config, catalog_override: Option<&Path>) -> Result<Self> {
        let catalog = load_catalog(&config, catalog_override)?;
        let store = store::open(&config).context("Failed to open relevance store")?;
        let engine = SearchEngine::new(store.clone(), config.ranking)
            .context("Invalid ranking configuration")?;

        Ok(Self {
            config,
            catalog,
            store,
            engine,
        })
    }

    /// Look up a catalog item by ID
    pub fn item(&self, id: &str) -> Result<&Candidate> {
        self.catalog
            .find(id)
            .with_context(|| format!("No catalog item with id '{}'", id))
    }
}

/// Inline candidates first, then the catalog file
fn load_catalog(config: &Config, catalog_override: Option<&Path>) -> Result<StaticCatalog> {
    let mut catalog = StaticCatalog::new(config.catalog.clone())
        .context("Invalid inline catalog")?;

    let path = catalog_override.or(config.catalog_path.as_deref());
    if let Some(path) = path {
        if path.exists() || catalog_override.is_some() {
            let from_file = StaticCatalog::load(path)
                .with_context(|| format!("Failed to load catalog: {}", path.display()))?;
            catalog.extend(from_file)?;
        } else {
            info!("Catalog file {:?} not found, using inline items only", path);
        }
    }

    Ok(catalog)
}
