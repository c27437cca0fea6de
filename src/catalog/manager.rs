// Static catalog loaded from YAML

use crate::catalog::types::{Candidate, ItemKind, KindSet, Searchable};
use crate::error::{RankError, Result};
use log::info;
use std::collections::HashSet;
use std::path::Path;

/// Source of candidates for a search
pub trait Catalog {
    fn candidates(&self) -> &[Candidate];

    fn find(&self, id: &str) -> Option<&Candidate> {
        self.candidates().iter().find(|c| c.id == id)
    }
}

/// Catalog held in memory, in declaration order
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    items: Vec<Candidate>,
}

impl StaticCatalog {
    /// Build a catalog, deriving missing ids and rejecting duplicates
    pub fn new(items: Vec<Candidate>) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut catalog = Vec::with_capacity(items.len());

        for mut item in items {
            if item.id.trim().is_empty() {
                item.id = item.derived_id();
            }
            if !seen.insert(item.id.clone()) {
                return Err(RankError::DuplicateId(item.id));
            }
            catalog.push(item);
        }

        Ok(Self { items: catalog })
    }

    /// Parse a YAML list of candidates
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let items: Vec<Candidate> = serde_yaml::from_str(content)?;
        Self::new(items)
    }

    /// Load a YAML catalog file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_yaml(&content)
            .map_err(|e| RankError::InvalidCatalog(format!("{}: {}", path.display(), e)))?;
        info!("Loaded {} catalog items from {:?}", catalog.len(), path);
        Ok(catalog)
    }

    /// Append another catalog's items, keeping ids unique
    pub fn extend(&mut self, other: StaticCatalog) -> Result<()> {
        let mut items = std::mem::take(&mut self.items);
        items.extend(other.items);
        *self = Self::new(items)?;
        Ok(())
    }

    /// Candidates of the given kinds, in catalog order
    pub fn of_kinds(&self, kinds: &KindSet) -> Vec<&Candidate> {
        self.items
            .iter()
            .filter(|c| kinds.contains(&c.kind()))
            .collect()
    }

    pub fn count_kind(&self, kind: ItemKind) -> usize {
        self.items.iter().filter(|c| c.kind == kind).count()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Catalog for StaticCatalog {
    fn candidates(&self) -> &[Candidate] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"
- id: firefox
  name: Firefox
  description: Web Browser
  kind: application
- name: Send Email
  kind: action
  requires: [contact]
- name: Documents
  kind: folder
"#;

    #[test]
    fn test_from_yaml_keeps_order() {
        let catalog = StaticCatalog::from_yaml(CATALOG).unwrap();
        let names: Vec<&str> = catalog.candidates().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Firefox", "Send Email", "Documents"]);
    }

    #[test]
    fn test_from_yaml_derives_missing_ids() {
        let catalog = StaticCatalog::from_yaml(CATALOG).unwrap();
        assert_eq!(catalog.candidates()[0].id, "firefox");
        assert_eq!(catalog.candidates()[1].id.len(), 64);
    }

    #[test]
    fn test_find_by_id() {
        let catalog = StaticCatalog::from_yaml(CATALOG).unwrap();
        assert_eq!(catalog.find("firefox").unwrap().name, "Firefox");
        assert!(catalog.find("missing").is_none());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let items = vec![
            Candidate::text("same").with_id("x"),
            Candidate::text("other").with_id("x"),
        ];
        assert!(matches!(StaticCatalog::new(items), Err(RankError::DuplicateId(id)) if id == "x"));
    }

    #[test]
    fn test_empty_yaml() {
        let catalog = StaticCatalog::from_yaml("   \n").unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_of_kinds() {
        let catalog = StaticCatalog::from_yaml(CATALOG).unwrap();
        let kinds: KindSet = [ItemKind::Folder, ItemKind::Application].into_iter().collect();
        let selected = catalog.of_kinds(&kinds);
        assert_eq!(selected.len(), 2);
        assert_eq!(catalog.count_kind(ItemKind::Action), 1);
    }

    #[test]
    fn test_extend_rejects_duplicates() {
        let mut catalog = StaticCatalog::from_yaml(CATALOG).unwrap();
        let other = StaticCatalog::new(vec![Candidate::text("Firefox").with_id("firefox")]).unwrap();
        assert!(catalog.extend(other).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(StaticCatalog::load(tmp.path().join("missing.yaml")).is_err());
    }
}
