#![allow(dead_code)]

use dorank::catalog::{Candidate, ItemKind};
use dorank::config::{Config, StoreBackend, StoreConfig};
use std::path::Path;

/// Config whose cache (and SQLite store) lives under `cache_dir`.
pub fn create_test_config(cache_dir: &Path) -> Config {
    Config {
        store: StoreConfig {
            backend: StoreBackend::Sqlite,
            path: None,
        },
        cache_path: cache_dir.to_path_buf(),
        ..Config::default()
    }
}

/// A small launcher catalog with stable ids.
pub fn sample_catalog() -> Vec<Candidate> {
    vec![
        Candidate::new(ItemKind::Application, "Firefox", "Web Browser").with_id("firefox"),
        Candidate::new(ItemKind::Application, "Files", "Browse the file system").with_id("files"),
        Candidate::new(ItemKind::Application, "Terminal", "Use the command line").with_id("terminal"),
        Candidate::new(ItemKind::Folder, "Documents", "~/Documents").with_id("documents"),
        Candidate::new(ItemKind::File, "report.pdf", "~/Documents/report.pdf").with_id("report"),
        Candidate::new(ItemKind::Action, "Open", "Open an item")
            .with_id("open")
            .requiring([ItemKind::File, ItemKind::Folder, ItemKind::Url]),
        Candidate::new(ItemKind::Action, "Open With Firefox", "Open a link in Firefox")
            .with_id("open-firefox")
            .requiring([ItemKind::Url]),
        Candidate::new(ItemKind::Action, "Copy To Clipboard", "Copy the text")
            .with_id("copy")
            .requiring([ItemKind::Text]),
    ]
}

/// Write a YAML config with an inline catalog and the given store backend.
/// Returns the config file path.
pub fn write_cli_config(dir: &Path, backend: &str) -> std::path::PathBuf {
    let config_path = dir.join("config.yaml");
    let content = format!(
        r#"cache_path: {cache}
store:
  backend: {backend}
catalog:
  - id: firefox
    name: Firefox
    description: Web Browser
    kind: application
  - id: files
    name: Files
    description: Browse the file system
    kind: application
  - id: fire-alarm
    name: Fire Alarm
    kind: application
  - id: documents
    name: Documents
    kind: folder
  - id: open
    name: Open
    kind: action
    requires: [file, folder]
"#,
        cache = dir.join("cache").display(),
        backend = backend,
    );
    std::fs::write(&config_path, content).unwrap();
    config_path
}
