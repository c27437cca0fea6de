use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// dorank - launcher relevance search with learned usage bias
#[derive(Parser, Debug)]
#[command(name = "dorank")]
#[command(author = "dorank Team")]
#[command(version = "0.1.0")]
#[command(about = "Launcher relevance search that learns from your choices", long_about = None)]
pub struct Cli {
    /// Configuration file (default: ~/.config/dorank/config.yaml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Catalog file, replacing `catalog_path` from the configuration
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

// CLI submodule declarations
pub mod app;
pub mod cleanup;
pub mod items;
pub mod report;
pub mod search;
pub mod status;

#[derive(Debug, Clone, Args)]
pub struct FormatOptions {
    /// Output format: cli, json, md, csv, ids
    #[arg(long, default_value = "cli")]
    pub format: String,
    /// Number of results to return
    #[arg(short, long, default_value = "20")]
    pub limit: usize,
    /// Minimum score threshold
    #[arg(long, default_value = "0.0")]
    pub min_score: f64,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rank catalog items for a query
    Search(SearchArgs),

    /// Record that an item was chosen for a query
    Select(ReportArgs),

    /// Record that an item was skipped for a query
    Reject(ReportArgs),

    /// List catalog items
    Items(ItemsArgs),

    /// Show catalog and relevance store status
    Status(StatusArgs),

    /// Remove stale relevance records
    Cleanup(CleanupArgs),
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search query; empty lists everything
    #[arg(default_value = "")]
    pub query: String,
    /// Only rank items of these kinds (repeatable)
    #[arg(short, long = "kind")]
    pub kinds: Vec<String>,
    /// ID of the item the results must be able to act on
    #[arg(long)]
    pub context: Option<String>,
    #[command(flatten)]
    pub format: FormatOptions,
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Item ID
    pub id: String,
    /// Query the item was ranked for
    #[arg(default_value = "")]
    pub query: String,
}

#[derive(Args, Debug)]
pub struct ItemsArgs {
    /// Only list items of these kinds (repeatable)
    #[arg(short, long = "kind")]
    pub kinds: Vec<String>,
    /// Output format: cli, json, md, csv, ids
    #[arg(long, default_value = "cli")]
    pub format: String,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// List learned relevance records
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Args, Debug)]
pub struct CleanupArgs {
    /// Dry run only
    #[arg(long)]
    pub dry_run: bool,
    /// Remove records not updated for N days
    #[arg(long, default_value = "90")]
    pub older_than: u32,
    /// Remove every record
    #[arg(long)]
    pub all: bool,
}

/// Parse repeated `--kind` values into a set; empty input means no filter
pub fn parse_kinds(kinds: &[String]) -> anyhow::Result<Option<crate::catalog::KindSet>> {
    if kinds.is_empty() {
        return Ok(None);
    }
    let mut set = crate::catalog::KindSet::new();
    for kind in kinds.iter().flat_map(|k| k.split(',')) {
        set.insert(kind.parse().map_err(anyhow::Error::msg)?);
    }
    Ok(Some(set))
}
