use crate::cli::app::App;
use crate::cli::CleanupArgs;
use anyhow::Result;
use chrono::{Duration, Utc};

/// Handle cleanup command - remove stale relevance records
pub fn handle(cmd: &CleanupArgs, app: &App) -> Result<()> {
    let Some(store) = &app.store else {
        println!("Relevance store disabled, nothing to clean");
        return Ok(());
    };

    let cutoff = Utc::now() - Duration::days(i64::from(cmd.older_than));
    let stale: Vec<_> = store
        .entries()?
        .into_iter()
        .filter(|entry| cmd.all || entry.updated_at < cutoff)
        .collect();

    if stale.is_empty() {
        println!("No stale entries found");
        return Ok(());
    }

    println!("Found {} stale entries", stale.len());

    if cmd.dry_run {
        println!("\nDry run - no changes made");
        return Ok(());
    }

    let removed = if cmd.all {
        store.clear()?
    } else {
        store.remove_stale(cutoff)?
    };

    println!("Cleanup completed: {} entries removed", removed);

    Ok(())
}
