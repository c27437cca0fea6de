use crate::catalog::ItemKind;
use crate::cli::app::App;
use crate::cli::StatusArgs;
use crate::config::StoreBackend;
use crate::relevance::parse_key;
use anyhow::Result;

/// Handle status command - show catalog and store status
pub fn handle(cmd: &StatusArgs, app: &App) -> Result<()> {
    println!("dorank Status");
    println!("{}", "=".repeat(50));

    println!("\nCatalog items: {}", app.catalog.len());
    for kind in ItemKind::ALL {
        let count = app.catalog.count_kind(kind);
        if count > 0 {
            println!("  {}: {}", kind, count);
        }
    }

    let ranking = &app.config.ranking;
    println!(
        "\nRanking: bias_weight {}, bias_softness {}, item_weight {}, match_description {}",
        ranking.bias_weight, ranking.bias_softness, ranking.item_weight, ranking.match_description
    );

    let Some(store) = &app.store else {
        println!("\nRelevance store: disabled");
        return Ok(());
    };

    match app.config.store.backend {
        StoreBackend::Sqlite => println!("\nRelevance store: sqlite ({})", app.config.store_path().display()),
        StoreBackend::Memory => println!("\nRelevance store: memory"),
        StoreBackend::None => println!("\nRelevance store: disabled"),
    }

    let entries = store.entries()?;
    println!("Records: {}", entries.len());

    if cmd.verbose && !entries.is_empty() {
        println!("\nLearned relevance:");
        for entry in &entries {
            let label = match parse_key(&entry.key) {
                Some((id, Some(query))) => format!("{} for {:?}", id, query),
                Some((id, None)) => format!("{} (any query)", id),
                None => entry.key.clone(),
            };
            println!(
                "  {:>6.1}  {}  [{}]",
                entry.value,
                label,
                entry.updated_at.format("%Y-%m-%d %H:%M")
            );
        }
    }

    Ok(())
}
