use crate::catalog::Catalog;
use crate::cli::app::App;
use crate::cli::{parse_kinds, SearchArgs};
use crate::formatter::Format;
use crate::search::SearchFilter;
use anyhow::Result;

/// Handle search command - rank catalog items for a query
pub fn handle(cmd: &SearchArgs, app: &App) -> Result<()> {
    let kinds = parse_kinds(&cmd.kinds)?;
    let context = cmd.context.as_deref().map(|id| app.item(id)).transpose()?;

    let mut filter = SearchFilter::new();
    if let Some(kinds) = &kinds {
        filter = filter.kinds(kinds);
    }
    if let Some(context) = context {
        filter = filter.context(context);
    }

    let mut results = app.engine.search(&cmd.query, app.catalog.candidates(), filter);
    results.retain(|r| r.score >= cmd.format.min_score);

    let formatter = Format::from_string(&cmd.format.format);
    formatter.format_search_results(&cmd.query, &results, cmd.format.limit)?;

    Ok(())
}
