use crate::cli::app::App;
use crate::cli::ReportArgs;
use crate::relevance::normalize_query;
use anyhow::Result;

/// Handle select command - reinforce an item for a query
pub fn handle_select(cmd: &ReportArgs, app: &App) -> Result<()> {
    let item = app.item(&cmd.id)?;
    app.engine.report_selected(item, &cmd.query)?;
    print_outcome("Selected", cmd, app)
}

/// Handle reject command - weaken an item for a query
pub fn handle_reject(cmd: &ReportArgs, app: &App) -> Result<()> {
    let item = app.item(&cmd.id)?;
    app.engine.report_rejected(item, &cmd.query)?;
    print_outcome("Rejected", cmd, app)
}

fn print_outcome(action: &str, cmd: &ReportArgs, app: &App) -> Result<()> {
    if app.store.is_none() {
        println!("Relevance store disabled, nothing recorded");
        return Ok(());
    }

    let item = app.item(&cmd.id)?;
    let bias = app.engine.relevance().bias(item, &cmd.query)?;
    println!(
        "{} {} for {:?} (bias {:.2})",
        action,
        item.id,
        normalize_query(&cmd.query),
        bias
    );
    Ok(())
}
