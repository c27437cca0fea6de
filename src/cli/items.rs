use crate::catalog::{Candidate, Catalog};
use crate::cli::app::App;
use crate::cli::{parse_kinds, ItemsArgs};
use crate::formatter::Format;
use anyhow::Result;

/// Handle items command - list the catalog
pub fn handle(cmd: &ItemsArgs, app: &App) -> Result<()> {
    let items: Vec<&Candidate> = match parse_kinds(&cmd.kinds)? {
        Some(kinds) => app.catalog.of_kinds(&kinds),
        None => app.catalog.candidates().iter().collect(),
    };

    let formatter = Format::from_string(&cmd.format);
    print!("{}", formatter.render_items(&items)?);

    Ok(())
}
