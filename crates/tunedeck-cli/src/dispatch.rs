use anyhow::Result;
use comfy_table::{Cell, ContentArrangement, Table};
use tunedeck_app::{App, SettingRow, SuggestOutcome};
use tunedeck_core::suggest::SuggestionMode;

use crate::cli::{Cli, Command};

pub fn run_with_deps(cli: Cli, app: &App<'_>) -> Result<()> {
    match cli.command {
        Some(Command::Show) => run_show_command(app),
        Some(Command::Suggest { query }) => run_suggest_command(app, &query),
        None => run_root_command(app),
    }
}

fn run_root_command(app: &App<'_>) -> Result<()> {
    let exit = tunedeck_tui::run_editor(app)?;
    tracing::debug!(?exit, "editor closed");
    Ok(())
}

fn run_show_command(app: &App<'_>) -> Result<()> {
    let rows = app.settings_rows()?;
    print_settings_table(&rows);
    Ok(())
}

fn run_suggest_command(app: &App<'_>, raw: &str) -> Result<()> {
    let outcome = app.suggest_once(raw)?;
    print_suggestions(raw, &outcome, app.config.search.tag_marker);
    Ok(())
}

fn print_settings_table(rows: &[SettingRow]) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Key", "Value", "Source"]);

    for row in rows {
        table.add_row(vec![
            Cell::new(row.key.as_str()),
            Cell::new(row.value.as_str()),
            Cell::new(row.source.label()),
        ]);
    }

    println!("{table}");
}

fn print_suggestions(raw: &str, outcome: &SuggestOutcome, tag_marker: char) {
    if outcome.candidates.is_empty() {
        println!("No suggestions for '{raw}'");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Id", "Label"]);

    for (index, candidate) in outcome.candidates.iter().enumerate() {
        let id = candidate
            .id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        let label = match outcome.query.mode {
            SuggestionMode::Tag => format!("{tag_marker}{}", candidate.label),
            _ => candidate.label.clone(),
        };
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(id),
            Cell::new(label),
        ]);
    }

    println!("{table}");
}
