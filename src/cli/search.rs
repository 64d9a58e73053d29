use crate::cli::ui::{self, StyleType};
use crate::core::{Action, Asset, AssetDirectory, Effect, Session};
use comfy_table::Table;
use std::time::{Duration, Instant};

/// Runs `query` through the session's debounce and returns the matches.
///
/// The terminal receives the whole query at once, so the clock is advanced
/// straight to the end of the quiet period.
pub fn debounced_search<'a>(
    directory: &'a AssetDirectory,
    query: &str,
    debounce: Duration,
) -> Vec<&'a Asset> {
    let now = Instant::now();
    let (session, _) = Session::new(debounce).reduce(Action::QueryChanged {
        query: query.to_string(),
        at: now,
    });
    let deadline = session.search_deadline().unwrap_or(now);
    match session.reduce(Action::Tick { now: deadline }) {
        (_, Some(Effect::Search(query))) => directory.search(&query),
        _ => Vec::new(),
    }
}

pub fn render_assets(assets: &[&Asset]) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Id"),
        ui::header_cell("Symbol"),
        ui::header_cell("Name"),
    ]);
    for asset in assets {
        table.add_row(vec![
            asset.id.clone(),
            asset.symbol.to_uppercase(),
            asset.name.clone(),
        ]);
    }
    table
}

pub fn run(directory: &AssetDirectory, query: &str, debounce: Duration) {
    let results = debounced_search(directory, query, debounce);
    if results.is_empty() {
        println!("{}", ui::style_text("No matching assets", StyleType::Subtle));
        return;
    }
    println!("{}", render_assets(&results));
}
