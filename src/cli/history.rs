use super::ui;
use crate::core::quote::{History, PricingBackend};
use crate::core::symbol;
use anyhow::Result;
use comfy_table::{Cell, CellAlignment, Table};

fn history_table(history: &History) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell("Open"),
        ui::header_cell("High"),
        ui::header_cell("Low"),
        ui::header_cell("Close"),
        ui::header_cell("Volume"),
    ]);

    for point in &history.history {
        let volume = point
            .volume
            .clone()
            .unwrap_or_else(|| "N/A".to_string());
        table.add_row(vec![
            Cell::new(&point.date),
            ui::price_cell(point.open),
            ui::price_cell(point.high),
            ui::price_cell(point.low),
            ui::price_cell(point.close),
            Cell::new(volume).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

/// Renders the summary line plus the daily bars. Shared with the watch
/// dashboard.
pub fn history_view(history: &History) -> String {
    let summary = format!(
        "Low {:.2}  High {:.2}  Avg {:.2}  ({} days)",
        history.min_price,
        history.max_price,
        history.avg_price,
        history.history.len()
    );
    format!(
        "{} - {}\n{}\n\n{}",
        ui::style_text(&history.symbol, ui::StyleType::Title),
        history.name,
        ui::style_text(&summary, ui::StyleType::Subtle),
        history_table(history)
    )
}

pub async fn run(backend: &dyn PricingBackend, symbol_arg: &str) -> Result<()> {
    // Accept either form on the command line; the API route wants dashes.
    let route = symbol::route_form(symbol_arg);

    let pb = ui::new_spinner(&format!("Fetching history for {route}..."));
    let history = backend.history(&route).await;
    pb.finish_and_clear();

    println!("{}", history_view(&history?));
    Ok(())
}
