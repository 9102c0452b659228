use super::ui;
use crate::core::quote::{PricingBackend, Quote};
use crate::core::symbol;
use anyhow::Result;
use comfy_table::{Cell, Table};

/// Builds the quote listing table. Shared with the watch dashboard.
pub fn quotes_table(quotes: &[Quote]) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Name"),
        ui::header_cell("Symbol"),
        ui::header_cell("Price"),
        ui::header_cell("24h"),
        ui::header_cell("Exchange"),
        ui::header_cell("Traded"),
    ]);

    for quote in quotes {
        let traded = quote
            .traded_at()
            .map_or("N/A".to_string(), |t| t.format("%b %d %H:%M").to_string());
        table.add_row(vec![
            Cell::new(&quote.name),
            Cell::new(&quote.symbol),
            ui::price_cell(quote.current_price),
            ui::change_cell(quote.percent_change),
            Cell::new(&quote.exchange),
            Cell::new(traded),
        ]);
    }
    table
}

pub async fn run(backend: &dyn PricingBackend) -> Result<()> {
    let pb = ui::new_spinner("Fetching quotes...");
    let quotes = backend.quotes().await;
    pb.finish_and_clear();

    let quotes = quotes?;
    println!(
        "{}\n\n{}",
        ui::style_text("Tracked instruments", ui::StyleType::Title),
        quotes_table(&quotes)
    );

    // History lookups take the route form of the symbol.
    if let Some(first) = quotes.first() {
        println!(
            "\n{}",
            ui::style_text(
                &format!(
                    "30-day view: cryptick history <SYMBOL>, e.g. cryptick history {}",
                    symbol::route_form(&first.symbol)
                ),
                ui::StyleType::Subtle
            )
        );
    }
    Ok(())
}
