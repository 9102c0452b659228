use super::{history, limits, quotes, ui};
use crate::core::config::AppConfig;
use crate::core::feed::{FeedDescriptor, FeedState};
use crate::core::quote::{History, PricingBackend, Quote};
use crate::core::symbol;
use crate::core::usage::UsageCounters;
use crate::sync::FeedSynchronizer;
use anyhow::Result;
use console::Term;
use std::sync::Arc;
use tracing::info;

const QUOTES_FEED: &str = "quotes";
const LIMITS_FEED: &str = "limits";
const HISTORY_FEED: &str = "history";

/// Payload published by any of the dashboard's feeds.
#[derive(Clone)]
enum FeedData {
    Quotes(Vec<Quote>),
    History(History),
    Limits(UsageCounters),
}

fn render_payload(data: &FeedData) -> String {
    match data {
        FeedData::Quotes(quotes) => quotes::quotes_table(quotes).to_string(),
        FeedData::History(h) => history::history_view(h),
        FeedData::Limits(c) => limits::limits_view(c),
    }
}

/// One dashboard section: last-known-good data first, freshness and errors
/// underneath. A feed that fails after a successful fetch keeps rendering
/// its stale data with a warning line.
fn render_section(state: Option<FeedState<FeedData>>) -> String {
    let Some(state) = state else {
        return ui::style_text("Not registered", ui::StyleType::Subtle);
    };

    let mut out = match (&state.data, &state.error) {
        (Some(data), _) => render_payload(data),
        (None, Some(error)) => {
            ui::style_text(&format!("Unavailable: {error}"), ui::StyleType::Error)
        }
        (None, None) => ui::style_text("Loading...", ui::StyleType::Subtle),
    };

    if state.is_stale() {
        if let Some(error) = &state.error {
            out.push('\n');
            out.push_str(&ui::style_text(
                &format!("Refresh failed ({error}); showing last known data"),
                ui::StyleType::Warning,
            ));
        }
    }
    if let Some(updated) = state.last_updated {
        out.push('\n');
        out.push_str(&ui::style_text(
            &format!("Updated {}", updated.format("%H:%M:%S")),
            ui::StyleType::Subtle,
        ));
    }
    out
}

async fn draw(
    term: &Term,
    sync: &FeedSynchronizer<FeedData>,
    config: &AppConfig,
    with_history: bool,
) -> Result<()> {
    term.clear_screen()?;

    println!(
        "{}",
        ui::style_text("cryptick - live tracker", ui::StyleType::Title)
    );
    println!(
        "{}",
        ui::style_text(
            &format!(
                "quotes every {}s, limits every {}s - Ctrl-C to quit",
                config.feeds.quotes_interval_secs, config.feeds.limits_interval_secs
            ),
            ui::StyleType::Subtle
        )
    );

    println!("\n{}", render_section(sync.state(QUOTES_FEED).await));
    if with_history {
        ui::print_separator();
        println!("{}", render_section(sync.state(HISTORY_FEED).await));
    }
    ui::print_separator();
    println!("{}", render_section(sync.state(LIMITS_FEED).await));
    Ok(())
}

pub async fn run(
    config: &AppConfig,
    backend: Arc<dyn PricingBackend>,
    symbol_arg: Option<&str>,
) -> Result<()> {
    let sync = FeedSynchronizer::<FeedData>::new();

    let quotes_backend = Arc::clone(&backend);
    let quotes_handle = sync
        .register(FeedDescriptor::new(
            QUOTES_FEED,
            config.feeds.quotes_interval(),
            move || {
                let backend = Arc::clone(&quotes_backend);
                async move { backend.quotes().await.map(FeedData::Quotes) }
            },
        ))
        .await;

    let limits_backend = Arc::clone(&backend);
    let limits_handle = sync
        .register(FeedDescriptor::new(
            LIMITS_FEED,
            config.feeds.limits_interval(),
            move || {
                let backend = Arc::clone(&limits_backend);
                async move { backend.limits().await.map(FeedData::Limits) }
            },
        ))
        .await;

    let history_handle = match symbol_arg {
        Some(arg) => {
            let route = symbol::route_form(arg);
            let history_backend = Arc::clone(&backend);
            Some(
                sync.register(FeedDescriptor::new(
                    HISTORY_FEED,
                    config.feeds.history_interval(),
                    move || {
                        let backend = Arc::clone(&history_backend);
                        let route = route.clone();
                        async move { backend.history(&route).await.map(FeedData::History) }
                    },
                ))
                .await,
            )
        }
        None => None,
    };

    let term = Term::stdout();
    let mut redraw = tokio::time::interval(config.watch.redraw_interval());
    loop {
        tokio::select! {
            _ = redraw.tick() => {
                draw(&term, &sync, config, history_handle.is_some()).await?;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down watch");
                break;
            }
        }
    }

    quotes_handle.unregister().await;
    limits_handle.unregister().await;
    if let Some(handle) = history_handle {
        handle.unregister().await;
    }
    sync.shutdown().await;
    Ok(())
}
