use super::ui;
use crate::core::quote::PricingBackend;
use crate::core::usage::{Severity, UsageCounters, classify};
use anyhow::Result;

/// Renders the classified usage snapshot. Shared with the watch dashboard.
pub fn limits_view(counters: &UsageCounters) -> String {
    let usage = classify(counters);

    let mut out = format!(
        "{}\n\nMonthly budget  {}  {} / {} used, {} remaining\n\
         Per-minute rate {}  {} / {} used, {} remaining",
        ui::style_text("API usage", ui::StyleType::Title),
        ui::usage_gauge(usage.monthly_percentage, usage.severity),
        counters.monthly_used,
        counters.monthly_limit,
        usage.monthly_remaining,
        ui::usage_gauge(
            usage.minute_percentage,
            Severity::from_percentage(usage.minute_percentage)
        ),
        counters.minute_used,
        counters.minute_limit,
        usage.minute_remaining,
    );

    match usage.severity {
        Severity::Critical => {
            out.push_str(&format!(
                "\n\n{}",
                ui::style_text(
                    "Monthly API budget nearly exhausted. Reduce request frequency.",
                    ui::StyleType::Error
                )
            ));
        }
        Severity::Warn => {
            out.push_str(&format!(
                "\n\n{}",
                ui::style_text("API usage is high.", ui::StyleType::Warning)
            ));
        }
        Severity::Ok => {}
    }
    out
}

pub async fn run(backend: &dyn PricingBackend) -> Result<()> {
    let pb = ui::new_spinner("Fetching API limits...");
    let counters = backend.limits().await;
    pb.finish_and_clear();

    println!("{}", limits_view(&counters?));
    Ok(())
}
