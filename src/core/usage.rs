//! Classification of raw API usage counters into a severity-annotated view.

use serde::Deserialize;

/// Raw usage counters as reported by the backend's `/meta/limits` resource.
///
/// The backend also sends derived fields (remaining, percentage, warning
/// flag); those are ignored on deserialization and recomputed locally so the
/// classification is consistent regardless of upstream version. Counters are
/// signed because the producer invariant (`0 <= used <= limit`) is not
/// enforced here; [`classify`] clamps violations instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageCounters {
    pub monthly_used: i64,
    pub monthly_limit: i64,
    pub minute_used: i64,
    pub minute_limit: i64,
}

/// Severity band for a usage percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Ok,
    Warn,
    Critical,
}

impl Severity {
    /// Band for a usage percentage. Lower bounds are inclusive:
    /// 80.0 is `Critical`, 79.99 is `Warn`.
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 80.0 {
            Severity::Critical
        } else if percentage >= 60.0 {
            Severity::Warn
        } else {
            Severity::Ok
        }
    }
}

/// Derived usage view, recomputed fresh on every refresh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UsageClassification {
    pub monthly_percentage: f64,
    pub monthly_remaining: i64,
    pub minute_percentage: f64,
    pub minute_remaining: i64,
    pub severity: Severity,
}

fn percentage(used: i64, limit: i64) -> f64 {
    if limit <= 0 {
        return 0.0;
    }
    (used as f64 / limit as f64 * 100.0).clamp(0.0, 100.0)
}

fn remaining(used: i64, limit: i64) -> i64 {
    (limit - used).clamp(0, limit.max(0))
}

/// Derive percentages, remaining counts and a severity band from raw
/// counters.
///
/// This is display logic, not a validator of the upstream contract: negative
/// counters, `used > limit` and `limit == 0` are all clamped into the valid
/// output range rather than reported as errors. Severity follows the monthly
/// percentage only.
pub fn classify(counters: &UsageCounters) -> UsageClassification {
    let monthly_percentage = percentage(counters.monthly_used, counters.monthly_limit);

    UsageClassification {
        monthly_percentage,
        monthly_remaining: remaining(counters.monthly_used, counters.monthly_limit),
        minute_percentage: percentage(counters.minute_used, counters.minute_limit),
        minute_remaining: remaining(counters.minute_used, counters.minute_limit),
        severity: Severity::from_percentage(monthly_percentage),
    }
}
