//! Core business logic abstractions

pub mod config;
pub mod feed;
pub mod log;
pub mod quote;
pub mod symbol;
pub mod usage;

// Re-export main types for cleaner imports
pub use feed::{FeedDescriptor, FeedId, FeedState, FetchError, FetchErrorKind};
pub use quote::{History, HistoryPoint, PricingBackend, Quote};
pub use usage::{Severity, UsageClassification, UsageCounters, classify};
