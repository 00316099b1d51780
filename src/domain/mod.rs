//! Deal evaluation: scoring, filtering, dedup, and history.
//!
//! Everything in this module is pure and synchronous. The polling loop in
//! [`crate::app`] owns the stateful pieces (the dedup cache inside the
//! pipeline and the history buffer) and is their only mutator.

mod analyzer;
mod deal;
mod dedup;
mod history;
mod pipeline;

pub use analyzer::{Analysis, MarketAnalyzer, Recommendation};
pub use deal::{Deal, DealKey, MarketMetrics, PriceHistory, PricePoint};
pub use dedup::DedupCache;
pub use history::{DealRecord, HistoryBuffer, HistorySnapshot};
pub use pipeline::{FilterPipeline, ScoredDeal, Thresholds};
