//! Acceptance filtering for a batch of candidate deals.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use tracing::debug;

use super::analyzer::{Analysis, MarketAnalyzer};
use super::deal::Deal;
use super::dedup::DedupCache;

/// Acceptance thresholds, injected from configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Minimum adjusted profit, in marketplace currency.
    pub min_profit: Decimal,
    /// Maximum tolerated risk score.
    pub max_risk: f64,
    /// Minimum composite investment rating.
    pub min_investment_rating: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_profit: dec!(5),
            max_risk: 0.7,
            min_investment_rating: 0.6,
        }
    }
}

/// An accepted deal paired with the analysis that accepted it.
#[derive(Debug, Clone)]
pub struct ScoredDeal {
    pub deal: Deal,
    pub analysis: Analysis,
}

/// Applies the analyzer, the acceptance thresholds, and duplicate
/// suppression to each cycle's candidate batch.
///
/// The pipeline owns the dedup cache; the cache is mutated only when a
/// deal is accepted, so rejected and duplicate deals leave no trace.
#[derive(Debug)]
pub struct FilterPipeline {
    analyzer: MarketAnalyzer,
    thresholds: Thresholds,
    dedup: DedupCache,
}

impl FilterPipeline {
    #[must_use]
    pub fn new(analyzer: MarketAnalyzer, thresholds: Thresholds, dedup_max_entries: usize) -> Self {
        Self {
            analyzer,
            thresholds,
            dedup: DedupCache::new(dedup_max_entries),
        }
    }

    /// Filter one batch down to the accepted subset, preserving arrival
    /// order.
    pub fn filter(&mut self, batch: Vec<Deal>) -> Vec<ScoredDeal> {
        let mut accepted = Vec::new();

        for deal in batch {
            let key = deal.key();
            if self.dedup.contains(&key) {
                debug!(%key, "duplicate deal suppressed");
                continue;
            }

            let analysis = self.analyzer.analyze(&deal);
            if !self.accepts(&analysis) {
                continue;
            }

            self.dedup.insert(key);
            accepted.push(ScoredDeal { deal, analysis });
        }

        accepted
    }

    fn accepts(&self, analysis: &Analysis) -> bool {
        analysis.profit_potential > self.thresholds.min_profit
            && analysis.risk_score < self.thresholds.max_risk
            && analysis.investment_rating > self.thresholds.min_investment_rating
    }

    /// Number of keys currently held by the dedup cache.
    #[must_use]
    pub fn dedup_len(&self) -> usize {
        self.dedup.len()
    }
}
