//! Candidate listing and its derived metrics.
//!
//! A [`Deal`] is constructed fresh each polling cycle from a raw
//! marketplace record and is never mutated afterwards. The derived
//! metrics (`profit_potential`, `risk_score`) are computed on demand from
//! the deal's own fields; missing enrichment data falls back to neutral
//! defaults rather than erroring.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One timestamped price observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub at: DateTime<Utc>,
    pub price: Decimal,
}

/// Time-ascending sequence of price samples for an item.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceHistory {
    pub samples: Vec<PricePoint>,
}

impl PriceHistory {
    pub fn new(samples: Vec<PricePoint>) -> Self {
        Self { samples }
    }

    /// Price trend coefficient: (last - first) / sample count.
    /// Zero when fewer than two samples exist.
    pub fn trend(&self) -> Decimal {
        if self.samples.len() < 2 {
            return Decimal::ZERO;
        }
        let first = self.samples[0].price;
        let last = self.samples[self.samples.len() - 1].price;
        (last - first) / Decimal::from(self.samples.len())
    }

    /// Raw prices, in sample order.
    pub fn prices(&self) -> impl Iterator<Item = Decimal> + '_ {
        self.samples.iter().map(|p| p.price)
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Liquidity signals for an item, fetched alongside the listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketMetrics {
    /// Units sold in the last 24 hours.
    pub volume_24h: u32,
    /// Units sold per hour.
    pub sales_velocity: f64,
    /// Average hours a listing sits before selling.
    pub avg_time_to_sell: f64,
    /// Dimensionless price volatility, expected in [0, 1] but not enforced.
    pub volatility: f64,
}

/// One candidate listing under evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Deal {
    pub name: String,
    pub site: String,
    pub url: String,
    pub image_url: String,
    pub price: Decimal,
    pub market_price: Decimal,
    /// Listed discount, in percent.
    pub discount: Decimal,
    pub wear_value: Option<f64>,
    pub stickers: Vec<String>,
    pub pattern_index: Option<u32>,
    pub price_history: Option<PriceHistory>,
    pub market_metrics: Option<MarketMetrics>,
}

impl Deal {
    /// Identity key used for duplicate suppression. Price equality is
    /// exact; two listings of the same item at different prices are
    /// distinct deals.
    pub fn key(&self) -> DealKey {
        DealKey {
            site: self.site.clone(),
            name: self.name.clone(),
            price: self.price,
        }
    }

    /// Projected profit from flipping this deal.
    ///
    /// The raw price gap `market_price - price` when no market metrics are
    /// available. With metrics, the gap is scaled by a sales-velocity
    /// factor clamped to [0.5, 1.5] and discounted for volatility. May be
    /// negative.
    pub fn profit_potential(&self) -> Decimal {
        let base = self.market_price - self.price;
        let Some(metrics) = &self.market_metrics else {
            return base;
        };

        let velocity_factor = (metrics.sales_velocity / 10.0).clamp(0.5, 1.5);
        let volatility_penalty = metrics.volatility * 0.2;
        let scale = velocity_factor * (1.0 - volatility_penalty);

        // The scale is a finite product of bounded factors; from_f64 only
        // fails on NaN/infinity.
        base * Decimal::from_f64(scale).unwrap_or(Decimal::ONE)
    }

    /// Risk estimate in [0, 1]; lower is better. Neutral 0.5 when no
    /// market metrics are available.
    pub fn risk_score(&self) -> f64 {
        let Some(metrics) = &self.market_metrics else {
            return 0.5;
        };

        let mut risk = 0.0;
        // Volatile prices are harder to exit.
        risk += metrics.volatility * 0.3;
        // Slow-selling items tie up capital.
        risk += (metrics.avg_time_to_sell / 72.0).min(0.3) * 0.4;
        // Thin volume means an unreliable market price.
        risk += (1.0 - f64::from(metrics.volume_24h) / 50.0).max(0.0) * 0.3;

        risk.min(1.0)
    }
}

/// Identity tuple `(site, name, price)` used to suppress repeat alerts
/// for the same observed listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DealKey {
    pub site: String,
    pub name: String,
    pub price: Decimal,
}

impl std::fmt::Display for DealKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.site, self.name, self.price)
    }
}
