//! Composite deal analysis.
//!
//! [`MarketAnalyzer::analyze`] is a stateless, total function from a
//! [`Deal`] to an [`Analysis`]: a recommendation tier plus the
//! market-strength, price-stability, and investment-rating sub-scores.
//! Every sub-score lies in [0, 1].

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use super::deal::Deal;

/// Four-tier verdict for a deal, plus a sentinel for deals with no
/// market metrics to judge by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Recommendation {
    StrongBuy,
    Buy,
    Consider,
    Pass,
    InsufficientData,
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::StrongBuy => "Strong Buy",
            Self::Buy => "Buy",
            Self::Consider => "Consider",
            Self::Pass => "Pass",
            Self::InsufficientData => "Insufficient data",
        };
        f.write_str(s)
    }
}

/// Result of analyzing one deal.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub recommendation: Recommendation,
    /// Liquidity composite in [0, 1]; 0.5 when metrics are absent.
    pub market_strength: f64,
    /// 1 minus the coefficient of variation of recent prices, in [0, 1];
    /// 0.5 when no usable history exists.
    pub price_stability: f64,
    /// Weighted composite of profit, risk, strength, and stability.
    pub investment_rating: f64,
    pub profit_potential: Decimal,
    pub risk_score: f64,
}

/// Stateless deal scorer.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarketAnalyzer;

impl MarketAnalyzer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Score a deal. Total over all deals; missing enrichment data maps
    /// to documented neutral defaults, never to an error.
    pub fn analyze(&self, deal: &Deal) -> Analysis {
        let profit_potential = deal.profit_potential();
        let risk_score = deal.risk_score();
        let market_strength = self.market_strength(deal);
        let price_stability = self.price_stability(deal);

        Analysis {
            recommendation: self.recommendation(deal, profit_potential, risk_score),
            market_strength,
            price_stability,
            investment_rating: self.investment_rating(
                deal,
                profit_potential,
                risk_score,
                market_strength,
                price_stability,
            ),
            profit_potential,
            risk_score,
        }
    }

    /// First matching rule wins; all comparisons are strict, so a deal
    /// sitting exactly on a boundary falls into the next tier down.
    fn recommendation(
        &self,
        deal: &Deal,
        profit_potential: Decimal,
        risk_score: f64,
    ) -> Recommendation {
        if deal.market_metrics.is_none() {
            return Recommendation::InsufficientData;
        }
        if deal.price <= Decimal::ZERO {
            return Recommendation::Pass;
        }

        let profit_ratio = profit_potential / deal.price;

        if profit_ratio > dec!(0.3) && risk_score < 0.3 {
            Recommendation::StrongBuy
        } else if profit_ratio > dec!(0.2) && risk_score < 0.5 {
            Recommendation::Buy
        } else if profit_ratio > dec!(0.1) && risk_score < 0.7 {
            Recommendation::Consider
        } else {
            Recommendation::Pass
        }
    }

    fn market_strength(&self, deal: &Deal) -> f64 {
        let Some(metrics) = &deal.market_metrics else {
            return 0.5;
        };

        let volume_score = (f64::from(metrics.volume_24h) / 100.0).min(1.0);
        let velocity_score = (metrics.sales_velocity / 5.0).min(1.0);

        volume_score * 0.6 + velocity_score * 0.4
    }

    fn price_stability(&self, deal: &Deal) -> f64 {
        let Some(history) = &deal.price_history else {
            return 0.5;
        };
        if history.is_empty() {
            return 0.5;
        }

        let prices: Vec<f64> = history.prices().filter_map(|p| p.to_f64()).collect();
        if prices.is_empty() {
            return 0.5;
        }

        let mean = prices.iter().sum::<f64>() / prices.len() as f64;
        if mean == 0.0 {
            return 0.5;
        }

        let variance =
            prices.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / prices.len() as f64;
        let stddev = variance.sqrt();

        1.0 - (stddev / mean).min(1.0)
    }

    fn investment_rating(
        &self,
        deal: &Deal,
        profit_potential: Decimal,
        risk_score: f64,
        market_strength: f64,
        price_stability: f64,
    ) -> f64 {
        // Profit normalized against half the buy price; clamped above at
        // 1 but allowed to go negative on losing deals.
        let profit_score = if deal.price > Decimal::ZERO {
            (profit_potential / (deal.price * dec!(0.5)))
                .to_f64()
                .unwrap_or(0.0)
                .min(1.0)
        } else {
            0.0
        };

        profit_score * 0.4
            + (1.0 - risk_score) * 0.3
            + market_strength * 0.2
            + price_stability * 0.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::deal::{MarketMetrics, PriceHistory, PricePoint};
    use chrono::Utc;

    fn deal(price: Decimal, market_price: Decimal) -> Deal {
        Deal {
            name: "Glock-18 | Fade (Factory New)".into(),
            site: "BUFF".into(),
            url: "https://example.invalid/goods/2".into(),
            image_url: "https://example.invalid/icon/2.png".into(),
            price,
            market_price,
            discount: dec!(10),
            wear_value: None,
            stickers: vec![],
            pattern_index: None,
            price_history: None,
            market_metrics: None,
        }
    }

    /// Metrics that leave profit_potential at the raw price gap and risk
    /// at zero, so tests can dial the recommendation inputs exactly.
    fn neutral_metrics() -> MarketMetrics {
        MarketMetrics {
            volume_24h: 50,
            sales_velocity: 10.0,
            avg_time_to_sell: 0.0,
            volatility: 0.0,
        }
    }

    fn history_of(prices: &[Decimal]) -> PriceHistory {
        let now = Utc::now();
        PriceHistory::new(
            prices
                .iter()
                .map(|&price| PricePoint { at: now, price })
                .collect(),
        )
    }

    #[test]
    fn no_metrics_means_insufficient_data() {
        let d = deal(dec!(50), dec!(200));
        let analysis = MarketAnalyzer::new().analyze(&d);
        assert_eq!(analysis.recommendation, Recommendation::InsufficientData);
        assert_eq!(analysis.risk_score, 0.5);
        assert_eq!(analysis.market_strength, 0.5);
    }

    #[test]
    fn strong_buy_above_both_boundaries() {
        let mut d = deal(dec!(100), dec!(131));
        d.market_metrics = Some(neutral_metrics());
        // profit_ratio 0.31, risk 0.0
        let analysis = MarketAnalyzer::new().analyze(&d);
        assert_eq!(analysis.recommendation, Recommendation::StrongBuy);
    }

    #[test]
    fn profit_ratio_boundary_is_strict() {
        // Exactly 0.3 does not qualify for Strong Buy; falls to Buy.
        let mut d = deal(dec!(100), dec!(130));
        d.market_metrics = Some(neutral_metrics());
        let analysis = MarketAnalyzer::new().analyze(&d);
        assert_eq!(analysis.recommendation, Recommendation::Buy);
    }

    #[test]
    fn tiers_fall_through_in_order() {
        let analyzer = MarketAnalyzer::new();

        let mut d = deal(dec!(100), dec!(129));
        d.market_metrics = Some(neutral_metrics());
        assert_eq!(analyzer.analyze(&d).recommendation, Recommendation::Buy);

        let mut d = deal(dec!(100), dec!(115));
        d.market_metrics = Some(neutral_metrics());
        assert_eq!(analyzer.analyze(&d).recommendation, Recommendation::Consider);

        let mut d = deal(dec!(100), dec!(105));
        d.market_metrics = Some(neutral_metrics());
        assert_eq!(analyzer.analyze(&d).recommendation, Recommendation::Pass);
    }

    #[test]
    fn risk_gate_demotes_profitable_deals() {
        // Plenty of profit, but risk 0.3 exactly is not < 0.3.
        let mut d = deal(dec!(100), dec!(150));
        d.market_metrics = Some(MarketMetrics {
            volume_24h: 50,
            sales_velocity: 10.0,
            avg_time_to_sell: 0.0,
            volatility: 1.0, // risk = 0.3
        });
        // volatility also shrinks profit: 50 * 1.0 * 0.8 = 40, ratio 0.4.
        let analysis = MarketAnalyzer::new().analyze(&d);
        assert_eq!(analysis.recommendation, Recommendation::Buy);
    }

    #[test]
    fn market_strength_weights_volume_and_velocity() {
        let mut d = deal(dec!(100), dec!(120));
        d.market_metrics = Some(MarketMetrics {
            volume_24h: 80,
            sales_velocity: 8.0,
            avg_time_to_sell: 10.0,
            volatility: 0.1,
        });
        let analysis = MarketAnalyzer::new().analyze(&d);
        // 0.6 * 0.8 + 0.4 * 1.0 (velocity capped)
        assert!((analysis.market_strength - 0.88).abs() < 1e-9);
    }

    #[test]
    fn stability_defaults_without_history() {
        let d = deal(dec!(100), dec!(120));
        assert_eq!(MarketAnalyzer::new().analyze(&d).price_stability, 0.5);

        let mut d = deal(dec!(100), dec!(120));
        d.price_history = Some(PriceHistory::default());
        assert_eq!(MarketAnalyzer::new().analyze(&d).price_stability, 0.5);
    }

    #[test]
    fn constant_prices_are_perfectly_stable() {
        let mut d = deal(dec!(100), dec!(120));
        d.price_history = Some(history_of(&[dec!(10), dec!(10), dec!(10)]));
        let analysis = MarketAnalyzer::new().analyze(&d);
        assert!((analysis.price_stability - 1.0).abs() < 1e-9);
    }

    #[test]
    fn wild_prices_floor_stability_at_zero() {
        let mut d = deal(dec!(100), dec!(120));
        d.price_history = Some(history_of(&[dec!(1), dec!(100), dec!(1), dec!(100)]));
        let analysis = MarketAnalyzer::new().analyze(&d);
        assert!(analysis.price_stability >= 0.0);
        assert!(analysis.price_stability < 0.2);
    }

    #[test]
    fn investment_rating_combines_weighted_scores() {
        let mut d = deal(dec!(100), dec!(150));
        d.market_metrics = Some(MarketMetrics {
            volume_24h: 80,
            sales_velocity: 8.0,
            avg_time_to_sell: 10.0,
            volatility: 0.1,
        });
        let analysis = MarketAnalyzer::new().analyze(&d);

        // profit = 50 * 0.8 * 0.98 = 39.2, profit_score = 39.2/50 = 0.784
        // risk = 0.03 + 0.4*min(0.3, 10/72) + 0 = 0.08555...
        // strength = 0.88, stability = 0.5 (no history)
        let expected_risk = 0.1 * 0.3 + (10.0 / 72.0) * 0.4;
        let expected =
            0.784 * 0.4 + (1.0 - expected_risk) * 0.3 + 0.88 * 0.2 + 0.5 * 0.1;
        assert!((analysis.investment_rating - expected).abs() < 1e-9);
        assert_eq!(analysis.profit_potential, dec!(39.2));
        assert_eq!(analysis.recommendation, Recommendation::StrongBuy);
    }

    #[test]
    fn losing_deals_can_go_negative_in_profit_score() {
        let mut d = deal(dec!(100), dec!(40));
        d.market_metrics = Some(neutral_metrics());
        let analysis = MarketAnalyzer::new().analyze(&d);
        // profit_score = -60/50 = -1.2, dragging the rating below zero
        // is allowed; only the sub-scores are clamped to [0, 1].
        assert!(analysis.investment_rating < 0.3);
        assert_eq!(analysis.recommendation, Recommendation::Pass);
    }
}
