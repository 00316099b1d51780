//! BUFF marketplace collector.
//!
//! Polls the paginated goods endpoint and enriches each listing with
//! price history and market metrics. Enrichment is best-effort: a missing
//! or failing lookup degrades the deal to neutral scoring defaults
//! instead of dropping it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::Rng;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::BuffConfig;
use crate::domain::{Deal, MarketMetrics, PriceHistory, PricePoint};
use crate::error::CollectError;
use crate::port::Collector;

const SITE: &str = "BUFF";

pub struct BuffCollector {
    http: reqwest::Client,
    base_url: String,
    pages: u32,
}

impl BuffCollector {
    #[must_use]
    pub fn new(config: &BuffConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            pages: config.pages,
        }
    }

    async fn get_json(&self, url: &str) -> Result<String, CollectError> {
        let response = self
            .http
            .get(url)
            .header(
                USER_AGENT,
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
            )
            .header(ACCEPT, "application/json")
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .header(REFERER, "https://buff.163.com/market/csgo")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CollectError::Status {
                code: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }

    async fn fetch_page(&self, page: u32) -> Result<Vec<GoodsItem>, CollectError> {
        let url = format!("{}/goods?game=csgo&page={page}", self.base_url);
        let body = self.get_json(&url).await?;
        parse_goods_page(&body)
    }

    async fn enrich(&self, item: &GoodsItem) -> (Option<PriceHistory>, Option<MarketMetrics>) {
        let id = item.id.to_string();

        let history = match self.fetch_price_history(&id).await {
            Ok(h) => h,
            Err(e) => {
                debug!(item = %item.name, error = %e, "price history lookup failed");
                None
            }
        };
        let metrics = match self.fetch_market_metrics(&id).await {
            Ok(m) => m,
            Err(e) => {
                debug!(item = %item.name, error = %e, "market metrics lookup failed");
                None
            }
        };

        (history, metrics)
    }

    fn deal_from_item(
        &self,
        item: GoodsItem,
        price_history: Option<PriceHistory>,
        market_metrics: Option<MarketMetrics>,
    ) -> Deal {
        Deal {
            url: format!("https://buff.163.com/goods/{}", item.id),
            name: item.name,
            site: SITE.into(),
            image_url: item.icon_url,
            price: item.price,
            market_price: item.market_price,
            discount: item.discount,
            wear_value: item.wear_value,
            stickers: item.stickers,
            pattern_index: item.pattern_index,
            price_history,
            market_metrics,
        }
    }

    /// Jittered pause between requests so the polling stays polite.
    async fn pace(&self) {
        let millis = rand::thread_rng().gen_range(1500..4000);
        tokio::time::sleep(std::time::Duration::from_millis(millis)).await;
    }
}

#[async_trait]
impl Collector for BuffCollector {
    fn name(&self) -> &'static str {
        SITE
    }

    async fn fetch_listings(&self) -> Result<Vec<Deal>, CollectError> {
        let mut deals = Vec::new();
        let mut last_error = None;

        for page in 1..=self.pages {
            if page > 1 {
                self.pace().await;
            }

            let items = match self.fetch_page(page).await {
                Ok(items) => items,
                Err(e) => {
                    warn!(page, error = %e, "failed to fetch goods page");
                    last_error = Some(e);
                    continue;
                }
            };

            for item in items {
                let (history, metrics) = self.enrich(&item).await;
                deals.push(self.deal_from_item(item, history, metrics));
            }
        }

        // Every page failed: surface the collector failure to the loop.
        match (deals.is_empty(), last_error) {
            (true, Some(e)) => Err(e),
            _ => Ok(deals),
        }
    }

    async fn fetch_price_history(
        &self,
        item_id: &str,
    ) -> Result<Option<PriceHistory>, CollectError> {
        let url = format!(
            "{}/goods/price_history?game=csgo&goods_id={item_id}",
            self.base_url
        );
        let body = self.get_json(&url).await?;
        parse_price_history(&body)
    }

    async fn fetch_market_metrics(
        &self,
        item_id: &str,
    ) -> Result<Option<MarketMetrics>, CollectError> {
        let url = format!(
            "{}/goods/metrics?game=csgo&goods_id={item_id}",
            self.base_url
        );
        let body = self.get_json(&url).await?;
        parse_market_metrics(&body)
    }
}

#[derive(Debug, Deserialize)]
struct GoodsResponse {
    data: GoodsData,
}

#[derive(Debug, Deserialize)]
struct GoodsData {
    items: Vec<GoodsItem>,
}

#[derive(Debug, Deserialize)]
struct GoodsItem {
    id: u64,
    name: String,
    price: Decimal,
    market_price: Decimal,
    discount: Decimal,
    icon_url: String,
    #[serde(default)]
    wear_value: Option<f64>,
    #[serde(default)]
    stickers: Vec<String>,
    #[serde(default)]
    pattern_index: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct PriceHistoryResponse {
    data: PriceHistoryData,
}

#[derive(Debug, Deserialize)]
struct PriceHistoryData {
    /// `[timestamp_millis, price]` pairs, time-ascending.
    #[serde(default)]
    price_history: Vec<(i64, Decimal)>,
}

#[derive(Debug, Deserialize)]
struct MetricsResponse {
    data: Option<MetricsData>,
}

#[derive(Debug, Deserialize)]
struct MetricsData {
    volume_24h: u32,
    sales_velocity: f64,
    avg_time_to_sell: f64,
    volatility: f64,
}

fn parse_goods_page(body: &str) -> Result<Vec<GoodsItem>, CollectError> {
    let response: GoodsResponse = serde_json::from_str(body).map_err(CollectError::Parse)?;
    Ok(response.data.items)
}

fn parse_price_history(body: &str) -> Result<Option<PriceHistory>, CollectError> {
    let response: PriceHistoryResponse =
        serde_json::from_str(body).map_err(CollectError::Parse)?;
    if response.data.price_history.is_empty() {
        return Ok(None);
    }

    let samples = response
        .data
        .price_history
        .into_iter()
        .filter_map(|(millis, price)| {
            DateTime::<Utc>::from_timestamp_millis(millis).map(|at| PricePoint { at, price })
        })
        .collect();
    Ok(Some(PriceHistory::new(samples)))
}

fn parse_market_metrics(body: &str) -> Result<Option<MarketMetrics>, CollectError> {
    let response: MetricsResponse = serde_json::from_str(body).map_err(CollectError::Parse)?;
    Ok(response.data.map(|d| MarketMetrics {
        volume_24h: d.volume_24h,
        sales_velocity: d.sales_velocity,
        avg_time_to_sell: d.avg_time_to_sell,
        volatility: d.volatility,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parses_goods_page_with_optional_fields() {
        let body = r#"{
            "data": {
                "items": [
                    {
                        "id": 33814,
                        "name": "AK-47 | Redline (Field-Tested)",
                        "price": "61.50",
                        "market_price": "78.00",
                        "discount": "21.2",
                        "icon_url": "https://cdn.example.invalid/33814.png",
                        "wear_value": 0.2345,
                        "stickers": ["Titan (Holo) | Katowice 2014"],
                        "pattern_index": 661
                    },
                    {
                        "id": 42530,
                        "name": "Desert Eagle | Blaze (Factory New)",
                        "price": 412.0,
                        "market_price": 455.5,
                        "discount": 9.6,
                        "icon_url": "https://cdn.example.invalid/42530.png"
                    }
                ]
            }
        }"#;

        let items = parse_goods_page(body).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].price, dec!(61.50));
        assert_eq!(items[0].stickers.len(), 1);
        assert_eq!(items[0].pattern_index, Some(661));
        assert_eq!(items[1].price, dec!(412.0));
        assert!(items[1].wear_value.is_none());
        assert!(items[1].stickers.is_empty());
    }

    #[test]
    fn goods_parse_failure_is_a_parse_error() {
        let err = parse_goods_page("not json").unwrap_err();
        assert!(matches!(err, CollectError::Parse(_)));
    }

    #[test]
    fn parses_price_history_pairs() {
        let body = r#"{
            "data": {
                "price_history": [
                    [1700000000000, "60.1"],
                    [1700086400000, "61.0"],
                    [1700172800000, "62.4"]
                ]
            }
        }"#;
        let history = parse_price_history(body).unwrap().unwrap();
        assert_eq!(history.samples.len(), 3);
        assert_eq!(history.samples[0].price, dec!(60.1));
        assert!(history.samples[0].at < history.samples[2].at);
    }

    #[test]
    fn empty_price_history_is_none() {
        let body = r#"{"data": {"price_history": []}}"#;
        assert!(parse_price_history(body).unwrap().is_none());
    }

    #[test]
    fn missing_metrics_is_none() {
        let body = r#"{"data": null}"#;
        assert!(parse_market_metrics(body).unwrap().is_none());
    }

    #[test]
    fn parses_metrics() {
        let body = r#"{
            "data": {
                "volume_24h": 80,
                "sales_velocity": 8.0,
                "avg_time_to_sell": 10.0,
                "volatility": 0.1
            }
        }"#;
        let metrics = parse_market_metrics(body).unwrap().unwrap();
        assert_eq!(metrics.volume_24h, 80);
        assert_eq!(metrics.sales_velocity, 8.0);
    }

    #[test]
    fn deal_construction_maps_fields() {
        let collector = BuffCollector::new(&crate::config::BuffConfig::default());
        let item = GoodsItem {
            id: 33814,
            name: "AK-47 | Redline (Field-Tested)".into(),
            price: dec!(61.50),
            market_price: dec!(78.00),
            discount: dec!(21.2),
            icon_url: "https://cdn.example.invalid/33814.png".into(),
            wear_value: Some(0.2345),
            stickers: vec![],
            pattern_index: None,
        };
        let deal = collector.deal_from_item(item, None, None);
        assert_eq!(deal.site, "BUFF");
        assert_eq!(deal.url, "https://buff.163.com/goods/33814");
        assert_eq!(deal.price, dec!(61.50));
        assert!(deal.market_metrics.is_none());
    }
}
