//! Collector port for marketplace data sources.

use async_trait::async_trait;

use crate::domain::{Deal, MarketMetrics, PriceHistory};
use crate::error::CollectError;

/// A marketplace that yields candidate deals.
///
/// Each marketplace implements the same three-operation contract. A
/// collector fails independently: an error from [`fetch_listings`]
/// contributes zero records to the cycle and is logged by the loop, never
/// propagated. Enrichment lookups return `Ok(None)` when the marketplace
/// has no data for an item; that is a gap, not an error, and the deal is
/// scored with neutral defaults.
///
/// [`fetch_listings`]: Collector::fetch_listings
#[async_trait]
pub trait Collector: Send + Sync {
    /// Marketplace name for logging and the deal's `site` field.
    fn name(&self) -> &'static str;

    /// Fetch the current page(s) of candidate listings, already enriched
    /// into [`Deal`]s.
    async fn fetch_listings(&self) -> Result<Vec<Deal>, CollectError>;

    /// Recent price samples for an item, if the marketplace tracks them.
    async fn fetch_price_history(
        &self,
        item_id: &str,
    ) -> Result<Option<PriceHistory>, CollectError>;

    /// Liquidity signals for an item, if the marketplace tracks them.
    async fn fetch_market_metrics(
        &self,
        item_id: &str,
    ) -> Result<Option<MarketMetrics>, CollectError>;
}
