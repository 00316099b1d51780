//! Discord webhook notifier.
//!
//! Sends one rich embed per accepted deal. Delivery failures are logged
//! by the registry and never affect pipeline state.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};

use crate::domain::{Analysis, Deal, Recommendation};
use crate::error::NotifyError;
use crate::port::Notifier;

pub struct DiscordNotifier {
    http: reqwest::Client,
    webhook_url: String,
}

impl DiscordNotifier {
    #[must_use]
    pub fn new(webhook_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            webhook_url,
        }
    }

    /// Read the webhook URL from `DISCORD_WEBHOOK_URL`, if set.
    pub fn from_env() -> Option<Self> {
        std::env::var("DISCORD_WEBHOOK_URL")
            .ok()
            .filter(|url| !url.is_empty())
            .map(Self::new)
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    fn name(&self) -> &'static str {
        "discord"
    }

    async fn notify(&self, deal: &Deal, analysis: &Analysis) -> Result<(), NotifyError> {
        let payload = build_payload(deal, analysis);
        let response = self.http.post(&self.webhook_url).json(&payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status {
                code: status.as_u16(),
            });
        }
        Ok(())
    }
}

fn build_payload(deal: &Deal, analysis: &Analysis) -> Value {
    let mut fields = vec![
        field("💰 Price", format!("${:.2}", deal.price), true),
        field("📊 Market", format!("${:.2}", deal.market_price), true),
        field("📉 Discount", format!("{:.1}%", deal.discount), true),
        field(
            "📈 Profit Potential",
            format!("${:.2}", analysis.profit_potential),
            true,
        ),
        field("⚠️ Risk Score", format!("{:.2}", analysis.risk_score), true),
        field(
            "⭐ Investment Rating",
            format!("{:.2}/1.0", analysis.investment_rating),
            true,
        ),
    ];

    if let Some(metrics) = &deal.market_metrics {
        fields.push(field(
            "📊 Market Metrics",
            format!(
                "Volume: {}/24h\nVelocity: {:.1}/h\nAvg. Sell Time: {:.1}h",
                metrics.volume_24h, metrics.sales_velocity, metrics.avg_time_to_sell
            ),
            false,
        ));
    }

    if let Some(attrs) = special_attributes(deal) {
        fields.push(field("🔍 Special Attributes", attrs, false));
    }

    fields.push(field(
        "🔗 Quick Buy",
        format!("[Buy on {}]({})", deal.site, deal.url),
        false,
    ));

    json!({
        "embeds": [{
            "title": format!("💎 Premium Deal Alert: {}", deal.name),
            "description": format!(
                "**Recommendation: {}**\nMarket Strength: {:.2}/1.0\nPrice Stability: {:.2}/1.0\n",
                analysis.recommendation, analysis.market_strength, analysis.price_stability
            ),
            "color": embed_color(analysis.recommendation),
            "fields": fields,
            "thumbnail": { "url": deal.image_url },
            "footer": {
                "text": format!("skinscout • {}", Utc::now().format("%Y-%m-%d %H:%M:%S"))
            }
        }]
    })
}

fn field(name: &str, value: String, inline: bool) -> Value {
    json!({ "name": name, "value": value, "inline": inline })
}

fn special_attributes(deal: &Deal) -> Option<String> {
    let mut attrs = Vec::new();
    if let Some(wear) = deal.wear_value {
        attrs.push(format!("Wear: {wear:.4}"));
    }
    if !deal.stickers.is_empty() {
        attrs.push(format!("Stickers: {}", deal.stickers.len()));
    }
    if let Some(pattern) = deal.pattern_index {
        attrs.push(format!("Pattern: #{pattern}"));
    }
    if attrs.is_empty() {
        None
    } else {
        Some(attrs.join(" | "))
    }
}

fn embed_color(recommendation: Recommendation) -> u32 {
    match recommendation {
        Recommendation::StrongBuy => 0x00ff00,
        Recommendation::Buy => 0x00cc00,
        Recommendation::Consider => 0xffff00,
        Recommendation::Pass | Recommendation::InsufficientData => 0xff0000,
    }
}
