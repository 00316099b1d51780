//! Notifier port for accepted-deal alerts.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::{Analysis, Deal};
use crate::error::NotifyError;

/// A delivery channel for one accepted deal.
///
/// Notification happens strictly after acceptance is finalized; a failing
/// notifier is logged and never affects the dedup cache or the history
/// buffer. No retry within the cycle.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Channel name for logging.
    fn name(&self) -> &'static str;

    /// Deliver one alert.
    async fn notify(&self, deal: &Deal, analysis: &Analysis) -> Result<(), NotifyError>;
}

/// Ordered list of notifiers. Each accepted deal is delivered to every
/// registered channel in turn; failures are logged and swallowed.
#[derive(Default)]
pub struct NotifierRegistry {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotifierRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self { notifiers: vec![] }
    }

    pub fn register(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    /// Notify all registered channels, logging any failure.
    pub async fn notify_all(&self, deal: &Deal, analysis: &Analysis) {
        for notifier in &self.notifiers {
            if let Err(e) = notifier.notify(deal, analysis).await {
                warn!(
                    notifier = notifier.name(),
                    deal = %deal.name,
                    error = %e,
                    "notification failed"
                );
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

/// A notifier that only logs, used when no webhook is configured.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn notify(&self, deal: &Deal, analysis: &Analysis) -> Result<(), NotifyError> {
        info!(
            deal = %deal.name,
            site = %deal.site,
            price = %deal.price,
            profit = %analysis.profit_potential,
            risk = analysis.risk_score,
            rating = analysis.investment_rating,
            recommendation = %analysis.recommendation,
            "deal accepted"
        );
        Ok(())
    }
}
