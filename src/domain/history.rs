//! Bounded rolling history of accepted deals.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::analyzer::Analysis;
use super::deal::Deal;

/// Summary of one accepted deal, captured at acceptance time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealRecord {
    pub name: String,
    pub price: Decimal,
    pub market_price: Decimal,
    pub profit_potential: Decimal,
    pub risk_score: f64,
    pub site: String,
}

impl DealRecord {
    pub fn new(deal: &Deal, analysis: &Analysis) -> Self {
        Self {
            name: deal.name.clone(),
            price: deal.price,
            market_price: deal.market_price,
            profit_potential: analysis.profit_potential,
            risk_score: analysis.risk_score,
            site: deal.site.clone(),
        }
    }
}

/// Serialized view of the history buffer, written to durable storage
/// each cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistorySnapshot {
    pub taken_at: DateTime<Utc>,
    pub deals: Vec<DealRecord>,
}

/// Append-only log of accepted deals, truncated to the most recent
/// `max_entries` after each batch append. Oldest-first order.
#[derive(Debug, Default)]
pub struct HistoryBuffer {
    records: VecDeque<DealRecord>,
    max_entries: usize,
}

impl HistoryBuffer {
    #[must_use]
    pub fn new(max_entries: usize) -> Self {
        Self {
            records: VecDeque::new(),
            max_entries,
        }
    }

    /// Append a batch, then drop the oldest entries past the cap.
    pub fn extend(&mut self, batch: impl IntoIterator<Item = DealRecord>) {
        self.records.extend(batch);
        while self.records.len() > self.max_entries {
            self.records.pop_front();
        }
    }

    /// Pure read of the current contents, timestamped with wall-clock
    /// time for the durable snapshot.
    #[must_use]
    pub fn snapshot(&self) -> HistorySnapshot {
        HistorySnapshot {
            taken_at: Utc::now(),
            deals: self.records.iter().cloned().collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record(n: u32) -> DealRecord {
        DealRecord {
            name: format!("item-{n}"),
            price: Decimal::from(n),
            market_price: Decimal::from(n) + dec!(10),
            profit_potential: dec!(10),
            risk_score: 0.1,
            site: "BUFF".into(),
        }
    }

    #[test]
    fn keeps_most_recent_oldest_first() {
        let mut buffer = HistoryBuffer::new(1000);
        buffer.extend((0..1001).map(record));
        assert_eq!(buffer.len(), 1000);

        let snapshot = buffer.snapshot();
        assert_eq!(snapshot.deals[0].name, "item-1");
        assert_eq!(snapshot.deals[999].name, "item-1000");
    }

    #[test]
    fn truncates_across_batches() {
        let mut buffer = HistoryBuffer::new(5);
        buffer.extend((0..4).map(record));
        buffer.extend((4..8).map(record));
        assert_eq!(buffer.len(), 5);
        let snapshot = buffer.snapshot();
        assert_eq!(snapshot.deals[0].name, "item-3");
        assert_eq!(snapshot.deals[4].name, "item-7");
    }

    #[test]
    fn snapshot_does_not_drain() {
        let mut buffer = HistoryBuffer::new(10);
        buffer.extend((0..3).map(record));
        let _ = buffer.snapshot();
        assert_eq!(buffer.len(), 3);
    }
}
