use serde::Serialize;

/// One closed round trip: the average entry value against the exit value.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TradeRecord {
    pub buy: f64,
    pub sell: f64,
    #[serde(skip)]
    pub executed_at_ms: i64,
}

/// Outcome of closing the open entries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SellSummary {
    pub avg_entry: f64,
    pub exit: i64,
    pub profit: f64,
    pub executed_at_ms: i64,
}

/// Open entries plus the closed-trade history for one session.
///
/// Each buy records one tick value; a sell closes every open entry at once
/// against their average. Profit keeps the convention of entry basis minus
/// exit value.
#[derive(Debug, Default)]
pub struct PositionLedger {
    entries: Vec<i64>,
    trades: Vec<TradeRecord>,
}

impl PositionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a buy at the given tick value.
    pub fn buy(&mut self, value: i64) {
        self.entries.push(value);
    }

    /// Close every open entry against `value`.
    ///
    /// Returns `None` and leaves the ledger untouched when nothing is open.
    pub fn sell(&mut self, value: i64) -> Option<SellSummary> {
        if self.entries.is_empty() {
            return None;
        }
        let avg_entry = self.entries.iter().sum::<i64>() as f64 / self.entries.len() as f64;
        let profit = avg_entry - value as f64;
        let executed_at_ms = chrono::Utc::now().timestamp_millis();
        self.entries.clear();
        self.trades.push(TradeRecord {
            buy: avg_entry,
            sell: value as f64,
            executed_at_ms,
        });
        Some(SellSummary {
            avg_entry,
            exit: value,
            profit,
            executed_at_ms,
        })
    }

    /// Average cost basis of the open entries, `None` when flat.
    pub fn status(&self) -> Option<f64> {
        if self.entries.is_empty() {
            return None;
        }
        Some(self.entries.iter().sum::<i64>() as f64 / self.entries.len() as f64)
    }

    pub fn is_open(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn open_entries(&self) -> usize {
        self.entries.len()
    }

    pub fn trades(&self) -> &[TradeRecord] {
        &self.trades
    }

    pub fn trade_count(&self) -> usize {
        self.trades.len()
    }

    /// Sum of `buy - sell` over all closed trades.
    pub fn realized_profit(&self) -> f64 {
        self.trades.iter().map(|t| t.buy - t.sell).sum()
    }
}
