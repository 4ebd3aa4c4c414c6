// src/models.rs
use rust_decimal::Decimal;
use serde::Serialize;

/// Where a rendered dataset came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Live,
    Fallback,
}

/// A dataset tagged with its source, so the page can flag fallback data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sourced<T> {
    pub data: T,
    pub source: DataSource,
}

impl<T> Sourced<T> {
    pub fn live(data: T) -> Self {
        Self { data, source: DataSource::Live }
    }

    pub fn fallback(data: T) -> Self {
        Self { data, source: DataSource::Fallback }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == DataSource::Fallback
    }
}

/// A USDC transfer above the institutional threshold
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BigTransfer {
    pub value: Decimal,    // USD, already decimal-adjusted
    pub address: String,   // full sender address; truncated only when rendered
    pub time: String,      // human-relative or formatted local time
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TxStatus {
    Success,
    Pending,
    Failure,
}

impl TxStatus {
    /// Explorer reports "ok" for successful transactions; it has no pending signal.
    pub fn from_explorer(status: Option<&str>) -> Self {
        match status {
            Some("ok") => TxStatus::Success,
            _ => TxStatus::Failure,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentTransaction {
    pub hash: String,
    pub value: f64,
    pub time: String,
    pub status: TxStatus,
}

/// Normalized output of one fetcher, ready to hand to a renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricUpdate {
    MarketCap(f64),
    BlockHeight(u64),
    TotalTransactions(u64),
    BigTransfers(Sourced<Vec<BigTransfer>>),
    RecentTransactions(Sourced<Vec<RecentTransaction>>),
}
