// src/render.rs
use serde::Serialize;
use std::sync::{Mutex, MutexGuard};

use crate::fallback;
use crate::format;
use crate::models::{BigTransfer, MetricUpdate, RecentTransaction, Sourced, TxStatus};

pub const MAX_BIG_TRANSFERS: usize = 5;
pub const MAX_RECENT_TRANSACTIONS: usize = 10;
pub const FALLBACK_WARNING: &str = "⚠️ API Inactive. Showing static presentation data.";

/// Output surface of the dashboard, one method per page region.
pub trait Renderer: Send + Sync {
    fn market_cap(&self, value: f64);
    fn block_height(&self, height: u64);
    fn total_transactions(&self, count: u64);
    fn finality_time(&self, seconds: f64);
    fn big_transfers(&self, feed: &Sourced<Vec<BigTransfer>>);
    fn recent_transactions(&self, feed: &Sourced<Vec<RecentTransaction>>);
}

/// Route a fetcher result to the region it owns.
pub fn apply(renderer: &dyn Renderer, update: &MetricUpdate) {
    match update {
        MetricUpdate::MarketCap(v) => renderer.market_cap(*v),
        MetricUpdate::BlockHeight(h) => renderer.block_height(*h),
        MetricUpdate::TotalTransactions(c) => renderer.total_transactions(*c),
        MetricUpdate::BigTransfers(feed) => renderer.big_transfers(feed),
        MetricUpdate::RecentTransactions(feed) => renderer.recent_transactions(feed),
    }
}

/// Fill every region from static data so nothing starts empty.
pub fn initialize(renderer: &dyn Renderer) {
    renderer.market_cap(fallback::USDC_MARKET_CAP);
    renderer.block_height(fallback::BLOCK_HEIGHT);
    renderer.total_transactions(fallback::TOTAL_TRANSACTIONS);
    renderer.finality_time(fallback::FINALITY_TIME_SECS);
    renderer.big_transfers(&Sourced::fallback(fallback::big_transfers()));
    renderer.recent_transactions(&Sourced::fallback(fallback::recent_transactions()));
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BigTransferRow {
    pub value: String,
    pub address: String,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentTransactionRow {
    pub status: TxStatus,
    pub class: &'static str,
    pub icon: &'static str,
    pub hash: String,
    pub value: String,
    pub time: String,
    pub link: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecentTransactionsRegion {
    pub warning: Option<String>,
    pub rows: Vec<RecentTransactionRow>,
}

/// Current text of every page region.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Page {
    pub usdc_market_cap: String,
    pub current_block: String,
    pub total_transactions: String,
    pub finality_time: String,
    pub big_transactions: Vec<BigTransferRow>,
    pub recent_transactions: RecentTransactionsRegion,
}

pub fn status_icon(status: TxStatus) -> &'static str {
    match status {
        TxStatus::Success => "fa-check-circle",
        TxStatus::Pending => "fa-clock",
        TxStatus::Failure => "fa-times-circle",
    }
}

/// CSS class of a transaction list item.
pub fn status_class(status: TxStatus) -> &'static str {
    match status {
        TxStatus::Success => "success",
        TxStatus::Pending => "pending",
        TxStatus::Failure => "failure",
    }
}

pub fn big_transfer_row(tx: &BigTransfer) -> BigTransferRow {
    BigTransferRow {
        value: format!("${}", format::usd_whole(tx.value)),
        address: format::truncate_address(&tx.address),
        time: tx.time.clone(),
    }
}

pub fn recent_transaction_row(tx: &RecentTransaction, tx_base_url: &str) -> RecentTransactionRow {
    RecentTransactionRow {
        status: tx.status,
        class: status_class(tx.status),
        icon: status_icon(tx.status),
        hash: format::truncate_hash(&tx.hash),
        value: format!("${}", format::usd_cents(tx.value)),
        time: tx.time.clone(),
        link: format!("{}{}", tx_base_url, tx.hash),
    }
}

/// Renderer backing the served page. Each write replaces one region.
pub struct PageRenderer {
    page: Mutex<Page>,
    tx_base_url: String,
}

impl PageRenderer {
    pub fn new(tx_base_url: impl Into<String>) -> Self {
        Self {
            page: Mutex::new(Page::default()),
            tx_base_url: tx_base_url.into(),
        }
    }

    pub fn snapshot(&self) -> Page {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Page> {
        // a panicked writer leaves whole regions behind, never half of one
        self.page.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Renderer for PageRenderer {
    fn market_cap(&self, value: f64) {
        self.lock().usdc_market_cap = format::market_cap(value);
    }

    fn block_height(&self, height: u64) {
        self.lock().current_block = format::group_u64(height);
    }

    fn total_transactions(&self, count: u64) {
        self.lock().total_transactions = format::group_u64(count);
    }

    fn finality_time(&self, seconds: f64) {
        self.lock().finality_time = format::finality(seconds);
    }

    fn big_transfers(&self, feed: &Sourced<Vec<BigTransfer>>) {
        let rows = feed.data.iter().take(MAX_BIG_TRANSFERS).map(big_transfer_row).collect();
        self.lock().big_transactions = rows;
    }

    fn recent_transactions(&self, feed: &Sourced<Vec<RecentTransaction>>) {
        let region = RecentTransactionsRegion {
            warning: feed.is_fallback().then(|| FALLBACK_WARNING.to_string()),
            rows: feed
                .data
                .iter()
                .take(MAX_RECENT_TRANSACTIONS)
                .map(|tx| recent_transaction_row(tx, &self.tx_base_url))
                .collect(),
        };
        self.lock().recent_transactions = region;
    }
}
