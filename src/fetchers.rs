// src/fetchers.rs
//! The five metric fetchers. Market cap and block height report failures so
//! the page keeps its previous value; the other three absorb failures into
//! their static fallback data.
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::FetchError;
use crate::fallback;
use crate::models::{MetricUpdate, Sourced};
use crate::parser::{self, ItemsPage, PriceResponse, RawTokenTransfer, RawTransaction, StatsCounters};
use crate::rpc;

pub const BIG_TRANSFER_SCAN_LIMIT: &str = "100";
pub const RECENT_TX_LIMIT: &str = "10";

#[async_trait]
pub trait MetricFetcher: Send + Sync {
    fn name(&self) -> &'static str;
    async fn fetch(&self) -> Result<MetricUpdate, FetchError>;
}

pub struct MarketCapFetcher {
    client: Client,
    url: String,
}

impl MarketCapFetcher {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self { client, url: url.into() }
    }
}

#[async_trait]
impl MetricFetcher for MarketCapFetcher {
    fn name(&self) -> &'static str {
        "market-cap"
    }

    async fn fetch(&self) -> Result<MetricUpdate, FetchError> {
        let body: PriceResponse = rpc::get_json(&self.client, &self.url, &[]).await?;
        let cap = body
            .market_cap()
            .ok_or_else(|| FetchError::malformed("usd-coin.usd_market_cap missing"))?;
        Ok(MetricUpdate::MarketCap(cap))
    }
}

pub struct BlockHeightFetcher {
    client: Client,
    rpc_url: String,
}

impl BlockHeightFetcher {
    pub fn new(client: Client, rpc_url: impl Into<String>) -> Self {
        Self { client, rpc_url: rpc_url.into() }
    }
}

#[async_trait]
impl MetricFetcher for BlockHeightFetcher {
    fn name(&self) -> &'static str {
        "block-height"
    }

    async fn fetch(&self) -> Result<MetricUpdate, FetchError> {
        let height = rpc::get_block_number(&self.client, &self.rpc_url).await?;
        Ok(MetricUpdate::BlockHeight(height))
    }
}

pub struct TransactionCountFetcher {
    client: Client,
    url: String,
}

impl TransactionCountFetcher {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self { client, url: url.into() }
    }
}

#[async_trait]
impl MetricFetcher for TransactionCountFetcher {
    fn name(&self) -> &'static str {
        "total-transactions"
    }

    async fn fetch(&self) -> Result<MetricUpdate, FetchError> {
        let count = match rpc::get_json::<StatsCounters>(&self.client, &self.url, &[]).await {
            Ok(counters) => counters.transaction_count(),
            Err(e) => {
                debug!("Stats counters unavailable: {}", e);
                0
            }
        };

        // zero means missing or failed; both land on the fallback total
        let count = if count == 0 { fallback::TOTAL_TRANSACTIONS } else { count };
        Ok(MetricUpdate::TotalTransactions(count))
    }
}

pub struct BigTransferFetcher {
    client: Client,
    url: String,
}

impl BigTransferFetcher {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self { client, url: url.into() }
    }
}

#[async_trait]
impl MetricFetcher for BigTransferFetcher {
    fn name(&self) -> &'static str {
        "big-transfers"
    }

    async fn fetch(&self) -> Result<MetricUpdate, FetchError> {
        let query = [("limit", BIG_TRANSFER_SCAN_LIMIT), ("sort", "desc")];
        let transfers = match rpc::get_json::<ItemsPage<RawTokenTransfer>>(&self.client, &self.url, &query).await {
            Ok(page) => {
                let picked = parser::big_transfers(&page.items);
                info!("Big transfers: {} of {} items above threshold", picked.len(), page.items.len());
                picked
            }
            Err(e) => {
                warn!("Failed to fetch Big Transfers (ARCScan). Using Fallback. ({})", e);
                Vec::new()
            }
        };

        let feed = if transfers.is_empty() {
            Sourced::fallback(fallback::big_transfers())
        } else {
            Sourced::live(transfers)
        };
        Ok(MetricUpdate::BigTransfers(feed))
    }
}

pub struct RecentTransactionFetcher {
    client: Client,
    url: String,
}

impl RecentTransactionFetcher {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self { client, url: url.into() }
    }
}

#[async_trait]
impl MetricFetcher for RecentTransactionFetcher {
    fn name(&self) -> &'static str {
        "recent-transactions"
    }

    async fn fetch(&self) -> Result<MetricUpdate, FetchError> {
        let query = [("limit", RECENT_TX_LIMIT), ("sort", "desc")];
        let txs = match rpc::get_json::<ItemsPage<RawTransaction>>(&self.client, &self.url, &query).await {
            Ok(page) => parser::recent_transactions(&page.items),
            Err(e) => {
                warn!("Failed to fetch Recent Transactions (ARCScan). Using Fallback. ({})", e);
                Vec::new()
            }
        };

        let feed = if txs.is_empty() {
            Sourced::fallback(fallback::recent_transactions())
        } else {
            Sourced::live(txs)
        };
        Ok(MetricUpdate::RecentTransactions(feed))
    }
}

/// All five fetchers, in the order a poll cycle runs them.
pub fn from_config(cfg: &Config, client: &Client) -> Vec<Box<dyn MetricFetcher>> {
    vec![
        Box::new(MarketCapFetcher::new(client.clone(), &cfg.price_api_url)),
        Box::new(BlockHeightFetcher::new(client.clone(), &cfg.rpc_http_url)),
        Box::new(TransactionCountFetcher::new(client.clone(), cfg.stats_counters_url())),
        Box::new(BigTransferFetcher::new(client.clone(), cfg.token_transfers_url())),
        Box::new(RecentTransactionFetcher::new(client.clone(), cfg.transactions_url())),
    ]
}
