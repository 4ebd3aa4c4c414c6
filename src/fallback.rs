// src/fallback.rs
//! Static presentation data shown before the first poll and whenever a feed
//! has nothing usable.

use rust_decimal::Decimal;

use crate::models::{BigTransfer, RecentTransaction, TxStatus};

pub const USDC_MARKET_CAP: f64 = 55_000_000_000.0;
pub const BLOCK_HEIGHT: u64 = 14_661_297;
pub const TOTAL_TRANSACTIONS: u64 = 145_890;

/// Expected confirmation latency in seconds. Displayed, never fetched.
pub const FINALITY_TIME_SECS: f64 = 1.5;

pub fn big_transfers() -> Vec<BigTransfer> {
    [
        (500_000, "0x1A2B...A9C1", "5 mins ago"),
        (12_500, "0x3C4D...F8E2", "15 mins ago"),
        (2_500, "0x5E6F...G7H3", "30 mins ago"),
    ]
    .into_iter()
    .map(|(value, address, time)| BigTransfer {
        value: Decimal::from(value),
        address: address.to_string(),
        time: time.to_string(),
    })
    .collect()
}

pub fn recent_transactions() -> Vec<RecentTransaction> {
    [
        ("0x6d9f8e404f1234567890abcdef1234567890abcdef", 500.0, "2 seconds ago", TxStatus::Success),
        ("0x1a2b3c4d5e6f7a8b9c0d1e2f3a4b5c6d7e8f9012", 12_000.0, "25 seconds ago", TxStatus::Success),
        ("0x3e4f5a6b7c8d9e0f1a2b3c4d5e6f7a8b9c0d1e2f", 15.5, "45 seconds ago", TxStatus::Pending),
        ("0x8g9h0i1j2k3l4m5n6o7p8q9r0s1t2u3v4w5x6y7z", 980_000.0, "1 minute ago", TxStatus::Success),
        ("0x9h0i1j2k3l4m5n6o7p8q9r0s1t2u3v4w5x6y7z8a", 100.0, "1 minute ago", TxStatus::Failure),
    ]
    .into_iter()
    .map(|(hash, value, time, status)| RecentTransaction {
        hash: hash.to_string(),
        value,
        time: time.to_string(),
        status,
    })
    .collect()
}
