// src/parser.rs
//! Raw explorer / price-index payloads and their normalization into models.
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;

use crate::format;
use crate::models::{BigTransfer, RecentTransaction, TxStatus};

pub const USDC_SYMBOL: &str = "USDC";
pub const USDC_DECIMALS: u32 = 6;
/// Minimum USD amount for the big-transfer feed
pub const INSTITUTIONAL_LIMIT: u64 = 1_000;

const UNKNOWN_SENDER: &str = "0x000...ARC";
const UNKNOWN_TX_HASH: &str = "0xARC-TX-HASH";
const JUST_NOW: &str = "Just now";

#[derive(Debug, Deserialize)]
pub struct PriceResponse {
    #[serde(rename = "usd-coin")]
    pub usd_coin: Option<CoinQuote>,
}

#[derive(Debug, Deserialize)]
pub struct CoinQuote {
    pub usd_market_cap: Option<f64>,
}

impl PriceResponse {
    pub fn market_cap(&self) -> Option<f64> {
        self.usd_coin
            .as_ref()?
            .usd_market_cap
            .filter(|cap| cap.is_finite() && *cap >= 0.0)
    }
}

#[derive(Debug, Deserialize)]
pub struct StatsCounters {
    #[serde(default)]
    pub transactions_count: Option<Value>,
    #[serde(default)]
    pub total_transactions: Option<Value>,
}

impl StatsCounters {
    /// First truthy counter field, read only if it is a JSON number.
    /// Anything else, numeric strings included, yields 0.
    pub fn transaction_count(&self) -> u64 {
        [&self.transactions_count, &self.total_transactions]
            .into_iter()
            .flatten()
            .find(|v| is_populated(v))
            .and_then(count_from_value)
            .unwrap_or(0)
    }
}

fn is_populated(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Bool(b) => *b,
        Value::Null => false,
        _ => true,
    }
}

fn count_from_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
                .map(|f| f as u64)
        }),
        _ => None,
    }
}

/// Paged list envelope used by the explorer (`{"items": [...]}`).
#[derive(Debug, Deserialize)]
pub struct ItemsPage<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct AddressRef {
    pub hash: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TokenRef {
    pub symbol: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawTokenTransfer {
    pub token: Option<TokenRef>,
    /// Raw integer amount: a string, a number, or `{"value": "..."}`.
    pub total: Option<Value>,
    pub timestamp: Option<String>,
    pub from: Option<AddressRef>,
}

impl RawTokenTransfer {
    pub fn symbol(&self) -> Option<&str> {
        self.token.as_ref()?.symbol.as_deref()
    }

    /// Amount in whole USDC (raw / 10^6).
    pub fn decimal_amount(&self) -> Option<Decimal> {
        let raw = raw_amount(self.total.as_ref()?)?;
        raw.checked_div(Decimal::from(10u64.pow(USDC_DECIMALS)))
    }
}

fn raw_amount(total: &Value) -> Option<Decimal> {
    match total {
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        Value::Object(map) => raw_amount(map.get("value")?),
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
pub struct RawTransaction {
    pub hash: Option<String>,
    pub value: Option<Value>,
    pub timestamp: Option<String>,
    pub status: Option<String>,
}

/// Keep USDC transfers at or above the institutional limit, in API order.
pub fn big_transfers(items: &[RawTokenTransfer]) -> Vec<BigTransfer> {
    let limit = Decimal::from(INSTITUTIONAL_LIMIT);
    items
        .iter()
        .filter(|tx| tx.symbol() == Some(USDC_SYMBOL))
        .filter_map(|tx| {
            let value = tx.decimal_amount()?;
            if value < limit {
                return None;
            }
            let address = tx
                .from
                .as_ref()
                .and_then(|f| f.hash.clone())
                .filter(|h| !h.is_empty())
                .unwrap_or_else(|| UNKNOWN_SENDER.to_string());
            Some(BigTransfer {
                value,
                address,
                time: display_time(tx.timestamp.as_deref()),
            })
        })
        .collect()
}

pub fn recent_transactions(items: &[RawTransaction]) -> Vec<RecentTransaction> {
    items
        .iter()
        .map(|tx| RecentTransaction {
            hash: tx
                .hash
                .clone()
                .filter(|h| !h.is_empty())
                .unwrap_or_else(|| UNKNOWN_TX_HASH.to_string()),
            value: tx.value.as_ref().map(numeric_value).unwrap_or(0.0),
            time: display_time(tx.timestamp.as_deref()),
            status: TxStatus::from_explorer(tx.status.as_deref()),
        })
        .collect()
}

/// Lenient number coercion; anything non-numeric becomes 0.
fn numeric_value(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if s.trim().is_empty() => Some(0.0),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite()).unwrap_or(0.0)
}

fn display_time(timestamp: Option<&str>) -> String {
    timestamp
        .and_then(format::local_time)
        .unwrap_or_else(|| JUST_NOW.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn transfer(symbol: &str, total: Value) -> RawTokenTransfer {
        serde_json::from_value(json!({
            "token": { "symbol": symbol },
            "total": total,
            "timestamp": "2025-03-01T10:15:30.000000Z",
            "from": { "hash": "0xfeedfacecafebeef0000" }
        }))
        .unwrap()
    }

    #[test]
    fn usdc_threshold_is_inclusive_after_decimals() {
        let items = vec![
            transfer("USDC", json!("2000000000")),
            transfer("USDC", json!("500000000")),
            transfer("USDC", json!("1000000000")),
        ];
        let picked = big_transfers(&items);
        assert_eq!(picked.len(), 2);
        assert_eq!(picked[0].value, Decimal::from(2000));
        assert_eq!(picked[1].value, Decimal::from(1000));
        assert_eq!(picked[0].address, "0xfeedfacecafebeef0000");
    }

    #[test]
    fn other_tokens_are_ignored() {
        let items = vec![transfer("EURC", json!("9000000000")), transfer("usdc", json!("9000000000"))];
        assert!(big_transfers(&items).is_empty());
    }

    #[test]
    fn total_accepts_number_and_object_shapes() {
        let items = vec![
            transfer("USDC", json!(3_000_000_000u64)),
            transfer("USDC", json!({ "decimals": "6", "value": "4000000000" })),
            transfer("USDC", json!("not-a-number")),
        ];
        let picked = big_transfers(&items);
        assert_eq!(picked.len(), 2);
        assert_eq!(picked[1].value, Decimal::from(4000));
    }

    #[test]
    fn missing_sender_and_timestamp_get_placeholders() {
        let raw: RawTokenTransfer = serde_json::from_value(json!({
            "token": { "symbol": "USDC" },
            "total": "1500000000"
        }))
        .unwrap();
        let picked = big_transfers(&[raw]);
        assert_eq!(picked[0].address, "0x000...ARC");
        assert_eq!(picked[0].time, "Just now");
    }

    #[test]
    fn transaction_status_maps_ok_only() {
        let items: Vec<RawTransaction> = serde_json::from_value(json!([
            { "hash": "0xaaa", "value": "12.5", "timestamp": "2025-03-01T10:15:30Z", "status": "ok" },
            { "hash": "0xbbb", "value": "abc", "status": "error" },
            { "value": 7 }
        ]))
        .unwrap();
        let txs = recent_transactions(&items);
        assert_eq!(txs[0].status, TxStatus::Success);
        assert_eq!(txs[0].value, 12.5);
        assert_eq!(txs[1].status, TxStatus::Failure);
        assert_eq!(txs[1].value, 0.0);
        assert_eq!(txs[1].time, "Just now");
        assert_eq!(txs[2].hash, "0xARC-TX-HASH");
        assert_eq!(txs[2].status, TxStatus::Failure);
        assert_eq!(txs[2].value, 7.0);
    }

    #[test]
    fn counters_prefer_transactions_count() {
        let c: StatsCounters =
            serde_json::from_value(json!({ "transactions_count": 42, "total_transactions": 7 })).unwrap();
        assert_eq!(c.transaction_count(), 42);

        let c: StatsCounters =
            serde_json::from_value(json!({ "transactions_count": 0, "total_transactions": 99 })).unwrap();
        assert_eq!(c.transaction_count(), 99);

        let c: StatsCounters =
            serde_json::from_value(json!({ "transactions_count": "", "total_transactions": 12 })).unwrap();
        assert_eq!(c.transaction_count(), 12);

        let c: StatsCounters = serde_json::from_value(json!({ "total_transactions": "lots" })).unwrap();
        assert_eq!(c.transaction_count(), 0);

        let c: StatsCounters = serde_json::from_value(json!({})).unwrap();
        assert_eq!(c.transaction_count(), 0);
    }

    #[test]
    fn string_counters_are_not_numbers() {
        let c: StatsCounters = serde_json::from_value(json!({ "transactions_count": "2345678" })).unwrap();
        assert_eq!(c.transaction_count(), 0);

        // a truthy string wins over a later numeric field, then fails the number check
        let c: StatsCounters =
            serde_json::from_value(json!({ "transactions_count": "2345678", "total_transactions": 42 })).unwrap();
        assert_eq!(c.transaction_count(), 0);
    }

    #[test]
    fn market_cap_requires_the_nested_field() {
        let p: PriceResponse =
            serde_json::from_value(json!({ "usd-coin": { "usd": 1.0, "usd_market_cap": 6.1e10 } })).unwrap();
        assert_eq!(p.market_cap(), Some(6.1e10));

        let p: PriceResponse = serde_json::from_value(json!({ "usd-coin": { "usd": 1.0 } })).unwrap();
        assert_eq!(p.market_cap(), None);

        let p: PriceResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(p.market_cap(), None);
    }
}
