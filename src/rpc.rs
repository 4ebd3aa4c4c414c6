// src/rpc.rs
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use crate::error::FetchError;

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    #[allow(dead_code)]
    #[serde(default)]
    jsonrpc: Option<String>,
    #[allow(dead_code)]
    #[serde(default)]
    id: Option<serde_json::Value>,
    result: Option<T>,
}

/// Shared client; every request inherits the timeout.
pub fn build_client(timeout: Duration) -> Result<Client, FetchError> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// GET `url` with optional query pairs and decode the JSON body.
pub async fn get_json<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    query: &[(&str, &str)],
) -> Result<T, FetchError> {
    debug!("📡 GET {} {:?}", url, query);

    let resp = client.get(url).query(query).send().await?;
    if !resp.status().is_success() {
        return Err(FetchError::Status(resp.status()));
    }
    let text = resp.text().await?;
    debug!("📩 Raw response from {}: {} bytes", url, text.len());

    Ok(serde_json::from_str(&text)?)
}

/// Parse a hex quantity such as `0xdfb5a1` (prefix optional).
pub fn parse_hex_quantity(raw: &str) -> Result<u64, FetchError> {
    let digits = raw.trim();
    let digits = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .unwrap_or(digits);
    u64::from_str_radix(digits, 16)
        .map_err(|e| FetchError::malformed(format!("bad hex quantity {:?}: {}", raw, e)))
}

/// Latest block number via `eth_blockNumber`
pub async fn get_block_number(client: &Client, rpc_url: &str) -> Result<u64, FetchError> {
    let payload = json!({
        "jsonrpc": "2.0",
        "method": "eth_blockNumber",
        "params": [],
        "id": 1
    });

    debug!("📡 Sending eth_blockNumber → {}", rpc_url);

    let resp = client.post(rpc_url).json(&payload).send().await?;
    let text = resp.text().await?;
    debug!("📩 Raw blockNumber response: {}", text);

    let parsed: RpcResponse<String> = serde_json::from_str(&text)?;
    let result = parsed
        .result
        .ok_or_else(|| FetchError::malformed("eth_blockNumber response has no result"))?;
    parse_hex_quantity(&result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_quantity_with_and_without_prefix() {
        assert_eq!(parse_hex_quantity("0xdfb5a1").unwrap(), 14_661_025);
        assert_eq!(parse_hex_quantity("dfb5a1").unwrap(), 14_661_025);
        assert_eq!(parse_hex_quantity("0x0").unwrap(), 0);
    }

    #[test]
    fn hex_quantity_rejects_junk() {
        assert!(matches!(parse_hex_quantity("0xzz"), Err(FetchError::Malformed(_))));
        assert!(parse_hex_quantity("").is_err());
    }
}
