use dotenvy::dotenv;
use std::{env, time::Duration};
use tracing::info;

pub const DEFAULT_RPC_URL: &str = "https://rpc.testnet.arc.network/";
pub const DEFAULT_PRICE_API_URL: &str =
    "https://api.coingecko.com/api/v3/simple/price?ids=usd-coin&vs_currencies=usd&include_market_cap=true";
pub const DEFAULT_EXPLORER_API_URL: &str = "https://testnet.arcscan.app/api/v2";
pub const DEFAULT_EXPLORER_BASE_URL: &str = "https://testnet.arcscan.app";

#[derive(Debug, Clone)]
pub struct Config {
    pub rpc_http_url: String,       // JSON-RPC endpoint for eth_blockNumber
    pub price_api_url: String,      // CoinGecko simple/price with market cap
    pub explorer_api_url: String,   // ARCScan REST v2 root
    pub explorer_base_url: String,  // ARCScan web UI, used for links and search
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub port: u16,
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a non-negative integer, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
    #[error("POLL_INTERVAL_MS must be greater than zero")]
    ZeroPollInterval,
}

impl Config {
    pub fn stats_counters_url(&self) -> String {
        format!("{}/stats/counters", self.explorer_api_url)
    }

    pub fn token_transfers_url(&self) -> String {
        format!("{}/token-transfers", self.explorer_api_url)
    }

    pub fn transactions_url(&self) -> String {
        format!("{}/transactions", self.explorer_api_url)
    }

    /// Detail page prefix; a transaction hash is appended as-is.
    pub fn tx_base_url(&self) -> String {
        format!("{}/tx/", self.explorer_base_url)
    }

    /// Build from any key lookup; `load` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        // RPC URL (ARC_RPC_URL is accepted as an alias)
        let rpc_http_url = var("RPC_HTTP_URL")
            .or_else(|| var("ARC_RPC_URL"))
            .unwrap_or_else(|| DEFAULT_RPC_URL.to_string());

        let price_api_url = var("PRICE_API_URL").unwrap_or_else(|| DEFAULT_PRICE_API_URL.to_string());

        let explorer_api_url = var("EXPLORER_API_URL")
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_EXPLORER_API_URL.to_string());

        let explorer_base_url = var("EXPLORER_BASE_URL")
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_EXPLORER_BASE_URL.to_string());

        let poll_ms: u64 = parse_number("POLL_INTERVAL_MS", var("POLL_INTERVAL_MS"), 10_000)?;
        if poll_ms == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        let timeout_secs: u64 = parse_number("REQUEST_TIMEOUT_SECS", var("REQUEST_TIMEOUT_SECS"), 10)?;
        let port: u16 = parse_number("PORT", var("PORT"), 8080)?;

        Ok(Config {
            rpc_http_url,
            price_api_url,
            explorer_api_url,
            explorer_base_url,
            poll_interval: Duration::from_millis(poll_ms),
            request_timeout: Duration::from_secs(timeout_secs),
            port,
        })
    }
}

fn parse_number<T: std::str::FromStr>(
    name: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
    }
}

pub fn load() -> eyre::Result<Config> {
    dotenv().ok(); // .env is optional

    let cfg = Config::from_lookup(|key| env::var(key).ok())?;
    info!("Loaded config: {:?}", cfg);
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn cfg_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_match_public_endpoints() {
        let cfg = cfg_from(&[]).unwrap();
        assert_eq!(cfg.rpc_http_url, DEFAULT_RPC_URL);
        assert_eq!(cfg.poll_interval, Duration::from_millis(10_000));
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.stats_counters_url(), "https://testnet.arcscan.app/api/v2/stats/counters");
        assert_eq!(cfg.token_transfers_url(), "https://testnet.arcscan.app/api/v2/token-transfers");
        assert_eq!(cfg.transactions_url(), "https://testnet.arcscan.app/api/v2/transactions");
        assert_eq!(cfg.tx_base_url(), "https://testnet.arcscan.app/tx/");
    }

    #[test]
    fn overrides_and_alias() {
        let cfg = cfg_from(&[
            ("ARC_RPC_URL", "http://localhost:8545"),
            ("EXPLORER_API_URL", "http://127.0.0.1:9000/api/v2/"),
            ("POLL_INTERVAL_MS", "250"),
            ("PORT", "3000"),
        ])
        .unwrap();
        assert_eq!(cfg.rpc_http_url, "http://localhost:8545");
        assert_eq!(cfg.transactions_url(), "http://127.0.0.1:9000/api/v2/transactions");
        assert_eq!(cfg.poll_interval, Duration::from_millis(250));
        assert_eq!(cfg.port, 3000);
    }

    #[test]
    fn rejects_bad_numbers() {
        assert_eq!(
            cfg_from(&[("PORT", "eighty")]).unwrap_err(),
            ConfigError::InvalidNumber { name: "PORT", value: "eighty".to_string() }
        );
        assert_eq!(cfg_from(&[("POLL_INTERVAL_MS", "0")]).unwrap_err(), ConfigError::ZeroPollInterval);
    }
}
