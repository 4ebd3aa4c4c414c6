// src/search.rs
pub const EMPTY_QUERY_ALERT: &str = "Please enter a wallet, contract, or domain name.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Nothing to look up; tell the user and stay put.
    Alert(&'static str),
    /// Open this explorer page in a new browsing context.
    Navigate(String),
}

/// Every query is treated as an address. The query is interpolated verbatim,
/// without percent-encoding.
pub fn dispatch(explorer_base_url: &str, query: &str) -> SearchOutcome {
    let query = query.trim();
    if query.is_empty() {
        return SearchOutcome::Alert(EMPTY_QUERY_ALERT);
    }
    SearchOutcome::Navigate(format!("{}/address/{}", explorer_base_url, query))
}
