pub mod api;
pub mod config;
pub mod error;
pub mod fallback;
pub mod fetchers;
pub mod format;
pub mod models;
pub mod parser;
pub mod poller;
pub mod render;
pub mod rpc;
pub mod search;
