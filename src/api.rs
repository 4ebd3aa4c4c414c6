use axum::{
    extract::{Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::{fmt::Write, net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::render::{Page, PageRenderer};
use crate::search::{self, SearchOutcome};

const REFRESH_SECS: u64 = 10;
pub const UNUSABLE_QUERY_ALERT: &str = "Search text contains characters that cannot be used in an explorer link.";

#[derive(Clone)]
pub struct AppState {
    pub renderer: Arc<PageRenderer>,
    pub explorer_base_url: String,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Serialize)]
struct AlertResponse {
    alert: &'static str,
}

pub fn app_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/api/metrics", get(metrics))
        .route("/search", get(search_handler))
        .route("/health", get(|| async { Json(HealthResponse { status: "ok" }) }))
        .layer(cors)
        .with_state(state)
}

pub async fn serve(port: u16, state: AppState) -> eyre::Result<()> {
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    info!("Dashboard listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app_router(state).into_make_service()).await?;

    Ok(())
}

async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_html(&state.renderer.snapshot()))
}

async fn metrics(State(state): State<AppState>) -> Json<Page> {
    Json(state.renderer.snapshot())
}

async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchQuery>) -> Response {
    match search::dispatch(&state.explorer_base_url, &params.q) {
        SearchOutcome::Navigate(url) => match HeaderValue::try_from(&url) {
            Ok(location) => {
                info!("Search → {}", url);
                (StatusCode::SEE_OTHER, [(header::LOCATION, location)]).into_response()
            }
            Err(e) => {
                warn!("Search target {:?} is not a valid Location: {}", url, e);
                alert_response(UNUSABLE_QUERY_ALERT)
            }
        },
        SearchOutcome::Alert(alert) => alert_response(alert),
    }
}

fn alert_response(alert: &'static str) -> Response {
    (StatusCode::BAD_REQUEST, Json(AlertResponse { alert })).into_response()
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Full dashboard page. Element ids match the regions the renderer owns.
pub fn render_html(page: &Page) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta http-equiv="refresh" content="{refresh}">
<title>ARC Network Dashboard</title>
</head>
<body>
<form action="/search" method="get" target="_blank">
<input id="searchInput" name="q" type="text" placeholder="Wallet, contract, or domain">
<button type="submit">Search</button>
</form>
<p>USDC Market Cap: <span id="usdc-market-cap">{cap}</span></p>
<p>Current Block: <span id="current-block">{block}</span></p>
<p>Total Transactions: <span id="total-transactions">{total}</span></p>
<p>Finality: <span id="tempo-finalidade">{finality}</span></p>
<div id="big-transactions"><ul>
"#,
        refresh = REFRESH_SECS,
        cap = escape(&page.usdc_market_cap),
        block = escape(&page.current_block),
        total = escape(&page.total_transactions),
        finality = escape(&page.finality_time),
    );

    for row in &page.big_transactions {
        let _ = writeln!(
            html,
            r#"<li><strong>Value: {}</strong> <span class="tx-address">Address: {}</span> <span class="tx-time">{}</span></li>"#,
            escape(&row.value),
            escape(&row.address),
            escape(&row.time),
        );
    }
    html.push_str("</ul></div>\n<div id=\"recent-transactions-list\">\n");

    if let Some(warning) = &page.recent_transactions.warning {
        let _ = writeln!(html, r#"<p class="fallback-warning">{}</p>"#, escape(warning));
    }
    html.push_str("<ul class=\"transaction-list\">\n");
    for row in &page.recent_transactions.rows {
        let _ = writeln!(
            html,
            r#"<li class="transaction-item {class}"><a href="{link}" target="_blank"><span class="tx-status-icon"><i class="fas {icon}"></i></span> <span class="tx-hash">{hash}</span> <span class="tx-value">{value}</span> <span class="tx-timestamp">{time}</span></a></li>"#,
            class = row.class,
            link = escape(&row.link),
            icon = row.icon,
            hash = escape(&row.hash),
            value = escape(&row.value),
            time = escape(&row.time),
        );
    }
    html.push_str("</ul>\n</div>\n</body>\n</html>\n");
    html
}
