// =============================================================================
// REST API Endpoints: Axum 0.7
// =============================================================================
//
//   GET /api/health            liveness check
//   GET /api/data              prices, timestamps, RSI series, recommendation
//   GET /api/future-insights   plain-language insight for the same window
//   GET /api/news              latest headlines for a coin
//
// `coin` and `days` are optional; defaults come from `ServiceConfig`. Price
// endpoints take CoinGecko coin ids, the news endpoint takes tickers (coin ids
// are translated through `news_symbols`).
//
// CORS is open to any origin; there is no authentication.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Json, Query, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::app_state::AppState;
use crate::market_data::PriceSeries;
use crate::signals::RsiAnalysis;
use crate::types::{NewsItem, Recommendation};

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS, request tracing and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/data", get(market_data))
        .route("/api/future-insights", get(future_insights))
        .route("/api/news", get(news))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Query parameters
// =============================================================================

#[derive(Debug, Deserialize)]
struct MarketQuery {
    coin: Option<String>,
    days: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct NewsQuery {
    coin: Option<String>,
}

/// Coin id and lookback window after defaults are applied.
#[derive(Debug, Clone, PartialEq)]
struct MarketParams {
    coin_id: String,
    days: u32,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn market_params(
    state: &AppState,
    query: Result<Query<MarketQuery>, QueryRejection>,
) -> ApiResult<MarketParams> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let days = query.days.unwrap_or(state.config.default_days);
    if days == 0 {
        return Err(ApiError::BadRequest("days must be at least 1".to_string()));
    }

    let coin_id = non_blank(query.coin.as_deref())
        .unwrap_or(&state.config.default_coin_id)
        .to_string();

    Ok(MarketParams { coin_id, days })
}

async fn fetch_prices(state: &AppState, params: &MarketParams) -> ApiResult<PriceSeries> {
    state
        .prices
        .price_history(&params.coin_id, params.days)
        .await
        .map_err(|e| {
            warn!(
                coin = %params.coin_id,
                days = params.days,
                error = %format!("{e:#}"),
                "price history fetch failed"
            );
            ApiError::PriceDataUnavailable
        })
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    server_time: i64,
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        server_time: chrono::Utc::now().timestamp_millis(),
    })
}

// =============================================================================
// Market snapshot
// =============================================================================

#[derive(Debug, Serialize)]
struct MarketSnapshot {
    prices: Vec<f64>,
    timestamps: Vec<i64>,
    rsi: Vec<f64>,
    recommendation: Recommendation,
}

async fn market_data(
    State(state): State<Arc<AppState>>,
    query: Result<Query<MarketQuery>, QueryRejection>,
) -> ApiResult<Json<MarketSnapshot>> {
    let params = market_params(&state, query)?;
    let series = fetch_prices(&state, &params).await?;

    let prices = series.prices();
    let analysis = RsiAnalysis::compute(&prices, state.config.rsi_period).inspect_err(|e| {
        warn!(coin = %params.coin_id, days = params.days, error = %e, "rsi analysis rejected");
    })?;

    info!(
        coin = %params.coin_id,
        days = params.days,
        points = prices.len(),
        latest_rsi = analysis.latest_rsi,
        recommendation = %analysis.recommendation,
        "market snapshot served"
    );

    Ok(Json(MarketSnapshot {
        timestamps: series.timestamps(),
        prices,
        rsi: analysis.rsi,
        recommendation: analysis.recommendation,
    }))
}

// =============================================================================
// Insights
// =============================================================================

#[derive(Debug, Serialize)]
struct InsightResponse {
    insights: String,
}

async fn future_insights(
    State(state): State<Arc<AppState>>,
    query: Result<Query<MarketQuery>, QueryRejection>,
) -> ApiResult<Json<InsightResponse>> {
    let params = market_params(&state, query)?;
    let series = fetch_prices(&state, &params).await?;

    let prices = series.prices();
    let insights = RsiAnalysis::compute(&prices, state.config.rsi_period)
        .and_then(|analysis| analysis.insight(&prices))
        .inspect_err(|e| {
            warn!(coin = %params.coin_id, days = params.days, error = %e, "insight rejected");
        })?;

    info!(coin = %params.coin_id, days = params.days, "insight served");
    Ok(Json(InsightResponse { insights }))
}

// =============================================================================
// News
// =============================================================================

#[derive(Debug, Serialize)]
struct NewsResponse {
    news: Vec<NewsItem>,
}

async fn news(
    State(state): State<Arc<AppState>>,
    query: Result<Query<NewsQuery>, QueryRejection>,
) -> ApiResult<Json<NewsResponse>> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let symbol = match non_blank(query.coin.as_deref()) {
        Some(coin) => state.config.news_symbol_for(coin),
        None => state.config.default_news_symbol.clone(),
    };

    let news = state.news.latest_news(&symbol).await.map_err(|e| {
        warn!(symbol = %symbol, error = %format!("{e:#}"), "news fetch failed");
        ApiError::NewsUnavailable
    })?;

    info!(symbol = %symbol, count = news.len(), "news served");
    Ok(Json(NewsResponse { news }))
}
