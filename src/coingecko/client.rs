// =============================================================================
// CoinGecko REST Client: historical market charts
// =============================================================================
//
// GET {base}/coins/{id}/market_chart?vs_currency={vs}&days={n}
//
// Response shape (only `prices` is consumed):
//   { "prices": [[1711929600000, 0.2101], ...], "market_caps": [...], ... }
//
// The optional demo key is sent as the `x-cg-demo-api-key` header and is
// never logged.
// =============================================================================

use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Url;
use tracing::{debug, instrument, warn};

use crate::market_data::{PriceHistorySource, PricePoint, PriceSeries, SourceFuture};

/// Longest upstream error body echoed into an error message.
const MAX_ERROR_BODY: usize = 200;

/// CoinGecko public API client.
#[derive(Clone)]
pub struct CoinGeckoClient {
    base_url: Url,
    vs_currency: String,
    client: reqwest::Client,
}

impl CoinGeckoClient {
    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    /// Create a new `CoinGeckoClient`.
    ///
    /// # Arguments
    /// * `base_url`    : API root, e.g. `https://api.coingecko.com/api/v3`.
    /// * `api_key`     : demo key; empty to call the keyless public tier.
    /// * `vs_currency` : quote currency for returned prices.
    /// * `timeout`     : per-request timeout.
    pub fn new(
        base_url: &str,
        api_key: &str,
        vs_currency: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("invalid CoinGecko base url '{base_url}'"))?;

        let mut default_headers = HeaderMap::new();
        if !api_key.is_empty() {
            let val = HeaderValue::from_str(api_key)
                .context("CoinGecko API key is not a valid header value")?;
            default_headers.insert("x-cg-demo-api-key", val);
        }

        let client = reqwest::Client::builder()
            .default_headers(default_headers)
            .timeout(timeout)
            .build()
            .context("failed to build reqwest client for CoinGecko")?;

        debug!(base_url = %base_url, "CoinGeckoClient initialised");

        Ok(Self {
            base_url,
            vs_currency: vs_currency.into(),
            client,
        })
    }

    // -------------------------------------------------------------------------
    // Market data
    // -------------------------------------------------------------------------

    /// GET /coins/{coin_id}/market_chart.
    #[instrument(skip(self), name = "coingecko::market_chart")]
    pub async fn market_chart(&self, coin_id: &str, days: u32) -> Result<PriceSeries> {
        let url = self.endpoint(&["coins", coin_id, "market_chart"])?;
        let days = days.to_string();

        let resp = self
            .client
            .get(url)
            .query(&[("vs_currency", self.vs_currency.as_str()), ("days", days.as_str())])
            .send()
            .await
            .context("GET market_chart request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            bail!(
                "CoinGecko market_chart returned {}: {}",
                status,
                truncate(&body, MAX_ERROR_BODY)
            );
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .context("failed to parse market_chart response")?;

        let series = parse_market_chart(&body)?;
        debug!(coin_id, days = %days, "market chart fetched");
        Ok(series)
    }

    // -------------------------------------------------------------------------
    // Internal helpers
    // -------------------------------------------------------------------------

    /// Append path segments to the base url, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("CoinGecko base url cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

impl PriceHistorySource for CoinGeckoClient {
    fn price_history<'a>(&'a self, coin_id: &'a str, days: u32) -> SourceFuture<'a, PriceSeries> {
        Box::pin(self.market_chart(coin_id, days))
    }
}

impl std::fmt::Debug for CoinGeckoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoinGeckoClient")
            .field("base_url", &self.base_url.as_str())
            .field("vs_currency", &self.vs_currency)
            .finish()
    }
}

/// Decode the `prices` array of a market_chart body.
///
/// Malformed entries are skipped; a missing or empty `prices` field is an
/// error.
pub fn parse_market_chart(body: &serde_json::Value) -> Result<PriceSeries> {
    let raw = body
        .get("prices")
        .and_then(|v| v.as_array())
        .context("market_chart response missing 'prices' array")?;

    if raw.is_empty() {
        bail!("market_chart response has an empty 'prices' array");
    }

    let mut points = Vec::with_capacity(raw.len());
    for entry in raw {
        let Some(pair) = entry.as_array().filter(|a| a.len() >= 2) else {
            warn!(%entry, "skipping malformed market_chart entry");
            continue;
        };

        match (parse_timestamp(&pair[0]), parse_f64(&pair[1])) {
            (Some(timestamp_ms), Some(price)) => points.push(PricePoint {
                timestamp_ms,
                price,
            }),
            _ => warn!(%entry, "skipping market_chart entry with unreadable values"),
        }
    }

    PriceSeries::from_points(points)
}

fn parse_timestamp(val: &serde_json::Value) -> Option<i64> {
    val.as_i64().or_else(|| {
        val.as_f64()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            .map(|f| f as i64)
    })
}

/// Numbers may arrive as JSON numbers or numeric strings.
fn parse_f64(val: &serde_json::Value) -> Option<f64> {
    match val {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
