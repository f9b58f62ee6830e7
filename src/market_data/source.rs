// =============================================================================
// Upstream data sources
// =============================================================================
//
// The HTTP layer only talks to these traits, so handlers can be exercised
// against in-process stubs. Futures are boxed to keep the traits object-safe
// (`Arc<dyn PriceHistorySource>` lives in `AppState`).

use std::future::Future;
use std::pin::Pin;

use crate::market_data::PriceSeries;
use crate::types::NewsItem;

pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = anyhow::Result<T>> + Send + 'a>>;

/// Historical prices for a coin over the last `days` days.
pub trait PriceHistorySource: Send + Sync {
    /// Fails on a non-success upstream status, an undecodable body, or a
    /// payload without any usable price points.
    fn price_history<'a>(&'a self, coin_id: &'a str, days: u32) -> SourceFuture<'a, PriceSeries>;
}

/// Recent headlines filtered by ticker symbol (e.g. `DOGE`).
pub trait NewsSource: Send + Sync {
    /// Fails on a non-success upstream status, an undecodable body, or an
    /// empty result list.
    fn latest_news<'a>(&'a self, symbol: &'a str) -> SourceFuture<'a, Vec<NewsItem>>;
}
