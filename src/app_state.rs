// =============================================================================
// Application State: shared, read-only handles for the HTTP layer
// =============================================================================
//
// Nothing in here mutates after startup: the loaded configuration plus one
// client per upstream. Each client wraps a pooled `reqwest::Client`, so
// concurrent requests share connections but no request data.
// =============================================================================

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use crate::coingecko::CoinGeckoClient;
use crate::cryptopanic::CryptoPanicClient;
use crate::market_data::{NewsSource, PriceHistorySource};
use crate::service_config::ServiceConfig;

/// State shared across all handlers via `Arc<AppState>`.
pub struct AppState {
    pub config: ServiceConfig,
    pub prices: Arc<dyn PriceHistorySource>,
    pub news: Arc<dyn NewsSource>,
}

impl AppState {
    pub fn new(
        config: ServiceConfig,
        prices: Arc<dyn PriceHistorySource>,
        news: Arc<dyn NewsSource>,
    ) -> Self {
        Self {
            config,
            prices,
            news,
        }
    }

    /// Build the production state with live CoinGecko and CryptoPanic clients.
    pub fn from_config(config: ServiceConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.request_timeout_secs);

        let prices = CoinGeckoClient::new(
            &config.coingecko_base_url,
            &config.coingecko_api_key,
            config.vs_currency.clone(),
            timeout,
        )?;
        let news = CryptoPanicClient::new(
            &config.cryptopanic_base_url,
            config.cryptopanic_api_key.clone(),
            timeout,
        )?;

        Ok(Self::new(config, Arc::new(prices), Arc::new(news)))
    }
}
