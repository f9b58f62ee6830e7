// =============================================================================
// Service Configuration: JSON file + environment overrides
// =============================================================================
//
// Every tunable lives here: bind address, upstream endpoints and keys, the
// default assets for each upstream, and the RSI period.
//
// Load order:
//   1. JSON file (path from COIN_PULSE_CONFIG, default service_config.json).
//      All fields carry `#[serde(default)]`, so a partial file is fine.
//   2. Environment overrides for addresses and secrets.
//   3. `validate()`.
//
// The two upstreams name assets differently: CoinGecko takes lowercase coin
// ids ("dogecoin") while CryptoPanic takes uppercase tickers ("DOGE").
// `news_symbols` maps the former onto the latter.
// =============================================================================

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::indicators::DEFAULT_RSI_PERIOD;

pub const CONFIG_PATH_ENV: &str = "COIN_PULSE_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "service_config.json";

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_bind_addr() -> String {
    "0.0.0.0:5000".to_string()
}

fn default_coingecko_base_url() -> String {
    "https://api.coingecko.com/api/v3".to_string()
}

fn default_cryptopanic_base_url() -> String {
    "https://cryptopanic.com/api/v1".to_string()
}

fn default_vs_currency() -> String {
    "usd".to_string()
}

fn default_coin_id() -> String {
    "dogecoin".to_string()
}

fn default_news_symbol() -> String {
    "DOGE".to_string()
}

fn default_days() -> u32 {
    30
}

fn default_rsi_period() -> usize {
    DEFAULT_RSI_PERIOD
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_news_symbols() -> BTreeMap<String, String> {
    [
        ("dogecoin", "DOGE"),
        ("bitcoin", "BTC"),
        ("ethereum", "ETH"),
        ("ripple", "XRP"),
        ("solana", "SOL"),
        ("cardano", "ADA"),
        ("litecoin", "LTC"),
    ]
    .into_iter()
    .map(|(id, sym)| (id.to_string(), sym.to_string()))
    .collect()
}

// =============================================================================
// ServiceConfig
// =============================================================================

#[derive(Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Socket address the HTTP server binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    // --- Price history (CoinGecko) ------------------------------------------
    #[serde(default = "default_coingecko_base_url")]
    pub coingecko_base_url: String,

    /// Optional demo key, sent as `x-cg-demo-api-key` when non-empty.
    #[serde(default)]
    pub coingecko_api_key: String,

    /// Quote currency for prices.
    #[serde(default = "default_vs_currency")]
    pub vs_currency: String,

    // --- News (CryptoPanic) -------------------------------------------------
    #[serde(default = "default_cryptopanic_base_url")]
    pub cryptopanic_base_url: String,

    #[serde(default)]
    pub cryptopanic_api_key: String,

    // --- Request defaults ---------------------------------------------------

    /// Coin id used by the price endpoints when `coin` is omitted.
    #[serde(default = "default_coin_id")]
    pub default_coin_id: String,

    /// Ticker used by the news endpoint when `coin` is omitted.
    #[serde(default = "default_news_symbol")]
    pub default_news_symbol: String,

    /// Lookback window in days when `days` is omitted.
    #[serde(default = "default_days")]
    pub default_days: u32,

    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,

    /// Timeout for each outbound request.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Coin id (lowercase) → news ticker.
    #[serde(default = "default_news_symbols")]
    pub news_symbols: BTreeMap<String, String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            coingecko_base_url: default_coingecko_base_url(),
            coingecko_api_key: String::new(),
            vs_currency: default_vs_currency(),
            cryptopanic_base_url: default_cryptopanic_base_url(),
            cryptopanic_api_key: String::new(),
            default_coin_id: default_coin_id(),
            default_news_symbol: default_news_symbol(),
            default_days: default_days(),
            rsi_period: default_rsi_period(),
            request_timeout_secs: default_request_timeout_secs(),
            news_symbols: default_news_symbols(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// A missing file is an error so the caller can fall back to defaults
    /// with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read service config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse service config from {}", path.display()))?;

        info!(
            path = %path.display(),
            default_coin = %config.default_coin_id,
            rsi_period = config.rsi_period,
            "service config loaded"
        );

        Ok(config)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup. Empty values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let fields: [(&str, &mut String); 5] = [
            ("COIN_PULSE_BIND_ADDR", &mut self.bind_addr),
            ("COINGECKO_BASE_URL", &mut self.coingecko_base_url),
            ("COINGECKO_API_KEY", &mut self.coingecko_api_key),
            ("CRYPTOPANIC_BASE_URL", &mut self.cryptopanic_base_url),
            ("CRYPTOPANIC_API_KEY", &mut self.cryptopanic_api_key),
        ];

        for (key, slot) in fields {
            if let Some(value) = lookup(key).map(|v| v.trim().to_string()) {
                if !value.is_empty() {
                    *slot = value;
                }
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.rsi_period == 0 {
            bail!("rsi_period must be at least 1");
        }
        if self.default_days == 0 {
            bail!("default_days must be at least 1");
        }
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be at least 1");
        }
        if self.coingecko_base_url.trim().is_empty() {
            bail!("coingecko_base_url must not be empty");
        }
        if self.cryptopanic_base_url.trim().is_empty() {
            bail!("cryptopanic_base_url must not be empty");
        }
        Ok(())
    }

    /// Resolve a client-supplied coin identifier to a news ticker.
    ///
    /// Known coin ids map through `news_symbols` (case-insensitive); anything
    /// else is assumed to already be a ticker and is upper-cased.
    pub fn news_symbol_for(&self, coin: &str) -> String {
        let coin = coin.trim();
        self.news_symbols
            .get(&coin.to_lowercase())
            .cloned()
            .unwrap_or_else(|| coin.to_uppercase())
    }
}

impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |key: &str| if key.is_empty() { "<unset>" } else { "<redacted>" };
        f.debug_struct("ServiceConfig")
            .field("bind_addr", &self.bind_addr)
            .field("coingecko_base_url", &self.coingecko_base_url)
            .field("coingecko_api_key", &redact(&self.coingecko_api_key))
            .field("vs_currency", &self.vs_currency)
            .field("cryptopanic_base_url", &self.cryptopanic_base_url)
            .field("cryptopanic_api_key", &redact(&self.cryptopanic_api_key))
            .field("default_coin_id", &self.default_coin_id)
            .field("default_news_symbol", &self.default_news_symbol)
            .field("default_days", &self.default_days)
            .field("rsi_period", &self.rsi_period)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("news_symbols", &self.news_symbols)
            .finish()
    }
}
