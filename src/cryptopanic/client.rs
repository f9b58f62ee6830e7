// =============================================================================
// CryptoPanic REST Client: public news posts per currency
// =============================================================================
//
// GET {base}/posts/?auth_token={key}&currencies={SYMBOL}&public=true
//
// SECURITY: the auth token travels as a query parameter (CryptoPanic has no
// header alternative), so request URLs are never logged.
// =============================================================================

use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use reqwest::Url;
use tracing::{debug, instrument};

use crate::market_data::{NewsSource, SourceFuture};
use crate::types::NewsItem;

#[derive(Clone)]
pub struct CryptoPanicClient {
    auth_token: String,
    base_url: Url,
    client: reqwest::Client,
}

impl CryptoPanicClient {
    /// Create a new `CryptoPanicClient`.
    pub fn new(base_url: &str, auth_token: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("invalid CryptoPanic base url '{base_url}'"))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build reqwest client for CryptoPanic")?;

        debug!(base_url = %base_url, "CryptoPanicClient initialised");

        Ok(Self {
            auth_token: auth_token.into(),
            base_url,
            client,
        })
    }

    /// GET /posts/ filtered to `symbol`.
    #[instrument(skip(self), name = "cryptopanic::posts")]
    pub async fn posts(&self, symbol: &str) -> Result<Vec<NewsItem>> {
        let url = self.posts_url()?;

        let resp = self
            .client
            .get(url)
            .query(&[
                ("auth_token", self.auth_token.as_str()),
                ("currencies", symbol),
                ("public", "true"),
            ])
            .send()
            .await
            // reqwest errors embed the URL, which carries the token.
            .map_err(|e| anyhow!("GET posts request failed: {}", e.without_url()))?;

        let status = resp.status();
        if !status.is_success() {
            bail!("CryptoPanic posts returned {}", status);
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| anyhow!("failed to parse posts response: {}", e.without_url()))?;

        let items = parse_posts(&body)?;
        debug!(symbol, count = items.len(), "news posts fetched");
        Ok(items)
    }

    fn posts_url(&self) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("CryptoPanic base url cannot carry a path"))?
            .pop_if_empty()
            .extend(["posts", ""]);
        Ok(url)
    }
}

impl NewsSource for CryptoPanicClient {
    fn latest_news<'a>(&'a self, symbol: &'a str) -> SourceFuture<'a, Vec<NewsItem>> {
        Box::pin(self.posts(symbol))
    }
}

impl std::fmt::Debug for CryptoPanicClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoPanicClient")
            .field("auth_token", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

/// Decode the `results` array of a posts body into [`NewsItem`]s.
///
/// A missing or empty `results` array is an error: an empty feed is treated
/// the same as a failed fetch.
pub fn parse_posts(body: &serde_json::Value) -> Result<Vec<NewsItem>> {
    let results = body
        .get("results")
        .and_then(|v| v.as_array())
        .context("posts response missing 'results' array")?;

    if results.is_empty() {
        bail!("posts response has no results");
    }

    let field = |post: &serde_json::Value, key: &str| -> Option<String> {
        post.get(key).and_then(|v| v.as_str()).map(str::to_string)
    };

    Ok(results
        .iter()
        .map(|post| NewsItem {
            title: field(post, "title"),
            url: field(post, "url"),
            published_at: field(post, "published_at"),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::net::SocketAddr;
    use std::sync::{Arc, Mutex};

    use axum::extract::RawQuery;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    const TOKEN: &str = "tok-secret-123";

    /// Serve `router` on an ephemeral local port.
    async fn spawn_upstream(router: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        addr
    }

    fn client_for(addr: SocketAddr) -> CryptoPanicClient {
        CryptoPanicClient::new(&format!("http://{addr}/api/v1"), TOKEN, Duration::from_secs(5))
            .unwrap()
    }

    #[test]
    fn parses_results_and_drops_extra_fields() {
        let body = json!({
            "count": 2,
            "next": null,
            "results": [
                {
                    "kind": "news",
                    "title": "Dogecoin jumps 8%",
                    "url": "https://cryptopanic.com/news/1/",
                    "published_at": "2024-04-01T10:00:00Z",
                    "votes": { "positive": 3 }
                },
                {
                    "title": "Musk tweets again",
                    "url": "https://cryptopanic.com/news/2/"
                }
            ]
        });

        let items = parse_posts(&body).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title.as_deref(), Some("Dogecoin jumps 8%"));
        assert_eq!(items[0].published_at.as_deref(), Some("2024-04-01T10:00:00Z"));
        assert_eq!(items[1].published_at, None);
    }

    #[test]
    fn empty_or_missing_results_is_an_error() {
        assert!(parse_posts(&json!({ "results": [] })).is_err());
        assert!(parse_posts(&json!({ "status": "Incomplete", "info": "Token not found" })).is_err());
    }

    #[test]
    fn posts_url_keeps_trailing_slash() {
        let client =
            CryptoPanicClient::new("https://cryptopanic.com/api/v1", "tok", Duration::from_secs(5))
                .unwrap();
        assert_eq!(
            client.posts_url().unwrap().as_str(),
            "https://cryptopanic.com/api/v1/posts/"
        );
    }

    #[test]
    fn debug_output_hides_token() {
        let client =
            CryptoPanicClient::new("https://cryptopanic.com/api/v1", "tok-123", Duration::from_secs(5))
                .unwrap();
        assert!(!format!("{client:?}").contains("tok-123"));
    }

    #[tokio::test]
    async fn posts_sends_token_currency_and_public_flag() {
        let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let recorder = seen.clone();
        let router = Router::new().route(
            "/api/v1/posts/",
            get(move |RawQuery(query): RawQuery| {
                let recorder = recorder.clone();
                async move {
                    recorder.lock().unwrap().push(query.unwrap_or_default());
                    Json(json!({ "results": [{ "title": "ETH upgrade ships", "url": "u" }] }))
                }
            }),
        );
        let addr = spawn_upstream(router).await;

        let items = client_for(addr).posts("ETH").await.unwrap();
        assert_eq!(items[0].title.as_deref(), Some("ETH upgrade ships"));
        assert_eq!(
            *seen.lock().unwrap(),
            vec![format!("auth_token={TOKEN}&currencies=ETH&public=true")]
        );
    }

    #[tokio::test]
    async fn non_success_status_is_an_error_without_token() {
        let router = Router::new().route(
            "/api/v1/posts/",
            get(|| async { (StatusCode::TOO_MANY_REQUESTS, "rate limited") }),
        );
        let addr = spawn_upstream(router).await;

        let err = client_for(addr).posts("DOGE").await.unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("429"), "{msg}");
        assert!(!msg.contains(TOKEN), "{msg}");
    }

    #[tokio::test]
    async fn not_found_is_an_error() {
        let addr = spawn_upstream(Router::new()).await;

        let err = client_for(addr).posts("DOGE").await.unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("404"), "{msg}");
        assert!(!msg.contains(TOKEN), "{msg}");
    }

    #[tokio::test]
    async fn connection_failure_does_not_leak_token() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client_for(addr).posts("DOGE").await.unwrap_err();
        assert!(!format!("{err:#}").contains(TOKEN));
    }
}
