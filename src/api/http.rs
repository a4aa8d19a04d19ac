//! HTTP Backend
//!
//! reqwest implementation of [`Backend`]. Behaves like the browser page:
//! cookies set by the server are kept and sent back, and every POST echoes
//! the CSRF cookie in the CSRF header. Response bodies are parsed as JSON
//! whatever the status code; a non-JSON body is a decode error.

use async_trait::async_trait;
use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;

use super::dto::*;
use super::error::{ClientError, ClientResult};
use super::{Backend, ADD_MONEY_PATH, ADD_TO_CART_PATH, SEARCH_PATH, UPDATE_CART_ITEM_PATH};
use crate::config::BackendConfig;
use crate::csrf::CookieJar;

/// Storefront backend reached over HTTP
pub struct HttpBackend {
    client: Client,
    config: BackendConfig,
    jar: RwLock<CookieJar>,
}

impl HttpBackend {
    /// Create a backend client with the given configuration
    pub fn new(config: BackendConfig) -> ClientResult<Self> {
        let mut builder = Client::builder();
        if let Some(ms) = config.request_timeout_ms {
            builder = builder.timeout(std::time::Duration::from_millis(ms));
        }
        let client = builder.build()?;

        let jar = config
            .cookie
            .as_deref()
            .map(CookieJar::parse)
            .unwrap_or_default();

        Ok(Self {
            client,
            config,
            jar: RwLock::new(jar),
        })
    }

    /// Get the current configuration
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Current cookie string, as `document.cookie` would read
    pub async fn cookies(&self) -> String {
        self.jar.read().await.header_value()
    }

    /// Fetch the storefront home page so the server can hand out its
    /// session and CSRF cookies.
    pub async fn load_page(&self) -> ClientResult<()> {
        let url = self.url("/")?;
        let response = self.with_cookies(self.client.get(&url)).await.send().await?;
        tracing::debug!(status = %response.status(), "Loaded storefront page");
        self.store_cookies(&response).await;
        Ok(())
    }

    fn url(&self, path: &str) -> ClientResult<String> {
        let base = self.config.base_url.trim_end_matches('/');
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ClientError::InvalidUrl(self.config.base_url.clone()));
        }
        Ok(format!("{}{}", base, path))
    }

    async fn with_cookies(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let cookies = self.jar.read().await.header_value();
        if cookies.is_empty() {
            request
        } else {
            request.header(COOKIE, cookies)
        }
    }

    async fn store_cookies(&self, response: &Response) {
        let mut jar = self.jar.write().await;
        for value in response.headers().get_all(SET_COOKIE) {
            if let Ok(value) = value.to_str() {
                jar.store_set_cookie(value);
            }
        }
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> ClientResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.url(path)?;
        let token = self.jar.read().await.get(&self.config.csrf_cookie);
        if token.is_none() {
            tracing::warn!(
                cookie = %self.config.csrf_cookie,
                "No CSRF cookie present, the server will likely refuse {}",
                path
            );
        }

        let mut request = self.with_cookies(self.client.post(&url).json(body)).await;
        if let Some(token) = token {
            request = request.header(self.config.csrf_header.as_str(), token);
        }

        let response = request.send().await?;
        self.store_cookies(&response).await;
        decode(response).await
    }

    async fn get_json<R: DeserializeOwned>(&self, path_and_query: &str) -> ClientResult<R> {
        let url = self.url(path_and_query)?;
        let response = self.with_cookies(self.client.get(&url)).await.send().await?;
        self.store_cookies(&response).await;
        decode(response).await
    }
}

async fn decode<R: DeserializeOwned>(response: Response) -> ClientResult<R> {
    let status = response.status();
    let body = response.bytes().await?;
    serde_json::from_slice(&body)
        .map_err(|e| ClientError::Decode(format!("HTTP {}: {}", status.as_u16(), e)))
}

#[async_trait]
impl Backend for HttpBackend {
    async fn add_to_cart(&self, request: &AddToCartRequest) -> ClientResult<AddToCartResponse> {
        self.post_json(ADD_TO_CART_PATH, request).await
    }

    async fn update_cart_item(
        &self,
        request: &UpdateCartItemRequest,
    ) -> ClientResult<UpdateCartItemResponse> {
        self.post_json(UPDATE_CART_ITEM_PATH, request).await
    }

    async fn search(&self, query: &str) -> ClientResult<SearchResponse> {
        let path = format!("{}?q={}", SEARCH_PATH, urlencoding::encode(query));
        self.get_json(&path).await
    }

    async fn add_money(&self, request: &AddMoneyRequest) -> ClientResult<AddMoneyResponse> {
        self.post_json(ADD_MONEY_PATH, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devserver::{build_router, Catalog};
    use std::sync::Arc;

    async fn spawn_dev_server() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = build_router(Arc::new(Catalog::sample()));
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn backend_for(base_url: String) -> HttpBackend {
        HttpBackend::new(BackendConfig {
            base_url,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_url_joining() {
        let backend = backend_for("http://shop.local/".to_string());
        assert_eq!(backend.url(ADD_TO_CART_PATH).unwrap(), "http://shop.local/add-to-cart/");

        let backend = backend_for("shop.local".to_string());
        assert!(matches!(backend.url("/"), Err(ClientError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_initial_cookie_from_config() {
        let backend = HttpBackend::new(BackendConfig {
            cookie: Some("csrftoken=abc; sessionid=s1".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(backend.cookies().await, "csrftoken=abc; sessionid=s1");
    }

    #[tokio::test]
    async fn test_post_without_csrf_cookie_is_decode_error() {
        let base = spawn_dev_server().await;
        let backend = backend_for(base);

        let err = backend
            .add_to_cart(&AddToCartRequest {
                product_id: "1".to_string(),
                quantity: 1,
            })
            .await
            .unwrap_err();
        // The server answers 403 with a plain-text page
        assert!(matches!(err, ClientError::Decode(ref m) if m.starts_with("HTTP 403")));
    }

    #[tokio::test]
    async fn test_cart_flow_against_dev_server() {
        let base = spawn_dev_server().await;
        let backend = backend_for(base);
        backend.load_page().await.unwrap();
        assert!(backend.cookies().await.contains("csrftoken="));

        let added = backend
            .add_to_cart(&AddToCartRequest {
                product_id: "1".to_string(),
                quantity: 2,
            })
            .await
            .unwrap();
        assert!(added.success);
        assert_eq!(added.cart_count.as_deref(), Some("1"));

        let refused = backend
            .add_to_cart(&AddToCartRequest {
                product_id: "1".to_string(),
                quantity: 10_000,
            })
            .await
            .unwrap();
        assert!(!refused.success);
        assert!(refused.message.unwrap().starts_with("Invalid quantity"));

        let updated = backend
            .update_cart_item(&UpdateCartItemRequest {
                cart_item_id: "1".to_string(),
                quantity: 3,
            })
            .await
            .unwrap();
        assert!(updated.success);
        let item = updated.item_total.unwrap();
        assert_eq!(item.item_id, "1");
    }

    #[tokio::test]
    async fn test_csrf_header_sends_decoded_cookie() {
        let base = spawn_dev_server().await;
        let backend = HttpBackend::new(BackendConfig {
            base_url: base,
            cookie: Some("csrftoken=a%2Bb".to_string()),
            ..Default::default()
        })
        .unwrap();

        // The server compares the header with the decoded cookie, "a+b"
        let credited = backend.add_money(&AddMoneyRequest { amount: 5.0 }).await.unwrap();
        assert!(credited.success);
        assert_eq!(credited.new_balance, Some(5.0));
    }

    #[tokio::test]
    async fn test_search_and_wallet_against_dev_server() {
        let base = spawn_dev_server().await;
        let backend = backend_for(base);
        backend.load_page().await.unwrap();

        let found = backend.search("shoe").await.unwrap();
        let results = found.results.unwrap();
        assert!(!results.is_empty());
        assert!(results.iter().all(|p| p.name.to_lowercase().contains("shoe")));

        let none = backend.search("zzz & more").await.unwrap();
        assert_eq!(none.results.unwrap().len(), 0);

        let credited = backend.add_money(&AddMoneyRequest { amount: 25.0 }).await.unwrap();
        assert!(credited.success);
        assert_eq!(credited.new_balance, Some(25.0));

        let capped = backend
            .add_money(&AddMoneyRequest { amount: 20_000.0 })
            .await
            .unwrap();
        assert!(!capped.success);
    }
}
