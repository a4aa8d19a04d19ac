//! Recording backend for controller tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::api::*;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    AddToCart(AddToCartRequest),
    UpdateCartItem(UpdateCartItemRequest),
    Search(String),
    AddMoney(AddMoneyRequest),
}

pub struct MockBackend {
    add_reply: AddToCartResponse,
    update_reply: UpdateCartItemResponse,
    money_reply: AddMoneyResponse,
    searches: HashMap<String, (Vec<ProductHit>, Duration)>,
    fail: bool,
    calls: Mutex<Vec<Call>>,
}

impl MockBackend {
    /// Every mutation succeeds; unknown searches return no hits.
    pub fn new() -> Self {
        Self {
            add_reply: AddToCartResponse {
                success: true,
                cart_count: Some("1".into()),
                message: None,
            },
            update_reply: UpdateCartItemResponse {
                success: true,
                ..Default::default()
            },
            money_reply: AddMoneyResponse {
                success: true,
                ..Default::default()
            },
            searches: HashMap::new(),
            fail: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails as if the server sent an HTML error page
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn with_add_reply(mut self, reply: AddToCartResponse) -> Self {
        self.add_reply = reply;
        self
    }

    pub fn with_update_reply(mut self, reply: UpdateCartItemResponse) -> Self {
        self.update_reply = reply;
        self
    }

    pub fn with_money_reply(mut self, reply: AddMoneyResponse) -> Self {
        self.money_reply = reply;
        self
    }

    pub fn with_search(self, query: &str, hits: Vec<ProductHit>) -> Self {
        self.with_slow_search(query, hits, Duration::ZERO)
    }

    /// Search reply that arrives after `latency`
    pub fn with_slow_search(mut self, query: &str, hits: Vec<ProductHit>, latency: Duration) -> Self {
        self.searches.insert(query.to_string(), (hits, latency));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn search_queries(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Search(q) => Some(q),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) -> ClientResult<()> {
        self.calls.lock().unwrap().push(call);
        if self.fail {
            Err(ClientError::Decode("HTTP 500: expected value at line 1 column 1".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn add_to_cart(&self, request: &AddToCartRequest) -> ClientResult<AddToCartResponse> {
        self.record(Call::AddToCart(request.clone()))?;
        Ok(self.add_reply.clone())
    }

    async fn update_cart_item(
        &self,
        request: &UpdateCartItemRequest,
    ) -> ClientResult<UpdateCartItemResponse> {
        self.record(Call::UpdateCartItem(request.clone()))?;
        Ok(self.update_reply.clone())
    }

    async fn search(&self, query: &str) -> ClientResult<SearchResponse> {
        self.record(Call::Search(query.to_string()))?;
        let (hits, latency) = self
            .searches
            .get(query)
            .cloned()
            .unwrap_or((Vec::new(), Duration::ZERO));
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        Ok(SearchResponse {
            results: Some(hits),
        })
    }

    async fn add_money(&self, request: &AddMoneyRequest) -> ClientResult<AddMoneyResponse> {
        self.record(Call::AddMoney(request.clone()))?;
        Ok(self.money_reply.clone())
    }
}
