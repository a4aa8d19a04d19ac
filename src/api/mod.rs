//! Storefront Backend API
//!
//! The page talks to the VibeMart web application through four JSON
//! endpoints:
//!
//! - `POST /add-to-cart/` - add a product to the cart
//! - `POST /update-cart-item/` - change a line item's quantity
//! - `GET /search/?q=` - live product search
//! - `POST /accounts/add-money/` - credit the wallet
//!
//! [`Backend`] is the capability the page controller depends on.
//! [`HttpBackend`] is the real implementation; tests swap in recording
//! mocks.

pub mod dto;
pub mod error;
pub mod http;

pub use dto::{
    AddMoneyRequest, AddMoneyResponse, AddToCartRequest, AddToCartResponse, ItemTotal,
    ProductHit, SearchResponse, ServerReply, UpdateCartItemRequest, UpdateCartItemResponse,
};
pub use error::{ClientError, ClientResult};
pub use http::HttpBackend;

use async_trait::async_trait;

pub const ADD_TO_CART_PATH: &str = "/add-to-cart/";
pub const UPDATE_CART_ITEM_PATH: &str = "/update-cart-item/";
pub const SEARCH_PATH: &str = "/search/";
pub const ADD_MONEY_PATH: &str = "/accounts/add-money/";

/// Storefront backend capability
#[async_trait]
pub trait Backend: Send + Sync {
    async fn add_to_cart(&self, request: &AddToCartRequest) -> ClientResult<AddToCartResponse>;

    async fn update_cart_item(
        &self,
        request: &UpdateCartItemRequest,
    ) -> ClientResult<UpdateCartItemResponse>;

    async fn search(&self, query: &str) -> ClientResult<SearchResponse>;

    async fn add_money(&self, request: &AddMoneyRequest) -> ClientResult<AddMoneyResponse>;
}
