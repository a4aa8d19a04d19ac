//! # VibeMart
//!
//! Storefront page client for the VibeMart shop: cart updates, debounced
//! live search, notification banners, wallet top-ups and image previews,
//! driven against the shop's JSON endpoints.
//!
//! ## Modules
//!
//! - [`api`]: backend capability and its HTTP implementation
//! - [`csrf`]: cookie lookup and the client cookie jar
//! - [`page`]: explicit page state, messages and renderers
//! - [`controller`]: event handlers that call the backend and update the page
//! - [`devserver`]: in-memory stand-in for the shop backend
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vibemart::{Config, HttpBackend, PageController, PageState, PageStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let backend = HttpBackend::new(config.backend.clone())?;
//!     backend.load_page().await?;
//!
//!     let store = PageStore::new(PageState::default());
//!     let page = PageController::new(Arc::new(backend), store, config.ui.clone());
//!
//!     page.add_to_cart("42", Some(2)).await;
//!     println!("{:?}", page.store().snapshot().await.cart_count);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod controller;
pub mod csrf;
pub mod devserver;
pub mod page;

pub use api::{Backend, ClientError, ClientResult, HttpBackend};

pub use config::{BackendConfig, Config, ConfigError, DevServerConfig, LoggingConfig, UiConfig};

pub use controller::{PageController, SearchController, TopUpOutcome};

pub use page::{Notification, NotificationKind, PageMsg, PageState, PageStore};
