//! Page Controller
//!
//! One handler per page behaviour. Each handler awaits at most one backend
//! call and turns the outcome into [`PageMsg`]s. Failures never propagate:
//! they are logged and, where the page shows them, become an error banner.

mod search;

#[cfg(test)]
pub(crate) mod mock;

pub use search::{query_len, SearchController};

use std::path::Path;
use std::sync::Arc;

use crate::api::{
    AddMoneyRequest, AddToCartRequest, Backend, ServerReply, UpdateCartItemRequest,
};
use crate::config::UiConfig;
use crate::page::wallet::{parse_top_up_amount, TOP_UP_PROMPT};
use crate::page::{
    preview, AmountPrompt, Notification, NotificationId, NotificationKind, PageMsg, PageStore,
    PreviewError, Step,
};

pub const ADDED_TO_CART: &str = "Product added to cart!";
pub const ADD_TO_CART_FAILED: &str = "Error adding product to cart";
pub const UPDATE_CART_FAILED: &str = "Error updating cart";
pub const ADD_MONEY_REFUSED: &str = "Error adding money";
pub const ADD_MONEY_FAILED: &str = "Error adding money to wallet";

/// Result of a wallet top-up attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopUpOutcome {
    /// Cancelled or not a positive number; nothing was sent
    Invalid,
    /// Server credited the wallet and the page will reload
    Credited,
    /// Server refused or the request failed
    Failed,
}

/// Event handlers of the storefront page
#[derive(Clone)]
pub struct PageController {
    backend: Arc<dyn Backend>,
    store: PageStore,
    config: UiConfig,
}

impl PageController {
    pub fn new(backend: Arc<dyn Backend>, store: PageStore, config: UiConfig) -> Self {
        Self {
            backend,
            store,
            config,
        }
    }

    pub fn store(&self) -> &PageStore {
        &self.store
    }

    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    /// Search box controller bound to this page
    pub fn search_box(&self) -> SearchController {
        SearchController::new(self.clone())
    }

    /// Page content is ready: schedule the auto-dismissal of the
    /// dismissible alerts that came with the page.
    pub fn page_ready(&self) -> tokio::task::JoinHandle<()> {
        let store = self.store.clone();
        let ttl = self.config.page_alert_ttl();

        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            let alerts = store.read(|s| s.notifications.page_alerts()).await;
            tracing::debug!("Auto-dismissing {} page alerts", alerts.len());
            for id in alerts {
                store.dispatch(PageMsg::Dismiss(id)).await;
            }
        })
    }

    /// Insert a banner at the top of the page and close it after the
    /// notification lifetime.
    pub async fn show_notification(
        &self,
        message: impl Into<String>,
        kind: NotificationKind,
    ) -> NotificationId {
        let notification = Notification::new(message, kind);
        let id = notification.id;
        self.store.dispatch(PageMsg::Notify(notification)).await;

        let store = self.store.clone();
        let ttl = self.config.notification_ttl();
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            store.dispatch(PageMsg::Dismiss(id)).await;
        });

        id
    }

    /// Close a banner as its close control would
    pub async fn dismiss(&self, id: NotificationId) {
        self.store.dispatch(PageMsg::Dismiss(id)).await;
    }

    /// "Add to cart" button. Quantity defaults to 1.
    pub async fn add_to_cart(&self, product_id: &str, quantity: Option<u32>) {
        let request = AddToCartRequest {
            product_id: product_id.to_string(),
            quantity: quantity.unwrap_or(1),
        };

        match self.backend.add_to_cart(&request).await {
            Ok(reply) if reply.succeeded() => {
                tracing::info!(product_id, quantity = request.quantity, "Added to cart");
                if let Some(count) = reply.cart_count {
                    self.store.dispatch(PageMsg::CartCountChanged(count)).await;
                }
                self.show_notification(ADDED_TO_CART, NotificationKind::Success)
                    .await;
            }
            Ok(reply) => {
                tracing::warn!(product_id, message = ?reply.message, "Add to cart refused");
                self.show_notification(reply.failure_text(ADD_TO_CART_FAILED), NotificationKind::Error)
                    .await;
            }
            Err(e) => {
                tracing::error!(product_id, error = %e, "Add to cart failed");
                self.show_notification(ADD_TO_CART_FAILED, NotificationKind::Error)
                    .await;
            }
        }
    }

    /// Stepper button. Does nothing at the bounds; otherwise sends the new
    /// quantity. Returns the new value when one was sent.
    pub async fn step_quantity(&self, cart_item_id: &str, step: Step) -> Option<u32> {
        let mut stepper = self.stepper(cart_item_id).await?;
        let value = stepper.step(step)?;

        self.set_quantity(cart_item_id, value).await;
        self.update_cart_item(cart_item_id, value).await;
        Some(value)
    }

    /// Direct edit of the quantity input. The value is clamped and always
    /// sent.
    pub async fn edit_quantity(&self, cart_item_id: &str, raw: &str) -> Option<u32> {
        let mut stepper = self.stepper(cart_item_id).await?;
        let value = stepper.edit(raw);

        self.set_quantity(cart_item_id, value).await;
        self.update_cart_item(cart_item_id, value).await;
        Some(value)
    }

    async fn stepper(&self, cart_item_id: &str) -> Option<crate::page::QuantityStepper> {
        let stepper = self
            .store
            .read(|s| s.steppers.get(cart_item_id).cloned())
            .await;
        if stepper.is_none() {
            tracing::warn!(cart_item_id, "No quantity control for cart item");
        }
        stepper
    }

    async fn set_quantity(&self, cart_item_id: &str, value: u32) {
        self.store
            .dispatch(PageMsg::QuantitySet {
                cart_item_id: cart_item_id.to_string(),
                value,
            })
            .await;
    }

    /// Send a line item's new quantity and refresh the totals
    pub async fn update_cart_item(&self, cart_item_id: &str, quantity: u32) {
        let request = UpdateCartItemRequest {
            cart_item_id: cart_item_id.to_string(),
            quantity,
        };

        match self.backend.update_cart_item(&request).await {
            Ok(reply) if reply.succeeded() => {
                tracing::info!(cart_item_id, quantity, "Cart item updated");
                self.store
                    .dispatch(PageMsg::CartTotalsChanged {
                        cart_total: reply.cart_total,
                        item_total: reply.item_total,
                    })
                    .await;
            }
            Ok(reply) => {
                tracing::warn!(cart_item_id, message = ?reply.message, "Cart update refused");
                self.show_notification(reply.failure_text(UPDATE_CART_FAILED), NotificationKind::Error)
                    .await;
            }
            Err(e) => {
                tracing::error!(cart_item_id, error = %e, "Cart update failed");
                self.show_notification(UPDATE_CART_FAILED, NotificationKind::Error)
                    .await;
            }
        }
    }

    /// Run one search and render its results. Failures are only logged.
    pub async fn perform_search(&self, query: &str) {
        match self.backend.search(query).await {
            Ok(reply) => match reply.results {
                Some(results) => {
                    tracing::debug!(query, hits = results.len(), "Search results");
                    self.store.dispatch(PageMsg::SearchResults(results)).await;
                }
                None => tracing::debug!(query, "Search reply without results"),
            },
            Err(e) => tracing::error!(query, error = %e, "Search error"),
        }
    }

    /// Ask for an amount and credit the wallet
    pub async fn top_up_wallet(&self, prompt: &dyn AmountPrompt) -> TopUpOutcome {
        let input = prompt.ask(TOP_UP_PROMPT);
        let Some(amount) = parse_top_up_amount(input.as_deref()) else {
            tracing::debug!(?input, "Top-up amount rejected");
            return TopUpOutcome::Invalid;
        };

        match self.backend.add_money(&AddMoneyRequest { amount }).await {
            Ok(reply) if reply.succeeded() => {
                tracing::info!(amount, balance = ?reply.new_balance, "Wallet credited");
                self.store.dispatch(PageMsg::ReloadRequested).await;
                TopUpOutcome::Credited
            }
            Ok(reply) => {
                tracing::warn!(amount, message = ?reply.message, "Top-up refused");
                self.show_notification(reply.failure_text(ADD_MONEY_REFUSED), NotificationKind::Error)
                    .await;
                TopUpOutcome::Failed
            }
            Err(e) => {
                tracing::error!(amount, error = %e, "Top-up failed");
                self.show_notification(ADD_MONEY_FAILED, NotificationKind::Error)
                    .await;
                TopUpOutcome::Failed
            }
        }
    }

    /// A file was chosen in an image upload control
    pub async fn preview_image(&self, path: &Path) -> Result<(), PreviewError> {
        match preview::read_data_url(path).await {
            Ok(url) => {
                self.store.dispatch(PageMsg::PreviewLoaded(url)).await;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Image preview failed");
                Err(e)
            }
        }
    }
}
