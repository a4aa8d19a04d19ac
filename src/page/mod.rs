//! Storefront Page Model
//!
//! The page is an explicit state object. Handlers never touch it directly:
//! they dispatch [`PageMsg`] values to a [`PageStore`], which applies them
//! in order and broadcasts each applied message to observers (renderers,
//! loggers, tests).
//!
//! # Example
//!
//! ```rust,no_run
//! use vibemart::page::{PageMsg, PageState, PageStore};
//!
//! # async fn demo() {
//! let store = PageStore::new(PageState::default().with_cart_line("7", "2", Some("5"), 99));
//! let mut events = store.subscribe();
//!
//! store.dispatch(PageMsg::CartCountChanged("3".into())).await;
//! let seen = events.recv().await.unwrap();
//! assert_eq!(seen, PageMsg::CartCountChanged("3".into()));
//! # }
//! ```

pub mod html;
pub mod notify;
pub mod preview;
pub mod quantity;
pub mod search;
pub mod wallet;
pub mod widgets;

pub use notify::{Notification, NotificationId, NotificationKind, NotificationStack, Origin};
pub use preview::{ImagePreview, PreviewError};
pub use quantity::{QuantityStepper, Step};
pub use search::SearchPanel;
pub use wallet::{AmountPrompt, FixedAmount, TerminalPrompt};

use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

use crate::api::{ItemTotal, ProductHit};

/// Messages that change the page
#[derive(Debug, Clone, PartialEq)]
pub enum PageMsg {
    /// Navbar cart badge shows a new count
    CartCountChanged(String),
    /// Cart page totals after a line item update
    CartTotalsChanged {
        cart_total: Option<String>,
        item_total: Option<ItemTotal>,
    },
    /// A stepper input took a new value
    QuantitySet { cart_item_id: String, value: u32 },
    Notify(Notification),
    Dismiss(NotificationId),
    SearchHidden,
    SearchResults(Vec<ProductHit>),
    PreviewLoaded(String),
    ReloadRequested,
}

/// Everything the page shows that handlers can change
#[derive(Debug, Clone, Default)]
pub struct PageState {
    pub cart_count: Option<String>,
    /// Set once the badge pulse animation has been triggered
    pub cart_count_pulse: bool,
    /// Cart page total, already formatted with the currency sign
    pub cart_total: Option<String>,
    /// Line totals on the cart page, keyed by cart item id
    pub item_totals: BTreeMap<String, String>,
    pub steppers: BTreeMap<String, QuantityStepper>,
    pub search: SearchPanel,
    pub notifications: NotificationStack,
    pub preview: Option<ImagePreview>,
    pub reload_requested: bool,
}

impl PageState {
    /// Add a cart line (stepper plus line total) as rendered by the server
    pub fn with_cart_line(
        mut self,
        cart_item_id: &str,
        quantity: &str,
        max_stock: Option<&str>,
        default_max: u32,
    ) -> Self {
        let stepper = QuantityStepper::from_attrs(cart_item_id, quantity, max_stock, default_max);
        self.steppers.insert(cart_item_id.to_string(), stepper);
        self.item_totals
            .insert(cart_item_id.to_string(), String::new());
        self
    }

    /// Add an alert rendered with the page
    pub fn with_alert(mut self, message: &str, kind: NotificationKind, dismissible: bool) -> Self {
        self.notifications
            .push(Notification::page_alert(message, kind, dismissible));
        self
    }

    pub fn with_cart_count(mut self, count: &str) -> Self {
        self.cart_count = Some(count.to_string());
        self
    }

    /// Apply one message. Returns whether anything changed.
    pub fn apply(&mut self, msg: &PageMsg) -> bool {
        match msg {
            PageMsg::CartCountChanged(count) => {
                self.cart_count = Some(count.clone());
                self.cart_count_pulse = true;
                true
            }
            PageMsg::CartTotalsChanged {
                cart_total,
                item_total,
            } => {
                let mut changed = false;
                if let Some(total) = cart_total {
                    self.cart_total = Some(format!("${}", total));
                    changed = true;
                }
                if let Some(item) = item_total {
                    if let Some(slot) = self.item_totals.get_mut(&item.item_id) {
                        *slot = format!("${}", item.total);
                        changed = true;
                    }
                }
                changed
            }
            PageMsg::QuantitySet {
                cart_item_id,
                value,
            } => match self.steppers.get_mut(cart_item_id) {
                Some(stepper) => {
                    stepper.set(*value);
                    true
                }
                None => false,
            },
            PageMsg::Notify(notification) => {
                self.notifications.push(notification.clone());
                true
            }
            PageMsg::Dismiss(id) => self.notifications.dismiss(*id).is_some(),
            PageMsg::SearchHidden => {
                let was_visible = self.search.is_visible();
                self.search = SearchPanel::Hidden;
                was_visible
            }
            PageMsg::SearchResults(results) => {
                self.search = SearchPanel::from_results(results.clone());
                true
            }
            PageMsg::PreviewLoaded(src) => {
                self.preview = Some(ImagePreview {
                    src: src.clone(),
                    visible: true,
                });
                true
            }
            PageMsg::ReloadRequested => {
                self.reload_requested = true;
                true
            }
        }
    }
}

/// Shared page state with an ordered update cycle
#[derive(Clone)]
pub struct PageStore {
    state: Arc<RwLock<PageState>>,
    events: broadcast::Sender<PageMsg>,
}

impl PageStore {
    pub fn new(state: PageState) -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            state: Arc::new(RwLock::new(state)),
            events,
        }
    }

    /// Apply a message and publish it to subscribers
    pub async fn dispatch(&self, msg: PageMsg) {
        let changed = self.state.write().await.apply(&msg);
        tracing::trace!(?msg, changed, "Page message applied");
        // No subscribers is fine
        let _ = self.events.send(msg);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PageMsg> {
        self.events.subscribe()
    }

    /// Read from the current state
    pub async fn read<R>(&self, f: impl FnOnce(&PageState) -> R) -> R {
        f(&*self.state.read().await)
    }

    pub async fn snapshot(&self) -> PageState {
        self.state.read().await.clone()
    }
}

impl Default for PageStore {
    fn default() -> Self {
        Self::new(PageState::default())
    }
}
