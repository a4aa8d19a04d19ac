//! In-memory storefront data
//!
//! One shopper, one cart, one wallet. Rules follow the production views:
//! quantities are checked against stock, cart count is the number of
//! lines, wallet credits are capped at $10,000.

use tokio::sync::RwLock;

pub const MAX_TOP_UP: f64 = 10_000.0;
pub const SEARCH_LIMIT: usize = 10;

#[derive(Debug, Clone)]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub price_cents: u64,
    pub stock: u32,
    pub image: Option<String>,
    pub is_active: bool,
}

impl Product {
    fn new(id: u32, name: &str, description: &str, price_cents: u64, stock: u32) -> Self {
        Self {
            id,
            name: name.to_string(),
            description: description.to_string(),
            price_cents,
            stock,
            image: None,
            is_active: true,
        }
    }

    fn image(mut self, url: &str) -> Self {
        self.image = Some(url.to_string());
        self
    }

    fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.description.to_lowercase().contains(needle)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub id: u32,
    pub product_id: u32,
    pub quantity: u32,
}

/// Why a cart or wallet operation was refused
#[derive(Debug, Clone, PartialEq)]
pub enum Refusal {
    /// The server answers with a 404 page
    NotFound,
    /// The server answers `success: false` with this message
    Message(String),
}

/// Result of a line item update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineUpdate {
    pub cart_total_cents: u64,
    /// Zero when the line was removed
    pub line_total_cents: u64,
}

#[derive(Debug, Default)]
struct Inner {
    products: Vec<Product>,
    cart: Vec<CartLine>,
    next_line_id: u32,
    balance: f64,
}

#[derive(Debug, Default)]
pub struct Catalog {
    inner: RwLock<Inner>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            inner: RwLock::new(Inner {
                products,
                cart: Vec::new(),
                next_line_id: 1,
                balance: 0.0,
            }),
        }
    }

    /// Small demo catalogue
    pub fn sample() -> Self {
        Self::new(vec![
            Product::new(1, "Trail Running Shoe", "Lightweight runner with a grippy sole", 8999, 12)
                .image("/media/products/trail-shoe.jpg"),
            Product::new(2, "Leather Dress Shoe", "Full-grain leather, hand stitched", 12000, 4),
            Product::new(3, "Wireless Headphones", "Over-ear, 30 hour battery", 5950, 25)
                .image("/media/products/headphones.jpg"),
            Product::new(4, "Ceramic Coffee Mug", "350ml, dishwasher safe", 1200, 40),
            Product::new(5, "Yoga Mat", "Non-slip, 6mm thick", 2500, 15),
            Product::new(6, "Vintage Desk Lamp", "Brass finish", 4500, 3).inactive(),
        ])
    }

    /// Add to the cart. Returns the new number of cart lines.
    pub async fn add_to_cart(&self, product_id: u32, quantity: i64) -> Result<usize, Refusal> {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;
        let product = inner
            .products
            .iter()
            .find(|p| p.id == product_id && p.is_active)
            .cloned()
            .ok_or(Refusal::NotFound)?;

        if quantity <= 0 || quantity > product.stock as i64 {
            return Err(Refusal::Message(format!(
                "Invalid quantity. Available stock: {}",
                product.stock
            )));
        }
        let quantity = quantity as u32;

        match inner.cart.iter_mut().find(|l| l.product_id == product_id) {
            Some(line) => line.quantity = (line.quantity + quantity).min(product.stock),
            None => {
                let id = inner.next_line_id;
                inner.next_line_id += 1;
                inner.cart.push(CartLine {
                    id,
                    product_id,
                    quantity,
                });
            }
        }

        Ok(inner.cart.len())
    }

    /// Change a line's quantity. Zero or less removes the line; more than
    /// the stock is capped.
    pub async fn update_line(&self, line_id: u32, quantity: i64) -> Result<LineUpdate, Refusal> {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;
        let index = inner
            .cart
            .iter()
            .position(|l| l.id == line_id)
            .ok_or(Refusal::NotFound)?;

        let line_total_cents = if quantity <= 0 {
            inner.cart.remove(index);
            0
        } else {
            let product_id = inner.cart[index].product_id;
            let (stock, price) = inner
                .products
                .iter()
                .find(|p| p.id == product_id)
                .map(|p| (p.stock, p.price_cents))
                .ok_or(Refusal::NotFound)?;
            let quantity = (quantity.min(stock as i64)) as u32;
            inner.cart[index].quantity = quantity;
            price * quantity as u64
        };

        Ok(LineUpdate {
            cart_total_cents: Self::cart_total(inner),
            line_total_cents,
        })
    }

    fn cart_total(inner: &Inner) -> u64 {
        inner
            .cart
            .iter()
            .filter_map(|line| {
                inner
                    .products
                    .iter()
                    .find(|p| p.id == line.product_id)
                    .map(|p| p.price_cents * line.quantity as u64)
            })
            .sum()
    }

    /// Active products whose name or description contains the query.
    /// Queries shorter than two characters find nothing.
    pub async fn search(&self, query: &str) -> Vec<Product> {
        let query = query.trim();
        if query.chars().count() < 2 {
            return Vec::new();
        }

        let needle = query.to_lowercase();
        let inner = self.inner.read().await;
        inner
            .products
            .iter()
            .filter(|p| p.is_active && p.matches(&needle))
            .take(SEARCH_LIMIT)
            .cloned()
            .collect()
    }

    /// Credit the wallet. Returns the new balance.
    pub async fn add_money(&self, amount: f64) -> Result<f64, Refusal> {
        if !(amount > 0.0) {
            return Err(Refusal::Message("Invalid amount".to_string()));
        }
        if amount > MAX_TOP_UP {
            return Err(Refusal::Message("Maximum amount is $10,000".to_string()));
        }

        let mut inner = self.inner.write().await;
        inner.balance += amount;
        Ok(inner.balance)
    }

    pub async fn cart(&self) -> Vec<CartLine> {
        self.inner.read().await.cart.clone()
    }
}

/// Format cents the way the server prints decimal prices
pub fn format_cents(cents: u64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}
