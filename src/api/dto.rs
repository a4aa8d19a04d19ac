//! Data Transfer Objects
//!
//! Request and response bodies of the storefront JSON endpoints.
//! Identifiers, prices and totals are kept as display text: the backend
//! sends some of them as JSON numbers and others as strings, and the page
//! only ever prints or compares them.

use serde::{Deserialize, Deserializer, Serialize};

// ============================================
// Requests
// ============================================

/// POST /add-to-cart/
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: String,
    pub quantity: u32,
}

/// POST /update-cart-item/
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateCartItemRequest {
    pub cart_item_id: String,
    pub quantity: u32,
}

/// POST /accounts/add-money/
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddMoneyRequest {
    pub amount: f64,
}

// ============================================
// Responses
// ============================================

/// Common shape of the mutating endpoints' replies
pub trait ServerReply {
    fn succeeded(&self) -> bool;

    fn message(&self) -> Option<&str>;

    /// Text to show when the server refused the action.
    fn failure_text(&self, fallback: &str) -> String {
        match self.message() {
            Some(m) if !m.is_empty() => m.to_string(),
            _ => fallback.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddToCartResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, deserialize_with = "optional_text")]
    pub cart_count: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateCartItemResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, deserialize_with = "optional_text")]
    pub cart_total: Option<String>,
    #[serde(default)]
    pub item_total: Option<ItemTotal>,
    #[serde(default)]
    pub message: Option<String>,
}

/// New total of the line item that was changed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemTotal {
    #[serde(deserialize_with = "text")]
    pub item_id: String,
    #[serde(deserialize_with = "text")]
    pub total: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Option<Vec<ProductHit>>,
}

/// One product row of a live search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductHit {
    #[serde(deserialize_with = "text")]
    pub id: String,
    pub name: String,
    #[serde(deserialize_with = "text")]
    pub price: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddMoneyResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub new_balance: Option<f64>,
}

impl ServerReply for AddToCartResponse {
    fn succeeded(&self) -> bool {
        self.success
    }

    fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl ServerReply for UpdateCartItemResponse {
    fn succeeded(&self) -> bool {
        self.success
    }

    fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl ServerReply for AddMoneyResponse {
    fn succeeded(&self) -> bool {
        self.success
    }

    fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

// ============================================
// Scalar-as-text helpers
// ============================================

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Scalar::Text(s) => s,
            Scalar::Int(i) => i.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Scalar::deserialize(deserializer).map(Scalar::into_text)
}

fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(Scalar::into_text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_to_cart_response_numeric_count() {
        let resp: AddToCartResponse =
            serde_json::from_str(r#"{"success": true, "cart_count": 5}"#).unwrap();
        assert!(resp.succeeded());
        assert_eq!(resp.cart_count.as_deref(), Some("5"));
        assert_eq!(resp.message, None);
    }

    #[test]
    fn test_failure_text_falls_back() {
        let resp: AddToCartResponse = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert!(!resp.succeeded());
        assert_eq!(resp.failure_text("Error adding product to cart"), "Error adding product to cart");

        let resp: AddToCartResponse =
            serde_json::from_str(r#"{"success": false, "message": "Invalid quantity. Available stock: 2"}"#)
                .unwrap();
        assert_eq!(resp.failure_text("unused"), "Invalid quantity. Available stock: 2");
    }

    #[test]
    fn test_missing_success_is_failure() {
        let resp: AddMoneyResponse = serde_json::from_str("{}").unwrap();
        assert!(!resp.succeeded());
    }

    #[test]
    fn test_update_response_mixed_scalars() {
        let resp: UpdateCartItemResponse = serde_json::from_str(
            r#"{"success": true, "cart_total": "59.97", "item_total": {"item_id": 7, "total": "19.99"}}"#,
        )
        .unwrap();
        assert_eq!(resp.cart_total.as_deref(), Some("59.97"));
        let item = resp.item_total.unwrap();
        assert_eq!(item.item_id, "7");
        assert_eq!(item.total, "19.99");
    }

    #[test]
    fn test_search_response_with_null_image() {
        let resp: SearchResponse = serde_json::from_str(
            r#"{"results": [{"id": 3, "name": "Running Shoe", "price": "49.50", "image": null}]}"#,
        )
        .unwrap();
        let results = resp.results.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "3");
        assert_eq!(results[0].image, None);
    }

    #[test]
    fn test_search_response_without_results_field() {
        let resp: SearchResponse = serde_json::from_str(r#"{"error": "boom"}"#).unwrap();
        assert!(resp.results.is_none());
    }

    #[test]
    fn test_request_bodies() {
        let body = serde_json::to_value(AddToCartRequest {
            product_id: "42".to_string(),
            quantity: 3,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"product_id": "42", "quantity": 3}));

        let body = serde_json::to_value(AddMoneyRequest { amount: 25.5 }).unwrap();
        assert_eq!(body, serde_json::json!({"amount": 25.5}));
    }
}
