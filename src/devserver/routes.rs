//! Dev backend handlers
//!
//! Bodies are parsed leniently the way the production views do: numbers
//! may arrive as JSON numbers or numeric strings, and a body that is not
//! JSON is answered with `success: false` rather than a 4xx.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

use super::catalog::{format_cents, Catalog, Refusal};
use super::CSRF_COOKIE;
use crate::csrf::get_cookie;

const LANDING_HTML: &str = r#"<!DOCTYPE html>
<html><head><title>VibeMart</title></head>
<body><div class="container"><h1>VibeMart dev backend</h1></div></body></html>"#;

/// GET /
///
/// Hands out a CSRF cookie, keeping the one the client already has.
pub async fn landing(headers: HeaderMap) -> impl IntoResponse {
    let token = headers
        .get(axum::http::header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|cookies| get_cookie(cookies, CSRF_COOKIE))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string());

    (
        [(SET_COOKIE, format!("{}={}; Path=/; SameSite=Lax", CSRF_COOKIE, token))],
        Html(LANDING_HTML),
    )
}

/// POST /add-to-cart/
pub async fn add_to_cart(State(catalog): State<Arc<Catalog>>, body: Bytes) -> Response {
    let Ok(data) = serde_json::from_slice::<Value>(&body) else {
        return refused("Invalid request");
    };
    let Some(quantity) = int_field(&data, "quantity", 1) else {
        return refused("Invalid request");
    };
    let Some(product_id) = data.get("product_id").and_then(as_int) else {
        return not_found();
    };
    let Ok(product_id) = u32::try_from(product_id) else {
        return not_found();
    };

    match catalog.add_to_cart(product_id, quantity).await {
        Ok(cart_count) => {
            tracing::info!(product_id, quantity, cart_count, "Added to cart");
            Json(json!({
                "success": true,
                "message": "Product added to cart successfully!",
                "cart_count": cart_count,
            }))
            .into_response()
        }
        Err(refusal) => refusal_response(refusal),
    }
}

/// POST /update-cart-item/
pub async fn update_cart_item(State(catalog): State<Arc<Catalog>>, body: Bytes) -> Response {
    let Ok(data) = serde_json::from_slice::<Value>(&body) else {
        return refused("Invalid request");
    };
    let Some(quantity) = int_field(&data, "quantity", 1) else {
        return refused("Invalid request");
    };
    let item_id = data.get("cart_item_id").cloned().unwrap_or(Value::Null);
    let Some(line_id) = as_int(&item_id).and_then(|id| u32::try_from(id).ok()) else {
        return not_found();
    };

    match catalog.update_line(line_id, quantity).await {
        Ok(update) => Json(json!({
            "success": true,
            "cart_total": format_cents(update.cart_total_cents),
            "item_total": {
                "item_id": item_id,
                "total": format_cents(update.line_total_cents),
            },
        }))
        .into_response(),
        Err(refusal) => refusal_response(refusal),
    }
}

/// GET /search/?q=
pub async fn search(
    State(catalog): State<Arc<Catalog>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let query = params.get("q").map(String::as_str).unwrap_or_default();
    let results: Vec<Value> = catalog
        .search(query)
        .await
        .into_iter()
        .map(|p| {
            json!({
                "id": p.id,
                "name": p.name,
                "price": format_cents(p.price_cents),
                "image": p.image,
            })
        })
        .collect();

    tracing::debug!(query, hits = results.len(), "Search");
    Json(json!({ "results": results }))
}

/// POST /accounts/add-money/
pub async fn add_money(State(catalog): State<Arc<Catalog>>, body: Bytes) -> Response {
    let amount = serde_json::from_slice::<Value>(&body)
        .ok()
        .and_then(|data| match data.get("amount") {
            None => Some(0.0),
            Some(v) => as_float(v),
        });
    let Some(amount) = amount else {
        return refused("Invalid request data");
    };

    match catalog.add_money(amount).await {
        Ok(balance) => Json(json!({
            "success": true,
            "message": format!("${:?} added to wallet successfully!", amount),
            "new_balance": balance,
        }))
        .into_response(),
        Err(refusal) => refusal_response(refusal),
    }
}

fn refused(message: &str) -> Response {
    Json(json!({ "success": false, "message": message })).into_response()
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Html("<h1>Not Found</h1>")).into_response()
}

fn refusal_response(refusal: Refusal) -> Response {
    match refusal {
        Refusal::NotFound => not_found(),
        Refusal::Message(message) => refused(&message),
    }
}

/// Integer field with a default when absent
fn int_field(data: &Value, key: &str, default: i64) -> Option<i64> {
    match data.get(key) {
        None => Some(default),
        Some(v) => as_int(v),
    }
}

fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(*b as i64),
        _ => None,
    }
}

fn as_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lenient_numbers() {
        assert_eq!(as_int(&json!(3)), Some(3));
        assert_eq!(as_int(&json!("4")), Some(4));
        assert_eq!(as_int(&json!(2.7)), Some(2));
        assert_eq!(as_int(&json!("x")), None);
        assert_eq!(as_int(&Value::Null), None);
        assert_eq!(as_float(&json!("12.5")), Some(12.5));
        assert_eq!(int_field(&json!({}), "quantity", 1), Some(1));
    }
}
