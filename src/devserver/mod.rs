//! Development Backend
//!
//! A stand-in for the storefront web application, built with Axum. Serves
//! the same four JSON endpoints from an in-memory [`Catalog`] so the client
//! can be exercised without the real server.
//!
//! # Endpoints
//!
//! - `GET /` - Landing page; hands out the `csrftoken` cookie
//! - `POST /add-to-cart/`
//! - `POST /update-cart-item/`
//! - `GET /search/?q=`
//! - `POST /accounts/add-money/`
//!
//! Every POST must echo the `csrftoken` cookie in `X-CSRFToken`, otherwise
//! it is answered with a plain-text 403 page.

pub mod catalog;
mod routes;

pub use catalog::{Catalog, Product};

use axum::{
    body::Body,
    extract::Request,
    http::{Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use thiserror::Error;
use tower_http::trace::TraceLayer;

use crate::api::{ADD_MONEY_PATH, ADD_TO_CART_PATH, SEARCH_PATH, UPDATE_CART_ITEM_PATH};
use crate::config::DevServerConfig;
use crate::csrf::get_cookie;

pub const CSRF_COOKIE: &str = "csrftoken";
pub const CSRF_HEADER: &str = "x-csrftoken";

#[derive(Error, Debug)]
pub enum DevServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Build the router with all routes and middleware
pub fn build_router(catalog: Arc<Catalog>) -> Router {
    Router::new()
        .route("/", get(routes::landing))
        .route(ADD_TO_CART_PATH, post(routes::add_to_cart))
        .route(UPDATE_CART_ITEM_PATH, post(routes::update_cart_item))
        .route(SEARCH_PATH, get(routes::search))
        .route(ADD_MONEY_PATH, post(routes::add_money))
        .layer(middleware::from_fn(csrf_guard))
        .layer(TraceLayer::new_for_http())
        .with_state(catalog)
}

/// Start the development server
pub async fn serve(catalog: Arc<Catalog>, config: &DevServerConfig) -> Result<(), DevServerError> {
    let router = build_router(catalog);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("VibeMart dev backend listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("VibeMart dev backend shut down");
    Ok(())
}

/// Refuse state-changing requests whose CSRF header does not match the
/// CSRF cookie.
async fn csrf_guard(request: Request, next: Next) -> Response {
    if request.method() != Method::POST {
        return next.run(request).await;
    }

    let headers = request.headers();
    let cookie = headers
        .get(axum::http::header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|cookies| get_cookie(cookies, CSRF_COOKIE));
    let header = headers
        .get(CSRF_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    match (cookie, header) {
        (Some(cookie), Some(header)) if !cookie.is_empty() && cookie == header => {
            next.run(request).await
        }
        _ => {
            tracing::warn!(path = %request.uri().path(), "CSRF verification failed");
            (
                StatusCode::FORBIDDEN,
                Body::from("CSRF verification failed. Request aborted."),
            )
                .into_response()
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
