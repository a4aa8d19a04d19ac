//! Live search results panel

use super::html::escape;
use crate::api::ProductHit;

pub const NO_RESULTS_TEXT: &str = "No products found";

/// State of the dropdown under the search box
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SearchPanel {
    #[default]
    Hidden,
    /// Visible, showing the "No products found" placeholder
    Empty,
    /// Visible, one row per product
    Results(Vec<ProductHit>),
}

impl SearchPanel {
    pub fn from_results(results: Vec<ProductHit>) -> Self {
        if results.is_empty() {
            Self::Empty
        } else {
            Self::Results(results)
        }
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self, Self::Hidden)
    }

    /// Inner HTML of the panel. A hidden panel keeps no rows.
    pub fn render_html(&self, placeholder_image: &str) -> String {
        match self {
            Self::Hidden => String::new(),
            Self::Empty => format!(r#"<div class="p-3">{}</div>"#, NO_RESULTS_TEXT),
            Self::Results(hits) => hits
                .iter()
                .map(|hit| render_row(hit, placeholder_image))
                .collect(),
        }
    }
}

/// Link target of a product row
pub fn product_url(id: &str) -> String {
    format!("/shop/product/{}/", urlencoding::encode(id))
}

fn render_row(hit: &ProductHit, placeholder_image: &str) -> String {
    let image = hit
        .image
        .as_deref()
        .filter(|src| !src.is_empty())
        .unwrap_or(placeholder_image);
    let name = escape(&hit.name);

    format!(
        concat!(
            r#"<div class="search-result-item p-2">"#,
            r#"<a href="{url}" class="text-decoration-none">"#,
            r#"<div class="d-flex align-items-center">"#,
            r#"<img src="{image}" alt="{name}" class="me-2" style="width: 40px; height: 40px; object-fit: cover;">"#,
            r#"<div><div class="fw-bold">{name}</div>"#,
            r#"<div class="text-muted small">${price}</div></div>"#,
            r#"</div></a></div>"#
        ),
        url = escape(&product_url(&hit.id)),
        image = escape(image),
        name = name,
        price = escape(&hit.price),
    )
}
