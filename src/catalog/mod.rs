//! Product catalog: the data source pages are rendered from.
//!
//! # Data Flow
//! ```text
//! items.json
//!     → store.rs (in-memory Catalog: filter, sort, paginate)
//!     → api.rs (/api/products, /api/products/{id}, /api/categories)
//!     → client.rs (CatalogClient over HTTP)
//!
//! Renderers depend only on the ProductSource trait, so the same render code
//! reads from memory (tests, live server) or over HTTP (export endpoint).
//! ```

pub mod api;
pub mod client;
pub mod store;

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use api::api_router;
pub use client::CatalogClient;
pub use store::Catalog;

/// Errors from catalog access.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid catalog data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("catalog endpoint {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("invalid catalog endpoint URL: {0}")]
    Url(#[from] url::ParseError),
}

/// One product as delivered by the shopping feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_id: String,
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub image: String,
    /// Lowest price, as a decimal string.
    #[serde(default)]
    pub lprice: String,
    #[serde(default)]
    pub hprice: String,
    #[serde(default)]
    pub mall_name: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub maker: String,
    #[serde(default)]
    pub category1: String,
    #[serde(default)]
    pub category2: String,
    #[serde(default)]
    pub category3: String,
    #[serde(default)]
    pub category4: String,
}

impl Product {
    /// Numeric lowest price; unparseable prices sort as zero.
    pub fn price(&self) -> u64 {
        self.lprice.trim().parse().unwrap_or(0)
    }
}

/// Listing order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    PriceAsc,
    PriceDesc,
    NameAsc,
    NameDesc,
}

impl SortOrder {
    /// Lenient parse used for page queries; unknown values fall back to the default.
    pub fn parse(value: &str) -> Self {
        match value {
            "price_desc" => SortOrder::PriceDesc,
            "name_asc" => SortOrder::NameAsc,
            "name_desc" => SortOrder::NameDesc,
            _ => SortOrder::PriceAsc,
        }
    }
}

/// Listing request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductQuery {
    pub limit: usize,
    pub page: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category2: Option<String>,
    pub sort: SortOrder,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            limit: 20,
            page: 1,
            search: None,
            category1: None,
            category2: None,
            sort: SortOrder::default(),
        }
    }
}

impl ProductQuery {
    pub fn first_page(limit: usize) -> Self {
        Self {
            limit,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

/// One page of listing results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductList {
    pub products: Vec<Product>,
    pub pagination: Pagination,
}

/// Category tree: `category1 -> category2 -> {}`.
pub type Categories = BTreeMap<String, BTreeMap<String, BTreeMap<String, String>>>;

/// Read access to products, local or remote.
#[async_trait]
pub trait ProductSource: Send + Sync {
    async fn list_products(&self, query: &ProductQuery) -> Result<ProductList, CatalogError>;

    async fn product(&self, id: &str) -> Result<Option<Product>, CatalogError>;

    async fn categories(&self) -> Result<Categories, CatalogError>;
}
