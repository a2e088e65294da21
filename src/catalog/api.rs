//! HTTP data API over a catalog.
//!
//! # Endpoints
//! - `GET /products` listing (query: limit, page, search, category1, category2, sort)
//! - `GET /products/{id}` single product, 404 when unknown
//! - `GET /categories` category tree
//!
//! Mounted under `/api` by the live server and the export data endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use crate::catalog::{Catalog, ProductQuery};

/// Build the API router (unprefixed; nest it under `/api`).
pub fn api_router(catalog: Arc<Catalog>) -> Router {
    Router::new()
        .route("/products", get(list_products))
        .route("/products/{id}", get(get_product))
        .route("/categories", get(get_categories))
        .fallback(not_found)
        .with_state(catalog)
}

async fn list_products(
    State(catalog): State<Arc<Catalog>>,
    Query(query): Query<ProductQuery>,
) -> Response {
    tracing::debug!(limit = query.limit, page = query.page, "Listing products");
    Json(catalog.list(&query)).into_response()
}

async fn get_product(State(catalog): State<Arc<Catalog>>, Path(id): Path<String>) -> Response {
    match catalog.get(&id) {
        Some(product) => Json(product.clone()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "Product not found" })),
        )
            .into_response(),
    }
}

async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "Not found" })),
    )
        .into_response()
}

async fn get_categories(State(catalog): State<Arc<Catalog>>) -> Response {
    Json(catalog.categories()).into_response()
}
