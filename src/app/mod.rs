//! The storefront's render function.
//!
//! # Routes
//! - `/` product listing (query: search, category1, category2, sort, limit)
//! - `/product/:id/` product detail with related products
//! - anything else, `/404` included: not-found page
//!
//! # Design Decisions
//! - The route table is built once; each render gets its own single-shot
//!   navigator, so concurrent requests never share navigation state
//! - Reads go through `ProductSource`, so the same renderer works against
//!   the in-memory catalog or the export data endpoint

pub mod views;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::catalog::{ProductQuery, ProductSource, SortOrder};
use crate::render::{Render, RenderError, RenderResult};
use crate::routing::{Navigator, PatternError, QueryMap, RouteTable};

/// Maximum related products shown on a detail page.
const RELATED_LIMIT: usize = 20;

/// Page kinds the storefront renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Product,
}

/// Register the storefront's routes, most specific first.
pub fn storefront_routes(base: &str) -> Result<RouteTable<Page>, PatternError> {
    let mut table = RouteTable::with_base(base);
    table.register("/", Page::Home)?;
    table.register("/product/:id/", Page::Product)?;
    Ok(table)
}

/// Renders storefront pages from a product source.
pub struct StorefrontRenderer {
    routes: Arc<RouteTable<Page>>,
    source: Arc<dyn ProductSource>,
}

impl StorefrontRenderer {
    pub fn new(base: &str, source: Arc<dyn ProductSource>) -> Result<Self, PatternError> {
        Ok(Self {
            routes: Arc::new(storefront_routes(base)?),
            source,
        })
    }

    fn base(&self) -> &str {
        self.routes.base()
    }

    async fn render_home(&self, query: &QueryMap) -> Result<RenderResult, RenderError> {
        let mut products_query = ProductQuery {
            search: query.get("search").map(str::to_string),
            category1: query.get("category1").map(str::to_string),
            category2: query.get("category2").map(str::to_string),
            sort: query.get("sort").map(SortOrder::parse).unwrap_or_default(),
            ..Default::default()
        };
        if let Some(limit) = query.get("limit").and_then(|l| l.parse().ok()) {
            products_query.limit = limit;
        }

        let list = self.source.list_products(&products_query).await?;
        let categories = self.source.categories().await?;
        let html = views::home(
            self.base(),
            &list.products,
            list.pagination.total,
            products_query.search.as_deref(),
        );

        Ok(RenderResult::new(html)
            .with_head(views::title("Storefront - Home"))
            .with_data(json!({
                "products": list.products,
                "categories": categories,
                "totalCount": list.pagination.total,
                "filters": query,
            })))
    }

    async fn render_product(&self, id: &str) -> Result<RenderResult, RenderError> {
        let Some(product) = self.source.product(id).await? else {
            tracing::debug!(product_id = %id, "Unknown product, rendering not found");
            return Ok(self.render_not_found());
        };

        let related = if product.category2.is_empty() {
            Vec::new()
        } else {
            let query = ProductQuery {
                category2: Some(product.category2.clone()),
                limit: RELATED_LIMIT + 1,
                ..Default::default()
            };
            self.source
                .list_products(&query)
                .await?
                .products
                .into_iter()
                .filter(|p| p.product_id != product.product_id)
                .take(RELATED_LIMIT)
                .collect()
        };

        let html = views::product_detail(self.base(), &product, &related);
        Ok(RenderResult::new(html)
            .with_head(views::title(&format!("{} - Storefront", product.title)))
            .with_data(json!({
                "currentProduct": product,
                "relatedProducts": related,
            })))
    }

    fn render_not_found(&self) -> RenderResult {
        RenderResult::new(views::not_found(self.base())).with_head(views::title("Page not found - Storefront"))
    }
}

#[async_trait]
impl Render for StorefrontRenderer {
    async fn render(&self, url: &str, query: &QueryMap) -> Result<RenderResult, RenderError> {
        let navigator = Navigator::single_shot(Arc::clone(&self.routes));
        navigator.set_query(query.clone());
        navigator.push(url);

        match navigator.route() {
            Some(route) => match route.handler() {
                Page::Home => self.render_home(&navigator.query()).await,
                Page::Product => {
                    let id = route.param("id").unwrap_or_default();
                    self.render_product(id).await
                }
            },
            None => Ok(self.render_not_found()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::store::tests::sample;

    fn renderer(base: &str) -> StorefrontRenderer {
        StorefrontRenderer::new(base, Arc::new(sample())).unwrap()
    }

    #[tokio::test]
    async fn test_home_lists_products() {
        let out = renderer("").render("/", &QueryMap::new()).await.unwrap();
        assert!(out.html.contains("4 products"));
        assert!(out.head.unwrap().contains("Home"));
        let data = out.data.unwrap();
        assert_eq!(data["totalCount"], 4);
        assert_eq!(data["products"][0]["productId"], "4");
    }

    #[tokio::test]
    async fn test_home_honours_query() {
        let query = QueryMap::parse("search=lamp&sort=price_desc&limit=1");
        let out = renderer("").render("/", &query).await.unwrap();
        let data = out.data.unwrap();
        assert_eq!(data["totalCount"], 2);
        assert_eq!(data["products"].as_array().unwrap().len(), 1);
        assert_eq!(data["products"][0]["productId"], "1");
        assert_eq!(data["filters"]["search"], "lamp");
        assert!(out.html.contains(r#"Results for "lamp""#));
    }

    #[tokio::test]
    async fn test_product_page_with_related() {
        let out = renderer("").render("/product/1/", &QueryMap::new()).await.unwrap();
        assert!(out.html.contains("<h1>Desk Lamp</h1>"));
        let data = out.data.unwrap();
        assert_eq!(data["currentProduct"]["productId"], "1");
        let related = data["relatedProducts"].as_array().unwrap();
        assert_eq!(related.len(), 1);
        assert_eq!(related[0]["productId"], "2");
    }

    #[tokio::test]
    async fn test_unknown_product_and_paths_render_not_found() {
        let r = renderer("");
        for url in ["/product/999/", "/404", "/nope/deeper"] {
            let out = r.render(url, &QueryMap::new()).await.unwrap();
            assert!(out.html.contains("404"), "{url}");
            assert!(out.data.is_none());
        }
    }

    #[tokio::test]
    async fn test_base_path_links() {
        let r = renderer("/shop/");
        let out = r.render("/shop/product/3/", &QueryMap::new()).await.unwrap();
        assert!(out.html.contains(r#"href="/shop/""#));

        let home = r.render("/", &QueryMap::new()).await.unwrap();
        assert!(home.html.contains(r#"href="/shop/product/4/""#));
    }

    #[tokio::test]
    async fn test_render_is_deterministic() {
        let r = renderer("");
        let a = r.render("/product/2/", &QueryMap::new()).await.unwrap();
        let b = r.render("/product/2/", &QueryMap::new()).await.unwrap();
        assert_eq!(a, b);
    }
}
