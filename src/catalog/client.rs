//! HTTP client for the catalog data API.

use async_trait::async_trait;
use reqwest::StatusCode;
use url::Url;

use crate::catalog::{Categories, CatalogError, Product, ProductList, ProductQuery, ProductSource};

/// Reads products from a running data API (`{base}/api/...`).
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: Url,
}

impl CatalogClient {
    /// `base_url` is the server origin, e.g. `http://127.0.0.1:9999`.
    pub fn new(base_url: &str) -> Result<Self, CatalogError> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, CatalogError> {
        Ok(self.base_url.join(path)?)
    }

    async fn fetch(&self, url: Url, query: Option<&ProductQuery>) -> Result<reqwest::Response, CatalogError> {
        let mut request = self.http.get(url.clone());
        if let Some(query) = query {
            request = request.query(query);
        }
        let response = request.send().await?;
        tracing::debug!(url = %url, status = %response.status(), "Catalog request");
        Ok(response)
    }
}

fn ensure_success(url: &Url, response: &reqwest::Response) -> Result<(), CatalogError> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(CatalogError::Status {
            url: url.to_string(),
            status: response.status().as_u16(),
        })
    }
}

#[async_trait]
impl ProductSource for CatalogClient {
    async fn list_products(&self, query: &ProductQuery) -> Result<ProductList, CatalogError> {
        let url = self.endpoint("api/products")?;
        let response = self.fetch(url.clone(), Some(query)).await?;
        ensure_success(&url, &response)?;
        Ok(response.json().await?)
    }

    async fn product(&self, id: &str) -> Result<Option<Product>, CatalogError> {
        let mut url = self.endpoint("api/products/")?;
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .push(id);
        let response = self.fetch(url.clone(), None).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        ensure_success(&url, &response)?;
        Ok(Some(response.json().await?))
    }

    async fn categories(&self) -> Result<Categories, CatalogError> {
        let url = self.endpoint("api/categories")?;
        let response = self.fetch(url.clone(), None).await?;
        ensure_success(&url, &response)?;
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_join() {
        let client = CatalogClient::new("http://127.0.0.1:9999").unwrap();
        assert_eq!(
            client.endpoint("api/products").unwrap().as_str(),
            "http://127.0.0.1:9999/api/products"
        );

        let prefixed = CatalogClient::new("http://127.0.0.1:9999/shop").unwrap();
        assert_eq!(
            prefixed.endpoint("api/products").unwrap().as_str(),
            "http://127.0.0.1:9999/shop/api/products"
        );
    }

    #[tokio::test]
    async fn test_reads_from_running_endpoint() {
        use crate::catalog::store::tests::sample;
        use crate::export::{CatalogEndpoint, EndpointLauncher, RunningEndpoint};
        use std::sync::Arc;

        let endpoint = CatalogEndpoint::on_port(Arc::new(sample()), 0)
            .start()
            .await
            .unwrap();
        let client = CatalogClient::new(&endpoint.base_url()).unwrap();

        let list = client.list_products(&ProductQuery::first_page(20)).await.unwrap();
        assert_eq!(list.products.len(), 4);
        assert_eq!(list.products[0].product_id, "4");

        let chair = client.product("3").await.unwrap().unwrap();
        assert_eq!(chair.title, "Office Chair");
        assert!(client.product("missing").await.unwrap().is_none());

        let categories = client.categories().await.unwrap();
        assert!(categories.contains_key("Living"));

        endpoint.close().await.unwrap();
    }

    #[test]
    fn test_invalid_base() {
        assert!(matches!(CatalogClient::new("not a url"), Err(CatalogError::Url(_))));
    }
}
