//! Page enumeration.

use std::path::{Path, PathBuf};

use crate::catalog::{ProductQuery, ProductSource};
use crate::export::ExportError;
use crate::routing::QueryMap;

/// One page to export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDescriptor {
    /// URL handed to the renderer.
    pub url: String,
    /// Destination document.
    pub file_path: PathBuf,
    /// Query handed to the renderer.
    pub query: QueryMap,
}

impl PageDescriptor {
    pub fn new(url: impl Into<String>, file_path: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            file_path: file_path.into(),
            query: QueryMap::new(),
        }
    }

    /// Page for one product: `/product/<id>/` → `<dist>/product/<id>/index.html`.
    pub fn product(dist_dir: &Path, id: &str) -> Result<Self, ExportError> {
        if id.is_empty() || id == "." || id == ".." || id.contains(['/', '\\']) {
            return Err(ExportError::InvalidIdentifier(id.to_string()));
        }
        Ok(Self::new(
            format!("/product/{id}/"),
            dist_dir.join("product").join(id).join("index.html"),
        ))
    }
}

/// Home, not-found, then one page per product from the first listing page.
pub async fn enumerate_pages(
    source: &dyn ProductSource,
    dist_dir: &Path,
    limit: usize,
) -> Result<Vec<PageDescriptor>, ExportError> {
    let listing = source
        .list_products(&ProductQuery::first_page(limit))
        .await
        .map_err(ExportError::Enumerate)?;

    let mut pages = vec![
        PageDescriptor::new("/", dist_dir.join("index.html")),
        PageDescriptor::new("/404", dist_dir.join("404.html")),
    ];
    for product in listing.products.iter().take(limit) {
        pages.push(PageDescriptor::product(dist_dir, &product.product_id)?);
    }
    Ok(pages)
}
