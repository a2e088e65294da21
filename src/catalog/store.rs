//! In-memory product catalog.

use std::path::Path;

use async_trait::async_trait;

use crate::catalog::{
    Categories, CatalogError, Pagination, Product, ProductList, ProductQuery, ProductSource,
    SortOrder,
};

/// Products held in memory, in feed order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Parse a JSON array of products.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    /// Load a JSON array of products from disk.
    pub async fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| CatalogError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let catalog = Self::from_json(&content)?;
        tracing::info!(path = %path.display(), products = catalog.len(), "Catalog loaded");
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.product_id == id)
    }

    /// Filter, sort and paginate.
    pub fn list(&self, query: &ProductQuery) -> ProductList {
        let search = query.search.as_deref().map(str::to_lowercase);
        let mut matched: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| match &search {
                Some(term) if !term.is_empty() => {
                    p.title.to_lowercase().contains(term) || p.brand.to_lowercase().contains(term)
                }
                _ => true,
            })
            .filter(|p| matches_category(&query.category1, &p.category1))
            .filter(|p| matches_category(&query.category2, &p.category2))
            .collect();

        match query.sort {
            SortOrder::PriceAsc => matched.sort_by_key(|p| p.price()),
            SortOrder::PriceDesc => matched.sort_by_key(|p| std::cmp::Reverse(p.price())),
            SortOrder::NameAsc => matched.sort_by(|a, b| a.title.cmp(&b.title)),
            SortOrder::NameDesc => matched.sort_by(|a, b| b.title.cmp(&a.title)),
        }

        let limit = query.limit.max(1);
        let page = query.page.max(1);
        let total = matched.len();
        let total_pages = total.div_ceil(limit);

        let products = matched
            .into_iter()
            .skip((page - 1) * limit)
            .take(limit)
            .cloned()
            .collect();

        ProductList {
            products,
            pagination: Pagination {
                page,
                limit,
                total,
                total_pages,
                has_next: page < total_pages,
                has_prev: page > 1,
            },
        }
    }

    /// Two-level category tree.
    pub fn categories(&self) -> Categories {
        let mut tree = Categories::new();
        for product in &self.products {
            if product.category1.is_empty() {
                continue;
            }
            let children = tree.entry(product.category1.clone()).or_default();
            if !product.category2.is_empty() {
                children.entry(product.category2.clone()).or_default();
            }
        }
        tree
    }
}

fn matches_category(wanted: &Option<String>, actual: &str) -> bool {
    match wanted.as_deref() {
        Some(w) if !w.is_empty() => w == actual,
        _ => true,
    }
}

#[async_trait]
impl ProductSource for Catalog {
    async fn list_products(&self, query: &ProductQuery) -> Result<ProductList, CatalogError> {
        Ok(self.list(query))
    }

    async fn product(&self, id: &str) -> Result<Option<Product>, CatalogError> {
        Ok(self.get(id).cloned())
    }

    async fn categories(&self) -> Result<Categories, CatalogError> {
        Ok(Catalog::categories(self))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn product(id: &str, title: &str, price: u64, cat1: &str, cat2: &str) -> Product {
        Product {
            product_id: id.to_string(),
            title: title.to_string(),
            link: String::new(),
            image: format!("https://img.example/{id}.jpg"),
            lprice: price.to_string(),
            hprice: String::new(),
            mall_name: "mall".to_string(),
            brand: String::new(),
            maker: String::new(),
            category1: cat1.to_string(),
            category2: cat2.to_string(),
            category3: String::new(),
            category4: String::new(),
        }
    }

    pub(crate) fn sample() -> Catalog {
        Catalog::new(vec![
            product("1", "Desk Lamp", 300, "Living", "Lighting"),
            product("2", "Floor Lamp", 100, "Living", "Lighting"),
            product("3", "Office Chair", 200, "Living", "Furniture"),
            product("4", "Mouse Pad", 50, "Digital", "Accessories"),
        ])
    }

    #[test]
    fn test_default_sort_is_price_ascending() {
        let list = sample().list(&ProductQuery::default());
        let ids: Vec<_> = list.products.iter().map(|p| p.product_id.as_str()).collect();
        assert_eq!(ids, ["4", "2", "3", "1"]);
        assert_eq!(list.pagination.total, 4);
        assert_eq!(list.pagination.total_pages, 1);
        assert!(!list.pagination.has_next);
    }

    #[test]
    fn test_search_and_category_filters() {
        let catalog = sample();
        let query = ProductQuery {
            search: Some("LAMP".into()),
            sort: SortOrder::NameAsc,
            ..Default::default()
        };
        let titles: Vec<_> = catalog.list(&query).products.into_iter().map(|p| p.title).collect();
        assert_eq!(titles, ["Desk Lamp", "Floor Lamp"]);

        let query = ProductQuery {
            category2: Some("Furniture".into()),
            ..Default::default()
        };
        assert_eq!(catalog.list(&query).products.len(), 1);
    }

    #[test]
    fn test_pagination() {
        let catalog = sample();
        let query = ProductQuery {
            limit: 3,
            page: 2,
            ..Default::default()
        };
        let list = catalog.list(&query);
        assert_eq!(list.products.len(), 1);
        assert_eq!(list.pagination.total_pages, 2);
        assert!(list.pagination.has_prev);
        assert!(!list.pagination.has_next);
    }

    #[test]
    fn test_categories_tree() {
        let tree = sample().categories();
        assert_eq!(tree.len(), 2);
        assert!(tree["Living"].contains_key("Lighting"));
        assert!(tree["Living"].contains_key("Furniture"));
    }

    #[test]
    fn test_from_json() {
        let json = r#"[{"productId":"85067212996","title":"Towel","lprice":"220","category1":"Living"}]"#;
        let catalog = Catalog::from_json(json).unwrap();
        let p = catalog.get("85067212996").unwrap();
        assert_eq!(p.price(), 220);
        assert_eq!(p.category1, "Living");
        assert!(Catalog::from_json("{").is_err());
    }
}
