//! HTML fragments for storefront pages.

use crate::catalog::Product;

/// Escape text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn title(text: &str) -> String {
    format!("<title>{}</title>", escape_html(text))
}

fn product_href(base: &str, product: &Product) -> String {
    format!("{}/product/{}/", base, escape_html(&product.product_id))
}

fn product_card(base: &str, product: &Product) -> String {
    format!(
        r#"<li class="product-card" data-product-id="{id}"><a href="{href}"><img src="{image}" alt="{name}" loading="lazy"><h3>{name}</h3><p class="brand">{brand}</p><p class="price">{price}원</p></a></li>"#,
        id = escape_html(&product.product_id),
        href = product_href(base, product),
        image = escape_html(&product.image),
        name = escape_html(&product.title),
        brand = escape_html(&product.brand),
        price = product.price(),
    )
}

pub fn home(base: &str, products: &[Product], total: usize, search: Option<&str>) -> String {
    let mut html = String::from(r#"<main class="home"><header><h1>Storefront</h1></header>"#);
    if let Some(term) = search.filter(|s| !s.is_empty()) {
        html.push_str(&format!(
            r#"<p class="search-summary">Results for "{}"</p>"#,
            escape_html(term)
        ));
    }
    html.push_str(&format!(r#"<p class="total">{total} products</p><ul class="product-grid">"#));
    for product in products {
        html.push_str(&product_card(base, product));
    }
    html.push_str("</ul></main>");
    html
}

pub fn product_detail(base: &str, product: &Product, related: &[Product]) -> String {
    let mut html = format!(
        r#"<main class="product-detail"><nav class="breadcrumb"><a href="{base}/">Home</a> &gt; {cat1} &gt; {cat2}</nav><article><img src="{image}" alt="{name}"><h1>{name}</h1><p class="brand">{brand}</p><p class="price">{price}원</p><p class="mall">{mall}</p></article>"#,
        base = base,
        cat1 = escape_html(&product.category1),
        cat2 = escape_html(&product.category2),
        image = escape_html(&product.image),
        name = escape_html(&product.title),
        brand = escape_html(&product.brand),
        price = product.price(),
        mall = escape_html(&product.mall_name),
    );
    if !related.is_empty() {
        html.push_str(r#"<section class="related"><h2>Related products</h2><ul class="product-grid">"#);
        for item in related {
            html.push_str(&product_card(base, item));
        }
        html.push_str("</ul></section>");
    }
    html.push_str("</main>");
    html
}

pub fn not_found(base: &str) -> String {
    format!(
        r#"<main class="not-found"><h1>404</h1><p>Page not found.</p><a href="{base}/">Back to home</a></main>"#
    )
}
