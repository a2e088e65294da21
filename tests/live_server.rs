//! Live SSR server over a real socket.

use std::sync::Arc;

use tokio::net::TcpListener;

use storefront_render::app::StorefrontRenderer;
use storefront_render::config::ServerConfig;
use storefront_render::http::HttpServer;
use storefront_render::lifecycle::Shutdown;
use storefront_render::render::LiveRenderProvider;

mod common;

#[tokio::test]
async fn test_live_render_and_api() {
    let dir = tempfile::tempdir().unwrap();
    common::write_template(dir.path());

    let catalog = Arc::new(common::fixture_catalog());
    let renderer = StorefrontRenderer::new("/", catalog.clone()).unwrap();
    let provider = Arc::new(LiveRenderProvider::new(dir.path().join("index.html"), Arc::new(renderer)));
    let server = HttpServer::new(&ServerConfig::default(), provider, catalog);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let handle = tokio::spawn(server.run(listener, shutdown.signal()));

    let client = reqwest::Client::new();

    let home = client
        .get(format!("http://{addr}/?search=tote"))
        .send()
        .await
        .unwrap();
    assert_eq!(home.status(), 200);
    assert!(home.headers().contains_key("x-request-id"));
    let body = home.text().await.unwrap();
    assert!(body.contains("Leather Tote"));
    assert!(!body.contains("Wool Scarf"));

    let api: serde_json::Value = client
        .get(format!("http://{addr}/api/products?sort=price_desc"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(api["products"][0]["productId"], "p3");
    assert_eq!(api["pagination"]["total"], 3);

    let missing = client
        .get(format!("http://{addr}/api/products/nope"))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), 404);

    // The live provider re-reads the template per request.
    std::fs::write(dir.path().join("index.html"), "<main><!--app-html--></main>").unwrap();
    let body = client
        .get(format!("http://{addr}/unknown"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.starts_with("<main>"));

    drop(client);
    shutdown.trigger();
    handle.await.unwrap().unwrap();
}
