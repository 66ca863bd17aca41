mod harness;

use harness::config::ConfigBuilder;
use picto_config::{AnyOrArray, CorsConfig};
use harness::server::TestServer;

#[tokio::test]
async fn health_endpoint_returns_ok() {
    let server = TestServer::start(ConfigBuilder::new().build()).await.unwrap();

    let resp = server.client().get(server.url("/health")).send().await.unwrap();

    assert_eq!(resp.status(), 200);

    let body = resp.text().await.unwrap();
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn health_endpoint_disabled() {
    let config = ConfigBuilder::new().without_health().build();

    let server = TestServer::start(config).await.unwrap();

    let resp = server.client().get(server.url("/health")).send().await.unwrap();

    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let server = TestServer::start(ConfigBuilder::new().build()).await.unwrap();

    let resp = server.client().get(server.url("/api/images")).send().await.unwrap();

    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn wrong_method_is_rejected() {
    let server = TestServer::start(ConfigBuilder::new().build()).await.unwrap();

    let resp = server.client().get(server.url("/api/images/generate")).send().await.unwrap();

    assert_eq!(resp.status(), 405);
}

#[tokio::test]
async fn cors_allows_configured_origin() {
    let config = ConfigBuilder::new()
        .with_cors(CorsConfig {
            origins: AnyOrArray::List(vec!["https://app.example".to_owned()]),
            ..CorsConfig::default()
        })
        .build();

    let server = TestServer::start(config).await.unwrap();

    let resp = server
        .client()
        .get(server.url("/health"))
        .header("origin", "https://app.example")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["access-control-allow-origin"], "https://app.example");
}
