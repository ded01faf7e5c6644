use config::Settings;

use super::common;

#[tokio::test]
async fn e2e_health_returns_ok() {
    let server = common::spawn_default_server().await;
    let resp = reqwest::get(server.url("/health")).await.unwrap();
    let (status, body) = common::read_json(resp).await;
    assert_eq!(status, 200);
    assert_eq!(body, serde_json::json!({"status": "ok"}));
    server.stop().await;
}

#[tokio::test]
async fn e2e_routes_honor_base_path() {
    let settings = Settings {
        base_path: "/api/v1".into(),
        ..Settings::default()
    };
    let server = common::spawn_server(settings).await;
    assert!(server.base_url.ends_with("/api/v1"));

    let resp = reqwest::get(server.url("/health")).await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let unprefixed = server.base_url.trim_end_matches("/api/v1").to_string() + "/health";
    let resp = reqwest::get(unprefixed).await.unwrap();
    let (status, body) = common::read_json(resp).await;
    assert_eq!(status, 404);
    assert!(body["error"].is_string());
    server.stop().await;
}
