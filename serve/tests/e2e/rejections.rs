use config::Settings;
use serde_json::json;

use super::common;

#[tokio::test]
async fn e2e_invalid_json_returns_400() {
    let server = common::spawn_default_server().await;
    let resp = reqwest::Client::new()
        .post(server.url("/control/template/preview"))
        .header("content-type", "application/json")
        .body("not valid json")
        .send()
        .await
        .unwrap();
    let (status, body) = common::read_json(resp).await;
    assert_eq!(status, 400);
    assert!(
        body["error"].as_str().is_some_and(|e| !e.is_empty()),
        "expected error body, got {}",
        body
    );
    server.stop().await;
}

#[tokio::test]
async fn e2e_oversized_template_returns_413() {
    let settings = Settings {
        max_template_bytes: 16,
        ..Settings::default()
    };
    let server = common::spawn_server(settings).await;

    let (status, body) = common::post_preview(&server, &json!({"template": "x".repeat(17)})).await;
    assert_eq!(status, 413);
    assert!(body["error"].as_str().unwrap().contains("limit"));

    let (status, _) = common::post_preview(&server, &json!({"template": "x".repeat(16)})).await;
    assert_eq!(status, 200);
    server.stop().await;
}

#[tokio::test]
async fn e2e_deeply_nested_template_is_a_syntax_error() {
    let server = common::spawn_default_server().await;

    let depth = 10_000;
    let template = format!("${{{}1{}}}", "(".repeat(depth), ")".repeat(depth));
    let (status, body) = common::post_preview(&server, &json!({"template": template})).await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], false);
    assert_eq!(body["errorType"], "SYNTAX_ERROR");

    let template = format!("{}x{}", "{{#each xs}}".repeat(depth / 2), "{{/each}}".repeat(depth / 2));
    let (status, body) = common::post_preview(&server, &json!({"template": template})).await;
    assert_eq!(status, 200);
    assert_eq!(body["errorType"], "SYNTAX_ERROR");

    let (status, body) =
        common::post_preview(&server, &json!({"template": "still ${fn.upper('up')}"})).await;
    assert_eq!(status, 200);
    assert_eq!(body["renderedPrompt"], "still UP");
    server.stop().await;
}

#[tokio::test]
async fn e2e_runaway_loop_is_a_function_error() {
    let server = common::spawn_default_server().await;
    let xs: Vec<u32> = (0..100).collect();
    let (status, body) = common::post_preview(
        &server,
        &json!({
            "template": "{{#each xs}}{{#each xs}}{{#each xs}}.{{/each}}{{/each}}{{/each}}",
            "input": {"xs": xs}
        }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["errorType"], "FUNCTION_ERROR");
    assert_eq!(body["errorExpression"], "xs");
    server.stop().await;
}
