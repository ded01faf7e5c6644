use serde_json::json;

use super::common;

#[tokio::test]
async fn e2e_preview_renders_template() {
    let server = common::spawn_default_server().await;
    let (status, body) = common::post_preview(
        &server,
        &json!({
            "operationType": "SUMMARY",
            "template": "Hello ${fn.defaultValue(name, 'Guest')}, ${fn.upper(ctx.tenant)}",
            "strictRender": true,
            "input": {"name": "Ada"},
            "ctx": {"tenant": "acme"}
        }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({"success": true, "renderedPrompt": "Hello Ada, ACME"})
    );
    server.stop().await;
}

#[tokio::test]
async fn e2e_preview_failure_is_http_200() {
    let server = common::spawn_default_server().await;
    let (status, body) = common::post_preview(
        &server,
        &json!({"template": "Hi ${missing}", "strictRender": true, "input": {}}),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["errorType"], json!("UNDEFINED_VARIABLE"));
    assert_eq!(body["errorExpression"], json!("missing"));
    assert!(body["errorMessage"].is_string());
    assert!(body.get("renderedPrompt").is_none());
    server.stop().await;
}

#[tokio::test]
async fn e2e_preview_lenient_and_local_prompt_fallback() {
    let server = common::spawn_default_server().await;
    let (status, body) = common::post_preview(
        &server,
        &json!({"template": "", "localPrompt": "base ${missing}!"}),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"success": true, "renderedPrompt": "base !"}));
    server.stop().await;
}

#[tokio::test]
async fn e2e_preview_sets_request_id() {
    let server = common::spawn_default_server().await;
    let resp = reqwest::Client::new()
        .post(server.url("/control/template/preview"))
        .json(&json!({"template": "x"}))
        .send()
        .await
        .unwrap();
    let id = resp
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .expect("x-request-id header");
    assert!(uuid::Uuid::parse_str(&id).is_ok());
    server.stop().await;
}

#[tokio::test]
async fn e2e_concurrent_previews() {
    let server = common::spawn_default_server().await;
    let mut tasks = Vec::new();
    for i in 0..8 {
        let url = server.url("/control/template/preview");
        tasks.push(tokio::spawn(async move {
            let resp = reqwest::Client::new()
                .post(url)
                .json(&json!({"template": "n=${n}", "input": {"n": i}}))
                .send()
                .await
                .unwrap();
            let (_, body) = common::read_json(resp).await;
            (i, body)
        }));
    }
    for task in tasks {
        let (i, body) = task.await.unwrap();
        assert_eq!(body["renderedPrompt"], json!(format!("n={}", i)));
    }
    server.stop().await;
}
