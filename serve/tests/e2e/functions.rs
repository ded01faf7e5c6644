use serde_json::Value;

use super::common;

#[tokio::test]
async fn e2e_functions_lists_catalog() {
    let server = common::spawn_default_server().await;
    let resp = reqwest::get(server.url("/control/template/functions"))
        .await
        .unwrap();
    let (status, body) = common::read_json(resp).await;
    assert_eq!(status, 200);

    let docs = body.as_array().expect("catalog is an array");
    assert_eq!(docs.len(), prompt_template::function_names().len());
    let default_value = docs
        .iter()
        .find(|d| d["name"] == "defaultValue")
        .expect("defaultValue is listed");
    for field in ["name", "signature", "description"] {
        assert!(
            matches!(default_value.get(field), Some(Value::String(s)) if !s.is_empty()),
            "missing {}",
            field
        );
    }
    server.stop().await;
}
