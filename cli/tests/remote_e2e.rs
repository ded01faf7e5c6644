//! CLI `--remote` against an in-process server.

use std::process::{Command, Output};
use std::time::Duration;

use config::Settings;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

async fn run_cli(args: Vec<String>) -> Output {
    tokio::task::spawn_blocking(move || {
        let dir = tempfile::tempdir().unwrap();
        Command::new(env!("CARGO_BIN_EXE_prompt-template"))
            .args(&args)
            .current_dir(dir.path())
            .env("XDG_CONFIG_HOME", dir.path())
            .env_remove("RUST_LOG")
            .output()
            .expect("failed to run prompt-template binary")
    })
    .await
    .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn remote_render_and_functions() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let (tx, rx) = oneshot::channel::<()>();
    let server = tokio::spawn(serve::run_serve_on_listener(
        listener,
        Settings::default(),
        async move {
            let _ = rx.await;
        },
    ));

    let out = run_cli(vec![
        format!("--remote={}", url),
        "render".into(),
        "--template".into(),
        "Hi ${fn.trim(name)}".into(),
        "--input".into(),
        r#"{"name": "  Ada "}"#.into(),
    ])
    .await;
    assert!(
        out.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    assert_eq!(String::from_utf8_lossy(&out.stdout), "Hi Ada\n");

    let out = run_cli(vec![
        format!("--remote={}", url),
        "render".into(),
        "--template".into(),
        "${missing}".into(),
        "--strict".into(),
    ])
    .await;
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("error[UNDEFINED_VARIABLE]"));

    let out = run_cli(vec![
        "functions".into(),
        "--format".into(),
        "json".into(),
        format!("--remote={}", url),
    ])
    .await;
    assert!(out.status.success());
    let docs: Vec<serde_json::Value> = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(docs.len(), prompt_template::function_names().len());

    let _ = tx.send(());
    let _ = tokio::time::timeout(Duration::from_secs(5), server).await;
}

#[tokio::test(flavor = "multi_thread")]
async fn remote_unreachable_fails() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let out = run_cli(vec![format!("--remote={}", url), "functions".into()]).await;
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("error: remote:"));
}
