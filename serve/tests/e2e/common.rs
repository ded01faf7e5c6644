//! Shared helpers for e2e tests. Received bodies are logged with `[e2e] received: ...`.
//! Run tests with `--nocapture` to see them.

use std::time::Duration;

use config::Settings;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::timeout;

pub struct TestServer {
    pub base_url: String,
    shutdown_tx: oneshot::Sender<()>,
    handle: JoinHandle<Result<(), serve::ServeError>>,
}

impl TestServer {
    pub fn url(&self, route: &str) -> String {
        format!("{}{}", self.base_url, route)
    }

    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(());
        let joined = timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("server did not stop in time")
            .expect("server task panicked");
        joined.expect("server returned an error");
    }
}

/// Bind to a random port and spawn the server with `settings`.
pub async fn spawn_server(settings: Settings) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}{}", addr, settings.base_path);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(serve::run_serve_on_listener(
        listener,
        settings,
        async move {
            let _ = shutdown_rx.await;
        },
    ));
    TestServer {
        base_url,
        shutdown_tx,
        handle,
    }
}

pub async fn spawn_default_server() -> TestServer {
    spawn_server(Settings::default()).await
}

/// POSTs `body` to the preview route; returns the status and JSON body.
pub async fn post_preview(server: &TestServer, body: &Value) -> (u16, Value) {
    let resp = reqwest::Client::new()
        .post(server.url("/control/template/preview"))
        .json(body)
        .send()
        .await
        .unwrap();
    read_json(resp).await
}

pub async fn read_json(resp: reqwest::Response) -> (u16, Value) {
    let status = resp.status().as_u16();
    let text = resp.text().await.unwrap();
    eprintln!("[e2e] received: {}", text);
    (status, serde_json::from_str(&text).unwrap())
}
