//! End-to-end tests: a real server on 127.0.0.1:0 driven with reqwest.

mod common;
mod functions;
mod health;
mod preview;
mod rejections;

#[ctor::ctor]
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}
