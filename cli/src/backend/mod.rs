//! Backend abstraction used by the `prompt-template` CLI.
//!
//! - **LocalBackend**: render in-process with a [`TemplateEngine`](prompt_template::TemplateEngine)
//!   (default).
//! - **RemoteBackend**: POST the request to a running `prompt-template serve`.
//!
//! `main.rs` depends only on [`PreviewBackend`], so switching local/remote is a one-line
//! decision and both paths print the same envelope.

mod local;
mod remote;

pub use local::LocalBackend;
pub use remote::RemoteBackend;

use async_trait::async_trait;
use prompt_template::{PreviewRequest, PreviewResponse, PromptFunctionDoc};

use crate::CliError;

#[async_trait]
pub trait PreviewBackend: Send + Sync {
    /// Renders `request`. Template problems come back inside the response; `Err` is reserved
    /// for transport and protocol failures.
    async fn preview(&self, request: &PreviewRequest) -> Result<PreviewResponse, CliError>;

    /// The `fn.*` catalog.
    async fn functions(&self) -> Result<Vec<PromptFunctionDoc>, CliError>;
}
