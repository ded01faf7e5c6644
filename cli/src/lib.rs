//! Library side of the `prompt-template` CLI.
//!
//! - [`PreviewBackend`]: where previews run, in-process ([`LocalBackend`]) or against a
//!   running server ([`RemoteBackend`]).
//! - [`input`]: JSON/YAML documents from literals, `@file` or stdin.
//! - [`output`]: catalog and failure formatting.

mod backend;
mod error;
pub mod input;
pub mod output;

pub use backend::{LocalBackend, PreviewBackend, RemoteBackend};
pub use error::CliError;
pub use output::FunctionsFormat;
