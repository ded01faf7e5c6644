//! LocalBackend: render in-process.

use async_trait::async_trait;
use prompt_template::{function_docs, PreviewRequest, PreviewResponse, PromptFunctionDoc, TemplateEngine};

use super::PreviewBackend;
use crate::CliError;

#[derive(Clone, Debug, Default)]
pub struct LocalBackend {
    engine: TemplateEngine,
}

impl LocalBackend {
    pub fn new(engine: TemplateEngine) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl PreviewBackend for LocalBackend {
    async fn preview(&self, request: &PreviewRequest) -> Result<PreviewResponse, CliError> {
        Ok(self.engine.preview(request))
    }

    async fn functions(&self) -> Result<Vec<PromptFunctionDoc>, CliError> {
        Ok(function_docs().to_vec())
    }
}
