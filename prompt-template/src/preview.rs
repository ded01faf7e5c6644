//! Preview protocol: render a candidate template against sample bindings and report either the
//! rendered prompt or the failing expression.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::bindings::Bindings;
use crate::error::{ErrorType, RenderError};
use crate::expr::RenderMode;
use crate::template::TemplateEngine;

/// Body of `POST /control/template/preview`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub template: String,
    #[serde(default)]
    pub strict_render: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ctx: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_prompt: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl PreviewRequest {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            ..Self::default()
        }
    }

    /// `template`, or `localPrompt` when the template is blank.
    pub fn effective_template(&self) -> &str {
        if self.template.trim().is_empty() {
            if let Some(local) = self
                .local_prompt
                .as_deref()
                .filter(|p| !p.trim().is_empty())
            {
                return local;
            }
        }
        &self.template
    }

    pub fn bindings(&self) -> Bindings {
        Bindings::new(self.input.clone().unwrap_or_default())
            .with_ctx(self.ctx.clone().unwrap_or_default())
            .with_local_prompt(self.local_prompt.clone())
            .with_operation_type(self.operation_type.clone())
    }

    pub fn mode(&self) -> RenderMode {
        RenderMode::from_strict(self.strict_render)
    }
}

/// Either `success` with `renderedPrompt`, or failure with all three error fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rendered_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<ErrorType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_expression: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl PreviewResponse {
    pub fn rendered(prompt: impl Into<String>) -> Self {
        Self {
            success: true,
            rendered_prompt: Some(prompt.into()),
            error_type: None,
            error_expression: None,
            error_message: None,
        }
    }

    pub fn failed(error: RenderError) -> Self {
        Self {
            success: false,
            rendered_prompt: None,
            error_type: Some(error.error_type),
            error_expression: Some(error.expression),
            error_message: Some(error.message),
        }
    }

    /// Back to a `Result`; a malformed failure envelope becomes a syntax error with empty text.
    pub fn into_result(self) -> Result<String, RenderError> {
        match (self.success, self.rendered_prompt) {
            (true, Some(prompt)) => Ok(prompt),
            _ => Err(RenderError::new(
                self.error_type.unwrap_or(ErrorType::SyntaxError),
                self.error_expression.unwrap_or_default(),
                self.error_message.unwrap_or_default(),
                0,
            )),
        }
    }
}

impl From<Result<String, RenderError>> for PreviewResponse {
    fn from(result: Result<String, RenderError>) -> Self {
        match result {
            Ok(prompt) => Self::rendered(prompt),
            Err(e) => Self::failed(e),
        }
    }
}

impl TemplateEngine {
    /// Renders a preview request. Template problems never escape as `Err`; they are reported in
    /// the response.
    pub fn preview(&self, request: &PreviewRequest) -> PreviewResponse {
        let span = tracing::debug_span!(
            "preview",
            operation_type = request.operation_type.as_deref().unwrap_or(""),
            strict = request.strict_render
        );
        let _guard = span.enter();
        let bindings = request.bindings();
        self.render(request.effective_template(), &bindings, request.mode())
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_defaults_when_fields_absent() {
        let req: PreviewRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req, PreviewRequest::default());
        let req: PreviewRequest =
            serde_json::from_str(r#"{"template": null, "strictRender": true}"#).unwrap();
        assert_eq!(req.template, "");
        assert!(req.strict_render);
    }

    #[test]
    fn request_uses_camel_case() {
        let req: PreviewRequest = serde_json::from_value(json!({
            "operationType": "SUMMARY",
            "template": "x",
            "localPrompt": "base",
            "input": {"a": 1}
        }))
        .unwrap();
        assert_eq!(req.operation_type.as_deref(), Some("SUMMARY"));
        assert_eq!(req.local_prompt.as_deref(), Some("base"));
        assert_eq!(req.input.unwrap()["a"], json!(1));
    }

    #[test]
    fn blank_template_falls_back_to_local_prompt() {
        let mut req = PreviewRequest::new("  ");
        assert_eq!(req.effective_template(), "  ");
        req.local_prompt = Some("base ${x}".into());
        assert_eq!(req.effective_template(), "base ${x}");
        req.template = "own".into();
        assert_eq!(req.effective_template(), "own");
    }

    #[test]
    fn success_omits_error_fields() {
        let body = serde_json::to_value(PreviewResponse::rendered("hi")).unwrap();
        assert_eq!(body, json!({"success": true, "renderedPrompt": "hi"}));
    }

    #[test]
    fn failure_omits_rendered_prompt() {
        let err = RenderError::new(ErrorType::UndefinedVariable, "name", "variable `name` is not defined", 6);
        let body = serde_json::to_value(PreviewResponse::failed(err)).unwrap();
        assert_eq!(
            body,
            json!({
                "success": false,
                "errorType": "UNDEFINED_VARIABLE",
                "errorExpression": "name",
                "errorMessage": "variable `name` is not defined"
            })
        );
    }

    #[test]
    fn into_result_round_trip() {
        assert_eq!(PreviewResponse::rendered("ok").into_result().unwrap(), "ok");
        let err = PreviewResponse::failed(RenderError::syntax("(", "bad", 3))
            .into_result()
            .unwrap_err();
        assert_eq!(err.error_type, ErrorType::SyntaxError);
        assert_eq!(err.expression, "(");
    }

    #[test]
    fn preview_binds_reserved_roots() {
        let req = PreviewRequest {
            operation_type: Some("SUMMARY".into()),
            template: "${operationType}: ${localPrompt} / ${ctx.tenant}".into(),
            strict_render: true,
            ctx: Some(json!({"tenant": "t1"}).as_object().cloned().unwrap()),
            local_prompt: Some("base".into()),
            ..PreviewRequest::default()
        };
        let resp = TemplateEngine::new().preview(&req);
        assert_eq!(resp.rendered_prompt.as_deref(), Some("SUMMARY: base / t1"));
    }
}
