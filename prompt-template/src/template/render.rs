use std::sync::Arc;

use serde_json::{json, Value};

use super::scan::{scan, Node, Span};
use crate::bindings::Bindings;
use crate::clock::{Clock, SystemClock};
use crate::error::{ErrorType, RenderError};
use crate::expr::{Evaluator, Frame, RenderMode, Scope};
use crate::value::{is_truthy, to_text};

/// Upper bounds on the work a single render may do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderLimits {
    /// `{{#each}}` iterations summed over every loop in the template.
    pub max_iterations: usize,
    /// Length of the rendered text.
    pub max_output_bytes: usize,
}

impl Default for RenderLimits {
    fn default() -> Self {
        Self {
            max_iterations: 100_000,
            max_output_bytes: 4 * 1024 * 1024,
        }
    }
}

/// Renders templates against [`Bindings`].
///
/// Holds no per-call state; clone it freely or share it behind an `Arc`.
#[derive(Clone, Debug)]
pub struct TemplateEngine {
    clock: Arc<dyn Clock>,
    limits: RenderLimits,
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateEngine {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Engine whose `fn.now*` functions read `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            limits: RenderLimits::default(),
        }
    }

    /// Same engine with different [`RenderLimits`].
    pub fn with_limits(mut self, limits: RenderLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn limits(&self) -> RenderLimits {
        self.limits
    }

    /// Renders `template`, evaluating expressions left to right.
    ///
    /// The first failing expression aborts the render. A syntax error anywhere in the template
    /// is fatal, even inside a branch that is not taken; if an evaluation error occurs at an
    /// earlier offset, that one is reported instead.
    ///
    /// Exceeding [`RenderLimits`] fails with `FUNCTION_ERROR` on the loop or expression that
    /// crossed the limit.
    pub fn render(
        &self,
        template: &str,
        bindings: &Bindings,
        mode: RenderMode,
    ) -> Result<String, RenderError> {
        let parsed = scan(template);
        let mut scope = Scope::new(bindings);
        let mut out = String::with_capacity(template.len());
        let mut iterations = 0;
        let evaluated = self.render_nodes(
            &parsed.nodes,
            &mut scope,
            mode,
            &mut out,
            &mut iterations,
        );

        let result = match (evaluated, parsed.syntax_error) {
            (Ok(()), None) => Ok(out),
            (Ok(()), Some(syntax)) => Err(syntax),
            (Err(eval), Some(syntax)) if syntax.offset <= eval.offset => Err(syntax),
            (Err(eval), _) => Err(eval),
        };
        match &result {
            Ok(text) => tracing::debug!(?mode, bytes = text.len(), "template rendered"),
            Err(e) => tracing::debug!(
                ?mode,
                error_type = %e.error_type,
                expression = %e.expression,
                offset = e.offset,
                "template render failed"
            ),
        }
        result
    }

    fn render_nodes(
        &self,
        nodes: &[Node],
        scope: &mut Scope<'_>,
        mode: RenderMode,
        out: &mut String,
        iterations: &mut usize,
    ) -> Result<(), RenderError> {
        for node in nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Expr(span) => {
                    let value = self.eval_span(span, scope, mode)?;
                    out.push_str(&to_text(&value));
                    self.check_output(span, out)?;
                }
                Node::If {
                    condition,
                    then,
                    otherwise,
                } => {
                    let value = self.eval_span(condition, scope, mode)?;
                    let branch = if is_truthy(&value) { then } else { otherwise };
                    self.render_nodes(branch, scope, mode, out, iterations)?;
                }
                Node::Each { collection, body } => {
                    let value = self.eval_span(collection, scope, mode)?;
                    for (index, item) in iteration_items(value).into_iter().enumerate() {
                        *iterations += 1;
                        if *iterations > self.limits.max_iterations {
                            return Err(limit_error(
                                collection,
                                format!(
                                    "loops exceed {} iterations",
                                    self.limits.max_iterations
                                ),
                            ));
                        }
                        self.check_output(collection, out)?;
                        scope.push(Frame::new(item, index));
                        let rendered = self.render_nodes(body, scope, mode, out, iterations);
                        scope.pop();
                        rendered?;
                    }
                    self.check_output(collection, out)?;
                }
            }
        }
        Ok(())
    }

    fn check_output(&self, span: &Span, out: &str) -> Result<(), RenderError> {
        if out.len() > self.limits.max_output_bytes {
            return Err(limit_error(
                span,
                format!(
                    "rendered prompt exceeds {} bytes",
                    self.limits.max_output_bytes
                ),
            ));
        }
        Ok(())
    }

    fn eval_span(
        &self,
        span: &Span,
        scope: &Scope<'_>,
        mode: RenderMode,
    ) -> Result<Value, RenderError> {
        let Some(expr) = &span.expr else {
            return Err(RenderError::syntax(
                span.source.clone(),
                "invalid expression",
                span.offset,
            ));
        };
        Evaluator::new(scope, mode, self.clock.as_ref())
            .eval(expr)
            .map_err(|e| RenderError::new(e.error_type, span.source.clone(), e.message, span.offset))
    }
}

fn limit_error(span: &Span, message: String) -> RenderError {
    RenderError::new(
        ErrorType::FunctionError,
        span.source.clone(),
        message,
        span.offset,
    )
}

/// Lists iterate their elements, maps iterate `{key, value}` entries, null iterates nothing
/// and any other value iterates once.
fn iteration_items(value: Value) -> Vec<Value> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items,
        Value::Object(map) => map
            .into_iter()
            .map(|(key, value)| json!({ "key": key, "value": value }))
            .collect(),
        scalar => vec![scalar],
    }
}
