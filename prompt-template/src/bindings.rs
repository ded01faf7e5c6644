//! Variables visible to a template.

use serde_json::{Map, Value};

/// Input and context maps plus the optional `localPrompt` and `operationType` strings.
///
/// A bare identifier resolves against the reserved roots first, then the top-level keys of
/// `input`, then those of `ctx`.
#[derive(Clone, Debug, PartialEq)]
pub struct Bindings {
    input: Value,
    ctx: Value,
    local_prompt: Option<Value>,
    operation_type: Option<Value>,
}

impl Default for Bindings {
    fn default() -> Self {
        Self {
            input: Value::Object(Map::new()),
            ctx: Value::Object(Map::new()),
            local_prompt: None,
            operation_type: None,
        }
    }
}

impl Bindings {
    pub fn new(input: Map<String, Value>) -> Self {
        Self {
            input: Value::Object(input),
            ..Self::default()
        }
    }

    pub fn with_ctx(mut self, ctx: Map<String, Value>) -> Self {
        self.ctx = Value::Object(ctx);
        self
    }

    pub fn with_local_prompt(mut self, local_prompt: Option<String>) -> Self {
        self.local_prompt = local_prompt.map(Value::String);
        self
    }

    pub fn with_operation_type(mut self, operation_type: Option<String>) -> Self {
        self.operation_type = operation_type.map(Value::String);
        self
    }

    pub fn input(&self) -> &Value {
        &self.input
    }

    pub fn ctx(&self) -> &Value {
        &self.ctx
    }

    pub fn lookup(&self, name: &str) -> Option<&Value> {
        match name {
            "input" => Some(&self.input),
            "ctx" => Some(&self.ctx),
            "localPrompt" => self.local_prompt.as_ref(),
            "operationType" => self.operation_type.as_ref(),
            _ => self.input.get(name).or_else(|| self.ctx.get(name)),
        }
    }
}
