//! # prompt-template
//!
//! Prompt template engine for AI operations. Templates are plain text with embedded
//! expressions that are evaluated against JSON bindings (`input`, `ctx`, `localPrompt`,
//! `operationType`) and a fixed catalog of `fn.*` functions.
//!
//! ## Features
//!
//! - **Function catalog**: [`function_docs`] lists every `fn.*` function with its signature and
//!   description; the evaluator dispatches on the same table, so docs and behavior never diverge.
//! - **Expressions**: paths (`user.tags[0]`), literals, arithmetic, comparison, logic, ternary
//!   and elvis operators, `fn.name(...)` calls ([`expr`]).
//! - **Templates**: `${...}` and `{{...}}` spans, `{{#if}}` / `{{#each}}` blocks ([`template`]).
//! - **Strict vs lenient**: [`RenderMode::Strict`] reports unresolved references as
//!   `UNDEFINED_VARIABLE`; [`RenderMode::Lenient`] renders them as empty text.
//! - **Preview protocol**: [`PreviewRequest`] in, [`PreviewResponse`] out, via
//!   [`TemplateEngine::preview`].
//! - **Operation prompts**: [`resolve_operation_prompt`] for `LOCAL_ONLY` / `TEMPLATE_OVERRIDE`
//!   operations.
//!
//! ## Main modules
//!
//! - [`catalog`]: [`PromptFunctionDoc`], [`function_docs`], [`function_names`], [`find_function`].
//! - [`functions`]: executable bodies of the catalog ([`functions::call`], [`FunctionError`]).
//! - [`expr`]: lexer, parser and evaluator.
//! - [`template`]: scanning and [`TemplateEngine`].
//! - [`preview`]: request/response envelope.
//! - [`operation`]: [`PromptMode`], [`OperationPromptConfig`], [`merge_input_extensions`].
//! - [`date`]: date patterns, parsing and arithmetic for the date functions.
//!
//! ## Quick start
//!
//! ```rust
//! use prompt_template::{PreviewRequest, TemplateEngine};
//!
//! let engine = TemplateEngine::new();
//! let request = PreviewRequest::new("Hello ${fn.defaultValue(name, 'Guest')}");
//! let response = engine.preview(&request);
//! assert_eq!(response.rendered_prompt.as_deref(), Some("Hello Guest"));
//! ```

pub mod bindings;
pub mod catalog;
pub mod clock;
pub mod date;
pub mod error;
pub mod expr;
pub mod functions;
pub mod operation;
pub mod path;
pub mod preview;
pub mod template;
pub mod value;

pub use bindings::Bindings;
pub use catalog::{find_function, function_docs, function_names, PromptFunctionDoc};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ErrorType, RenderError};
pub use expr::RenderMode;
pub use functions::FunctionError;
pub use operation::{
    merge_input_extensions, resolve_operation_prompt, OperationPromptConfig, PromptMode,
    PromptResolveError,
};
pub use preview::{PreviewRequest, PreviewResponse};
pub use template::{RenderLimits, TemplateEngine};
