//! Template text handling: scanning into nodes and rendering them.
//!
//! Expression spans are written `${ expr }` or `{{ expr }}`. `\${` and `\{{` produce the
//! delimiter literally. Blocks are `{{#if cond}}...{{else}}...{{/if}}` and
//! `{{#each list}}...{{/each}}`; inside `each`, `item`/`this` is the element and `index` its
//! position.

mod render;
mod scan;

pub use render::{RenderLimits, TemplateEngine};
pub use scan::{scan, Node, Span, Template};
