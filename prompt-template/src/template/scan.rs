//! Splits template text into literal text, expression spans and blocks.
//!
//! Syntax problems do not stop the scan (except an unclosed delimiter, which swallows the rest
//! of the template). They are collected and the leftmost one is kept, so the renderer can
//! still report an evaluation error that occurs before it.

use crate::error::RenderError;
use crate::expr::{parse, Expr};

/// Deepest allowed `{{#if}}` / `{{#each}}` nesting.
pub const MAX_BLOCK_DEPTH: usize = 128;

/// One expression site: the trimmed source text and the offset of its opening delimiter.
#[derive(Clone, Debug, PartialEq)]
pub struct Span {
    pub source: String,
    pub offset: usize,
    /// `None` when the text failed to parse; the failure is in [`Template::syntax_error`].
    pub expr: Option<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Text(String),
    Expr(Span),
    If {
        condition: Span,
        then: Vec<Node>,
        otherwise: Vec<Node>,
    },
    Each {
        collection: Span,
        body: Vec<Node>,
    },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Template {
    pub nodes: Vec<Node>,
    pub syntax_error: Option<RenderError>,
}

pub fn scan(src: &str) -> Template {
    let mut b = Builder::default();
    let mut pos = 0;
    let mut literal_start = 0;

    while pos < src.len() {
        let rest = &src[pos..];
        if rest.starts_with("\\${") || rest.starts_with("\\{{") {
            b.text.push_str(&src[literal_start..pos]);
            b.text.push_str(&rest[1..3]);
            pos += 3;
            literal_start = pos;
            continue;
        }

        let close = if rest.starts_with("${") {
            Some(("${", find_brace_close(src, pos + 2), 1))
        } else if rest.starts_with("{{") {
            Some(("{{", find_mustache_close(src, pos + 2), 2))
        } else {
            None
        };
        let Some((open, end, close_len)) = close else {
            pos += rest.chars().next().map_or(1, char::len_utf8);
            continue;
        };

        b.text.push_str(&src[literal_start..pos]);
        b.flush_text();
        let Some(end) = end else {
            b.errors.push(RenderError::syntax(
                src[pos + 2..].trim(),
                format!("unclosed `{}`", open),
                pos,
            ));
            literal_start = src.len();
            break;
        };
        let inner = &src[pos + 2..end];
        if open == "${" {
            let span = b.span(inner, pos);
            b.push(Node::Expr(span));
        } else {
            b.tag(inner, pos);
        }
        pos = end + close_len;
        literal_start = pos;
    }
    b.text.push_str(&src[literal_start..]);
    b.finish()
}

/// Finds the `}` closing a `${` whose body starts at `from`, skipping nested braces and
/// quoted strings.
fn find_brace_close(src: &str, from: usize) -> Option<usize> {
    let mut depth = 1usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in src[from..].char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(from + i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Finds the `}}` closing a `{{` whose body starts at `from`, skipping quoted strings.
fn find_mustache_close(src: &str, from: usize) -> Option<usize> {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in src[from..].char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '}' if src[from + i..].starts_with("}}") => return Some(from + i),
            _ => {}
        }
    }
    None
}

/// `text` starting with `keyword` followed by whitespace or nothing; returns the remainder.
fn strip_keyword<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = text.strip_prefix(keyword)?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest.trim())
    } else {
        None
    }
}

#[derive(Debug)]
enum BlockKind {
    If {
        condition: Span,
        /// Set once `{{else}}` has been seen.
        then: Option<Vec<Node>>,
    },
    Each {
        collection: Span,
    },
}

#[derive(Debug)]
struct OpenBlock {
    kind: BlockKind,
    tag: String,
    offset: usize,
    nodes: Vec<Node>,
}

#[derive(Debug, Default)]
struct Builder {
    root: Vec<Node>,
    open: Vec<OpenBlock>,
    errors: Vec<RenderError>,
    text: String,
}

impl Builder {
    fn current(&mut self) -> &mut Vec<Node> {
        match self.open.last_mut() {
            Some(block) => &mut block.nodes,
            None => &mut self.root,
        }
    }

    fn push(&mut self, node: Node) {
        self.current().push(node);
    }

    fn flush_text(&mut self) {
        if !self.text.is_empty() {
            let text = std::mem::take(&mut self.text);
            self.push(Node::Text(text));
        }
    }

    fn span(&mut self, raw: &str, offset: usize) -> Span {
        let source = raw.trim().to_string();
        let expr = match parse(&source) {
            Ok(expr) => Some(expr),
            Err(e) => {
                self.errors
                    .push(RenderError::syntax(source.clone(), e.message, offset));
                None
            }
        };
        Span {
            source,
            offset,
            expr,
        }
    }

    fn structural(&mut self, tag: &str, message: String, offset: usize) {
        self.errors.push(RenderError::syntax(tag, message, offset));
    }

    fn tag(&mut self, raw: &str, offset: usize) {
        let tag = raw.trim();
        if let Some(condition) = strip_keyword(tag, "#if") {
            let condition = self.span(condition, offset);
            self.open_block(BlockKind::If { condition, then: None }, tag, offset);
        } else if let Some(collection) = strip_keyword(tag, "#each") {
            let collection = self.span(collection, offset);
            self.open_block(BlockKind::Each { collection }, tag, offset);
        } else if tag == "else" {
            self.else_branch(offset);
        } else if let Some(name) = tag.strip_prefix('/') {
            self.close_block(name.trim(), tag, offset);
        } else {
            let span = self.span(tag, offset);
            self.push(Node::Expr(span));
        }
    }

    fn open_block(&mut self, kind: BlockKind, tag: &str, offset: usize) {
        if self.open.len() >= MAX_BLOCK_DEPTH {
            self.structural(
                tag,
                format!("block nesting exceeds {} levels", MAX_BLOCK_DEPTH),
                offset,
            );
            return;
        }
        self.open.push(OpenBlock {
            kind,
            tag: tag.to_string(),
            offset,
            nodes: Vec::new(),
        });
    }

    fn else_branch(&mut self, offset: usize) {
        let in_if = matches!(
            self.open.last(),
            Some(OpenBlock {
                kind: BlockKind::If { then: None, .. },
                ..
            })
        );
        if !in_if {
            self.structural(
                "else",
                "`{{else}}` outside of an `{{#if}}` block".to_string(),
                offset,
            );
            return;
        }
        if let Some(OpenBlock {
            kind: BlockKind::If { then, .. },
            nodes,
            ..
        }) = self.open.last_mut()
        {
            *then = Some(std::mem::take(nodes));
        }
    }

    fn close_block(&mut self, name: &str, tag: &str, offset: usize) {
        let matches = match self.open.last() {
            Some(block) => matches!(
                (&block.kind, name),
                (BlockKind::If { .. }, "if") | (BlockKind::Each { .. }, "each")
            ),
            None => false,
        };
        if !matches {
            let message = match self.open.last() {
                Some(block) => format!("`{{{{{}}}}}` does not close `{{{{{}}}}}`", tag, block.tag),
                None => format!("`{{{{{}}}}}` has no opening block", tag),
            };
            self.structural(tag, message, offset);
            return;
        }
        let Some(block) = self.open.pop() else {
            return;
        };
        let node = match block.kind {
            BlockKind::If {
                condition,
                then: Some(then),
            } => Node::If {
                condition,
                then,
                otherwise: block.nodes,
            },
            BlockKind::If {
                condition,
                then: None,
            } => Node::If {
                condition,
                then: block.nodes,
                otherwise: Vec::new(),
            },
            BlockKind::Each { collection } => Node::Each {
                collection,
                body: block.nodes,
            },
        };
        self.push(node);
    }

    fn finish(mut self) -> Template {
        self.flush_text();
        for block in std::mem::take(&mut self.open) {
            self.errors.push(RenderError::syntax(
                block.tag.clone(),
                format!("unclosed `{{{{{}}}}}`", block.tag),
                block.offset,
            ));
        }
        let syntax_error = self.errors.into_iter().min_by_key(|e| e.offset);
        Template {
            nodes: self.root,
            syntax_error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorType;

    fn texts(nodes: &[Node]) -> Vec<String> {
        nodes
            .iter()
            .map(|n| match n {
                Node::Text(t) => format!("T:{}", t),
                Node::Expr(s) => format!("E:{}", s.source),
                Node::If { condition, .. } => format!("IF:{}", condition.source),
                Node::Each { collection, .. } => format!("EACH:{}", collection.source),
            })
            .collect()
    }

    #[test]
    fn plain_text_is_one_node() {
        let t = scan("no expressions here { } $ {");
        assert_eq!(texts(&t.nodes), vec!["T:no expressions here { } $ {"]);
        assert!(t.syntax_error.is_none());
    }

    #[test]
    fn both_delimiters_and_offsets() {
        let t = scan("Hi ${ name }, {{fn.upper(x)}}!");
        assert_eq!(
            texts(&t.nodes),
            vec!["T:Hi ", "E:name", "T:, ", "E:fn.upper(x)", "T:!"]
        );
        let Node::Expr(span) = &t.nodes[3] else {
            panic!("expected expression");
        };
        assert_eq!(span.offset, 14);
    }

    #[test]
    fn braces_inside_strings_and_nesting() {
        let t = scan("${fn.defaultValue(x, '}')}|${fn.replace(a, '{', \"}}\")}");
        assert_eq!(
            texts(&t.nodes),
            vec![
                "E:fn.defaultValue(x, '}')",
                "T:|",
                "E:fn.replace(a, '{', \"}}\")"
            ]
        );
        assert!(t.syntax_error.is_none());
    }

    #[test]
    fn escapes_render_literal_delimiters() {
        let t = scan(r"cost \${price} and \{{raw}} ${x}");
        assert_eq!(
            texts(&t.nodes),
            vec!["T:cost ${price} and {{raw}} ", "E:x"]
        );
    }

    #[test]
    fn blocks_nest() {
        let t = scan("{{#each items}}{{#if item.on}}[${item.name}]{{else}}-{{/if}}{{/each}}");
        assert!(t.syntax_error.is_none(), "{:?}", t.syntax_error);
        let Node::Each { collection, body } = &t.nodes[0] else {
            panic!("expected each");
        };
        assert_eq!(collection.source, "items");
        let Node::If {
            condition,
            then,
            otherwise,
        } = &body[0]
        else {
            panic!("expected if");
        };
        assert_eq!(condition.source, "item.on");
        assert_eq!(texts(then), vec!["T:[", "E:item.name", "T:]"]);
        assert_eq!(texts(otherwise), vec!["T:-"]);
    }

    #[test]
    fn hash_variable_is_not_a_block() {
        let t = scan("{{#name}}");
        assert_eq!(texts(&t.nodes), vec!["E:#name"]);
        assert!(t.syntax_error.is_none());
    }

    #[test]
    fn unclosed_delimiter() {
        let t = scan("Hello ${name");
        let err = t.syntax_error.unwrap();
        assert_eq!(err.error_type, ErrorType::SyntaxError);
        assert_eq!(err.expression, "name");
        assert_eq!(err.offset, 6);
        assert_eq!(texts(&t.nodes), vec!["T:Hello "]);
    }

    #[test]
    fn structural_errors_pick_leftmost() {
        let t = scan("a {{#if x}} b ${fn.nope()} c");
        let err = t.syntax_error.unwrap();
        assert_eq!(err.expression, "#if x");
        assert_eq!(err.offset, 2);

        let err = scan("{{/each}}").syntax_error.unwrap();
        assert_eq!(err.expression, "/each");
        let err = scan("{{#if a}}{{/each}}{{/if}}").syntax_error.unwrap();
        assert_eq!(err.offset, 9);
        let err = scan("{{else}}").syntax_error.unwrap();
        assert_eq!(err.expression, "else");
        let err = scan("{{#if a}}{{else}}{{else}}{{/if}}").syntax_error.unwrap();
        assert_eq!(err.offset, 17);
    }

    #[test]
    fn block_nesting_is_capped() {
        let ok = format!(
            "{}x{}",
            "{{#if a}}".repeat(MAX_BLOCK_DEPTH),
            "{{/if}}".repeat(MAX_BLOCK_DEPTH)
        );
        assert!(scan(&ok).syntax_error.is_none());

        let depth = 10_000;
        let src = format!("{}x{}", "{{#if a}}".repeat(depth), "{{/if}}".repeat(depth));
        let err = scan(&src).syntax_error.unwrap();
        assert_eq!(err.error_type, ErrorType::SyntaxError);
        assert_eq!(err.expression, "#if a");
        assert_eq!(err.offset, MAX_BLOCK_DEPTH * "{{#if a}}".len());
        assert!(err.message.contains("nesting"), "{}", err.message);
    }

    #[test]
    fn bad_expression_keeps_its_slot() {
        let t = scan("x ${1 +} y");
        let err = t.syntax_error.unwrap();
        assert_eq!(err.expression, "1 +");
        assert_eq!(err.offset, 2);
        let Node::Expr(span) = &t.nodes[1] else {
            panic!("expected expression");
        };
        assert!(span.expr.is_none());
    }
}
