//! Tokenizer for expression text. Offsets are byte positions within the expression.

use super::SyntaxError;

#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Ident(String),
    Str(String),
    Int(i64),
    Float(f64),
    Dot,
    Comma,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Question,
    Colon,
    Elvis,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
    EqEq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    AndAnd,
    OrOr,
}

impl Token {
    pub fn describe(&self) -> String {
        match self {
            Token::Ident(name) => format!("`{}`", name),
            Token::Str(_) => "string literal".to_string(),
            Token::Int(n) => format!("`{}`", n),
            Token::Float(f) => format!("`{}`", f),
            other => format!("`{}`", punct(other)),
        }
    }
}

fn punct(token: &Token) -> &'static str {
    match token {
        Token::Dot => ".",
        Token::Comma => ",",
        Token::LParen => "(",
        Token::RParen => ")",
        Token::LBracket => "[",
        Token::RBracket => "]",
        Token::Question => "?",
        Token::Colon => ":",
        Token::Elvis => "?:",
        Token::Plus => "+",
        Token::Minus => "-",
        Token::Star => "*",
        Token::Slash => "/",
        Token::Percent => "%",
        Token::Bang => "!",
        Token::EqEq => "==",
        Token::NotEq => "!=",
        Token::Lt => "<",
        Token::Le => "<=",
        Token::Gt => ">",
        Token::Ge => ">=",
        Token::AndAnd => "&&",
        Token::OrOr => "||",
        Token::Ident(_) | Token::Str(_) | Token::Int(_) | Token::Float(_) => "",
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub offset: usize,
}

pub fn tokenize(src: &str) -> Result<Vec<Spanned>, SyntaxError> {
    let mut tokens = Vec::new();
    let mut chars = src.char_indices().peekable();

    while let Some(&(offset, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        let token = if c == '\'' || c == '"' {
            chars.next();
            read_string(src, offset, c, &mut chars)?
        } else if c.is_ascii_digit() {
            read_number(src, offset, &mut chars)?
        } else if c == '#' || c == '_' || c.is_alphabetic() {
            chars.next();
            let start = if c == '#' { offset + 1 } else { offset };
            let mut end = offset + c.len_utf8();
            while let Some(&(i, n)) = chars.peek() {
                if n == '_' || n.is_alphanumeric() {
                    end = i + n.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            if start == end {
                return Err(SyntaxError::new("expected identifier after `#`", offset));
            }
            Token::Ident(src[start..end].to_string())
        } else {
            chars.next();
            let next = chars.peek().map(|&(_, n)| n);
            let mut two = |t: Token| {
                chars.next();
                t
            };
            match (c, next) {
                ('?', Some(':')) => two(Token::Elvis),
                ('=', Some('=')) => two(Token::EqEq),
                ('!', Some('=')) => two(Token::NotEq),
                ('<', Some('=')) => two(Token::Le),
                ('>', Some('=')) => two(Token::Ge),
                ('&', Some('&')) => two(Token::AndAnd),
                ('|', Some('|')) => two(Token::OrOr),
                ('.', _) => Token::Dot,
                (',', _) => Token::Comma,
                ('(', _) => Token::LParen,
                (')', _) => Token::RParen,
                ('[', _) => Token::LBracket,
                (']', _) => Token::RBracket,
                ('?', _) => Token::Question,
                (':', _) => Token::Colon,
                ('+', _) => Token::Plus,
                ('-', _) => Token::Minus,
                ('*', _) => Token::Star,
                ('/', _) => Token::Slash,
                ('%', _) => Token::Percent,
                ('!', _) => Token::Bang,
                ('<', _) => Token::Lt,
                ('>', _) => Token::Gt,
                (other, _) => {
                    return Err(SyntaxError::new(
                        format!("unexpected character `{}`", other),
                        offset,
                    ))
                }
            }
        };
        tokens.push(Spanned { token, offset });
    }
    Ok(tokens)
}

fn read_string(
    src: &str,
    start: usize,
    quote: char,
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
) -> Result<Token, SyntaxError> {
    let mut out = String::new();
    while let Some((_, c)) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some((_, 'n')) => out.push('\n'),
                Some((_, 't')) => out.push('\t'),
                Some((_, 'r')) => out.push('\r'),
                Some((_, other)) => out.push(other),
                None => break,
            },
            // SpEL style doubled quote
            c if c == quote && chars.peek().map(|&(_, n)| n) == Some(quote) => {
                chars.next();
                out.push(quote);
            }
            c if c == quote => return Ok(Token::Str(out)),
            c => out.push(c),
        }
    }
    Err(SyntaxError::new(
        format!("unterminated string starting at `{}`", &src[start..]),
        start,
    ))
}

fn read_number(
    src: &str,
    start: usize,
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
) -> Result<Token, SyntaxError> {
    let mut end = start;
    let mut seen_dot = false;
    while let Some(&(i, c)) = chars.peek() {
        if c.is_ascii_digit() {
            end = i + 1;
            chars.next();
        } else if c == '.' && !seen_dot && src[i + 1..].starts_with(|d: char| d.is_ascii_digit()) {
            seen_dot = true;
            end = i + 1;
            chars.next();
        } else {
            break;
        }
    }
    let text = &src[start..end];
    if !seen_dot {
        if let Ok(n) = text.parse::<i64>() {
            return Ok(Token::Int(n));
        }
    }
    text.parse::<f64>()
        .map(Token::Float)
        .map_err(|_| SyntaxError::new(format!("invalid number `{}`", text), start))
}
