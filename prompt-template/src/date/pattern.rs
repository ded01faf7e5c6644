//! Translates `yyyy-MM-dd HH:mm:ss`-style patterns into chrono strftime specifiers.

use super::DateError;

/// Compiles a letter pattern into a strftime string.
///
/// Runs of the same ASCII letter form one field; `'text'` is literal and `''` is a single
/// quote. Non-letter characters pass through (a `%` is escaped).
pub fn compile(pattern: &str) -> Result<String, DateError> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == '\'' {
            if chars.get(i + 1) == Some(&'\'') {
                out.push('\'');
                i += 2;
                continue;
            }
            i += 1;
            loop {
                match chars.get(i) {
                    None => return Err(DateError::UnterminatedQuote(pattern.to_string())),
                    Some('\'') if chars.get(i + 1) == Some(&'\'') => {
                        out.push('\'');
                        i += 2;
                    }
                    Some('\'') => {
                        i += 1;
                        break;
                    }
                    Some(&ch) => {
                        push_literal(&mut out, ch);
                        i += 1;
                    }
                }
            }
            continue;
        }

        if c.is_ascii_alphabetic() {
            let mut count = 1;
            while chars.get(i + count) == Some(&c) {
                count += 1;
            }
            let spec = field(c, count).ok_or(DateError::UnsupportedField { letter: c, count })?;
            out.push_str(spec);
            i += count;
            continue;
        }

        push_literal(&mut out, c);
        i += 1;
    }
    Ok(out)
}

fn push_literal(out: &mut String, ch: char) {
    if ch == '%' {
        out.push_str("%%");
    } else {
        out.push(ch);
    }
}

fn field(letter: char, count: usize) -> Option<&'static str> {
    let spec = match (letter, count) {
        ('y' | 'u', 2) => "%y",
        ('y' | 'u', _) => "%Y",
        ('M', 1) => "%-m",
        ('M', 2) => "%m",
        ('M', 3) => "%b",
        ('M', _) => "%B",
        ('d', 1) => "%-d",
        ('d', 2) => "%d",
        ('D', 1 | 2) => "%-j",
        ('D', 3) => "%j",
        ('H', 1) => "%-H",
        ('H', 2) => "%H",
        ('h', 1) => "%-I",
        ('h', 2) => "%I",
        ('m', 1) => "%-M",
        ('m', 2) => "%M",
        ('s', 1) => "%-S",
        ('s', 2) => "%S",
        ('S', 3) => "%3f",
        ('S', 6) => "%6f",
        ('S', 9) => "%9f",
        ('a', 1) => "%p",
        ('E', 1..=3) => "%a",
        ('E', 4) => "%A",
        _ => return None,
    };
    Some(spec)
}
