//! Cooked values of string literals.
//!
//! The AST keeps string literals as written. These helpers produce the
//! runtime value a GraphQL server would see, which is what graphql-js puts
//! into `StringValue.value`.

/// Resolves escape sequences in the body of a `"..."` literal.
///
/// The lexer rejects strings with malformed escapes, so parsed documents
/// never reach the verbatim fallback used here for them.
pub fn string_value(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('/') => out.push('/'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match decode_unicode(&hex, &mut chars) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn decode_unicode(
    hex: &str,
    rest: &mut std::iter::Peekable<std::str::Chars<'_>>,
) -> Option<char> {
    if hex.len() != 4 {
        return None;
    }
    let high = u32::from_str_radix(hex, 16).ok()?;
    if !(0xD800..0xDC00).contains(&high) {
        return char::from_u32(high);
    }

    // Surrogate pair: `\uD83D\uDE00`.
    let mut lookahead = rest.clone();
    if lookahead.next() != Some('\\') || lookahead.next() != Some('u') {
        return None;
    }
    let low_hex: String = lookahead.by_ref().take(4).collect();
    let low = u32::from_str_radix(&low_hex, 16).ok()?;
    if !(0xDC00..0xE000).contains(&low) {
        return None;
    }
    *rest = lookahead;
    char::from_u32(0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00))
}

/// Computes the value of a `"""..."""` literal: unescapes `\"""`, strips
/// the common indentation and drops blank leading and trailing lines.
pub fn block_string_value(raw: &str) -> String {
    let unescaped = raw.replace("\\\"\"\"", "\"\"\"");
    let lines: Vec<&str> = unescaped
        .split("\r\n")
        .flat_map(|chunk| chunk.split(['\n', '\r']))
        .collect();

    let common_indent = lines
        .iter()
        .skip(1)
        .filter_map(|line| {
            let indent = leading_whitespace(line);
            (indent < line.len()).then_some(indent)
        })
        .min();

    let mut cooked: Vec<&str> = lines
        .iter()
        .enumerate()
        .map(|(i, line)| match common_indent {
            Some(indent) if i > 0 => line.get(indent..).unwrap_or(""),
            _ => line,
        })
        .collect();

    while cooked.first().is_some_and(|line| is_blank(line)) {
        cooked.remove(0);
    }
    while cooked.last().is_some_and(|line| is_blank(line)) {
        cooked.pop();
    }
    cooked.join("\n")
}

fn leading_whitespace(line: &str) -> usize {
    line.bytes().take_while(|b| *b == b' ' || *b == b'\t').count()
}

fn is_blank(line: &str) -> bool {
    leading_whitespace(line) == line.len()
}
