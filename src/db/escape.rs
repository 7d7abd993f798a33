//! Quoting for values embedded directly in SQL text.
//!
//! Prefer the `*_with` methods on [`Connection`](crate::Connection), which
//! bind values server-side. These helpers assume the server runs without
//! `NO_BACKSLASH_ESCAPES`.

/// Quote `s` as a single-quoted MySQL string literal.
pub fn quote(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 2);
    result.push('\'');
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '\'' => result.push_str("\\'"),
            '"' => result.push_str("\\\""),
            '\0' => result.push_str("\\0"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\x1a' => result.push_str("\\Z"),
            c => result.push(c),
        }
    }
    result.push('\'');
    result
}

/// Quote `name` as a backtick-delimited identifier.
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}
