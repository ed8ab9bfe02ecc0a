//! LIKE pattern construction with an explicit escape character.
//!
//! Every LIKE in the stores is written as `LIKE ? ESCAPE '!'` and bound to a
//! pattern from this module, so `%` and `_` in user data match literally.

/// Escape character used in every `LIKE ... ESCAPE` clause.
pub const ESCAPE: char = '!';

/// Escapes LIKE metacharacters (and the escape character itself).
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c == ESCAPE || c == '%' || c == '_' {
            out.push(ESCAPE);
        }
        out.push(c);
    }
    out
}

/// Pattern matching values that end with `s`.
pub fn suffix(s: &str) -> String {
    format!("%{}", escape(s))
}

/// Pattern matching values that contain `s`.
pub fn contains(s: &str) -> String {
    format!("%{}%", escape(s))
}
