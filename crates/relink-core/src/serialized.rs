//! Replacement inside PHP-serialized values.
//!
//! Metadata written by page builders and field plugins is often a
//! serialized array: `a:1:{s:3:"img";s:24:"https://...";}`. A plain string
//! replacement changes byte lengths and leaves the `s:<len>:` prefixes
//! stale, which makes the platform discard the value. Here string tokens are
//! read using their original lengths and re-emitted with new ones.

/// One `s:<len>:"<payload>";` token, by byte offsets into the value.
struct StringToken<'a> {
    start: usize,
    end: usize,
    payload: &'a str,
}

/// Cheap shape check: does `value` start like a serialized array, object or string?
pub fn looks_serialized(value: &str) -> bool {
    let v = value.trim_start();
    let b = v.as_bytes();
    b.len() >= 4 && matches!(b[0], b'a' | b'O' | b's') && b[1] == b':' && b[2].is_ascii_digit()
}

/// Every string token of `value` in order, or `None` if one is malformed.
/// Payloads are skipped by their declared length, so token syntax inside a
/// payload is never mistaken for a token.
fn string_tokens(value: &str) -> Option<Vec<StringToken<'_>>> {
    let bytes = value.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let at_token_start = i == 0 || matches!(bytes[i - 1], b'{' | b';' | b'}');
        if !(at_token_start && bytes[i] == b's' && bytes.get(i + 1) == Some(&b':')) {
            i += 1;
            continue;
        }

        let len_start = i + 2;
        let len_end = len_start + bytes[len_start..].iter().position(|b| *b == b':')?;
        let len: usize = value.get(len_start..len_end)?.parse().ok()?;
        // `:"` + payload + `";`
        let payload_start = len_end + 2;
        let payload_end = payload_start.checked_add(len)?;
        if bytes.get(len_end + 1) != Some(&b'"')
            || bytes.get(payload_end) != Some(&b'"')
            || bytes.get(payload_end + 1) != Some(&b';')
        {
            return None;
        }
        tokens.push(StringToken {
            start: i,
            end: payload_end + 2,
            payload: value.get(payload_start..payload_end)?,
        });
        i = payload_end + 2;
    }
    Some(tokens)
}

/// Rewrites the payload of every string token with `rewrite`, fixing each
/// token's byte length.
///
/// Returns `None` if a string token is malformed; the caller should leave
/// the value alone.
pub fn replace_serialized<F>(value: &str, mut rewrite: F) -> Option<String>
where
    F: FnMut(&str) -> String,
{
    let mut out = String::with_capacity(value.len());
    let mut copied_to = 0;
    for token in string_tokens(value)? {
        out.push_str(&value[copied_to..token.start]);
        let replaced = rewrite(token.payload);
        out.push_str(&format!("s:{}:\"{}\";", replaced.len(), replaced));
        copied_to = token.end;
    }
    out.push_str(&value[copied_to..]);
    Some(out)
}

/// Value stored under string key `key` in a serialized array of strings,
/// e.g. `bucket` in `a:2:{s:6:"bucket";s:5:"media";s:3:"key";s:5:"a.jpg";}`.
///
/// Only string values directly following their key are seen.
pub fn string_field<'a>(value: &'a str, key: &str) -> Option<&'a str> {
    let tokens = string_tokens(value)?;
    let mut i = 0;
    while i + 1 < tokens.len() {
        let (k, v) = (&tokens[i], &tokens[i + 1]);
        if k.end != v.start {
            i += 1;
            continue;
        }
        if k.payload == key {
            return Some(v.payload);
        }
        i += 2;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const OLD: &str = "https://old.example.com/wp-content/uploads/a.jpg";
    const NEW: &str = "https://bucket.s3.amazonaws.com/a.jpg";

    fn old_to_new(payload: &str) -> String {
        payload.replace(OLD, NEW)
    }

    #[test]
    fn detects_serialized_shapes() {
        assert!(looks_serialized("a:1:{i:0;s:1:\"x\";}"));
        assert!(looks_serialized("s:3:\"abc\";"));
        assert!(looks_serialized("O:8:\"stdClass\":0:{}"));
        assert!(!looks_serialized("https://old.example.com/x.jpg"));
        assert!(!looks_serialized("{\"a\":1}"));
        assert!(!looks_serialized("as:"));
    }

    #[test]
    fn fixes_string_lengths() {
        let value = format!(
            "a:2:{{s:3:\"img\";s:{}:\"{}\";s:3:\"alt\";s:5:\"hello\";}}",
            OLD.len(),
            OLD
        );
        let out = replace_serialized(&value, old_to_new).unwrap();
        assert_eq!(
            out,
            format!(
                "a:2:{{s:3:\"img\";s:{}:\"{}\";s:3:\"alt\";s:5:\"hello\";}}",
                NEW.len(),
                NEW
            )
        );
    }

    #[test]
    fn payload_containing_token_syntax_is_opaque() {
        // The payload itself looks like a token; it must be skipped by length.
        let payload = format!("x;s:1:\"y\";{OLD}");
        let value = format!("s:{}:\"{}\";", payload.len(), payload);
        let out = replace_serialized(&value, old_to_new).unwrap();
        let expected_payload = format!("x;s:1:\"y\";{NEW}");
        assert_eq!(
            out,
            format!("s:{}:\"{}\";", expected_payload.len(), expected_payload)
        );
    }

    #[test]
    fn object_class_names_untouched() {
        let value = format!(
            "O:8:\"stdClass\":1:{{s:3:\"url\";s:{}:\"{}\";}}",
            OLD.len(),
            OLD
        );
        let out = replace_serialized(&value, old_to_new).unwrap();
        assert!(out.starts_with("O:8:\"stdClass\":1:{s:3:\"url\";"));
        assert!(out.contains(&format!("s:{}:\"{}\";", NEW.len(), NEW)));
    }

    #[test]
    fn multibyte_lengths_are_bytes() {
        let value = "a:1:{i:0;s:6:\"café!\";}";
        let out = replace_serialized(value, |p| p.replace('!', "?!")).unwrap();
        assert_eq!(out, "a:1:{i:0;s:7:\"café?!\";}");
    }

    #[test]
    fn stale_length_is_rejected() {
        let value = format!("a:1:{{i:0;s:10:\"{OLD}\";}}");
        assert_eq!(replace_serialized(&value, old_to_new), None);
        assert_eq!(string_field(&value, "x"), None);
    }

    #[test]
    fn string_field_reads_legacy_offload_info() {
        let value = "a:3:{s:6:\"bucket\";s:5:\"media\";s:3:\"key\";s:18:\"2024/05/pic-1x.jpg\";s:6:\"region\";s:0:\"\";}";
        assert_eq!(string_field(value, "bucket"), Some("media"));
        assert_eq!(string_field(value, "key"), Some("2024/05/pic-1x.jpg"));
        assert_eq!(string_field(value, "region"), Some(""));
        assert_eq!(string_field(value, "provider"), None);
    }

    #[test]
    fn string_field_skips_non_string_values() {
        let value = "a:3:{s:4:\"size\";i:12;s:6:\"bucket\";s:5:\"media\";s:3:\"key\";s:1:\"k\";}";
        assert_eq!(string_field(value, "size"), None);
        assert_eq!(string_field(value, "bucket"), Some("media"));
        assert_eq!(string_field(value, "key"), Some("k"));
    }
}
