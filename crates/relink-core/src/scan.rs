//! Domain-scoped scanner for hardcoded upload links.

use regex::{Captures, Regex};
use std::collections::{HashMap, HashSet};

use crate::error::Result;

/// Compiled matcher for `https://<domain>/<uploads-path>/...` links.
///
/// Built once per run and handed to every pass, so the body and metadata
/// passes always agree on what counts as a broken link.
#[derive(Debug, Clone)]
pub struct LinkPattern {
    regex: Regex,
    domain: String,
    uploads_path: String,
}

impl LinkPattern {
    /// `domain` and `uploads_path` are matched literally; the domain
    /// ignores ASCII case like hosts do. Surrounding slashes on
    /// `uploads_path` are ignored.
    pub fn new(domain: &str, uploads_path: &str) -> Result<Self> {
        let uploads_path = uploads_path.trim_matches('/').to_string();
        let source = format!(
            r#"https://(?i:{})/{}/[^\s"'>]+"#,
            regex::escape(domain),
            regex::escape(&uploads_path)
        );
        Ok(Self {
            regex: Regex::new(&source)?,
            domain: domain.to_string(),
            uploads_path,
        })
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// `<domain>/<uploads-path>/`, the substring every candidate contains.
    /// Used to pre-filter metadata rows before regex matching.
    pub fn fragment(&self) -> String {
        format!("{}/{}/", self.domain, self.uploads_path)
    }

    /// Distinct links in order of first appearance.
    pub fn scan(&self, text: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        self.regex
            .find_iter(text)
            .map(|m| m.as_str())
            .filter(|link| seen.insert(*link))
            .map(str::to_string)
            .collect()
    }

    pub fn first_match<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.regex.find(text).map(|m| m.as_str())
    }

    /// Replaces every matched link that is a key of `fixes` with its value.
    ///
    /// Matches are compared whole, so a fixed `pic.jpg` never rewrites the
    /// longer `pic.jpg.webp` next to it.
    pub fn replace_links(&self, text: &str, fixes: &HashMap<String, String>) -> String {
        if fixes.is_empty() {
            return text.to_string();
        }
        self.regex
            .replace_all(text, |caps: &Captures<'_>| {
                let link = &caps[0];
                fixes.get(link).map_or(link, String::as_str).to_string()
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern() -> LinkPattern {
        LinkPattern::new("old.example.com", "wp-content/uploads").unwrap()
    }

    #[test]
    fn finds_links_until_quote_or_bracket() {
        let body = r#"<img src="https://old.example.com/wp-content/uploads/2024/pic-300x200.jpg"><a href='https://old.example.com/wp-content/uploads/doc.pdf'>x</a>"#;
        assert_eq!(
            pattern().scan(body),
            vec![
                "https://old.example.com/wp-content/uploads/2024/pic-300x200.jpg",
                "https://old.example.com/wp-content/uploads/doc.pdf",
            ]
        );
    }

    #[test]
    fn deduplicates_in_first_appearance_order() {
        let body = "https://old.example.com/wp-content/uploads/b.png \
                    https://old.example.com/wp-content/uploads/a.png \
                    https://old.example.com/wp-content/uploads/b.png";
        assert_eq!(
            pattern().scan(body),
            vec![
                "https://old.example.com/wp-content/uploads/b.png",
                "https://old.example.com/wp-content/uploads/a.png",
            ]
        );
    }

    #[test]
    fn domain_is_literal() {
        // An unescaped '.' would also match "oldXexample.com".
        let body = "https://oldXexample.com/wp-content/uploads/a.png";
        assert!(pattern().scan(body).is_empty());
    }

    #[test]
    fn domain_ignores_case() {
        let body = "https://OLD.Example.com/wp-content/uploads/a.png";
        assert_eq!(pattern().scan(body), vec![body]);
        let upper = LinkPattern::new("Old.Example.COM", "wp-content/uploads").unwrap();
        assert_eq!(
            upper.scan("https://old.example.com/wp-content/uploads/a.png").len(),
            1
        );
        // The uploads path stays case-sensitive.
        assert!(pattern()
            .scan("https://old.example.com/WP-CONTENT/uploads/a.png")
            .is_empty());
    }

    #[test]
    fn replace_links_only_touches_whole_matches() {
        let short = "https://old.example.com/wp-content/uploads/2024/pic.jpg";
        let long = "https://old.example.com/wp-content/uploads/2024/pic.jpg.webp";
        let body = format!(r#"<img src="{short}"><source srcset="{long}"> {short}"#);
        let fixes = HashMap::from([(
            short.to_string(),
            "https://bucket.s3.amazonaws.com/2024/pic.jpg".to_string(),
        )]);

        assert_eq!(
            pattern().replace_links(&body, &fixes),
            format!(
                r#"<img src="https://bucket.s3.amazonaws.com/2024/pic.jpg"><source srcset="{long}"> https://bucket.s3.amazonaws.com/2024/pic.jpg"#
            )
        );
        assert_eq!(pattern().replace_links(&body, &HashMap::new()), body);
    }

    #[test]
    fn other_domains_and_plain_http_ignored() {
        let body = "http://old.example.com/wp-content/uploads/a.png \
                    https://new.example.com/wp-content/uploads/a.png \
                    https://old.example.com/wp-content/themes/a.png";
        assert!(pattern().scan(body).is_empty());
        assert_eq!(pattern().first_match(body), None);
    }

    #[test]
    fn no_match_is_empty() {
        assert!(pattern().scan("plain text").is_empty());
        assert!(pattern().scan("").is_empty());
    }

    #[test]
    fn first_match_and_fragment() {
        let value = r#"{"bg":"https://old.example.com/wp-content/uploads/x.jpg","alt":"https://old.example.com/wp-content/uploads/y.jpg"}"#;
        let p = pattern();
        assert_eq!(
            p.first_match(value),
            Some("https://old.example.com/wp-content/uploads/x.jpg")
        );
        assert_eq!(p.fragment(), "old.example.com/wp-content/uploads/");
        assert_eq!(p.domain(), "old.example.com");
    }

    #[test]
    fn uploads_path_slashes_trimmed() {
        let p = LinkPattern::new("old.example.com", "/wp-content/uploads/").unwrap();
        assert_eq!(p.fragment(), "old.example.com/wp-content/uploads/");
        assert_eq!(
            p.scan("https://old.example.com/wp-content/uploads/a.gif"),
            vec!["https://old.example.com/wp-content/uploads/a.gif"]
        );
    }
}
