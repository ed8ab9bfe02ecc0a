//! Filename extraction from a matched link.

/// Extracts the last path segment of a link as its filename, exactly as it
/// is written in the link.
///
/// Query string and fragment are not part of the filename. No URL
/// normalization is applied: non-ASCII names stay as they are, so they can
/// be matched against stored attachment paths. Returns `None` if the path
/// is empty or root.
pub fn filename_from_link(link: &str) -> Option<String> {
    let without_query = link.split(['?', '#']).next().unwrap_or(link);
    let path = match without_query.split_once("://") {
        Some((_, rest)) => rest.split_once('/').map(|(_, path)| path).unwrap_or(""),
        None => without_query,
    };
    let segment = path.split('/').filter(|s| !s.is_empty()).last()?;
    if segment == "." || segment == ".." {
        return None;
    }
    Some(segment.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal() {
        assert_eq!(
            filename_from_link("https://example.com/wp-content/uploads/2024/05/pic.jpg").as_deref(),
            Some("pic.jpg")
        );
        assert_eq!(
            filename_from_link("https://example.com/single").as_deref(),
            Some("single")
        );
    }

    #[test]
    fn root_or_empty() {
        assert_eq!(filename_from_link("https://example.com/"), None);
        assert_eq!(filename_from_link("https://example.com"), None);
        assert_eq!(filename_from_link("https://example.com/a/.."), None);
    }

    #[test]
    fn with_query_and_fragment() {
        assert_eq!(
            filename_from_link("https://example.com/a/file.png?ver=3#top").as_deref(),
            Some("file.png")
        );
        assert_eq!(
            filename_from_link("https://example.com/a/file.png#x/y").as_deref(),
            Some("file.png")
        );
    }

    #[test]
    fn non_ascii_names_kept_verbatim() {
        assert_eq!(
            filename_from_link("https://example.com/wp-content/uploads/2024/café-300x200.jpg")
                .as_deref(),
            Some("café-300x200.jpg")
        );
        assert_eq!(
            filename_from_link("https://example.com/uploads/日本語.png").as_deref(),
            Some("日本語.png")
        );
    }

    #[test]
    fn malformed_host_still_splits() {
        assert_eq!(
            filename_from_link("https://exa mple.com/a/b.gif?x=1").as_deref(),
            Some("b.gif")
        );
    }
}
