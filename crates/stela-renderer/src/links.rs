//! Cross-reference link rewriting.
//!
//! The output tree mirrors the source tree, so a relative link between
//! markdown files maps to the same relative link between HTML files. Only
//! the extension changes; fragments are preserved.

/// Rewrite a markdown href for the generated site.
///
/// - `guide.md` -> `guide.html`, `../k8s/pods.md#labels` -> `../k8s/pods.html#labels`
/// - external (`http://`, `https://`, `//`), `mailto:`, `tel:` and
///   fragment-only links are returned unchanged
/// - non-markdown links (images, assets) are returned unchanged
#[must_use]
#[allow(clippy::case_sensitive_file_extension_comparisons)]
pub fn rewrite_href(url: &str) -> String {
    if url.starts_with("http://")
        || url.starts_with("https://")
        || url.starts_with("//")
        || url.starts_with("mailto:")
        || url.starts_with("tel:")
        || url.starts_with('#')
    {
        return url.to_owned();
    }

    let (path, fragment) = match url.find('#') {
        Some(pos) => (&url[..pos], &url[pos..]),
        None => (url, ""),
    };

    match path.strip_suffix(".md") {
        Some(stem) => format!("{stem}.html{fragment}"),
        None => url.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sibling_link() {
        assert_eq!(rewrite_href("guide.md"), "guide.html");
        assert_eq!(rewrite_href("./guide.md"), "./guide.html");
    }

    #[test]
    fn test_nested_and_parent_links() {
        assert_eq!(rewrite_href("k8s/pods.md"), "k8s/pods.html");
        assert_eq!(rewrite_href("../tools/cobra.md"), "../tools/cobra.html");
    }

    #[test]
    fn test_fragment_preserved() {
        assert_eq!(rewrite_href("pods.md#labels"), "pods.html#labels");
    }

    #[test]
    fn test_fragment_only_unchanged() {
        assert_eq!(rewrite_href("#section"), "#section");
    }

    #[test]
    fn test_external_unchanged() {
        assert_eq!(rewrite_href("https://example.com/a.md"), "https://example.com/a.md");
        assert_eq!(rewrite_href("mailto:a@b.c"), "mailto:a@b.c");
        assert_eq!(rewrite_href("//cdn.example.com/x.md"), "//cdn.example.com/x.md");
    }

    #[test]
    fn test_non_markdown_unchanged() {
        assert_eq!(rewrite_href("diagram.png"), "diagram.png");
        assert_eq!(rewrite_href("notes.txt"), "notes.txt");
    }

    #[test]
    fn test_uppercase_extension_unchanged() {
        // Extension matching is case sensitive, matching the loader.
        assert_eq!(rewrite_href("README.MD"), "README.MD");
    }
}
