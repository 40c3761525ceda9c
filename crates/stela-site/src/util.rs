//! Path utilities for the generated site.

/// Compute a relative URL from one output file to another (RFC 3986).
///
/// Both `from` and `to` are slash-separated paths relative to the site
/// root. Per RFC 3986 the last segment of `from` is the current document;
/// the base directory is everything before it.
///
/// # Examples
///
/// ```
/// use stela_site::relative_path;
///
/// assert_eq!(relative_path("k8s/pods.html", "about.html"), "../about.html");
/// assert_eq!(relative_path("index.html", "k8s/pods.html"), "k8s/pods.html");
/// ```
#[must_use]
pub fn relative_path(from: &str, to: &str) -> String {
    let from_segs: Vec<&str> = from.split('/').filter(|s| !s.is_empty()).collect();
    let to_segs: Vec<&str> = to.split('/').filter(|s| !s.is_empty()).collect();

    let from_dir = if from_segs.is_empty() {
        &from_segs[..]
    } else {
        &from_segs[..from_segs.len() - 1]
    };

    let common = from_dir
        .iter()
        .zip(&to_segs)
        .take_while(|(a, b)| a == b)
        .count();

    let ups = "../".repeat(from_dir.len() - common);
    let down = to_segs[common..].join("/");

    let result = format!("{ups}{down}");
    if result.is_empty() {
        "./".to_owned()
    } else {
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sibling() {
        assert_eq!(relative_path("guide.html", "faq.html"), "faq.html");
    }

    #[test]
    fn test_deep_to_shallow() {
        assert_eq!(relative_path("a/b/c.html", "a/index.html"), "../index.html");
    }

    #[test]
    fn test_shallow_to_deep() {
        assert_eq!(relative_path("index.html", "a/b.html"), "a/b.html");
    }

    #[test]
    fn test_cross_tree() {
        assert_eq!(relative_path("k8s/pods.html", "tools/cli.html"), "../tools/cli.html");
    }

    #[test]
    fn test_same_file() {
        assert_eq!(relative_path("a/b.html", "a/b.html"), "b.html");
    }
}
