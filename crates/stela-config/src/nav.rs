//! Navigation tree parsing.
//!
//! The `nav` key in `stela.yml` is a sequence where each item is one of:
//!
//! - a single-key mapping of title to a path string (page),
//! - a single-key mapping of title to a nested sequence (section),
//! - a bare path string (page; title derived from the file stem).
//!
//! ```yaml
//! nav:
//!   - Home: index.md
//!   - Kubernetes:
//!       - Overview: k8s/index.md
//!       - kubectl: k8s/kubectl.md
//!   - about.md
//! ```

use serde_yaml::Value;

use crate::ConfigError;

/// A node in the site's navigation hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavNode {
    /// Leaf entry pointing at a markdown file (path relative to `docs_dir`).
    Page {
        /// Title shown in navigation.
        title: String,
        /// Source path relative to the docs directory.
        path: String,
    },
    /// Internal node grouping an ordered list of children.
    Section {
        /// Title shown in navigation.
        title: String,
        /// Children in declared order.
        children: Vec<NavNode>,
    },
}

impl NavNode {
    /// Title of the node.
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Page { title, .. } | Self::Section { title, .. } => title,
        }
    }

    /// Iterate over all leaf paths in this subtree, in declared order.
    pub fn leaf_paths(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        match self {
            Self::Page { path, .. } => Box::new(std::iter::once(path.as_str())),
            Self::Section { children, .. } => {
                Box::new(children.iter().flat_map(NavNode::leaf_paths))
            }
        }
    }
}

/// Parse a raw YAML `nav` value into a navigation tree.
///
/// # Errors
///
/// Returns `ConfigError::Nav` when the value is not a sequence, an entry
/// is neither a string nor a single-key mapping, a title is not a string,
/// or a section is empty.
pub fn parse_nav(value: &Value) -> Result<Vec<NavNode>, ConfigError> {
    let Value::Sequence(items) = value else {
        return Err(nav_error("nav must be a list"));
    };
    items.iter().map(parse_item).collect()
}

fn parse_item(item: &Value) -> Result<NavNode, ConfigError> {
    match item {
        Value::String(path) => Ok(NavNode::Page {
            title: title_from_path(path),
            path: path.clone(),
        }),
        Value::Mapping(map) => {
            if map.len() != 1 {
                return Err(nav_error(
                    "nav entries must be single-key mappings of title to path or list",
                ));
            }
            let (key, val) = map.iter().next().ok_or_else(|| nav_error("empty nav entry"))?;
            let Value::String(title) = key else {
                return Err(nav_error("nav entry title must be a string"));
            };
            match val {
                Value::String(path) => Ok(NavNode::Page {
                    title: title.clone(),
                    path: path.clone(),
                }),
                Value::Sequence(children) => {
                    if children.is_empty() {
                        return Err(nav_error(&format!("section '{title}' has no entries")));
                    }
                    let children = children
                        .iter()
                        .map(parse_item)
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok(NavNode::Section {
                        title: title.clone(),
                        children,
                    })
                }
                other => Err(nav_error(&format!(
                    "value for '{title}' must be a path string or a nested list, got {}",
                    value_kind(other)
                ))),
            }
        }
        other => Err(nav_error(&format!(
            "nav entries must be strings or mappings, got {}",
            value_kind(other)
        ))),
    }
}

fn nav_error(msg: &str) -> ConfigError {
    ConfigError::Nav(msg.to_owned())
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// Derive a display title from a file or directory path.
///
/// `k8s/service-accounts.md` becomes "Service accounts". Used for bare
/// nav entries and for navigation derived from the docs directory.
#[must_use]
pub fn title_from_path(path: &str) -> String {
    let stem = path
        .rsplit('/')
        .next()
        .unwrap_or(path)
        .trim_end_matches(".md");
    let words = stem.replace(['-', '_'], " ");
    let mut chars = words.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
