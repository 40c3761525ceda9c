//! Front matter block parsing.
//!
//! A front matter block is a leading `---` fence line, a YAML mapping, and
//! a closing `---` (or `...`) fence. Recognized keys are `title`, `date`
//! and `author`; unknown keys are ignored so documents written for other
//! generators still load.

use serde::Deserialize;

/// Metadata block preceding a document's body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FrontMatter {
    /// Page title (overrides H1 extraction).
    #[serde(default)]
    pub title: Option<String>,
    /// Authoring or revision date, kept as written.
    #[serde(default)]
    pub date: Option<String>,
    /// Document author.
    #[serde(default)]
    pub author: Option<String>,
}

/// Split a source file into parsed front matter and the remaining body.
///
/// Content without a leading `---` line is returned unchanged with no
/// front matter. A present but malformed block (bad YAML, non-mapping
/// value, or missing closing fence) is an error carrying a message.
pub(crate) fn split(text: &str) -> Result<(Option<FrontMatter>, &str), String> {
    let Some(rest) = strip_open_fence(text) else {
        return Ok((None, text));
    };

    let Some((block, body)) = split_close_fence(rest) else {
        return Err("missing closing '---' fence".to_owned());
    };

    if block.trim().is_empty() {
        return Ok((Some(FrontMatter::default()), body));
    }

    let front_matter: FrontMatter =
        serde_yaml::from_str(block).map_err(|e| e.to_string())?;
    Ok((Some(front_matter), body))
}

/// Strip the opening `---` fence line, returning the remainder.
fn strip_open_fence(text: &str) -> Option<&str> {
    let rest = text.strip_prefix("---")?;
    // The fence must be the whole first line
    let rest = rest.strip_prefix('\n').or_else(|| rest.strip_prefix("\r\n"))?;
    Some(rest)
}

/// Split at the closing fence line (`---` or `...` on its own line).
fn split_close_fence(rest: &str) -> Option<(&str, &str)> {
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let trimmed = line.trim_end_matches(['\n', '\r']);
        if trimmed == "---" || trimmed == "..." {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}
