//! Admonition block extraction.
//!
//! Supports the wiki-style block form:
//!
//! ```text
//! !!! warning "Watch out"
//!     Body is **markdown**, indented four spaces.
//! ```
//!
//! Extraction happens before markdown parsing: each block is replaced by
//! an HTML comment placeholder, the body is rendered through a nested
//! pass, and the placeholder is substituted in the final output. Header
//! lines inside fenced code blocks are left alone.

use std::fmt::Write;
use std::sync::OnceLock;

use regex::Regex;

use crate::state::escape_html;

/// Body indent required to belong to an admonition block.
const BODY_INDENT: &str = "    ";

/// Recognized admonition kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmonitionKind {
    /// Neutral side note.
    Note,
    /// Supplementary information.
    Info,
    /// Helpful shortcut or best practice.
    Tip,
    /// Key information the reader must not miss.
    Important,
    /// Something that can go wrong.
    Warning,
    /// Destructive or irreversible consequences.
    Danger,
    /// Worked example.
    Example,
}

impl AdmonitionKind {
    /// Parse a kind token from a block header.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "note" => Some(Self::Note),
            "info" => Some(Self::Info),
            "tip" => Some(Self::Tip),
            "important" => Some(Self::Important),
            "warning" => Some(Self::Warning),
            "danger" => Some(Self::Danger),
            "example" => Some(Self::Example),
            _ => None,
        }
    }

    /// CSS class suffix.
    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Info => "info",
            Self::Tip => "tip",
            Self::Important => "important",
            Self::Warning => "warning",
            Self::Danger => "danger",
            Self::Example => "example",
        }
    }

    /// Title used when the header carries no quoted title.
    #[must_use]
    pub fn default_title(self) -> &'static str {
        match self {
            Self::Note => "Note",
            Self::Info => "Info",
            Self::Tip => "Tip",
            Self::Important => "Important",
            Self::Warning => "Warning",
            Self::Danger => "Danger",
            Self::Example => "Example",
        }
    }
}

/// One extracted admonition, body still markdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AdmonitionBlock {
    pub(crate) kind: AdmonitionKind,
    /// `None` suppresses the title element (header carried `""`).
    pub(crate) title: Option<String>,
    pub(crate) body: String,
}

/// Result of scanning a document for admonition blocks.
#[derive(Debug, Default)]
pub(crate) struct Extracted {
    /// Source text with each block replaced by a placeholder comment.
    pub(crate) text: String,
    pub(crate) blocks: Vec<AdmonitionBlock>,
    pub(crate) warnings: Vec<String>,
}

/// Placeholder comment emitted for block `index`.
pub(crate) fn placeholder(index: usize) -> String {
    format!("<!-- stela:admonition:{index} -->")
}

fn header_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^!!!\s+([a-z][a-z-]*)(?:\s+"([^"]*)")?\s*$"#).expect("valid header regex")
    })
}

/// Scan `markdown` and pull out admonition blocks.
///
/// Header lines with an unknown kind degrade to `note` and record a
/// warning. Header lines inside fenced code blocks are ignored.
pub(crate) fn extract(markdown: &str) -> Extracted {
    let mut out = Extracted::default();
    let lines: Vec<&str> = markdown.lines().collect();
    let mut in_fence = false;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if is_fence_line(line) {
            in_fence = !in_fence;
            out.text.push_str(line);
            out.text.push('\n');
            i += 1;
            continue;
        }

        let captures = if in_fence {
            None
        } else {
            header_regex().captures(line)
        };
        let Some(captures) = captures else {
            out.text.push_str(line);
            out.text.push('\n');
            i += 1;
            continue;
        };

        let token = &captures[1];
        let kind = AdmonitionKind::parse(token).unwrap_or_else(|| {
            out.warnings
                .push(format!("unknown admonition kind '{token}', rendering as note"));
            AdmonitionKind::Note
        });
        let title = match captures.get(2) {
            Some(m) if m.as_str().is_empty() => None,
            Some(m) => Some(m.as_str().to_owned()),
            None => Some(kind.default_title().to_owned()),
        };

        i += 1;
        let body = collect_body(&lines, &mut i);

        let index = out.blocks.len();
        out.blocks.push(AdmonitionBlock { kind, title, body });
        let _ = writeln!(out.text, "\n{}\n", placeholder(index));
    }

    out
}

/// Collect the indented body following a header, advancing `i` past it.
fn collect_body(lines: &[&str], i: &mut usize) -> String {
    let mut body = String::new();
    let mut pending_blanks = 0usize;

    while *i < lines.len() {
        let line = lines[*i];
        if line.trim().is_empty() {
            pending_blanks += 1;
            *i += 1;
        } else if let Some(stripped) = line.strip_prefix(BODY_INDENT) {
            for _ in 0..pending_blanks {
                body.push('\n');
            }
            pending_blanks = 0;
            body.push_str(stripped);
            body.push('\n');
            *i += 1;
        } else {
            // Blank lines before a non-indented line belong to the document
            *i -= pending_blanks;
            break;
        }
    }

    // Trailing blanks at end of input also return to the document
    if pending_blanks > 0 && *i >= lines.len() {
        *i -= pending_blanks;
    }

    body
}

/// Whether a line opens or closes a fenced code block.
fn is_fence_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    (line.len() - trimmed.len()) < 4 && (trimmed.starts_with("```") || trimmed.starts_with("~~~"))
}

/// Wrap a rendered body in the admonition markup.
pub(crate) fn wrap(kind: AdmonitionKind, title: Option<&str>, body_html: &str) -> String {
    let mut out = String::with_capacity(body_html.len() + 96);
    let _ = write!(out, r#"<div class="admonition {}">"#, kind.css_class());
    if let Some(title) = title {
        let _ = write!(
            out,
            r#"<p class="admonition-title">{}</p>"#,
            escape_html(title)
        );
    }
    out.push_str(body_html);
    out.push_str("</div>");
    out
}
