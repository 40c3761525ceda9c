//! Rendering state helpers: headings, tables, code blocks, escaping.

use std::collections::HashMap;

use pulldown_cmark::Alignment;

/// One table-of-contents entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    /// Heading level (1-6).
    pub level: u8,
    /// Plain-text heading title.
    pub title: String,
    /// Anchor id emitted on the heading element.
    pub id: String,
}

/// Escape text for HTML element and attribute contexts.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Slugify heading text into an anchor id.
///
/// Lowercases, keeps alphanumerics, turns runs of anything else into a
/// single `-`, and trims leading/trailing dashes.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            for lower in c.to_lowercase() {
                slug.push(lower);
            }
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Heading capture state: anchor ids, TOC collection, title extraction.
#[derive(Debug, Default)]
pub(crate) struct HeadingState {
    extract_title: bool,
    title: Option<String>,
    toc: Vec<TocEntry>,
    current: Option<CurrentHeading>,
    used_ids: HashMap<String, usize>,
}

#[derive(Debug)]
struct CurrentHeading {
    level: u8,
    text: String,
    html: String,
}

impl HeadingState {
    pub(crate) fn new(extract_title: bool) -> Self {
        Self {
            extract_title,
            ..Self::default()
        }
    }

    /// Whether a heading is currently being captured.
    pub(crate) fn is_active(&self) -> bool {
        self.current.is_some()
    }

    pub(crate) fn start(&mut self, level: u8) {
        self.current = Some(CurrentHeading {
            level,
            text: String::new(),
            html: String::new(),
        });
    }

    /// Append plain text (used for the TOC title and the anchor id).
    pub(crate) fn push_text(&mut self, text: &str) {
        if let Some(current) = &mut self.current {
            current.text.push_str(text);
        }
    }

    /// Append rendered inline HTML for the heading body.
    pub(crate) fn push_html(&mut self, html: &str) {
        if let Some(current) = &mut self.current {
            current.html.push_str(html);
        }
    }

    /// Finish the current heading, returning `(level, id, inner_html)`.
    ///
    /// Duplicate anchor ids get `-1`, `-2`, ... suffixes. The first H1 is
    /// also recorded as the document title when extraction is enabled.
    pub(crate) fn complete(&mut self) -> Option<(u8, String, String)> {
        let current = self.current.take()?;
        let title = current.text.trim().to_owned();
        let id = self.unique_id(&slugify(&title));

        if self.extract_title && self.title.is_none() && current.level == 1 {
            self.title = Some(title.clone());
        }
        self.toc.push(TocEntry {
            level: current.level,
            title,
            id: id.clone(),
        });

        Some((current.level, id, current.html))
    }

    fn unique_id(&mut self, base: &str) -> String {
        let count = self.used_ids.entry(base.to_owned()).or_insert(0);
        let id = if *count == 0 {
            base.to_owned()
        } else {
            format!("{base}-{count}")
        };
        *count += 1;
        id
    }

    pub(crate) fn take_title(&mut self) -> Option<String> {
        self.title.take()
    }

    pub(crate) fn take_toc(&mut self) -> Vec<TocEntry> {
        std::mem::take(&mut self.toc)
    }
}

/// Fenced/indented code block capture state.
#[derive(Debug, Default)]
pub(crate) struct CodeBlockState {
    active: bool,
    language: Option<String>,
    content: String,
}

impl CodeBlockState {
    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn start(&mut self, language: Option<String>) {
        self.active = true;
        self.language = language;
        self.content.clear();
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        self.content.push_str(text);
    }

    pub(crate) fn push_newline(&mut self) {
        self.content.push('\n');
    }

    pub(crate) fn end(&mut self) -> (Option<String>, String) {
        self.active = false;
        (self.language.take(), std::mem::take(&mut self.content))
    }
}

/// Table rendering state: head/body tracking and cell alignment.
#[derive(Debug, Default)]
pub(crate) struct TableState {
    alignments: Vec<Alignment>,
    in_head: bool,
    cell_index: usize,
}

impl TableState {
    pub(crate) fn start(&mut self, alignments: Vec<Alignment>) {
        self.alignments = alignments;
        self.in_head = false;
        self.cell_index = 0;
    }

    pub(crate) fn start_head(&mut self) {
        self.in_head = true;
        self.cell_index = 0;
    }

    pub(crate) fn end_head(&mut self) {
        self.in_head = false;
    }

    pub(crate) fn start_row(&mut self) {
        self.cell_index = 0;
    }

    pub(crate) fn next_cell(&mut self) {
        self.cell_index += 1;
    }

    pub(crate) fn is_in_head(&self) -> bool {
        self.in_head
    }

    /// Style attribute for the current cell's column alignment.
    pub(crate) fn current_alignment_style(&self) -> &'static str {
        match self.alignments.get(self.cell_index) {
            Some(Alignment::Left) => r#" style="text-align: left""#,
            Some(Alignment::Center) => r#" style="text-align: center""#,
            Some(Alignment::Right) => r#" style="text-align: right""#,
            _ => "",
        }
    }
}

/// Image alt-text capture state.
#[derive(Debug, Default)]
pub(crate) struct ImageState {
    active: bool,
    alt: String,
}

impl ImageState {
    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn start(&mut self) {
        self.active = true;
        self.alt.clear();
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        self.alt.push_str(text);
    }

    pub(crate) fn end(&mut self) -> String {
        self.active = false;
        std::mem::take(&mut self.alt)
    }
}
