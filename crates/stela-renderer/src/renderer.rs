//! Event-driven HTML renderer.

use std::fmt::Write;

use pulldown_cmark::{
    BlockQuoteKind, CodeBlockKind, Event, Parser, Tag, TagEnd,
};

use crate::admonition::{self, AdmonitionKind};
use crate::emoji;
use crate::extensions::Extensions;
use crate::links::rewrite_href;
use crate::state::{CodeBlockState, HeadingState, ImageState, TocEntry, escape_html};

/// Result of rendering one document body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderResult {
    /// Rendered HTML fragment.
    pub html: String,
    /// Title extracted from the first H1 heading (if enabled).
    pub title: Option<String>,
    /// Table of contents entries in document order.
    pub toc: Vec<TocEntry>,
    /// Non-fatal warnings (degraded syntax).
    pub warnings: Vec<String>,
}

/// Markdown to HTML renderer.
///
/// One renderer renders one document at a time; state is reset on each
/// [`render_markdown`](Self::render_markdown) call except for the
/// configuration set at construction.
pub struct HtmlRenderer {
    extensions: Extensions,
    extract_title: bool,
    output: String,
    heading: HeadingState,
    code: CodeBlockState,
    table: crate::state::TableState,
    image: ImageState,
    pending_image: Option<(String, String)>,
    /// Nested blockquote kinds; `None` for a plain blockquote.
    quote_stack: Vec<Option<AdmonitionKind>>,
    warnings: Vec<String>,
}

impl HtmlRenderer {
    /// Create a renderer for the given extension set.
    #[must_use]
    pub fn new(extensions: Extensions) -> Self {
        Self {
            extensions,
            extract_title: false,
            output: String::with_capacity(4096),
            heading: HeadingState::new(false),
            code: CodeBlockState::default(),
            table: crate::state::TableState::default(),
            image: ImageState::default(),
            pending_image: None,
            quote_stack: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Enable title extraction from the first H1 heading.
    ///
    /// The H1 is rendered and listed in the TOC as usual.
    #[must_use]
    pub fn with_title_extraction(mut self) -> Self {
        self.extract_title = true;
        self
    }

    /// Extension set this renderer was built with.
    #[must_use]
    pub fn extensions(&self) -> Extensions {
        self.extensions
    }

    /// Render a markdown body to HTML.
    ///
    /// Deterministic: the same input always yields byte-identical output.
    pub fn render_markdown(&mut self, markdown: &str) -> RenderResult {
        self.reset();

        let (text, blocks) = if self.extensions.admonition {
            let extracted = admonition::extract(markdown);
            self.warnings.extend(extracted.warnings);
            (extracted.text, extracted.blocks)
        } else {
            (markdown.to_owned(), Vec::new())
        };

        let parser = Parser::new_ext(&text, self.extensions.parser_options());
        for event in parser {
            self.process_event(event);
        }

        let mut html = std::mem::take(&mut self.output);
        for (index, block) in blocks.iter().enumerate() {
            let mut nested = Self::new(self.extensions);
            let body = nested.render_markdown(&block.body);
            self.warnings.extend(body.warnings);
            let rendered = admonition::wrap(block.kind, block.title.as_deref(), &body.html);
            html = html.replace(&admonition::placeholder(index), &rendered);
        }

        RenderResult {
            html,
            title: self.heading.take_title(),
            toc: self.heading.take_toc(),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    fn reset(&mut self) {
        self.output.clear();
        self.heading = HeadingState::new(self.extract_title);
        self.code = CodeBlockState::default();
        self.table = crate::state::TableState::default();
        self.image = ImageState::default();
        self.pending_image = None;
        self.quote_stack.clear();
        self.warnings.clear();
    }

    /// Push inline content to the heading buffer or the output.
    fn push_inline(&mut self, content: &str) {
        if self.heading.is_active() {
            self.heading.push_html(content);
        } else {
            self.output.push_str(content);
        }
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(&tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) | Event::InlineHtml(html) => self.output.push_str(&html),
            Event::SoftBreak => self.soft_break(),
            Event::HardBreak => self.push_inline("<br>"),
            Event::Rule => self.output.push_str("<hr>"),
            Event::TaskListMarker(checked) => self.task_list_marker(checked),
            Event::FootnoteReference(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {
                // Not supported
            }
        }
    }

    fn start_tag(&mut self, tag: &Tag<'_>) {
        match tag {
            Tag::Paragraph => self.output.push_str("<p>"),
            Tag::Heading { level, .. } => {
                // Opening tag is written in end_tag once the id is known
                self.heading.start(*level as u8);
            }
            Tag::BlockQuote(kind) => {
                let kind = (*kind).map(alert_kind);
                match kind {
                    Some(alert) => {
                        let _ = write!(
                            self.output,
                            r#"<div class="admonition {}"><p class="admonition-title">{}</p>"#,
                            alert.css_class(),
                            alert.default_title()
                        );
                    }
                    None => self.output.push_str("<blockquote>"),
                }
                self.quote_stack.push(kind);
            }
            Tag::CodeBlock(kind) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(info) if !info.is_empty() => {
                        // Fence info may carry attributes after the language
                        info.split_whitespace().next().map(str::to_owned)
                    }
                    _ => None,
                };
                self.code.start(lang);
            }
            Tag::List(start) => match start {
                Some(1) => self.output.push_str("<ol>"),
                Some(n) => {
                    let _ = write!(self.output, r#"<ol start="{n}">"#);
                }
                None => self.output.push_str("<ul>"),
            },
            Tag::Item => self.output.push_str("<li>"),
            Tag::Table(alignments) => {
                self.table.start(alignments.clone());
                self.output.push_str("<table>");
            }
            Tag::TableHead => {
                self.table.start_head();
                self.output.push_str("<thead><tr>");
            }
            Tag::TableRow => {
                self.table.start_row();
                self.output.push_str("<tr>");
            }
            Tag::TableCell => {
                let align = self.table.current_alignment_style();
                let cell = if self.table.is_in_head() { "th" } else { "td" };
                let _ = write!(self.output, "<{cell}{align}>");
            }
            Tag::Emphasis => self.push_inline("<em>"),
            Tag::Strong => self.push_inline("<strong>"),
            Tag::Strikethrough => self.push_inline("<s>"),
            Tag::Link { dest_url, .. } => {
                let href = rewrite_href(dest_url);
                let link = format!(r#"<a href="{}">"#, escape_html(&href));
                self.push_inline(&link);
            }
            Tag::Image { dest_url, title, .. } => {
                // Alt text is collected from events; image written in end_tag
                self.image.start();
                self.pending_image = Some((dest_url.to_string(), title.to_string()));
            }
            Tag::Superscript => self.push_inline("<sup>"),
            Tag::Subscript => self.push_inline("<sub>"),
            Tag::DefinitionList => self.output.push_str("<dl>"),
            Tag::DefinitionListTitle => self.output.push_str("<dt>"),
            Tag::DefinitionListDefinition => self.output.push_str("<dd>"),
            Tag::FootnoteDefinition(_) | Tag::HtmlBlock | Tag::MetadataBlock(_) => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.output.push_str("</p>"),
            TagEnd::Heading(_) => {
                if let Some((level, id, html)) = self.heading.complete() {
                    let _ = write!(
                        self.output,
                        r#"<h{level} id="{id}">{}</h{level}>"#,
                        html.trim()
                    );
                }
            }
            TagEnd::BlockQuote(_) => match self.quote_stack.pop() {
                Some(Some(_)) => self.output.push_str("</div>"),
                _ => self.output.push_str("</blockquote>"),
            },
            TagEnd::CodeBlock => {
                let (lang, content) = self.code.end();
                match lang {
                    Some(lang) => {
                        let _ = write!(
                            self.output,
                            r#"<pre><code class="language-{}">{}</code></pre>"#,
                            escape_html(&lang),
                            escape_html(&content)
                        );
                    }
                    None => {
                        let _ = write!(
                            self.output,
                            "<pre><code>{}</code></pre>",
                            escape_html(&content)
                        );
                    }
                }
            }
            TagEnd::List(ordered) => {
                self.output.push_str(if ordered { "</ol>" } else { "</ul>" });
            }
            TagEnd::Item => self.output.push_str("</li>"),
            TagEnd::Table => self.output.push_str("</tbody></table>"),
            TagEnd::TableHead => {
                self.output.push_str("</tr></thead><tbody>");
                self.table.end_head();
            }
            TagEnd::TableRow => self.output.push_str("</tr>"),
            TagEnd::TableCell => {
                self.output.push_str(if self.table.is_in_head() {
                    "</th>"
                } else {
                    "</td>"
                });
                self.table.next_cell();
            }
            TagEnd::Emphasis => self.push_inline("</em>"),
            TagEnd::Strong => self.push_inline("</strong>"),
            TagEnd::Strikethrough => self.push_inline("</s>"),
            TagEnd::Link => self.push_inline("</a>"),
            TagEnd::Image => {
                let alt = self.image.end();
                if let Some((src, title)) = self.pending_image.take() {
                    self.write_image(&src, &alt, &title);
                }
            }
            TagEnd::Superscript => self.push_inline("</sup>"),
            TagEnd::Subscript => self.push_inline("</sub>"),
            TagEnd::DefinitionList => self.output.push_str("</dl>"),
            TagEnd::DefinitionListTitle => self.output.push_str("</dt>"),
            TagEnd::DefinitionListDefinition => self.output.push_str("</dd>"),
            TagEnd::FootnoteDefinition | TagEnd::HtmlBlock | TagEnd::MetadataBlock(_) => {}
        }
    }

    fn write_image(&mut self, src: &str, alt: &str, title: &str) {
        if title.is_empty() {
            let _ = write!(
                self.output,
                r#"<img src="{}" alt="{}">"#,
                escape_html(src),
                escape_html(alt)
            );
        } else {
            let _ = write!(
                self.output,
                r#"<img src="{}" title="{}" alt="{}">"#,
                escape_html(src),
                escape_html(title),
                escape_html(alt)
            );
        }
    }

    fn text(&mut self, text: &str) {
        if self.code.is_active() {
            self.code.push_str(text);
            return;
        }
        if self.image.is_active() {
            self.image.push_str(text);
            return;
        }

        let substituted = if self.extensions.emoji {
            emoji::substitute(text)
        } else {
            std::borrow::Cow::Borrowed(text)
        };

        if self.heading.is_active() {
            self.heading.push_text(&substituted);
            let escaped = escape_html(&substituted);
            self.heading.push_html(&escaped);
        } else {
            self.output.push_str(&escape_html(&substituted));
        }
    }

    fn inline_code(&mut self, code: &str) {
        // Emoji substitution never applies inside code spans
        if self.heading.is_active() {
            self.heading.push_text(code);
            let html = format!("<code>{}</code>", escape_html(code));
            self.heading.push_html(&html);
        } else {
            let _ = write!(self.output, "<code>{}</code>", escape_html(code));
        }
    }

    fn soft_break(&mut self) {
        if self.code.is_active() {
            self.code.push_newline();
        } else {
            self.push_inline("\n");
        }
    }

    fn task_list_marker(&mut self, checked: bool) {
        self.output.push_str(if checked {
            r#"<input type="checkbox" checked disabled> "#
        } else {
            r#"<input type="checkbox" disabled> "#
        });
    }
}

/// Map GitHub alert blockquote kinds onto admonition kinds.
fn alert_kind(kind: BlockQuoteKind) -> AdmonitionKind {
    match kind {
        BlockQuoteKind::Note => AdmonitionKind::Note,
        BlockQuoteKind::Tip => AdmonitionKind::Tip,
        BlockQuoteKind::Important => AdmonitionKind::Important,
        BlockQuoteKind::Warning => AdmonitionKind::Warning,
        BlockQuoteKind::Caution => AdmonitionKind::Danger,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(markdown: &str) -> RenderResult {
        HtmlRenderer::new(Extensions::default()).render_markdown(markdown)
    }

    fn render_all(markdown: &str) -> RenderResult {
        HtmlRenderer::new(Extensions::all()).render_markdown(markdown)
    }

    #[test]
    fn test_basic_paragraph() {
        assert_eq!(render("Hello, world!").html, "<p>Hello, world!</p>");
    }

    #[test]
    fn test_heading_with_id_and_toc() {
        let result = render("## Section Title");
        assert_eq!(result.html, r#"<h2 id="section-title">Section Title</h2>"#);
        assert_eq!(
            result.toc,
            vec![TocEntry {
                level: 2,
                title: "Section Title".to_owned(),
                id: "section-title".to_owned()
            }]
        );
    }

    #[test]
    fn test_title_extraction() {
        let result = HtmlRenderer::new(Extensions::default())
            .with_title_extraction()
            .render_markdown("# My Title\n\nContent\n\n## Section");
        assert_eq!(result.title.as_deref(), Some("My Title"));
        assert!(result.html.contains(r#"<h1 id="my-title">My Title</h1>"#));
        assert_eq!(result.toc.len(), 2);
        assert_eq!(result.toc[0].title, "My Title");
        assert_eq!(result.toc[1].title, "Section");
    }

    #[test]
    fn test_duplicate_heading_ids() {
        let result = render("## FAQ\n\n## FAQ\n\n## FAQ");
        assert_eq!(result.toc[0].id, "faq");
        assert_eq!(result.toc[1].id, "faq-1");
        assert_eq!(result.toc[2].id, "faq-2");
    }

    #[test]
    fn test_heading_with_inline_code() {
        let result = render("## Install `kubectl`");
        assert!(result.html.contains("<code>kubectl</code>"));
        assert_eq!(result.toc[0].title, "Install kubectl");
        assert_eq!(result.toc[0].id, "install-kubectl");
    }

    #[test]
    fn test_code_block() {
        let result = render("```rust\nfn main() {}\n```");
        assert_eq!(
            result.html,
            "<pre><code class=\"language-rust\">fn main() {}\n</code></pre>"
        );
    }

    #[test]
    fn test_code_block_escapes_content() {
        let result = render("```\n<script>alert(1)</script>\n```");
        assert!(result.html.contains("&lt;script&gt;"));
        assert!(!result.html.contains("<script>"));
    }

    #[test]
    fn test_literal_text_round_trip() {
        // No recognized extension syntax: text survives modulo escaping
        let result = render("Plain notes about kubectl & helm.");
        assert_eq!(result.html, "<p>Plain notes about kubectl &amp; helm.</p>");
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let markdown = "# T\n\n- a\n- b\n\n| A | B |\n|---|---|\n| 1 | 2 |\n";
        let first = render_all(markdown);
        let second = render_all(markdown);
        assert_eq!(first, second);
    }

    #[test]
    fn test_table() {
        let result = render("| A | B |\n|---|---|\n| 1 | 2 |");
        assert!(result.html.contains("<table><thead><tr><th>A</th><th>B</th>"));
        assert!(result.html.contains("<tbody><tr><td>1</td><td>2</td></tr></tbody></table>"));
    }

    #[test]
    fn test_table_alignment() {
        let result = render("| A | B |\n|:--|--:|\n| 1 | 2 |");
        assert!(result.html.contains(r#"<th style="text-align: left">A</th>"#));
        assert!(result.html.contains(r#"<td style="text-align: right">2</td>"#));
    }

    #[test]
    fn test_tables_disabled_pass_through() {
        let result = HtmlRenderer::new(Extensions::from_names::<&str>(&[]).unwrap())
            .render_markdown("| A | B |\n|---|---|");
        assert!(!result.html.contains("<table>"));
        assert!(result.html.contains("| A | B |"));
    }

    #[test]
    fn test_task_list() {
        let result = render_all("- [ ] open\n- [x] done");
        assert!(result.html.contains(r#"<input type="checkbox" disabled> open"#));
        assert!(result.html.contains(r#"<input type="checkbox" checked disabled> done"#));
    }

    #[test]
    fn test_strikethrough() {
        let result = render_all("~~gone~~");
        assert_eq!(result.html, "<p><s>gone</s></p>");
    }

    #[test]
    fn test_emoji_in_text() {
        let result = render_all("ship it :rocket:");
        assert_eq!(result.html, "<p>ship it \u{1f680}</p>");
    }

    #[test]
    fn test_emoji_not_in_code() {
        let result = render_all("`:rocket:`\n\n```\n:rocket:\n```");
        assert!(result.html.contains("<code>:rocket:</code>"));
        assert!(result.html.contains(":rocket:\n</code></pre>"));
        assert!(!result.html.contains('\u{1f680}'));
    }

    #[test]
    fn test_emoji_disabled() {
        let result = render("nope :rocket:");
        assert_eq!(result.html, "<p>nope :rocket:</p>");
    }

    #[test]
    fn test_admonition_block() {
        let result = render_all("!!! warning \"Careful\"\n    Body with **bold**.\n");
        assert!(result.html.contains(r#"<div class="admonition warning">"#));
        assert!(result.html.contains(r#"<p class="admonition-title">Careful</p>"#));
        assert!(result.html.contains("<strong>bold</strong>"));
        assert!(result.html.trim_end().ends_with("</div>"));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_admonition_unknown_kind_warns() {
        let result = render_all("!!! shouty\n    hi\n");
        assert!(result.html.contains(r#"<div class="admonition note">"#));
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("shouty"));
    }

    #[test]
    fn test_admonition_disabled_passes_through() {
        let result = render("!!! note\n    body\n");
        assert!(!result.html.contains("admonition"));
        assert!(result.html.contains("!!! note"));
    }

    #[test]
    fn test_github_alert_blockquote() {
        let result = render_all("> [!NOTE]\n> Useful context.");
        assert!(result.html.contains(r#"<div class="admonition note">"#));
        assert!(result.html.contains(r#"<p class="admonition-title">Note</p>"#));
        assert!(result.html.contains("Useful context."));
    }

    #[test]
    fn test_caution_alert_maps_to_danger() {
        let result = render_all("> [!CAUTION]\n> Boom.");
        assert!(result.html.contains(r#"<div class="admonition danger">"#));
    }

    #[test]
    fn test_plain_blockquote() {
        let result = render_all("> quoted");
        assert_eq!(result.html, "<blockquote><p>quoted</p></blockquote>");
    }

    #[test]
    fn test_md_link_rewritten() {
        let result = render("[Pods](k8s/pods.md#labels)");
        assert!(result.html.contains(r#"<a href="k8s/pods.html#labels">Pods</a>"#));
    }

    #[test]
    fn test_external_link_unchanged() {
        let result = render("[Docs](https://kubernetes.io)");
        assert!(result.html.contains(r#"<a href="https://kubernetes.io">Docs</a>"#));
    }

    #[test]
    fn test_image() {
        let result = render("![Alt text](diagram.png)");
        assert_eq!(result.html, r#"<p><img src="diagram.png" alt="Alt text"></p>"#);
    }

    #[test]
    fn test_lists() {
        let result = render("1. First\n2. Second");
        assert_eq!(result.html, "<ol><li>First</li><li>Second</li></ol>");
        let result = render("- a\n- b");
        assert_eq!(result.html, "<ul><li>a</li><li>b</li></ul>");
    }

    #[test]
    fn test_ordered_list_start() {
        let result = render("3. third\n4. fourth");
        assert!(result.html.starts_with(r#"<ol start="3">"#));
    }

    #[test]
    fn test_renderer_reusable_across_documents() {
        let mut renderer = HtmlRenderer::new(Extensions::default()).with_title_extraction();
        let first = renderer.render_markdown("# One\n\n## A");
        let second = renderer.render_markdown("# Two\n\n## A");
        assert_eq!(first.title.as_deref(), Some("One"));
        assert_eq!(second.title.as_deref(), Some("Two"));
        // Anchor ids do not leak between documents
        assert_eq!(second.toc[1].id, "a");
    }

    #[test]
    fn test_nested_admonition() {
        let md = "!!! note\n    outer\n\n    !!! tip\n        inner\n";
        let result = render_all(md);
        assert!(result.html.contains(r#"<div class="admonition note">"#));
        assert!(result.html.contains(r#"<div class="admonition tip">"#));
        assert!(result.html.contains("inner"));
    }
}
