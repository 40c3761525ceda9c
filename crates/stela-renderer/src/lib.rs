//! Markdown to HTML rendering for stela.
//!
//! [`HtmlRenderer`] converts one document body into an HTML fragment plus
//! a table of contents. The supported markup extensions form a fixed,
//! enumerable set selected by [`Extensions`]:
//!
//! - GFM tables, strikethrough, task lists
//! - admonition blocks (`!!! note "Title"` and `> [!NOTE]` alerts)
//! - `:shortcode:` emoji substitution
//! - relative `.md` link rewriting to `.html`
//!
//! Rendering is deterministic and has no fatal error path: unrecognized
//! syntax passes through as literal text, and soft failures are collected
//! as warnings on the [`RenderResult`].
//!
//! # Example
//!
//! ```
//! use stela_renderer::{Extensions, HtmlRenderer};
//!
//! let mut renderer = HtmlRenderer::new(Extensions::default()).with_title_extraction();
//! let result = renderer.render_markdown("# Hello\n\n**Bold** text");
//! assert_eq!(result.title.as_deref(), Some("Hello"));
//! ```

mod admonition;
mod emoji;
mod extensions;
mod links;
mod renderer;
mod state;

pub use admonition::AdmonitionKind;
pub use extensions::{Extensions, UnknownExtension};
pub use links::rewrite_href;
pub use renderer::{HtmlRenderer, RenderResult};
pub use state::{TocEntry, escape_html, slugify};
