//! HTML page shell.
//!
//! Every output page shares one shell: head metadata from the site
//! configuration, a navigation sidebar, the rendered article, and an
//! optional table-of-contents column. All asset and navigation links are
//! written relative to the current page so the site works from any mount
//! point, including `file://`.

use stela_config::Config;
use stela_renderer::{TocEntry, escape_html};

use crate::plan::{Leaf, PlanNode};
use crate::util::relative_path;

/// Default stylesheet, written once to the site root as `stela.css`.
pub(crate) const SITE_CSS: &str = include_str!("stela.css");

/// Name of the default stylesheet at the site root.
pub(crate) const SITE_CSS_PATH: &str = "stela.css";

/// Everything the shell needs for one page.
pub(crate) struct PageContext<'a> {
    pub(crate) config: &'a Config,
    /// Page title, already resolved.
    pub(crate) title: &'a str,
    /// Rendered article body.
    pub(crate) body: &'a str,
    /// Output path of this page relative to the site root.
    pub(crate) output_path: &'a str,
    pub(crate) toc: &'a [TocEntry],
    pub(crate) toc_enabled: bool,
    pub(crate) nodes: &'a [PlanNode],
    pub(crate) leaves: &'a [Leaf],
}

/// Render the full HTML document for one page.
pub(crate) fn render_page(ctx: &PageContext<'_>) -> String {
    let mut out = String::with_capacity(ctx.body.len() + 2048);
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    out.push_str("<meta charset=\"utf-8\">\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    if let Some(description) = &ctx.config.site_description {
        out.push_str("<meta name=\"description\" content=\"");
        out.push_str(&escape_html(description));
        out.push_str("\">\n");
    }
    if let Some(author) = &ctx.config.site_author {
        out.push_str("<meta name=\"author\" content=\"");
        out.push_str(&escape_html(author));
        out.push_str("\">\n");
    }
    if let Some(site_url) = &ctx.config.site_url {
        let href = format!("{}/{}", site_url.trim_end_matches('/'), ctx.output_path);
        out.push_str("<link rel=\"canonical\" href=\"");
        out.push_str(&escape_html(&href));
        out.push_str("\">\n");
    }
    out.push_str("<title>");
    out.push_str(&escape_html(ctx.title));
    if ctx.title != ctx.config.site_name {
        out.push_str(" - ");
        out.push_str(&escape_html(&ctx.config.site_name));
    }
    out.push_str("</title>\n");
    stylesheet_link(&mut out, SITE_CSS_PATH, ctx.output_path);
    for css in &ctx.config.extra_css {
        stylesheet_link(&mut out, css, ctx.output_path);
    }
    out.push_str("</head>\n<body class=\"theme-");
    out.push_str(&escape_html(&ctx.config.theme));
    out.push_str("\">\n");

    out.push_str("<header class=\"site-header\"><a class=\"site-name\" href=\"");
    out.push_str(&escape_html(&relative_path(ctx.output_path, "index.html")));
    out.push_str("\">");
    out.push_str(&escape_html(&ctx.config.site_name));
    out.push_str("</a></header>\n");

    out.push_str("<div class=\"layout\">\n");
    out.push_str("<nav class=\"sidebar\">\n");
    nav_list(&mut out, ctx.nodes, ctx);
    out.push_str("</nav>\n");

    out.push_str("<main class=\"content\">\n");
    out.push_str(ctx.body);
    out.push_str("</main>\n");

    if ctx.toc_enabled && !ctx.toc.is_empty() {
        out.push_str("<aside class=\"toc\">\n<ul>\n");
        for entry in ctx.toc {
            out.push_str(&format!(
                "<li class=\"toc-level-{}\"><a href=\"#{}\">{}</a></li>\n",
                entry.level,
                entry.id,
                escape_html(&entry.title)
            ));
        }
        out.push_str("</ul>\n</aside>\n");
    }

    out.push_str("</div>\n</body>\n</html>\n");
    out
}

/// Body of a generated section index page: the section heading and a list
/// of links to its direct children.
pub(crate) fn section_index_body(
    title: &str,
    index_path: &str,
    children: &[PlanNode],
    leaves: &[Leaf],
) -> String {
    let mut out = String::new();
    out.push_str("<h1>");
    out.push_str(&escape_html(title));
    out.push_str("</h1>\n<ul class=\"section-index\">\n");
    for child in children {
        let (child_title, child_path) = match child {
            PlanNode::Page(index) => {
                let leaf = &leaves[*index];
                (leaf.title.as_str(), leaf.output_path.as_str())
            }
            PlanNode::Section {
                title, index_path, ..
            } => (title.as_str(), index_path.as_str()),
        };
        out.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            escape_html(&relative_path(index_path, child_path)),
            escape_html(child_title)
        ));
    }
    out.push_str("</ul>\n");
    out
}

fn stylesheet_link(out: &mut String, css_path: &str, output_path: &str) {
    let href = if css_path.starts_with("http://") || css_path.starts_with("https://") {
        css_path.to_owned()
    } else {
        relative_path(output_path, css_path)
    };
    out.push_str("<link rel=\"stylesheet\" href=\"");
    out.push_str(&escape_html(&href));
    out.push_str("\">\n");
}

fn nav_list(out: &mut String, nodes: &[PlanNode], ctx: &PageContext<'_>) {
    out.push_str("<ul>\n");
    for node in nodes {
        match node {
            PlanNode::Page(index) => {
                let leaf = &ctx.leaves[*index];
                nav_link(out, &leaf.title, &leaf.output_path, ctx);
                out.push_str("</li>\n");
            }
            PlanNode::Section {
                title,
                index_path,
                children,
            } => {
                nav_link(out, title, index_path, ctx);
                out.push('\n');
                nav_list(out, children, ctx);
                out.push_str("</li>\n");
            }
        }
    }
    out.push_str("</ul>\n");
}

fn nav_link(out: &mut String, title: &str, target: &str, ctx: &PageContext<'_>) {
    if target == ctx.output_path {
        out.push_str("<li class=\"active\">");
    } else {
        out.push_str("<li>");
    }
    out.push_str("<a href=\"");
    out.push_str(&escape_html(&relative_path(ctx.output_path, target)));
    out.push_str("\">");
    out.push_str(&escape_html(title));
    out.push_str("</a>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn config() -> Config {
        Config::from_yaml(
            "site_name: Ops Wiki\nsite_description: Runbooks\ntheme: slate\n",
            Path::new("/project"),
        )
        .unwrap()
    }

    fn leaf(title: &str, output: &str) -> Leaf {
        Leaf {
            title: title.to_owned(),
            source_path: output.replace(".html", ".md"),
            output_path: output.to_owned(),
        }
    }

    #[test]
    fn test_shell_carries_metadata_and_theme() {
        let config = config();
        let leaves = vec![leaf("Home", "index.html")];
        let html = render_page(&PageContext {
            config: &config,
            title: "Home",
            body: "<p>hi</p>",
            output_path: "index.html",
            toc: &[],
            toc_enabled: true,
            nodes: &[PlanNode::Page(0)],
            leaves: &leaves,
        });
        assert!(html.contains("<meta name=\"description\" content=\"Runbooks\">"));
        assert!(html.contains("<body class=\"theme-slate\">"));
        assert!(html.contains("<title>Home - Ops Wiki</title>"));
    }

    #[test]
    fn test_nav_links_relative_from_nested_page() {
        let config = config();
        let leaves = vec![leaf("Home", "index.html"), leaf("Pods", "k8s/pods.html")];
        let html = render_page(&PageContext {
            config: &config,
            title: "Pods",
            body: "",
            output_path: "k8s/pods.html",
            toc: &[],
            toc_enabled: false,
            nodes: &[PlanNode::Page(0), PlanNode::Page(1)],
            leaves: &leaves,
        });
        assert!(html.contains("href=\"../index.html\""));
        assert!(html.contains("<li class=\"active\"><a href=\"pods.html\">Pods</a>"));
        assert!(html.contains("href=\"../stela.css\""));
    }

    #[test]
    fn test_toc_column_rendered_when_enabled() {
        let config = config();
        let leaves = vec![leaf("Home", "index.html")];
        let toc = vec![TocEntry {
            level: 2,
            title: "Setup".to_owned(),
            id: "setup".to_owned(),
        }];
        let html = render_page(&PageContext {
            config: &config,
            title: "Home",
            body: "",
            output_path: "index.html",
            toc: &toc,
            toc_enabled: true,
            nodes: &[PlanNode::Page(0)],
            leaves: &leaves,
        });
        assert!(html.contains("<aside class=\"toc\">"));
        assert!(html.contains("<a href=\"#setup\">Setup</a>"));
    }

    #[test]
    fn test_canonical_link_from_site_url() {
        let mut config = config();
        config.site_url = Some("https://wiki.example.com/".to_owned());
        let leaves = vec![leaf("Pods", "k8s/pods.html")];
        let html = render_page(&PageContext {
            config: &config,
            title: "Pods",
            body: "",
            output_path: "k8s/pods.html",
            toc: &[],
            toc_enabled: false,
            nodes: &[PlanNode::Page(0)],
            leaves: &leaves,
        });
        assert!(html.contains(
            "<link rel=\"canonical\" href=\"https://wiki.example.com/k8s/pods.html\">"
        ));
    }

    #[test]
    fn test_remote_extra_css_left_absolute() {
        let mut config = config();
        config.extra_css = vec!["https://cdn.example.com/x.css".to_owned()];
        let leaves = vec![leaf("Home", "index.html")];
        let html = render_page(&PageContext {
            config: &config,
            title: "Home",
            body: "",
            output_path: "index.html",
            toc: &[],
            toc_enabled: false,
            nodes: &[PlanNode::Page(0)],
            leaves: &leaves,
        });
        assert!(html.contains("href=\"https://cdn.example.com/x.css\""));
    }

    #[test]
    fn test_section_index_body_links_children() {
        let leaves = vec![leaf("Cobra", "tools/cobra.html")];
        let body = section_index_body(
            "Tools",
            "tools-section/index.html",
            &[PlanNode::Page(0)],
            &leaves,
        );
        assert!(body.contains("<h1>Tools</h1>"));
        assert!(body.contains("<a href=\"../tools/cobra.html\">Cobra</a>"));
    }
}
