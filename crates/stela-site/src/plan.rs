//! Build plan: navigation resolved to output paths.
//!
//! The plan mirrors the navigation tree. Leaves keep their source-relative
//! location with the extension swapped (`k8s/pods.md` -> `k8s/pods.html`);
//! a section titled `T` gets a generated index page at
//! `<parent>/<slug(T)>/index.html`.

use stela_config::NavNode;
use stela_renderer::slugify;

/// One navigation leaf with its resolved output location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Leaf {
    /// Navigation title.
    pub(crate) title: String,
    /// Source path relative to the docs directory.
    pub(crate) source_path: String,
    /// Output path relative to the site directory.
    pub(crate) output_path: String,
}

/// Plan node mirroring the navigation tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PlanNode {
    /// Index into [`Plan::leaves`].
    Page(usize),
    /// Internal node with a generated index page.
    Section {
        title: String,
        /// Index page path relative to the site directory.
        index_path: String,
        children: Vec<PlanNode>,
    },
}

/// Resolved build plan.
#[derive(Debug)]
pub(crate) struct Plan {
    pub(crate) nodes: Vec<PlanNode>,
    /// All leaves in navigation order.
    pub(crate) leaves: Vec<Leaf>,
}

impl Plan {
    /// Resolve a navigation tree into a build plan.
    pub(crate) fn resolve(nav: &[NavNode]) -> Self {
        let mut leaves = Vec::new();
        let nodes = nav
            .iter()
            .map(|node| plan_node(node, "", &mut leaves))
            .collect();
        Self { nodes, leaves }
    }

    /// All generated section index paths, in navigation order.
    pub(crate) fn section_index_paths(&self) -> Vec<&str> {
        let mut paths = Vec::new();
        collect_indices(&self.nodes, &mut paths);
        paths
    }
}

fn collect_indices<'a>(nodes: &'a [PlanNode], out: &mut Vec<&'a str>) {
    for node in nodes {
        if let PlanNode::Section {
            index_path,
            children,
            ..
        } = node
        {
            out.push(index_path);
            collect_indices(children, out);
        }
    }
}

fn plan_node(node: &NavNode, parent_dir: &str, leaves: &mut Vec<Leaf>) -> PlanNode {
    match node {
        NavNode::Page { title, path } => {
            let output_path = output_path_for(path);
            leaves.push(Leaf {
                title: title.clone(),
                source_path: path.clone(),
                output_path,
            });
            PlanNode::Page(leaves.len() - 1)
        }
        NavNode::Section { title, children } => {
            let slug = section_slug(title);
            let dir = if parent_dir.is_empty() {
                slug
            } else {
                format!("{parent_dir}/{slug}")
            };
            let children = children
                .iter()
                .map(|child| plan_node(child, &dir, leaves))
                .collect();
            PlanNode::Section {
                title: title.clone(),
                index_path: format!("{dir}/index.html"),
                children,
            }
        }
    }
}

/// Directory slug for a section title.
///
/// A title with no alphanumeric characters slugifies to the empty string,
/// which would put the index at the output root (or, joined as a path,
/// outside it). Such sections fall back to a fixed slug.
fn section_slug(title: &str) -> String {
    let slug = slugify(title);
    if slug.is_empty() {
        "section".to_owned()
    } else {
        slug
    }
}

/// Map a source path to its output path.
fn output_path_for(source: &str) -> String {
    source.strip_suffix(".md").map_or_else(
        || format!("{source}.html"),
        |stem| format!("{stem}.html"),
    )
}
