//! Build pipeline.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use stela_config::{Config, ConfigError, NavNode};
use stela_content::ContentLoader;
use stela_renderer::{Extensions, HtmlRenderer, TocEntry};

use crate::BuildError;
use crate::nav_derive::derive_nav;
use crate::plan::{Leaf, Plan, PlanNode};
use crate::template::{self, PageContext, SITE_CSS, SITE_CSS_PATH};

/// Summary of a completed build.
#[derive(Debug)]
pub struct BuildReport {
    /// Documents rendered from markdown sources.
    pub pages: usize,
    /// Generated section index pages.
    pub indexes: usize,
    /// Static assets copied from the docs directory.
    pub assets: usize,
    /// Non-fatal markup warnings, prefixed with the source path.
    pub warnings: Vec<String>,
    /// Final output directory.
    pub site_dir: PathBuf,
}

/// One fully rendered document, held in memory until the write phase.
struct RenderedPage {
    title: String,
    html: String,
    toc: Vec<TocEntry>,
}

/// Builds the static site described by a loaded [`Config`].
pub struct SiteBuilder {
    config: Config,
}

impl SiteBuilder {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run a full build.
    ///
    /// Every document is loaded and rendered before anything is written;
    /// output lands in a staging directory that replaces the previous
    /// site directory in one rename. On error the previous output is
    /// left untouched.
    ///
    /// # Errors
    ///
    /// Returns error on unknown extensions, broken navigation links,
    /// unreadable or malformed documents, or output I/O failure.
    pub fn build(&self) -> Result<BuildReport, BuildError> {
        let extensions = Extensions::from_names(&self.config.extensions)?;
        let loader = ContentLoader::new(&self.config.paths.docs_dir);

        let nav = self.navigation()?;
        let plan = Plan::resolve(&nav);
        tracing::debug!(pages = plan.leaves.len(), "resolved build plan");

        self.check_links(&plan, &loader)?;

        let mut warnings = Vec::new();
        let rendered = render_all(&plan.leaves, &loader, extensions, &mut warnings)?;
        for warning in &warnings {
            tracing::warn!("{warning}");
        }

        let staging_dir = self.config.paths.staging_dir();
        if staging_dir.exists() {
            fs::remove_dir_all(&staging_dir)?;
        }
        let written = self
            .write_site(&staging_dir, &plan, &rendered, extensions.toc)
            .and_then(|indexes| {
                let assets = copy_assets(&self.config.paths.docs_dir, &staging_dir)?;
                Ok((indexes, assets))
            });
        let (indexes, assets) = match written {
            Ok(counts) => counts,
            Err(err) => {
                // Never leave a partial staging tree behind.
                let _ = fs::remove_dir_all(&staging_dir);
                return Err(err);
            }
        };

        self.swap_into_place(&staging_dir)?;
        tracing::info!(
            pages = rendered.len(),
            indexes,
            assets,
            site_dir = %self.config.paths.site_dir.display(),
            "site build complete"
        );

        Ok(BuildReport {
            pages: rendered.len(),
            indexes,
            assets,
            warnings,
            site_dir: self.config.paths.site_dir.clone(),
        })
    }

    /// Configured navigation, or one derived from the docs tree.
    fn navigation(&self) -> Result<Vec<NavNode>, BuildError> {
        let nav = match &self.config.nav_nodes {
            Some(nodes) => nodes.clone(),
            None => derive_nav(&self.config.paths.docs_dir)?,
        };
        if nav.is_empty() {
            return Err(BuildError::Config(ConfigError::Validation(format!(
                "no markdown files found under {}",
                self.config.paths.docs_dir.display()
            ))));
        }
        Ok(nav)
    }

    /// Verify every navigation leaf before rendering anything.
    fn check_links(&self, plan: &Plan, loader: &ContentLoader) -> Result<(), BuildError> {
        let mut first: Option<&Leaf> = None;
        for leaf in &plan.leaves {
            if !loader.exists(&leaf.source_path) {
                tracing::error!(
                    title = %leaf.title,
                    path = %leaf.source_path,
                    "broken navigation link"
                );
                first.get_or_insert(leaf);
            }
        }
        match first {
            Some(leaf) => Err(BuildError::BrokenLink {
                title: leaf.title.clone(),
                path: leaf.source_path.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Write all pages and section indexes under `root`.
    fn write_site(
        &self,
        root: &Path,
        plan: &Plan,
        rendered: &[RenderedPage],
        toc_enabled: bool,
    ) -> Result<usize, BuildError> {
        fs::create_dir_all(root)?;
        write_file(root, SITE_CSS_PATH, SITE_CSS)?;

        for (leaf, page) in plan.leaves.iter().zip(rendered) {
            let html = template::render_page(&PageContext {
                config: &self.config,
                title: &page.title,
                body: &page.html,
                output_path: &leaf.output_path,
                toc: &page.toc,
                toc_enabled,
                nodes: &plan.nodes,
                leaves: &plan.leaves,
            });
            write_file(root, &leaf.output_path, &html)?;
        }

        // A section index is skipped when a navigation leaf already owns
        // that output path.
        let taken: HashSet<&str> = plan
            .leaves
            .iter()
            .map(|leaf| leaf.output_path.as_str())
            .collect();
        let mut indexes = 0;
        self.write_indexes(root, &plan.nodes, plan, &taken, toc_enabled, &mut indexes)?;
        Ok(indexes)
    }

    fn write_indexes(
        &self,
        root: &Path,
        nodes: &[PlanNode],
        plan: &Plan,
        taken: &HashSet<&str>,
        toc_enabled: bool,
        indexes: &mut usize,
    ) -> Result<(), BuildError> {
        for node in nodes {
            let PlanNode::Section {
                title,
                index_path,
                children,
            } = node
            else {
                continue;
            };
            if taken.contains(index_path.as_str()) {
                tracing::warn!(
                    path = %index_path,
                    "section index skipped, a page already owns this path"
                );
            } else {
                let body = template::section_index_body(title, index_path, children, &plan.leaves);
                let html = template::render_page(&PageContext {
                    config: &self.config,
                    title,
                    body: &body,
                    output_path: index_path,
                    toc: &[],
                    toc_enabled,
                    nodes: &plan.nodes,
                    leaves: &plan.leaves,
                });
                write_file(root, index_path, &html)?;
                *indexes += 1;
            }
            self.write_indexes(root, children, plan, taken, toc_enabled, indexes)?;
        }
        Ok(())
    }

    /// Replace the previous output directory with the staged tree.
    fn swap_into_place(&self, staging_dir: &Path) -> Result<(), BuildError> {
        let site_dir = &self.config.paths.site_dir;
        if site_dir.exists() {
            fs::remove_dir_all(site_dir).map_err(|err| BuildError::Staging {
                staging_dir: staging_dir.to_path_buf(),
                message: format!("cannot remove previous output: {err}"),
            })?;
        }
        fs::rename(staging_dir, site_dir).map_err(|err| BuildError::Staging {
            staging_dir: staging_dir.to_path_buf(),
            message: err.to_string(),
        })
    }
}

/// Load and render every leaf in parallel, in plan order.
fn render_all(
    leaves: &[Leaf],
    loader: &ContentLoader,
    extensions: Extensions,
    warnings: &mut Vec<String>,
) -> Result<Vec<RenderedPage>, BuildError> {
    let results: Vec<(RenderedPage, Vec<String>)> = leaves
        .par_iter()
        .map(|leaf| -> Result<_, BuildError> {
            let document = loader.load(&leaf.source_path)?;
            let mut renderer = HtmlRenderer::new(extensions).with_title_extraction();
            let result = renderer.render_markdown(&document.body);
            let title = document
                .meta_title()
                .map(str::to_owned)
                .or(result.title)
                .unwrap_or_else(|| leaf.title.clone());
            let page_warnings = result
                .warnings
                .into_iter()
                .map(|w| format!("{}: {w}", leaf.source_path))
                .collect();
            Ok((
                RenderedPage {
                    title,
                    html: result.html,
                    toc: result.toc,
                },
                page_warnings,
            ))
        })
        .collect::<Result<_, _>>()?;

    let mut rendered = Vec::with_capacity(results.len());
    for (page, page_warnings) in results {
        warnings.extend(page_warnings);
        rendered.push(page);
    }
    Ok(rendered)
}

/// Write one output file, creating parent directories as needed.
fn write_file(root: &Path, rel_path: &str, content: &str) -> Result<(), BuildError> {
    let path = root.join(rel_path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, content)?;
    Ok(())
}

/// Copy non-markdown files from the docs tree into the output tree.
///
/// Hidden entries are skipped. Entries are visited in sorted order so
/// repeated builds touch files in a stable sequence.
fn copy_assets(docs_dir: &Path, out_dir: &Path) -> Result<usize, BuildError> {
    let mut copied = 0;
    copy_assets_dir(docs_dir, out_dir, &mut copied)?;
    Ok(copied)
}

fn copy_assets_dir(src: &Path, dst: &Path, copied: &mut usize) -> Result<(), BuildError> {
    let mut entries: Vec<_> = fs::read_dir(src)?.collect::<io::Result<_>>()?;
    entries.sort_by_key(std::fs::DirEntry::file_name);
    for entry in entries {
        let name = entry.file_name();
        let Some(name_str) = name.to_str() else {
            continue;
        };
        if name_str.starts_with('.') {
            continue;
        }
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            copy_assets_dir(&entry.path(), &dst.join(&name), copied)?;
        } else if !name_str.ends_with(".md") {
            fs::create_dir_all(dst)?;
            fs::copy(entry.path(), dst.join(&name))?;
            *copied += 1;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn write_doc(root: &Path, rel: &str, content: &str) {
        let path = root.join("docs").join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn builder(root: &Path, yaml: &str) -> SiteBuilder {
        let config = Config::from_yaml(yaml, root).unwrap();
        SiteBuilder::new(config)
    }

    #[test]
    fn test_build_writes_pages_and_stylesheet() {
        let dir = TempDir::new().unwrap();
        write_doc(dir.path(), "index.md", "# Welcome\n\nHello.\n");
        write_doc(dir.path(), "about.md", "# About\n");

        let report = builder(dir.path(), "site_name: Wiki\n").build().unwrap();
        assert_eq!(report.pages, 2);
        assert_eq!(report.indexes, 0);

        let site = dir.path().join("site");
        let index = fs::read_to_string(site.join("index.html")).unwrap();
        assert!(index.contains("<h1 id=\"welcome\">Welcome</h1>"));
        assert!(index.contains("<title>Welcome - Wiki</title>"));
        assert!(site.join("about.html").is_file());
        assert!(site.join("stela.css").is_file());
        assert!(!dir.path().join("site.staging").exists());
    }

    #[test]
    fn test_explicit_nav_and_section_index() {
        let dir = TempDir::new().unwrap();
        write_doc(dir.path(), "index.md", "# Home\n");
        write_doc(dir.path(), "k8s/pods.md", "# Pods\n");
        let yaml = "
site_name: Wiki
nav:
  - Home: index.md
  - Kubernetes:
      - Pods: k8s/pods.md
";
        let report = builder(dir.path(), yaml).build().unwrap();
        assert_eq!(report.indexes, 1);

        let site = dir.path().join("site");
        let index = fs::read_to_string(site.join("kubernetes/index.html")).unwrap();
        assert!(index.contains("<h1>Kubernetes</h1>"));
        assert!(index.contains("<a href=\"../k8s/pods.html\">Pods</a>"));
    }

    #[test]
    fn test_broken_link_leaves_previous_output_intact() {
        let dir = TempDir::new().unwrap();
        write_doc(dir.path(), "index.md", "# Home\n");
        let site = dir.path().join("site");
        fs::create_dir_all(&site).unwrap();
        fs::write(site.join("previous.html"), "old").unwrap();

        let yaml = "
site_name: Wiki
nav:
  - Home: index.md
  - Missing: missing.md
";
        let err = builder(dir.path(), yaml).build().unwrap_err();
        match err {
            BuildError::BrokenLink { title, path } => {
                assert_eq!(title, "Missing");
                assert_eq!(path, "missing.md");
            }
            other => panic!("expected broken link error, got {other}"),
        }
        assert!(site.join("previous.html").is_file());
        assert!(!dir.path().join("site.staging").exists());
    }

    #[test]
    fn test_rebuild_removes_stale_output() {
        let dir = TempDir::new().unwrap();
        write_doc(dir.path(), "index.md", "# Home\n");

        let builder = builder(dir.path(), "site_name: Wiki\n");
        builder.build().unwrap();
        let stale = dir.path().join("site/stale.html");
        fs::write(&stale, "stale").unwrap();

        builder.build().unwrap();
        assert!(!stale.exists());
        assert!(dir.path().join("site/index.html").is_file());
    }

    fn snapshot(root: &Path) -> std::collections::BTreeMap<PathBuf, Vec<u8>> {
        fn walk(dir: &Path, root: &Path, out: &mut std::collections::BTreeMap<PathBuf, Vec<u8>>) {
            for entry in fs::read_dir(dir).unwrap() {
                let path = entry.unwrap().path();
                if path.is_dir() {
                    walk(&path, root, out);
                } else {
                    let rel = path.strip_prefix(root).unwrap().to_path_buf();
                    out.insert(rel, fs::read(&path).unwrap());
                }
            }
        }
        let mut out = std::collections::BTreeMap::new();
        walk(root, root, &mut out);
        out
    }

    #[test]
    fn test_rebuild_is_byte_identical() {
        let dir = TempDir::new().unwrap();
        write_doc(dir.path(), "index.md", "# Home\n\n## Setup\n");
        write_doc(dir.path(), "k8s/pods.md", "# Pods\n");
        fs::write(dir.path().join("docs/logo.png"), b"png").unwrap();
        let yaml = "
site_name: Wiki
nav:
  - Home: index.md
  - Kubernetes:
      - Pods: k8s/pods.md
";
        let builder = builder(dir.path(), yaml);
        builder.build().unwrap();
        let first = snapshot(&dir.path().join("site"));
        builder.build().unwrap();
        let second = snapshot(&dir.path().join("site"));
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn test_assets_copied_preserving_layout() {
        let dir = TempDir::new().unwrap();
        write_doc(dir.path(), "index.md", "# Home\n");
        let img = dir.path().join("docs/img");
        fs::create_dir_all(&img).unwrap();
        fs::write(img.join("logo.png"), b"png").unwrap();
        fs::write(dir.path().join("docs/.hidden"), b"x").unwrap();

        let report = builder(dir.path(), "site_name: Wiki\n").build().unwrap();
        assert_eq!(report.assets, 1);
        assert!(dir.path().join("site/img/logo.png").is_file());
        assert!(!dir.path().join("site/.hidden").exists());
    }

    #[test]
    fn test_front_matter_title_wins_over_heading() {
        let dir = TempDir::new().unwrap();
        write_doc(
            dir.path(),
            "index.md",
            "---\ntitle: Front Matter Title\n---\n# Heading Title\n",
        );

        builder(dir.path(), "site_name: Wiki\n").build().unwrap();
        let html = fs::read_to_string(dir.path().join("site/index.html")).unwrap();
        assert!(html.contains("<title>Front Matter Title - Wiki</title>"));
    }

    #[test]
    fn test_markup_warning_does_not_fail_build() {
        let dir = TempDir::new().unwrap();
        write_doc(
            dir.path(),
            "index.md",
            "# Home\n\n!!! bogus\n    Body text.\n",
        );
        let yaml = "
site_name: Wiki
markdown_extensions:
  - admonition
";
        let report = builder(dir.path(), yaml).build().unwrap();
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].starts_with("index.md:"));
        let html = fs::read_to_string(dir.path().join("site/index.html")).unwrap();
        assert!(html.contains("class=\"admonition note\""));
    }

    #[test]
    fn test_section_index_skipped_when_page_owns_path() {
        let dir = TempDir::new().unwrap();
        write_doc(dir.path(), "tools/index.md", "# Tools Overview\n");
        write_doc(dir.path(), "tools/cobra.md", "# Cobra\n");
        let yaml = "
site_name: Wiki
nav:
  - Tools:
      - Overview: tools/index.md
      - Cobra: tools/cobra.md
";
        let report = builder(dir.path(), yaml).build().unwrap();
        assert_eq!(report.indexes, 0);
        let html = fs::read_to_string(dir.path().join("site/tools/index.html")).unwrap();
        assert!(html.contains("Tools Overview"));
    }

    #[test]
    fn test_empty_docs_tree_rejected() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("docs")).unwrap();

        let err = builder(dir.path(), "site_name: Wiki\n").build().unwrap_err();
        assert!(matches!(err, BuildError::Config(ConfigError::Validation(_))));
    }

    #[test]
    fn test_toc_rendered_for_default_extensions() {
        let dir = TempDir::new().unwrap();
        write_doc(
            dir.path(),
            "index.md",
            "# Home\n\n## Setup\n\ntext\n\n## Usage\n",
        );

        builder(dir.path(), "site_name: Wiki\n").build().unwrap();
        let html = fs::read_to_string(dir.path().join("site/index.html")).unwrap();
        assert!(html.contains("<aside class=\"toc\">"));
        assert!(html.contains("<a href=\"#setup\">Setup</a>"));
        assert!(html.contains("<a href=\"#usage\">Usage</a>"));
    }
}
