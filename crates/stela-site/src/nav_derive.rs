//! Default navigation derived from the docs tree.
//!
//! Used when the configuration carries no `nav` key: every Markdown file
//! under the docs directory becomes a page, subdirectories become sections.
//! Entries are sorted by file name, except `index.md` which always leads
//! its level. Hidden entries (leading dot) and directories without any
//! Markdown content are skipped.

use std::fs;
use std::io;
use std::path::Path;

use stela_config::{NavNode, title_from_path};

/// Walk `docs_dir` and derive a navigation tree from its layout.
pub fn derive_nav(docs_dir: &Path) -> io::Result<Vec<NavNode>> {
    walk(docs_dir, "")
}

fn walk(dir: &Path, prefix: &str) -> io::Result<Vec<NavNode>> {
    let mut files = Vec::new();
    let mut subdirs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str().map(str::to_owned) else {
            continue;
        };
        if name.starts_with('.') {
            continue;
        }
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            subdirs.push(name);
        } else if name.ends_with(".md") {
            files.push(name);
        }
    }
    files.sort_unstable();
    subdirs.sort_unstable();

    // index.md leads its level.
    if let Some(pos) = files.iter().position(|name| name == "index.md") {
        let index = files.remove(pos);
        files.insert(0, index);
    }

    let mut nodes = Vec::new();
    for name in files {
        let path = join(prefix, &name);
        let title = if prefix.is_empty() && name == "index.md" {
            "Home".to_owned()
        } else {
            title_from_path(&path)
        };
        nodes.push(NavNode::Page { title, path });
    }
    for name in subdirs {
        let children = walk(&dir.join(&name), &join(prefix, &name))?;
        if children.is_empty() {
            continue;
        }
        nodes.push(NavNode::Section {
            title: title_from_path(&name),
            children,
        });
    }
    Ok(nodes)
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_owned()
    } else {
        format!("{prefix}/{name}")
    }
}
