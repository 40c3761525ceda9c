//! Site assembly for stela.
//!
//! [`SiteBuilder`] turns a loaded configuration into a static output
//! tree: it resolves the navigation into a build plan, loads and renders
//! every referenced document, generates section index pages, copies
//! static assets, and swaps the finished tree into place.
//!
//! The build is all-or-nothing: every document is rendered in memory
//! before a single output file is written, and files are written to a
//! staging directory that replaces the previous output in one rename.

mod assembler;
mod nav_derive;
mod plan;
mod template;
mod util;

use std::path::PathBuf;

use stela_config::ConfigError;
use stela_content::ContentError;
use stela_renderer::UnknownExtension;

pub use assembler::{BuildReport, SiteBuilder};
pub use nav_derive::derive_nav;
pub use util::relative_path;

/// Error returned when a site build fails.
///
/// Any fatal error aborts the build before output is committed.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Configuration error.
    #[error("{0}")]
    Config(#[from] ConfigError),
    /// Document loading error.
    #[error("{0}")]
    Content(#[from] ContentError),
    /// Extension name outside the recognized set.
    #[error("{0}")]
    Extensions(#[from] UnknownExtension),
    /// Navigation leaf references a missing document.
    #[error("Broken navigation link: '{title}' references {path} which does not exist")]
    BrokenLink {
        /// Navigation title of the offending leaf.
        title: String,
        /// Referenced source path relative to the docs directory.
        path: String,
    },
    /// I/O error while scanning input.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Failure while writing or swapping the staged output tree.
    #[error("Failed to write output to {}: {message}", .staging_dir.display())]
    Staging {
        /// Staging directory that was being written.
        staging_dir: PathBuf,
        /// Underlying failure.
        message: String,
    },
}
