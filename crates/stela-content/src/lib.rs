//! Document loading and front matter parsing for stela.
//!
//! A [`Document`] is one markdown source file with an optional leading
//! front matter block and a markdown body. Documents are immutable after
//! load; the loader is a pure function of the file system at call time.

mod frontmatter;

use std::path::{Path, PathBuf};

pub use frontmatter::FrontMatter;

/// One content unit: optional metadata plus a markdown body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Source path relative to the docs directory.
    pub source_path: PathBuf,
    /// Parsed front matter, if a block was present.
    pub front_matter: Option<FrontMatter>,
    /// Markdown body with the front matter block stripped.
    pub body: String,
}

impl Document {
    /// Page title from front matter, if set there.
    #[must_use]
    pub fn meta_title(&self) -> Option<&str> {
        self.front_matter.as_ref().and_then(|fm| fm.title.as_deref())
    }
}

/// Error type for content loading.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// Referenced file does not exist.
    #[error("Content file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// Front matter block present but malformed.
    #[error("Invalid front matter in {}: {message}", .path.display())]
    FrontMatter {
        /// Source path relative to the docs directory.
        path: PathBuf,
        /// Parser message.
        message: String,
    },
    /// Path escapes the docs directory.
    #[error("Path escapes docs directory: {}", .0.display())]
    OutsideRoot(PathBuf),
    /// I/O error reading the file.
    #[error("I/O error reading {}: {source}", .path.display())]
    Io {
        /// Source path relative to the docs directory.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// Loads documents from a docs directory.
///
/// Paths handed to [`load`](Self::load) are relative to the root given at
/// construction. Absolute paths and `..` components are rejected.
#[derive(Debug, Clone)]
pub struct ContentLoader {
    docs_dir: PathBuf,
}

impl ContentLoader {
    /// Create a loader rooted at `docs_dir`.
    #[must_use]
    pub fn new(docs_dir: impl Into<PathBuf>) -> Self {
        Self {
            docs_dir: docs_dir.into(),
        }
    }

    /// Root directory this loader reads from.
    #[must_use]
    pub fn docs_dir(&self) -> &Path {
        &self.docs_dir
    }

    /// Whether a relative source path exists under the docs directory.
    #[must_use]
    pub fn exists(&self, rel_path: &str) -> bool {
        self.resolve(rel_path)
            .is_ok_and(|abs| abs.is_file())
    }

    /// Load one document by its path relative to the docs directory.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::NotFound` if the file does not exist,
    /// `ContentError::FrontMatter` if a metadata block is present but
    /// malformed, and `ContentError::Io` for other read failures.
    pub fn load(&self, rel_path: &str) -> Result<Document, ContentError> {
        let abs = self.resolve(rel_path)?;
        if !abs.is_file() {
            return Err(ContentError::NotFound(PathBuf::from(rel_path)));
        }

        let text = std::fs::read_to_string(&abs).map_err(|source| ContentError::Io {
            path: PathBuf::from(rel_path),
            source,
        })?;

        let (front_matter, body) =
            frontmatter::split(&text).map_err(|message| ContentError::FrontMatter {
                path: PathBuf::from(rel_path),
                message,
            })?;

        Ok(Document {
            source_path: PathBuf::from(rel_path),
            front_matter,
            body: body.to_owned(),
        })
    }

    /// Resolve a relative source path against the docs root.
    fn resolve(&self, rel_path: &str) -> Result<PathBuf, ContentError> {
        let rel = Path::new(rel_path);
        if rel.is_absolute()
            || rel
                .components()
                .any(|c| matches!(c, std::path::Component::ParentDir))
        {
            return Err(ContentError::OutsideRoot(rel.to_path_buf()));
        }
        Ok(self.docs_dir.join(rel))
    }
}
