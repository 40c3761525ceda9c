//! Markdown extension selection.

use pulldown_cmark::Options;

/// Enabled markdown extensions.
///
/// The default set matches a plain wiki page: tables and table-of-contents
/// collection, nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extensions {
    /// GFM tables.
    pub tables: bool,
    /// `~~strikethrough~~`.
    pub strikethrough: bool,
    /// `- [ ]` task lists rendered as disabled checkboxes.
    pub tasklists: bool,
    /// `:shortcode:` emoji substitution.
    pub emoji: bool,
    /// `!!! kind "Title"` blocks and `> [!NOTE]` alert blockquotes.
    pub admonition: bool,
    /// Render the on-page table of contents column.
    ///
    /// TOC entries are always collected; this flag controls page layout.
    pub toc: bool,
}

impl Default for Extensions {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: false,
            tasklists: false,
            emoji: false,
            admonition: false,
            toc: true,
        }
    }
}

/// Extension name not in the recognized set.
#[derive(Debug, thiserror::Error)]
#[error("unknown markdown extension '{0}'")]
pub struct UnknownExtension(pub String);

impl Extensions {
    /// All extensions enabled.
    #[must_use]
    pub fn all() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            tasklists: true,
            emoji: true,
            admonition: true,
            toc: true,
        }
    }

    /// Build an extension set from configured names.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownExtension`] for a name outside the recognized set.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, UnknownExtension> {
        let mut ext = Self {
            tables: false,
            strikethrough: false,
            tasklists: false,
            emoji: false,
            admonition: false,
            toc: false,
        };
        for name in names {
            match name.as_ref() {
                "tables" => ext.tables = true,
                "strikethrough" => ext.strikethrough = true,
                "tasklists" => ext.tasklists = true,
                "emoji" => ext.emoji = true,
                "admonition" => ext.admonition = true,
                "toc" => ext.toc = true,
                other => return Err(UnknownExtension(other.to_owned())),
            }
        }
        Ok(ext)
    }

    /// Parser options for the enabled extensions.
    ///
    /// `ENABLE_GFM` carries the alert blockquote kinds used by the
    /// admonition extension.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        let mut options = Options::empty();
        if self.tables {
            options |= Options::ENABLE_TABLES;
        }
        if self.strikethrough {
            options |= Options::ENABLE_STRIKETHROUGH;
        }
        if self.tasklists {
            options |= Options::ENABLE_TASKLISTS;
        }
        if self.admonition {
            options |= Options::ENABLE_GFM;
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_set() {
        let ext = Extensions::default();
        assert!(ext.tables);
        assert!(ext.toc);
        assert!(!ext.emoji);
        assert!(!ext.admonition);
    }

    #[test]
    fn test_from_names() {
        let ext = Extensions::from_names(&["emoji", "admonition"]).unwrap();
        assert!(ext.emoji);
        assert!(ext.admonition);
        assert!(!ext.tables);
        assert!(!ext.toc);
    }

    #[test]
    fn test_from_names_unknown() {
        let err = Extensions::from_names(&["tables", "wikilinks"]).unwrap_err();
        assert_eq!(err.0, "wikilinks");
    }

    #[test]
    fn test_parser_options_default() {
        let options = Extensions::default().parser_options();
        assert!(options.contains(Options::ENABLE_TABLES));
        assert!(!options.contains(Options::ENABLE_TASKLISTS));
        assert!(!options.contains(Options::ENABLE_GFM));
    }

    #[test]
    fn test_parser_options_all() {
        let options = Extensions::all().parser_options();
        assert!(options.contains(Options::ENABLE_TABLES));
        assert!(options.contains(Options::ENABLE_STRIKETHROUGH));
        assert!(options.contains(Options::ENABLE_TASKLISTS));
        assert!(options.contains(Options::ENABLE_GFM));
    }
}
