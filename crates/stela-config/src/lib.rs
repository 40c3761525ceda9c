//! Configuration management for stela.
//!
//! Parses `stela.yml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! The navigation tree (`nav`) is parsed into [`NavNode`] values; see the
//! [`nav`] module for the accepted shapes.
//!
//! CLI settings can be applied during load via [`CliSettings`].

pub mod nav;

use serde::Deserialize;
use std::path::{Path, PathBuf};

pub use nav::{NavNode, title_from_path};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "stela.yml";

/// Markdown extension names accepted in `markdown_extensions`.
pub const RECOGNIZED_EXTENSIONS: &[&str] = &[
    "tables",
    "strikethrough",
    "tasklists",
    "emoji",
    "admonition",
    "toc",
];

/// Extension set used when `markdown_extensions` is absent.
pub const DEFAULT_EXTENSIONS: &[&str] = &["tables", "toc"];

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override docs source directory.
    pub docs_dir: Option<PathBuf>,
    /// Override site output directory.
    pub site_dir: Option<PathBuf>,
}

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site name shown in the page header (required, non-empty).
    pub site_name: String,
    /// Site description for the HTML meta tag.
    pub site_description: Option<String>,
    /// Site author for the HTML meta tag.
    pub site_author: Option<String>,
    /// Base URL of the published site.
    pub site_url: Option<String>,
    /// Theme name, emitted as a body class.
    pub theme: String,
    /// Extra stylesheet paths linked from every page.
    pub extra_css: Vec<String>,
    /// Enabled markdown extensions by name.
    markdown_extensions: Option<Vec<String>>,
    /// Docs source directory (relative string from YAML).
    docs_dir: Option<String>,
    /// Site output directory (relative string from YAML).
    site_dir: Option<String>,
    /// Navigation tree as raw YAML; converted during load.
    nav: Option<serde_yaml::Value>,

    /// Resolved paths (set after loading).
    #[serde(skip)]
    pub paths: SitePaths,
    /// Parsed navigation tree (set after loading). `None` means the
    /// assembler derives navigation from the docs directory.
    #[serde(skip)]
    pub nav_nodes: Option<Vec<NavNode>>,
    /// Resolved extension names (set after loading).
    #[serde(skip)]
    pub extensions: Vec<String>,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Resolved input/output directories with absolute paths.
#[derive(Debug, Default, Clone)]
pub struct SitePaths {
    /// Source directory for markdown files.
    pub docs_dir: PathBuf,
    /// Output directory for the generated site.
    pub site_dir: PathBuf,
}

impl SitePaths {
    /// Staging directory used while writing a new output tree.
    #[must_use]
    pub fn staging_dir(&self) -> PathBuf {
        let mut name = self
            .site_dir
            .file_name()
            .map_or_else(|| "site".to_owned(), |n| n.to_string_lossy().into_owned());
        name.push_str(".staging");
        self.site_dir.with_file_name(name)
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    /// Malformed navigation tree.
    #[error("Navigation error: {0}")]
    Nav(String),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `stela.yml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// the nav tree is malformed, or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let path = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            path.to_path_buf()
        } else if let Some(discovered) = Self::discover_config() {
            discovered
        } else {
            return Err(ConfigError::NotFound(PathBuf::from(CONFIG_FILENAME)));
        };

        let mut config = Self::load_from_file(&path)?;

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = serde_yaml::from_str(&content)?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve(config_dir)?;
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Parse raw YAML content (paths resolve against `base`).
    ///
    /// Used by tests and embedding callers that already hold the content.
    ///
    /// # Errors
    ///
    /// Same error conditions as [`Config::load`], minus file lookup.
    pub fn from_yaml(content: &str, base: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yaml::from_str(content)?;
        config.resolve(base)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(docs_dir) = &settings.docs_dir {
            self.paths.docs_dir.clone_from(docs_dir);
        }
        if let Some(site_dir) = &settings.site_dir {
            self.paths.site_dir.clone_from(site_dir);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            site_name: String::new(),
            site_description: None,
            site_author: None,
            site_url: None,
            theme: "slate".to_owned(),
            extra_css: Vec::new(),
            markdown_extensions: None,
            docs_dir: None,
            site_dir: None,
            nav: None,
            paths: SitePaths {
                docs_dir: base.join("docs"),
                site_dir: base.join("site"),
            },
            nav_nodes: None,
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| (*s).to_owned()).collect(),
            config_path: None,
        }
    }

    /// Resolve paths, nav tree and extension list from the raw fields.
    fn resolve(&mut self, config_dir: &Path) -> Result<(), ConfigError> {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.paths = SitePaths {
            docs_dir: resolve(self.docs_dir.as_deref(), "docs"),
            site_dir: resolve(self.site_dir.as_deref(), "site"),
        };

        self.nav_nodes = match self.nav.take() {
            Some(value) => Some(nav::parse_nav(&value)?),
            None => None,
        };

        self.extensions = match self.markdown_extensions.take() {
            Some(names) => names,
            None => DEFAULT_EXTENSIONS.iter().map(|s| (*s).to_owned()).collect(),
        };

        Ok(())
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.site_name, "site_name")?;
        require_non_empty(&self.theme, "theme")?;

        for name in &self.extensions {
            if !RECOGNIZED_EXTENSIONS.contains(&name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "unknown markdown extension '{name}' (recognized: {})",
                    RECOGNIZED_EXTENSIONS.join(", ")
                )));
            }
        }

        for css in &self.extra_css {
            require_non_empty(css, "extra_css entry")?;
        }

        if self.paths.docs_dir == self.paths.site_dir {
            return Err(ConfigError::Validation(
                "docs_dir and site_dir cannot be the same directory".to_owned(),
            ));
        }

        Ok(())
    }

    /// Whether a markdown extension is enabled by name.
    #[must_use]
    pub fn extension_enabled(&self, name: &str) -> bool {
        self.extensions.iter().any(|e| e == name)
    }
}
