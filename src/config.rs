//! Loader and search configuration, read from TOML.
//!
//! ```toml
//! parent_indexing = "one-based"
//! export_name = "searchIndex"
//!
//! [search]
//! default_limit = 10
//! suggestion_threshold = 0.8
//! ```

use crate::error::ConfigError;
use crate::payload::SCRIPT_BINDING;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How a non-zero `i` value addresses the `p` table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParentIndexing {
    /// `p[i]`; entry 0 is a placeholder that `i` never selects.
    #[default]
    Direct,
    /// `p[i - 1]`, the layout rustdoc's own search script reads.
    OneBased,
}

impl ParentIndexing {
    /// Maps a non-zero parent reference to a position in `p`.
    pub(crate) fn slot(self, parent: usize) -> usize {
        match self {
            Self::Direct => parent,
            Self::OneBased => parent - 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Results returned when the caller gives no limit.
    pub default_limit: usize,
    /// Minimum Jaro-Winkler similarity for a "did you mean" suggestion.
    pub suggestion_threshold: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            suggestion_threshold: 0.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub parent_indexing: ParentIndexing,
    /// Name the table is exported under for module-aware hosts.
    pub export_name: String,
    pub search: SearchConfig,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            parent_indexing: ParentIndexing::default(),
            export_name: SCRIPT_BINDING.to_string(),
            search: SearchConfig::default(),
        }
    }
}

impl LoaderConfig {
    /// Reads a config file. Keys that are absent keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads `path` if given, else the default location; a missing default file
    /// yields the defaults.
    pub fn discover(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match default_path() {
            Some(path) if path.is_file() => {
                tracing::debug!("Using config at {}", path.display());
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }
}

/// `<config_dir>/rustdoc-search-index/config.toml`
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("rustdoc-search-index").join("config.toml"))
}
