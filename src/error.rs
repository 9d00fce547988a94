//! Error handling types and utilities.

use std::path::PathBuf;

/// A specialized Result type for host-side operations.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods by search hosts and the command-line viewer.
pub type Result<T> = anyhow::Result<T>;

/// The single structural error a search-index payload can produce.
///
/// No partial table is observable when this is returned: the loader builds
/// every crate before handing anything back.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed search index{}: {reason}", crate_suffix(.crate_name))]
pub struct MalformedIndex {
    /// Crate record the violation was found in, if it could be attributed.
    pub crate_name: Option<String>,
    pub reason: Malformation,
}

impl MalformedIndex {
    pub(crate) fn new(reason: Malformation) -> Self {
        Self {
            crate_name: None,
            reason,
        }
    }

    pub(crate) fn in_crate(crate_name: &str, reason: Malformation) -> Self {
        Self {
            crate_name: Some(crate_name.to_string()),
            reason,
        }
    }
}

fn crate_suffix(crate_name: &Option<String>) -> String {
    crate_name
        .as_deref()
        .map(|name| format!(" (crate '{name}')"))
        .unwrap_or_default()
}

/// What exactly was wrong with a payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Malformation {
    #[error("payload is not well-formed: {0}")]
    Syntax(String),
    #[error("no `JSON.parse('...')` literal found in script payload")]
    MissingLiteral,
    #[error("string literal is not terminated")]
    UnterminatedLiteral,
    #[error("invalid escape sequence at byte {0}")]
    InvalidEscape(usize),
    #[error("crate '{0}' is listed more than once")]
    DuplicateCrate(String),
    #[error("field `{field}` has {actual} entries, expected {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("item {item} references parent {parent}, but `p` has {len} entries")]
    ParentOutOfBounds {
        item: usize,
        parent: usize,
        len: usize,
    },
}

/// Error returned when loading a payload file fails.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read search index at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file was read but its contents are structurally invalid.
    #[error("failed to load search index at {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: MalformedIndex,
    },
}

/// Error returned when a configuration file cannot be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
