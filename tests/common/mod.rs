//! Shared test fixtures and utilities for integration tests.
//!
//! # Available Fixtures
//!
//! - `valis_core_script`: the rustdoc-generated `search-index.js` for `valis_core`,
//!   as shipped (script form, one-based parent references)
//! - `valis_core`: that payload loaded with one-based addressing
//! - `demo_payload`: the minimal two-item `demo` crate, direct addressing
//!
//! [`TempWorkspace`] provides a temp directory for tests that load from disk.

use rstest::fixture;
use rustdoc_search_index::{Loader, ParentIndexing, SymbolTable};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Items in the `valis_core` fixture.
#[allow(dead_code)]
pub const VALIS_CORE_ITEMS: usize = 76;
/// `p` entries in the `valis_core` fixture.
#[allow(dead_code)]
pub const VALIS_CORE_TYPES: usize = 17;

/// Returns the project root directory (where Cargo.toml lives).
pub fn project_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

pub fn fixture_path(name: &str) -> PathBuf {
    project_root().join("tests/fixtures").join(name)
}

#[allow(dead_code)]
#[fixture]
pub fn valis_core_script() -> String {
    let path = fixture_path("search-index.js");
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture '{}': {}", path.display(), e))
}

#[allow(dead_code)]
#[fixture]
pub fn valis_core(valis_core_script: String) -> Arc<SymbolTable> {
    let table = Loader::new(ParentIndexing::OneBased)
        .parse(&valis_core_script)
        .expect("valis_core fixture should load");
    Arc::new(table)
}

#[allow(dead_code)]
#[fixture]
pub fn demo_payload() -> &'static str {
    r#"{"demo":{"doc":"","t":[3,11],"n":["Foo","bar"],"q":["demo",""],"d":["a struct","a method"],"i":[0,1],"f":[0,0],"p":[[0,""],[3,"Foo"]]}}"#
}

/// A temporary directory, removed on drop.
#[allow(dead_code)] // Methods used across different integration test crates
pub struct TempWorkspace {
    _temp: TempDir,
    root: PathBuf,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl TempWorkspace {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        Self { _temp: temp, root }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Creates a file with the given content; parent directories are created as needed.
    ///
    /// # Panics
    /// Panics if file creation fails.
    pub fn create_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.root.join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("Failed to create parent directory for '{}': {}", path, e)
            });
        }
        std::fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("Failed to write file '{}': {}", path, e));
        full_path
    }
}

impl Default for TempWorkspace {
    fn default() -> Self {
        Self::new()
    }
}
