//! Loads rustdoc search-index payloads into a typed, read-only symbol table and
//! hands it to an optional search host and an optional export registry.
//!
//! ```
//! let payload = r#"{"demo":{"doc":"","t":[3,11],"n":["Foo","bar"],"q":["demo",""],
//!     "d":["a struct","a method"],"i":[0,1],"f":[0,0],"p":[[0,""],[3,"Foo"]]}}"#;
//! let table = rustdoc_search_index::parse(payload)?;
//! let bar = &table.get("demo").unwrap().items()[1];
//! assert_eq!(bar.full_path(), "demo::Foo::bar");
//! # Ok::<(), rustdoc_search_index::MalformedIndex>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod host;
pub mod kind;
pub mod loader;
pub mod logging;
pub mod payload;
pub mod search;
pub mod table;

pub use config::{LoaderConfig, ParentIndexing, SearchConfig};
pub use error::{LoadError, MalformedIndex, Malformation};
pub use host::{
    ExportTarget, ModuleExports, SearchHost, SearchStatus, bootstrap, export_for_host, publish,
};
pub use kind::ItemKind;
pub use loader::{Loader, load_file, parse};
pub use search::{SearchEngine, SearchHit, SearchQuery, Suggestion};
pub use table::{CrateIndex, IndexItem, ParentRef, SymbolTable, TypeEntry};
