//! Handing a loaded table to the documentation viewer.
//!
//! Both collaborators are optional and passed in explicitly. Search is a
//! convenience: nothing here can fail the hosting process.

use crate::config::LoaderConfig;
use crate::error::MalformedIndex;
use crate::loader::Loader;
use crate::table::SymbolTable;
use std::any::Any;
use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

/// A search widget that consumes the table to answer queries.
pub trait SearchHost {
    fn init_search(&mut self, table: Arc<SymbolTable>) -> crate::error::Result<()>;
}

/// A module boundary that makes values retrievable by name.
pub trait ExportTarget {
    fn export(&mut self, name: &str, table: Arc<SymbolTable>);
}

/// Registers `table` with `host`, if there is one.
///
/// Host failures, including panics, are logged and swallowed. Returns whether the
/// host accepted the table.
pub fn publish(table: &Arc<SymbolTable>, host: Option<&mut dyn SearchHost>) -> bool {
    let Some(host) = host else {
        tracing::debug!("No search host present, skipping publish");
        return false;
    };
    match catch_unwind(AssertUnwindSafe(|| host.init_search(Arc::clone(table)))) {
        Ok(Ok(())) => {
            tracing::debug!("Published search index ({} items)", table.len());
            true
        }
        Ok(Err(e)) => {
            tracing::warn!("Search host rejected index: {:#}", e);
            false
        }
        Err(payload) => {
            tracing::warn!("Search host panicked: {}", panic_message(payload.as_ref()));
            false
        }
    }
}

/// Exposes `table` under `name` when the environment supports named exports.
pub fn export_for_host(
    table: &Arc<SymbolTable>,
    name: &str,
    target: Option<&mut dyn ExportTarget>,
) -> bool {
    let Some(target) = target else {
        return false;
    };
    match catch_unwind(AssertUnwindSafe(|| target.export(name, Arc::clone(table)))) {
        Ok(()) => {
            tracing::debug!("Exported search index as '{}'", name);
            true
        }
        Err(payload) => {
            tracing::warn!("Export of '{}' panicked: {}", name, panic_message(payload.as_ref()));
            false
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

/// In-memory named-value registry.
#[derive(Debug, Default)]
pub struct ModuleExports {
    values: HashMap<String, Arc<SymbolTable>>,
}

impl ModuleExports {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<Arc<SymbolTable>> {
        self.values.get(name).cloned()
    }
}

impl ExportTarget for ModuleExports {
    fn export(&mut self, name: &str, table: Arc<SymbolTable>) {
        self.values.insert(name.to_string(), table);
    }
}

/// Outcome of the start-up sequence, as the viewer should present it.
#[derive(Debug, Clone)]
pub enum SearchStatus {
    /// The table loaded. `published` is false when there was no host or it declined.
    Available {
        table: Arc<SymbolTable>,
        published: bool,
        exported: bool,
    },
    /// Search is off; the viewer renders without it.
    Unavailable { reason: MalformedIndex },
}

impl SearchStatus {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available { .. })
    }

    pub fn table(&self) -> Option<&Arc<SymbolTable>> {
        match self {
            Self::Available { table, .. } => Some(table),
            Self::Unavailable { .. } => None,
        }
    }
}

/// Parse, then publish, then export. Never fails.
///
/// A parse error is not retried: the payload is static, so the same bytes would
/// fail the same way.
pub fn bootstrap(
    payload: &str,
    config: &LoaderConfig,
    host: Option<&mut dyn SearchHost>,
    exports: Option<&mut dyn ExportTarget>,
) -> SearchStatus {
    let table = match Loader::new(config.parent_indexing).parse(payload) {
        Ok(table) => Arc::new(table),
        Err(reason) => {
            tracing::warn!("Search unavailable: {}", reason);
            return SearchStatus::Unavailable { reason };
        }
    };

    let published = publish(&table, host);
    let exported = export_for_host(&table, &config.export_name, exports);
    SearchStatus::Available {
        table,
        published,
        exported,
    }
}
