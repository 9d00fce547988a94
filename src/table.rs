//! The decoded, immutable symbol table.

use crate::kind::ItemKind;
use std::collections::BTreeMap;
use std::fmt;

/// A `p` entry: the kind and display name of a referenced type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeEntry {
    pub kind: ItemKind,
    pub name: String,
}

/// Resolved link from a member item to the type it is defined on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParentRef {
    /// The raw, non-zero `i` value the link was decoded from.
    pub reference: usize,
    pub kind: ItemKind,
    pub name: String,
}

/// One documented item, with its module path fully materialised.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexItem {
    pub kind: ItemKind,
    pub name: String,
    /// Module path the item lives under, e.g. `valis_core::modules::k8s::kind`.
    pub path: String,
    /// Short summary; rustdoc stores it as an HTML fragment.
    pub summary: String,
    pub parent: Option<ParentRef>,
    /// Opaque signature descriptor, carried through unchanged.
    pub signature: serde_json::Value,
}

impl IndexItem {
    /// `path::Parent::name` for members, `path::name` otherwise.
    pub fn full_path(&self) -> String {
        let mut segments: Vec<&str> = Vec::with_capacity(3);
        if !self.path.is_empty() {
            segments.push(&self.path);
        }
        if let Some(parent) = &self.parent {
            segments.push(&parent.name);
        }
        segments.push(&self.name);
        segments.join("::")
    }

    pub fn parent_name(&self) -> Option<&str> {
        self.parent.as_ref().map(|p| p.name.as_str())
    }
}

impl fmt::Display for IndexItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.full_path())
    }
}

/// Everything indexed for one crate.
#[derive(Debug, Clone, PartialEq)]
pub struct CrateIndex {
    pub(crate) name: String,
    pub(crate) doc: String,
    pub(crate) items: Vec<IndexItem>,
    pub(crate) types: Vec<TypeEntry>,
}

impl CrateIndex {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Crate-level documentation, possibly empty.
    pub fn doc(&self) -> &str {
        &self.doc
    }

    pub fn items(&self) -> &[IndexItem] {
        &self.items
    }

    /// The `p` table, in payload order.
    pub fn types(&self) -> &[TypeEntry] {
        &self.types
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items defined on the type called `type_name`.
    pub fn members_of<'a>(&'a self, type_name: &'a str) -> impl Iterator<Item = &'a IndexItem> {
        self.items
            .iter()
            .filter(move |item| item.parent_name() == Some(type_name))
    }

    pub fn find_by_kind(&self, kind: ItemKind) -> impl Iterator<Item = &IndexItem> {
        self.items.iter().filter(move |item| item.kind == kind)
    }
}

/// Crate name to indexed items. Built once by the loader, then read-only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolTable {
    pub(crate) crates: BTreeMap<String, CrateIndex>,
}

impl SymbolTable {
    pub fn get(&self, crate_name: &str) -> Option<&CrateIndex> {
        self.crates.get(crate_name)
    }

    pub fn crates(&self) -> impl Iterator<Item = &CrateIndex> {
        self.crates.values()
    }

    pub fn crate_names(&self) -> impl Iterator<Item = &str> {
        self.crates.keys().map(String::as_str)
    }

    /// Total number of items across all crates.
    pub fn len(&self) -> usize {
        self.crates.values().map(CrateIndex::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every item, paired with the crate it belongs to.
    pub fn items(&self) -> impl Iterator<Item = (&str, &IndexItem)> {
        self.crates
            .values()
            .flat_map(|krate| krate.items.iter().map(move |item| (krate.name(), item)))
    }

    /// Items whose [`IndexItem::full_path`] equals `full_path`.
    ///
    /// Several items can share a path, e.g. an inherent method and a trait
    /// method of the same name.
    pub fn find_path(&self, full_path: &str) -> Vec<&IndexItem> {
        let full_path = full_path.trim().trim_start_matches("::");
        self.items()
            .map(|(_, item)| item)
            .filter(|item| item.full_path() == full_path)
            .collect()
    }

    /// All full paths ending in `name`, e.g. every `clone` in the index.
    pub fn paths_named(&self, name: &str) -> Vec<String> {
        self.items()
            .filter(|(_, item)| item.name == name)
            .map(|(_, item)| item.full_path())
            .collect()
    }
}
