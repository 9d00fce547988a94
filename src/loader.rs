//! Decoding payloads into a [`SymbolTable`] and encoding tables back.

use crate::config::{LoaderConfig, ParentIndexing};
use crate::error::{LoadError, MalformedIndex, Malformation};
use crate::payload::{RawCrate, RawIndex, RawParent};
use crate::table::{CrateIndex, IndexItem, ParentRef, SymbolTable, TypeEntry};
use std::collections::BTreeMap;
use std::path::Path;

/// Parses a payload with the default configuration.
pub fn parse(payload: &str) -> Result<SymbolTable, MalformedIndex> {
    Loader::default().parse(payload)
}

/// Reads and parses a payload file.
pub fn load_file(path: &Path, config: &LoaderConfig) -> Result<SymbolTable, LoadError> {
    let payload = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Loader::new(config.parent_indexing)
        .parse(&payload)
        .map_err(|source| LoadError::Malformed {
            path: path.to_path_buf(),
            source,
        })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Loader {
    parent_indexing: ParentIndexing,
}

impl Loader {
    pub fn new(parent_indexing: ParentIndexing) -> Self {
        Self { parent_indexing }
    }

    /// Parses either the script form or bare JSON.
    pub fn parse(&self, payload: &str) -> Result<SymbolTable, MalformedIndex> {
        let start = std::time::Instant::now();
        let raw = RawIndex::from_payload(payload)?;
        let table = self.decode(raw)?;
        tracing::info!(
            "Loaded search index: {} crates, {} items in {:?}",
            table.crates.len(),
            table.len(),
            start.elapsed()
        );
        Ok(table)
    }

    /// Validates and materialises an already-deserialised payload.
    pub fn decode(&self, raw: RawIndex) -> Result<SymbolTable, MalformedIndex> {
        let mut crates = BTreeMap::new();
        for (name, record) in raw.crates {
            let index = self
                .decode_crate(&name, record)
                .map_err(|reason| MalformedIndex::in_crate(&name, reason))?;
            tracing::debug!(
                "Decoded crate '{}' ({} items, {} types)",
                name,
                index.items.len(),
                index.types.len()
            );
            crates.insert(name, index);
        }
        Ok(SymbolTable { crates })
    }

    fn decode_crate(&self, name: &str, record: RawCrate) -> Result<CrateIndex, Malformation> {
        let RawCrate {
            doc,
            t,
            n,
            q,
            d,
            i,
            f,
            p,
        } = record;

        let expected = t.len();
        for (field, actual) in [
            ("n", n.len()),
            ("q", q.len()),
            ("d", d.len()),
            ("i", i.len()),
            ("f", f.len()),
        ] {
            if actual != expected {
                return Err(Malformation::LengthMismatch {
                    field,
                    expected,
                    actual,
                });
            }
        }

        let types: Vec<TypeEntry> = p
            .into_iter()
            .map(|RawParent(kind, name)| TypeEntry { kind, name })
            .collect();

        let mut items = Vec::with_capacity(expected);
        let mut last_path = String::new();
        let columns = t.into_iter().zip(n).zip(q).zip(d).zip(i).zip(f);
        for (position, (((((kind, item_name), path), summary), reference), signature)) in
            columns.enumerate()
        {
            if !path.is_empty() {
                last_path = path;
            }
            let parent = self.resolve_parent(&types, position, reference)?;
            items.push(IndexItem {
                kind,
                name: item_name,
                path: last_path.clone(),
                summary,
                parent,
                signature,
            });
        }

        Ok(CrateIndex {
            name: name.to_string(),
            doc,
            items,
            types,
        })
    }

    fn resolve_parent(
        &self,
        types: &[TypeEntry],
        item: usize,
        reference: usize,
    ) -> Result<Option<ParentRef>, Malformation> {
        if reference == 0 {
            return Ok(None);
        }
        let entry = types
            .get(self.parent_indexing.slot(reference))
            .ok_or(Malformation::ParentOutOfBounds {
                item,
                parent: reference,
                len: types.len(),
            })?;
        Ok(Some(ParentRef {
            reference,
            kind: entry.kind,
            name: entry.name.clone(),
        }))
    }
}

impl SymbolTable {
    /// Re-encodes the table into the payload field layout.
    ///
    /// Consecutive items under the same module path are written with an empty
    /// `q` entry, so decoding the result yields this table again.
    pub fn to_raw(&self) -> RawIndex {
        let crates = self
            .crates
            .iter()
            .map(|(name, index)| (name.clone(), encode_crate(index)))
            .collect();
        RawIndex { crates }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        self.to_raw().to_json()
    }

    /// Renders the script form, including the host registration glue.
    pub fn to_js(&self) -> serde_json::Result<String> {
        self.to_raw().to_js()
    }
}

fn encode_crate(index: &CrateIndex) -> RawCrate {
    let len = index.items.len();
    let mut record = RawCrate {
        doc: index.doc.clone(),
        t: Vec::with_capacity(len),
        n: Vec::with_capacity(len),
        q: Vec::with_capacity(len),
        d: Vec::with_capacity(len),
        i: Vec::with_capacity(len),
        f: Vec::with_capacity(len),
        p: index
            .types
            .iter()
            .map(|entry| RawParent(entry.kind, entry.name.clone()))
            .collect(),
    };

    let mut last_path = "";
    for item in &index.items {
        record.t.push(item.kind);
        record.n.push(item.name.clone());
        if item.path == last_path {
            record.q.push(String::new());
        } else {
            record.q.push(item.path.clone());
            last_path = &item.path;
        }
        record.d.push(item.summary.clone());
        record.i.push(item.parent.as_ref().map_or(0, |p| p.reference));
        record.f.push(item.signature.clone());
    }
    record
}
