//! Full-text search over a loaded symbol table.
//!
//! [`SearchEngine`] is an in-process [`SearchHost`]: publishing a table to it
//! builds a TF-IDF index over item names and summaries. Query results are ranked
//! by TF-IDF score plus a name-match bonus, with path canonicality breaking ties.

pub(crate) mod index;
pub(crate) mod scoring;
pub(crate) mod tokenize;

pub use scoring::{calculate_relevance, path_canonicality_score};

use crate::config::SearchConfig;
use crate::host::SearchHost;
use crate::kind::ItemKind;
use crate::table::{IndexItem, SymbolTable};
use index::InvertedIndex;
use rapidfuzz::distance::jaro_winkler;
use std::sync::Arc;

/// A query with optional filters.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub text: String,
    pub crate_name: Option<String>,
    pub kind: Option<ItemKind>,
    /// Falls back to the configured default when `None`.
    pub limit: Option<usize>,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn in_crate(mut self, crate_name: impl Into<String>) -> Self {
        self.crate_name = Some(crate_name.into());
        self
    }

    pub fn of_kind(mut self, kind: ItemKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[derive(Debug, Clone)]
pub struct SearchHit<'a> {
    pub crate_name: &'a str,
    pub item: &'a IndexItem,
    pub score: f32,
}

/// A "did you mean" candidate for a query that matched nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub name: String,
    pub score: f64,
}

struct Loaded {
    table: Arc<SymbolTable>,
    index: InvertedIndex,
}

/// In-process search host.
pub struct SearchEngine {
    config: SearchConfig,
    loaded: Option<Loaded>,
}

impl SearchEngine {
    /// An engine waiting for a table to be published to it.
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            loaded: None,
        }
    }

    pub fn with_table(table: Arc<SymbolTable>, config: SearchConfig) -> Self {
        let mut engine = Self::new(config);
        engine.load(table);
        engine
    }

    fn load(&mut self, table: Arc<SymbolTable>) {
        let index = InvertedIndex::build(&table);
        self.loaded = Some(Loaded { table, index });
    }

    pub fn is_ready(&self) -> bool {
        self.loaded.is_some()
    }

    pub fn table(&self) -> Option<&Arc<SymbolTable>> {
        self.loaded.as_ref().map(|l| &l.table)
    }

    /// Ranked matches. Empty when no table has been published yet.
    pub fn search(&self, query: &SearchQuery) -> Vec<SearchHit<'_>> {
        let Some(loaded) = &self.loaded else {
            return vec![];
        };
        let limit = query.limit.unwrap_or(self.config.default_limit);

        let mut hits: Vec<SearchHit<'_>> = loaded
            .index
            .search(&query.text)
            .into_iter()
            .filter(|(doc, _)| {
                query
                    .crate_name
                    .as_deref()
                    .is_none_or(|name| name == doc.crate_name)
            })
            .filter_map(|(doc, score)| {
                let krate = loaded.table.get(&doc.crate_name)?;
                let item = krate.items().get(doc.item)?;
                Some(SearchHit {
                    crate_name: krate.name(),
                    item,
                    score,
                })
            })
            .filter(|hit| query.kind.is_none_or(|kind| hit.item.kind == kind))
            .map(|mut hit| {
                if let Some(bonus) = calculate_relevance(&hit.item.name, &query.text) {
                    hit.score += bonus as f32 / 10.0;
                }
                hit
            })
            .collect();

        hits.sort_by(|a, b| {
            let (a_path, b_path) = (a.item.full_path(), b.item.full_path());
            b.score
                .total_cmp(&a.score)
                .then_with(|| {
                    path_canonicality_score(&b_path).cmp(&path_canonicality_score(&a_path))
                })
                .then_with(|| a_path.cmp(&b_path))
        });
        hits.truncate(limit);

        tracing::debug!("Search for '{}' returned {} hits", query.text, hits.len());
        hits
    }

    /// Item names similar to `text`, best first, at or above the configured threshold.
    pub fn suggest(&self, text: &str, limit: usize) -> Vec<Suggestion> {
        let Some(loaded) = &self.loaded else {
            return vec![];
        };
        let needle = text.to_lowercase();

        let mut names: Vec<&str> = loaded.table.items().map(|(_, item)| item.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();

        let mut suggestions: Vec<Suggestion> = names
            .into_iter()
            .map(|name| Suggestion {
                name: name.to_string(),
                score: jaro_winkler::similarity(needle.chars(), name.to_lowercase().chars()),
            })
            .filter(|s| s.score >= self.config.suggestion_threshold)
            .collect();
        suggestions.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.name.cmp(&b.name)));
        suggestions.truncate(limit);
        suggestions
    }
}

impl SearchHost for SearchEngine {
    fn init_search(&mut self, table: Arc<SymbolTable>) -> crate::error::Result<()> {
        self.load(table);
        Ok(())
    }
}
