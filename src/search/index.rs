//! TF-IDF inverted index over a [`SymbolTable`].

use super::tokenize::{hash_term, strip_markup, tokenize_and_stem};
use crate::table::SymbolTable;
use ahash::AHashMap;
use rust_stemmers::{Algorithm, Stemmer};

/// Term hash for fast lookup
type TermHash = u64;

/// Where an indexed document lives in the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DocRef {
    pub(crate) crate_name: String,
    pub(crate) item: usize,
}

/// Term hash to `(document, tf-idf)` postings, sorted by score descending.
#[derive(Debug, Clone, Default)]
pub(crate) struct InvertedIndex {
    terms: AHashMap<TermHash, Vec<(usize, f32)>>,
    docs: Vec<DocRef>,
}

impl InvertedIndex {
    pub(crate) fn build(table: &SymbolTable) -> Self {
        let mut builder = TermBuilder::default();
        for krate in table.crates() {
            for (position, item) in krate.items().iter().enumerate() {
                let doc = builder.add_document(DocRef {
                    crate_name: krate.name().to_string(),
                    item: position,
                });
                // Names carry twice the weight of summary text.
                builder.add_terms(&item.name, doc, 2.0);
                if let Some(parent) = item.parent_name() {
                    builder.add_terms(parent, doc, 0.5);
                }
                builder.add_terms(&strip_markup(&item.summary), doc, 1.0);
            }
        }
        builder.finalize()
    }

    /// Scores every document matching any query term. Documents matching several
    /// terms accumulate their scores.
    pub(crate) fn search(&self, query: &str) -> Vec<(&DocRef, f32)> {
        let stemmer = Stemmer::create(Algorithm::English);
        let tokens = tokenize_and_stem(query, &stemmer);

        let mut combined: AHashMap<usize, f32> = AHashMap::new();
        for token in &tokens {
            if let Some(postings) = self.terms.get(&hash_term(token)) {
                for (doc, score) in postings {
                    *combined.entry(*doc).or_insert(0.0) += score;
                }
            }
        }

        let mut results: Vec<_> = combined
            .into_iter()
            .map(|(doc, score)| (&self.docs[doc], score))
            .collect();
        results.sort_by(|(_, a), (_, b)| b.total_cmp(a));
        results
    }

    pub(crate) fn term_count(&self) -> usize {
        self.terms.len()
    }

    pub(crate) fn document_count(&self) -> usize {
        self.docs.len()
    }
}

/// Accumulates term frequencies before TF-IDF finalization.
struct TermBuilder {
    /// (term, doc) -> raw weighted term frequency
    term_docs: AHashMap<(TermHash, usize), f32>,
    /// doc -> total term count, for length normalisation
    doc_lengths: Vec<usize>,
    docs: Vec<DocRef>,
    stemmer: Stemmer,
}

impl Default for TermBuilder {
    fn default() -> Self {
        Self {
            term_docs: AHashMap::default(),
            doc_lengths: Vec::new(),
            docs: Vec::new(),
            stemmer: Stemmer::create(Algorithm::English),
        }
    }
}

impl TermBuilder {
    fn add_document(&mut self, doc: DocRef) -> usize {
        self.docs.push(doc);
        self.doc_lengths.push(0);
        self.docs.len() - 1
    }

    /// TF contribution = occurrences * `base_score`.
    fn add_terms(&mut self, text: &str, doc: usize, base_score: f32) {
        let words = tokenize_and_stem(text, &self.stemmer);
        self.doc_lengths[doc] += words.len();

        let mut counts: AHashMap<String, usize> = AHashMap::with_capacity(words.len());
        for word in words {
            *counts.entry(word).or_insert(0) += 1;
        }
        for (word, count) in counts {
            *self.term_docs.entry((hash_term(&word), doc)).or_insert(0.0) +=
                count as f32 * base_score;
        }
    }

    /// TF-IDF = (1 + ln(tf / length_norm)) * ln(1 + total_docs / doc_freq).
    ///
    /// The smoothed IDF keeps terms shared by every document (e.g. in a one-item
    /// table) searchable.
    fn finalize(self) -> InvertedIndex {
        let start = std::time::Instant::now();
        let total_docs = self.docs.len() as f32;
        let total_length: usize = self.doc_lengths.iter().sum();
        let avg_doc_length = if self.doc_lengths.is_empty() {
            1.0
        } else {
            (total_length as f32 / total_docs).max(1.0)
        };

        let pairs = self.term_docs.len();
        let mut grouped: AHashMap<TermHash, Vec<(usize, f32)>> = AHashMap::new();
        for ((term, doc), tf) in self.term_docs {
            grouped.entry(term).or_default().push((doc, tf));
        }

        let mut terms = AHashMap::with_capacity(grouped.len());
        for (term, postings) in grouped {
            let idf = (1.0 + total_docs / postings.len() as f32).ln();
            let mut scored: Vec<(usize, f32)> = postings
                .into_iter()
                .map(|(doc, tf)| {
                    let length_norm = (self.doc_lengths[doc] as f32 / avg_doc_length).max(0.5);
                    let tf_normalized = (tf / length_norm).max(1.0);
                    (doc, (1.0 + tf_normalized.ln()) * idf)
                })
                .collect();
            scored.sort_by(|(a_doc, a), (b_doc, b)| b.total_cmp(a).then(a_doc.cmp(b_doc)));
            terms.insert(term, scored);
        }

        let index = InvertedIndex {
            terms,
            docs: self.docs,
        };
        tracing::info!(
            "Built search index: {} unique terms, {} documents, {} term-document pairs in {:?}",
            index.term_count(),
            index.document_count(),
            pairs,
            start.elapsed()
        );
        index
    }
}
