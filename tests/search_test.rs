mod common;

use assert2::{check, let_assert};
use common::valis_core;
use rstest::rstest;
use rustdoc_search_index::{
    ItemKind, SearchConfig, SearchEngine, SearchQuery, SymbolTable, parse,
};
use std::sync::Arc;

fn engine(table: Arc<SymbolTable>) -> SearchEngine {
    SearchEngine::with_table(table, SearchConfig::default())
}

#[rstest]
fn finds_struct_by_exact_name(valis_core: Arc<SymbolTable>) {
    let engine = engine(valis_core);
    let hits = engine.search(&SearchQuery::new("KindConfig").limit(5));
    let_assert!(Some(first) = hits.first());
    check!(first.item.name == "KindConfig");
    check!(first.item.kind == ItemKind::Struct);
    check!(first.crate_name == "valis_core");
}

#[rstest]
#[case("virtualenv", "get_venv_info")]
#[case("cluster", "start")]
#[case("PATH", "in_path")]
fn finds_items_by_summary_words(
    valis_core: Arc<SymbolTable>,
    #[case] query: &str,
    #[case] expected: &str,
) {
    let engine = engine(valis_core);
    let hits = engine.search(&SearchQuery::new(query).limit(25));
    check!(
        hits.iter().any(|h| h.item.name == expected),
        "'{}' should find {}",
        query,
        expected
    );
}

#[rstest]
fn kind_filter_keeps_only_functions(valis_core: Arc<SymbolTable>) {
    let engine = engine(valis_core);
    let hits = engine.search(&SearchQuery::new("install").of_kind(ItemKind::TyMethod));
    check!(!hits.is_empty());
    check!(hits.iter().all(|h| h.item.kind == ItemKind::TyMethod));
    check!(hits.iter().all(|h| h.item.parent_name() == Some("Installation")));
}

#[rstest]
fn results_are_sorted_by_score(valis_core: Arc<SymbolTable>) {
    let engine = engine(valis_core);
    let hits = engine.search(&SearchQuery::new("borrow").limit(50));
    check!(hits.len() > 1);
    check!(hits.windows(2).all(|pair| pair[0].score >= pair[1].score));
}

#[rstest]
fn default_limit_applies(valis_core: Arc<SymbolTable>) {
    let config = SearchConfig {
        default_limit: 3,
        ..SearchConfig::default()
    };
    let engine = SearchEngine::with_table(valis_core, config);
    check!(engine.search(&SearchQuery::new("borrow")).len() == 3);
}

#[rstest]
fn misspelling_yields_suggestions(valis_core: Arc<SymbolTable>) {
    let engine = engine(valis_core);
    check!(engine.search(&SearchQuery::new("Componnet")).is_empty());
    let suggestions = engine.suggest("Componnet", 3);
    let_assert!(Some(best) = suggestions.first());
    check!(best.name == "Component");
}

#[test]
fn ties_break_on_module_depth_not_crate_name() {
    let payload = r#"{
        "app":{"t":[5],"n":["run"],"q":["app::cli"],"d":["Runs the service"],"i":[0],"f":[0],"p":[]},
        "app_core":{"t":[5],"n":["run"],"q":["app_core"],"d":["Runs the service"],"i":[0],"f":[0],"p":[]}
    }"#;
    let table = Arc::new(parse(payload).unwrap());
    let engine = engine(table);

    let hits = engine.search(&SearchQuery::new("run"));
    let_assert!([first, second] = hits.as_slice());
    check!(first.score == second.score);
    check!(first.item.full_path() == "app_core::run");
    check!(second.item.full_path() == "app::cli::run");
}
