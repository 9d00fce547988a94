use anyhow::Context;
use clap::Parser;
use rustdoc_search_index::cli::{Cli, Commands};
use rustdoc_search_index::{
    ItemKind, LoaderConfig, ModuleExports, ParentIndexing, SearchEngine, SearchQuery,
    SearchStatus, bootstrap, load_file, logging,
};
use std::collections::BTreeMap;
use std::path::Path;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut config = LoaderConfig::discover(cli.config.as_deref())?;
    if cli.one_based {
        config.parent_indexing = ParentIndexing::OneBased;
    }

    match cli.command {
        Commands::Inspect { file } => inspect(&file, &config),
        Commands::Search {
            file,
            query,
            crate_name,
            kind,
            limit,
        } => {
            let kind = kind
                .map(|k| ItemKind::parse_filter(&k).with_context(|| format!("unknown item kind '{k}'")))
                .transpose()?;
            let query = SearchQuery {
                text: query,
                crate_name,
                kind,
                limit,
            };
            search(&file, &query, &config)
        }
        Commands::Paths { file, name } => {
            let table = load_file(&file, &config)?;
            let paths = table.paths_named(&name);
            if paths.is_empty() {
                println!("No items named '{}'", name);
            }
            for path in paths {
                println!("{}", path);
            }
            Ok(())
        }
        Commands::Dump { file, js } => {
            let table = load_file(&file, &config)?;
            if js {
                print!("{}", table.to_js()?);
            } else {
                println!("{}", table.to_json()?);
            }
            Ok(())
        }
    }
}

fn inspect(file: &Path, config: &LoaderConfig) -> anyhow::Result<()> {
    let table = load_file(file, config)?;
    for krate in table.crates() {
        println!(
            "crate {}: {} items, {} types",
            krate.name(),
            krate.len(),
            krate.types().len()
        );
        let mut kinds: BTreeMap<String, usize> = BTreeMap::new();
        for item in krate.items() {
            *kinds.entry(item.kind.to_string()).or_insert(0) += 1;
        }
        for (kind, count) in kinds {
            println!("  {kind:<12} {count}");
        }
    }
    Ok(())
}

/// Runs the viewer start-up sequence, then queries the in-process host.
fn search(file: &Path, query: &SearchQuery, config: &LoaderConfig) -> anyhow::Result<()> {
    let payload = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let mut engine = SearchEngine::new(config.search.clone());
    let mut exports = ModuleExports::new();
    if let SearchStatus::Unavailable { reason } =
        bootstrap(&payload, config, Some(&mut engine), Some(&mut exports))
    {
        println!("Search unavailable: {}", reason);
        return Ok(());
    }

    let hits = engine.search(query);
    if hits.is_empty() {
        println!("No results found for '{}'.", query.text);
        let suggestions = engine.suggest(&query.text, 5);
        if !suggestions.is_empty() {
            println!("\nDid you mean:");
            for suggestion in suggestions {
                println!("  • {}", suggestion.name);
            }
        }
        return Ok(());
    }

    for hit in hits {
        println!("{:<8} {} ({:.2})", hit.item.kind.to_string(), hit.item.full_path(), hit.score);
        if !hit.item.summary.is_empty() {
            println!("         {}", hit.item.summary);
        }
    }
    Ok(())
}
