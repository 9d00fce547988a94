use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rustdoc-search-index")]
#[command(about = "Load and query rustdoc search-index payloads", long_about = None)]
pub struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Resolve parent references one-based, as rustdoc's own search script does
    #[arg(long, global = true)]
    pub one_based: bool,
    /// Log at debug level; RUST_LOG directives still apply
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Summarise the crates and item kinds in an index
    Inspect { file: PathBuf },
    /// Full-text search over item names and summaries
    Search {
        file: PathBuf,
        query: String,
        /// Only match items from this crate
        #[arg(short = 'c', long = "crate")]
        crate_name: Option<String>,
        /// Only match items of this kind (struct, fn, method, ...)
        #[arg(short, long)]
        kind: Option<String>,
        /// Maximum number of results
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// List every full path whose last segment is NAME
    Paths { file: PathBuf, name: String },
    /// Re-encode the index as JSON, or as a script with --js
    Dump {
        file: PathBuf,
        #[arg(long)]
        js: bool,
    },
}
