use anyhow::{bail, Context, Result};
use atlas_graph::{build_catalogue, radial, Viewport};
use atlas_import::{AdapterRegistry, ImportFile};
use atlas_session::Session;
use atlas_suggest::suggest;
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;

mod server;
mod store;

use store::LibraryStore;

#[derive(Parser)]
#[command(name = "atlas")]
#[command(about = "Interactive process and component catalogue", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Data directory holding library.json (defaults to ATLAS_DATA_DIR, then "data")
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP backend
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1:3001")]
        bind: String,
    },

    /// Import files into the library document
    Import {
        /// Files to import (.json, .sheets.json, .txt)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Rank processes against a problem description
    Suggest {
        query: String,

        /// Requested feature class (repeatable)
        #[arg(long = "class")]
        classes: Vec<String>,
    },

    /// Print the catalogue mind-map with radial positions as JSON
    Catalogue {
        #[arg(long, default_value_t = 1280.0)]
        width: f64,

        #[arg(long, default_value_t = 800.0)]
        height: f64,
    },

    /// Start an exploration from a process id and print the expanded graph
    Start { process_id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let data_dir = cli
        .data_dir
        .or_else(|| std::env::var("ATLAS_DATA_DIR").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("data"));

    let store = LibraryStore::new(&data_dir);
    match cli.command {
        Commands::Serve { bind } => server::serve(&bind, store).await,
        Commands::Import { files } => run_import(&store, &files).await,
        Commands::Suggest { query, classes } => run_suggest(&store, &query, &classes).await,
        Commands::Catalogue { width, height } => run_catalogue(&store, width, height).await,
        Commands::Start { process_id } => run_start(&store, &process_id).await,
    }
}

async fn run_import(store: &LibraryStore, paths: &[PathBuf]) -> Result<()> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        files.push(ImportFile::new(path.display().to_string(), bytes));
    }

    let registry = AdapterRegistry::with_defaults();
    let base = store.load().await;
    let (library, diagnostics) = registry.import_all(&files, base);

    for diagnostic in &diagnostics {
        eprintln!("skipped {}: {}", diagnostic.file, diagnostic.message);
    }
    store.save(&library).await?;

    println!(
        "library now holds {} processes, {} building blocks, {} links, {} notes ({} of {} files imported)",
        library.processes.len(),
        library.building_blocks.len(),
        library.links.len(),
        library.notes.len(),
        files.len() - diagnostics.len(),
        files.len(),
    );
    Ok(())
}

async fn run_suggest(store: &LibraryStore, query: &str, classes: &[String]) -> Result<()> {
    let library = store.load().await;
    let suggestions = suggest(query, classes, &library);

    if suggestions.is_empty() {
        println!("no matching processes");
        return Ok(());
    }
    for (rank, process) in suggestions.iter().enumerate() {
        println!("{}. {} [{}]", rank + 1, process.name, process.id);
    }
    Ok(())
}

async fn run_catalogue(store: &LibraryStore, width: f64, height: f64) -> Result<()> {
    let library = store.load().await;
    let graph = build_catalogue(&library);
    let layout = radial(&graph, Viewport::new(width, height));

    let nodes: Vec<_> = graph
        .nodes()
        .filter_map(|node| {
            layout.positions.get(&node.id).map(|point| {
                json!({
                    "id": node.id,
                    "name": node.name,
                    "kind": node.kind,
                    "x": point.x,
                    "y": point.y,
                })
            })
        })
        .collect();
    let edges: Vec<_> = graph.edges().collect();

    println!(
        "{}",
        serde_json::to_string_pretty(&json!({ "nodes": nodes, "edges": edges }))?
    );
    Ok(())
}

async fn run_start(store: &LibraryStore, process_id: &str) -> Result<()> {
    let library = store.load().await;
    if library.process(process_id).is_none() {
        bail!("unknown process id: {process_id}");
    }

    let session = Session::new()
        .load_library(library)
        .start_from_process(process_id);

    let nodes: Vec<_> = session.graph.nodes().collect();
    let edges: Vec<_> = session.graph.edges().collect();
    println!(
        "{}",
        serde_json::to_string_pretty(&json!({ "nodes": nodes, "edges": edges }))?
    );
    Ok(())
}
