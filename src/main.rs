mod cli;
mod output;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, RecentAction};
use state_search_explorer::autocomplete::SuggestionEngine;
use state_search_explorer::config::StateSearchConfig;
use state_search_explorer::events::EventHub;
use state_search_explorer::explorer::{GraphDataLoader, GraphInteractionController, Selection};
use state_search_explorer::graph::ViewMode;
use state_search_explorer::provider::LocalGraph;
use state_search_explorer::store::file::default_store_path;
use state_search_explorer::store::{FileStore, RecentSearches};

/// The CLI has no real window; the inspector is sized against this width.
const WINDOW_WIDTH: u32 = 1280;

fn load_graph(path: &Path) -> Result<Arc<LocalGraph>> {
    let graph = LocalGraph::load(path)
        .with_context(|| format!("failed to load graph export {}", path.display()))?;
    Ok(Arc::new(graph))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays clean for JSON consumers.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => StateSearchConfig::load_file(path),
        None => StateSearchConfig::load(Path::new(".")),
    };
    let store_path = cli
        .store
        .clone()
        .or_else(|| config.store.path.clone())
        .unwrap_or_else(default_store_path);
    tracing::debug!(store = %store_path.display(), "using recent-search store");
    let recent = Arc::new(RecentSearches::new(Arc::new(FileStore::new(store_path))));

    match cli.command {
        Commands::Suggest {
            text,
            graph,
            limit,
            format,
        } => {
            let provider = load_graph(&graph)?;
            let mut options = config.autocomplete.to_options();
            // A single invocation is a single keystroke; nothing to collapse.
            options.debounce = Duration::ZERO;
            if let Some(limit) = limit {
                options.max_suggestions = limit;
            }

            let engine = SuggestionEngine::new(provider, recent, options);
            if text.trim().is_empty() {
                engine.show_default_suggestions();
            } else {
                engine.update_suggestions(&text);
                engine.settle().await;
            }
            output::format_suggestions(&engine.snapshot(), &format);
        }

        Commands::Graph {
            name,
            graph,
            direction,
            node,
            edge,
            format,
        } => {
            let provider = load_graph(&graph)?;
            let mode = ViewMode::from(direction);
            let loader = Arc::new(GraphDataLoader::new(provider));
            loader
                .fetch(mode, &name)
                .await
                .with_context(|| format!("failed to load the {mode} graph of {name}"))?;

            let explorer = GraphInteractionController::new(
                Arc::clone(&loader),
                EventHub::new(),
                config.inspector.initial_width,
                WINDOW_WIDTH,
            );
            if let Some(node) = node {
                explorer.select_node(node);
            } else if let Some(edge) = edge {
                explorer.select_edge(edge);
            }

            let inspector = explorer.inspector();
            let selection = explorer.selection();
            if inspector.is_none() && selection != Selection::None {
                anyhow::bail!("{selection:?} is not part of the {mode} graph of {name}");
            }
            output::format_graph(&loader.snapshot(), inspector.as_ref(), &format);
        }

        Commands::Recent { action, format } => match action {
            RecentAction::List => output::format_recent(&recent.list(), &format),
            RecentAction::Add { term } => {
                let updated = recent.add(&term);
                output::format_recent(&updated, &format);
            }
            RecentAction::Clear => {
                recent.clear();
                output::format_recent(&[], &format);
            }
        },
    }

    Ok(())
}
