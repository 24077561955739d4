use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use state_search_explorer::graph::ViewMode;

/// Query-composition core of the theorem state search browser.
///
/// state-search drives the autocomplete engine and the dependency-graph
/// explorer against a local JSON graph export, printing what the UI would show.
#[derive(Parser, Debug)]
#[command(
    name = "state-search",
    version,
    about,
    long_about = None,
    propagate_version = true,
)]
pub struct Cli {
    /// Configuration file (default: ./state-search.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Recent-search store file (overrides the config).
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results.
#[derive(Clone, Debug, ValueEnum, Default)]
pub enum OutputFormat {
    /// Compact one-line-per-result format (default).
    #[default]
    Compact,
    /// Human-readable columnar table with optional ANSI color when stdout is a terminal.
    Table,
    /// Structured JSON suitable for programmatic consumption.
    Json,
}

/// Which neighborhood of the focal declaration to load.
#[derive(Clone, Copy, Debug, ValueEnum, Default)]
pub enum Direction {
    /// Declarations the focal one uses.
    #[default]
    Dependency,
    /// Declarations that use the focal one.
    Dependent,
}

impl From<Direction> for ViewMode {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Dependency => ViewMode::Dependency,
            Direction::Dependent => ViewMode::Dependent,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Autocomplete suggestions for partially typed text.
    ///
    /// Empty text shows the recent searches instead of querying the graph.
    Suggest {
        /// Text typed so far.
        text: String,

        /// JSON graph export (`{"nodes": [...], "edges": [...]}`).
        #[arg(long)]
        graph: PathBuf,

        /// Maximum number of suggestions (default from config).
        #[arg(long)]
        limit: Option<usize>,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Compact)]
        format: OutputFormat,
    },

    /// Load the dependency or dependent neighborhood of a declaration.
    Graph {
        /// Fully qualified declaration name, e.g. "Nat.Prime".
        name: String,

        /// JSON graph export.
        #[arg(long)]
        graph: PathBuf,

        /// Neighborhood direction.
        #[arg(long, value_enum, default_value_t = Direction::Dependency)]
        direction: Direction,

        /// Show inspector details for this node.
        #[arg(long, conflicts_with = "edge")]
        node: Option<String>,

        /// Show inspector details for this edge id (e.g. "body_Nat.Prime->Nat").
        #[arg(long)]
        edge: Option<String>,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Compact)]
        format: OutputFormat,
    },

    /// Inspect or edit the recent-search memory.
    Recent {
        #[command(subcommand)]
        action: RecentAction,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Compact, global = true)]
        format: OutputFormat,
    },
}

#[derive(Subcommand, Debug)]
pub enum RecentAction {
    /// Print recent searches, most recent first.
    List,
    /// Record a search term.
    Add {
        term: String,
    },
    /// Forget all recent searches.
    Clear,
}
