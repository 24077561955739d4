use std::io::IsTerminal;

use state_search_explorer::autocomplete::SuggestionSessionState;
use state_search_explorer::explorer::{GraphViewState, InspectorContent};

use crate::cli::OutputFormat;

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("error serialising output: {e}"),
    }
}

fn header(line: &str) {
    if std::io::stdout().is_terminal() {
        println!("\x1b[1m{line}\x1b[0m");
    } else {
        println!("{line}");
    }
}

/// Print the suggestion list the dropdown would show.
pub fn format_suggestions(state: &SuggestionSessionState, format: &OutputFormat) {
    match format {
        OutputFormat::Compact => {
            for s in &state.suggestions {
                println!("{s}");
            }
            if let Some(error) = &state.error {
                eprintln!("suggestions unavailable: {error}");
            }
            println!("{} suggestions", state.suggestions.len());
        }

        OutputFormat::Table => {
            let name_w = state
                .suggestions
                .iter()
                .map(String::len)
                .max()
                .unwrap_or(4)
                .max(4);
            header(&format!("{:>3}  {:<name_w$}", "#", "NAME"));
            println!("{}", "-".repeat(name_w + 5));
            for (i, s) in state.suggestions.iter().enumerate() {
                println!("{:>3}  {:<name_w$}", i + 1, s);
            }
        }

        OutputFormat::Json => print_json(state),
    }
}

/// Print the loaded neighborhood and, if something is selected, its details.
pub fn format_graph(view: &GraphViewState, inspector: Option<&InspectorContent>, format: &OutputFormat) {
    match format {
        OutputFormat::Compact => {
            for n in &view.payload.nodes {
                println!("node {} {}", n.name, n.category_label());
            }
            for e in &view.payload.edges {
                println!("edge {} -> {} {}", e.source, e.target, e.edge_type);
            }
            if let Some(notice) = &view.notice {
                println!("sampled {}", notice.message());
            }
            if let Some(content) = inspector {
                print_inspector_compact(content);
            }
            println!(
                "{} nodes, {} edges ({})",
                view.payload.nodes.len(),
                view.payload.edges.len(),
                view.view_mode
            );
        }

        OutputFormat::Table => {
            let name_w = view
                .payload
                .nodes
                .iter()
                .map(|n| n.name.len())
                .max()
                .unwrap_or(4)
                .max(4);
            header(&format!("{:<name_w$}  {}", "NODE", "CATEGORY"));
            println!("{}", "-".repeat(name_w + 12));
            for n in &view.payload.nodes {
                println!("{:<name_w$}  {}", n.name, n.category_label());
            }
            println!();

            let src_w = view
                .payload
                .edges
                .iter()
                .map(|e| e.source.len())
                .max()
                .unwrap_or(6)
                .max(6);
            header(&format!("{:<src_w$}  {:<8}  {}", "SOURCE", "RELATION", "TARGET"));
            println!("{}", "-".repeat(src_w + 20));
            for e in &view.payload.edges {
                println!("{:<src_w$}  {:<8}  {}", e.source, e.edge_type.to_string(), e.target);
            }

            if let Some(notice) = &view.notice {
                println!();
                println!("{}", notice.message());
            }
            if let Some(content) = inspector {
                println!();
                print_inspector_compact(content);
            }
        }

        OutputFormat::Json => print_json(&serde_json::json!({
            "view": view,
            "inspector": inspector,
        })),
    }
}

fn print_inspector_compact(content: &InspectorContent) {
    match content {
        InspectorContent::Node(node) => {
            println!("inspect node {} {} {}", node.name, node.category, node.color);
            if let Some(module) = &node.module {
                println!("  module {module}");
            }
            if let Some(ty) = &node.const_type {
                println!("  type {ty}");
            }
            if let Some(informal) = &node.informal_name {
                println!("  informal {informal}");
            }
            if let Some(doc) = &node.doc_string {
                println!("  doc {}", doc.lines().next().unwrap_or_default());
            }
            println!("  graph {}", node.graph_link);
            println!("  docs {}", node.docs_link);
        }
        InspectorContent::Edge(edge) => {
            println!(
                "inspect edge {} {} -> {} {}",
                edge.id, edge.source, edge.target, edge.relationship
            );
        }
    }
}

/// Print the recent-search list.
pub fn format_recent(recent: &[String], format: &OutputFormat) {
    match format {
        OutputFormat::Compact => {
            for term in recent {
                println!("{term}");
            }
            println!("{} recent searches", recent.len());
        }
        OutputFormat::Table => {
            header(&format!("{:>3}  {}", "#", "TERM"));
            for (i, term) in recent.iter().enumerate() {
                println!("{:>3}  {}", i + 1, term);
            }
        }
        OutputFormat::Json => print_json(&recent),
    }
}
