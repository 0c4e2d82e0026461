// ABOUTME: CLI list command - prints every remote, its branches and what each is merged into

use anyhow::Result;
use std::fmt::Write as _;

use super::{util, ListArgs, OutputFormat};
use crate::config::AppConfig;
use crate::tree::{Node, NodeKind, Tree, ViewController};

/// Execute the list command
pub async fn execute(args: ListArgs, format: OutputFormat, config: &AppConfig) -> Result<()> {
    let tree = util::load_tree(config).await;
    let view = ViewController::new(tree, config.initial_sort_mode());
    let snapshot = view.roots();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&*snapshot)?),
        OutputFormat::Text => print!(
            "{}",
            render_text(&snapshot, args.merged_only, config.ui.show_details)
        ),
    }

    Ok(())
}

/// Indented plain-text rendering of a snapshot.
pub fn render_text(tree: &Tree, merged_only: bool, show_details: bool) -> String {
    let mut out = String::new();

    if let Some(placeholder) = tree.placeholder_kind() {
        let _ = writeln!(out, "{} {}", placeholder.icon().glyph(), placeholder.message());
        return out;
    }

    for remote in tree.roots() {
        let _ = writeln!(out, "{} {}  {}", remote.icon().glyph(), remote.label, remote.tooltip());
        for branch in &remote.children {
            if merged_only && !matches!(branch.kind, NodeKind::MergedBranch(_)) {
                continue;
            }
            write_branch(&mut out, branch, show_details);
        }
    }

    out
}

fn write_branch(out: &mut String, branch: &Node, show_details: bool) {
    match (&branch.detail, show_details) {
        (Some(detail), true) => {
            let _ = writeln!(out, "  {} {}  {}", branch.icon().glyph(), branch.label, detail);
        }
        _ => {
            let _ = writeln!(out, "  {} {}", branch.icon().glyph(), branch.label);
        }
    }
    for target in &branch.children {
        let _ = writeln!(out, "    {} {}", target.icon().glyph(), target.label);
    }
}
