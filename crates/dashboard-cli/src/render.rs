//! Terminal rendering of the dashboard

use std::collections::HashMap;
use std::fmt::Write;

use colored::{ColoredString, Colorize};
use dashboard_core::{
    BadgeStatus, CategorySet, RenderMode, RenderModel, RepoRef, StatusBoard, StatusClassification,
    WorkflowEntry, WorkflowId, WorkflowRecord,
};
use dashboard_store::ThemeMode;

const PENDING: &str = "pending";

fn heading(text: &str, theme: ThemeMode) -> ColoredString {
    match theme {
        ThemeMode::Light => text.blue().bold(),
        ThemeMode::Dark => text.bright_white().bold(),
    }
}

fn status_tag(status: &BadgeStatus) -> ColoredString {
    let tag = format!("[{}]", status.display_label());
    match status.classification {
        StatusClassification::Success => tag.green(),
        StatusClassification::Failure => tag.red(),
        StatusClassification::Neutral => tag.yellow(),
        StatusClassification::Unknown | StatusClassification::NoBadge => tag.dimmed(),
    }
}

fn entry_name(entry: &WorkflowEntry) -> String {
    if entry.workflow.is_active() {
        entry.display_name.clone()
    } else {
        format!(
            "{} ({})",
            entry.display_name.dimmed().strikethrough(),
            entry.workflow.state
        )
    }
}

fn write_entry(
    out: &mut String,
    indent: usize,
    entry: &WorkflowEntry,
    repo: &RepoRef,
    board: Option<&StatusBoard>,
) {
    let mut line = format!("{:indent$}{}", "", entry_name(entry));
    if let Some(board) = board {
        let tag = match board.status(&entry.workflow.id) {
            Some(status) => status_tag(status),
            None => format!("[{PENDING}]").dimmed(),
        };
        line.push_str(&format!("  {tag}"));
    }
    let _ = writeln!(out, "{}  {}", line, entry.workflow.link(repo).dimmed());
}

/// The full dashboard. `board` adds a status column; an empty model renders
/// nothing at all.
pub fn render_model(
    repo: &RepoRef,
    model: &RenderModel,
    board: Option<&StatusBoard>,
    theme: ThemeMode,
) -> String {
    let mut out = String::new();
    if model.workflow_count() == 0 {
        return out;
    }

    let mode = match model.mode {
        RenderMode::Custom => "custom categories",
        RenderMode::Auto => "grouped by name",
    };
    let _ = writeln!(
        out,
        "{} · {} · {} workflows",
        heading(&repo.to_string(), theme),
        mode,
        model.workflow_count()
    );

    for bucket in &model.buckets {
        let _ = writeln!(out, "{}", heading(&format!("▸ {}", bucket.name), theme));
        for section in &bucket.sections {
            let indent = match &section.name {
                Some(name) => {
                    let _ = writeln!(out, "    {}", name.bold());
                    6
                }
                None => 4,
            };
            for entry in &section.entries {
                write_entry(&mut out, indent, entry, repo, board);
            }
        }
    }
    out
}

/// Display names of everything on the dashboard, for labelling updates
pub fn display_names(model: &RenderModel) -> HashMap<WorkflowId, String> {
    model
        .entries()
        .map(|entry| (entry.workflow.id.clone(), entry.display_name.clone()))
        .collect()
}

/// One line announcing a settled status
pub fn render_update(names: &HashMap<WorkflowId, String>, id: &WorkflowId, status: &BadgeStatus) -> String {
    let name = names
        .get(id)
        .cloned()
        .unwrap_or_else(|| format!("#{id}"));
    format!("  {} {}", name, status_tag(status))
}

/// Counts per classification, e.g. `2 passing · 1 failing`
pub fn render_summary(board: &StatusBoard) -> String {
    const ORDER: [(StatusClassification, &str); 5] = [
        (StatusClassification::Success, "passing"),
        (StatusClassification::Failure, "failing"),
        (StatusClassification::Neutral, "neutral"),
        (StatusClassification::Unknown, "unknown"),
        (StatusClassification::NoBadge, "no badge"),
    ];

    ORDER
        .iter()
        .filter_map(|(classification, label)| {
            let count = board
                .statuses()
                .filter(|status| status.classification == *classification)
                .count();
            (count > 0).then(|| format!("{count} {label}"))
        })
        .collect::<Vec<_>>()
        .join(" · ")
}

/// Explains a blank dashboard when the listing itself was not empty
pub fn render_empty_notice(repo: &RepoRef, listed: usize, model: &RenderModel) -> Option<String> {
    if listed == 0 || model.workflow_count() > 0 {
        return None;
    }
    let noun = if listed == 1 { "workflow" } else { "workflows" };
    Some(format!(
        "{repo}: {listed} {noun} listed, none shown (workflows outside every category are hidden; set show_unassigned = true)"
    ))
}

/// Stored categories with their members, in stored order
pub fn render_categories(set: &CategorySet, workflows: &[WorkflowRecord], theme: ThemeMode) -> String {
    let by_id: HashMap<&WorkflowId, &WorkflowRecord> =
        workflows.iter().map(|workflow| (&workflow.id, workflow)).collect();

    let mut out = String::new();
    for (name, members) in set.iter() {
        let _ = writeln!(out, "{} ({})", heading(name, theme), members.len());
        for id in members {
            match by_id.get(id) {
                Some(workflow) => {
                    let _ = writeln!(out, "    {}  {}", workflow.name, format!("#{id}").dimmed());
                }
                None => {
                    let _ = writeln!(out, "    {}", format!("#{id} (not listed)").dimmed());
                }
            }
        }
    }
    out
}
