//! Task output formatting.

use owo_colors::OwoColorize;
use serde::Serialize;
use taskbook_model_rs::models::Task;

use super::helpers::{format_deadline_today, format_frequency, format_priority, format_tags};

/// JSON output structure for the find command.
#[derive(Serialize)]
pub struct FindOutput<'a> {
    pub tasks: &'a [&'a Task],
    pub total: usize,
    pub matched: usize,
}

/// JSON output structure for `find --count`.
#[derive(Serialize)]
pub struct CountOutput {
    pub total: usize,
    pub matched: usize,
}

/// Formats matching tasks as JSON.
///
/// `total` is the size of the task list and `matched` the number of tasks the
/// filter accepted, which may exceed `tasks.len()` when a limit applies.
pub fn format_tasks_json(
    tasks: &[&Task],
    total: usize,
    matched: usize,
) -> Result<String, serde_json::Error> {
    let output = FindOutput {
        tasks,
        total,
        matched,
    };
    serde_json::to_string_pretty(&output)
}

/// Formats match counts as JSON.
pub fn format_count_json(total: usize, matched: usize) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&CountOutput { total, matched })
}

/// Formats tasks as a table.
pub fn format_tasks_table(tasks: &[&Task], use_colors: bool) -> String {
    if tasks.is_empty() {
        return "No tasks found.\n".to_string();
    }

    let mut output = String::new();

    // Header
    let header = format!(
        "{:<4} {:<12} {:<10} {:<20} {}",
        "Pri", "Deadline", "Repeats", "Tags", "Name"
    );
    if use_colors {
        output.push_str(&format!("{}\n", header.dimmed()));
    } else {
        output.push_str(&header);
        output.push('\n');
    }

    for task in tasks {
        let priority = format_priority(task.priority, 4, use_colors);
        let deadline = format_deadline_today(task.deadline, 12, use_colors);
        let frequency = format_frequency(task.frequency);
        let tags = format_tags(&task.tags, 20);

        let line = format!(
            "{} {} {:<10} {:<20} {}",
            priority, deadline, frequency, tags, task.name
        );
        output.push_str(line.trim_end());
        output.push('\n');
    }

    output
}
