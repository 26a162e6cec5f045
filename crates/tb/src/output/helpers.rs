//! Common helper functions for output formatting.

use std::collections::BTreeSet;

use chrono::{Local, NaiveDate};
use owo_colors::OwoColorize;
use taskbook_model_rs::models::{Deadline, Frequency, Priority, Tag};

/// Truncates a string to at most `max_len` characters.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        s.to_string()
    }
}

/// Formats priority for display, padded to `width` before coloring.
pub fn format_priority(priority: Priority, width: usize, use_colors: bool) -> String {
    let label = format!("{:<width$}", format!("p{}", priority.value()));

    if use_colors {
        match priority.value() {
            4 => label.red().to_string(),
            3 => label.yellow().to_string(),
            2 => label.blue().to_string(),
            _ => label.dimmed().to_string(),
        }
    } else {
        label
    }
}

/// Formats a deadline relative to `today`, padded to `width` before coloring.
pub fn format_deadline(
    deadline: Option<Deadline>,
    today: NaiveDate,
    width: usize,
    use_colors: bool,
) -> String {
    let Some(deadline) = deadline else {
        return " ".repeat(width);
    };
    let date = deadline.date();

    let display = if date == today {
        "Today".to_string()
    } else if date == today + chrono::Duration::days(1) {
        "Tomorrow".to_string()
    } else if date < today {
        let days = (today - date).num_days();
        if days == 1 {
            "1 day ago".to_string()
        } else {
            format!("{days} days ago")
        }
    } else {
        deadline.to_string()
    };
    let display = format!("{display:<width$}");

    if use_colors {
        if date < today {
            display.red().to_string()
        } else if date == today {
            display.yellow().to_string()
        } else {
            display
        }
    } else {
        display
    }
}

/// Formats a deadline relative to the local date.
pub fn format_deadline_today(deadline: Option<Deadline>, width: usize, use_colors: bool) -> String {
    format_deadline(deadline, Local::now().date_naive(), width, use_colors)
}

/// Formats a recurrence interval; one-off tasks show nothing.
pub fn format_frequency(frequency: Frequency) -> String {
    match frequency.days() {
        0 => String::new(),
        1 => "daily".to_string(),
        7 => "weekly".to_string(),
        days => format!("every {days}d"),
    }
}

/// Formats tags for display.
pub fn format_tags(tags: &BTreeSet<Tag>, max_len: usize) -> String {
    if tags.is_empty() {
        return String::new();
    }

    let formatted: Vec<String> = tags.iter().map(|t| format!("#{t}")).collect();
    truncate_str(&formatted.join(" "), max_len)
}
