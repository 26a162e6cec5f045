//! Filter error rendering.

use owo_colors::OwoColorize;
use serde::Serialize;
use taskbook_filter_rs::filter::{FilterError, Span};

/// JSON output structure for an error.
#[derive(Serialize)]
pub struct ErrorOutput<'a> {
    pub error: ErrorBody<'a>,
}

/// Body of a JSON error.
#[derive(Serialize)]
pub struct ErrorBody<'a> {
    pub code: &'a str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<SpanOutput>,
}

/// Byte range of the offending input.
#[derive(Serialize)]
pub struct SpanOutput {
    pub start: usize,
    pub end: usize,
}

impl From<Span> for SpanOutput {
    fn from(span: Span) -> Self {
        Self {
            start: span.start,
            end: span.end,
        }
    }
}

/// Formats an error as JSON for stderr.
pub fn format_error_json(code: &str, message: String, span: Option<Span>) -> String {
    let output = ErrorOutput {
        error: ErrorBody {
            code,
            message,
            span: span.map(SpanOutput::from),
        },
    };
    serde_json::to_string(&output).unwrap_or_else(|_| {
        format!(r#"{{"error":{{"code":"{code}","message":"failed to serialize error"}}}}"#)
    })
}

/// Renders a filter error with the offending part of `expression` marked.
///
/// With colors the span is drawn bold red underlined in place; without, a
/// caret line is printed below the expression. An empty span marks one column.
pub fn format_filter_diagnostic(expression: &str, error: &FilterError, use_colors: bool) -> String {
    let (before, offending, after) = error.highlight(expression);
    let mut output = String::new();

    if use_colors {
        output.push_str(&format!("{} {}\n", "error:".red().bold(), error));
        let marked = if offending.is_empty() {
            " ".on_red().to_string()
        } else {
            offending.red().bold().underline().to_string()
        };
        output.push_str(&format!("  {before}{marked}{after}\n"));
    } else {
        output.push_str(&format!("error: {error}\n"));
        output.push_str(&format!("  {expression}\n"));
        let pad = before.chars().count();
        let width = offending.chars().count().max(1);
        output.push_str(&format!("  {}{}\n", " ".repeat(pad), "^".repeat(width)));
    }

    if let Some(cause) = error.cause() {
        output.push_str(&format!("  caused by: {cause}\n"));
    }

    output
}
