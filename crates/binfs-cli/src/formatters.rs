//! Output formatters for CLI commands.
//!
//! Every command builds a serializable report and hands it to
//! [`format_output`], so the three output modes stay consistent.

use crate::cli::OutputFormat;
use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use serde_json::Value;

/// Formats `data` according to `format`.
///
/// # Errors
///
/// Returns an error if `data` cannot be serialized.
///
/// # Examples
///
/// ```
/// use binfs_cli::cli::OutputFormat;
/// use binfs_cli::formatters::format_output;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Report {
///     entries: usize,
/// }
///
/// let output = format_output(&Report { entries: 3 }, OutputFormat::Text)?;
/// assert_eq!(output, "entries: 3");
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn format_output<T: Serialize>(data: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json::format(data),
        OutputFormat::Text => text::format(data),
        OutputFormat::Pretty => pretty::format(data),
    }
}

/// JSON output formatting.
pub mod json {
    use super::{Result, Serialize};

    /// Formats data as indented JSON.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(data)?)
    }
}

/// Plain `key: value` lines for scripts and logs.
pub mod text {
    use super::{Result, Serialize, Value, scalar};

    /// Formats data as uncolored `key: value` lines.
    ///
    /// Nested keys are joined with `.` and array items are indexed, so every
    /// line stands alone: `listing.0.name: a.txt`.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        let value = serde_json::to_value(data)?;
        let mut lines = Vec::new();
        flatten(&value, "", &mut lines);
        Ok(lines.join("\n"))
    }

    fn flatten(value: &Value, prefix: &str, lines: &mut Vec<String>) {
        let key = |suffix: &str| {
            if prefix.is_empty() {
                suffix.to_string()
            } else {
                format!("{prefix}.{suffix}")
            }
        };
        match value {
            Value::Object(map) => {
                for (k, v) in map {
                    flatten(v, &key(k), lines);
                }
            }
            Value::Array(items) => {
                for (i, v) in items.iter().enumerate() {
                    flatten(v, &key(&i.to_string()), lines);
                }
            }
            other if prefix.is_empty() => lines.push(scalar(other)),
            other => lines.push(format!("{prefix}: {}", scalar(other))),
        }
    }
}

/// Colorized, indented output for terminals.
pub mod pretty {
    use super::{Colorize, Result, Serialize, Value, scalar};

    /// Formats data as an indented, colorized tree.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        let value = serde_json::to_value(data)?;
        let mut out = Vec::new();
        render(&value, 0, &mut out);
        Ok(out.join("\n"))
    }

    fn render(value: &Value, indent: usize, out: &mut Vec<String>) {
        let pad = "  ".repeat(indent);
        match value {
            Value::Object(map) => {
                for (k, v) in map {
                    if is_nested(v) {
                        out.push(format!("{pad}{}:", k.blue().bold()));
                        render(v, indent + 1, out);
                    } else {
                        out.push(format!("{pad}{}: {}", k.blue().bold(), colored(v)));
                    }
                }
            }
            Value::Array(items) if items.is_empty() => {
                out.push(format!("{pad}{}", "(none)".dimmed()));
            }
            Value::Array(items) => {
                for item in items {
                    if is_nested(item) {
                        out.push(format!("{pad}-"));
                        render(item, indent + 1, out);
                    } else {
                        out.push(format!("{pad}- {}", colored(item)));
                    }
                }
            }
            other => out.push(format!("{pad}{}", colored(other))),
        }
    }

    fn is_nested(value: &Value) -> bool {
        matches!(value, Value::Object(_) | Value::Array(_))
    }

    fn colored(value: &Value) -> String {
        let text = scalar(value);
        match value {
            Value::Null => text.dimmed().to_string(),
            Value::Bool(_) => text.yellow().to_string(),
            Value::Number(_) => text.cyan().to_string(),
            _ => text.green().to_string(),
        }
    }
}

/// Renders a leaf value without JSON quoting.
fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Child {
        name: String,
        size: u64,
    }

    #[derive(Serialize)]
    struct Report {
        path: String,
        is_dir: bool,
        listing: Vec<Child>,
    }

    fn report() -> Report {
        Report {
            path: "/".to_string(),
            is_dir: true,
            listing: vec![
                Child {
                    name: "a.txt".to_string(),
                    size: 5,
                },
                Child {
                    name: "css".to_string(),
                    size: 0,
                },
            ],
        }
    }

    #[test]
    fn test_json_format() {
        let output = json::format(&report()).unwrap();
        let parsed: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["listing"][0]["name"], "a.txt");
        assert!(output.contains('\n'));
    }

    #[test]
    fn test_text_format_flattens_sorted_keys() {
        let output = text::format(&report()).unwrap();
        assert_eq!(
            output.lines().collect::<Vec<_>>(),
            vec![
                "is_dir: true",
                "listing.0.name: a.txt",
                "listing.0.size: 5",
                "listing.1.name: css",
                "listing.1.size: 0",
                "path: /",
            ]
        );
    }

    #[test]
    fn test_text_format_scalar() {
        assert_eq!(text::format(&42).unwrap(), "42");
    }

    #[test]
    fn test_pretty_format() {
        colored::control::set_override(false);
        let output = pretty::format(&report()).unwrap();
        assert!(output.contains("path: /"));
        assert!(output.contains("listing:"));
        assert!(output.contains("    name: a.txt"));
    }

    #[test]
    fn test_pretty_empty_array() {
        colored::control::set_override(false);
        let output = pretty::format(&serde_json::json!({"listing": []})).unwrap();
        assert_eq!(output, "listing:\n  (none)");
    }

    #[test]
    fn test_format_output_dispatch() {
        assert!(format_output(&report(), OutputFormat::Json).unwrap().starts_with('{'));
        assert!(format_output(&report(), OutputFormat::Text).unwrap().starts_with("is_dir"));
    }
}
