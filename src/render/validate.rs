//! Validation of page-builder JSON before import.
//!
//! Works on raw JSON rather than [`OutputTree`](super::OutputTree) so that
//! hand-edited or third-party files can be checked too.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::tree::{TREE_TYPE, TREE_VERSION};

/// Document types the page builder accepts at the root.
pub const KNOWN_TYPES: &[&str] = &["page", "section", "widget", "post", "container"];

const ELEMENT_FIELDS: &[&str] = &["id", "elType", "settings", "elements"];

/// Outcome of validating a tree JSON document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Problems that make the file unusable
    pub errors: Vec<String>,
    /// Deviations that an import tolerates
    pub warnings: Vec<String>,
    /// Element counts
    pub stats: TreeStatistics,
}

impl ValidationReport {
    /// Whether the document has no errors.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

/// Element counts of a tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStatistics {
    /// Number of top-level sections
    pub section_count: usize,
    /// Number of widgets inside columns
    pub widget_count: usize,
    /// Widgets per `widgetType`
    pub widget_types: BTreeMap<String, usize>,
}

/// Validate a JSON document against the page-builder import shape.
pub fn validate_tree_json(json: &str) -> ValidationReport {
    let mut report = ValidationReport::default();

    let data: Value = match serde_json::from_str(json) {
        Ok(value) => value,
        Err(e) => {
            report.error(format!(
                "JSON parse error at line {}, column {}: {}",
                e.line(),
                e.column(),
                e
            ));
            return report;
        }
    };

    let Some(root) = data.as_object() else {
        report.error("Root must be an object, not an array or scalar");
        return report;
    };

    check_root(root, &mut report);
    if let Some(content) = root.get("content").and_then(Value::as_array) {
        check_elements(content, &mut report);
    }

    log::debug!(
        "Validated tree: {} errors, {} warnings",
        report.errors.len(),
        report.warnings.len()
    );
    report
}

fn check_root(root: &Map<String, Value>, report: &mut ValidationReport) {
    for field in ["version", "type", "content"] {
        if !root.contains_key(field) {
            report.error(format!("Missing required field '{}'", field));
        }
    }

    match root.get("version") {
        Some(Value::String(version)) if version != TREE_VERSION => report.warn(format!(
            "Version '{}' (recommended: '{}')",
            version, TREE_VERSION
        )),
        Some(Value::String(_)) | None => {}
        Some(_) => report.error("Field 'version' must be a string"),
    }

    if let Some(doc_type) = root.get("type") {
        let known = doc_type
            .as_str()
            .is_some_and(|t| KNOWN_TYPES.contains(&t));
        if !known {
            report.warn(format!(
                "Non-standard type {} (expected '{}' or one of: {})",
                doc_type,
                TREE_TYPE,
                KNOWN_TYPES.join(", ")
            ));
        }
    }

    match root.get("content") {
        Some(Value::Array(content)) => match content.first() {
            None => report.warn("Field 'content' is empty"),
            Some(Value::Object(first)) => {
                for field in ELEMENT_FIELDS {
                    if !first.contains_key(*field) {
                        report.error(format!("content[0] is missing '{}'", field));
                    }
                }
            }
            Some(_) => report.error("Entries of 'content' must be objects"),
        },
        Some(_) => report.error("Field 'content' must be an array"),
        None => {}
    }

    if !root.contains_key("title") {
        report.warn("Field 'title' is missing (optional but recommended)");
    }
}

fn el_type(value: &Value) -> Option<&str> {
    value.get("elType").and_then(Value::as_str)
}

fn check_elements(content: &[Value], report: &mut ValidationReport) {
    for (idx, section) in content.iter().enumerate() {
        if el_type(section) != Some("section") {
            continue;
        }
        report.stats.section_count += 1;

        let columns = section
            .get("elements")
            .and_then(Value::as_array)
            .filter(|cols| !cols.is_empty());
        let Some(columns) = columns else {
            report.warn(format!("Section #{}: no columns", idx));
            continue;
        };

        for (col_idx, column) in columns.iter().enumerate() {
            let is_column = el_type(column) == Some("column");
            if !is_column {
                report.warn(format!(
                    "Section #{}: element #{} is not a column",
                    idx, col_idx
                ));
            }

            let Some(widgets) = column.get("elements").and_then(Value::as_array) else {
                continue;
            };
            for (widget_idx, widget) in widgets.iter().enumerate() {
                let is_widget = el_type(widget) == Some("widget");
                if !is_widget {
                    report.warn(format!(
                        "Section #{}, column #{}: element #{} is not a widget",
                        idx, col_idx, widget_idx
                    ));
                }

                let widget_type = widget.get("widgetType").and_then(Value::as_str);
                if widget_type.is_none() {
                    report.error(format!(
                        "Section #{}, column #{}, widget #{}: missing 'widgetType'",
                        idx, col_idx, widget_idx
                    ));
                }

                if is_column && is_widget {
                    report.stats.widget_count += 1;
                    *report
                        .stats
                        .widget_types
                        .entry(widget_type.unwrap_or("unknown").to_string())
                        .or_insert(0) += 1;
                }
            }
        }
    }
}
