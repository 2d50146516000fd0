//! Validation of page-builder JSON produced elsewhere.

use docpage::validate_tree_json;
use serde_json::json;

#[test]
fn test_hand_written_page_is_valid() {
    let page = json!({
        "version": "0.4",
        "title": "Landing",
        "type": "page",
        "content": [{
            "id": "a1b2c3d",
            "elType": "section",
            "settings": {"padding": "40px"},
            "elements": [
                {
                    "id": "e5f6g7h",
                    "elType": "column",
                    "settings": {"_column_size": 50},
                    "elements": [{
                        "id": "i8j9k0l",
                        "elType": "widget",
                        "settings": {"title": "Hello", "header_size": "h2"},
                        "elements": [],
                        "widgetType": "heading"
                    }]
                },
                {
                    "id": "m1n2o3p",
                    "elType": "column",
                    "settings": {"_column_size": 50},
                    "elements": [{
                        "id": "q4r5s6t",
                        "elType": "widget",
                        "settings": {"editor": "<p>Body</p>"},
                        "elements": [],
                        "widgetType": "text-editor"
                    }]
                }
            ]
        }]
    });

    let report = validate_tree_json(&page.to_string());
    assert!(report.is_valid(), "{:?}", report.errors);
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    assert_eq!(report.stats.section_count, 1);
    assert_eq!(report.stats.widget_count, 2);
    assert_eq!(report.stats.widget_types.len(), 2);
}

#[test]
fn test_other_known_types_accepted() {
    for doc_type in ["section", "widget", "post", "container"] {
        let json = json!({"version": "0.4", "title": "t", "type": doc_type, "content": []});
        let report = validate_tree_json(&json.to_string());
        assert!(report.is_valid());
        assert!(
            !report.warnings.iter().any(|w| w.contains("Non-standard type")),
            "{}",
            doc_type
        );
    }
}

#[test]
fn test_first_section_missing_fields() {
    let json = json!({
        "version": "0.4",
        "title": "t",
        "type": "page",
        "content": [{"elType": "section"}]
    });
    let report = validate_tree_json(&json.to_string());
    assert!(!report.is_valid());
    assert_eq!(report.errors.len(), 3);
    assert!(report.errors.iter().all(|e| e.starts_with("content[0] is missing")));
}

#[test]
fn test_scalar_content_entry() {
    let json = r#"{"version": "0.4", "title": "t", "type": "page", "content": [42]}"#;
    let report = validate_tree_json(json);
    assert!(!report.is_valid());
    assert_eq!(report.stats.section_count, 0);
}

#[test]
fn test_non_column_and_non_widget_children_warn() {
    let json = json!({
        "version": "0.4",
        "title": "t",
        "type": "page",
        "content": [{
            "id": "a", "elType": "section", "settings": {},
            "elements": [{
                "id": "b", "elType": "container", "settings": {},
                "elements": [{
                    "id": "c", "elType": "section", "settings": {},
                    "elements": [], "widgetType": "heading"
                }]
            }]
        }]
    });
    let report = validate_tree_json(&json.to_string());
    assert!(report.is_valid());
    assert_eq!(report.warnings.len(), 2);
    assert!(report.warnings[0].contains("not a column"));
    assert!(report.warnings[1].contains("not a widget"));
    assert_eq!(report.stats.widget_count, 0);
}

#[test]
fn test_report_serializes() {
    let report = validate_tree_json("{}");
    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["errors"].as_array().unwrap().len(), 3);
    assert_eq!(value["stats"]["section_count"], 0);
}
