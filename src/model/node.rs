//! Content nodes extracted from a document.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// One classified unit of document content, in original document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentNode {
    /// A heading (level 1-6)
    Heading {
        /// Heading level
        level: u8,
        /// Heading text, never empty
        text: String,
    },

    /// A body paragraph
    Paragraph {
        /// Paragraph text, never empty
        text: String,
    },

    /// A reference to an embedded image
    Image {
        /// Handle linking the node to its image asset
        ref_id: RefId,
    },
}

impl ContentNode {
    /// Create a heading node. The level is clamped to 1-6.
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        ContentNode::Heading {
            level: level.clamp(1, 6),
            text: text.into(),
        }
    }

    /// Create a paragraph node.
    pub fn paragraph(text: impl Into<String>) -> Self {
        ContentNode::Paragraph { text: text.into() }
    }

    /// Create an image node.
    pub fn image(ref_id: RefId) -> Self {
        ContentNode::Image { ref_id }
    }

    /// Get the heading level, if this is a heading.
    pub fn heading_level(&self) -> Option<u8> {
        match self {
            ContentNode::Heading { level, .. } => Some(*level),
            _ => None,
        }
    }

    /// Get the text of a heading or paragraph.
    pub fn text(&self) -> Option<&str> {
        match self {
            ContentNode::Heading { text, .. } | ContentNode::Paragraph { text } => Some(text),
            ContentNode::Image { .. } => None,
        }
    }

    /// Get the image reference, if this is an image.
    pub fn ref_id(&self) -> Option<RefId> {
        match self {
            ContentNode::Image { ref_id } => Some(*ref_id),
            _ => None,
        }
    }

    /// Check if this is a heading.
    pub fn is_heading(&self) -> bool {
        matches!(self, ContentNode::Heading { .. })
    }

    /// Check if this is a paragraph.
    pub fn is_paragraph(&self) -> bool {
        matches!(self, ContentNode::Paragraph { .. })
    }

    /// Check if this is an image.
    pub fn is_image(&self) -> bool {
        matches!(self, ContentNode::Image { .. })
    }

    /// Short kind name ("heading", "paragraph", "image").
    pub fn kind(&self) -> &'static str {
        match self {
            ContentNode::Heading { .. } => "heading",
            ContentNode::Paragraph { .. } => "paragraph",
            ContentNode::Image { .. } => "image",
        }
    }

    /// Interpret one loosely-typed JSON item as a node.
    ///
    /// Accepts the crate's own serialized form as well as the legacy item
    /// form (`{"type": "h2", "content": ...}`, `{"type": "p", ...}`,
    /// `{"type": "image", "ref_id": "__IMAGE_1__"}`).
    pub fn from_value(value: &Value) -> Result<Self> {
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::UnrecognizedNodeKind(format!("missing type in {}", value)))?;

        let text_field = || {
            value
                .get("text")
                .or_else(|| value.get("content"))
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .ok_or_else(|| Error::UnrecognizedNodeKind(format!("{} without text", kind)))
        };

        match kind {
            "heading" => {
                let level = value
                    .get("level")
                    .and_then(Value::as_u64)
                    .filter(|l| (1..=6).contains(l))
                    .ok_or_else(|| {
                        Error::UnrecognizedNodeKind("heading without valid level".into())
                    })?;
                Ok(ContentNode::heading(level as u8, text_field()?))
            }
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = kind[1..].parse::<u8>().unwrap_or(1);
                Ok(ContentNode::heading(level, text_field()?))
            }
            "paragraph" | "p" => Ok(ContentNode::paragraph(text_field()?)),
            "image" => {
                let raw = value
                    .get("ref_id")
                    .or_else(|| value.get("refId"))
                    .and_then(Value::as_str)
                    .ok_or_else(|| Error::UnrecognizedNodeKind("image without ref_id".into()))?;
                Ok(ContentNode::image(raw.parse()?))
            }
            other => Err(Error::UnrecognizedNodeKind(other.to_string())),
        }
    }
}

/// Parse a JSON array of nodes, dropping entries of unknown kind.
///
/// Unknown or malformed entries are logged and skipped; only a payload
/// that is not a JSON array fails.
pub fn parse_nodes_json(json: &str) -> Result<Vec<ContentNode>> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| Error::Other(format!("Invalid node JSON: {}", e)))?;
    let items = value
        .as_array()
        .ok_or_else(|| Error::Other("Node JSON must be an array".into()))?;

    let mut nodes = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        match ContentNode::from_value(item) {
            Ok(node) => nodes.push(node),
            Err(e) => log::warn!("Dropping node #{}: {}", idx, e),
        }
    }
    Ok(nodes)
}

/// Stable textual handle linking an image node to its binary asset.
///
/// Rendered as `__IMAGE_<n>__`, with `n` a 1-based counter assigned in
/// document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RefId(u32);

impl RefId {
    /// Create a reference from its 1-based sequence number.
    pub fn new(index: u32) -> Self {
        Self(index.max(1))
    }

    /// The 1-based sequence number.
    pub fn index(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for RefId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "__IMAGE_{}__", self.0)
    }
}

fn ref_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^__IMAGE_([1-9][0-9]*)__$").unwrap())
}

impl FromStr for RefId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ref_id_pattern()
            .captures(s.trim())
            .and_then(|caps| caps[1].parse::<u32>().ok())
            .map(RefId)
            .ok_or_else(|| Error::UnrecognizedNodeKind(format!("invalid image reference: {}", s)))
    }
}

impl TryFrom<String> for RefId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<RefId> for String {
    fn from(id: RefId) -> Self {
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ref_id_display_and_parse() {
        let id = RefId::new(3);
        assert_eq!(id.to_string(), "__IMAGE_3__");
        assert_eq!("__IMAGE_3__".parse::<RefId>().unwrap(), id);
        assert!("__IMAGE_0__".parse::<RefId>().is_err());
        assert!("IMAGE_3".parse::<RefId>().is_err());
    }

    #[test]
    fn test_heading_level_clamped() {
        assert_eq!(ContentNode::heading(9, "x").heading_level(), Some(6));
        assert_eq!(ContentNode::heading(0, "x").heading_level(), Some(1));
    }

    #[test]
    fn test_node_serialization_shape() {
        let node = ContentNode::image(RefId::new(2));
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value, json!({"type": "image", "ref_id": "__IMAGE_2__"}));

        let node = ContentNode::heading(2, "Intro");
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value, json!({"type": "heading", "level": 2, "text": "Intro"}));
    }

    #[test]
    fn test_from_value_legacy_items() {
        let h = ContentNode::from_value(&json!({"type": "h3", "content": "Title"})).unwrap();
        assert_eq!(h, ContentNode::heading(3, "Title"));

        let p = ContentNode::from_value(&json!({"type": "p", "content": " Body "})).unwrap();
        assert_eq!(p, ContentNode::paragraph("Body"));

        let img =
            ContentNode::from_value(&json!({"type": "image", "ref_id": "__IMAGE_4__"})).unwrap();
        assert_eq!(img.ref_id(), Some(RefId::new(4)));
    }

    #[test]
    fn test_from_value_rejects_unknown_kind() {
        let result = ContentNode::from_value(&json!({"type": "table", "rows": []}));
        assert!(matches!(result, Err(Error::UnrecognizedNodeKind(_))));

        let result = ContentNode::from_value(&json!({"type": "p", "content": "   "}));
        assert!(matches!(result, Err(Error::UnrecognizedNodeKind(_))));
    }

    #[test]
    fn test_parse_nodes_json_drops_unknown() {
        let json = r#"[
            {"type": "h1", "content": "Title"},
            {"type": "quote", "content": "ignored"},
            {"type": "paragraph", "text": "Body"}
        ]"#;
        let nodes = parse_nodes_json(json).unwrap();
        assert_eq!(
            nodes,
            vec![ContentNode::heading(1, "Title"), ContentNode::paragraph("Body")]
        );
    }

    #[test]
    fn test_parse_nodes_json_requires_array() {
        assert!(parse_nodes_json(r#"{"type": "p"}"#).is_err());
    }
}
