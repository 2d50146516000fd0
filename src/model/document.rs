//! Document-level types.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{ContentNode, ImageAsset, RefId};

/// Result of extracting a document's structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedDocument {
    /// Source metadata
    pub metadata: Metadata,

    /// Content nodes in document order
    pub nodes: Vec<ContentNode>,

    /// Image assets keyed by reference
    pub images: BTreeMap<RefId, ImageAsset>,

    /// Directory the image files were written to
    pub image_dir: PathBuf,
}

impl ExtractedDocument {
    /// Get the number of extracted nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the number of image nodes (resolved or not).
    pub fn image_node_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_image()).count()
    }

    /// Get an image asset by reference.
    pub fn get_image(&self, ref_id: RefId) -> Option<&ImageAsset> {
        self.images.get(&ref_id)
    }

    /// Image nodes without a decoded asset.
    pub fn unresolved_images(&self) -> Vec<RefId> {
        self.nodes
            .iter()
            .filter_map(ContentNode::ref_id)
            .filter(|id| !self.images.contains_key(id))
            .collect()
    }

    /// Get plain text content of the document, one node per line.
    pub fn plain_text(&self) -> String {
        self.nodes
            .iter()
            .filter_map(ContentNode::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Source document metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title, if the source declares one
    pub title: Option<String>,

    /// Source format name ("docx" or "pdf")
    pub format: String,

    /// Number of pages (PDF only)
    pub page_count: Option<u32>,
}

impl Metadata {
    /// Create metadata for a given source format.
    pub fn with_format(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ImageFormat;

    #[test]
    fn test_unresolved_images() {
        let mut images = BTreeMap::new();
        images.insert(
            RefId::new(1),
            ImageAsset::new(RefId::new(1), "a.png", 1, 1, ImageFormat::Png),
        );

        let doc = ExtractedDocument {
            metadata: Metadata::with_format("docx"),
            nodes: vec![
                ContentNode::image(RefId::new(1)),
                ContentNode::paragraph("text"),
                ContentNode::image(RefId::new(2)),
            ],
            images,
            image_dir: PathBuf::from("out"),
        };

        assert_eq!(doc.image_node_count(), 2);
        assert_eq!(doc.unresolved_images(), vec![RefId::new(2)]);
        assert_eq!(doc.plain_text(), "text");
    }
}
