//! Conversion statistics.

use serde::{Deserialize, Serialize};

use crate::layout::DistributionStrategy;
use crate::model::{ContentNode, ExtractedDocument};

/// Statistics collected during a conversion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Number of pages (PDF only)
    pub page_count: u32,

    /// Total number of content nodes
    pub node_count: u32,

    /// Number of headings
    pub heading_count: u32,

    /// Number of paragraphs
    pub paragraph_count: u32,

    /// Number of image nodes
    pub image_count: u32,

    /// Number of image nodes backed by an extracted file
    pub resolved_image_count: u32,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,

    /// Character count (excluding whitespace)
    pub char_count: u32,

    /// Layout used for the tree
    pub layout: Option<String>,

    /// Distribution strategy used for the tree
    pub strategy: Option<DistributionStrategy>,
}

impl ConversionStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect statistics for an extracted document.
    pub fn from_document(doc: &ExtractedDocument) -> Self {
        let mut stats = Self {
            page_count: doc.metadata.page_count.unwrap_or(0),
            ..Default::default()
        };
        for node in &doc.nodes {
            stats.add_node(node);
        }
        stats.resolved_image_count = doc
            .nodes
            .iter()
            .filter_map(ContentNode::ref_id)
            .filter(|id| doc.images.contains_key(id))
            .count() as u32;
        stats
    }

    /// Record the layout and strategy used.
    pub fn with_layout(
        mut self,
        layout: impl Into<String>,
        strategy: DistributionStrategy,
    ) -> Self {
        self.layout = Some(layout.into());
        self.strategy = Some(strategy);
        self
    }

    /// Count one node.
    pub fn add_node(&mut self, node: &ContentNode) {
        self.node_count += 1;
        match node {
            ContentNode::Heading { text, .. } => {
                self.heading_count += 1;
                self.count_text(text);
            }
            ContentNode::Paragraph { text } => {
                self.paragraph_count += 1;
                self.count_text(text);
            }
            ContentNode::Image { .. } => self.image_count += 1,
        }
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }

    /// Number of image nodes rendered with a placeholder.
    pub fn unresolved_image_count(&self) -> u32 {
        self.image_count.saturating_sub(self.resolved_image_count)
    }

    /// Merge another stats instance into this one.
    ///
    /// Layout and strategy are kept only when both sides agree.
    pub fn merge(&mut self, other: &ConversionStats) {
        self.page_count += other.page_count;
        self.node_count += other.node_count;
        self.heading_count += other.heading_count;
        self.paragraph_count += other.paragraph_count;
        self.image_count += other.image_count;
        self.resolved_image_count += other.resolved_image_count;
        self.word_count += other.word_count;
        self.char_count += other.char_count;
        if self.layout != other.layout {
            self.layout = None;
        }
        if self.strategy != other.strategy {
            self.strategy = None;
        }
    }
}
