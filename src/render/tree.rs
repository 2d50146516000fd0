//! Page-builder output tree.
//!
//! The tree mirrors the page builder's import format: one page holding a
//! single section, the section holding one column per layout column, and
//! each column holding one widget per content node.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::layout::{
    distribute_or_first_column, ColumnSpec, DistributionResult, DistributionStrategy,
    LayoutDefinition, Spacing,
};
use crate::model::{ContentNode, ImageAsset, RefId};

use super::ids::generate_id;
use super::options::TreeOptions;

/// Format version written to every tree.
pub const TREE_VERSION: &str = "0.4";

/// Document type written to every tree.
pub const TREE_TYPE: &str = "page";

/// Root of the page-builder document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputTree {
    /// Format version, always "0.4"
    pub version: String,
    /// Page title
    pub title: String,
    /// Document type, always "page"
    #[serde(rename = "type")]
    pub doc_type: String,
    /// Top-level sections (exactly one when built by this crate)
    pub content: Vec<Section>,
}

impl OutputTree {
    /// Create a tree holding one section.
    pub fn new(title: impl Into<String>, section: Section) -> Self {
        Self {
            version: TREE_VERSION.to_string(),
            title: title.into(),
            doc_type: TREE_TYPE.to_string(),
            content: vec![section],
        }
    }

    /// Iterate over every widget in the tree, in column order.
    pub fn widgets(&self) -> impl Iterator<Item = &Widget> {
        self.content
            .iter()
            .flat_map(|s| s.elements.iter())
            .flat_map(|c| c.elements.iter())
    }

    /// Get the total number of widgets.
    pub fn widget_count(&self) -> usize {
        self.widgets().count()
    }

    /// Get the number of columns across all sections.
    pub fn column_count(&self) -> usize {
        self.content.iter().map(|s| s.elements.len()).sum()
    }
}

/// A horizontal band of columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Element id
    pub id: String,
    /// Always "section"
    #[serde(rename = "elType")]
    pub el_type: String,
    /// Spacing settings copied from the layout
    pub settings: Spacing,
    /// Columns in layout order
    pub elements: Vec<Column>,
}

impl Section {
    /// Create a section with a fresh id.
    pub fn new(settings: Spacing, elements: Vec<Column>) -> Self {
        Self {
            id: generate_id(),
            el_type: "section".to_string(),
            settings,
            elements,
        }
    }
}

/// One column of a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Element id
    pub id: String,
    /// Always "column"
    #[serde(rename = "elType")]
    pub el_type: String,
    /// Column width settings
    pub settings: ColumnSettings,
    /// Widgets in node order
    pub elements: Vec<Widget>,
}

impl Column {
    /// Create a column with a fresh id.
    pub fn new(width: f64, elements: Vec<Widget>) -> Self {
        Self {
            id: generate_id(),
            el_type: "column".to_string(),
            settings: ColumnSettings {
                column_size: width,
                inline_size: None,
            },
            elements,
        }
    }

    /// Width in percent of the section.
    pub fn width(&self) -> f64 {
        self.settings.column_size
    }
}

/// Column settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSettings {
    /// Relative width in percent
    #[serde(rename = "_column_size", serialize_with = "serialize_width")]
    pub column_size: f64,
    /// Explicit inline width, always null on import
    #[serde(rename = "_inline_size")]
    pub inline_size: Option<f64>,
}

/// Whole percentages are written as integers.
fn serialize_width<S: Serializer>(width: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if width.fract() == 0.0 && width.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*width as i64)
    } else {
        serializer.serialize_f64(*width)
    }
}

/// Widget types emitted by the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetType {
    /// Heading widget
    Heading,
    /// Rich text widget
    TextEditor,
    /// Image widget
    Image,
}

impl WidgetType {
    /// Name used in the `widgetType` field.
    pub fn name(&self) -> &'static str {
        match self {
            WidgetType::Heading => "heading",
            WidgetType::TextEditor => "text-editor",
            WidgetType::Image => "image",
        }
    }
}

/// A leaf content element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    /// Element id
    pub id: String,
    /// Always "widget"
    #[serde(rename = "elType")]
    pub el_type: String,
    /// Type-specific settings
    pub settings: WidgetSettings,
    /// Always empty
    pub elements: Vec<Value>,
    /// Widget type
    #[serde(rename = "widgetType")]
    pub widget_type: WidgetType,
}

impl Widget {
    fn new(widget_type: WidgetType, settings: WidgetSettings) -> Self {
        Self {
            id: generate_id(),
            el_type: "widget".to_string(),
            settings,
            elements: Vec::new(),
            widget_type,
        }
    }

    /// Create a heading widget.
    pub fn heading(title: impl Into<String>, level: u8) -> Self {
        Self::new(
            WidgetType::Heading,
            WidgetSettings::Heading {
                title: title.into(),
                header_size: format!("h{}", level.clamp(1, 6)),
            },
        )
    }

    /// Create a text widget.
    pub fn text(content: impl Into<String>) -> Self {
        Self::new(
            WidgetType::TextEditor,
            WidgetSettings::Text {
                editor: content.into(),
            },
        )
    }

    /// Create an image widget.
    pub fn image(image: ImageSettings, image_size: impl Into<String>) -> Self {
        Self::new(
            WidgetType::Image,
            WidgetSettings::Image {
                image,
                image_size: image_size.into(),
            },
        )
    }

    /// Heading level parsed from `header_size`, if this is a heading.
    pub fn heading_level(&self) -> Option<u8> {
        match &self.settings {
            WidgetSettings::Heading { header_size, .. } => header_size
                .strip_prefix('h')
                .and_then(|n| n.parse().ok()),
            _ => None,
        }
    }

    /// Image URL, if this is an image.
    pub fn image_url(&self) -> Option<&str> {
        match &self.settings {
            WidgetSettings::Image { image, .. } => Some(&image.url),
            _ => None,
        }
    }
}

/// Widget settings, one shape per widget type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WidgetSettings {
    /// Heading settings
    Heading {
        /// Heading text
        title: String,
        /// "h1" to "h6"
        header_size: String,
    },
    /// Text settings
    Text {
        /// Paragraph text
        editor: String,
    },
    /// Image settings
    Image {
        /// Image source
        image: ImageSettings,
        /// Rendition name
        image_size: String,
    },
}

/// Image source of an image widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSettings {
    /// Public URL, empty or placeholder when unresolved
    pub url: String,
    /// Media library id, empty on import
    pub id: String,
    /// Pixel width
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Pixel height
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// Builds output trees from distributed nodes.
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder {
    options: TreeOptions,
}

impl TreeBuilder {
    /// Create a builder with the given options.
    pub fn new(options: TreeOptions) -> Self {
        Self { options }
    }

    /// Get the builder options.
    pub fn options(&self) -> &TreeOptions {
        &self.options
    }

    /// Build a tree from an already distributed node list.
    ///
    /// Columns are paired with distribution slots in order; a slot without
    /// a matching layout column is dropped with a warning.
    pub fn build(
        &self,
        distribution: &DistributionResult,
        images: &BTreeMap<RefId, ImageAsset>,
        layout: &LayoutDefinition,
        document_title: Option<&str>,
    ) -> OutputTree {
        let specs = column_specs(layout);
        if distribution.len() > specs.len() {
            log::warn!(
                "Distribution has {} slots for {} columns, extra slots dropped",
                distribution.len(),
                specs.len()
            );
        }

        let columns: Vec<Column> = specs
            .iter()
            .enumerate()
            .map(|(idx, spec)| {
                let widgets = distribution
                    .get(idx)
                    .map(|nodes| self.widgets_for(nodes, images))
                    .unwrap_or_default();
                Column::new(spec.width, widgets)
            })
            .collect();

        let section = Section::new(layout.spacing.clone().unwrap_or_default(), columns);
        let tree = OutputTree::new(self.title_for(document_title, layout), section);

        log::debug!(
            "Built tree with {} columns and {} widgets",
            tree.column_count(),
            tree.widget_count()
        );
        tree
    }

    /// Distribute nodes over a layout and build the tree.
    ///
    /// A failing strategy degrades to "everything in the first column".
    pub fn build_from_nodes(
        &self,
        nodes: &[ContentNode],
        images: &BTreeMap<RefId, ImageAsset>,
        layout: &LayoutDefinition,
        strategy: DistributionStrategy,
        document_title: Option<&str>,
    ) -> OutputTree {
        let specs = column_specs(layout);
        let distribution = distribute_or_first_column(nodes, &specs, strategy);
        self.build(&distribution, images, layout, document_title)
    }

    /// Widgets for one column's nodes.
    fn widgets_for(
        &self,
        nodes: &[ContentNode],
        images: &BTreeMap<RefId, ImageAsset>,
    ) -> Vec<Widget> {
        nodes
            .iter()
            .map(|node| self.widget_for(node, images))
            .collect()
    }

    fn widget_for(&self, node: &ContentNode, images: &BTreeMap<RefId, ImageAsset>) -> Widget {
        match node {
            ContentNode::Heading { level, text } => Widget::heading(text.as_str(), *level),
            ContentNode::Paragraph { text } => Widget::text(text.as_str()),
            ContentNode::Image { ref_id } => {
                Widget::image(self.image_settings(*ref_id, images), &self.options.image_size)
            }
        }
    }

    fn image_settings(&self, ref_id: RefId, images: &BTreeMap<RefId, ImageAsset>) -> ImageSettings {
        match images.get(&ref_id) {
            Some(asset) => ImageSettings {
                url: self
                    .options
                    .media_url(&asset.stored_filename)
                    .unwrap_or_else(|| self.options.placeholder_url.clone()),
                id: String::new(),
                width: Some(asset.width),
                height: Some(asset.height),
            },
            None => {
                log::warn!("{}: no image asset, using placeholder", ref_id);
                ImageSettings {
                    url: self.options.placeholder_url.clone(),
                    id: String::new(),
                    width: None,
                    height: None,
                }
            }
        }
    }

    fn title_for(&self, document_title: Option<&str>, layout: &LayoutDefinition) -> String {
        self.options
            .title
            .as_deref()
            .or(document_title)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Imported document - {}", layout.display_name))
    }
}

/// Layout columns, or one full-width column for a layout without any.
fn column_specs(layout: &LayoutDefinition) -> Vec<ColumnSpec> {
    if layout.columns.is_empty() {
        vec![ColumnSpec::main(100.0)]
    } else {
        layout.columns.clone()
    }
}

/// Distribute nodes over a layout and build the output tree.
pub fn build_output_tree(
    nodes: &[ContentNode],
    images: &BTreeMap<RefId, ImageAsset>,
    layout: &LayoutDefinition,
    strategy: DistributionStrategy,
    options: &TreeOptions,
) -> OutputTree {
    TreeBuilder::new(options.clone()).build_from_nodes(nodes, images, layout, strategy, None)
}
