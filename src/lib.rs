//! # docpage
//!
//! Convert word-processing documents and PDFs into page-builder JSON.
//!
//! A document is walked in physical order into headings, paragraphs and
//! image references; embedded images are written to a directory; the
//! resulting node sequence is distributed over the columns of a named
//! layout and wrapped into the section/column/widget tree a page builder
//! imports.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docpage::{build_output_tree, extract_structure, render, DistributionStrategy};
//!
//! fn main() -> docpage::Result<()> {
//!     let doc = extract_structure("report.docx")?;
//!
//!     let tree = build_output_tree(
//!         &doc.nodes,
//!         &doc.images,
//!         "blog_layout",
//!         DistributionStrategy::Auto,
//!         Some("https://example.com/uploads"),
//!     );
//!     println!("{}", render::to_json(&tree, render::JsonFormat::Pretty)?);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Two source formats**: DOCX (paragraph styles) and PDF (font sizes)
//! - **Image extraction**: original bytes, pixel dimensions, stable references
//! - **Layouts**: six built-in column layouts plus custom registrations
//! - **Distribution strategies**: auto, sequential, alternating, balanced
//! - **Validation**: import-shape checks for any page-builder JSON
//! - **Batch conversion**: independent documents converted in parallel

pub mod convert;
pub mod detect;
pub mod error;
pub mod layout;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use convert::{
    convert_batch, BatchItem, ConvertOptions, ConvertResult, ConverterRegistry,
    DocumentConverter, DocxConverter, PdfConverter,
};
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_supported, SourceFormat};
pub use error::{Error, Result};
pub use layout::{
    ColumnRole, ColumnSpec, DistributionStrategy, LayoutDefinition, LayoutRegistry, Template,
    DEFAULT_LAYOUT,
};
pub use model::{
    parse_nodes_json, ContentNode, ExtractedDocument, ImageAsset, ImageFormat, Metadata, RefId,
};
pub use parser::{FontSizeThresholds, ParseOptions};
pub use render::{
    validate_tree_json, ConversionStats, JsonFormat, OutputTree, TreeOptions, ValidationReport,
};

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Extract the structure of a DOCX or PDF file.
///
/// Images are written to a fresh directory under the system temp dir.
///
/// # Errors
///
/// * [`Error::DocumentUnreadable`] if the file is missing, cannot be parsed,
///   or is neither DOCX nor PDF
/// * [`Error::EmptyDocument`] if no content node is found
///
/// # Example
///
/// ```no_run
/// use docpage::extract_structure;
///
/// let doc = extract_structure("report.docx").unwrap();
/// println!("{} nodes, images in {}", doc.node_count(), doc.image_dir.display());
/// ```
pub fn extract_structure<P: AsRef<Path>>(path: P) -> Result<ExtractedDocument> {
    extract_structure_with_options(path, &ParseOptions::default())
}

/// Extract the structure of a file with custom options.
///
/// # Example
///
/// ```no_run
/// use docpage::{extract_structure_with_options, ParseOptions};
///
/// let options = ParseOptions::new()
///     .with_image_dir("./out/images")
///     .with_image_basename("report");
/// let doc = extract_structure_with_options("report.pdf", &options).unwrap();
/// ```
pub fn extract_structure_with_options<P: AsRef<Path>>(
    path: P,
    options: &ParseOptions,
) -> Result<ExtractedDocument> {
    ConverterRegistry::with_defaults().extract(path.as_ref(), options)
}

/// Extract the structure of an in-memory DOCX or PDF.
pub fn extract_structure_from_bytes(
    data: &[u8],
    options: &ParseOptions,
) -> Result<ExtractedDocument> {
    let format = detect_format_from_bytes(data).map_err(Error::into_unreadable)?;
    let converter = ConverterRegistry::with_defaults()
        .get_by_name(format.name())
        .ok_or_else(|| Error::DocumentUnreadable(format!("no converter for {}", format)))?;
    converter.extract_bytes(data, options)
}

/// Distribute nodes over a built-in layout and build the output tree.
///
/// Unknown layout names fall back to the single column. Without a base
/// URL, image widgets carry an empty URL.
pub fn build_output_tree(
    nodes: &[ContentNode],
    images: &BTreeMap<RefId, ImageAsset>,
    layout_name: &str,
    strategy: DistributionStrategy,
    base_media_url: Option<&str>,
) -> OutputTree {
    let layout = LayoutRegistry::builtin().resolve(layout_name);
    let mut options = TreeOptions::default();
    if let Some(url) = base_media_url {
        options = options.with_base_url(url);
    }
    render::build_output_tree(nodes, images, &layout, strategy, &options)
}

/// Convert a file to page-builder JSON with default options.
///
/// # Example
///
/// ```no_run
/// use docpage::to_json;
///
/// let json = to_json("report.docx").unwrap();
/// std::fs::write("page.json", json).unwrap();
/// ```
pub fn to_json<P: AsRef<Path>>(path: P) -> Result<String> {
    let registry = ConverterRegistry::with_defaults();
    let result = registry.convert(path.as_ref(), &ConvertOptions::default())?;
    Ok(result.content)
}

/// Builder for converting documents.
///
/// # Example
///
/// ```no_run
/// use docpage::{DistributionStrategy, DocPage};
///
/// let result = DocPage::new()
///     .with_layout("two_columns_sidebar_right")
///     .with_strategy(DistributionStrategy::Auto)
///     .with_base_url("https://example.com/uploads/2024/05")
///     .with_image_dir("./out/images")
///     .convert("report.docx")?;
/// std::fs::write("./out/page.json", &result.content)?;
/// # Ok::<(), docpage::Error>(())
/// ```
pub struct DocPage {
    options: ConvertOptions,
    registry: ConverterRegistry,
}

impl DocPage {
    /// Create a new builder with the default converters and layouts.
    pub fn new() -> Self {
        Self {
            options: ConvertOptions::default(),
            registry: ConverterRegistry::with_defaults(),
        }
    }

    /// Use a custom layout registry.
    pub fn with_layouts(mut self, layouts: LayoutRegistry) -> Self {
        self.registry = self.registry.with_layouts(layouts);
        self
    }

    /// Set the layout name.
    pub fn with_layout(mut self, layout: impl Into<String>) -> Self {
        self.options = self.options.with_layout(layout);
        self
    }

    /// Set the distribution strategy.
    pub fn with_strategy(mut self, strategy: DistributionStrategy) -> Self {
        self.options = self.options.with_strategy(strategy);
        self
    }

    /// Use a predefined template.
    pub fn with_template(mut self, name: &str) -> Self {
        self.options = self.options.with_template(name, self.registry.layouts());
        self
    }

    /// Set the media base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.options = self.options.with_base_url(url);
        self
    }

    /// Set the image output directory.
    pub fn with_image_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.options = self.options.with_image_dir(dir);
        self
    }

    /// Skip image extraction.
    pub fn without_images(mut self) -> Self {
        self.options.parse = self.options.parse.without_images();
        self
    }

    /// Set the page title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.options.tree = self.options.tree.with_title(title);
        self
    }

    /// Set the JSON output format.
    pub fn with_format(mut self, format: JsonFormat) -> Self {
        self.options = self.options.with_format(format);
        self
    }

    /// Collect conversion statistics.
    pub fn with_stats(mut self) -> Self {
        self.options = self.options.with_stats(true);
        self
    }

    /// Get the conversion options.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Convert a file.
    pub fn convert<P: AsRef<Path>>(&self, path: P) -> Result<ConvertResult> {
        self.registry.convert(path.as_ref(), &self.options)
    }

    /// Convert in-memory bytes.
    pub fn convert_bytes(&self, data: &[u8]) -> Result<ConvertResult> {
        self.registry.convert_bytes(data, &self.options)
    }
}

impl Default for DocPage {
    fn default() -> Self {
        Self::new()
    }
}
