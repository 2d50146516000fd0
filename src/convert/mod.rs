//! Document converter module providing a plugin architecture for multiple formats.
//!
//! A converter knows how to open one source format as a
//! [`DocumentSource`]; the shared pipeline then walks it, extracts its
//! images, distributes the nodes over a layout and builds the output tree.
//!
//! # Example
//!
//! ```no_run
//! use docpage::convert::{ConvertOptions, ConverterRegistry};
//! use std::path::Path;
//!
//! fn main() -> docpage::Result<()> {
//!     let registry = ConverterRegistry::with_defaults();
//!     let options = ConvertOptions::new().with_layout("blog_layout");
//!
//!     let result = registry.convert(Path::new("report.docx"), &options)?;
//!     println!("{}", result.content);
//!     Ok(())
//! }
//! ```

mod batch;
mod docx;
mod pdf;

pub use batch::{convert_batch, BatchItem, IMAGES_DIR, PAGE_JSON};
pub use docx::DocxConverter;
pub use pdf::PdfConverter;

use crate::detect::{detect_format_from_bytes, detect_format_from_path};
use crate::error::{Error, Result};
use crate::layout::{DistributionStrategy, LayoutRegistry, DEFAULT_LAYOUT};
use crate::model::{ExtractedDocument, Metadata};
use crate::parser::{default_image_dir, extract_from_source, DocumentSource, ParseOptions};
use crate::render::{to_json, ConversionStats, JsonFormat, OutputTree, TreeBuilder, TreeOptions};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Options for document conversion.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Extraction options
    pub parse: ParseOptions,

    /// Tree building options
    pub tree: TreeOptions,

    /// Layout name (unknown names fall back to the single column)
    pub layout: String,

    /// Distribution strategy
    pub strategy: DistributionStrategy,

    /// JSON output format
    pub json_format: JsonFormat,

    /// Whether to collect statistics during conversion
    pub collect_stats: bool,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set extraction options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse = options;
        self
    }

    /// Set tree options.
    pub fn with_tree_options(mut self, options: TreeOptions) -> Self {
        self.tree = options;
        self
    }

    /// Set the layout name.
    pub fn with_layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = layout.into();
        self
    }

    /// Set the distribution strategy.
    pub fn with_strategy(mut self, strategy: DistributionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Use a predefined template's layout and strategy.
    ///
    /// Unknown template names leave the options unchanged.
    pub fn with_template(mut self, name: &str, registry: &LayoutRegistry) -> Self {
        match registry.template(name) {
            Some(template) => {
                self.layout = template.layout.clone();
                self.strategy = template.strategy;
            }
            None => log::warn!("Unknown template '{}', keeping {}", name, self.layout),
        }
        self
    }

    /// Set the media base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.tree = self.tree.with_base_url(url);
        self
    }

    /// Set the image directory.
    pub fn with_image_dir(mut self, dir: impl Into<std::path::PathBuf>) -> Self {
        self.parse = self.parse.with_image_dir(dir);
        self
    }

    /// Enable statistics collection.
    pub fn with_stats(mut self, collect: bool) -> Self {
        self.collect_stats = collect;
        self
    }

    /// Set JSON output format.
    pub fn with_format(mut self, format: JsonFormat) -> Self {
        self.json_format = format;
        self
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            parse: ParseOptions::default(),
            tree: TreeOptions::default(),
            layout: DEFAULT_LAYOUT.to_string(),
            strategy: DistributionStrategy::Auto,
            json_format: JsonFormat::Pretty,
            collect_stats: false,
        }
    }
}

/// Result of document conversion.
#[derive(Debug, Clone)]
pub struct ConvertResult {
    /// Serialized output tree
    pub content: String,

    /// Output tree
    pub tree: OutputTree,

    /// Extracted nodes and image assets
    pub document: ExtractedDocument,

    /// Conversion statistics (if collected)
    pub stats: Option<ConversionStats>,

    /// MIME type of the output
    pub mime_type: &'static str,
}

impl ConvertResult {
    /// Create a new conversion result.
    pub fn new(content: String, tree: OutputTree, document: ExtractedDocument) -> Self {
        Self {
            content,
            tree,
            document,
            stats: None,
            mime_type: "application/json",
        }
    }

    /// Set conversion statistics.
    pub fn with_stats(mut self, stats: ConversionStats) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Source document metadata.
    pub fn metadata(&self) -> &Metadata {
        &self.document.metadata
    }

    /// Directory holding the extracted images.
    pub fn image_dir(&self) -> &Path {
        &self.document.image_dir
    }

    /// Get content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// Trait for document converters.
///
/// Implement this trait to add support for a new document format.
pub trait DocumentConverter: Send + Sync {
    /// Get the supported file extensions for this converter.
    ///
    /// Extensions should be lowercase without the leading dot (e.g., `["pdf"]`).
    fn supported_extensions(&self) -> &[&str];

    /// Get the name of this converter.
    fn name(&self) -> &str;

    /// Open a file as a document source.
    fn open(&self, path: &Path) -> Result<Box<dyn DocumentSource>>;

    /// Open in-memory bytes as a document source.
    fn open_bytes(&self, bytes: &[u8]) -> Result<Box<dyn DocumentSource>>;

    /// Extract the structure of a file.
    fn extract(&self, path: &Path, options: &ParseOptions) -> Result<ExtractedDocument> {
        let source = self.open(path)?;
        let image_dir = options
            .image_dir
            .clone()
            .unwrap_or_else(|| default_image_dir(path));
        extract_from_source(source.as_ref(), &image_dir, options)
    }

    /// Extract the structure of in-memory bytes.
    fn extract_bytes(&self, bytes: &[u8], options: &ParseOptions) -> Result<ExtractedDocument> {
        let source = self.open_bytes(bytes)?;
        let image_dir = options
            .image_dir
            .clone()
            .unwrap_or_else(|| default_image_dir(Path::new(self.name())));
        extract_from_source(source.as_ref(), &image_dir, options)
    }

    /// Check if this converter supports the given extension.
    fn supports_extension(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.supported_extensions().iter().any(|e| *e == ext_lower)
    }
}

/// Registry for document converters.
///
/// The registry maps file extensions and format names to converters and
/// owns the layout registry used to build output trees.
pub struct ConverterRegistry {
    converters: HashMap<String, Arc<dyn DocumentConverter>>,
    by_name: HashMap<String, Arc<dyn DocumentConverter>>,
    layouts: LayoutRegistry,
}

impl ConverterRegistry {
    /// Create a new registry without converters, using the built-in layouts.
    pub fn new() -> Self {
        Self {
            converters: HashMap::new(),
            by_name: HashMap::new(),
            layouts: LayoutRegistry::builtin(),
        }
    }

    /// Create a registry with default converters (DOCX, PDF).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(DocxConverter::new()));
        registry.register(Arc::new(PdfConverter::new()));
        registry
    }

    /// Replace the layout registry.
    pub fn with_layouts(mut self, layouts: LayoutRegistry) -> Self {
        self.layouts = layouts;
        self
    }

    /// Get the layout registry.
    pub fn layouts(&self) -> &LayoutRegistry {
        &self.layouts
    }

    /// Register a converter.
    ///
    /// The converter will be registered for all its supported extensions.
    pub fn register(&mut self, converter: Arc<dyn DocumentConverter>) {
        for ext in converter.supported_extensions() {
            self.converters
                .insert(ext.to_lowercase(), converter.clone());
        }
        self.by_name
            .insert(converter.name().to_lowercase(), converter);
    }

    /// Get a converter by file extension.
    pub fn get_by_extension(&self, ext: &str) -> Option<Arc<dyn DocumentConverter>> {
        self.converters.get(&ext.to_lowercase()).cloned()
    }

    /// Get a converter by name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn DocumentConverter>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Check if an extension is supported.
    pub fn supports(&self, ext: &str) -> bool {
        self.converters.contains_key(&ext.to_lowercase())
    }

    /// Get all supported extensions.
    pub fn supported_extensions(&self) -> Vec<&str> {
        self.converters.keys().map(|s| s.as_str()).collect()
    }

    /// Pick the converter for a file.
    ///
    /// The file content decides; the extension is only used when the
    /// content is not recognized.
    pub fn converter_for(&self, path: &Path) -> Result<Arc<dyn DocumentConverter>> {
        let by_content = match detect_format_from_path(path) {
            Ok(format) => self.get_by_name(format.name()),
            Err(Error::UnknownFormat) => None,
            Err(e) => return Err(e),
        };

        by_content
            .or_else(|| {
                path.extension()
                    .and_then(|e| e.to_str())
                    .and_then(|ext| self.get_by_extension(ext))
            })
            .ok_or(Error::UnknownFormat)
    }

    /// Extract the structure of a file with the matching converter.
    ///
    /// A file of unknown format is reported as
    /// [`Error::DocumentUnreadable`].
    pub fn extract(&self, path: &Path, options: &ParseOptions) -> Result<ExtractedDocument> {
        self.converter_for(path)
            .map_err(Error::into_unreadable)?
            .extract(path, options)
    }

    /// Convert a file using the appropriate converter.
    pub fn convert(&self, path: &Path, options: &ConvertOptions) -> Result<ConvertResult> {
        let document = self.extract(path, &options.parse)?;
        self.finish(document, options)
    }

    /// Convert bytes, detecting the format from their content.
    pub fn convert_bytes(&self, bytes: &[u8], options: &ConvertOptions) -> Result<ConvertResult> {
        let format = detect_format_from_bytes(bytes).map_err(Error::into_unreadable)?;
        let converter = self
            .get_by_name(format.name())
            .ok_or_else(|| Error::Other(format!("No converter for format: {}", format)))?;

        let document = converter.extract_bytes(bytes, &options.parse)?;
        self.finish(document, options)
    }

    /// Build the tree for an extracted document.
    pub fn build_tree(
        &self,
        document: &ExtractedDocument,
        options: &ConvertOptions,
    ) -> OutputTree {
        let layout = self.layouts.resolve(&options.layout);
        TreeBuilder::new(options.tree.clone()).build_from_nodes(
            &document.nodes,
            &document.images,
            &layout,
            options.strategy,
            document.metadata.title.as_deref(),
        )
    }

    fn finish(
        &self,
        document: ExtractedDocument,
        options: &ConvertOptions,
    ) -> Result<ConvertResult> {
        let tree = self.build_tree(&document, options);
        let content = to_json(&tree, options.json_format)?;

        let stats = options.collect_stats.then(|| {
            ConversionStats::from_document(&document)
                .with_layout(self.layouts.resolve(&options.layout).name, options.strategy)
        });

        let result = ConvertResult::new(content, tree, document);
        Ok(match stats {
            Some(stats) => result.with_stats(stats),
            None => result,
        })
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
