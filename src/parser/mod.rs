//! Document parsing module.
//!
//! Each supported format is read by an adapter implementing
//! [`DocumentSource`], which exposes the document body as a flat list of
//! [`SourceElement`]s in physical order. The walker and the image extractor
//! both consume that same list, so image references line up by
//! construction.

mod classify;
mod docx;
mod images;
mod options;
mod pdf;
mod walker;

use std::collections::BTreeMap;
use std::path::Path;

pub use classify::{classify_sized, classify_styled, heading_level_for_style, join_lines};
pub use docx::DocxSource;
pub use images::{default_image_dir, extract_images, stored_filename};
pub use options::{FontSizeThresholds, ParseOptions};
pub use pdf::PdfSource;
pub use walker::{picture_refs, walk};

use crate::detect::{detect_format_from_path, SourceFormat};
use crate::error::Result;
use crate::model::{ExtractedDocument, Metadata};

/// Location of an embedded image payload inside its container.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImageHandle {
    /// Part name inside a DOCX package (e.g., "word/media/image1.png")
    Part(String),
    /// PDF image XObject id (object number, generation)
    Object(u32, u16),
}

/// One body element of a source document, in physical order.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceElement {
    /// Paragraph carrying a named style (DOCX)
    Styled {
        /// Resolved style display name
        style: String,
        /// Raw paragraph text
        text: String,
    },

    /// Text block carrying an average font size (PDF)
    Sized {
        /// Character-weighted average font size in points
        font_size: f32,
        /// Block lines, top to bottom
        lines: Vec<String>,
    },

    /// Embedded picture; `None` when the payload cannot be located
    Picture {
        /// Payload location
        handle: Option<ImageHandle>,
    },
}

/// A parsed document seen as an ordered element list.
pub trait DocumentSource {
    /// Format of the underlying file.
    fn format(&self) -> &SourceFormat;

    /// Body elements in physical order.
    fn elements(&self) -> &[SourceElement];

    /// Raw, decodable image bytes for a handle.
    ///
    /// Returns [`Error::ImageDecode`](crate::Error::ImageDecode) when the
    /// payload is missing or stored in an encoding that cannot be turned
    /// into a standard raster file.
    fn image_bytes(&self, handle: &ImageHandle) -> Result<Vec<u8>>;

    /// Document metadata.
    fn metadata(&self) -> Metadata;
}

/// Open a document with the adapter matching its detected format.
pub fn open_source<P: AsRef<Path>>(path: P) -> Result<Box<dyn DocumentSource>> {
    let path = path.as_ref();
    match detect_format_from_path(path)? {
        SourceFormat::Docx => Ok(Box::new(DocxSource::open(path)?)),
        SourceFormat::Pdf { .. } => Ok(Box::new(PdfSource::open(path)?)),
    }
}

/// Walk a source and extract its images into `image_dir`.
///
/// # Errors
/// [`Error::EmptyDocument`](crate::Error::EmptyDocument) if the walk yields
/// no node, [`Error::Io`](crate::Error::Io) if `image_dir` cannot be created.
pub fn extract_from_source<S>(
    source: &S,
    image_dir: &Path,
    options: &ParseOptions,
) -> Result<ExtractedDocument>
where
    S: DocumentSource + ?Sized,
{
    let (nodes, image_count) = walk(source, &options.font_thresholds)?;

    let images = if options.extract_images && image_count > 0 {
        extract_images(source, image_dir, options)?
    } else {
        BTreeMap::new()
    };

    log::debug!(
        "Extracted {} nodes, {}/{} images into {}",
        nodes.len(),
        images.len(),
        image_count,
        image_dir.display()
    );

    Ok(ExtractedDocument {
        metadata: source.metadata(),
        nodes,
        images,
        image_dir: image_dir.to_path_buf(),
    })
}
