//! Image assets extracted from a document.

use serde::{Deserialize, Serialize};

use super::RefId;

/// An embedded image written to the destination directory.
///
/// Created once per image encountered during extraction and immutable
/// afterwards; content nodes refer to it by [`RefId`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageAsset {
    /// Reference shared with the matching image node
    pub ref_id: RefId,

    /// File name inside the destination directory
    pub stored_filename: String,

    /// Width in pixels
    pub width: u32,

    /// Height in pixels
    pub height: u32,

    /// Decoded raster format
    pub format: ImageFormat,

    /// Raw bytes, kept only when requested
    #[serde(skip)]
    pub data: Option<Vec<u8>>,
}

impl ImageAsset {
    /// Create a new asset.
    pub fn new(
        ref_id: RefId,
        stored_filename: impl Into<String>,
        width: u32,
        height: u32,
        format: ImageFormat,
    ) -> Self {
        Self {
            ref_id,
            stored_filename: stored_filename.into(),
            width,
            height,
            format,
            data: None,
        }
    }

    /// Attach the raw bytes.
    pub fn with_data(mut self, data: Vec<u8>) -> Self {
        self.data = Some(data);
        self
    }
}

/// Raster format of an image asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ImageFormat {
    /// Portable Network Graphics
    Png,
    /// JPEG
    Jpeg,
    /// GIF
    Gif,
    /// Windows bitmap
    Bmp,
    /// Any other raster format, by lowercase extension
    Other(String),
}

impl ImageFormat {
    /// Map a format decoded by the `image` crate.
    pub fn from_decoded(format: image::ImageFormat) -> Self {
        match format {
            image::ImageFormat::Png => ImageFormat::Png,
            image::ImageFormat::Jpeg => ImageFormat::Jpeg,
            image::ImageFormat::Gif => ImageFormat::Gif,
            image::ImageFormat::Bmp => ImageFormat::Bmp,
            other => ImageFormat::Other(
                other
                    .extensions_str()
                    .first()
                    .copied()
                    .unwrap_or("img")
                    .to_string(),
            ),
        }
    }

    /// File extension, with "jpeg" normalized to "jpg".
    pub fn extension(&self) -> &str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Gif => "gif",
            ImageFormat::Bmp => "bmp",
            ImageFormat::Other(ext) if ext == "jpeg" => "jpg",
            ImageFormat::Other(ext) => ext,
        }
    }

    /// MIME type for the format.
    pub fn mime_type(&self) -> &str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Bmp => "image/bmp",
            ImageFormat::Other(ext) => match ext.as_str() {
                "tif" | "tiff" => "image/tiff",
                "webp" => "image/webp",
                _ => "application/octet-stream",
            },
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageFormat::Png => write!(f, "PNG"),
            ImageFormat::Jpeg => write!(f, "JPEG"),
            ImageFormat::Gif => write!(f, "GIF"),
            ImageFormat::Bmp => write!(f, "BMP"),
            ImageFormat::Other(ext) => write!(f, "{}", ext.to_uppercase()),
        }
    }
}
