//! Extraction options and configuration.

use std::path::PathBuf;

/// Options for extracting a document's structure.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Directory for extracted image files.
    ///
    /// `None` creates a fresh directory under the system temp dir,
    /// named from the file stem and a millisecond timestamp.
    pub image_dir: Option<PathBuf>,

    /// Whether to decode and write embedded images.
    ///
    /// When disabled, image nodes are still emitted (so the tree keeps its
    /// placeholders) but no asset is produced.
    pub extract_images: bool,

    /// Keep decoded bytes on each [`ImageAsset`](crate::model::ImageAsset)
    pub retain_image_bytes: bool,

    /// Base name used in stored image file names
    pub image_basename: String,

    /// Font-size thresholds for classifying PDF text blocks
    pub font_thresholds: FontSizeThresholds,
}

impl ParseOptions {
    /// Create new parse options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write images into the given directory.
    pub fn with_image_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.image_dir = Some(dir.into());
        self
    }

    /// Skip image decoding and writing.
    pub fn without_images(mut self) -> Self {
        self.extract_images = false;
        self
    }

    /// Keep image bytes in memory after writing them.
    pub fn retain_image_bytes(mut self) -> Self {
        self.retain_image_bytes = true;
        self
    }

    /// Set the base name for stored image files.
    pub fn with_image_basename(mut self, name: impl Into<String>) -> Self {
        self.image_basename = name.into();
        self
    }

    /// Set the PDF font-size thresholds.
    pub fn with_font_thresholds(mut self, thresholds: FontSizeThresholds) -> Self {
        self.font_thresholds = thresholds;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            image_dir: None,
            extract_images: true,
            retain_image_bytes: false,
            image_basename: "image".to_string(),
            font_thresholds: FontSizeThresholds::default(),
        }
    }
}

/// Minimum average font size (pt) for each heading level of a PDF block.
///
/// Thresholds are checked from level 1 down; the first one met wins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSizeThresholds {
    /// Minimum sizes for H1..H6, descending
    pub levels: [f32; 6],
}

impl FontSizeThresholds {
    /// Create thresholds from six sizes for H1..H6.
    ///
    /// Sizes are sorted descending so a misordered list still classifies
    /// larger text as a higher-level heading.
    pub fn new(mut levels: [f32; 6]) -> Self {
        levels.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
        Self { levels }
    }

    /// Heading level for an average font size, or `None` for body text.
    pub fn level_for(&self, font_size: f32) -> Option<u8> {
        self.levels
            .iter()
            .position(|&min| font_size >= min)
            .map(|idx| idx as u8 + 1)
    }
}

impl Default for FontSizeThresholds {
    fn default() -> Self {
        Self {
            levels: [24.0, 20.0, 16.0, 14.0, 13.0, 12.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options_builder() {
        let options = ParseOptions::new()
            .with_image_dir("out/images")
            .without_images()
            .retain_image_bytes()
            .with_image_basename("report");

        assert_eq!(options.image_dir, Some(PathBuf::from("out/images")));
        assert!(!options.extract_images);
        assert!(options.retain_image_bytes);
        assert_eq!(options.image_basename, "report");
    }

    #[test]
    fn test_default_options() {
        let options = ParseOptions::default();
        assert!(options.image_dir.is_none());
        assert!(options.extract_images);
        assert!(!options.retain_image_bytes);
        assert_eq!(options.image_basename, "image");
    }

    #[test]
    fn test_default_thresholds() {
        let t = FontSizeThresholds::default();
        assert_eq!(t.level_for(30.0), Some(1));
        assert_eq!(t.level_for(24.0), Some(1));
        assert_eq!(t.level_for(20.5), Some(2));
        assert_eq!(t.level_for(16.0), Some(3));
        assert_eq!(t.level_for(14.2), Some(4));
        assert_eq!(t.level_for(13.0), Some(5));
        assert_eq!(t.level_for(12.0), Some(6));
        assert_eq!(t.level_for(11.9), None);
    }

    #[test]
    fn test_thresholds_sorted() {
        let t = FontSizeThresholds::new([12.0, 14.0, 13.0, 16.0, 20.0, 24.0]);
        assert_eq!(t.levels, [24.0, 20.0, 16.0, 14.0, 13.0, 12.0]);
    }
}
