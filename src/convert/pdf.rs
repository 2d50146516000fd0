//! PDF document converter implementation.

use crate::error::Result;
use crate::parser::{DocumentSource, PdfSource};
use std::path::Path;

use super::DocumentConverter;

/// PDF document converter.
///
/// Reads text blocks and image draws from page content streams.
#[derive(Debug, Clone, Default)]
pub struct PdfConverter {
    _private: (),
}

impl PdfConverter {
    /// Create a new PDF converter.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl DocumentConverter for PdfConverter {
    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }

    fn name(&self) -> &str {
        "pdf"
    }

    fn open(&self, path: &Path) -> Result<Box<dyn DocumentSource>> {
        Ok(Box::new(PdfSource::open(path)?))
    }

    fn open_bytes(&self, bytes: &[u8]) -> Result<Box<dyn DocumentSource>> {
        Ok(Box::new(PdfSource::from_bytes(bytes)?))
    }
}
