//! DOCX document converter implementation.

use crate::error::Result;
use crate::parser::{DocumentSource, DocxSource};
use std::path::Path;

use super::DocumentConverter;

/// DOCX document converter.
///
/// Reads body paragraphs with their style names and inline pictures.
#[derive(Debug, Clone, Default)]
pub struct DocxConverter {
    _private: (),
}

impl DocxConverter {
    /// Create a new DOCX converter.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl DocumentConverter for DocxConverter {
    fn supported_extensions(&self) -> &[&str] {
        &["docx"]
    }

    fn name(&self) -> &str {
        "docx"
    }

    fn open(&self, path: &Path) -> Result<Box<dyn DocumentSource>> {
        Ok(Box::new(DocxSource::open(path)?))
    }

    fn open_bytes(&self, bytes: &[u8]) -> Result<Box<dyn DocumentSource>> {
        Ok(Box::new(DocxSource::from_bytes(bytes)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_docx_converter_extensions() {
        let converter = DocxConverter::new();
        assert_eq!(converter.supported_extensions(), &["docx"]);
        assert!(converter.supports_extension("DOCX"));
        assert!(!converter.supports_extension("doc"));
        assert_eq!(converter.name(), "docx");
    }

    #[test]
    fn test_docx_converter_rejects_non_zip() {
        let result = DocxConverter::new().open_bytes(b"not a zip archive");
        assert!(matches!(result, Err(Error::DocumentUnreadable(_))));
    }
}
