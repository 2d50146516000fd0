//! Source format detection and validation.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Kind of source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceFormat {
    /// Office Open XML word-processing package
    Docx,
    /// PDF with its header version (e.g., "1.7")
    Pdf {
        /// PDF version
        version: String,
    },
}

impl SourceFormat {
    /// Short lowercase name, also used as the converter name.
    pub fn name(&self) -> &'static str {
        match self {
            SourceFormat::Docx => "docx",
            SourceFormat::Pdf { .. } => "pdf",
        }
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceFormat::Docx => write!(f, "DOCX"),
            SourceFormat::Pdf { version } => write!(f, "PDF {}", version),
        }
    }
}

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const PDF_MAGIC_LEN: usize = 5;
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// ZIP local file header, the container of every DOCX package.
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Detect the source format from a file path.
///
/// A file that cannot be opened or read is reported as
/// [`Error::DocumentUnreadable`].
///
/// # Example
/// ```no_run
/// use docpage::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("report.docx").unwrap();
/// println!("Format: {}", format);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<SourceFormat> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| Error::DocumentUnreadable(format!("{}: {}", path.display(), e)))?;
    let mut reader = BufReader::new(file);
    let mut header = Vec::with_capacity(16);
    reader
        .by_ref()
        .take(16)
        .read_to_end(&mut header)
        .map_err(|e| Error::DocumentUnreadable(format!("{}: {}", path.display(), e)))?;
    detect_format_from_bytes(&header)
}

/// Detect the source format from the leading bytes of a file.
///
/// # Returns
/// * `Ok(SourceFormat)` for a ZIP container or a valid PDF header
/// * `Err(Error::UnknownFormat)` otherwise
pub fn detect_format_from_bytes(data: &[u8]) -> Result<SourceFormat> {
    if data.starts_with(ZIP_MAGIC) {
        return Ok(SourceFormat::Docx);
    }

    if data.len() < PDF_MAGIC_LEN + VERSION_LEN || !data.starts_with(PDF_MAGIC) {
        return Err(Error::UnknownFormat);
    }

    let version =
        String::from_utf8_lossy(&data[PDF_MAGIC_LEN..PDF_MAGIC_LEN + VERSION_LEN]).into_owned();

    if !is_valid_version(&version) {
        return Err(Error::UnsupportedVersion(version));
    }

    Ok(SourceFormat::Pdf { version })
}

/// `major.minor` with single digits on both sides.
fn is_valid_version(version: &str) -> bool {
    matches!(
        version.as_bytes(),
        [major, b'.', minor] if major.is_ascii_digit() && minor.is_ascii_digit()
    )
}

/// Check if a file is a supported source document.
pub fn is_supported<P: AsRef<Path>>(path: P) -> bool {
    detect_format_from_path(path).is_ok()
}
