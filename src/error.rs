//! Error types for docpage library.

use std::io;
use thiserror::Error;

/// Result type alias for docpage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during document conversion.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file is missing or the parser cannot open it.
    #[error("Document unreadable: {0}")]
    DocumentUnreadable(String),

    /// The document walk produced no content nodes.
    #[error("Document contains no usable content")]
    EmptyDocument,

    /// The file format is neither DOCX nor PDF.
    #[error("Unknown file format: not a DOCX or PDF document")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// A single embedded image could not be decoded.
    #[error("Image decode error: {0}")]
    ImageDecode(String),

    /// A node of unknown kind reached the tree builder.
    #[error("Unrecognized node kind: {0}")]
    UnrecognizedNodeKind(String),

    /// A distribution strategy could not partition the nodes.
    #[error("Distribution error: {0}")]
    Distribution(String),

    /// A layout definition violates its invariants.
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    /// Error during rendering (JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error aborts a whole conversion.
    ///
    /// Everything else is recoverable and handled by degrading output.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Io(_)
                | Error::DocumentUnreadable(_)
                | Error::EmptyDocument
                | Error::UnknownFormat
                | Error::UnsupportedVersion(_)
        )
    }

    /// Fold format-detection failures into [`Error::DocumentUnreadable`].
    ///
    /// Extraction only reports unreadable or empty documents; the detection
    /// cause is kept in the message.
    pub fn into_unreadable(self) -> Self {
        match self {
            Error::UnknownFormat | Error::UnsupportedVersion(_) => {
                Error::DocumentUnreadable(self.to_string())
            }
            other => other,
        }
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        Error::DocumentUnreadable(format!("PDF: {}", err))
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::DocumentUnreadable(format!("DOCX package: {}", err))
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::DocumentUnreadable(format!("DOCX XML: {}", err))
    }
}
