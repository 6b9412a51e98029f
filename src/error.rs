//! Error types for pdf2word library.

use std::io;
use thiserror::Error;

/// Result type alias for pdf2word operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during conversion.
///
/// Only document-level failures surface here. Degraded inputs such as
/// unknown fonts, pages without text or empty lines are recovered inside the
/// layout pipeline and never produce an error.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted and requires a password.
    #[error("Document is encrypted")]
    Encrypted,

    /// The provided password is incorrect.
    #[error("Invalid password")]
    InvalidPassword,

    /// The PDF structure is corrupted or malformed.
    #[error("Corrupted PDF structure: {0}")]
    Corrupted(String),

    /// Error extracting text content from a page.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Error writing the output document.
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// The conversion was cancelled through its cancellation token.
    #[error("Conversion cancelled")]
    Cancelled,

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// User-facing guidance for a failed conversion.
    ///
    /// Password and encryption problems suggest unlocking the file first,
    /// structural problems suggest the file is not a readable PDF, and
    /// everything else gets a generic message.
    pub fn guidance(&self) -> &'static str {
        match self {
            Error::Encrypted | Error::InvalidPassword => {
                "This PDF is password-protected. Unlock it first, or supply the correct password."
            }
            Error::UnknownFormat
            | Error::UnsupportedVersion(_)
            | Error::PdfParse(_)
            | Error::Corrupted(_) => {
                "The file could not be read as a PDF. It may be corrupted or not a PDF at all."
            }
            Error::Cancelled => "The conversion was cancelled.",
            _ => "The conversion failed. Please try again with a different file.",
        }
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            lopdf::Error::InvalidPassword => Error::InvalidPassword,
            lopdf::Error::Xref(_)
            | lopdf::Error::MissingXrefEntry
            | lopdf::Error::InvalidOffset(_)
            | lopdf::Error::IndirectObject { .. }
            | lopdf::Error::ObjectIdMismatch
            | lopdf::Error::ObjectNotFound(_)
            | lopdf::Error::ReferenceCycle(_)
            | lopdf::Error::ReferenceLimit
            | lopdf::Error::InvalidObjectStream(_) => Error::Corrupted(err.to_string()),
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            _ => Error::Serialize(err.to_string()),
        }
    }
}
