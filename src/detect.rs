//! PDF header sniffing.
//!
//! Conversion rejects non-PDF input before handing bytes to the PDF
//! backend, so that an HTML error page or a truncated download fails with
//! [`Error::UnknownFormat`] instead of an opaque parser message.

use crate::error::{Error, Result};
use std::path::Path;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Readers accept the header anywhere in the first kilobyte.
const HEADER_SEARCH_WINDOW: usize = 1024;

/// Information from a PDF file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PdfHeader {
    /// Major version (1 or 2).
    pub major: u8,
    /// Minor version.
    pub minor: u8,
    /// Byte offset of the `%PDF-` marker.
    pub offset: usize,
}

impl PdfHeader {
    /// Version as a display string, e.g. `"1.7"`.
    pub fn version(&self) -> String {
        format!("{}.{}", self.major, self.minor)
    }
}

impl std::fmt::Display for PdfHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PDF {}.{}", self.major, self.minor)
    }
}

/// Locate and parse the PDF header in `data`.
pub fn sniff(data: &[u8]) -> Result<PdfHeader> {
    let window = &data[..data.len().min(HEADER_SEARCH_WINDOW)];
    let offset = window
        .windows(PDF_MAGIC.len())
        .position(|w| w == PDF_MAGIC)
        .ok_or(Error::UnknownFormat)?;

    let version = data
        .get(offset + PDF_MAGIC.len()..offset + PDF_MAGIC.len() + 3)
        .ok_or(Error::UnknownFormat)?;

    match version {
        [major @ b'1'..=b'2', b'.', minor @ b'0'..=b'9'] => Ok(PdfHeader {
            major: major - b'0',
            minor: minor - b'0',
            offset,
        }),
        other => Err(Error::UnsupportedVersion(
            String::from_utf8_lossy(other).into_owned(),
        )),
    }
}

/// Read the start of a file and sniff its header.
pub fn sniff_path<P: AsRef<Path>>(path: P) -> Result<PdfHeader> {
    use std::io::Read;

    let mut head = Vec::with_capacity(HEADER_SEARCH_WINDOW + 8);
    std::fs::File::open(path)?
        .take((HEADER_SEARCH_WINDOW + 8) as u64)
        .read_to_end(&mut head)?;
    sniff(&head)
}

/// Check if bytes start like a PDF.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    sniff(data).is_ok()
}
