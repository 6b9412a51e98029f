//! # pdf2word
//!
//! PDF to Word conversion with layout reconstruction.
//!
//! Text fragments extracted from each PDF page are clustered into lines,
//! grouped into paragraphs, split into styled runs and classified as
//! headings or list items. The result is written as an Office Open XML
//! (`.docx`) package with one section per source page.
//!
//! ## Quick Start
//!
//! ```no_run
//! fn main() -> pdf2word::Result<()> {
//!     let docx = pdf2word::convert_file("report.pdf")?;
//!     std::fs::write("report.docx", docx)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Layout reconstruction**: Lines, paragraphs, headings, bulleted and
//!   numbered lists, optional alignment detection
//! - **Styled runs**: Bold, italic, font family and size per run
//! - **Page fidelity**: Page size and orientation carried per section,
//!   placeholders for pages without extractable text
//! - **Progress and cancellation**: Monotonic progress callbacks
//! - **Parallel processing**: Uses Rayon for page reconstruction

pub mod assemble;
pub mod convert;
pub mod detect;
pub mod error;
pub mod layout;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use assemble::{Assembler, SectionMode};
pub use convert::{
    CancellationToken, ConvertOptions, ConvertResult, Converter, Progress, Stage,
};
pub use detect::{is_pdf_bytes, sniff, PdfHeader};
pub use error::{Error, Result};
pub use layout::{analyze_page, LayoutOptions, Paragraph, Run, TextFragment};
pub use model::{
    Alignment, Block, Document, HeadingTier, Metadata, PageSection, ParagraphStyle,
    StyledParagraph, StyledSpan,
};
pub use parser::{LopdfBackend, PdfBackend, Viewport};
pub use render::{DocumentSerializer, DocumentStats, DocxSerializer, JsonFormat};

use std::path::Path;

/// Convert PDF bytes to `.docx` bytes with default options.
///
/// `file_name` becomes the document title with its extension removed.
///
/// # Example
///
/// ```no_run
/// let data = std::fs::read("report.pdf").unwrap();
/// let docx = pdf2word::convert_bytes(&data, "report.pdf").unwrap();
/// ```
pub fn convert_bytes(data: &[u8], file_name: &str) -> Result<Vec<u8>> {
    Converter::new(ConvertOptions::default()).convert(data, file_name, |_| {})
}

/// Convert a PDF file to `.docx` bytes with default options.
pub fn convert_file<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    Converter::new(ConvertOptions::default()).convert_file(path)
}

/// Convert a PDF file and write the `.docx` to `output`.
///
/// # Example
///
/// ```no_run
/// use pdf2word::{convert_file_to, ConvertOptions};
///
/// let options = ConvertOptions::new().with_password("secret");
/// let stats = convert_file_to("locked.pdf", "locked.docx", options)?;
/// println!("{} paragraphs", stats.paragraph_count);
/// # Ok::<(), pdf2word::Error>(())
/// ```
pub fn convert_file_to<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    options: ConvertOptions,
) -> Result<DocumentStats> {
    let input = input.as_ref();
    let data = std::fs::read(input)?;
    let file_name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let result = Converter::new(options).convert_detailed(&data, &file_name, |_| {})?;
    std::fs::write(output, &result.data)?;
    Ok(result.stats)
}

/// Reconstruct the document model of a PDF without writing `.docx`.
pub fn reconstruct(data: &[u8], file_name: &str, options: ConvertOptions) -> Result<Document> {
    Converter::new(options).convert_document(data, file_name, |_| {})
}

/// Extract the reconstructed text of a PDF.
///
/// Paragraphs are separated by blank lines and pages by form feeds.
pub fn extract_text(data: &[u8]) -> Result<String> {
    let doc = reconstruct(data, "", ConvertOptions::default())?;
    Ok(render::to_text(&doc))
}
