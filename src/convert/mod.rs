//! Conversion pipeline: PDF bytes in, `.docx` bytes out.
//!
//! # Example
//!
//! ```no_run
//! use pdf2word::convert::{ConvertOptions, Converter};
//!
//! fn main() -> pdf2word::Result<()> {
//!     let data = std::fs::read("report.pdf")?;
//!     let converter = Converter::new(ConvertOptions::default());
//!     let docx = converter.convert(&data, "report.pdf", |p| {
//!         println!("{:>3}% {}", p.percent, p.message);
//!     })?;
//!     std::fs::write("report.docx", docx)?;
//!     Ok(())
//! }
//! ```

mod pipeline;
mod progress;

pub use pipeline::Converter;
pub use progress::{
    analyzing_percent, CancellationToken, Progress, Stage, ANALYZING_END, ANALYZING_START,
};

use crate::assemble::SectionMode;
use crate::layout::LayoutOptions;
use crate::model::Metadata;
use crate::render::DocumentStats;

/// Options for document conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Layout reconstruction thresholds
    pub layout: LayoutOptions,

    /// Password for encrypted documents
    pub password: Option<String>,

    /// Reconstruct pages on the rayon thread pool
    pub parallel: bool,

    /// One section per page, or a single continuous section
    pub section_mode: SectionMode,

    /// Creator recorded in the output, `"pdf2word"` when unset
    pub creator: Option<String>,

    /// Description recorded in the output
    pub description: Option<String>,

    /// Cancellation flag checked before each page
    pub cancel: Option<CancellationToken>,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set layout options.
    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.layout = layout;
        self
    }

    /// Set document password.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Enable parallel page reconstruction.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the section layout of the output.
    pub fn with_section_mode(mut self, mode: SectionMode) -> Self {
        self.section_mode = mode;
        self
    }

    /// Set the creator recorded in the output.
    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = Some(creator.into());
        self
    }

    /// Set the description recorded in the output.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach a cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// Result of a conversion.
#[derive(Debug, Clone)]
pub struct ConvertResult {
    /// Serialized output
    pub data: Vec<u8>,

    /// Metadata of the produced document
    pub metadata: Metadata,

    /// Statistics of the reconstructed document
    pub stats: DocumentStats,

    /// MIME type of the output
    pub mime_type: &'static str,
}

impl ConvertResult {
    /// Get output length in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the output is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
