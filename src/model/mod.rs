//! Document model types for the reconstructed output.
//!
//! This module defines the structural representation that bridges layout
//! reconstruction and serialization. It is independent of the output
//! container: the `.docx` writer and the JSON dump both consume it.

mod document;
mod paragraph;
mod section;

pub use document::{
    title_from_file_name, Document, Metadata, DEFAULT_CREATOR, DEFAULT_DESCRIPTION,
};
pub use paragraph::{
    Alignment, Block, HeadingTier, Indent, ParagraphStyle, Spacing, StyledParagraph, StyledSpan,
};
pub use section::{Margins, PageSection, INCH_TWIPS};
