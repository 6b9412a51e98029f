//! Layout reconstruction for a single page.
//!
//! The pipeline runs leaf-first:
//!
//! 1. [`font::classify`] maps font names to bold/italic/family.
//! 2. [`LineBuilder`] clusters positioned fragments into lines.
//! 3. [`ParagraphSegmenter`] groups lines into paragraphs, calling
//!    [`build_runs`] per line, and classifies headings and list items.
//!
//! Nothing is shared between pages: statistics such as the median font size
//! are computed from the page's own lines.

pub mod font;
mod fragment;
mod line;
mod options;
mod paragraph;
mod runs;

pub use font::{classify, FontStyle};
pub use fragment::{TextFragment, FALLBACK_FONT_SIZE};
pub use line::{LineBuilder, TextLine};
pub use options::LayoutOptions;
pub use paragraph::{
    detect_alignment, detect_list_prefix, heading_level, PageStatistics, Paragraph,
    ParagraphSegmenter,
};
pub use runs::{build_runs, coalesce, Run};

/// Reconstruct the paragraphs of one page from its fragments.
///
/// `page_width` enables alignment detection when
/// [`LayoutOptions::detect_alignment`] is set.
pub fn analyze_page(
    fragments: Vec<TextFragment>,
    page_width: Option<f32>,
    options: &LayoutOptions,
) -> Vec<Paragraph> {
    let lines = LineBuilder::new(options).build(fragments);
    ParagraphSegmenter::new(options).segment_page(&lines, page_width)
}
