//! Plain text rendering.

use crate::model::{Block, Document};

/// Convert a document to plain text.
///
/// Paragraphs are separated by blank lines; page breaks and section
/// boundaries become form feeds.
pub fn to_text(doc: &Document) -> String {
    let mut out = String::new();
    for section in &doc.sections {
        if !out.is_empty() {
            out.push('\u{c}');
        }
        for block in &section.blocks {
            match block {
                Block::Paragraph(p) => {
                    if !out.is_empty() && !out.ends_with('\u{c}') {
                        out.push_str("\n\n");
                    }
                    out.push_str(&p.plain_text());
                }
                Block::PageBreak => out.push('\u{c}'),
            }
        }
    }
    out.trim().to_string()
}
