//! Conversion statistics.

use crate::model::{Block, Document};
use serde::{Deserialize, Serialize};

/// Statistics collected from a reconstructed document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStats {
    /// Number of source pages processed
    pub page_count: u32,

    /// Number of pages without extractable text
    pub empty_page_count: u32,

    /// Number of paragraphs, headings and list items included
    pub paragraph_count: u32,

    /// Number of headings
    pub heading_count: u32,

    /// Number of list items
    pub list_item_count: u32,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,

    /// Character count (excluding whitespace)
    pub char_count: u32,
}

impl DocumentStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect statistics from a document.
    ///
    /// Placeholder paragraphs count as empty pages, not as content.
    pub fn from_document(doc: &Document) -> Self {
        let mut stats = Self::new();
        stats.page_count = doc.metadata.page_count;

        for section in &doc.sections {
            if section.placeholder {
                stats.empty_page_count += 1;
                continue;
            }
            for block in &section.blocks {
                let Block::Paragraph(p) = block else {
                    continue;
                };
                stats.paragraph_count += 1;
                if p.is_heading() {
                    stats.heading_count += 1;
                }
                if p.is_list_item() {
                    stats.list_item_count += 1;
                }
                stats.count_text(&p.plain_text());
            }
        }
        stats
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HeadingTier, PageSection, StyledParagraph, StyledSpan};

    #[test]
    fn test_count_text() {
        let mut stats = DocumentStats::new();
        stats.count_text("Hello, world! This is a test.");

        assert_eq!(stats.word_count, 6);
        assert_eq!(stats.char_count, 24);
    }

    #[test]
    fn test_from_document() {
        let mut doc = Document::new();
        doc.metadata.page_count = 2;

        let mut heading = StyledParagraph::new(vec![StyledSpan::new("Title", 40, "Arial")]);
        heading.style.heading = Some(HeadingTier::Heading1);
        let mut section = PageSection::letter(1);
        section.add_paragraph(heading);
        section.add_paragraph(StyledParagraph::new(vec![StyledSpan::new("two words", 22, "Arial")]));
        doc.add_section(section);

        let mut empty = PageSection::letter(2);
        empty.add_paragraph(StyledParagraph::new(vec![StyledSpan::new("[placeholder]", 20, "Calibri")]));
        empty.placeholder = true;
        doc.add_section(empty);

        let stats = DocumentStats::from_document(&doc);
        assert_eq!(stats.page_count, 2);
        assert_eq!(stats.empty_page_count, 1);
        assert_eq!(stats.paragraph_count, 2);
        assert_eq!(stats.heading_count, 1);
        assert_eq!(stats.word_count, 3);
    }
}
