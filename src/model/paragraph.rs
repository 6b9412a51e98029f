//! Paragraph and span types of the output document.

use serde::{Deserialize, Serialize};

/// A content block inside a page section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// A styled paragraph
    Paragraph(StyledParagraph),

    /// A page break marker
    PageBreak,
}

impl Block {
    /// Check if this block is a paragraph.
    pub fn is_paragraph(&self) -> bool {
        matches!(self, Block::Paragraph(_))
    }

    /// The paragraph, if this block is one.
    pub fn as_paragraph(&self) -> Option<&StyledParagraph> {
        match self {
            Block::Paragraph(p) => Some(p),
            Block::PageBreak => None,
        }
    }
}

/// A paragraph ready for serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyledParagraph {
    /// Styled text spans
    pub spans: Vec<StyledSpan>,

    /// Paragraph style
    pub style: ParagraphStyle,
}

impl StyledParagraph {
    /// Create a paragraph from spans with the default body style.
    pub fn new(spans: Vec<StyledSpan>) -> Self {
        Self {
            spans,
            style: ParagraphStyle::default(),
        }
    }

    /// Get plain text content of the paragraph.
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// Check if this is a heading.
    pub fn is_heading(&self) -> bool {
        self.style.heading.is_some()
    }

    /// Check if this is a list item.
    pub fn is_list_item(&self) -> bool {
        self.style.indent.is_some()
    }
}

/// A run of text with consistent styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyledSpan {
    /// The text content
    pub text: String,

    /// Bold text
    pub bold: bool,

    /// Italic text
    pub italic: bool,

    /// Font size in half-points
    pub size: u32,

    /// Font family
    pub family: String,

    /// Text color as RRGGBB hex, None for automatic
    pub color: Option<String>,
}

impl StyledSpan {
    /// Create a regular span.
    pub fn new(text: impl Into<String>, size: u32, family: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
            size,
            family: family.into(),
            color: None,
        }
    }
}

/// Heading tiers of the target format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingTier {
    Heading1,
    Heading2,
    Heading3,
}

impl HeadingTier {
    /// Map a heading level; levels above 3 collapse into the third tier.
    pub fn from_level(level: u8) -> Self {
        match level {
            0 | 1 => HeadingTier::Heading1,
            2 => HeadingTier::Heading2,
            _ => HeadingTier::Heading3,
        }
    }

    /// Style identifier used in the document's style sheet.
    pub fn style_id(&self) -> &'static str {
        match self {
            HeadingTier::Heading1 => "Heading1",
            HeadingTier::Heading2 => "Heading2",
            HeadingTier::Heading3 => "Heading3",
        }
    }
}

/// Text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left alignment (default)
    #[default]
    Left,
    /// Center alignment
    Center,
    /// Right alignment
    Right,
    /// Justified alignment
    Justify,
}

/// Vertical spacing in twips (twentieths of a point).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spacing {
    /// Space before the paragraph
    pub before: u32,
    /// Space after the paragraph
    pub after: u32,
    /// Line height in 240ths of a line, None for the style default
    pub line: Option<u32>,
}

/// Left indentation in twips.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Indent {
    /// Left indent
    pub left: u32,
    /// Hanging indent of the first line
    pub hanging: u32,
}

/// Paragraph styling properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParagraphStyle {
    /// Heading tier, or None for body text
    pub heading: Option<HeadingTier>,

    /// Text alignment
    pub alignment: Alignment,

    /// Indentation for list items
    pub indent: Option<Indent>,

    /// Paragraph spacing
    pub spacing: Spacing,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_plain_text() {
        let mut bold = StyledSpan::new("world", 24, "Arial");
        bold.bold = true;
        let p = StyledParagraph::new(vec![
            StyledSpan::new("Hello ", 24, "Arial"),
            bold,
            StyledSpan::new("!", 24, "Arial"),
        ]);
        assert_eq!(p.plain_text(), "Hello world!");
        assert!(!p.is_heading());
    }

    #[test]
    fn test_heading_tier_from_level() {
        assert_eq!(HeadingTier::from_level(1), HeadingTier::Heading1);
        assert_eq!(HeadingTier::from_level(2), HeadingTier::Heading2);
        assert_eq!(HeadingTier::from_level(3), HeadingTier::Heading3);
        assert_eq!(HeadingTier::from_level(5).style_id(), "Heading3");
    }

    #[test]
    fn test_block_serde_tag() {
        let json = serde_json::to_string(&Block::PageBreak).unwrap();
        assert_eq!(json, r#"{"type":"page_break"}"#);
    }
}
