//! Page section types.

use super::{Block, StyledParagraph};
use serde::{Deserialize, Serialize};

/// One inch in twips.
pub const INCH_TWIPS: u32 = 1440;

/// Page margins in twips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margins {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Margins {
    /// Equal margins on all four sides.
    pub fn uniform(twips: u32) -> Self {
        Self {
            top: twips,
            right: twips,
            bottom: twips,
            left: twips,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(INCH_TWIPS)
    }
}

/// The structural content produced for one PDF page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSection {
    /// Source page number (1-indexed)
    pub number: u32,

    /// Page width in points (1 point = 1/72 inch)
    pub width: f32,

    /// Page height in points
    pub height: f32,

    /// Page margins
    pub margins: Margins,

    /// Content blocks
    pub blocks: Vec<Block>,

    /// Whether the page had no extractable text
    pub placeholder: bool,
}

impl PageSection {
    /// Create an empty section for a page of the given size.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            margins: Margins::default(),
            blocks: Vec::new(),
            placeholder: false,
        }
    }

    /// Create a section with US Letter size (8.5 x 11 inches).
    pub fn letter(number: u32) -> Self {
        Self::new(number, 612.0, 792.0)
    }

    /// Add a paragraph to the section.
    pub fn add_paragraph(&mut self, paragraph: StyledParagraph) {
        self.blocks.push(Block::Paragraph(paragraph));
    }

    /// Iterate over the paragraphs of the section.
    pub fn paragraphs(&self) -> impl Iterator<Item = &StyledParagraph> {
        self.blocks.iter().filter_map(Block::as_paragraph)
    }

    /// Get plain text content of the section.
    pub fn plain_text(&self) -> String {
        self.paragraphs()
            .map(|p| p.plain_text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Page width in twips.
    pub fn width_twips(&self) -> u32 {
        points_to_twips(self.width)
    }

    /// Page height in twips.
    pub fn height_twips(&self) -> u32 {
        points_to_twips(self.height)
    }

    /// Check if the page is in landscape orientation.
    pub fn is_landscape(&self) -> bool {
        self.width > self.height
    }
}

fn points_to_twips(points: f32) -> u32 {
    (points.max(0.0) * 20.0).round() as u32
}
