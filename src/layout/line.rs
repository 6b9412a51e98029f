//! Line building: clustering fragments into horizontal text lines.

use std::cmp::Ordering;

use serde::Serialize;

use super::fragment::{needs_space, TextFragment};
use super::LayoutOptions;

/// A text line composed of fragments sharing a baseline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextLine {
    /// The fragments in this line, sorted by X position
    pub fragments: Vec<TextFragment>,
    /// Concatenated text with inferred word spaces
    pub text: String,
    /// Y of the fragment that anchored the line
    pub y: f32,
    /// Leftmost X
    pub min_x: f32,
    /// Rightmost X (right edge of the last fragment)
    pub max_x: f32,
    /// Mean font size of the fragments
    pub font_size: f32,
    /// More than half of the fragments are bold
    pub bold: bool,
    /// More than half of the fragments are italic
    pub italic: bool,
}

impl TextLine {
    /// Create a line from fragments anchored at `y`.
    pub fn from_fragments(mut fragments: Vec<TextFragment>, y: f32, space_factor: f32) -> Self {
        fragments.sort_by(|a, b| a.x.total_cmp(&b.x));

        let mut text = String::new();
        for (i, frag) in fragments.iter().enumerate() {
            if i > 0 && needs_space(&fragments[i - 1], frag, space_factor) {
                text.push(' ');
            }
            text.push_str(&frag.text);
        }

        let count = fragments.len();
        let min_x = fragments.iter().map(|f| f.x).fold(f32::INFINITY, f32::min);
        let max_x = fragments
            .iter()
            .map(TextFragment::right)
            .fold(f32::NEG_INFINITY, f32::max);
        let font_size = if count > 0 {
            fragments.iter().map(|f| f.font_size).sum::<f32>() / count as f32
        } else {
            0.0
        };
        let bold_count = fragments.iter().filter(|f| f.style.bold).count();
        let italic_count = fragments.iter().filter(|f| f.style.italic).count();

        Self {
            text,
            y,
            min_x: if count > 0 { min_x } else { 0.0 },
            max_x: if count > 0 { max_x } else { 0.0 },
            font_size,
            bold: bold_count * 2 > count,
            italic: italic_count * 2 > count,
            fragments,
        }
    }

    /// Check if the line carries no visible text.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Horizontal extent of the line.
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }
}

/// Groups fragments into lines by Y proximity.
#[derive(Debug, Clone)]
pub struct LineBuilder {
    tolerance: f32,
    space_factor: f32,
}

impl LineBuilder {
    /// Create a line builder from layout options.
    pub fn new(options: &LayoutOptions) -> Self {
        Self {
            tolerance: options.line_tolerance,
            space_factor: options.space_factor,
        }
    }

    /// Build top-to-bottom lines from an unordered fragment list.
    ///
    /// Fragments are put in a total order (Y descending, then X, then text)
    /// before clustering, so the result does not depend on input order.
    pub fn build(&self, mut fragments: Vec<TextFragment>) -> Vec<TextLine> {
        if fragments.is_empty() {
            return vec![];
        }

        fragments.sort_by(reading_order);

        let mut lines = Vec::new();
        let mut current: Vec<TextFragment> = Vec::new();
        let mut line_y = fragments[0].y;

        for frag in fragments {
            if !current.is_empty() && (frag.y - line_y).abs() > self.tolerance {
                lines.push(TextLine::from_fragments(
                    std::mem::take(&mut current),
                    line_y,
                    self.space_factor,
                ));
            }
            if current.is_empty() {
                line_y = frag.y;
            }
            current.push(frag);
        }

        if !current.is_empty() {
            lines.push(TextLine::from_fragments(current, line_y, self.space_factor));
        }

        lines
    }
}

fn reading_order(a: &TextFragment, b: &TextFragment) -> Ordering {
    b.y.total_cmp(&a.y)
        .then_with(|| a.x.total_cmp(&b.x))
        .then_with(|| a.text.cmp(&b.text))
        .then_with(|| a.width.total_cmp(&b.width))
        .then_with(|| a.font_size.total_cmp(&b.font_size))
        .then_with(|| a.font_name.cmp(&b.font_name))
}
