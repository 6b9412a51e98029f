//! Positioned text fragments.

use serde::Serialize;

use super::font::{classify, FontStyle};

/// Font size assumed when a transform carries no scale.
pub const FALLBACK_FONT_SIZE: f32 = 12.0;

/// A positioned run of glyphs extracted from a page.
///
/// Coordinates are PDF user space: the origin is the bottom-left corner of
/// the page and Y grows upward.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextFragment {
    /// The text content
    pub text: String,
    /// X of the glyph origin (left edge)
    pub x: f32,
    /// Y of the baseline
    pub y: f32,
    /// Advance width of the whole fragment
    pub width: f32,
    /// Glyph height
    pub height: f32,
    /// Font name as found in the PDF (e.g., "Helvetica-Bold")
    pub font_name: String,
    /// Whether the producer ended a text line after this fragment
    pub has_eol: bool,
    /// Effective font size in points
    pub font_size: f32,
    /// Style classified from `font_name`
    pub style: FontStyle,
}

impl TextFragment {
    /// Create a fragment with an explicit font size.
    pub fn new(
        text: impl Into<String>,
        x: f32,
        y: f32,
        width: f32,
        font_size: f32,
        font_name: impl Into<String>,
    ) -> Self {
        let font_name = font_name.into();
        let style = classify(&font_name);
        Self {
            text: text.into(),
            x,
            y,
            width,
            height: font_size,
            font_name,
            has_eol: false,
            font_size,
            style,
        }
    }

    /// Create a fragment from an extracted text item and its transform
    /// `[scaleX, skewX, skewY, scaleY, translateX, translateY]`.
    ///
    /// The effective font size is `max(|scaleX|, |scaleY|)`, or 12 when both
    /// are zero.
    pub fn from_transform(
        text: impl Into<String>,
        transform: [f32; 6],
        width: f32,
        height: f32,
        font_name: impl Into<String>,
        has_eol: bool,
    ) -> Self {
        let size = transform[0].abs().max(transform[3].abs());
        let font_size = if size > 0.0 { size } else { FALLBACK_FONT_SIZE };

        let mut fragment = Self::new(
            text,
            transform[4],
            transform[5],
            width,
            font_size,
            font_name,
        );
        fragment.height = height;
        fragment.has_eol = has_eol;
        fragment
    }

    /// Right edge of the fragment.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Average glyph advance, used to judge word gaps.
    pub fn avg_char_width(&self) -> f32 {
        let chars = self.text.chars().count();
        if chars > 0 {
            self.width / chars as f32
        } else {
            self.font_size * 0.5
        }
    }
}

/// Whether the gap between `prev` and `next` reads as a word space.
///
/// The gap is measured from the end of `prev` to the start of `next` and
/// compared against `prev`'s average character width scaled by
/// `space_factor`. Fragments that already carry whitespace at the seam never
/// get another space.
pub(crate) fn needs_space(prev: &TextFragment, next: &TextFragment, space_factor: f32) -> bool {
    let seam_has_space = prev.text.ends_with(char::is_whitespace)
        || next.text.starts_with(char::is_whitespace);
    if seam_has_space {
        return false;
    }

    let gap = next.x - prev.right();
    gap > prev.avg_char_width() * space_factor
}
