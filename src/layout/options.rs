//! Tunable thresholds for layout reconstruction.

use serde::{Deserialize, Serialize};

/// Heuristic thresholds used by the line builder, run builder and
/// paragraph segmenter.
///
/// Distances are in PDF user-space units (1/72 inch); ratios are unitless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutOptions {
    /// Maximum |Δy| between fragments on the same line.
    pub line_tolerance: f32,

    /// A gap wider than `avg_char_width * space_factor` becomes a space.
    pub space_factor: f32,

    /// A line gap above `typical_line_height * paragraph_gap_factor`
    /// starts a new paragraph.
    pub paragraph_gap_factor: f32,

    /// Gaps of at least `median_font_size * typical_gap_limit` are ignored
    /// when estimating the typical line height.
    pub typical_gap_limit: f32,

    /// Typical line height used when a page has no usable gaps, as a
    /// multiple of the median font size.
    pub fallback_line_height_factor: f32,

    /// Font size difference (points) treated as a style change.
    pub style_size_tolerance: f32,

    /// Minimum size ratio (paragraph / page median) for a heading.
    pub heading_ratio: f32,

    /// Minimum size ratio for a level 2 heading.
    pub heading_level2_ratio: f32,

    /// Minimum size ratio for a level 1 heading.
    pub heading_level1_ratio: f32,

    /// Derive centered/right alignment from line geometry.
    ///
    /// Off by default: paragraphs are left aligned unless enabled.
    pub detect_alignment: bool,
}

impl LayoutOptions {
    /// Create layout options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the same-line Y tolerance.
    pub fn with_line_tolerance(mut self, tolerance: f32) -> Self {
        self.line_tolerance = tolerance.max(0.0);
        self
    }

    /// Set the word-gap factor.
    pub fn with_space_factor(mut self, factor: f32) -> Self {
        self.space_factor = factor.max(0.0);
        self
    }

    /// Set the paragraph gap factor.
    pub fn with_paragraph_gap_factor(mut self, factor: f32) -> Self {
        self.paragraph_gap_factor = factor.max(0.0);
        self
    }

    /// Set the heading size ratio.
    pub fn with_heading_ratio(mut self, ratio: f32) -> Self {
        self.heading_ratio = ratio.max(0.0);
        self
    }

    /// Enable or disable geometric alignment detection.
    pub fn with_alignment_detection(mut self, detect: bool) -> Self {
        self.detect_alignment = detect;
        self
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            line_tolerance: 3.0,
            space_factor: 0.25,
            paragraph_gap_factor: 1.4,
            typical_gap_limit: 4.0,
            fallback_line_height_factor: 1.2,
            style_size_tolerance: 1.0,
            heading_ratio: 1.25,
            heading_level2_ratio: 1.5,
            heading_level1_ratio: 1.8,
            detect_alignment: false,
        }
    }
}
