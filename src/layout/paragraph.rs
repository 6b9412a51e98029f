//! Paragraph segmentation and classification.
//!
//! Lines are grouped into paragraphs by vertical rhythm and style
//! continuity, then each paragraph is classified as heading, list item or
//! body text relative to the page's median font size.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::line::TextLine;
use super::runs::{build_runs, coalesce, Run};
use super::LayoutOptions;
use crate::model::Alignment;

/// Median font size assumed for a page without lines.
pub const FALLBACK_MEDIAN_FONT_SIZE: f32 = 12.0;

static LIST_PREFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:[•◦▪▫‣⁃●○■□►▸\-*–]|\d+[.)]|[a-zA-Z][.)])\s")
        .expect("list prefix pattern is valid")
});

/// A paragraph reconstructed from page lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paragraph {
    /// Line texts joined with single spaces
    pub text: String,
    /// Style-homogeneous runs covering `text`
    pub runs: Vec<Run>,
    /// Heading level 1-3, or None for non-headings
    pub heading_level: Option<u8>,
    /// Detected list marker, verbatim (e.g., "1. ", "• ")
    pub list_prefix: Option<String>,
    /// Horizontal alignment
    pub alignment: Alignment,
    /// Structural separator between pages; carries no text
    pub page_break: bool,
}

impl Paragraph {
    /// A page-break separator paragraph.
    pub fn page_break() -> Self {
        Self {
            text: String::new(),
            runs: Vec::new(),
            heading_level: None,
            list_prefix: None,
            alignment: Alignment::Left,
            page_break: true,
        }
    }

    /// Check if this is a heading.
    pub fn is_heading(&self) -> bool {
        self.heading_level.is_some()
    }

    /// Check if this is a list item.
    pub fn is_list(&self) -> bool {
        self.list_prefix.is_some()
    }
}

/// Per-page statistics driving the break and heading decisions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageStatistics {
    /// Median of the lines' average font sizes
    pub median_font_size: f32,
    /// Median baseline-to-baseline distance within paragraphs
    pub typical_line_height: f32,
}

impl PageStatistics {
    /// Compute statistics for one page of lines.
    pub fn from_lines(lines: &[TextLine], options: &LayoutOptions) -> Self {
        let sizes: Vec<f32> = lines.iter().map(|l| l.font_size).collect();
        let median_font_size = median(sizes).unwrap_or(FALLBACK_MEDIAN_FONT_SIZE);

        let limit = median_font_size * options.typical_gap_limit;
        let gaps: Vec<f32> = lines
            .windows(2)
            .map(|w| (w[0].y - w[1].y).abs())
            .filter(|gap| *gap < limit)
            .collect();
        let typical_line_height = median(gaps)
            .unwrap_or(median_font_size * options.fallback_line_height_factor);

        Self {
            median_font_size,
            typical_line_height,
        }
    }
}

/// Groups a page's lines into classified paragraphs.
#[derive(Debug, Clone)]
pub struct ParagraphSegmenter<'a> {
    options: &'a LayoutOptions,
}

impl<'a> ParagraphSegmenter<'a> {
    /// Create a segmenter.
    pub fn new(options: &'a LayoutOptions) -> Self {
        Self { options }
    }

    /// Segment top-to-bottom lines of one page.
    pub fn segment(&self, lines: &[TextLine]) -> Vec<Paragraph> {
        self.segment_page(lines, None)
    }

    /// Segment lines of one page whose width is known, enabling alignment
    /// detection when configured.
    pub fn segment_page(&self, lines: &[TextLine], page_width: Option<f32>) -> Vec<Paragraph> {
        let stats = PageStatistics::from_lines(lines, self.options);
        let break_gap = stats.typical_line_height * self.options.paragraph_gap_factor;
        log::debug!(
            "page stats: median size {:.1}, line height {:.1}, break gap {:.1}",
            stats.median_font_size,
            stats.typical_line_height,
            break_gap
        );

        let mut paragraphs = Vec::new();
        let mut current: Option<ParagraphBuilder> = None;
        let mut prev_y = 0.0;

        for line in lines.iter().filter(|l| !l.is_blank()) {
            let runs = build_runs(line, self.options);

            current = Some(match current.take() {
                Some(mut builder) => {
                    let gap = (prev_y - line.y).abs();
                    let style_changed = (line.font_size - builder.font_size).abs()
                        > self.options.style_size_tolerance
                        || line.bold != builder.bold;

                    if gap > break_gap || style_changed {
                        paragraphs.push(builder.finish(&stats, self.options, page_width));
                        ParagraphBuilder::start(line, runs)
                    } else {
                        builder.extend(line, runs);
                        builder
                    }
                }
                None => ParagraphBuilder::start(line, runs),
            });
            prev_y = line.y;
        }

        if let Some(builder) = current {
            paragraphs.push(builder.finish(&stats, self.options, page_width));
        }
        paragraphs
    }
}

/// Accumulates the lines of the paragraph being built.
struct ParagraphBuilder {
    texts: Vec<String>,
    runs: Vec<Run>,
    extents: Vec<(f32, f32)>,
    font_size: f32,
    bold: bool,
}

impl ParagraphBuilder {
    fn start(line: &TextLine, runs: Vec<Run>) -> Self {
        Self {
            texts: vec![line.text.clone()],
            runs,
            extents: vec![(line.min_x, line.max_x)],
            font_size: line.font_size,
            bold: line.bold,
        }
    }

    fn extend(&mut self, line: &TextLine, runs: Vec<Run>) {
        if let Some(first) = runs.first() {
            self.runs.push(first.with_text(" "));
        }
        self.runs.extend(runs);
        self.texts.push(line.text.clone());
        self.extents.push((line.min_x, line.max_x));
    }

    fn finish(
        self,
        stats: &PageStatistics,
        options: &LayoutOptions,
        page_width: Option<f32>,
    ) -> Paragraph {
        let text = self.texts.join(" ");

        let runs = if self.runs.is_empty() {
            vec![Run::plain(text.clone(), stats.median_font_size)]
        } else {
            self.runs
        };

        let avg_run_size =
            runs.iter().map(|r| r.size).sum::<f32>() / runs.len() as f32 / 2.0;
        let heading_level = heading_level(avg_run_size, stats.median_font_size, options);

        let list_prefix = if heading_level.is_none() {
            detect_list_prefix(&text)
        } else {
            None
        };

        let alignment = match page_width {
            Some(width) if options.detect_alignment => {
                detect_alignment(&self.extents, width, options.line_tolerance)
            }
            _ => Alignment::Left,
        };

        Paragraph {
            text,
            runs: coalesce(runs),
            heading_level,
            list_prefix,
            alignment,
            page_break: false,
        }
    }
}

/// Heading level for a paragraph whose runs average `avg_size` points on a
/// page with the given median size.
pub fn heading_level(avg_size: f32, median_font_size: f32, options: &LayoutOptions) -> Option<u8> {
    if median_font_size <= 0.0 {
        return None;
    }
    let ratio = avg_size / median_font_size;
    // Nothing below the heading threshold is a heading, whatever the tier ratios say.
    if ratio < options.heading_ratio {
        return None;
    }
    if ratio >= options.heading_level1_ratio {
        Some(1)
    } else if ratio >= options.heading_level2_ratio {
        Some(2)
    } else if ratio >= options.heading_ratio {
        Some(3)
    } else {
        None
    }
}

/// Detect a bullet, numbered or lettered list marker at the start of
/// `text`, returning the matched prefix verbatim.
pub fn detect_list_prefix(text: &str) -> Option<String> {
    LIST_PREFIX_RE.find(text).map(|m| m.as_str().to_string())
}

/// Classify alignment from line extents `(min_x, max_x)`.
///
/// Centered: every line has equal left and right page margins (within
/// twice the tolerance) and the block is visibly not full-width.
/// Right: right edges agree within the tolerance while the left margin
/// dominates. Everything else is left aligned.
pub fn detect_alignment(extents: &[(f32, f32)], page_width: f32, tolerance: f32) -> Alignment {
    if extents.is_empty() || page_width <= 0.0 {
        return Alignment::Left;
    }

    let lefts_vary = spread(extents.iter().map(|(l, _)| *l)) > tolerance;
    let narrow = extents.iter().all(|(l, r)| r - l < page_width * 0.7);
    if !(narrow || lefts_vary) {
        return Alignment::Left;
    }

    let centered = extents.iter().all(|(l, r)| {
        let right_margin = page_width - r;
        (l - right_margin).abs() <= tolerance * 2.0 && *l > page_width * 0.1
    });
    if centered {
        return Alignment::Center;
    }

    let rights_agree = spread(extents.iter().map(|(_, r)| *r)) <= tolerance;
    let left_heavy = extents.iter().all(|(l, r)| *l > (page_width - r) * 2.0);
    if rights_agree && left_heavy {
        return Alignment::Right;
    }

    Alignment::Left
}

fn spread(values: impl Iterator<Item = f32>) -> f32 {
    let (min, max) = values.fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    max - min
}

fn median(mut values: Vec<f32>) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f32::total_cmp);
    let mid = values.len() / 2;
    Some(if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    })
}
