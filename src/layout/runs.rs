//! Run building: splitting a line into style-homogeneous spans.

use serde::{Deserialize, Serialize};

use super::font::DEFAULT_FAMILY;
use super::fragment::needs_space;
use super::line::TextLine;
use super::LayoutOptions;

/// A contiguous span of text sharing one style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    /// The text content
    pub text: String,
    /// Bold text
    pub bold: bool,
    /// Italic text
    pub italic: bool,
    /// Font size in half-points (2 × point size)
    pub size: f32,
    /// Font family name
    pub family: String,
}

impl Run {
    /// Create a run from a point size.
    pub fn new(
        text: impl Into<String>,
        bold: bool,
        italic: bool,
        point_size: f32,
        family: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            bold,
            italic,
            size: point_size * 2.0,
            family: family.into(),
        }
    }

    /// Regular Calibri run at the given point size.
    pub fn plain(text: impl Into<String>, point_size: f32) -> Self {
        Self::new(text, false, false, point_size, DEFAULT_FAMILY)
    }

    /// Font size in points.
    pub fn point_size(&self) -> f32 {
        self.size / 2.0
    }

    /// A run with the same style and different text.
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..self.clone()
        }
    }

    /// Whether two runs render identically and can be merged.
    pub fn same_style(&self, other: &Run) -> bool {
        self.bold == other.bold
            && self.italic == other.italic
            && self.size == other.size
            && self.family == other.family
    }
}

/// Split a line into runs.
///
/// A new run starts when bold or italic flips or the font size moves by more
/// than `style_size_tolerance` points from the run's size. Word gaps are
/// inferred with the same rule as the line text; a space at a run boundary
/// stays with the run being closed.
pub fn build_runs(line: &TextLine, options: &LayoutOptions) -> Vec<Run> {
    let mut runs = Vec::new();
    let Some(first) = line.fragments.first() else {
        return runs;
    };

    let mut current = Run::new(
        first.text.clone(),
        first.style.bold,
        first.style.italic,
        first.font_size,
        first.style.family,
    );
    let mut current_points = first.font_size;

    for pair in line.fragments.windows(2) {
        let (prev, frag) = (&pair[0], &pair[1]);
        if needs_space(prev, frag, options.space_factor) {
            current.text.push(' ');
        }

        let style_changed = frag.style.bold != current.bold
            || frag.style.italic != current.italic
            || (frag.font_size - current_points).abs() > options.style_size_tolerance;

        if style_changed {
            if !current.text.is_empty() {
                runs.push(current);
            }
            current = Run::new(
                frag.text.clone(),
                frag.style.bold,
                frag.style.italic,
                frag.font_size,
                frag.style.family,
            );
            current_points = frag.font_size;
        } else {
            current.text.push_str(&frag.text);
        }
    }

    if !current.text.is_empty() {
        runs.push(current);
    }
    runs
}

/// Merge neighbouring runs whose styles are identical.
pub fn coalesce(runs: Vec<Run>) -> Vec<Run> {
    let mut merged: Vec<Run> = Vec::with_capacity(runs.len());
    for run in runs {
        match merged.last_mut() {
            Some(last) if last.same_style(&run) => last.text.push_str(&run.text),
            _ => merged.push(run),
        }
    }
    merged
}
