//! Font name classification.
//!
//! PDF font names carry style information only by convention
//! (`"ABCDEF+Helvetica-BoldOblique"`, `"TimesNewRomanPS-ItalicMT"`). The
//! classifier maps such names to a bold/italic flag pair and a family that
//! Word can render.

use serde::Serialize;

/// Family used when no keyword matches.
pub const DEFAULT_FAMILY: &str = "Calibri";

const BOLD_KEYWORDS: &[&str] = &["bold", "heavy", "black", "semibold", "demibold"];
const ITALIC_KEYWORDS: &[&str] = &["italic", "oblique", "slant"];

/// Family keyword table, checked in order. Named families come before the
/// generic serif/sans/mono groups so "Calibri-Bold" is not mistaken for a
/// generic face, and "sans" precedes "serif" so "sans-serif" is sans.
const FAMILY_KEYWORDS: &[(&[&str], &str)] = &[
    (&["calibri"], "Calibri"),
    (&["cambria"], "Cambria"),
    (&["georgia"], "Georgia"),
    (&["garamond"], "Garamond"),
    (&["verdana"], "Verdana"),
    (&["tahoma"], "Tahoma"),
    (&["trebuchet"], "Trebuchet MS"),
    (&["mono", "courier"], "Courier New"),
    (&["sans", "arial", "helvetica"], "Arial"),
    (&["serif", "times"], "Times New Roman"),
];

/// Style derived from a font name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FontStyle {
    pub bold: bool,
    pub italic: bool,
    pub family: &'static str,
}

impl Default for FontStyle {
    fn default() -> Self {
        Self {
            bold: false,
            italic: false,
            family: DEFAULT_FAMILY,
        }
    }
}

/// Classify a font name. Empty or unrecognized names yield the default
/// regular Calibri style.
pub fn classify(font_name: &str) -> FontStyle {
    let name = font_name.to_lowercase();
    let has_any = |keywords: &[&str]| keywords.iter().any(|k| name.contains(k));

    let family = FAMILY_KEYWORDS
        .iter()
        .find(|(keywords, _)| has_any(keywords))
        .map(|(_, family)| *family)
        .unwrap_or(DEFAULT_FAMILY);

    FontStyle {
        bold: has_any(BOLD_KEYWORDS),
        italic: has_any(ITALIC_KEYWORDS),
        family,
    }
}
