//! Document-level types.

use super::PageSection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default creator recorded in the output package.
pub const DEFAULT_CREATOR: &str = "pdf2word";

/// Default description recorded in the output package.
pub const DEFAULT_DESCRIPTION: &str = "Converted from PDF by pdf2word";

/// A reconstructed document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// Document metadata (title, creator, etc.)
    pub metadata: Metadata,

    /// Sections in document order
    pub sections: Vec<PageSection>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of sections in the document.
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Get the section produced for a page (1-indexed).
    pub fn get_section(&self, page_num: u32) -> Option<&PageSection> {
        self.sections.iter().find(|s| s.number == page_num)
    }

    /// Add a section to the document.
    pub fn add_section(&mut self, section: PageSection) {
        self.sections.push(section);
    }

    /// Check if the document has any sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Number of sections that are empty-page placeholders.
    pub fn placeholder_count(&self) -> usize {
        self.sections.iter().filter(|s| s.placeholder).count()
    }

    /// Get plain text content of the entire document.
    pub fn plain_text(&self) -> String {
        self.sections
            .iter()
            .map(|section| section.plain_text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Document metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title
    pub title: Option<String>,

    /// Creator application
    pub creator: String,

    /// Document description
    pub description: String,

    /// Creation date of the converted document
    pub created: Option<DateTime<Utc>>,

    /// Source PDF version (e.g., "1.7")
    pub pdf_version: String,

    /// Total number of source pages
    pub page_count: u32,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            title: None,
            creator: DEFAULT_CREATOR.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            created: None,
            pdf_version: String::new(),
            page_count: 0,
        }
    }
}

impl Metadata {
    /// Create metadata with a title derived from a file name.
    ///
    /// The extension is stripped: `"report.pdf"` becomes `"report"`.
    pub fn for_file(file_name: &str) -> Self {
        Self {
            title: title_from_file_name(file_name),
            ..Default::default()
        }
    }
}

/// Derive a document title from a file name by dropping its extension.
pub fn title_from_file_name(file_name: &str) -> Option<String> {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name)
        .trim();
    let stem = match base.rfind('.') {
        Some(pos) if pos > 0 => &base[..pos],
        _ => base,
    };
    if stem.is_empty() {
        None
    } else {
        Some(stem.to_string())
    }
}
