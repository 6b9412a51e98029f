//! Document assembly: layout paragraphs to structural document blocks.
//!
//! The assembler maps each reconstructed [`Paragraph`] onto a
//! [`StyledParagraph`] with heading tier, list indentation and spacing, and
//! wraps a page's paragraphs into a [`PageSection`].

use serde::{Deserialize, Serialize};

use crate::layout::{Paragraph, Run};
use crate::model::{
    Block, HeadingTier, Indent, PageSection, ParagraphStyle, Spacing, StyledParagraph, StyledSpan,
};
use crate::parser::Viewport;

/// Spacing before a heading, in twips.
pub const HEADING_SPACE_BEFORE: u32 = 240;
/// Spacing after a heading, in twips.
pub const HEADING_SPACE_AFTER: u32 = 200;
/// Spacing after a body paragraph, in twips.
pub const BODY_SPACE_AFTER: u32 = 120;
/// Body line height in 240ths of a line (1.15 lines).
pub const BODY_LINE: u32 = 276;
/// Left indent of list items, in twips.
pub const LIST_INDENT_LEFT: u32 = 720;
/// Hanging indent of list items, in twips.
pub const LIST_INDENT_HANGING: u32 = 360;

/// Placeholder styling for pages without text.
const PLACEHOLDER_SIZE: u32 = 20;
const PLACEHOLDER_COLOR: &str = "808080";
const PLACEHOLDER_FAMILY: &str = "Calibri";

/// Text of the paragraph emitted for a page without extractable text.
pub fn placeholder_text(page_number: u32) -> String {
    format!(
        "[Page {} contains no extractable text. It may be a scanned image \u{2014} try the OCR converter instead.]",
        page_number
    )
}

/// How page sections are laid out in the output document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionMode {
    /// One section per source page, each with the page's own size.
    #[default]
    PerPage,
    /// A single section; pages are separated by page breaks.
    Continuous,
}

/// Maps layout paragraphs onto the document model.
#[derive(Debug, Clone, Copy, Default)]
pub struct Assembler;

impl Assembler {
    /// Create an assembler.
    pub fn new() -> Self {
        Self
    }

    /// Assemble paragraphs into structural blocks.
    pub fn assemble(&self, paragraphs: &[Paragraph]) -> Vec<Block> {
        paragraphs
            .iter()
            .map(|p| {
                if p.page_break {
                    Block::PageBreak
                } else {
                    Block::Paragraph(self.paragraph(p))
                }
            })
            .collect()
    }

    /// Convert a single paragraph.
    pub fn paragraph(&self, paragraph: &Paragraph) -> StyledParagraph {
        let mut spans: Vec<StyledSpan> = paragraph.runs.iter().map(span_from_run).collect();

        let mut style = ParagraphStyle {
            alignment: paragraph.alignment,
            ..Default::default()
        };

        if let Some(level) = paragraph.heading_level {
            style.heading = Some(HeadingTier::from_level(level));
            style.spacing = Spacing {
                before: HEADING_SPACE_BEFORE,
                after: HEADING_SPACE_AFTER,
                line: None,
            };
        } else {
            style.spacing = Spacing {
                before: 0,
                after: BODY_SPACE_AFTER,
                line: Some(BODY_LINE),
            };
            if let Some(prefix) = &paragraph.list_prefix {
                spans = rewrite_list_prefix(spans, prefix);
                style.indent = Some(Indent {
                    left: LIST_INDENT_LEFT,
                    hanging: LIST_INDENT_HANGING,
                });
            }
        }

        StyledParagraph { spans, style }
    }

    /// Wrap one page's paragraphs into a section.
    ///
    /// A page without paragraphs gets the placeholder section.
    pub fn page_section(
        &self,
        page_number: u32,
        viewport: Viewport,
        paragraphs: &[Paragraph],
    ) -> PageSection {
        if paragraphs.iter().all(|p| p.page_break) {
            return self.empty_page_section(page_number, viewport);
        }
        let mut section = PageSection::new(page_number, viewport.width, viewport.height);
        section.blocks = self.assemble(paragraphs);
        section
    }

    /// Section for a page that yielded no extractable text.
    pub fn empty_page_section(&self, page_number: u32, viewport: Viewport) -> PageSection {
        let span = StyledSpan {
            text: placeholder_text(page_number),
            bold: false,
            italic: true,
            size: PLACEHOLDER_SIZE,
            family: PLACEHOLDER_FAMILY.to_string(),
            color: Some(PLACEHOLDER_COLOR.to_string()),
        };
        let mut section = PageSection::new(page_number, viewport.width, viewport.height);
        section.add_paragraph(StyledParagraph::new(vec![span]));
        section.placeholder = true;
        section
    }

    /// Arrange per-page sections according to `mode`.
    ///
    /// In continuous mode all blocks move into the first section, separated
    /// by page breaks; the result keeps the first page's size.
    pub fn arrange(&self, sections: Vec<PageSection>, mode: SectionMode) -> Vec<PageSection> {
        if mode == SectionMode::PerPage || sections.len() < 2 {
            return sections;
        }

        let mut iter = sections.into_iter();
        let Some(mut merged) = iter.next() else {
            return Vec::new();
        };
        for section in iter {
            merged.blocks.push(Block::PageBreak);
            merged.blocks.extend(section.blocks);
            merged.placeholder &= section.placeholder;
        }
        vec![merged]
    }
}

fn span_from_run(run: &Run) -> StyledSpan {
    StyledSpan {
        text: run.text.clone(),
        bold: run.bold,
        italic: run.italic,
        size: run.size.round().max(1.0) as u32,
        family: run.family.clone(),
        color: None,
    }
}

/// Strip the verbatim prefix from the leading spans and re-emit it
/// normalized as `"{trimmed prefix} "`.
fn rewrite_list_prefix(spans: Vec<StyledSpan>, prefix: &str) -> Vec<StyledSpan> {
    let Some(first) = spans.first().cloned() else {
        return spans;
    };

    let mut remaining = prefix.len();
    let mut rest = Vec::with_capacity(spans.len());
    for mut span in spans {
        if remaining == 0 {
            rest.push(span);
            continue;
        }
        if span.text.len() <= remaining {
            remaining -= span.text.len();
            continue;
        }
        if let Some(tail) = span.text.get(remaining..) {
            span.text = tail.to_string();
        }
        remaining = 0;
        rest.push(span);
    }

    let marker = format!("{} ", prefix.trim());
    match rest.first_mut() {
        Some(head) if same_span_style(head, &first) => {
            head.text.insert_str(0, &marker);
            rest
        }
        _ => {
            let mut out = Vec::with_capacity(rest.len() + 1);
            out.push(StyledSpan {
                text: marker,
                ..first
            });
            out.extend(rest);
            out
        }
    }
}

fn same_span_style(a: &StyledSpan, b: &StyledSpan) -> bool {
    a.bold == b.bold
        && a.italic == b.italic
        && a.size == b.size
        && a.family == b.family
        && a.color == b.color
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Alignment;

    fn body(text: &str, runs: Vec<Run>) -> Paragraph {
        Paragraph {
            text: text.to_string(),
            runs,
            heading_level: None,
            list_prefix: None,
            alignment: Alignment::Left,
            page_break: false,
        }
    }

    #[test]
    fn test_body_spacing() {
        let p = body("Hello", vec![Run::plain("Hello", 12.0)]);
        let out = Assembler::new().paragraph(&p);
        assert_eq!(out.style.spacing.after, 120);
        assert_eq!(out.style.spacing.line, Some(276));
        assert_eq!(out.spans[0].size, 24);
        assert!(out.style.heading.is_none());
    }

    #[test]
    fn test_heading_tier_and_spacing() {
        let mut p = body("Title", vec![Run::new("Title", true, false, 24.0, "Arial")]);
        p.heading_level = Some(2);
        let out = Assembler::new().paragraph(&p);
        assert_eq!(out.style.heading, Some(HeadingTier::Heading2));
        assert_eq!(out.style.spacing.before, 240);
        assert_eq!(out.style.spacing.after, 200);
        assert!(out.style.indent.is_none());
    }

    #[test]
    fn test_list_prefix_normalized() {
        let mut p = body(
            "1.   First item",
            vec![Run::plain("1.   First item", 12.0)],
        );
        p.list_prefix = Some("1.   ".to_string());
        let out = Assembler::new().paragraph(&p);
        assert_eq!(out.plain_text(), "1. First item");
        assert_eq!(out.spans.len(), 1);
        assert_eq!(
            out.style.indent,
            Some(Indent {
                left: 720,
                hanging: 360
            })
        );
    }

    #[test]
    fn test_list_prefix_in_own_run() {
        let mut p = body(
            "• Bold point",
            vec![
                Run::plain("• ", 12.0),
                Run::new("Bold point", true, false, 12.0, "Calibri"),
            ],
        );
        p.list_prefix = Some("• ".to_string());
        let out = Assembler::new().paragraph(&p);
        assert_eq!(out.spans.len(), 2);
        assert_eq!(out.spans[0].text, "• ");
        assert!(!out.spans[0].bold);
        assert_eq!(out.spans[1].text, "Bold point");
    }

    #[test]
    fn test_page_break_block() {
        let blocks = Assembler::new().assemble(&[
            body("a", vec![Run::plain("a", 12.0)]),
            Paragraph::page_break(),
        ]);
        assert!(blocks[0].is_paragraph());
        assert_eq!(blocks[1], Block::PageBreak);
    }

    #[test]
    fn test_empty_page_placeholder() {
        let section = Assembler::new().page_section(3, Viewport::LETTER, &[]);
        assert!(section.placeholder);
        assert_eq!(section.blocks.len(), 1);
        let para = section.blocks[0].as_paragraph().unwrap();
        let span = &para.spans[0];
        assert!(span.italic);
        assert_eq!(span.size, 20);
        assert_eq!(span.color.as_deref(), Some("808080"));
        assert!(span.text.starts_with("[Page 3 contains no extractable text."));
        assert!(span.text.contains("OCR"));
        assert_eq!(section.margins.left, 1440);
    }

    #[test]
    fn test_arrange_continuous() {
        let a = Assembler::new();
        let sections = vec![
            a.page_section(1, Viewport::LETTER, &[body("one", vec![Run::plain("one", 12.0)])]),
            a.empty_page_section(2, Viewport::LETTER),
        ];
        let merged = a.arrange(sections.clone(), SectionMode::Continuous);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].blocks.len(), 3);
        assert_eq!(merged[0].blocks[1], Block::PageBreak);
        assert!(!merged[0].placeholder);

        assert_eq!(a.arrange(sections, SectionMode::PerPage).len(), 2);
    }
}
