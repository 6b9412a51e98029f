//! WordprocessingML (`.docx`) serialization.
//!
//! Writes a minimal OOXML package: content types, package and document
//! relationships, the main document part, a style sheet with three heading
//! styles, and core/app properties.

use std::io::{Cursor, Write};

use chrono::{SecondsFormat, Utc};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Result;
use crate::model::{
    Alignment, Block, Document, HeadingTier, PageSection, StyledParagraph, StyledSpan,
};

/// MIME type of a `.docx` package.
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Serializes a document model into an output container.
pub trait DocumentSerializer {
    /// Serialize the document to bytes.
    fn serialize(&self, doc: &Document) -> Result<Vec<u8>>;

    /// MIME type of the output.
    fn mime_type(&self) -> &'static str;

    /// File extension of the output, without the dot.
    fn extension(&self) -> &'static str;
}

/// Writes `.docx` packages.
#[derive(Debug, Clone, Copy)]
pub struct DocxSerializer {
    compress: bool,
}

impl Default for DocxSerializer {
    fn default() -> Self {
        Self::new()
    }
}

impl DocxSerializer {
    /// Create a serializer producing deflated packages.
    pub fn new() -> Self {
        Self { compress: true }
    }

    /// Store parts uncompressed.
    pub fn stored(mut self) -> Self {
        self.compress = false;
        self
    }
}

impl DocumentSerializer for DocxSerializer {
    fn serialize(&self, doc: &Document) -> Result<Vec<u8>> {
        let method = if self.compress {
            CompressionMethod::Deflated
        } else {
            CompressionMethod::Stored
        };
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let parts = [
            ("[Content_Types].xml", content_types_xml()),
            ("_rels/.rels", package_rels_xml()),
            ("word/_rels/document.xml.rels", document_rels_xml()),
            ("word/document.xml", document_xml(doc)),
            ("word/styles.xml", styles_xml()),
            ("docProps/core.xml", core_xml(doc)),
            ("docProps/app.xml", app_xml(doc)),
        ];
        for (name, body) in parts {
            let options = SimpleFileOptions::default().compression_method(method);
            zip.start_file(name, options)?;
            zip.write_all(body.as_bytes())?;
        }

        let cursor = zip.finish()?;
        let bytes = cursor.into_inner();
        log::debug!("docx package written: {} bytes", bytes.len());
        Ok(bytes)
    }

    fn mime_type(&self) -> &'static str {
        DOCX_MIME
    }

    fn extension(&self) -> &'static str {
        "docx"
    }
}

/// Serialize a document to `.docx` bytes.
pub fn to_docx(doc: &Document) -> Result<Vec<u8>> {
    DocxSerializer::new().serialize(doc)
}

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

fn content_types_xml() -> String {
    format!(
        r#"{XML_DECL}
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/><Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/></Types>"#
    )
}

fn package_rels_xml() -> String {
    format!(
        r#"{XML_DECL}
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/><Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/></Relationships>"#
    )
}

fn document_rels_xml() -> String {
    format!(
        r#"{XML_DECL}
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#
    )
}

fn document_xml(doc: &Document) -> String {
    let mut out = String::with_capacity(4096);
    out.push_str(XML_DECL);
    out.push_str(&format!("\n<w:document xmlns:w=\"{W_NS}\"><w:body>"));

    let last = doc.sections.len().saturating_sub(1);
    for (i, section) in doc.sections.iter().enumerate() {
        for block in &section.blocks {
            match block {
                Block::Paragraph(p) => render_paragraph(&mut out, p),
                Block::PageBreak => out.push_str(r#"<w:p><w:r><w:br w:type="page"/></w:r></w:p>"#),
            }
        }
        if i < last {
            // A section ends with a paragraph carrying its properties.
            out.push_str("<w:p><w:pPr>");
            render_section_properties(&mut out, section);
            out.push_str("</w:pPr></w:p>");
        }
    }

    match doc.sections.last() {
        Some(section) => render_section_properties(&mut out, section),
        None => render_section_properties(&mut out, &PageSection::letter(1)),
    }

    out.push_str("</w:body></w:document>");
    out
}

fn render_section_properties(out: &mut String, section: &PageSection) {
    let orient = if section.is_landscape() {
        r#" w:orient="landscape""#
    } else {
        ""
    };
    let m = &section.margins;
    out.push_str(&format!(
        r#"<w:sectPr><w:pgSz w:w="{}" w:h="{}"{}/><w:pgMar w:top="{}" w:right="{}" w:bottom="{}" w:left="{}" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr>"#,
        section.width_twips(),
        section.height_twips(),
        orient,
        m.top,
        m.right,
        m.bottom,
        m.left
    ));
}

fn render_paragraph(out: &mut String, p: &StyledParagraph) {
    out.push_str("<w:p><w:pPr>");

    if let Some(tier) = p.style.heading {
        out.push_str(&format!(r#"<w:pStyle w:val="{}"/>"#, tier.style_id()));
    }

    let spacing = &p.style.spacing;
    match spacing.line {
        Some(line) => out.push_str(&format!(
            r#"<w:spacing w:before="{}" w:after="{}" w:line="{}" w:lineRule="auto"/>"#,
            spacing.before, spacing.after, line
        )),
        None => out.push_str(&format!(
            r#"<w:spacing w:before="{}" w:after="{}"/>"#,
            spacing.before, spacing.after
        )),
    }

    if let Some(indent) = p.style.indent {
        out.push_str(&format!(
            r#"<w:ind w:left="{}" w:hanging="{}"/>"#,
            indent.left, indent.hanging
        ));
    }

    let jc = match p.style.alignment {
        Alignment::Left => None,
        Alignment::Center => Some("center"),
        Alignment::Right => Some("right"),
        Alignment::Justify => Some("both"),
    };
    if let Some(jc) = jc {
        out.push_str(&format!(r#"<w:jc w:val="{}"/>"#, jc));
    }

    out.push_str("</w:pPr>");

    for span in &p.spans {
        render_span(out, span);
    }

    out.push_str("</w:p>");
}

fn render_span(out: &mut String, span: &StyledSpan) {
    if span.text.is_empty() {
        return;
    }

    let family = escape_xml(&span.family);
    out.push_str("<w:r><w:rPr>");
    out.push_str(&format!(
        r#"<w:rFonts w:ascii="{0}" w:hAnsi="{0}" w:cs="{0}"/>"#,
        family
    ));
    if span.bold {
        out.push_str("<w:b/><w:bCs/>");
    }
    if span.italic {
        out.push_str("<w:i/><w:iCs/>");
    }
    if let Some(color) = &span.color {
        out.push_str(&format!(r#"<w:color w:val="{}"/>"#, escape_xml(color)));
    }
    out.push_str(&format!(
        r#"<w:sz w:val="{0}"/><w:szCs w:val="{0}"/>"#,
        span.size
    ));
    out.push_str("</w:rPr>");
    out.push_str(&format!(
        r#"<w:t xml:space="preserve">{}</w:t>"#,
        escape_xml(&span.text)
    ));
    out.push_str("</w:r>");
}

fn styles_xml() -> String {
    let mut out = String::with_capacity(2048);
    out.push_str(XML_DECL);
    out.push_str(&format!(
        r#"
<w:styles xmlns:w="{W_NS}"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Calibri" w:hAnsi="Calibri" w:cs="Calibri"/><w:sz w:val="22"/><w:szCs w:val="22"/></w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:spacing w:after="120" w:line="276" w:lineRule="auto"/></w:pPr></w:pPrDefault></w:docDefaults><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style>"#
    ));

    for (tier, size, level) in [
        (HeadingTier::Heading1, 32, 0),
        (HeadingTier::Heading2, 26, 1),
        (HeadingTier::Heading3, 24, 2),
    ] {
        let id = tier.style_id();
        out.push_str(&format!(
            r#"<w:style w:type="paragraph" w:styleId="{id}"><w:name w:val="heading {n}"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before="240" w:after="200"/><w:outlineLvl w:val="{level}"/></w:pPr><w:rPr><w:b/><w:bCs/><w:sz w:val="{size}"/><w:szCs w:val="{size}"/></w:rPr></w:style>"#,
            n = level + 1
        ));
    }

    out.push_str("</w:styles>");
    out
}

fn core_xml(doc: &Document) -> String {
    let meta = &doc.metadata;
    let created = meta
        .created
        .unwrap_or_else(Utc::now)
        .to_rfc3339_opts(SecondsFormat::Secs, true);
    let title = meta.title.as_deref().map(escape_xml).unwrap_or_default();

    format!(
        r#"{XML_DECL}
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:title>{title}</dc:title><dc:creator>{creator}</dc:creator><dc:description>{description}</dc:description><dcterms:created xsi:type="dcterms:W3CDTF">{created}</dcterms:created><dcterms:modified xsi:type="dcterms:W3CDTF">{created}</dcterms:modified></cp:coreProperties>"#,
        creator = escape_xml(&meta.creator),
        description = escape_xml(&meta.description),
    )
}

fn app_xml(doc: &Document) -> String {
    let pages = doc.metadata.page_count.max(doc.sections.len() as u32);
    format!(
        r#"{XML_DECL}
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties"><Application>{}</Application><Pages>{}</Pages></Properties>"#,
        escape_xml(&doc.metadata.creator),
        pages
    )
}

/// Escape text for XML content and attribute values, dropping characters
/// XML 1.0 cannot carry.
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' => out.push(c),
            c if (c as u32) < 0x20 || c == '\u{FFFE}' || c == '\u{FFFF}' => {}
            c => out.push(c),
        }
    }
    out
}
