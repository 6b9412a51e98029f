//! Shared fixtures for integration tests.
#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{
    dictionary, Document, EncryptionState, EncryptionVersion, Object, Permissions, Stream,
    StringFormat,
};

use pdf2word::{PdfBackend, Result, TextFragment, Viewport};

/// One line of text placed on a generated page.
pub struct Line {
    pub font: &'static str,
    pub size: i64,
    pub x: i64,
    pub y: i64,
    pub text: &'static str,
}

pub fn line(font: &'static str, size: i64, x: i64, y: i64, text: &'static str) -> Line {
    Line {
        font,
        size,
        x,
        y,
        text,
    }
}

/// Build a PDF with one Letter page per entry of `pages`.
///
/// `F1` is Helvetica and `F2` is Helvetica-Bold.
pub fn build_pdf(pages: &[Vec<Line>]) -> Vec<u8> {
    save(build_document(pages))
}

fn build_document(pages: &[Vec<Line>]) -> Document {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => regular, "F2" => bold },
    });

    let mut kids: Vec<Object> = Vec::new();
    for lines in pages {
        let mut operations = Vec::new();
        for l in lines {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec![l.font.into(), l.size.into()]));
            operations.push(Operation::new("Td", vec![l.x.into(), l.y.into()]));
            operations.push(Operation::new("Tj", vec![Object::string_literal(l.text)]));
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations };
        let media_box: Vec<Object> = vec![0.into(), 0.into(), 612.into(), 792.into()];
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => media_box,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

fn save(mut doc: Document) -> Vec<u8> {
    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// Build a PDF like [`build_pdf`], RC4-128 encrypted with `user_password`.
pub fn build_encrypted_pdf(pages: &[Vec<Line>], user_password: &str) -> Vec<u8> {
    let mut doc = build_document(pages);
    // The key derivation hashes the first file identifier.
    let id: Vec<Object> = vec![
        Object::String(b"pdf2word-fixture".to_vec(), StringFormat::Literal),
        Object::String(b"pdf2word-fixture".to_vec(), StringFormat::Literal),
    ];
    doc.trailer.set("ID", id);

    let state = EncryptionState::try_from(EncryptionVersion::V2 {
        document: &doc,
        owner_password: "owner",
        user_password,
        key_length: 128,
        permissions: Permissions::all(),
    })
    .unwrap();
    doc.encrypt(&state).unwrap();
    save(doc)
}

fn report_pages() -> Vec<Vec<Line>> {
    vec![
        vec![
            line("F2", 24, 72, 700, "Title"),
            line("F1", 12, 72, 660, "The first body line"),
            line("F1", 12, 72, 646, "continues on a second line"),
            line("F1", 12, 72, 632, "and ends on a third."),
        ],
        vec![],
    ]
}

/// The two-page report: a bold title and three body lines, then a page
/// without text.
pub fn report_pdf() -> Vec<u8> {
    build_pdf(&report_pages())
}

/// [`report_pdf`] protected by a user password.
pub fn encrypted_report_pdf(user_password: &str) -> Vec<u8> {
    build_encrypted_pdf(&report_pages(), user_password)
}

/// In-memory backend with fixed fragments per page.
pub struct FixedBackend {
    pub pages: Vec<Vec<TextFragment>>,
    pub viewport: Viewport,
}

impl FixedBackend {
    pub fn new(pages: Vec<Vec<TextFragment>>) -> Self {
        Self {
            pages,
            viewport: Viewport::LETTER,
        }
    }

    /// Fragments matching [`report_pdf`].
    pub fn report() -> Self {
        Self::new(vec![
            vec![
                TextFragment::new("Title", 72.0, 700.0, 60.0, 24.0, "Helvetica-Bold"),
                TextFragment::new("The first body line", 72.0, 660.0, 114.0, 12.0, "Helvetica"),
                TextFragment::new("continues on a second line", 72.0, 646.0, 156.0, 12.0, "Helvetica"),
                TextFragment::new("and ends on a third.", 72.0, 632.0, 120.0, 12.0, "Helvetica"),
            ],
            vec![],
        ])
    }
}

impl PdfBackend for FixedBackend {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_viewport(&self, _page: u32) -> Result<Viewport> {
        Ok(self.viewport)
    }

    fn page_fragments(&self, page: u32) -> Result<Vec<TextFragment>> {
        self.pages
            .get(page as usize - 1)
            .cloned()
            .ok_or(pdf2word::Error::PageOutOfRange(page, self.pages.len() as u32))
    }

    fn version(&self) -> String {
        "1.7".to_string()
    }
}

/// Read one part of a `.docx` package as a string.
pub fn read_part(docx: &[u8], name: &str) -> String {
    use std::io::Read;

    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(docx)).unwrap();
    let mut file = archive.by_name(name).unwrap();
    let mut out = String::new();
    file.read_to_string(&mut out).unwrap();
    out
}
