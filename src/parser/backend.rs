//! PDF backend abstraction layer.
//!
//! Provides a trait-based interface for the extraction collaborator,
//! isolating the concrete PDF library (lopdf) from layout reconstruction.

use std::collections::{BTreeMap, HashMap};

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use super::content::{
    decode_text_simple, ContentOp, ContentWalker, FontMetrics, FontSource, PdfValue,
};
use crate::error::{Error, Result};
use crate::layout::TextFragment;

/// Page size in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// US Letter, used when a page declares no usable MediaBox.
    pub const LETTER: Viewport = Viewport {
        width: 612.0,
        height: 792.0,
    };

    /// Create a viewport.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::LETTER
    }
}

/// Abstract interface for an opened PDF document.
///
/// Pages are numbered from 1.
pub trait PdfBackend {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Page size in points.
    fn page_viewport(&self, page: u32) -> Result<Viewport>;

    /// Positioned text fragments of a page in content stream order.
    fn page_fragments(&self, page: u32) -> Result<Vec<TextFragment>>;

    /// PDF version string (e.g., "1.7").
    fn version(&self) -> String {
        String::new()
    }

    /// Title from the document information dictionary.
    fn title(&self) -> Option<String> {
        None
    }
}

/// Opens a backend from bytes and an optional password.
pub type BackendLoader = fn(&[u8], Option<&str>) -> Result<Box<dyn PdfBackend>>;

/// The default loader, backed by lopdf.
pub fn load_lopdf(data: &[u8], password: Option<&str>) -> Result<Box<dyn PdfBackend>> {
    Ok(Box::new(LopdfBackend::load(data, password)?))
}

// ---------------------------------------------------------------------------
// LopdfBackend: concrete implementation backed by lopdf
// ---------------------------------------------------------------------------

/// Concrete [`PdfBackend`] backed by `lopdf::Document`.
pub struct LopdfBackend {
    doc: LopdfDocument,
    pages: BTreeMap<u32, ObjectId>,
    encrypted: bool,
}

impl LopdfBackend {
    /// Load from an in-memory byte slice, decrypting with `password` when
    /// the document is encrypted.
    pub fn load(data: &[u8], password: Option<&str>) -> Result<Self> {
        let header = crate::detect::sniff(data)?;
        log::debug!("Loading PDF {} ({} bytes)", header, data.len());

        // lopdf only loads the objects of an encrypted file once a password
        // authenticates; the empty user password is always tried first.
        let doc = match password {
            Some(pw) => LopdfDocument::load_mem_with_password(data, pw).map_err(|e| match e {
                lopdf::Error::InvalidPassword | lopdf::Error::Decryption(_) => {
                    Error::InvalidPassword
                }
                _ => Error::from(e),
            })?,
            None => LopdfDocument::load_mem(data).map_err(|e| match e {
                lopdf::Error::Decryption(_) => Error::Encrypted,
                _ => Error::from(e),
            })?,
        };

        // Still encrypted after loading means no password authenticated.
        if doc.is_encrypted() {
            return Err(match password {
                Some(_) => Error::InvalidPassword,
                None => Error::Encrypted,
            });
        }

        let encrypted = doc.encryption_state.is_some();
        if !encrypted && password.is_some() {
            log::debug!("Password supplied for an unencrypted document; ignoring");
        }

        let pages = doc.get_pages();
        Ok(Self {
            doc,
            pages,
            encrypted,
        })
    }

    /// Load from a file path.
    pub fn load_file<P: AsRef<std::path::Path>>(path: P, password: Option<&str>) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::load(&data, password)
    }

    /// Direct access to the underlying `lopdf::Document`.
    pub fn raw_doc(&self) -> &LopdfDocument {
        &self.doc
    }

    /// Check if the source document was encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.encrypted
    }

    fn page_id(&self, page: u32) -> Result<ObjectId> {
        self.pages
            .get(&page)
            .copied()
            .ok_or(Error::PageOutOfRange(page, self.pages.len() as u32))
    }

    /// Look up a page attribute, following `/Parent` for inheritable keys.
    fn inherited<'a>(&'a self, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
        let mut current = self.doc.get_dictionary(page_id).ok();
        let mut depth = 0;
        while let Some(dict) = current {
            if let Ok(value) = dict.get(key) {
                return Some(value);
            }
            depth += 1;
            if depth > 32 {
                break;
            }
            current = dict
                .get(b"Parent")
                .and_then(Object::as_reference)
                .and_then(|id| self.doc.get_dictionary(id))
                .ok();
        }
        None
    }

    fn resolve<'a>(&'a self, obj: &'a Object) -> &'a Object {
        match obj {
            Object::Reference(id) => self.doc.get_object(*id).unwrap_or(obj),
            _ => obj,
        }
    }

    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>> {
        let content =
            lopdf::content::Content::decode(data).map_err(|e| Error::PdfParse(e.to_string()))?;

        Ok(content
            .operations
            .into_iter()
            .map(|op| ContentOp {
                operator: op.operator,
                operands: op.operands.iter().map(convert_object).collect(),
            })
            .collect())
    }

    fn font_metrics(&self, dict: &Dictionary) -> FontMetrics {
        let base_font = dict
            .get(b"BaseFont")
            .ok()
            .and_then(|o| o.as_name().ok())
            .map(|n| String::from_utf8_lossy(n).into_owned())
            .unwrap_or_else(|| "Unknown".to_string());

        let composite = dict
            .get(b"Subtype")
            .and_then(Object::as_name)
            .map(|s| s == b"Type0")
            .unwrap_or(false);

        let first_char = dict
            .get(b"FirstChar")
            .ok()
            .and_then(|o| number(self.resolve(o)))
            .unwrap_or(0.0)
            .max(0.0) as u32;

        let widths = dict
            .get(b"Widths")
            .ok()
            .and_then(|o| self.resolve(o).as_array().ok())
            .map(|arr| {
                arr.iter()
                    .map(|w| number(self.resolve(w)).unwrap_or(0.0))
                    .collect()
            })
            .unwrap_or_default();

        let missing_width = dict
            .get(b"FontDescriptor")
            .ok()
            .and_then(|o| self.resolve(o).as_dict().ok())
            .and_then(|d| d.get(b"MissingWidth").ok())
            .and_then(|o| number(self.resolve(o)))
            .unwrap_or(0.0);

        FontMetrics {
            base_font,
            first_char,
            widths,
            missing_width,
            composite,
        }
    }
}

impl PdfBackend for LopdfBackend {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_viewport(&self, page: u32) -> Result<Viewport> {
        let page_id = self.page_id(page)?;
        let media_box = self
            .inherited(page_id, b"MediaBox")
            .map(|o| self.resolve(o))
            .and_then(|o| o.as_array().ok());

        if let Some(array) = media_box {
            if array.len() >= 4 {
                let coords: Vec<f32> = array
                    .iter()
                    .take(4)
                    .filter_map(|o| number(self.resolve(o)))
                    .collect();
                if let &[x0, y0, x1, y1] = coords.as_slice() {
                    let (width, height) = ((x1 - x0).abs(), (y1 - y0).abs());
                    if width > 0.0 && height > 0.0 {
                        return Ok(Viewport::new(width, height));
                    }
                }
            }
        }

        log::warn!("Page {} has no usable MediaBox; assuming Letter", page);
        Ok(Viewport::LETTER)
    }

    fn page_fragments(&self, page: u32) -> Result<Vec<TextFragment>> {
        let page_id = self.page_id(page)?;

        let content = match self.doc.get_page_content(page_id) {
            Ok(data) => data,
            Err(e) => {
                log::warn!("Page {} has no readable content stream: {}", page, e);
                return Ok(Vec::new());
            }
        };
        let ops = self
            .decode_content(&content)
            .map_err(|e| Error::TextExtract(format!("Page {}: {}", page, e)))?;

        let dicts = self.doc.get_page_fonts(page_id).unwrap_or_default();
        let fonts = PageFonts {
            doc: &self.doc,
            metrics: dicts
                .iter()
                .map(|(name, dict)| (name.clone(), self.font_metrics(dict)))
                .collect(),
            dicts,
        };

        Ok(ContentWalker::new(&fonts).walk(&ops))
    }

    fn version(&self) -> String {
        self.doc.version.to_string()
    }

    fn title(&self) -> Option<String> {
        let info = self.doc.trailer.get(b"Info").ok()?;
        let dict = self.resolve(info).as_dict().ok()?;
        get_string_from_dict(dict, b"Title").filter(|t| !t.trim().is_empty())
    }
}

/// Fonts of one page with their lopdf encodings.
struct PageFonts<'a> {
    doc: &'a LopdfDocument,
    dicts: BTreeMap<Vec<u8>, &'a Dictionary>,
    metrics: HashMap<Vec<u8>, FontMetrics>,
}

impl FontSource for PageFonts<'_> {
    fn metrics(&self, font: &[u8]) -> Option<&FontMetrics> {
        self.metrics.get(font)
    }

    fn decode(&self, font: &[u8], bytes: &[u8]) -> String {
        if let Some(dict) = self.dicts.get(font) {
            if let Ok(enc) = dict.get_font_encoding(self.doc) {
                if let Ok(text) = LopdfDocument::decode_text(&enc, bytes) {
                    return text;
                }
            }
        }
        decode_text_simple(bytes)
    }
}

/// Convert a `lopdf::Object` to [`PdfValue`].
fn convert_object(obj: &Object) -> PdfValue {
    match obj {
        Object::Integer(i) => PdfValue::Integer(*i),
        Object::Real(r) => PdfValue::Real(*r),
        Object::Name(n) => PdfValue::Name(n.clone()),
        Object::String(b, _) => PdfValue::Str(b.clone()),
        Object::Array(arr) => PdfValue::Array(arr.iter().map(convert_object).collect()),
        _ => PdfValue::Other,
    }
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Helper to get a string from a PDF dictionary.
fn get_string_from_dict(dict: &Dictionary, key: &[u8]) -> Option<String> {
    match dict.get(key).ok()? {
        Object::String(bytes, _) => Some(decode_text_simple(bytes)),
        Object::Name(bytes) => String::from_utf8(bytes.clone()).ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Stream};

    /// Build a one-page PDF with a single Helvetica text line.
    fn sample_pdf(text: &str) -> Vec<u8> {
        let mut doc = LopdfDocument::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        let media_box: Vec<Object> = vec![0.into(), 0.into(), 595.into(), 842.into()];
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 18.into()]),
                Operation::new("Td", vec![100.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "MediaBox" => media_box,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_load_and_extract() {
        let backend = LopdfBackend::load(&sample_pdf("Quarterly Report"), None).unwrap();
        assert_eq!(backend.page_count(), 1);
        assert_eq!(backend.version(), "1.5");

        let frags = backend.page_fragments(1).unwrap();
        assert_eq!(frags.len(), 1);
        assert_eq!(frags[0].text, "Quarterly Report");
        assert_eq!((frags[0].x, frags[0].y), (100.0, 700.0));
        assert_eq!(frags[0].font_size, 18.0);
        assert_eq!(frags[0].font_name, "Helvetica-Bold");
        assert!(frags[0].style.bold);
    }

    #[test]
    fn test_inherited_media_box() {
        let backend = LopdfBackend::load(&sample_pdf("x"), None).unwrap();
        assert_eq!(backend.page_viewport(1).unwrap(), Viewport::new(595.0, 842.0));
    }

    #[test]
    fn test_page_out_of_range() {
        let backend = LopdfBackend::load(&sample_pdf("x"), None).unwrap();
        assert!(matches!(
            backend.page_fragments(2),
            Err(Error::PageOutOfRange(2, 1))
        ));
    }

    #[test]
    fn test_garbage_is_an_error() {
        assert!(matches!(
            LopdfBackend::load(b"not a pdf at all", None),
            Err(Error::UnknownFormat)
        ));
        assert!(LopdfBackend::load(b"%PDF-1.4\ntruncated", None).is_err());
    }

    #[test]
    fn test_convert_object() {
        let arr = Object::Array(vec![Object::Integer(-250), Object::Real(1.5)]);
        assert_eq!(
            convert_object(&arr),
            PdfValue::Array(vec![PdfValue::Integer(-250), PdfValue::Real(1.5)])
        );
    }
}
