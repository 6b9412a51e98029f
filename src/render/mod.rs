//! Serialization of the reconstructed document.

mod docx;
mod json;
mod result;
mod text;

pub use docx::{escape_xml, to_docx, DocumentSerializer, DocxSerializer, DOCX_MIME};
pub use json::{section_to_json, to_json, JsonFormat};
pub use result::DocumentStats;
pub use text::to_text;
