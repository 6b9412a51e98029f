//! PDF access: backend trait, lopdf implementation and content stream walking.

mod backend;
mod content;

pub use backend::{load_lopdf, BackendLoader, LopdfBackend, PdfBackend, Viewport};
pub use content::{
    decode_text_simple, get_number_from_value, ContentOp, ContentWalker, FontMetrics, FontSource,
    PdfValue,
};
