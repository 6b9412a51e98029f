//! Content stream walking.
//!
//! Turns the decoded operations of a page into positioned [`TextFragment`]s.
//! The walker tracks the graphics state stack (CTM), the text state
//! (`Tc`, `Tw`, `Tz`, `TL`, `Ts`, font and size) and the text/line matrices,
//! advancing the text matrix by glyph widths after every show operator.

use std::collections::HashMap;

use unicode_normalization::UnicodeNormalization;

use crate::layout::TextFragment;

/// A value from a PDF content stream operand.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfValue {
    Integer(i64),
    Real(f32),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<PdfValue>),
    Other,
}

/// A single operation from a PDF content stream.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentOp {
    pub operator: String,
    pub operands: Vec<PdfValue>,
}

impl ContentOp {
    /// Create an operation.
    pub fn new(operator: impl Into<String>, operands: Vec<PdfValue>) -> Self {
        Self {
            operator: operator.into(),
            operands,
        }
    }

    fn number(&self, idx: usize) -> Option<f32> {
        self.operands.get(idx).and_then(get_number_from_value)
    }
}

/// Helper: extract a number from a [`PdfValue`].
pub fn get_number_from_value(val: &PdfValue) -> Option<f32> {
    match val {
        PdfValue::Integer(i) => Some(*i as f32),
        PdfValue::Real(r) => Some(*r),
        _ => None,
    }
}

/// Simple text decoding fallback when no encoding is available.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

/// Glyph metrics of one font resource.
#[derive(Debug, Clone, PartialEq)]
pub struct FontMetrics {
    /// Base font name (e.g., "Helvetica-Bold")
    pub base_font: String,
    /// First character code covered by `widths`
    pub first_char: u32,
    /// Glyph widths in thousandths of text space
    pub widths: Vec<f32>,
    /// Width for codes outside `widths`
    pub missing_width: f32,
    /// Composite (multi-byte) font; byte widths do not apply
    pub composite: bool,
}

impl FontMetrics {
    /// Metrics without a width table.
    pub fn named(base_font: impl Into<String>) -> Self {
        Self {
            base_font: base_font.into(),
            first_char: 0,
            widths: Vec::new(),
            missing_width: 0.0,
            composite: false,
        }
    }

    /// Attach a width table starting at `first_char`.
    pub fn with_widths(mut self, first_char: u32, widths: Vec<f32>) -> Self {
        self.first_char = first_char;
        self.widths = widths;
        self
    }

    /// Whether per-byte glyph widths can be used.
    pub fn has_widths(&self) -> bool {
        !self.composite && !self.widths.is_empty()
    }

    /// Width of a single-byte code in thousandths of text space.
    pub fn code_width(&self, code: u8) -> f32 {
        let code = code as u32;
        code.checked_sub(self.first_char)
            .and_then(|idx| self.widths.get(idx as usize).copied())
            .unwrap_or(self.missing_width)
    }
}

/// Font lookup for the walker.
pub trait FontSource {
    /// Metrics for a font resource name, if known.
    fn metrics(&self, font: &[u8]) -> Option<&FontMetrics>;

    /// Decode shown bytes using the font's encoding.
    fn decode(&self, font: &[u8], bytes: &[u8]) -> String;
}

impl FontSource for HashMap<Vec<u8>, FontMetrics> {
    fn metrics(&self, font: &[u8]) -> Option<&FontMetrics> {
        self.get(font)
    }

    fn decode(&self, _font: &[u8], bytes: &[u8]) -> String {
        decode_text_simple(bytes)
    }
}

/// Width of an unknown glyph relative to the font size.
const FALLBACK_GLYPH_WIDTH: f32 = 0.5;

/// TJ adjustment (thousandths of text space) read as a word gap.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

const IDENTITY: [f32; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// Multiply two 2D transformation matrices `[a, b, c, d, e, f]`.
fn multiply_matrices(m1: &[f32; 6], m2: &[f32; 6]) -> [f32; 6] {
    [
        m1[0] * m2[0] + m1[1] * m2[2],
        m1[0] * m2[1] + m1[1] * m2[3],
        m1[2] * m2[0] + m1[3] * m2[2],
        m1[2] * m2[1] + m1[3] * m2[3],
        m1[4] * m2[0] + m1[5] * m2[2] + m2[4],
        m1[4] * m2[1] + m1[5] * m2[3] + m2[5],
    ]
}

fn translation(tx: f32, ty: f32) -> [f32; 6] {
    [1.0, 0.0, 0.0, 1.0, tx, ty]
}

/// State saved by `q` and restored by `Q`.
#[derive(Debug, Clone)]
struct GraphicsState {
    ctm: [f32; 6],
    font: Vec<u8>,
    font_size: f32,
    char_spacing: f32,
    word_spacing: f32,
    h_scale: f32,
    leading: f32,
    rise: f32,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            ctm: IDENTITY,
            font: Vec::new(),
            font_size: 12.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            h_scale: 1.0,
            leading: 0.0,
            rise: 0.0,
        }
    }
}

/// Walks content stream operations and collects text fragments.
pub struct ContentWalker<'a> {
    fonts: &'a dyn FontSource,
    state: GraphicsState,
    stack: Vec<GraphicsState>,
    text_matrix: [f32; 6],
    line_matrix: [f32; 6],
    in_text: bool,
    fragments: Vec<TextFragment>,
}

impl<'a> ContentWalker<'a> {
    /// Create a walker resolving fonts through `fonts`.
    pub fn new(fonts: &'a dyn FontSource) -> Self {
        Self {
            fonts,
            state: GraphicsState::default(),
            stack: Vec::new(),
            text_matrix: IDENTITY,
            line_matrix: IDENTITY,
            in_text: false,
            fragments: Vec::new(),
        }
    }

    /// Walk all operations and return the fragments in stream order.
    pub fn walk(mut self, ops: &[ContentOp]) -> Vec<TextFragment> {
        for op in ops {
            self.apply(op);
        }
        self.fragments
    }

    fn apply(&mut self, op: &ContentOp) {
        match op.operator.as_str() {
            "q" => self.stack.push(self.state.clone()),
            "Q" => {
                if let Some(saved) = self.stack.pop() {
                    self.state = saved;
                }
            }
            "cm" => {
                if let Some(m) = matrix_operands(op) {
                    self.state.ctm = multiply_matrices(&m, &self.state.ctm);
                }
            }
            "BT" => {
                self.in_text = true;
                self.text_matrix = IDENTITY;
                self.line_matrix = IDENTITY;
            }
            "ET" => {
                self.in_text = false;
                self.mark_eol();
            }
            "Tf" => {
                if let Some(PdfValue::Name(name)) = op.operands.first() {
                    self.state.font = name.clone();
                }
                if let Some(size) = op.number(1) {
                    self.state.font_size = size;
                }
            }
            "Tc" => self.state.char_spacing = op.number(0).unwrap_or(0.0),
            "Tw" => self.state.word_spacing = op.number(0).unwrap_or(0.0),
            "Tz" => self.state.h_scale = op.number(0).unwrap_or(100.0) / 100.0,
            "TL" => self.state.leading = op.number(0).unwrap_or(0.0),
            "Ts" => self.state.rise = op.number(0).unwrap_or(0.0),
            "Td" => {
                let (tx, ty) = (op.number(0).unwrap_or(0.0), op.number(1).unwrap_or(0.0));
                self.move_line(tx, ty);
            }
            "TD" => {
                let (tx, ty) = (op.number(0).unwrap_or(0.0), op.number(1).unwrap_or(0.0));
                self.state.leading = -ty;
                self.move_line(tx, ty);
            }
            "Tm" => {
                if let Some(m) = matrix_operands(op) {
                    self.text_matrix = m;
                    self.line_matrix = m;
                }
            }
            "T*" => self.next_line(),
            "Tj" => {
                if let Some(PdfValue::Str(bytes)) = op.operands.first() {
                    self.show(&[PdfValue::Str(bytes.clone())]);
                }
            }
            "TJ" => {
                if let Some(PdfValue::Array(items)) = op.operands.first() {
                    self.show(items);
                }
            }
            "'" => {
                self.next_line();
                if let Some(PdfValue::Str(bytes)) = op.operands.first() {
                    self.show(&[PdfValue::Str(bytes.clone())]);
                }
            }
            "\"" => {
                self.state.word_spacing = op.number(0).unwrap_or(self.state.word_spacing);
                self.state.char_spacing = op.number(1).unwrap_or(self.state.char_spacing);
                self.next_line();
                if let Some(PdfValue::Str(bytes)) = op.operands.get(2) {
                    self.show(&[PdfValue::Str(bytes.clone())]);
                }
            }
            _ => {}
        }
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = multiply_matrices(&translation(tx, ty), &self.line_matrix);
        self.text_matrix = self.line_matrix;
        if ty != 0.0 {
            self.mark_eol();
        }
    }

    fn next_line(&mut self) {
        let leading = self.state.leading;
        self.move_line(0.0, -leading);
        self.mark_eol();
    }

    fn mark_eol(&mut self) {
        if let Some(last) = self.fragments.last_mut() {
            last.has_eol = true;
        }
    }

    /// Show a sequence of strings and TJ adjustments as one fragment.
    fn show(&mut self, items: &[PdfValue]) {
        if !self.in_text {
            return;
        }

        let fonts = self.fonts;
        let font = self.state.font.clone();
        let metrics = fonts.metrics(&font);
        let fs = self.state.font_size;
        let th = self.state.h_scale;

        let start = self.text_render_matrix();
        let mut text = String::new();
        let mut advance = 0.0f32;

        for item in items {
            match item {
                PdfValue::Str(bytes) => {
                    let decoded = fonts.decode(&font, bytes);
                    advance += self.string_advance(metrics, bytes, &decoded);
                    text.push_str(&decoded);
                }
                PdfValue::Integer(_) | PdfValue::Real(_) => {
                    let n = get_number_from_value(item).unwrap_or(0.0);
                    advance -= n / 1000.0 * fs * th;
                    if -n > TJ_SPACE_THRESHOLD && needs_tj_space(&text) {
                        text.push(' ');
                    }
                }
                _ => {}
            }
        }

        let user = multiply_matrices(&self.text_matrix, &self.state.ctm);
        let scale_x = user[0].hypot(user[1]);
        let scale_y = user[2].hypot(user[3]);

        self.text_matrix = multiply_matrices(&translation(advance, 0.0), &self.text_matrix);

        if text.trim().is_empty() {
            return;
        }

        let font_name = metrics
            .map(|m| m.base_font.clone())
            .unwrap_or_else(|| String::from_utf8_lossy(&font).into_owned());
        let text: String = text.nfc().collect();

        self.fragments.push(TextFragment::from_transform(
            text,
            start,
            advance * scale_x,
            fs.abs() * scale_y,
            font_name,
            false,
        ));
    }

    /// Horizontal displacement of one string in unscaled text space.
    fn string_advance(&self, metrics: Option<&FontMetrics>, bytes: &[u8], decoded: &str) -> f32 {
        let fs = self.state.font_size;
        let tc = self.state.char_spacing;
        let tw = self.state.word_spacing;

        let total: f32 = match metrics.filter(|m| m.has_widths()) {
            Some(m) => bytes
                .iter()
                .map(|&b| {
                    let word = if b == b' ' { tw } else { 0.0 };
                    m.code_width(b) / 1000.0 * fs + tc + word
                })
                .sum(),
            None => decoded
                .chars()
                .map(|c| {
                    let word = if c == ' ' { tw } else { 0.0 };
                    FALLBACK_GLYPH_WIDTH * fs + tc + word
                })
                .sum(),
        };
        total * self.state.h_scale
    }

    /// `[fs·Th, 0, 0, fs, 0, rise] × Tm × CTM`
    fn text_render_matrix(&self) -> [f32; 6] {
        let fs = self.state.font_size;
        let params = [fs * self.state.h_scale, 0.0, 0.0, fs, 0.0, self.state.rise];
        let user = multiply_matrices(&self.text_matrix, &self.state.ctm);
        multiply_matrices(&params, &user)
    }
}

fn matrix_operands(op: &ContentOp) -> Option<[f32; 6]> {
    if op.operands.len() < 6 {
        return None;
    }
    let mut m = [0.0f32; 6];
    for (i, slot) in m.iter_mut().enumerate() {
        *slot = op.number(i)?;
    }
    Some(m)
}

fn needs_tj_space(text: &str) -> bool {
    match text.chars().last() {
        Some(c) => !c.is_whitespace() && !is_spaceless_script_char(c),
        None => false,
    }
}

/// Check if a character is from a script that doesn't use word spaces.
///
/// Chinese and Japanese don't use spaces between words, but Korean does.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and extensions
    (0x4E00..=0x9FFF).contains(&code)
    || (0x3400..=0x4DBF).contains(&code)
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana, Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}
