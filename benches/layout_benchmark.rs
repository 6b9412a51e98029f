//! Benchmarks for layout reconstruction and `.docx` writing.
//!
//! Run with: cargo bench
//!
//! Pages are synthetic: positioned fragments arranged as a heading followed
//! by body paragraphs, so no PDF parsing is involved.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use pdf2word::model::Document;
use pdf2word::render::to_docx;
use pdf2word::{analyze_page, Assembler, LayoutOptions, TextFragment, Viewport};

/// One page with a heading and `paragraphs` body paragraphs of five lines.
fn synthetic_page(paragraphs: usize) -> Vec<TextFragment> {
    let mut fragments = vec![TextFragment::new(
        "Section heading",
        72.0,
        740.0,
        180.0,
        22.0,
        "Helvetica-Bold",
    )];
    let mut y = 700.0;
    for p in 0..paragraphs {
        for l in 0..5 {
            // Each line is split into words to exercise gap-based spacing.
            let mut x = 72.0;
            for w in 0..8 {
                let text = format!("w{}{}{}", p, l, w);
                fragments.push(TextFragment::new(text, x, y, 30.0, 11.0, "Helvetica"));
                x += 34.0;
            }
            y -= 13.0;
        }
        y -= 12.0;
    }
    fragments
}

/// Benchmark single-page reconstruction at various densities.
fn bench_analyze_page(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze_page");
    let options = LayoutOptions::default();

    for paragraphs in [1, 5, 10].iter() {
        let page = synthetic_page(*paragraphs);
        group.bench_function(format!("{}_paragraphs", paragraphs), |b| {
            b.iter(|| analyze_page(black_box(page.clone()), Some(612.0), &options));
        });
    }

    group.finish();
}

/// Benchmark assembly and `.docx` packaging of a ten-page document.
fn bench_docx_writer(c: &mut Criterion) {
    let options = LayoutOptions::default();
    let assembler = Assembler::new();
    let paragraphs = analyze_page(synthetic_page(8), Some(612.0), &options);

    let mut doc = Document::new();
    for n in 1..=10 {
        doc.add_section(assembler.page_section(n, Viewport::LETTER, &paragraphs));
    }

    c.bench_function("docx_10_pages", |b| {
        b.iter(|| to_docx(black_box(&doc)).unwrap());
    });
}

criterion_group!(benches, bench_analyze_page, bench_docx_writer);
criterion_main!(benches);
