//! Conversion of generated PDF files through the lopdf backend.

mod common;

use common::{build_pdf, encrypted_report_pdf, line, read_part, report_pdf};
use pdf2word::{
    convert_bytes, convert_file_to, extract_text, reconstruct, ConvertOptions, Converter, Error,
    HeadingTier, LopdfBackend, PdfBackend,
};

#[test]
fn test_backend_reads_generated_report() {
    let backend = LopdfBackend::load(&report_pdf(), None).unwrap();
    assert_eq!(backend.page_count(), 2);
    assert_eq!(backend.version(), "1.7");
    assert!(!backend.is_encrypted());

    let frags = backend.page_fragments(1).unwrap();
    assert_eq!(frags.len(), 4);
    assert_eq!(frags[0].text, "Title");
    assert_eq!(frags[0].font_size, 24.0);
    assert!(frags[0].style.bold);
    assert_eq!((frags[1].x, frags[1].y), (72.0, 660.0));

    assert!(backend.page_fragments(2).unwrap().is_empty());
}

#[test]
fn test_report_reconstruction() {
    let doc = reconstruct(&report_pdf(), "report.pdf", ConvertOptions::default()).unwrap();

    assert_eq!(doc.metadata.page_count, 2);
    assert_eq!(doc.metadata.pdf_version, "1.7");
    assert_eq!(doc.sections.len(), 2);

    let paras: Vec<_> = doc.sections[0].paragraphs().collect();
    assert_eq!(paras.len(), 2);
    assert_eq!(paras[0].style.heading, Some(HeadingTier::Heading1));
    assert_eq!(paras[0].plain_text(), "Title");
    assert_eq!(
        paras[1].plain_text(),
        "The first body line continues on a second line and ends on a third."
    );

    assert!(doc.sections[1].placeholder);
    assert_eq!(doc.sections[1].paragraphs().count(), 1);
    assert_eq!(doc.sections[1].width, 612.0);
}

#[test]
fn test_convert_bytes_produces_docx() {
    let docx = convert_bytes(&report_pdf(), "report.pdf").unwrap();
    assert_eq!(&docx[..2], b"PK");

    let content_types = read_part(&docx, "[Content_Types].xml");
    assert!(content_types.contains("/word/document.xml"));
    let rels = read_part(&docx, "_rels/.rels");
    assert!(rels.contains("word/document.xml"));
    let app = read_part(&docx, "docProps/app.xml");
    assert!(app.contains("<Pages>2</Pages>"));
}

#[test]
fn test_extract_text() {
    let text = extract_text(&report_pdf()).unwrap();
    assert!(text.starts_with("Title\n\nThe first body line"));
    assert!(text.contains('\u{c}'));
    assert!(text.ends_with("no extractable text. It may be a scanned image \u{2014} try the OCR converter instead.]"));
}

#[test]
fn test_bullet_list_page() {
    let data = build_pdf(&[vec![
        line("F1", 12, 72, 700, "Bring the following items to the"),
        line("F1", 12, 72, 686, "picnic on Saturday so that every"),
        line("F1", 12, 72, 672, "guest has something to eat and"),
        line("F1", 12, 72, 658, "something to share:"),
        line("F1", 12, 90, 620, "- Apples"),
        line("F1", 12, 90, 590, "- Pears"),
    ]]);
    let doc = reconstruct(&data, "list.pdf", ConvertOptions::default()).unwrap();
    let items: Vec<_> = doc.sections[0]
        .paragraphs()
        .filter(|p| p.is_list_item())
        .map(|p| p.plain_text())
        .collect();
    assert_eq!(items, vec!["- Apples", "- Pears"]);
}

#[test]
fn test_convert_file_to_writes_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("minutes.pdf");
    let output = dir.path().join("minutes.docx");
    std::fs::write(&input, report_pdf()).unwrap();

    let stats = convert_file_to(&input, &output, ConvertOptions::default()).unwrap();
    assert_eq!(stats.page_count, 2);
    assert_eq!(stats.empty_page_count, 1);

    let docx = std::fs::read(&output).unwrap();
    let core = read_part(&docx, "docProps/core.xml");
    assert!(core.contains("<dc:title>minutes</dc:title>"));
}

#[test]
fn test_parallel_lopdf_conversion() {
    let pages: Vec<_> = (0..6)
        .map(|_| {
            vec![
                line("F2", 20, 72, 720, "Chapter"),
                line("F1", 11, 72, 690, "Body text of the chapter."),
            ]
        })
        .collect();
    let data = build_pdf(&pages);

    let seq = Converter::new(ConvertOptions::default())
        .convert_document(&data, "book.pdf", |_| {})
        .unwrap();
    let par = Converter::new(ConvertOptions::default().with_parallel(true))
        .convert_document(&data, "book.pdf", |_| {})
        .unwrap();

    assert_eq!(seq.sections.len(), 6);
    assert_eq!(seq.sections, par.sections);
    assert!(par
        .sections
        .iter()
        .enumerate()
        .all(|(i, s)| s.number == i as u32 + 1));
}

#[test]
fn test_wrong_magic_is_rejected_before_parsing() {
    let mut data = report_pdf();
    data[..5].copy_from_slice(b"%XYZ-");
    assert!(matches!(
        convert_bytes(&data, "x.pdf"),
        Err(Error::UnknownFormat)
    ));
}

#[test]
fn test_user_password_protected_report() {
    let data = encrypted_report_pdf("secret");

    let backend = LopdfBackend::load(&data, Some("secret")).unwrap();
    assert!(backend.is_encrypted());
    assert_eq!(backend.page_count(), 2);
    assert_eq!(backend.page_fragments(1).unwrap()[0].text, "Title");

    let doc = reconstruct(
        &data,
        "locked.pdf",
        ConvertOptions::default().with_password("secret"),
    )
    .unwrap();
    assert_eq!(doc.sections.len(), 2);
    let title = doc.sections[0].paragraphs().next().unwrap();
    assert_eq!(title.plain_text(), "Title");
    assert_eq!(title.style.heading, Some(HeadingTier::Heading1));

    assert!(matches!(
        LopdfBackend::load(&data, None),
        Err(Error::Encrypted)
    ));
    assert!(matches!(
        LopdfBackend::load(&data, Some("wrong")),
        Err(Error::InvalidPassword)
    ));
    assert!(matches!(
        reconstruct(&data, "locked.pdf", ConvertOptions::default()),
        Err(Error::Encrypted)
    ));
}
