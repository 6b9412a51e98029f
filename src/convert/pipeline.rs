//! The conversion pipeline.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use rayon::prelude::*;

use super::progress::{analyzing_percent, ProgressReporter, ANALYZING_END, ANALYZING_START};
use super::{ConvertOptions, ConvertResult, Progress, Stage};
use crate::assemble::Assembler;
use crate::error::{Error, Result};
use crate::layout::{analyze_page, TextFragment};
use crate::model::{title_from_file_name, Document, Metadata, PageSection};
use crate::parser::{load_lopdf, BackendLoader, PdfBackend, Viewport};
use crate::render::{DocumentSerializer, DocumentStats, DocxSerializer};

/// Drives reading, analyzing, building and serialization.
///
/// Each call opens its own backend from the input bytes; a `Converter` can
/// be shared between threads.
#[derive(Clone)]
pub struct Converter {
    options: ConvertOptions,
    loader: BackendLoader,
    serializer: Arc<dyn DocumentSerializer + Send + Sync>,
    assembler: Assembler,
}

impl Converter {
    /// Create a converter using lopdf and the `.docx` serializer.
    pub fn new(options: ConvertOptions) -> Self {
        Self {
            options,
            loader: load_lopdf,
            serializer: Arc::new(DocxSerializer::new()),
            assembler: Assembler::new(),
        }
    }

    /// Use a different backend loader.
    pub fn with_loader(mut self, loader: BackendLoader) -> Self {
        self.loader = loader;
        self
    }

    /// Use a different output serializer.
    pub fn with_serializer(mut self, serializer: Arc<dyn DocumentSerializer + Send + Sync>) -> Self {
        self.serializer = serializer;
        self
    }

    /// The conversion options.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Convert PDF bytes into the serialized output.
    ///
    /// `file_name` supplies the document title. Progress is reported through
    /// `on_progress` with a non-decreasing percentage ending at 100.
    pub fn convert<F>(&self, data: &[u8], file_name: &str, on_progress: F) -> Result<Vec<u8>>
    where
        F: FnMut(&Progress),
    {
        self.convert_detailed(data, file_name, on_progress)
            .map(|result| result.data)
    }

    /// Convert PDF bytes, returning output together with metadata and
    /// statistics.
    pub fn convert_detailed<F>(
        &self,
        data: &[u8],
        file_name: &str,
        mut on_progress: F,
    ) -> Result<ConvertResult>
    where
        F: FnMut(&Progress),
    {
        let mut reporter = ProgressReporter::new(&mut on_progress);
        let backend = self.open(data, &mut reporter)?;
        self.finish(backend.as_ref(), file_name, &mut reporter)
    }

    /// Convert an already opened backend.
    pub fn convert_with_backend<F>(
        &self,
        backend: &dyn PdfBackend,
        file_name: &str,
        mut on_progress: F,
    ) -> Result<Vec<u8>>
    where
        F: FnMut(&Progress),
    {
        let mut reporter = ProgressReporter::new(&mut on_progress);
        reporter.report(Stage::Reading, 5, "Opening document");
        reporter.report(
            Stage::Reading,
            10,
            format!("Found {} pages", backend.page_count()),
        );
        self.finish(backend, file_name, &mut reporter)
            .map(|result| result.data)
    }

    /// Reconstruct the document model without serializing it.
    pub fn convert_document<F>(
        &self,
        data: &[u8],
        file_name: &str,
        mut on_progress: F,
    ) -> Result<Document>
    where
        F: FnMut(&Progress),
    {
        let mut reporter = ProgressReporter::new(&mut on_progress);
        let backend = self.open(data, &mut reporter)?;
        let doc = self.build_document(backend.as_ref(), file_name, &mut reporter)?;
        reporter.report(Stage::Complete, 100, "Document model ready");
        Ok(doc)
    }

    /// Convert a file on disk.
    pub fn convert_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<u8>> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.convert(&data, &file_name, |_| {})
    }

    /// Convert on tokio's blocking thread pool.
    #[cfg(feature = "async")]
    pub async fn convert_async<F>(
        &self,
        data: Vec<u8>,
        file_name: String,
        on_progress: F,
    ) -> Result<Vec<u8>>
    where
        F: FnMut(&Progress) + Send + 'static,
    {
        let converter = self.clone();
        tokio::task::spawn_blocking(move || converter.convert(&data, &file_name, on_progress))
            .await
            .map_err(|e| Error::Other(format!("Task join error: {e}")))?
    }

    fn open(
        &self,
        data: &[u8],
        reporter: &mut ProgressReporter<'_>,
    ) -> Result<Box<dyn PdfBackend>> {
        reporter.report(Stage::Reading, 5, "Opening document");
        self.check_cancelled()?;
        let backend = (self.loader)(data, self.options.password.as_deref())?;
        reporter.report(
            Stage::Reading,
            10,
            format!("Found {} pages", backend.page_count()),
        );
        Ok(backend)
    }

    fn finish(
        &self,
        backend: &dyn PdfBackend,
        file_name: &str,
        reporter: &mut ProgressReporter<'_>,
    ) -> Result<ConvertResult> {
        let doc = self.build_document(backend, file_name, reporter)?;

        reporter.report(Stage::Building, 85, "Writing document");
        let data = self.serializer.serialize(&doc)?;

        let stats = DocumentStats::from_document(&doc);
        log::debug!(
            "converted {} pages: {} paragraphs, {} headings, {} empty pages",
            stats.page_count,
            stats.paragraph_count,
            stats.heading_count,
            stats.empty_page_count
        );

        reporter.report(Stage::Complete, 100, "Conversion complete");
        Ok(ConvertResult {
            data,
            metadata: doc.metadata,
            stats,
            mime_type: self.serializer.mime_type(),
        })
    }

    fn build_document(
        &self,
        backend: &dyn PdfBackend,
        file_name: &str,
        reporter: &mut ProgressReporter<'_>,
    ) -> Result<Document> {
        let page_count = backend.page_count();
        let sections = if self.options.parallel {
            self.analyze_parallel(backend, reporter)?
        } else {
            self.analyze_sequential(backend, reporter)?
        };

        reporter.report(Stage::Building, 70, "Assembling document");
        Ok(Document {
            metadata: self.metadata(backend, file_name, page_count),
            sections: self.assembler.arrange(sections, self.options.section_mode),
        })
    }

    fn analyze_sequential(
        &self,
        backend: &dyn PdfBackend,
        reporter: &mut ProgressReporter<'_>,
    ) -> Result<Vec<PageSection>> {
        let total = backend.page_count();
        reporter.report(Stage::Analyzing, ANALYZING_START, "Analyzing pages");

        let mut sections = Vec::with_capacity(total as usize);
        for page in 1..=total {
            self.check_cancelled()?;
            let viewport = backend.page_viewport(page)?;
            let fragments = backend.page_fragments(page)?;
            sections.push(self.page_section(page, viewport, fragments));
            reporter.report(
                Stage::Analyzing,
                analyzing_percent(page, total),
                format!("Analyzed page {} of {}", page, total),
            );
        }
        Ok(sections)
    }

    /// Extract sequentially, then reconstruct pages on the rayon pool.
    fn analyze_parallel(
        &self,
        backend: &dyn PdfBackend,
        reporter: &mut ProgressReporter<'_>,
    ) -> Result<Vec<PageSection>> {
        let total = backend.page_count();
        reporter.report(Stage::Analyzing, ANALYZING_START, "Analyzing pages");

        let mut pages = Vec::with_capacity(total as usize);
        for page in 1..=total {
            self.check_cancelled()?;
            pages.push((page, backend.page_viewport(page)?, backend.page_fragments(page)?));
        }

        let sections = pages
            .into_par_iter()
            .map(|(page, viewport, fragments)| -> Result<PageSection> {
                self.check_cancelled()?;
                Ok(self.page_section(page, viewport, fragments))
            })
            .collect::<Result<Vec<_>>>()?;

        reporter.report(
            Stage::Analyzing,
            ANALYZING_END,
            format!("Analyzed {} pages", total),
        );
        Ok(sections)
    }

    fn page_section(
        &self,
        page: u32,
        viewport: Viewport,
        fragments: Vec<TextFragment>,
    ) -> PageSection {
        if fragments.is_empty() {
            log::debug!("page {}: no text fragments", page);
            return self.assembler.empty_page_section(page, viewport);
        }
        let paragraphs = analyze_page(fragments, Some(viewport.width), &self.options.layout);
        log::debug!("page {}: {} paragraphs", page, paragraphs.len());
        self.assembler.page_section(page, viewport, &paragraphs)
    }

    fn metadata(&self, backend: &dyn PdfBackend, file_name: &str, page_count: u32) -> Metadata {
        let mut metadata = Metadata {
            title: title_from_file_name(file_name).or_else(|| backend.title()),
            created: Some(Utc::now()),
            pdf_version: backend.version(),
            page_count,
            ..Default::default()
        };
        if let Some(creator) = &self.options.creator {
            metadata.creator = creator.clone();
        }
        if let Some(description) = &self.options.description {
            metadata.description = description.clone();
        }
        metadata
    }

    fn check_cancelled(&self) -> Result<()> {
        match &self.options.cancel {
            Some(token) if token.is_cancelled() => Err(Error::Cancelled),
            _ => Ok(()),
        }
    }
}

impl std::fmt::Debug for Converter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Converter")
            .field("options", &self.options)
            .field("output", &self.serializer.mime_type())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::CancellationToken;
    use crate::model::Block;

    struct FakeBackend {
        pages: Vec<Vec<TextFragment>>,
    }

    impl PdfBackend for FakeBackend {
        fn page_count(&self) -> u32 {
            self.pages.len() as u32
        }

        fn page_viewport(&self, _page: u32) -> Result<Viewport> {
            Ok(Viewport::LETTER)
        }

        fn page_fragments(&self, page: u32) -> Result<Vec<TextFragment>> {
            self.pages
                .get(page as usize - 1)
                .cloned()
                .ok_or(Error::PageOutOfRange(page, self.pages.len() as u32))
        }
    }

    fn fake() -> FakeBackend {
        FakeBackend {
            pages: vec![
                vec![
                    TextFragment::new("Title", 72.0, 700.0, 60.0, 24.0, "Arial-Bold"),
                    TextFragment::new("Body line.", 72.0, 660.0, 60.0, 12.0, "Arial"),
                ],
                vec![],
            ],
        }
    }

    fn build(converter: &Converter, backend: &dyn PdfBackend) -> Document {
        let mut noop = |_: &Progress| {};
        let mut reporter = ProgressReporter::new(&mut noop);
        converter
            .build_document(backend, "a.pdf", &mut reporter)
            .unwrap()
    }

    #[test]
    fn test_sequential_and_parallel_agree() {
        let backend = fake();
        let seq = build(&Converter::new(ConvertOptions::default()), &backend);
        let par = build(
            &Converter::new(ConvertOptions::default().with_parallel(true)),
            &backend,
        );
        assert_eq!(seq.sections, par.sections);
        assert!(seq.sections[1].placeholder);
    }

    #[test]
    fn test_progress_sequence() {
        let mut events = Vec::new();
        let converter = Converter::new(ConvertOptions::default());
        converter
            .convert_with_backend(&fake(), "a.pdf", |p| events.push(p.clone()))
            .unwrap();

        let percents: Vec<u8> = events.iter().map(|p| p.percent).collect();
        assert_eq!(percents, vec![5, 10, 15, 40, 65, 70, 85, 100]);
        assert!(percents.windows(2).all(|w| w[0] <= w[1]));
        let last = events.last().unwrap();
        assert_eq!(last.stage, Stage::Complete);
    }

    #[test]
    fn test_metadata_title_and_creator() {
        let converter = Converter::new(ConvertOptions::default().with_creator("suite"));
        let meta = converter.metadata(&fake(), "quarterly.pdf", 2);
        assert_eq!(meta.title.as_deref(), Some("quarterly"));
        assert_eq!(meta.creator, "suite");
        assert_eq!(meta.description, "Converted from PDF by pdf2word");
        assert!(meta.created.is_some());
    }

    #[test]
    fn test_cancelled_before_pages() {
        let token = CancellationToken::new();
        token.cancel();
        let converter = Converter::new(ConvertOptions::default().with_cancellation(token));
        let result = converter.convert_with_backend(&fake(), "a.pdf", |_| {});
        assert!(matches!(result, Err(Error::Cancelled)));
    }

    #[test]
    fn test_continuous_sections() {
        let converter = Converter::new(
            ConvertOptions::default().with_section_mode(crate::assemble::SectionMode::Continuous),
        );
        let doc = build(&converter, &fake());
        assert_eq!(doc.sections.len(), 1);
        assert!(doc.sections[0]
            .blocks
            .iter()
            .any(|b| matches!(b, Block::PageBreak)));
    }
}
