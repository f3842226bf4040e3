//! Sequential batch processing of a statement directory.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::aggregate::{AggregatedTable, Aggregator};
use crate::convert::{Converter, PdfToHtml, XmlCache};
use crate::layout::{Row, TextBox, reconstruct_rows, xml};
use crate::models::config::ConversionConfig;
use crate::models::statement::StatementRecord;
use crate::statement::StatementExtractor;
use crate::Result;

/// Supplies the text boxes of the page to extract from a source document.
pub trait PageSource {
    fn load_page(&self, document: &Path) -> Result<Vec<TextBox>>;
}

/// Page source converting documents with `pdftohtml` through the XML cache.
pub struct PdfToHtmlSource {
    converter: Box<dyn Converter>,
    cache: XmlCache,
    page: u32,
}

impl PdfToHtmlSource {
    pub fn new(config: &ConversionConfig) -> Self {
        Self {
            converter: Box::new(PdfToHtml::from_config(config)),
            cache: XmlCache::new(&config.cache_dir),
            page: config.page,
        }
    }

    /// Replace the converter.
    pub fn with_converter(mut self, converter: impl Converter + 'static) -> Self {
        self.converter = Box::new(converter);
        self
    }
}

impl PageSource for PdfToHtmlSource {
    fn load_page(&self, document: &Path) -> Result<Vec<TextBox>> {
        let xml_path = self.cache.ensure(document, self.converter.as_ref())?;
        let page = xml::read_document(&xml_path)?.into_page(self.page)?;
        Ok(page.boxes)
    }
}

/// A document that could not be turned into a record.
#[derive(Debug, Clone)]
pub struct DocumentFailure {
    /// Source document.
    pub path: PathBuf,
    /// Failure cause.
    pub error: String,
    /// Rows reconstructed before the failure (empty if loading failed).
    pub rows: Vec<Row>,
}

/// A successfully extracted document.
#[derive(Debug, Clone)]
pub struct ProcessedDocument {
    pub path: PathBuf,
    pub record: StatementRecord,
    pub warnings: Vec<String>,
}

/// Outcome of a whole batch.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Table of all successfully extracted documents.
    pub table: AggregatedTable,
    /// Successfully extracted documents, in processing order.
    pub processed: Vec<PathBuf>,
    /// Documents excluded from the table.
    pub failures: Vec<DocumentFailure>,
}

/// List the regular files of `dir`, sorted by file name.
pub fn list_documents(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut documents = Vec::new();

    for entry in fs::read_dir(dir)? {
        // Follows symlinks; dangling links are not documents.
        let path = entry?.path();
        if path.is_file() {
            documents.push(path);
        }
    }

    documents.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    debug!("Found {} documents in {}", documents.len(), dir.display());

    Ok(documents)
}

/// Runs documents through reconstruction and extraction one at a time.
pub struct BatchRunner<S> {
    source: S,
    extractor: StatementExtractor,
}

impl<S: PageSource> BatchRunner<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            extractor: StatementExtractor::new(),
        }
    }

    /// Reconstruct the rows of one document.
    pub fn load_rows(&self, path: &Path) -> Result<Vec<Row>> {
        let boxes = self.source.load_page(path)?;
        Ok(reconstruct_rows(&boxes))
    }

    /// Extract one document.
    ///
    /// Failures are logged together with the raw rows and returned; they
    /// never affect other documents.
    pub fn process_document(
        &self,
        path: &Path,
    ) -> std::result::Result<ProcessedDocument, DocumentFailure> {
        let rows = self.load_rows(path).map_err(|e| {
            warn!("Failed to load {}: {}", path.display(), e);
            DocumentFailure {
                path: path.to_path_buf(),
                error: e.to_string(),
                rows: Vec::new(),
            }
        })?;

        match self.extractor.extract(&rows) {
            Ok(extraction) => Ok(ProcessedDocument {
                path: path.to_path_buf(),
                record: extraction.record,
                warnings: extraction.warnings,
            }),
            Err(e) => {
                warn!("Failed to extract {}: {}", path.display(), e);
                for row in &rows {
                    warn!("  {}", row);
                }
                Err(DocumentFailure {
                    path: path.to_path_buf(),
                    error: e.to_string(),
                    rows,
                })
            }
        }
    }

    /// Process documents in the given order and aggregate the results.
    pub fn run(&self, documents: &[PathBuf]) -> BatchReport {
        self.run_with_progress(documents, |_, _| {})
    }

    /// Like [`run`](Self::run), calling `on_done` after each document with
    /// its path and whether it was extracted.
    pub fn run_with_progress<F>(&self, documents: &[PathBuf], mut on_done: F) -> BatchReport
    where
        F: FnMut(&Path, bool),
    {
        let mut aggregator = Aggregator::new();
        let mut report = BatchReport::default();

        for path in documents {
            match self.process_document(path) {
                Ok(done) => {
                    for warning in &done.warnings {
                        debug!("{}: {}", path.display(), warning);
                    }
                    aggregator.push(done.record);
                    report.processed.push(done.path);
                    on_done(path, true);
                }
                Err(failure) => {
                    report.failures.push(failure);
                    on_done(path, false);
                }
            }
        }

        info!(
            "Extracted {} of {} documents",
            report.processed.len(),
            documents.len()
        );

        report.table = aggregator.finish();
        report
    }
}
