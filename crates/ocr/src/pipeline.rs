use std::path::Path;

use fapiao_core::WinningDigits;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::annotate::{Annotator, NoAnnotation};
use crate::extract::Extractor;
use crate::preprocess::{self, DecodeError};
use crate::recognizer::OcrBackend;
use crate::types::{FileOutcome, ImageReport};

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Suffix test against the file name. No dot is required and case matters.
pub fn is_supported_image(file_name: &str, extensions: &[String]) -> bool {
    extensions.iter().any(|ext| file_name.ends_with(ext.as_str()))
}

/// Orchestrates: decode → normalize → annotate → OCR → match.
pub struct InvoiceScanner<R: OcrBackend, A: Annotator = NoAnnotation> {
    extractor: Extractor<R>,
    annotator: A,
    extensions: Vec<String>,
}

impl<R: OcrBackend> InvoiceScanner<R> {
    pub fn new(recognizer: R) -> Self {
        Self {
            extractor: Extractor::new(recognizer),
            annotator: NoAnnotation,
            extensions: fapiao_core::ScanConfig::default().extensions,
        }
    }
}

impl<R: OcrBackend, A: Annotator> InvoiceScanner<R, A> {
    pub fn with_annotator<B: Annotator>(self, annotator: B) -> InvoiceScanner<R, B> {
        InvoiceScanner {
            extractor: self.extractor,
            annotator,
            extensions: self.extensions,
        }
    }

    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    /// Process one encoded image. Only a decode failure is an error.
    pub fn scan_bytes(
        &self,
        file_name: &str,
        data: &[u8],
        digits: &WinningDigits,
    ) -> Result<ImageReport, ScanError> {
        let image = preprocess::decode(data)?;
        let normalized = preprocess::normalize(&image);

        if let Err(e) = self.annotator.annotate(file_name, &image, &normalized.regions) {
            warn!("Could not annotate {file_name}: {e}");
        }
        // The bitmap is not needed past this point; OCR reads the original bytes.
        drop(image);

        let extraction = self.extractor.extract(data, digits);
        Ok(ImageReport {
            file_name: file_name.to_string(),
            regions: normalized.regions,
            text: extraction.text,
            matches: extraction.matches,
        })
    }

    /// Process a file on disk.
    pub async fn scan_file(
        &self,
        path: &Path,
        digits: &WinningDigits,
    ) -> Result<ImageReport, ScanError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.scan_bytes(&file_name, &bytes, digits)
    }

    /// Scan every supported image in `dir`, one at a time, in listing order,
    /// handing each outcome to `on_outcome` as soon as it is ready.
    /// Unreadable or undecodable files are skipped. Only failing to open the
    /// folder is an error; a listing that breaks partway ends the scan early.
    /// Returns the number of outcomes delivered.
    pub async fn scan_folder_each<F>(
        &self,
        dir: &Path,
        digits: &WinningDigits,
        mut on_outcome: F,
    ) -> Result<usize, ScanError>
    where
        F: FnMut(FileOutcome),
    {
        let mut entries = tokio::fs::read_dir(dir).await?;
        let mut delivered = 0;

        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    warn!("Listing {} stopped after {delivered} files: {e}", dir.display());
                    break;
                }
            };
            let file_name = entry.file_name().to_string_lossy().into_owned();
            if !is_supported_image(&file_name, &self.extensions) {
                debug!("Ignoring {file_name}");
                continue;
            }

            info!("Processing file: {file_name}");
            let outcome = match self.scan_file(&entry.path(), digits).await {
                Ok(report) => FileOutcome::Scanned(report),
                Err(e) => {
                    warn!("Skipping {file_name}: {e}");
                    FileOutcome::Skipped { file_name, reason: e.to_string() }
                }
            };
            on_outcome(outcome);
            delivered += 1;
        }

        Ok(delivered)
    }

    /// Collecting form of [`scan_folder_each`](Self::scan_folder_each).
    pub async fn scan_folder(
        &self,
        dir: &Path,
        digits: &WinningDigits,
    ) -> Result<Vec<FileOutcome>, ScanError> {
        let mut outcomes = Vec::new();
        self.scan_folder_each(dir, digits, |outcome| outcomes.push(outcome)).await?;
        Ok(outcomes)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
