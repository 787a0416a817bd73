use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use fapiao_core::{ScanConfig, WinningDigits};
use fapiao_ocr::{Annotator, FileOutcome, ImageReport, InvoiceScanner, NoAnnotation, OcrBackend, OverlayWriter};

use crate::cli::Args;

/// Merge the optional config file with command-line overrides.
pub fn resolve_config(args: &Args) -> Result<ScanConfig> {
    let mut config = match &args.config {
        Some(path) => ScanConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ScanConfig::default(),
    };
    if let Some(dir) = &args.annotate_dir {
        config.annotate_dir = Some(dir.clone());
    }
    if let Some(lang) = &args.lang {
        config.ocr.language = lang.clone();
    }
    if let Some(data_path) = &args.tessdata {
        config.ocr.data_path = Some(data_path.clone());
    }
    Ok(config)
}

fn prompt(input: &mut impl BufRead, message: &str) -> Result<String> {
    print!("{message}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub fn read_winning_digits(args: &Args, input: &mut impl BufRead) -> Result<WinningDigits> {
    let raw = match &args.winning {
        Some(w) => w.clone(),
        None => prompt(input, "Enter this period's winning number (3 digits): ")?,
    };
    Ok(WinningDigits::parse(&raw)?)
}

pub fn read_folder(args: &Args, input: &mut impl BufRead) -> Result<PathBuf> {
    let folder = match &args.folder {
        Some(f) => f.clone(),
        None => PathBuf::from(prompt(input, "Enter the image folder path: ")?.trim()),
    };
    if !folder.is_dir() {
        bail!("Not a valid folder: {}", folder.display());
    }
    Ok(folder)
}

#[cfg(feature = "tesseract")]
fn recognizer(config: &ScanConfig) -> Box<dyn OcrBackend> {
    Box::new(fapiao_ocr::TesseractRecognizer::new(
        config.ocr.data_path.clone(),
        &config.ocr.language,
    ))
}

#[cfg(not(feature = "tesseract"))]
fn recognizer(_config: &ScanConfig) -> Box<dyn OcrBackend> {
    tracing::warn!("Built without the `tesseract` feature; no text will be recognized");
    Box::new(fapiao_ocr::UnavailableRecognizer)
}

fn annotator(config: &ScanConfig) -> Box<dyn Annotator> {
    match &config.annotate_dir {
        Some(dir) => Box::new(OverlayWriter::new(dir)),
        None => Box::new(NoAnnotation),
    }
}

pub async fn scan(args: &Args) -> Result<()> {
    let config = resolve_config(args)?;
    let stdin = std::io::stdin();
    let mut input = stdin.lock();

    // Validated before any image is touched.
    let digits = read_winning_digits(args, &mut input)?;
    let folder = read_folder(args, &mut input)?;

    let scanner = InvoiceScanner::new(recognizer(&config))
        .with_annotator(annotator(&config))
        .with_extensions(config.extensions.clone());

    let mut summary = Summary::default();
    scanner
        .scan_folder_each(&folder, &digits, |outcome| {
            summary.record(&outcome);
            print_outcome(&outcome, args.show_text);
        })
        .await
        .with_context(|| format!("Failed to scan {}", folder.display()))?;

    println!("{summary}");
    Ok(())
}

/// Running totals printed once the folder is done.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub scanned: usize,
    pub skipped: usize,
    pub winners: usize,
}

impl Summary {
    pub fn record(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Scanned(report) => {
                self.scanned += 1;
                self.winners += report.matches.iter().filter(|m| m.is_winner).count();
            }
            FileOutcome::Skipped { .. } => self.skipped += 1,
        }
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scanned {} image(s), skipped {}, winning invoices: {}",
            self.scanned, self.skipped, self.winners
        )
    }
}

fn print_outcome(outcome: &FileOutcome, show_text: bool) {
    match outcome {
        FileOutcome::Scanned(report) => print_report(report, show_text),
        FileOutcome::Skipped { file_name, reason } => {
            println!("Processing file: {file_name}");
            println!("Skipped {file_name}: {reason}");
        }
    }
}

fn print_report(report: &ImageReport, show_text: bool) {
    println!("Processing file: {}", report.file_name);
    if show_text {
        println!("Recognized text:\n{}", report.text);
    }
    if report.matches.is_empty() {
        println!("No invoice number found.");
        return;
    }
    println!("Invoice numbers found:");
    for m in &report.matches {
        println!("{m}");
    }
}
