use std::sync::OnceLock;

use fapiao_core::{InvoiceNumber, MatchResult, WinningDigits};
use regex::Regex;
use tracing::{debug, warn};

use crate::recognizer::OcrBackend;

/// Uppercase letter prefix, optional space/hyphen run, exactly eight digits.
fn re_invoice_number() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| Regex::new(r"[A-Z]+[-\s]*\d{8}").expect("invalid regex"))
}

/// Raw, un-normalized invoice-number matches in order of appearance.
pub fn find_candidates(text: &str) -> Vec<&str> {
    re_invoice_number().find_iter(text).map(|m| m.as_str()).collect()
}

/// Pattern match, normalize and judge every candidate in `text`.
pub fn match_text(text: &str, digits: &WinningDigits) -> Vec<MatchResult> {
    find_candidates(text)
        .into_iter()
        .map(|raw| MatchResult::evaluate(InvoiceNumber::normalize(raw), digits))
        .collect()
}

/// Result of running recognition and matching on one image.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub text: String,
    pub matches: Vec<MatchResult>,
}

pub struct Extractor<R: OcrBackend> {
    recognizer: R,
}

impl<R: OcrBackend> Extractor<R> {
    pub fn new(recognizer: R) -> Self {
        Self { recognizer }
    }

    /// OCR the original image bytes and match invoice numbers in the text.
    /// A failing engine is treated as "nothing recognized".
    pub fn extract(&self, image_bytes: &[u8], digits: &WinningDigits) -> Extraction {
        let text = match self.recognizer.recognize(image_bytes) {
            Ok(text) => text,
            Err(e) => {
                warn!("OCR produced no text: {e}");
                return Extraction::default();
            }
        };
        let matches = match_text(&text, digits);
        debug!(chars = text.len(), matches = matches.len(), "Extracted invoice numbers");
        Extraction { text, matches }
    }
}
