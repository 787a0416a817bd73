pub mod annotate;
pub mod extract;
pub mod pipeline;
pub mod preprocess;
pub mod recognizer;
pub mod types;

pub use annotate::{draw_regions, AnnotateError, Annotator, NoAnnotation, OverlayWriter};
pub use extract::{find_candidates, match_text, Extraction, Extractor};
pub use pipeline::{is_supported_image, InvoiceScanner, ScanError};
pub use preprocess::{decode, normalize, DecodeError, NormalizedImage};
pub use recognizer::{MockRecognizer, OcrBackend, OcrError, UnavailableRecognizer};
pub use types::{ContourRegion, FileOutcome, ImageReport};

#[cfg(feature = "tesseract")]
pub use recognizer::tesseract_backend::TesseractRecognizer;
