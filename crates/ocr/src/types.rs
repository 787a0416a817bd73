use fapiao_core::MatchResult;

/// Axis-aligned box around an external contour of the edge map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContourRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Everything produced for one image.
#[derive(Debug, Clone)]
pub struct ImageReport {
    pub file_name: String,
    /// Overlay boxes from the normalizer. Informational only.
    pub regions: Vec<ContourRegion>,
    /// Raw OCR text; empty when recognition failed.
    pub text: String,
    /// One entry per invoice-number match, in order of appearance.
    pub matches: Vec<MatchResult>,
}

impl ImageReport {
    pub fn has_winner(&self) -> bool {
        self.matches.iter().any(|m| m.is_winner)
    }
}

/// Per-file result of a folder scan.
#[derive(Debug)]
pub enum FileOutcome {
    Scanned(ImageReport),
    /// The file could not be read or decoded; the scan moved on.
    Skipped { file_name: String, reason: String },
}

impl FileOutcome {
    pub fn file_name(&self) -> &str {
        match self {
            FileOutcome::Scanned(report) => &report.file_name,
            FileOutcome::Skipped { file_name, .. } => file_name,
        }
    }
}
