pub mod config;
pub mod invoice;

pub use config::{ConfigError, OcrConfig, ScanConfig};
pub use invoice::{InputFormatError, InvoiceNumber, MatchResult, WinningDigits};
