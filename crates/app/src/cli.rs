//! Command line arguments backing the `fapiao` binary.
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "fapiao",
    about = "Check photographed receipts for invoice numbers ending in the winning digits",
    version
)]
pub struct Args {
    /// Folder of receipt images (prompted for when omitted)
    pub folder: Option<PathBuf>,

    /// Winning last three digits (prompted for when omitted)
    #[arg(long, short = 'w')]
    pub winning: Option<String>,

    /// TOML configuration file
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Write region overlays into this directory
    #[arg(long)]
    pub annotate_dir: Option<PathBuf>,

    /// OCR language code
    #[arg(long)]
    pub lang: Option<String>,

    /// Tesseract data directory
    #[arg(long)]
    pub tessdata: Option<String>,

    /// Also print the raw recognized text
    #[arg(long)]
    pub show_text: bool,
}
