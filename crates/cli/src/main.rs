//! CLI tool for extracting slide text from PPTX and PDF files.

use anyhow::{Context, Result};
use clap::Parser;
use deck_core::{DocumentFormat, Error, ExtractionResponse};
use deck_ocr::TesseractOcr;
use deck_pdf::PdfParser;
use deck_pptx::PptxParser;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Extract slide titles, bullets, notes, and picture text as JSON.
#[derive(Parser, Debug)]
#[command(name = "deck-extract")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input document(s) (.pptx or .pdf)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Write <name>.json files into this directory instead of printing
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON
    #[arg(long)]
    pretty: bool,

    /// Tesseract language code(s) for picture OCR
    #[arg(long, default_value = "eng")]
    ocr_lang: String,

    /// Skip OCR even when tesseract is installed
    #[arg(long)]
    no_ocr: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let mut pptx = PptxParser::new();
    if !args.no_ocr {
        if let Some(ocr) = TesseractOcr::detect() {
            pptx = pptx.with_ocr(Arc::new(ocr.with_lang(args.ocr_lang.clone())));
        }
    }
    let pdf = PdfParser::new();

    for input_path in &args.input {
        if args.verbose {
            eprintln!("Processing: {}", input_path.display());
        }

        match process_file(input_path, &pptx, &pdf) {
            Ok(response) => {
                let json = render(&response, args.pretty)?;
                match &args.output {
                    Some(dir) => {
                        let output_path = get_output_path(input_path, dir)?;
                        write_output(&output_path, &json)?;
                        if args.verbose {
                            eprintln!("Written to: {}", output_path.display());
                        }
                    }
                    None => println!("{}", json),
                }
            }
            Err(e) => {
                eprintln!("Error processing {}: {:#}", input_path.display(), e);
            }
        }
    }

    Ok(())
}

/// Extract one document, choosing the backend by filename suffix.
fn process_file(input_path: &Path, pptx: &PptxParser, pdf: &PdfParser) -> Result<ExtractionResponse> {
    let filename = input_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();

    let format = DocumentFormat::from_filename(filename).ok_or_else(|| {
        Error::UnsupportedFormat(format!("{} (expected .pptx or .pdf)", filename))
    })?;

    let bytes = std::fs::read(input_path)
        .with_context(|| format!("Failed to read {}", input_path.display()))?;

    let slides = match format {
        DocumentFormat::Pptx => {
            log::debug!("Parsing as PPTX");
            pptx.parse_bytes(&bytes)?
        }
        DocumentFormat::Pdf => {
            log::debug!("Parsing as PDF");
            pdf.parse(&bytes)?
        }
    };

    log::info!("{}: {} slides", filename, slides.len());

    Ok(ExtractionResponse::new(slides))
}

fn render(response: &ExtractionResponse, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(response)?
    } else {
        serde_json::to_string(response)?
    };
    Ok(json)
}

/// Determine the output path for a processed file.
fn get_output_path(input_path: &Path, output_dir: &Path) -> Result<PathBuf> {
    let stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

    Ok(output_dir.join(format!("{}.json", stem)))
}

/// Write output to a file.
fn write_output(path: &Path, content: &str) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    Ok(())
}
