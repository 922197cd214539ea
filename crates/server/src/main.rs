//! Slide extraction HTTP server.

use anyhow::{Context, Result};
use clap::Parser;
use deck_core::ImageTextExtractor;
use deck_ocr::TesseractOcr;
use deck_server::{router, AppState, Extractor, ServerArgs};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let args = ServerArgs::parse();

    // Initialize logging
    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let ocr: Option<Arc<dyn ImageTextExtractor>> = if args.no_ocr {
        log::info!("OCR disabled by flag");
        None
    } else {
        TesseractOcr::detect().map(|ocr| {
            Arc::new(ocr.with_lang(args.ocr_lang.clone())) as Arc<dyn ImageTextExtractor>
        })
    };

    let app = router(AppState::new(Extractor::new(ocr)), args.max_upload_bytes());

    let addr = args.addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    log::info!("Listening on http://{}", addr);
    log::info!("  POST /extract - multipart upload, field 'file' (.pptx, .pdf)");
    log::info!("  GET  /health  - liveness and OCR availability");

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
