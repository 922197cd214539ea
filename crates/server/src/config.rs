//! Command-line configuration.

use clap::Parser;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Default listening port.
pub const DEFAULT_PORT: u16 = 5001;

/// Serve slide extraction over HTTP.
#[derive(Parser, Debug, Clone)]
#[command(name = "deck-server")]
#[command(author, version, about, long_about = None)]
pub struct ServerArgs {
    /// Address to listen on
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Largest accepted request body, in MiB
    #[arg(long, default_value_t = 50)]
    pub max_upload_mb: usize,

    /// Tesseract language code(s) for picture OCR
    #[arg(long, default_value = "eng")]
    pub ocr_lang: String,

    /// Skip OCR even when tesseract is installed
    #[arg(long)]
    pub no_ocr: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServerArgs {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}
