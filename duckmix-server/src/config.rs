//! Server configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_OUTPUT_DIR: &str = "outputs";

/// Runtime configuration for the mixing service.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address.
    pub addr: SocketAddr,
    /// Directory generated mixes are written to.
    pub output_dir: PathBuf,
    /// Optional override for the upload page; the bundled page is served
    /// when unset.
    pub index_html: Option<PathBuf>,
}

impl ServerConfig {
    /// Read configuration from the environment, falling back to defaults.
    ///
    /// Recognized variables: `DUCKMIX_ADDR`, `DUCKMIX_OUTPUT_DIR`,
    /// `DUCKMIX_INDEX_HTML`.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let addr = std::env::var("DUCKMIX_ADDR")
            .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
            .parse()?;
        let output_dir = std::env::var("DUCKMIX_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_OUTPUT_DIR));
        let index_html = std::env::var("DUCKMIX_INDEX_HTML").ok().map(PathBuf::from);

        Ok(Self {
            addr,
            output_dir,
            index_html,
        })
    }
}
