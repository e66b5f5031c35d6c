//! Application state.

use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Create application state, ensuring the output directory exists.
    pub fn new(config: ServerConfig) -> std::io::Result<Self> {
        std::fs::create_dir_all(&config.output_dir)?;
        Ok(Self {
            config: Arc::new(config),
        })
    }
}
