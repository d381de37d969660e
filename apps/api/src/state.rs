use std::sync::Arc;

use crate::analysis::Analyzer;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Stateless analysis pipeline. Decoder is swappable via `Analyzer::new`.
    pub analyzer: Arc<Analyzer>,
}

impl AppState {
    pub fn new(config: Config, analyzer: Analyzer) -> Self {
        Self {
            config,
            analyzer: Arc::new(analyzer),
        }
    }
}
