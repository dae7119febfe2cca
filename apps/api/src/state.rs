use std::sync::Arc;

use crate::analysis::orchestrator::MatchOrchestrator;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Primary (Gemini) and fallback (heuristic) analyzers. Holds the lazily loaded embedding model.
    pub orchestrator: Arc<MatchOrchestrator>,
}
