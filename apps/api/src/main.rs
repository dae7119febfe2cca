mod analysis;
mod config;
mod document;
mod errors;
mod llm_client;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::fallback::FallbackAnalyzer;
use crate::analysis::orchestrator::MatchOrchestrator;
use crate::analysis::primary::PrimaryAnalyzer;
use crate::analysis::similarity::SimilarityEngine;
use crate::config::Config;
use crate::llm_client::{LlmClient, TextGenerator};
use crate::routes::{build_cors, build_router};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume-JD Matcher API v{}", env!("CARGO_PKG_VERSION"));

    // Primary analyzer: Gemini, only when a key is configured
    let generator: Option<Arc<dyn TextGenerator>> = match &config.gemini_api_key {
        Some(key) => {
            let llm = LlmClient::new(
                key.clone(),
                config.gemini_model.clone(),
                config.llm_timeout_secs,
                config.llm_max_attempts,
            )?;
            info!("LLM client initialized (model: {})", llm.model());
            Some(Arc::new(llm))
        }
        None => {
            info!("GEMINI_API_KEY not set; every analysis uses the heuristic analyzer");
            None
        }
    };

    // Fallback analyzer: embedding model loads on first use
    let similarity = Arc::new(SimilarityEngine::model2vec(config.embedding_model.clone()));
    info!("Embedding model configured: {}", similarity.model_name());

    info!(
        "Skill catalog: {} terms",
        analysis::skills::SkillCatalog::builtin().term_count()
    );

    let orchestrator = MatchOrchestrator::new(
        PrimaryAnalyzer::new(generator),
        FallbackAnalyzer::new(similarity),
    );

    info!(
        "Analyzer chain: {}heuristic",
        if orchestrator.primary_enabled() { "gemini -> " } else { "" }
    );

    let cors = build_cors(&config)?;
    let state = AppState {
        config: config.clone(),
        orchestrator: Arc::new(orchestrator),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
