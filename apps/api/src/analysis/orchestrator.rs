//! Match orchestration: Gemini first, local heuristic when it is unavailable.
//!
//! At most one primary attempt and one fallback attempt per request. The
//! primary path never errors; the fallback's embedding failure is the only
//! error that reaches the caller.

use thiserror::Error;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::analysis::fallback::FallbackAnalyzer;
use crate::analysis::primary::{PrimaryAnalyzer, PrimaryOutcome, UnavailableReason};
use crate::analysis::report::MatchReport;
use crate::analysis::similarity::EmbeddingError;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
}

pub struct MatchOrchestrator {
    primary: PrimaryAnalyzer,
    fallback: FallbackAnalyzer,
}

impl MatchOrchestrator {
    pub fn new(primary: PrimaryAnalyzer, fallback: FallbackAnalyzer) -> Self {
        Self { primary, fallback }
    }

    pub fn primary_enabled(&self) -> bool {
        self.primary.is_enabled()
    }

    pub async fn analyze(
        &self,
        resume_text: &str,
        jd_text: &str,
    ) -> Result<MatchReport, AnalysisError> {
        let analysis_id = Uuid::new_v4();
        let span = info_span!("analysis", %analysis_id);
        self.run(resume_text, jd_text).instrument(span).await
    }

    async fn run(&self, resume_text: &str, jd_text: &str) -> Result<MatchReport, AnalysisError> {
        match self.primary.analyze(resume_text, jd_text).await {
            PrimaryOutcome::Report(report) => {
                info!("Gemini analysis complete: score={}", report.score);
                Ok(report)
            }
            PrimaryOutcome::Unavailable(reason) => {
                match reason {
                    UnavailableReason::MissingCredential => {
                        info!("Gemini not configured, using heuristic analyzer")
                    }
                    other => warn!("Gemini analysis unavailable ({other}), using heuristic analyzer"),
                }
                let report = self.fallback.analyze(resume_text, jd_text).await?;
                info!("Heuristic analysis complete: score={}", report.score);
                Ok(report)
            }
        }
    }
}
