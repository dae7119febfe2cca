use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::analysis::report::MatchReport;
use crate::document::extract_text;
use crate::errors::AppError;
use crate::state::AppState;

const RESUME_FIELD: &str = "resume";
const JOB_DESCRIPTION_FIELD: &str = "job_description";

#[derive(Deserialize)]
pub struct AnalyzeTextRequest {
    pub resume_text: String,
    pub job_description: String,
}

struct UploadedResume {
    filename: String,
    bytes: Vec<u8>,
}

/// POST /api/analyze
/// Multipart form: `resume` (PDF or DOCX file) and `job_description` (text).
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<MatchReport>, AppError> {
    let mut resume: Option<UploadedResume> = None;
    let mut job_description: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(RESUME_FIELD) => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?.to_vec();
                resume = Some(UploadedResume { filename, bytes });
            }
            Some(JOB_DESCRIPTION_FIELD) => job_description = Some(field.text().await?),
            _ => {}
        }
    }

    let resume = resume
        .filter(|r| !r.filename.trim().is_empty())
        .ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;
    let job_description = require_job_description(job_description.as_deref())?;

    info!(
        "Analyzing upload '{}' ({} bytes)",
        resume.filename,
        resume.bytes.len()
    );

    // PDF and DOCX parsing are CPU-bound.
    let UploadedResume { filename, bytes } = resume;
    let resume_text = tokio::task::spawn_blocking(move || extract_text(&filename, &bytes))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in extraction: {e}")))??;

    if resume_text.trim().is_empty() {
        return Err(AppError::Validation(
            "Could not extract any text from the resume. Is it a scanned image?".to_string(),
        ));
    }

    let report = state
        .orchestrator
        .analyze(&resume_text, job_description)
        .await?;
    Ok(Json(report))
}

/// POST /api/analyze/text
pub async fn handle_analyze_text(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeTextRequest>,
) -> Result<Json<MatchReport>, AppError> {
    if req.resume_text.trim().is_empty() {
        return Err(AppError::Validation("Resume text is required".to_string()));
    }
    let job_description = require_job_description(Some(&req.job_description))?;

    let report = state
        .orchestrator
        .analyze(req.resume_text.trim(), job_description)
        .await?;
    Ok(Json(report))
}

fn require_job_description(value: Option<&str>) -> Result<&str, AppError> {
    value
        .map(str::trim)
        .filter(|jd| !jd.is_empty())
        .ok_or_else(|| AppError::Validation("Job description is required".to_string()))
}
