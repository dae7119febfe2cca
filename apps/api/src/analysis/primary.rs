//! Primary analyzer — delegates the match to Gemini and normalizes the reply.
//!
//! Never fails: a missing credential, a provider error or an unparseable reply
//! all come back as `PrimaryOutcome::Unavailable`, which callers treat as
//! "use the heuristic analyzer".
//!
//! Experience policy lives in the prompt: a 0–1 year JD plus any internship or
//! project earns full experience credit. It is not re-checked here.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::analysis::prompts::{build_match_prompt, match_system_prompt};
use crate::analysis::report::{section_header, AnalyzerKind, MatchReport, Verdict};
use crate::llm_client::{parse_json_reply, LlmError, TextGenerator};

#[derive(Debug)]
pub enum PrimaryOutcome {
    Report(MatchReport),
    Unavailable(UnavailableReason),
}

#[derive(Debug, Error)]
pub enum UnavailableReason {
    #[error("no Gemini API key configured")]
    MissingCredential,

    #[error("provider error: {0}")]
    Provider(String),

    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
}

/// Reply shape requested by the analysis prompt.
#[derive(Debug, Deserialize)]
struct AiMatchReply {
    score: f64,
    #[serde(default)]
    verdict: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    matched_skills: Vec<String>,
    #[serde(default)]
    missing_skills: Vec<String>,
    /// Section name → list of items, in the order the model wrote them.
    #[serde(default)]
    suggestions: Value,
}

pub struct PrimaryAnalyzer {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl PrimaryAnalyzer {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self { generator }
    }

    pub fn is_enabled(&self) -> bool {
        self.generator.is_some()
    }

    pub async fn analyze(&self, resume_text: &str, jd_text: &str) -> PrimaryOutcome {
        let Some(generator) = &self.generator else {
            return PrimaryOutcome::Unavailable(UnavailableReason::MissingCredential);
        };

        let prompt = build_match_prompt(resume_text, jd_text);
        let reply = match generator.generate(&prompt, &match_system_prompt()).await {
            Ok(reply) => reply,
            Err(e) => return PrimaryOutcome::Unavailable(UnavailableReason::Provider(e.to_string())),
        };

        match parse_ai_report(&reply) {
            Ok(report) => {
                debug!("Gemini report parsed: score={}", report.score);
                PrimaryOutcome::Report(report)
            }
            Err(reason) => PrimaryOutcome::Unavailable(reason),
        }
    }
}

/// Decodes a model reply (optionally fenced) into a normalized report.
pub fn parse_ai_report(reply: &str) -> Result<MatchReport, UnavailableReason> {
    let parsed: AiMatchReply = parse_json_reply(reply).map_err(|e| match e {
        LlmError::Parse(e) => UnavailableReason::MalformedResponse(e.to_string()),
        other => UnavailableReason::Provider(other.to_string()),
    })?;

    if !parsed.score.is_finite() {
        return Err(UnavailableReason::MalformedResponse(format!(
            "score is not a number: {}",
            parsed.score
        )));
    }
    let score = parsed.score.round().clamp(0.0, 100.0) as u8;
    let verdict = parsed
        .verdict
        .as_deref()
        .and_then(Verdict::from_label)
        .unwrap_or_else(|| Verdict::from_score(score));

    Ok(MatchReport {
        score,
        verdict,
        summary: parsed.summary.unwrap_or_default().trim().to_string(),
        matched_skills: clean_list(parsed.matched_skills),
        missing_skills: clean_list(parsed.missing_skills),
        suggestions: flatten_suggestions(&parsed.suggestions),
        analyzer: AnalyzerKind::Ai,
    })
}

/// Flattens `{section: [items]}` into `["### section", items...]`, keeping
/// section order. Sections without items produce no header.
pub fn flatten_suggestions(sections: &Value) -> Vec<String> {
    match sections {
        Value::Object(map) => map
            .iter()
            .flat_map(|(name, items)| {
                let items = suggestion_items(items);
                if items.is_empty() {
                    Vec::new()
                } else {
                    std::iter::once(section_header(name)).chain(items).collect()
                }
            })
            .collect(),
        other => suggestion_items(other),
    }
}

fn suggestion_items(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(item_text).collect(),
        other => item_text(other).into_iter().collect(),
    }
}

fn item_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        other => Some(other.to_string()),
    }
}

/// Trims, drops blanks and removes exact duplicates, keeping first occurrences.
fn clean_list(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && seen.insert(s.clone()))
        .collect()
}
