// LLM prompt constants for resume/JD match analysis.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for match analysis. Append `JSON_ONLY_SYSTEM` before sending.
pub const MATCH_ANALYSIS_SYSTEM: &str = "You are a professional ATS (Applicant Tracking System) \
    and Career Coach. You compare resumes against job descriptions and explain the result.";

/// Match analysis prompt template.
/// Replace: {resume_text}, {jd_text}, {actionable_instruction}
pub const MATCH_ANALYSIS_PROMPT_TEMPLATE: &str = r#"Perform a deep analysis of this Resume against the Job Description.

RESUME:
{resume_text}

JOB DESCRIPTION:
{jd_text}

Provide a DETAILED JSON response with exactly these keys:
{
  "score": 0,
  "verdict": "Excellent Match | Good Match | Partial Match | Needs Improvement",
  "summary": "Explain WHY the score was given, mentioning specific strengths and weaknesses.",
  "matched_skills": ["skills found in both"],
  "missing_skills": ["CRITICAL keywords/skills present in the JD but missing in the resume"],
  "suggestions": {
    "Experience Match": ["detailed points about tenure, industry fit, level"],
    "Skills Gap": ["explicit list of what to add to the skills section"],
    "Specific Keywords to Add": ["exact phrases from the JD to include"],
    "Section-wise Improvements": ["missing sections like 'Certifications' or 'Portfolio', or specific bullet points to rewrite"]
  }
}

RULES:
1. "score" is an integer from 0 to 100.
2. "verdict" is exactly one of: "Excellent Match", "Good Match", "Partial Match", "Needs Improvement".
3. If the JD mentions 0-1 years and the candidate has any internship or projects, grant full score for experience.
4. {actionable_instruction}"#;

/// Fills the match analysis template.
pub fn build_match_prompt(resume_text: &str, jd_text: &str) -> String {
    fill_template(
        MATCH_ANALYSIS_PROMPT_TEMPLATE,
        &[
            ("resume_text", resume_text),
            ("jd_text", jd_text),
            (
                "actionable_instruction",
                crate::llm_client::prompts::ACTIONABLE_INSTRUCTION,
            ),
        ],
    )
}

/// Replaces `{key}` placeholders in a single left-to-right pass. Substituted
/// values are never rescanned, so user text containing `{resume_text}` or
/// `{jd_text}` stays literal. Braces that open no known key are kept.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(
        template.len() + values.iter().map(|(_, v)| v.len()).sum::<usize>(),
    );
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open + 1..];
        let hit = values.iter().find(|(key, _)| {
            tail.strip_prefix(key)
                .is_some_and(|after| after.starts_with('}'))
        });
        match hit {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }

    out.push_str(rest);
    out
}

pub fn match_system_prompt() -> String {
    format!(
        "{MATCH_ANALYSIS_SYSTEM} {}",
        crate::llm_client::prompts::JSON_ONLY_SYSTEM
    )
}
