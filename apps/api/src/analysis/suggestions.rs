//! Deterministic suggestion sections for the heuristic analyzer.
//!
//! Sections are evaluated in table order. A section whose condition is false
//! is omitted; the rest keep their relative order. "Final Polish" is emitted
//! only when no conditional section fired.

use crate::analysis::report::section_header;

/// At most this many missing skills are quoted in the skills gap section.
const MAX_QUOTED_MISSING: usize = 5;

/// Signals the section builders read.
#[derive(Debug, Clone)]
pub struct SuggestionContext<'a> {
    pub missing_skills: &'a [String],
    pub experience_score: f64,
    pub semantic_score: f64,
    pub has_internship: bool,
    pub jd_min_years: u32,
}

struct Section {
    name: &'static str,
    /// Conditional sections suppress the final polish fallback when they fire.
    conditional: bool,
    applies: fn(&SuggestionContext) -> bool,
    lines: fn(&SuggestionContext) -> Vec<String>,
}

const SECTIONS: &[Section] = &[
    Section {
        name: "Skills Gap Analysis",
        conditional: true,
        applies: |ctx| !ctx.missing_skills.is_empty(),
        lines: skills_gap_lines,
    },
    Section {
        name: "Experience & Role Fit",
        conditional: false,
        applies: |_| true,
        lines: experience_lines,
    },
    Section {
        name: "Resume Optimization",
        conditional: true,
        applies: |ctx| ctx.semantic_score < 50.0,
        lines: optimization_lines,
    },
];

const FINAL_POLISH: &str = "Final Polish";
const FINAL_POLISH_LINE: &str = "Your resume content is highly aligned. \
    Ensure your formatting is consistent and you use active verbs.";

pub fn build_suggestions(ctx: &SuggestionContext) -> Vec<String> {
    let mut suggestions = Vec::new();
    let mut conditional_fired = false;

    for section in SECTIONS.iter().filter(|s| (s.applies)(ctx)) {
        conditional_fired |= section.conditional;
        suggestions.push(section_header(section.name));
        suggestions.extend((section.lines)(ctx));
    }

    if !conditional_fired {
        suggestions.push(section_header(FINAL_POLISH));
        suggestions.push(FINAL_POLISH_LINE.to_string());
    }

    suggestions
}

fn skills_gap_lines(ctx: &SuggestionContext) -> Vec<String> {
    let quoted: Vec<&str> = ctx
        .missing_skills
        .iter()
        .take(MAX_QUOTED_MISSING)
        .map(String::as_str)
        .collect();
    vec![
        format!("CRITICAL MISSING: {}", quoted.join(", ")),
        "ACTION: Add a 'Key Skills' section or integrate these specific terms \
         into your experience bullet points."
            .to_string(),
    ]
}

fn experience_lines(ctx: &SuggestionContext) -> Vec<String> {
    let line = if ctx.experience_score >= 100.0 {
        "Your years of experience align well with the job requirements. Keep it as is.".to_string()
    } else if ctx.has_internship {
        "Your internship provides a strong foundation. Emphasize quantifiable achievements \
         (e.g., 'Improves efficiency by X%') to bridge the experience gap."
            .to_string()
    } else {
        format!(
            "The JD asks for {} years. If you have freelance or project work, \
             list it under 'Professional Experience' to show tenure.",
            ctx.jd_min_years
        )
    };
    vec![line]
}

fn optimization_lines(_ctx: &SuggestionContext) -> Vec<String> {
    vec![
        "LACK OF CONTEXT: Your resume mentions skills but doesn't map them to the \
         job's core responsibilities."
            .to_string(),
        "TIP: Mirror the language used in the JD. If they use 'Collaboration', \
         don't just say 'Teamwork'."
            .to_string(),
    ]
}
