use serde::{Deserialize, Serialize};

/// Qualitative label derived from the numeric score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "Excellent Match")]
    ExcellentMatch,
    #[serde(rename = "Good Match")]
    GoodMatch,
    #[serde(rename = "Partial Match")]
    PartialMatch,
    #[serde(rename = "Needs Improvement")]
    NeedsImprovement,
}

impl Verdict {
    /// Thresholds are inclusive lower bounds: 85, 70, 50.
    pub fn from_score(score: u8) -> Self {
        match score {
            85..=u8::MAX => Verdict::ExcellentMatch,
            70..=84 => Verdict::GoodMatch,
            50..=69 => Verdict::PartialMatch,
            _ => Verdict::NeedsImprovement,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Verdict::ExcellentMatch => "Excellent Match",
            Verdict::GoodMatch => "Good Match",
            Verdict::PartialMatch => "Partial Match",
            Verdict::NeedsImprovement => "Needs Improvement",
        }
    }

    /// Parses one of the four labels, ignoring case and surrounding whitespace.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        [
            Verdict::ExcellentMatch,
            Verdict::GoodMatch,
            Verdict::PartialMatch,
            Verdict::NeedsImprovement,
        ]
        .into_iter()
        .find(|v| v.label().eq_ignore_ascii_case(label))
    }
}

/// Which analyzer produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyzerKind {
    Ai,
    Heuristic,
}

/// The result of matching one resume against one job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub score: u8, // 0 – 100
    pub verdict: Verdict,
    pub summary: String,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    /// Flat list; entries starting with `### ` are section headers.
    pub suggestions: Vec<String>,
    pub analyzer: AnalyzerKind,
}

/// Marks a suggestion entry as a section header.
pub const SECTION_HEADER_PREFIX: &str = "### ";

pub fn section_header(name: &str) -> String {
    format!("{SECTION_HEADER_PREFIX}{name}")
}
