//! Heuristic analyzer — local weighted composite used when Gemini is unavailable.
//!
//! Algorithm:
//! 1. semantic   = cosine(embed(resume), embed(jd)) × 100
//! 2. skills     = |matched| / |jd skills| × 100, or `semantic` when the JD names no catalog skill
//! 3. experience = 100 when the JD asks for nothing or the resume meets the minimum,
//!    else resume / minimum × 100 (floored at 90 for internships against ≤1 year JDs)
//! 4. education  = 100 when the resume tier ≥ JD tier, else resume / jd × 100
//! 5. final      = round(0.50·skills + 0.25·experience + 0.15·semantic + 0.10·education), clamped to 0–100

use std::sync::Arc;

use tracing::{debug, info};

use crate::analysis::extractors::{
    extract_education_level, extract_skills, jd_experience, resume_experience, JdExperience,
    ResumeExperience,
};
use crate::analysis::report::{AnalyzerKind, MatchReport, Verdict};
use crate::analysis::similarity::{EmbeddingError, SimilarityEngine};
use crate::analysis::suggestions::{build_suggestions, SuggestionContext};

pub const SKILLS_WEIGHT: f64 = 0.50;
pub const EXPERIENCE_WEIGHT: f64 = 0.25;
pub const SEMANTIC_WEIGHT: f64 = 0.15;
pub const EDUCATION_WEIGHT: f64 = 0.10;

/// Minimum experience score for an internship against a JD asking ≤ 1 year.
const INTERNSHIP_CREDIT_FLOOR: f64 = 90.0;
const FULL: f64 = 100.0;

/// Component scores, each a percentage.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub semantic: f64,
    pub skills: f64,
    pub experience: f64,
    pub education: f64,
}

impl ScoreBreakdown {
    pub fn final_score(&self) -> u8 {
        let weighted = self.skills * SKILLS_WEIGHT
            + self.experience * EXPERIENCE_WEIGHT
            + self.semantic * SEMANTIC_WEIGHT
            + self.education * EDUCATION_WEIGHT;
        weighted.round().clamp(0.0, FULL) as u8
    }
}

/// Everything the heuristic derives from one resume/JD pair.
#[derive(Debug, Clone)]
pub struct Assessment {
    pub breakdown: ScoreBreakdown,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub resume_experience: ResumeExperience,
    pub jd_experience: JdExperience,
}

/// Pure scoring given a precomputed semantic score.
pub fn assess(resume_text: &str, jd_text: &str, semantic: f64) -> Assessment {
    let resume_skills = extract_skills(resume_text);
    let jd_skills = extract_skills(jd_text);
    let matched_skills: Vec<String> = jd_skills.intersection(&resume_skills).cloned().collect();
    let missing_skills: Vec<String> = jd_skills.difference(&resume_skills).cloned().collect();

    let resume_exp = resume_experience(resume_text);
    let jd_exp = jd_experience(jd_text);

    let breakdown = ScoreBreakdown {
        semantic,
        skills: skills_score(matched_skills.len(), jd_skills.len(), semantic),
        experience: experience_score(resume_exp, jd_exp),
        education: education_score(
            extract_education_level(resume_text),
            extract_education_level(jd_text),
        ),
    };

    Assessment {
        breakdown,
        matched_skills,
        missing_skills,
        resume_experience: resume_exp,
        jd_experience: jd_exp,
    }
}

/// Share of JD skills found in the resume. A JD with no catalog skills is
/// scored by semantic similarity alone.
pub fn skills_score(matched: usize, jd_total: usize, semantic: f64) -> f64 {
    if jd_total == 0 {
        return semantic;
    }
    matched as f64 / jd_total as f64 * FULL
}

pub fn experience_score(resume: ResumeExperience, jd: JdExperience) -> f64 {
    if jd.min_years == 0 {
        return FULL;
    }
    let required = f64::from(jd.min_years);
    if resume.years >= required {
        return FULL;
    }
    let score = resume.years / required * FULL;
    if resume.has_internship && jd.min_years <= 1 {
        score.max(INTERNSHIP_CREDIT_FLOOR)
    } else {
        score
    }
}

pub fn education_score(resume_level: u8, jd_level: u8) -> f64 {
    if jd_level == 0 || resume_level >= jd_level {
        return FULL;
    }
    f64::from(resume_level) / f64::from(jd_level) * FULL
}

fn build_summary(score: u8, matched: usize, missing: usize) -> String {
    let detail = if missing > 0 {
        format!(
            "You have {matched} core matches, but are missing {missing} key elements mentioned in the JD."
        )
    } else {
        "You have a solid match for most requirements.".to_string()
    };
    format!("Your profile matches {score}% of the requirements. {detail}")
}

impl Assessment {
    pub fn into_report(self) -> MatchReport {
        let score = self.breakdown.final_score();
        let suggestions = build_suggestions(&SuggestionContext {
            missing_skills: &self.missing_skills,
            experience_score: self.breakdown.experience,
            semantic_score: self.breakdown.semantic,
            has_internship: self.resume_experience.has_internship,
            jd_min_years: self.jd_experience.min_years,
        });

        MatchReport {
            score,
            verdict: Verdict::from_score(score),
            summary: build_summary(score, self.matched_skills.len(), self.missing_skills.len()),
            matched_skills: self.matched_skills,
            missing_skills: self.missing_skills,
            suggestions,
            analyzer: AnalyzerKind::Heuristic,
        }
    }
}

/// Terminal analyzer: its only failure is an embedding model that cannot load.
pub struct FallbackAnalyzer {
    similarity: Arc<SimilarityEngine>,
}

impl FallbackAnalyzer {
    pub fn new(similarity: Arc<SimilarityEngine>) -> Self {
        Self { similarity }
    }

    pub async fn analyze(
        &self,
        resume_text: &str,
        jd_text: &str,
    ) -> Result<MatchReport, EmbeddingError> {
        if !self.similarity.is_loaded() {
            info!(
                "Embedding model '{}' not loaded yet, loading before scoring",
                self.similarity.model_name()
            );
        }
        let semantic = self.similarity.semantic_score(resume_text, jd_text).await?;
        let assessment = assess(resume_text, jd_text, semantic);
        debug!(
            "Heuristic breakdown: skills={:.2} experience={:.2} semantic={:.2} education={:.2}",
            assessment.breakdown.skills,
            assessment.breakdown.experience,
            assessment.breakdown.semantic,
            assessment.breakdown.education
        );
        Ok(assessment.into_report())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::similarity::testing::{bag_of_words_engine, failing_engine};

    const RESUME: &str = "Python and SQL developer with 2 years experience building reports.";
    const JD: &str = "We need Python, SQL and AWS. 3+ years required.";

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn test_partial_skills_and_experience_scenario() {
        let assessment = assess(RESUME, JD, 40.0);
        assert_eq!(assessment.missing_skills, vec!["aws"]);
        assert_eq!(assessment.matched_skills, vec!["python", "sql"]);
        assert!(approx(assessment.breakdown.experience, 66.67));
        assert!(approx(assessment.breakdown.skills, 66.67));
        assert_eq!(assessment.breakdown.education, 100.0);
        // 33.33 + 16.67 + 6.0 + 10.0 = 66.0
        assert_eq!(assessment.breakdown.final_score(), 66);
    }

    #[test]
    fn test_zero_minimum_jd_gives_full_experience() {
        let assessment = assess(
            "Completed an internship at Acme",
            "0-1 years, fresher welcome",
            50.0,
        );
        assert_eq!(assessment.jd_experience.min_years, 0);
        assert_eq!(assessment.breakdown.experience, 100.0);
    }

    #[test]
    fn test_internship_floor_for_one_year_jd() {
        let resume = ResumeExperience {
            years: 0.5,
            has_internship: true,
        };
        let jd = JdExperience {
            min_years: 1,
            max_years: 2,
        };
        assert_eq!(experience_score(resume, jd), 90.0);

        let senior_jd = JdExperience {
            min_years: 2,
            max_years: 4,
        };
        assert!(approx(experience_score(resume, senior_jd), 25.0));
    }

    #[test]
    fn test_no_catalog_skills_in_jd_uses_semantic() {
        assert_eq!(skills_score(0, 0, 37.5), 37.5);
        let assessment = assess("Anything at all", "A role with no recognised terms", 37.5);
        assert_eq!(assessment.breakdown.skills, 37.5);
        assert!(assessment.missing_skills.is_empty());
    }

    #[test]
    fn test_education_ratio() {
        assert_eq!(education_score(100, 80), 100.0);
        assert!(approx(education_score(80, 90), 88.89));
        assert_eq!(education_score(40, 0), 100.0);
    }

    #[test]
    fn test_final_score_is_bounded() {
        let low = ScoreBreakdown {
            semantic: -100.0,
            skills: -100.0,
            experience: 0.0,
            education: 40.0,
        };
        assert_eq!(low.final_score(), 0);
        let high = ScoreBreakdown {
            semantic: 100.0,
            skills: 100.0,
            experience: 100.0,
            education: 100.0,
        };
        assert_eq!(high.final_score(), 100);
        for (matched, total) in [(0, 0), (0, 5), (3, 5), (5, 5)] {
            for semantic in [-100.0, -20.0, 0.0, 55.0, 100.0] {
                let breakdown = ScoreBreakdown {
                    semantic,
                    skills: skills_score(matched, total, semantic),
                    experience: 0.0,
                    education: 44.4,
                };
                assert!(breakdown.final_score() <= 100);
            }
        }
    }

    #[test]
    fn test_summary_templates() {
        assert_eq!(
            build_summary(66, 2, 1),
            "Your profile matches 66% of the requirements. You have 2 core matches, \
             but are missing 1 key elements mentioned in the JD."
        );
        assert_eq!(
            build_summary(91, 4, 0),
            "Your profile matches 91% of the requirements. You have a solid match for most requirements."
        );
    }

    #[test]
    fn test_report_uses_verdict_and_sections() {
        let report = assess(RESUME, JD, 40.0).into_report();
        assert_eq!(report.score, 66);
        assert_eq!(report.verdict, Verdict::PartialMatch);
        assert_eq!(report.analyzer, AnalyzerKind::Heuristic);
        assert_eq!(
            report.suggestions.iter().filter(|s| s.starts_with("### ")).collect::<Vec<_>>(),
            vec!["### Skills Gap Analysis", "### Experience & Role Fit", "### Resume Optimization"]
        );
        assert!(report.suggestions.contains(&"CRITICAL MISSING: aws".to_string()));
    }

    #[tokio::test]
    async fn test_analyze_with_embedding_engine() {
        let analyzer = FallbackAnalyzer::new(Arc::new(bag_of_words_engine()));
        let report = analyzer.analyze(RESUME, JD).await.unwrap();
        assert!(report.score <= 100);
        assert_eq!(report.missing_skills, vec!["aws"]);
    }

    #[tokio::test]
    async fn test_analyze_fails_when_model_cannot_load() {
        let analyzer = FallbackAnalyzer::new(Arc::new(failing_engine()));
        let err = analyzer.analyze(RESUME, JD).await.unwrap_err();
        assert!(matches!(err, EmbeddingError::ModelLoad { .. }));
    }
}
