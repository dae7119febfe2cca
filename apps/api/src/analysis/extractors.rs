//! Text feature extractors — pure functions deriving skill, experience and
//! education signals from free text.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::analysis::skills::SkillCatalog;

const FRESHER_MARKERS: &[&str] = &["fresher", "entry level", "grad school", "junior role"];

/// Years credited to a resume that shows internship or fresher markers but no numbers.
const PARTIAL_EXPERIENCE_YEARS: f64 = 0.5;

/// Education tiers, highest first. The first tier with any matching phrase wins.
const EDUCATION_TIERS: &[(u8, &[&str])] = &[
    (100, &["phd", "doctorate"]),
    (90, &["master", "m.s.", "ms ", "mba"]),
    (80, &["bachelor", "b.s.", "bs ", "b.tech", "be ", "bca"]),
    (60, &["associate", "diploma"]),
];

/// Score for text that names no recognised credential.
pub const EDUCATION_UNSPECIFIED: u8 = 40;

static YEARS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)(?:\s*-\s*(\d+))?\+?\s*years?").expect("years pattern is valid")
});

/// Experience detected in a resume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResumeExperience {
    pub years: f64,
    pub has_internship: bool,
}

/// Experience range requested by a job description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JdExperience {
    pub min_years: u32,
    pub max_years: u32,
}

pub fn extract_skills(text: &str) -> BTreeSet<String> {
    SkillCatalog::builtin().lookup(text)
}

struct YearMarkers {
    is_fresher: bool,
    has_internship: bool,
    years: Vec<u32>,
}

fn scan_years(text: &str) -> YearMarkers {
    let lower = text.to_lowercase();
    let years = YEARS_RE
        .captures_iter(&lower)
        .flat_map(|caps| [caps.get(1), caps.get(2)])
        .flatten()
        .filter_map(|m| m.as_str().parse::<u32>().ok())
        .collect();

    YearMarkers {
        is_fresher: FRESHER_MARKERS.iter().any(|m| lower.contains(m)),
        has_internship: lower.contains("intern"),
        years,
    }
}

/// Required range from a job description. Fresher-only JDs map to (0, 1).
pub fn jd_experience(text: &str) -> JdExperience {
    let markers = scan_years(text);
    match (markers.years.iter().min(), markers.years.iter().max()) {
        (Some(&min_years), Some(&max_years)) => JdExperience {
            min_years,
            max_years,
        },
        _ if markers.is_fresher => JdExperience {
            min_years: 0,
            max_years: 1,
        },
        _ => JdExperience {
            min_years: 0,
            max_years: 0,
        },
    }
}

/// Largest year count mentioned in a resume. Numeric evidence wins over markers.
pub fn resume_experience(text: &str) -> ResumeExperience {
    let markers = scan_years(text);
    let detected = markers.years.iter().max().copied().unwrap_or(0);
    let years = if detected == 0 && (markers.has_internship || markers.is_fresher) {
        PARTIAL_EXPERIENCE_YEARS
    } else {
        f64::from(detected)
    };

    ResumeExperience {
        years,
        has_internship: markers.has_internship,
    }
}

pub fn extract_education_level(text: &str) -> u8 {
    let lower = text.to_lowercase();
    EDUCATION_TIERS
        .iter()
        .find(|(_, phrases)| phrases.iter().any(|p| lower.contains(p)))
        .map(|(level, _)| *level)
        .unwrap_or(EDUCATION_UNSPECIFIED)
}
