//! Skill Catalog — static reference set of recognised skill terms.
//!
//! Categories exist for documentation; lookups use the flattened set.
//! Matching is case-insensitive and whole-word: an occurrence counts only when
//! the characters around it are not word characters (alphanumeric or `_`).

use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Built-in catalog, grouped by category. All terms are lowercase.
pub const SKILL_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "languages",
        &[
            "python", "javascript", "typescript", "java", "c++", "c#", "go", "rust", "php",
            "ruby", "swift", "kotlin", "scala", "r", "matlab", "sql", "html", "css", "bash",
            "shell",
        ],
    ),
    (
        "frameworks",
        &[
            "react", "angular", "vue", "svelte", "next.js", "nuxt", "node.js", "express",
            "fastapi", "flask", "django", "spring", "springboot", "laravel", "rails", ".net",
            "flutter", "react native", "tensorflow", "pytorch", "scikit-learn", "pandas",
            "numpy",
        ],
    ),
    (
        "tools",
        &[
            "git", "docker", "kubernetes", "aws", "azure", "gcp", "jenkins", "gitlab ci",
            "github actions", "circleci", "jira", "confluence", "slack", "trello", "asana",
            "figma", "postman", "swagger", "redis", "mongodb", "postgresql", "mysql", "oracle",
            "elasticsearch", "excel", "word", "powerpoint", "office suite", "microsoft office",
            "google workspace", "vlookup", "pivot tables", "spreadsheet",
        ],
    ),
    (
        "concepts",
        &[
            "rest api", "graphql", "microservices", "serverless", "ci/cd", "agile", "scrum",
            "devops", "machine learning", "deep learning", "nlp", "computer vision",
            "distributed systems", "cloud computing", "big data", "data science",
            "cybersecurity", "blockchain",
        ],
    ),
    (
        "soft_skills",
        &[
            "communication", "problem-solving", "problem solving", "time management",
            "collaboration", "teamwork", "adaptability", "leadership", "critical thinking",
            "attention to detail", "presentation", "public speaking", "research", "analytical",
            "organization",
        ],
    ),
];

static BUILTIN: LazyLock<SkillCatalog> = LazyLock::new(|| {
    SkillCatalog::from_terms(
        SKILL_CATEGORIES
            .iter()
            .flat_map(|(_, terms)| terms.iter().copied()),
    )
});

/// Immutable, flattened skill set.
#[derive(Debug, Clone)]
pub struct SkillCatalog {
    terms: BTreeSet<String>,
}

impl SkillCatalog {
    /// The process-wide built-in catalog.
    pub fn builtin() -> &'static SkillCatalog {
        &BUILTIN
    }

    pub fn from_terms<'a>(terms: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            terms: terms
                .into_iter()
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Every catalog term that occurs as a whole word in `text`, sorted.
    pub fn lookup(&self, text: &str) -> BTreeSet<String> {
        let haystack = text.to_lowercase();
        self.terms
            .iter()
            .filter(|term| contains_whole_word(&haystack, term))
            .cloned()
            .collect()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Substring search that rejects occurrences glued to neighbouring word characters.
fn contains_whole_word(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(start, _)| {
        let end = start + needle.len();
        let before_ok = haystack[..start].chars().next_back().map_or(true, |c| !is_word_char(c));
        let after_ok = haystack[end..].chars().next().map_or(true, |c| !is_word_char(c));
        before_ok && after_ok
    })
}
