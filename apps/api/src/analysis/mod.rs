// Resume/JD match analysis.
// Gemini is the primary analyzer; the local heuristic (skills catalog,
// experience and education extractors, embedding similarity) is the fallback.

pub mod extractors;
pub mod fallback;
pub mod handlers;
pub mod orchestrator;
pub mod primary;
pub mod prompts;
pub mod report;
pub mod similarity;
pub mod skills;
pub mod suggestions;
