// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to prompts that ask for improvement advice.
pub const ACTIONABLE_INSTRUCTION: &str = "\
    Focus on specific actionable items. \
    For example, if 'Excel' is missing, say 'Add Microsoft Excel (Pivot Tables)'.";
