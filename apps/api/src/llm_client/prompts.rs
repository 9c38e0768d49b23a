// Shared prompt fragments.
// Each feature that calls the completion service keeps its own prompts.rs alongside it.

/// Appended to every user prompt that expects a JSON object back.
pub const JSON_ONLY_INSTRUCTION: &str = "CRITICAL: Respond ONLY with a single valid JSON object. \
    No markdown, no code fences, no preamble, no explanations.";
