// Shared prompt fragments. Each stage keeps its own prompts.rs alongside it;
// only instructions used by more than one stage live here.

/// Appended to every system prompt that expects a structured reply.
pub const JSON_ONLY_INSTRUCTION: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Builds a JSON-only system prompt for the given examiner persona.
pub fn json_system(persona: &str) -> String {
    format!("{persona} {JSON_ONLY_INSTRUCTION}")
}

/// Fills `{name}` placeholders in a template. Unknown placeholders are left untouched.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    values.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{key}}}"), value)
    })
}
