// Shared prompt fragments for structured (JSON-object) generation.
// Each service that needs model calls defines its own prompts.rs alongside it.

use serde_json::Value;

/// Instruction appended after the output schema.
pub const JSON_OBJECT_INSTRUCTION: &str = "\
    You MUST respond with a single valid JSON object that conforms to the schema above. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Appends the target JSON schema and the JSON-only instruction to a prompt.
pub fn with_output_schema(prompt: &str, schema: &Value) -> Result<String, serde_json::Error> {
    let schema_json = serde_json::to_string_pretty(schema)?;
    Ok(format!(
        "{prompt}\n\nJSON schema of the required output:\n{schema_json}\n\n{JSON_OBJECT_INSTRUCTION}"
    ))
}
