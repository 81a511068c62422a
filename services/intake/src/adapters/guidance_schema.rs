//! services/intake/src/adapters/guidance_schema.rs
//!
//! The JSON schema the language model's output must conform to.

use serde_json::{json, Value};

pub const SCHEMA_NAME: &str = "health_guidance";

/// Fields every response must carry.
pub const REQUIRED_FIELDS: &[&str] = &[
    "possibleCauses",
    "immediateActions",
    "preventiveMeasures",
    "whenToSeeDoctor",
    "medicines",
    "isEmergency",
];

fn string_list(description: &str) -> Value {
    json!({
        "type": "array",
        "items": { "type": "string" },
        "description": description,
    })
}

/// Builds the response schema. `reasoning` is offered as an optional property only
/// when requested; it is never required.
pub fn guidance_schema(include_reasoning: bool) -> Value {
    let mut properties = json!({
        "possibleCauses": string_list("List of common informational causes."),
        "immediateActions": string_list("Non-medicinal steps to take immediately."),
        "preventiveMeasures": string_list("How to avoid this issue in the future."),
        "whenToSeeDoctor": string_list("Red flags that require professional attention."),
        "medicines": {
            "type": "array",
            "description": "Suggested over-the-counter medicines only.",
            "items": {
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "dosage": { "type": "string" },
                    "warnings": { "type": "string" },
                },
                "required": ["name", "dosage", "warnings"],
            },
        },
        "isEmergency": {
            "type": "boolean",
            "description": "True if the symptoms suggest an emergency.",
        },
    });

    if include_reasoning {
        properties["reasoning"] = json!({
            "type": "string",
            "description": "Short explanation of how the guidance was reached.",
        });
    }

    json!({
        "type": "object",
        "properties": properties,
        "required": REQUIRED_FIELDS,
    })
}
