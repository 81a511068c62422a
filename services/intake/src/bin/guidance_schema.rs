//! services/intake/src/bin/guidance_schema.rs
//!
//! This binary writes the JSON schema the guidance model is asked to follow to a
//! file named `guidance-schema.json`.

use intake_lib::adapters::guidance_schema::guidance_schema;

/// Serializes the schema and writes it to a file.
fn generate_schema(
    schema: serde_json::Value,
    path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let schema_json = serde_json::to_string_pretty(&schema)?;
    std::fs::write(path, schema_json)?;
    println!("Guidance schema generated at {}", path);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let include_reasoning = std::env::args().any(|arg| arg == "--with-reasoning");
    generate_schema(guidance_schema(include_reasoning), "guidance-schema.json")?;
    Ok(())
}
