//! crates/symptom_guide_core/src/credential.rs
//!
//! Normalises the API credential read from the environment.

const ZERO_WIDTH: &[char] = &['\u{200B}', '\u{200C}', '\u{200D}', '\u{2060}', '\u{FEFF}'];
const QUOTES: &[char] = &['"', '\'', '`'];

/// Strips whitespace, quoting and zero-width characters from a raw credential.
///
/// Returns `None` when nothing usable remains, including the literal placeholders
/// `undefined` and `null` that leak out of misconfigured env files.
pub fn sanitize_credential(raw: Option<&str>) -> Option<String> {
    let without_zero_width: String = raw?.chars().filter(|c| !ZERO_WIDTH.contains(c)).collect();
    let cleaned = without_zero_width
        .trim()
        .trim_matches(|c: char| QUOTES.contains(&c) || c.is_whitespace());

    if cleaned.is_empty()
        || cleaned.eq_ignore_ascii_case("undefined")
        || cleaned.eq_ignore_ascii_case("null")
    {
        return None;
    }
    Some(cleaned.to_string())
}
