//! crates/symptom_guide_core/src/prescreen.rs
//!
//! Offline emergency keyword screen, evaluated on every edit of the symptom
//! description before any network activity.

use crate::domain::GuidanceResult;

/// Phrases that raise the emergency banner when found anywhere in a description.
pub const EMERGENCY_KEYWORDS: &[&str] = &[
    "chest pain",
    "severe bleeding",
    "fainting",
    "difficulty breathing",
    "loss of consciousness",
    "seizure",
    "heavy bleeding",
    "shortness of breath",
    "numbness",
    "slurred speech",
];

/// True iff the lowercased text contains at least one emergency keyword.
/// Plain substring containment; no word-boundary requirement.
pub fn pre_screen(text: &str) -> bool {
    let lowered = text.to_lowercase();
    EMERGENCY_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
}

/// The keywords found in the text, in list order.
pub fn matched_keywords(text: &str) -> Vec<&'static str> {
    let lowered = text.to_lowercase();
    EMERGENCY_KEYWORDS
        .iter()
        .copied()
        .filter(|keyword| lowered.contains(keyword))
        .collect()
}

/// The keyword screen and the model's own emergency flag are independent signals;
/// either one is enough to show the banner.
pub fn show_emergency_banner(pre_screen_hit: bool, guidance: Option<&GuidanceResult>) -> bool {
    pre_screen_hit || guidance.is_some_and(|g| g.is_emergency)
}
