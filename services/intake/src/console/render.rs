//! services/intake/src/console/render.rs
//!
//! Text rendering for the terminal. Every function returns a `String` so the
//! command layer decides where it goes.

use chrono::{Local, TimeZone};
use std::fmt::Write;
use symptom_guide_core::first_aid::FirstAidTopic;
use symptom_guide_core::{GuidanceError, GuidanceResult, HistoryRecord, Theme, MEDICAL_DISCLAIMER};

/// ANSI styling chosen from the stored theme preference.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    heading: &'static str,
    alert: &'static str,
    muted: &'static str,
    reset: &'static str,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                heading: "\x1b[1;34m",
                alert: "\x1b[1;31m",
                muted: "\x1b[90m",
                reset: "\x1b[0m",
            },
            Theme::Dark => Self {
                heading: "\x1b[1;96m",
                alert: "\x1b[1;91m",
                muted: "\x1b[37m",
                reset: "\x1b[0m",
            },
        }
    }

    /// No escape codes at all, for pipes and tests.
    pub fn plain() -> Self {
        Self {
            heading: "",
            alert: "",
            muted: "",
            reset: "",
        }
    }

    fn heading(&self, text: &str) -> String {
        format!("{}{}{}", self.heading, text, self.reset)
    }

    fn alert(&self, text: &str) -> String {
        format!("{}{}{}", self.alert, text, self.reset)
    }

    fn muted(&self, text: &str) -> String {
        format!("{}{}{}", self.muted, text, self.reset)
    }
}

pub fn emergency_banner(palette: &Palette, matched: &[&str]) -> String {
    let mut out = palette.alert("!! POSSIBLE EMERGENCY: call your local emergency number or go to the nearest emergency department now.");
    if !matched.is_empty() {
        let _ = write!(out, "\n   Detected: {}", matched.join(", "));
    }
    out
}

fn section(out: &mut String, palette: &Palette, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "{}", palette.heading(title));
    for item in items {
        let _ = writeln!(out, "  - {}", item);
    }
    out.push('\n');
}

/// The full guidance card: every section, the OTC table and the disclaimer.
pub fn render_guidance(palette: &Palette, result: &GuidanceResult) -> String {
    let mut out = String::new();
    section(&mut out, palette, "Possible Causes", &result.possible_causes);
    section(&mut out, palette, "Immediate Actions", &result.immediate_actions);
    section(&mut out, palette, "Preventive Measures", &result.preventive_measures);
    section(&mut out, palette, "When to See a Doctor", &result.when_to_see_doctor);

    if !result.medicines.is_empty() {
        let _ = writeln!(out, "{}", palette.heading("OTC Suggestions"));
        for med in &result.medicines {
            let _ = writeln!(out, "  - {} ({})", med.name, med.dosage);
            let _ = writeln!(out, "    Warning: {}", med.warnings);
        }
        out.push('\n');
    }

    if let Some(reasoning) = result.reasoning.as_deref().filter(|r| !r.trim().is_empty()) {
        let _ = writeln!(out, "{}", palette.heading("Reasoning"));
        let _ = writeln!(out, "  {}\n", reasoning.trim());
    }

    out.push_str(&palette.muted(MEDICAL_DISCLAIMER));
    out
}

/// Renders a failed request. Only a busy service suggests trying again; failures
/// that need a configuration change say so instead.
pub fn render_failure(palette: &Palette, err: &GuidanceError) -> String {
    let mut out = palette.alert(&err.user_message());
    if err.is_retryable() {
        out.push_str("\nPlease wait a moment and try again.");
    } else if err.is_terminal() {
        out.push_str("\nUpdate the API key configuration and restart the app.");
    }
    out
}

fn format_timestamp(millis: i64) -> String {
    Local
        .timestamp_millis_opt(millis)
        .single()
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "unknown date".to_string())
}

fn preview(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}

/// One line per record, newest first, indexed from 1.
pub fn render_history_list(palette: &Palette, history: &[HistoryRecord]) -> String {
    if history.is_empty() {
        return "No saved queries yet.".to_string();
    }
    let mut out = palette.heading(&format!("Recent queries ({})", history.len()));
    for (i, record) in history.iter().enumerate() {
        let flag = if record.result.is_emergency { " [emergency]" } else { "" };
        let _ = write!(
            out,
            "\n{:>3}. {}  {}{}",
            i + 1,
            palette.muted(&format_timestamp(record.timestamp)),
            preview(&record.intake.description, 60),
            flag
        );
    }
    out
}

pub fn render_record(palette: &Palette, record: &HistoryRecord) -> String {
    let intake = &record.intake;
    let mut out = String::new();
    let _ = writeln!(out, "{}", palette.heading(&format_timestamp(record.timestamp)));
    let _ = writeln!(out, "Symptoms: {}", intake.description.trim());
    let age = intake
        .age
        .map(|a| a.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let duration = match intake.duration.trim() {
        "" => "not specified",
        d => d,
    };
    let _ = writeln!(
        out,
        "Age: {}  Gender: {}  Duration: {}  Severity: {}/10\n",
        age, intake.gender, duration, intake.severity
    );
    out.push_str(&render_guidance(palette, &record.result));
    out
}

pub fn render_first_aid(palette: &Palette, topic: &FirstAidTopic) -> String {
    let mut out = palette.heading(topic.title);
    for (i, step) in topic.steps.iter().enumerate() {
        let _ = write!(out, "\n  {}. {}", i + 1, step);
    }
    out
}

pub fn render_first_aid_index(palette: &Palette, topics: &[FirstAidTopic]) -> String {
    let mut out = palette.heading("First aid topics");
    for topic in topics {
        let _ = write!(out, "\n  - {}", topic.title);
    }
    out.push_str("\nRun `symptom-guide first-aid <topic>` for the steps.");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::submit::fakes::sample_guidance;
    use symptom_guide_core::first_aid::FIRST_AID_GUIDE;
    use symptom_guide_core::{Gender, SymptomIntake};

    #[test]
    fn guidance_card_lists_every_section_and_the_disclaimer() {
        let text = render_guidance(&Palette::plain(), &sample_guidance(false));
        for heading in [
            "Possible Causes",
            "Immediate Actions",
            "Preventive Measures",
            "When to See a Doctor",
            "OTC Suggestions",
        ] {
            assert!(text.contains(heading), "missing {heading}");
        }
        assert!(text.contains("Acetaminophen (500 mg every 6 hours)"));
        assert!(text.ends_with(MEDICAL_DISCLAIMER));
        assert!(!text.contains("Reasoning"));
    }

    #[test]
    fn busy_service_suggests_retry() {
        let text = render_failure(&Palette::plain(), &GuidanceError::ServiceUnavailable);
        assert!(text.contains("try again"));
    }

    #[test]
    fn terminal_failures_never_suggest_retry() {
        for err in [GuidanceError::MissingCredential, GuidanceError::Unauthorized] {
            let text = render_failure(&Palette::plain(), &err);
            assert!(!text.contains("try again"));
            assert!(text.contains("configuration"));
        }
        let region = render_failure(&Palette::plain(), &GuidanceError::RegionRestricted);
        assert!(!region.contains("try again"));
    }

    #[test]
    fn history_list_is_numbered_from_one() {
        let intake =
            SymptomIntake::new("a very long description ".repeat(10), None, Gender::Other, "", 5)
                .unwrap();
        let records = vec![
            HistoryRecord::capture(intake.clone(), sample_guidance(true)),
            HistoryRecord::capture(intake, sample_guidance(false)),
        ];
        let text = render_history_list(&Palette::plain(), &records);
        assert!(text.contains("  1. "));
        assert!(text.contains("  2. "));
        assert!(text.contains("..."));
        assert_eq!(text.matches("[emergency]").count(), 1);
        assert_eq!(
            render_history_list(&Palette::plain(), &[]),
            "No saved queries yet."
        );
    }

    #[test]
    fn record_shows_intake_fallbacks() {
        let intake = SymptomIntake::new("dry cough", None, Gender::Female, " ", 3).unwrap();
        let record = HistoryRecord::capture(intake, sample_guidance(false));
        let text = render_record(&Palette::plain(), &record);
        assert!(text.contains("Age: unknown"));
        assert!(text.contains("Duration: not specified"));
        assert!(text.contains("Severity: 3/10"));
    }

    #[test]
    fn banner_names_matched_keywords() {
        let text = emergency_banner(&Palette::plain(), &["chest pain", "numbness"]);
        assert!(text.contains("Detected: chest pain, numbness"));
    }

    #[test]
    fn first_aid_steps_are_numbered() {
        let text = render_first_aid(&Palette::plain(), &FIRST_AID_GUIDE[0]);
        assert!(text.starts_with(FIRST_AID_GUIDE[0].title));
        assert!(text.contains("\n  1. "));
    }
}
