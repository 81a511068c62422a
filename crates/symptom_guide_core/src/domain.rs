//! crates/symptom_guide_core/src/domain.rs
//!
//! Defines the core data structures for the application.
//! The serde shape of these structs is also the shape persisted in local storage.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub const MIN_SEVERITY: u8 = 1;
pub const MAX_SEVERITY: u8 = 10;
pub const DEFAULT_SEVERITY: u8 = 5;

pub const MEDICAL_DISCLAIMER: &str = "This information is provided for informational purposes only and is not a medical diagnosis, professional medical advice, or a substitute for a consultation with a healthcare professional. Always seek the advice of your physician or other qualified health provider with any questions you may have regarding a medical condition.";

//=========================================================================================
// Intake
//=========================================================================================

/// Errors raised while building a `SymptomIntake` from form input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeError {
    #[error("Please describe your symptoms before submitting.")]
    EmptyDescription,
    #[error("Severity must be between 1 and 10, got {0}")]
    SeverityOutOfRange(u8),
    #[error("Unknown gender '{0}', expected Male, Female or Other")]
    UnknownGender(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    #[default]
    Other,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        };
        f.write_str(label)
    }
}

impl FromStr for Gender {
    type Err = IntakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            "other" | "o" => Ok(Gender::Other),
            _ => Err(IntakeError::UnknownGender(s.to_string())),
        }
    }
}

/// The structured symptom description a user submits for one guidance request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomIntake {
    pub description: String,
    pub age: Option<u32>,
    pub gender: Gender,
    pub duration: String,
    pub severity: u8,
}

impl SymptomIntake {
    /// Builds a validated intake. The description must be non-empty after trimming
    /// and the severity must fall within 1..=10.
    pub fn new(
        description: impl Into<String>,
        age: Option<u32>,
        gender: Gender,
        duration: impl Into<String>,
        severity: u8,
    ) -> Result<Self, IntakeError> {
        let intake = Self {
            description: description.into(),
            age,
            gender,
            duration: duration.into(),
            severity,
        };
        intake.validate()?;
        Ok(intake)
    }

    pub fn validate(&self) -> Result<(), IntakeError> {
        if self.description.trim().is_empty() {
            return Err(IntakeError::EmptyDescription);
        }
        if !(MIN_SEVERITY..=MAX_SEVERITY).contains(&self.severity) {
            return Err(IntakeError::SeverityOutOfRange(self.severity));
        }
        Ok(())
    }
}

//=========================================================================================
// Guidance
//=========================================================================================

/// A single over-the-counter suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medicine {
    pub name: String,
    pub dosage: String,
    pub warnings: String,
}

/// The structured advisory output returned for one intake.
///
/// Every field except `reasoning` is required on the wire; deserializing a payload
/// that lacks one of them fails instead of defaulting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuidanceResult {
    pub possible_causes: Vec<String>,
    pub immediate_actions: Vec<String>,
    pub preventive_measures: Vec<String>,
    pub when_to_see_doctor: Vec<String>,
    pub medicines: Vec<Medicine>,
    pub is_emergency: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

impl GuidanceResult {
    /// Returns a description of the first medicine entry with a blank field, if any.
    pub fn completeness_error(&self) -> Option<String> {
        self.medicines.iter().enumerate().find_map(|(i, med)| {
            let blank = [
                ("name", &med.name),
                ("dosage", &med.dosage),
                ("warnings", &med.warnings),
            ]
            .into_iter()
            .find(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| field)?;
            Some(format!("medicines[{}].{} is empty", i, blank))
        })
    }
}

//=========================================================================================
// History
//=========================================================================================

/// A frozen (intake, result) pair recorded after a successful request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub id: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
    pub intake: SymptomIntake,
    pub result: GuidanceResult,
}

impl HistoryRecord {
    /// Captures a new record stamped with a fresh id and the current time.
    pub fn capture(intake: SymptomIntake, result: GuidanceResult) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now().timestamp_millis(),
            intake,
            result,
        }
    }
}

//=========================================================================================
// Preferences
//=========================================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => f.write_str("light"),
            Theme::Dark => f.write_str("dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("'{}' is not a theme, expected light or dark", other)),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn intake_rejects_blank_description() {
        let err = SymptomIntake::new("   \n", None, Gender::Other, "", 5).unwrap_err();
        assert_eq!(err, IntakeError::EmptyDescription);
    }

    #[test]
    fn intake_rejects_severity_outside_scale() {
        assert_eq!(
            SymptomIntake::new("headache", None, Gender::Other, "", 0).unwrap_err(),
            IntakeError::SeverityOutOfRange(0)
        );
        assert_eq!(
            SymptomIntake::new("headache", None, Gender::Other, "", 11).unwrap_err(),
            IntakeError::SeverityOutOfRange(11)
        );
        assert!(SymptomIntake::new("headache", None, Gender::Other, "", 10).is_ok());
    }

    #[test]
    fn gender_parses_case_insensitively() {
        assert_eq!("MALE".parse::<Gender>().unwrap(), Gender::Male);
        assert_eq!(" female ".parse::<Gender>().unwrap(), Gender::Female);
        assert!(matches!(
            "robot".parse::<Gender>(),
            Err(IntakeError::UnknownGender(_))
        ));
    }

    #[test]
    fn guidance_without_medicines_field_does_not_deserialize() {
        let payload = r#"{
            "possibleCauses": [], "immediateActions": [], "preventiveMeasures": [],
            "whenToSeeDoctor": [], "isEmergency": false
        }"#;
        assert!(serde_json::from_str::<GuidanceResult>(payload).is_err());
    }

    #[test]
    fn completeness_error_names_the_blank_field() {
        let mut guidance = knee_guidance();
        assert_eq!(guidance.completeness_error(), None);

        guidance.medicines[0].dosage = "  ".into();
        assert_eq!(
            guidance.completeness_error().as_deref(),
            Some("medicines[0].dosage is empty")
        );
    }

    #[test]
    fn history_record_keeps_the_submitted_pair() {
        let record = HistoryRecord::capture(knee_intake(), knee_guidance());
        assert_eq!(record.intake, knee_intake());
        assert_eq!(record.result, knee_guidance());
        assert!(Uuid::parse_str(&record.id).is_ok());
        assert!(record.timestamp > 0);
    }

    #[test]
    fn theme_round_trips_through_text() {
        assert_eq!("Dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.to_string(), "light");
    }
}
