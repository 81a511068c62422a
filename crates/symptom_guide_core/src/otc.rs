//! crates/symptom_guide_core/src/otc.rs
//!
//! Over-the-counter guard for medicine suggestions.

use crate::domain::{GuidanceResult, Medicine};

/// Prescription-only substances that must never be suggested.
pub const PRESCRIPTION_ONLY: &[&str] = &[
    "amoxicillin",
    "augmentin",
    "azithromycin",
    "cephalexin",
    "ciprofloxacin",
    "clarithromycin",
    "doxycycline",
    "levofloxacin",
    "penicillin",
    "metronidazole",
    "oxycodone",
    "hydrocodone",
    "tramadol",
    "morphine",
    "fentanyl",
    "prednisone",
    "prednisolone",
    "alprazolam",
    "diazepam",
    "lorazepam",
    "zolpidem",
    "gabapentin",
    "warfarin",
    "metformin",
    "sildenafil",
];

pub fn is_prescription_only(name: &str) -> bool {
    let lowered = name.to_lowercase();
    PRESCRIPTION_ONLY
        .iter()
        .any(|substance| lowered.contains(substance))
}

impl GuidanceResult {
    /// Splits off any prescription-only entries, returning the remaining result and
    /// the removed medicines.
    pub fn without_prescription_only(mut self) -> (Self, Vec<Medicine>) {
        let (removed, kept): (Vec<Medicine>, Vec<Medicine>) = self
            .medicines
            .into_iter()
            .partition(|med| is_prescription_only(&med.name));
        self.medicines = kept;
        (self, removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::knee_guidance;

    #[test]
    fn recognises_prescription_names_in_any_case() {
        assert!(is_prescription_only("Amoxicillin 500mg"));
        assert!(is_prescription_only("AZITHROMYCIN"));
        assert!(!is_prescription_only("Ibuprofen"));
        assert!(!is_prescription_only("Acetaminophen"));
    }

    #[test]
    fn strips_only_prescription_entries() {
        let mut guidance = knee_guidance();
        guidance.medicines.push(Medicine {
            name: "Amoxicillin".into(),
            dosage: "500 mg three times daily".into(),
            warnings: "Antibiotic".into(),
        });

        let (cleaned, removed) = guidance.without_prescription_only();
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].name, "Amoxicillin");
        assert_eq!(cleaned.medicines, knee_guidance().medicines);
    }
}
