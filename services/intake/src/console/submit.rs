//! services/intake/src/console/submit.rs
//!
//! The submission workflow for one symptom intake: pre-screen, a single guidance
//! request, and a history append that happens only after success.

use crate::console::state::AppState;
use crate::error::AppError;
use std::time::Instant;
use symptom_guide_core::{
    matched_keywords, show_emergency_banner, HistoryRecord, LocalState, SymptomIntake,
};
use tracing::{error, info};

/// Everything the UI needs to present a successful submission.
#[derive(Debug)]
pub struct Submission {
    pub record: HistoryRecord,
    /// Emergency keywords found in the description before the request was sent.
    pub matched_keywords: Vec<&'static str>,
    /// Keyword screen OR the model's emergency flag.
    pub show_emergency_banner: bool,
    /// False when the result was produced but could not be written to history.
    pub saved: bool,
}

pub async fn submit_intake(
    app_state: &AppState,
    local: &mut LocalState,
    intake: SymptomIntake,
) -> Result<Submission, AppError> {
    intake.validate()?;
    if !local.consent_accepted() {
        return Err(AppError::ConsentRequired);
    }

    let matched = matched_keywords(&intake.description);
    if !matched.is_empty() {
        info!("Emergency keywords present before request: {:?}", matched);
    }

    let start = Instant::now();
    let result = app_state.guidance.request_guidance(&intake).await?;
    info!("Guidance request took {:?}", start.elapsed());

    let banner = show_emergency_banner(!matched.is_empty(), Some(&result));
    let record = HistoryRecord::capture(intake, result);

    let saved = match local.append_history(record.clone()) {
        Ok(()) => true,
        Err(e) => {
            error!("Failed to save history record {}: {}", record.id, e);
            false
        }
    };

    Ok(Submission {
        record,
        matched_keywords: matched,
        show_emergency_banner: banner,
        saved,
    })
}
