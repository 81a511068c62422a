pub mod credential;
pub mod domain;
pub mod first_aid;
pub mod local_state;
pub mod otc;
pub mod ports;
pub mod prescreen;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use credential::sanitize_credential;
pub use domain::{
    Gender, GuidanceResult, HistoryRecord, IntakeError, Medicine, SymptomIntake, Theme,
    MEDICAL_DISCLAIMER,
};
pub use local_state::{LocalState, HISTORY_CAP};
pub use otc::{is_prescription_only, PRESCRIPTION_ONLY};
pub use ports::{GuidanceError, GuidanceService, KeyValueStore, PortError, PortResult};
pub use prescreen::{matched_keywords, pre_screen, show_emergency_banner, EMERGENCY_KEYWORDS};
