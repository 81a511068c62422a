//! crates/symptom_guide_core/src/local_state.rs
//!
//! The device-local application state: theme, disclaimer consent and query history.
//! Initialised from the key-value store at startup and written through on every
//! named mutation.

use crate::domain::{HistoryRecord, Theme};
use crate::ports::{KeyValueStore, PortError, PortResult};
use std::sync::Arc;
use tracing::{debug, warn};

/// Maximum number of history records kept, newest first.
pub const HISTORY_CAP: usize = 10;

pub const THEME_KEY: &str = "symptom_guide.theme";
pub const CONSENT_KEY: &str = "symptom_guide.consent";
pub const HISTORY_KEY: &str = "symptom_guide.history";

pub struct LocalState {
    store: Arc<dyn KeyValueStore>,
    theme: Theme,
    consent_accepted: bool,
    history: Vec<HistoryRecord>,
}

impl LocalState {
    /// Reads the persisted state. Unreadable values fall back to defaults rather
    /// than failing startup.
    pub fn load(store: Arc<dyn KeyValueStore>) -> PortResult<Self> {
        let theme = match store.get(THEME_KEY)? {
            Some(raw) => raw.parse::<Theme>().unwrap_or_else(|e| {
                warn!("Ignoring stored theme: {}", e);
                Theme::default()
            }),
            None => Theme::default(),
        };

        let consent_accepted = store.get(CONSENT_KEY)?.is_some_and(|v| v.trim() == "true");

        let history = match store.get(HISTORY_KEY)? {
            Some(raw) => match serde_json::from_str::<Vec<HistoryRecord>>(&raw) {
                Ok(mut records) => {
                    records.truncate(HISTORY_CAP);
                    records
                }
                Err(e) => {
                    warn!("Stored history is unreadable and will be ignored: {}", e);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        debug!(
            theme = %theme,
            consent_accepted,
            history_len = history.len(),
            "Local state loaded."
        );

        Ok(Self {
            store,
            theme,
            consent_accepted,
            history,
        })
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn consent_accepted(&self) -> bool {
        self.consent_accepted
    }

    /// History records, newest first.
    pub fn history(&self) -> &[HistoryRecord] {
        &self.history
    }

    pub fn set_theme(&mut self, theme: Theme) -> PortResult<()> {
        self.store.set(THEME_KEY, &theme.to_string())?;
        self.theme = theme;
        Ok(())
    }

    pub fn toggle_theme(&mut self) -> PortResult<Theme> {
        let next = self.theme.toggled();
        self.set_theme(next)?;
        Ok(next)
    }

    pub fn set_consent(&mut self, accepted: bool) -> PortResult<()> {
        if accepted {
            self.store.set(CONSENT_KEY, "true")?;
        } else {
            self.store.remove(CONSENT_KEY)?;
        }
        self.consent_accepted = accepted;
        Ok(())
    }

    /// Prepends a record and evicts the oldest beyond `HISTORY_CAP`.
    pub fn append_history(&mut self, record: HistoryRecord) -> PortResult<()> {
        let mut next = Vec::with_capacity(HISTORY_CAP);
        next.push(record);
        next.extend(self.history.iter().take(HISTORY_CAP - 1).cloned());

        let serialized =
            serde_json::to_string(&next).map_err(|e| PortError::Unexpected(e.to_string()))?;
        self.store.set(HISTORY_KEY, &serialized)?;
        self.history = next;
        Ok(())
    }

    /// Empties the history and removes its persisted representation.
    pub fn clear_history(&mut self) -> PortResult<()> {
        self.store.remove(HISTORY_KEY)?;
        self.history.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::{knee_guidance, knee_intake};
    use crate::domain::SymptomIntake;
    use crate::testing::MemoryStore;

    fn record(n: usize) -> HistoryRecord {
        let mut intake = knee_intake();
        intake.description = format!("symptom #{}", n);
        HistoryRecord::capture(intake, knee_guidance())
    }

    fn fresh() -> (Arc<MemoryStore>, LocalState) {
        let store = Arc::new(MemoryStore::default());
        let state = LocalState::load(store.clone()).unwrap();
        (store, state)
    }

    fn descriptions(state: &LocalState) -> Vec<String> {
        state
            .history()
            .iter()
            .map(|r| r.intake.description.clone())
            .collect()
    }

    #[test]
    fn defaults_when_store_is_empty() {
        let (_, state) = fresh();
        assert_eq!(state.theme(), Theme::Light);
        assert!(!state.consent_accepted());
        assert!(state.history().is_empty());
    }

    #[test]
    fn history_is_capped_newest_first() {
        let (_, mut state) = fresh();
        for n in 1..=10 {
            state.append_history(record(n)).unwrap();
        }
        assert_eq!(state.history().len(), HISTORY_CAP);
        let oldest = state.history()[9].intake.description.clone();
        assert_eq!(oldest, "symptom #1");

        state.append_history(record(11)).unwrap();
        let names = descriptions(&state);
        assert_eq!(names.len(), HISTORY_CAP);
        assert_eq!(names[0], "symptom #11");
        assert_eq!(names[9], "symptom #2");
        assert!(!names.contains(&oldest));
    }

    #[test]
    fn history_survives_reload() {
        let (store, mut state) = fresh();
        state.append_history(record(1)).unwrap();
        state.append_history(record(2)).unwrap();

        let reloaded = LocalState::load(store).unwrap();
        assert_eq!(reloaded.history(), state.history());
    }

    #[test]
    fn clear_history_removes_persisted_value() {
        let (store, mut state) = fresh();
        state.append_history(record(1)).unwrap();
        assert!(store.raw(HISTORY_KEY).is_some());

        state.clear_history().unwrap();
        assert!(state.history().is_empty());
        assert!(store.raw(HISTORY_KEY).is_none());
    }

    #[test]
    fn corrupt_history_loads_as_empty() {
        let store = Arc::new(MemoryStore::default());
        store.set(HISTORY_KEY, "{not json").unwrap();
        store.set(THEME_KEY, "sepia").unwrap();

        let state = LocalState::load(store).unwrap();
        assert!(state.history().is_empty());
        assert_eq!(state.theme(), Theme::Light);
    }

    #[test]
    fn theme_and_consent_write_through() {
        let (store, mut state) = fresh();
        assert_eq!(state.toggle_theme().unwrap(), Theme::Dark);
        state.set_consent(true).unwrap();
        assert_eq!(store.raw(THEME_KEY).as_deref(), Some("dark"));
        assert_eq!(store.raw(CONSENT_KEY).as_deref(), Some("true"));

        let reloaded = LocalState::load(store.clone()).unwrap();
        assert_eq!(reloaded.theme(), Theme::Dark);
        assert!(reloaded.consent_accepted());

        state.set_consent(false).unwrap();
        assert!(store.raw(CONSENT_KEY).is_none());
    }

    #[test]
    fn record_keeps_intake_snapshot() {
        let (_, mut state) = fresh();
        let intake: SymptomIntake = knee_intake();
        state
            .append_history(HistoryRecord::capture(intake.clone(), knee_guidance()))
            .unwrap();
        assert_eq!(state.history()[0].intake, intake);
    }
}
