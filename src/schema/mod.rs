//! Versioned wizard state schema.
//!
//! `WizardState` is the single aggregate the rest of the crate reads and
//! writes. Every field carries a serde default so that partially-persisted
//! state from older releases decodes without errors; the persisted JSON
//! layout (camelCase keys, `step1`..`step7` slice names) is the contract
//! shared with the web UI and must not change without a schema bump.

mod steps;
pub mod update;

pub use steps::*;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Current schema version. Bump whenever a persisted field is added, moved
/// between steps, or removed, and register a matching migration step in
/// [`crate::migrate`].
pub const SCHEMA_VERSION: u32 = 4;

/// Number of wizard steps.
pub const STEP_COUNT: u8 = 7;

/// Identifies one of the seven wizard steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum StepId {
    Concept = 1,
    Moodboard = 2,
    Branding = 3,
    Screens = 4,
    Mockups = 5,
    Integrations = 6,
    Packaging = 7,
}

impl StepId {
    pub const ALL: [StepId; STEP_COUNT as usize] = [
        StepId::Concept,
        StepId::Moodboard,
        StepId::Branding,
        StepId::Screens,
        StepId::Mockups,
        StepId::Integrations,
        StepId::Packaging,
    ];

    /// Convert a 1-based step index into a `StepId`.
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            1 => Some(StepId::Concept),
            2 => Some(StepId::Moodboard),
            3 => Some(StepId::Branding),
            4 => Some(StepId::Screens),
            5 => Some(StepId::Mockups),
            6 => Some(StepId::Integrations),
            7 => Some(StepId::Packaging),
            _ => None,
        }
    }

    /// The 1-based index persisted in `currentStep` / `completedSteps`.
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn prev(self) -> Option<Self> {
        Self::from_index(self.index().wrapping_sub(1))
    }
}

/// Root aggregate for one design-wizard session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct WizardState {
    /// Explicit schema version of this state object. Persisted so migration
    /// dispatches on it instead of sniffing field presence.
    pub schema_version: u32,

    /// Server-assigned project id; `None` until the first successful save.
    pub project_id: Option<String>,
    /// Client-generated session id (UUID v4), assigned on first open.
    pub session_id: Option<String>,

    #[serde(rename = "step1")]
    pub concept: ConceptData,
    #[serde(rename = "step2")]
    pub moodboard: MoodboardData,
    #[serde(rename = "step3")]
    pub branding: BrandingData,
    #[serde(rename = "step4")]
    pub screens: ScreensData,
    #[serde(rename = "step5")]
    pub mockups: MockupsData,
    #[serde(rename = "step6")]
    pub integrations: IntegrationsData,
    #[serde(rename = "step7")]
    pub packaging: PackagingData,

    /// Active step, always within 1..=7.
    pub current_step: u8,
    /// Steps the user has passed through at least once. Ordered, no
    /// duplicates, and only ever grows.
    pub completed_steps: Vec<u8>,

    pub is_complete: bool,
    /// Transient busy flag. Never trusted from persisted state: a crash while
    /// `true` would otherwise lock the UI forever, so every load coerces it
    /// back to `false`.
    pub is_processing: bool,
}

impl Default for WizardState {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            project_id: None,
            session_id: None,
            concept: ConceptData::default(),
            moodboard: MoodboardData::default(),
            branding: BrandingData::default(),
            screens: ScreensData::default(),
            mockups: MockupsData::default(),
            integrations: IntegrationsData::default(),
            packaging: PackagingData::default(),
            current_step: 1,
            completed_steps: Vec::new(),
            is_complete: false,
            is_processing: false,
        }
    }
}

impl WizardState {
    /// Record a step as completed. Completion is monotonic: entries are never
    /// removed, and re-recording an already-completed step is a no-op.
    pub fn record_completed(&mut self, step: StepId) {
        if !self.completed_steps.contains(&step.index()) {
            self.completed_steps.push(step.index());
        }
    }

    pub fn is_step_completed(&self, step: StepId) -> bool {
        self.completed_steps.contains(&step.index())
    }

    /// The active step as a typed id. Falls back to the first step if the
    /// stored index is somehow out of range (migration clamps it on load).
    pub fn current(&self) -> StepId {
        StepId::from_index(self.current_step).unwrap_or(StepId::Concept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_id_round_trip() {
        for step in StepId::ALL {
            assert_eq!(StepId::from_index(step.index()), Some(step));
        }
        assert_eq!(StepId::from_index(0), None);
        assert_eq!(StepId::from_index(8), None);
    }

    #[test]
    fn test_step_id_ordering() {
        assert_eq!(StepId::Concept.next(), Some(StepId::Moodboard));
        assert_eq!(StepId::Packaging.next(), None);
        assert_eq!(StepId::Concept.prev(), None);
        assert_eq!(StepId::Packaging.prev(), Some(StepId::Integrations));
    }

    #[test]
    fn test_default_state_shape() {
        let state = WizardState::default();
        assert_eq!(state.schema_version, SCHEMA_VERSION);
        assert_eq!(state.current_step, 1);
        assert!(state.completed_steps.is_empty());
        assert!(!state.is_processing);
        assert!(!state.is_complete);
    }

    #[test]
    fn test_record_completed_is_monotonic() {
        let mut state = WizardState::default();
        state.record_completed(StepId::Concept);
        state.record_completed(StepId::Concept);
        state.record_completed(StepId::Moodboard);
        assert_eq!(state.completed_steps, vec![1, 2]);
    }

    #[test]
    fn test_persisted_layout_uses_step_keys() {
        let state = WizardState::default();
        let json = serde_json::to_value(&state).unwrap();
        for key in [
            "step1", "step2", "step3", "step4", "step5", "step6", "step7",
        ] {
            assert!(json.get(key).is_some(), "missing persisted key {key}");
        }
        assert!(json.get("currentStep").is_some());
        assert!(json.get("completedSteps").is_some());
        assert!(json.get("isProcessing").is_some());
        assert!(json.get("schemaVersion").is_some());
    }
}
