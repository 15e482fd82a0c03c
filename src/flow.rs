//! Step completion predicates.
//!
//! Pure functions over `WizardState`, evaluated on demand and never cached.
//! The navigation engine in [`crate::store`] uses them to gate forward
//! movement; the UI uses them to disable the "next" affordance. A failed
//! predicate is not an error, just a closed gate.

use crate::schema::{EntryMode, StepId, WizardState};

/// Minimum screens required before mockup generation makes sense.
pub const MIN_SCREENS: usize = 3;

/// Whether the given step's completion requirements are met.
pub fn step_complete(state: &WizardState, step: StepId) -> bool {
    match step {
        StepId::Concept => concept_complete(state),
        StepId::Moodboard => moodboard_complete(state),
        StepId::Branding => branding_complete(state),
        StepId::Screens => screens_complete(state),
        StepId::Mockups => mockups_complete(state),
        StepId::Integrations => true, // integrations are optional
        StepId::Packaging => packaging_complete(state),
    }
}

fn concept_complete(state: &WizardState) -> bool {
    !state.concept.app_name.trim().is_empty() && !state.concept.description.trim().is_empty()
}

/// Manual branding entry bypasses the mood-board requirement.
fn moodboard_complete(state: &WizardState) -> bool {
    !state.moodboard.reference_images.is_empty()
        || state.branding.entry_mode == EntryMode::Manual
}

fn branding_complete(state: &WizardState) -> bool {
    state.branding.logo.is_some()
}

fn screens_complete(state: &WizardState) -> bool {
    state.screens.screens.len() >= MIN_SCREENS
        && state
            .screens
            .initial_screen_id
            .as_deref()
            .is_some_and(|id| !id.is_empty())
}

/// Counts selected variations against the step-4 screen count. Deliberately
/// count-based, not id-matched, to preserve the shipped behavior: a stale
/// selected variation for a deleted screen still counts toward the total.
fn mockups_complete(state: &WizardState) -> bool {
    state.mockups.selected_count() >= state.screens.screens.len()
}

fn packaging_complete(state: &WizardState) -> bool {
    !state.packaging.project_name.trim().is_empty()
}
