//! Wizard state store: single in-memory holder of [`WizardState`] with
//! subscriber notification and best-effort durable persistence.
//!
//! The store is the only writer of wizard state. UI code calls a step
//! mutator, the store merges the partial into that step's slice, mirrors the
//! whole state to the backend, and notifies subscribers. All of this is
//! synchronous; the core never awaits and provides no sequencing across
//! in-flight external calls (last write wins).
//!
//! Persistence failures are logged and swallowed: a full disk or quota error
//! must never crash the UI, and a corrupt payload on load falls back to the
//! default state rather than blocking a fresh start.

mod backend;

pub use backend::{BackendError, FileBackend, MemoryBackend, StateBackend};

use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::events::WizardEvent;
use crate::flow;
use crate::migrate::{migrate, urls};
use crate::schema::update::{
    BrandingUpdate, ConceptUpdate, IntegrationsUpdate, MockupsUpdate, MoodboardUpdate,
    PackagingUpdate, ScreensUpdate,
};
use crate::schema::{StepId, WizardState};

pub type SubscriptionId = u64;

type Subscriber = Box<dyn Fn(&WizardEvent, &WizardState)>;

pub struct WizardStore {
    state: WizardState,
    backend: Box<dyn StateBackend>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: SubscriptionId,
}

impl WizardStore {
    /// Open a store over the given backend with default configuration.
    pub fn open(backend: impl StateBackend + 'static) -> Self {
        Self::open_with_config(backend, &AppConfig::default())
    }

    /// Open a store over the given backend. Persisted state is migrated to
    /// the current schema; unreadable or corrupt payloads are discarded with
    /// a warning and the session starts from the default state. Brand-new
    /// sessions are seeded with the configured project defaults.
    pub fn open_with_config(backend: impl StateBackend + 'static, config: &AppConfig) -> Self {
        let mut fresh = false;
        let mut state = match backend.read() {
            Ok(Some(payload)) => match serde_json::from_str::<Value>(&payload) {
                Ok(raw) => migrate(raw),
                Err(err) => {
                    warn!("discarding corrupt wizard state: {err}");
                    WizardState::default()
                }
            },
            Ok(None) => {
                fresh = true;
                WizardState::default()
            }
            Err(err) => {
                warn!("failed to read wizard state, starting fresh: {err}");
                WizardState::default()
            }
        };

        if fresh && !config.project.default_platform.is_empty() {
            state.concept.target_platform = config.project.default_platform.clone();
        }

        if state.session_id.is_none() {
            state.session_id = Some(Uuid::new_v4().to_string());
        }

        let store = Self {
            state,
            backend: Box::new(backend),
            subscribers: Vec::new(),
            next_subscription: 0,
        };
        // Write the canonical migrated form back so the next load starts
        // current.
        store.persist();
        store
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    // ─── Subscriptions ───────────────────────────────────────────────────

    pub fn subscribe(
        &mut self,
        subscriber: impl Fn(&WizardEvent, &WizardState) + 'static,
    ) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
    }

    // ─── Step mutators ───────────────────────────────────────────────────
    //
    // Each merges a partial into exactly one slice. Cross-step effects are
    // the caller's responsibility via a second explicit mutator call.

    pub fn update_concept(&mut self, update: ConceptUpdate) {
        update.apply(&mut self.state.concept);
        self.after_step_update(StepId::Concept);
    }

    pub fn update_moodboard(&mut self, update: MoodboardUpdate) {
        update.apply(&mut self.state.moodboard);
        self.after_step_update(StepId::Moodboard);
    }

    pub fn update_branding(&mut self, update: BrandingUpdate) {
        update.apply(&mut self.state.branding);
        self.after_step_update(StepId::Branding);
    }

    pub fn update_screens(&mut self, update: ScreensUpdate) {
        update.apply(&mut self.state.screens);
        self.after_step_update(StepId::Screens);
    }

    pub fn update_mockups(&mut self, update: MockupsUpdate) {
        update.apply(&mut self.state.mockups);
        self.after_step_update(StepId::Mockups);
    }

    pub fn update_integrations(&mut self, update: IntegrationsUpdate) {
        update.apply(&mut self.state.integrations);
        self.after_step_update(StepId::Integrations);
    }

    pub fn update_packaging(&mut self, update: PackagingUpdate) {
        update.apply(&mut self.state.packaging);
        self.after_step_update(StepId::Packaging);
    }

    // ─── Navigation ──────────────────────────────────────────────────────

    /// Whether the current step's gate is open.
    pub fn can_advance(&self) -> bool {
        flow::step_complete(&self.state, self.state.current())
    }

    /// Advance past the current step. Silently refuses (returns `false`)
    /// when the step's completion predicate fails. Step 7 is terminal: its
    /// completion is recorded but the index never moves past it.
    pub fn advance(&mut self) -> bool {
        let current = self.state.current();
        if !flow::step_complete(&self.state, current) {
            debug!(step = current.index(), "advance blocked by incomplete step");
            return false;
        }

        self.state.record_completed(current);
        match current.next() {
            Some(next) => {
                self.state.current_step = next.index();
                self.after_change(WizardEvent::Navigated {
                    from: current.index(),
                    to: next.index(),
                });
                true
            }
            None => {
                self.after_change(WizardEvent::Navigated {
                    from: current.index(),
                    to: current.index(),
                });
                false
            }
        }
    }

    /// Step back one step. Never gated: users must always be able to go back
    /// and fix something invalid. Does not touch `completed_steps`.
    pub fn retreat(&mut self) -> bool {
        let current = self.state.current();
        match current.prev() {
            Some(prev) => {
                self.state.current_step = prev.index();
                self.after_change(WizardEvent::Navigated {
                    from: current.index(),
                    to: prev.index(),
                });
                true
            }
            None => false,
        }
    }

    /// Jump directly to a step, allowed only for already-completed steps or
    /// steps at or before the current one.
    pub fn jump_to(&mut self, step: StepId) -> bool {
        let current = self.state.current();
        if step == current {
            return true;
        }
        if !self.state.is_step_completed(step) && step.index() > current.index() {
            return false;
        }
        self.state.current_step = step.index();
        self.after_change(WizardEvent::Navigated {
            from: current.index(),
            to: step.index(),
        });
        true
    }

    // ─── Session lifecycle ───────────────────────────────────────────────

    /// Replace the whole state with a previously-saved project, passing it
    /// through migration first.
    pub fn restore(&mut self, raw: Value) {
        let mut state = migrate(raw);
        if state.session_id.is_none() {
            state.session_id = self.state.session_id.clone();
        }
        self.state = state;
        self.after_change(WizardEvent::StateReplaced);
    }

    /// Reset to the default state and clear durable storage.
    pub fn reset(&mut self) {
        self.state = WizardState::default();
        self.state.session_id = Some(Uuid::new_v4().to_string());
        if let Err(err) = self.backend.clear() {
            warn!("failed to clear persisted wizard state: {err}");
        }
        self.persist();
        self.notify(&WizardEvent::SessionCleared);
    }

    /// Record the server-assigned project id after a successful save.
    pub fn set_project_id(&mut self, project_id: impl Into<String>) {
        let project_id = project_id.into();
        self.state.project_id = Some(project_id.clone());
        self.after_change(WizardEvent::ProjectLinked { project_id });
    }

    /// Toggle the transient busy flag. Persisted alongside the rest of the
    /// state but always coerced back to `false` on load.
    pub fn set_processing(&mut self, processing: bool) {
        self.state.is_processing = processing;
        self.after_change(WizardEvent::ProcessingChanged { processing });
    }

    /// Finish the flow. Requires the final step's gate to be open; records
    /// step 7 as completed and sets the terminal flag.
    pub fn finish(&mut self) -> bool {
        if !flow::step_complete(&self.state, StepId::Packaging) {
            return false;
        }
        self.state.record_completed(StepId::Packaging);
        self.state.is_complete = true;
        self.after_change(WizardEvent::FlowCompleted);
        true
    }

    /// Hand a derived ticket off to the code-generation chat. Pure signal:
    /// no state change, no persistence.
    pub fn activate_ticket(&mut self, key: impl Into<String>) {
        self.notify(&WizardEvent::TicketActivated { key: key.into() });
    }

    // ─── Internals ───────────────────────────────────────────────────────

    fn after_step_update(&mut self, step: StepId) {
        // Mutators must apply the proxy rewrite as consistently as migration
        // does, so URLs handed in by generation callbacks are normalized at
        // the door.
        urls::normalize_state(&mut self.state);
        self.after_change(WizardEvent::StepUpdated { step: step.index() });
    }

    fn after_change(&mut self, event: WizardEvent) {
        self.persist();
        self.notify(&event);
    }

    fn persist(&self) {
        let payload = match serde_json::to_string_pretty(&self.state) {
            Ok(payload) => payload,
            Err(err) => {
                warn!("failed to serialize wizard state: {err}");
                return;
            }
        };
        if let Err(err) = self.backend.write(&payload) {
            warn!("failed to persist wizard state: {err}");
        }
    }

    fn notify(&self, event: &WizardEvent) {
        for (_, subscriber) in &self.subscribers {
            subscriber(event, &self.state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn complete_concept(store: &mut WizardStore) {
        store.update_concept(ConceptUpdate {
            app_name: Some("FitTracker".to_string()),
            description: Some("Track workouts".to_string()),
            ..ConceptUpdate::default()
        });
    }

    struct FailingBackend;

    impl StateBackend for FailingBackend {
        fn read(&self) -> Result<Option<String>, BackendError> {
            Err(std::io::Error::other("read refused").into())
        }

        fn write(&self, _payload: &str) -> Result<(), BackendError> {
            Err(std::io::Error::other("disk full").into())
        }

        fn clear(&self) -> Result<(), BackendError> {
            Err(std::io::Error::other("clear refused").into())
        }
    }

    struct QuotaBackend;

    impl StateBackend for QuotaBackend {
        fn read(&self) -> Result<Option<String>, BackendError> {
            Ok(None)
        }

        fn write(&self, _payload: &str) -> Result<(), BackendError> {
            Err(BackendError::QuotaExceeded)
        }

        fn clear(&self) -> Result<(), BackendError> {
            Ok(())
        }
    }

    #[test]
    fn test_open_with_empty_backend_yields_default_with_session() {
        let store = WizardStore::open(MemoryBackend::new());
        assert_eq!(store.state().current_step, 1);
        assert!(store.state().session_id.is_some());
    }

    #[test]
    fn test_open_with_corrupt_payload_falls_back_to_default() {
        let store = WizardStore::open(MemoryBackend::with_payload("not json{{{"));
        assert_eq!(store.state().current_step, 1);
        assert!(store.state().completed_steps.is_empty());
    }

    #[test]
    fn test_open_with_failing_backend_does_not_panic() {
        let store = WizardStore::open(FailingBackend);
        assert_eq!(store.state().current_step, 1);
    }

    #[test]
    fn test_mutations_survive_failing_writes() {
        let mut store = WizardStore::open(FailingBackend);
        complete_concept(&mut store);
        assert_eq!(store.state().concept.app_name, "FitTracker");
    }

    #[test]
    fn test_mutations_survive_quota_exhaustion() {
        let mut store = WizardStore::open(QuotaBackend);
        complete_concept(&mut store);
        assert_eq!(store.state().concept.app_name, "FitTracker");
    }

    #[test]
    fn test_open_seeds_default_platform_for_new_sessions() {
        let mut config = AppConfig::default();
        config.project.default_platform = "ios".to_string();

        let store = WizardStore::open_with_config(MemoryBackend::new(), &config);
        assert_eq!(store.state().concept.target_platform, "ios");

        // An existing session keeps whatever the user already chose.
        let payload = serde_json::json!({
            "schemaVersion": 4,
            "step1": { "targetPlatform": "android" }
        });
        let store =
            WizardStore::open_with_config(MemoryBackend::with_payload(payload.to_string()), &config);
        assert_eq!(store.state().concept.target_platform, "android");
    }

    #[test]
    fn test_persisted_is_processing_is_coerced_false() {
        let payload = serde_json::json!({ "isProcessing": true, "currentStep": 2, "completedSteps": [1] });
        let store = WizardStore::open(MemoryBackend::with_payload(payload.to_string()));
        assert!(!store.state().is_processing);
        assert_eq!(store.state().current_step, 2);
    }

    #[test]
    fn test_advance_moves_and_records_completion() {
        let mut store = WizardStore::open(MemoryBackend::new());
        complete_concept(&mut store);

        assert!(store.can_advance());
        assert!(store.advance());
        assert_eq!(store.state().current_step, 2);
        assert_eq!(store.state().completed_steps, vec![1]);
    }

    #[test]
    fn test_gated_advance_is_a_silent_noop() {
        let mut store = WizardStore::open(MemoryBackend::new());
        let before = store.state().clone();

        assert!(!store.advance());
        assert_eq!(store.state(), &before);
    }

    #[test]
    fn test_retreat_is_ungated_and_clamped() {
        let mut store = WizardStore::open(MemoryBackend::new());
        assert!(!store.retreat());
        assert_eq!(store.state().current_step, 1);

        complete_concept(&mut store);
        store.advance();
        assert!(store.retreat());
        assert_eq!(store.state().current_step, 1);
        // Retreat never removes completion.
        assert_eq!(store.state().completed_steps, vec![1]);
    }

    #[test]
    fn test_jump_rejects_steps_ahead_of_progress() {
        let mut store = WizardStore::open(MemoryBackend::new());
        assert!(!store.jump_to(StepId::Screens));
        assert_eq!(store.state().current_step, 1);

        complete_concept(&mut store);
        store.advance();
        // Back to a completed step is fine.
        assert!(store.jump_to(StepId::Concept));
        assert_eq!(store.state().current_step, 1);
        // Step 3 was never completed and is ahead of the cursor: rejected.
        assert!(!store.jump_to(StepId::Branding));
    }

    #[test]
    fn test_jump_to_completed_step_allowed_from_anywhere() {
        let mut store = WizardStore::open(MemoryBackend::new());
        complete_concept(&mut store);
        store.advance();
        store.update_branding(BrandingUpdate {
            entry_mode: Some(EntryMode::Manual),
            ..BrandingUpdate::default()
        });
        store.advance(); // 2 -> 3

        assert!(store.jump_to(StepId::Concept));
        assert_eq!(store.state().current_step, 1);
        // Step 2 is completed, so jumping forward to it is allowed.
        assert!(store.jump_to(StepId::Moodboard));
        assert_eq!(store.state().current_step, 2);
    }

    #[test]
    fn test_completed_steps_grow_monotonically() {
        let mut store = WizardStore::open(MemoryBackend::new());
        complete_concept(&mut store);

        for _ in 0..3 {
            store.advance();
            store.retreat();
        }
        assert_eq!(store.state().completed_steps, vec![1]);
    }

    #[test]
    fn test_mutator_touches_only_its_slice() {
        let mut store = WizardStore::open(MemoryBackend::new());
        store.update_screens(ScreensUpdate {
            screens: Some(vec![ScreenSpec::default()]),
            ..ScreensUpdate::default()
        });
        let before = store.state().clone();

        complete_concept(&mut store);

        let after = store.state();
        assert_ne!(after.concept, before.concept);
        assert_eq!(after.moodboard, before.moodboard);
        assert_eq!(after.branding, before.branding);
        assert_eq!(after.screens, before.screens);
        assert_eq!(after.mockups, before.mockups);
        assert_eq!(after.integrations, before.integrations);
        assert_eq!(after.packaging, before.packaging);
    }

    #[test]
    fn test_mutator_normalizes_external_urls() {
        let mut store = WizardStore::open(MemoryBackend::new());
        store.update_branding(BrandingUpdate {
            logo: Some(Some(LogoSelection {
                id: "l1".to_string(),
                url: "https://cdn.example.com/logo.png".to_string(),
                ..LogoSelection::default()
            })),
            ..BrandingUpdate::default()
        });
        let url = store.state().branding.logo.as_ref().unwrap().url.clone();
        assert!(url.starts_with("/api/image-proxy?url="));
    }

    #[test]
    fn test_subscribers_receive_events() {
        let mut store = WizardStore::open(MemoryBackend::new());
        let events: Rc<RefCell<Vec<WizardEvent>>> = Rc::default();
        let sink = Rc::clone(&events);
        store.subscribe(move |event, _| sink.borrow_mut().push(event.clone()));

        complete_concept(&mut store);
        store.advance();

        let seen = events.borrow();
        assert_eq!(seen[0], WizardEvent::StepUpdated { step: 1 });
        assert_eq!(seen[1], WizardEvent::Navigated { from: 1, to: 2 });
    }

    #[test]
    fn test_set_processing_notifies_and_persists() {
        let mut store = WizardStore::open(MemoryBackend::new());
        let events: Rc<RefCell<Vec<WizardEvent>>> = Rc::default();
        let sink = Rc::clone(&events);
        store.subscribe(move |event, _| sink.borrow_mut().push(event.clone()));

        store.set_processing(true);
        assert!(store.state().is_processing);
        store.set_processing(false);

        assert_eq!(
            *events.borrow(),
            vec![
                WizardEvent::ProcessingChanged { processing: true },
                WizardEvent::ProcessingChanged { processing: false },
            ]
        );
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let mut store = WizardStore::open(MemoryBackend::new());
        let events: Rc<RefCell<Vec<WizardEvent>>> = Rc::default();
        let sink = Rc::clone(&events);
        let id = store.subscribe(move |event, _| sink.borrow_mut().push(event.clone()));
        store.unsubscribe(id);

        complete_concept(&mut store);
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_restore_passes_through_migration() {
        let mut store = WizardStore::open(MemoryBackend::new());
        store.restore(serde_json::json!({
            "step1": { "appName": "Imported", "description": "From server" },
            "step6": { "integrations": [{ "id": "convex", "enabled": true }] },
            "isProcessing": true
        }));

        assert_eq!(store.state().concept.app_name, "Imported");
        assert!(!store.state().is_processing);
        assert!(store.state().integrations.integrations.is_empty());
    }

    #[test]
    fn test_reset_clears_backend_and_state() {
        let backend = MemoryBackend::new();
        let mut store = WizardStore::open(backend);
        complete_concept(&mut store);
        let old_session = store.state().session_id.clone();

        store.reset();
        assert_eq!(store.state().concept, ConceptData::default());
        assert_eq!(store.state().current_step, 1);
        assert_ne!(store.state().session_id, old_session);
    }

    #[test]
    fn test_finish_requires_project_name() {
        let mut store = WizardStore::open(MemoryBackend::new());
        assert!(!store.finish());
        assert!(!store.state().is_complete);

        store.update_packaging(PackagingUpdate {
            project_name: Some("FitTracker".to_string()),
            ..PackagingUpdate::default()
        });
        assert!(store.finish());
        assert!(store.state().is_complete);
        assert!(store.state().completed_steps.contains(&7));
    }

    #[test]
    fn test_activate_ticket_emits_without_state_change() {
        let mut store = WizardStore::open(MemoryBackend::new());
        let events: Rc<RefCell<Vec<WizardEvent>>> = Rc::default();
        let sink = Rc::clone(&events);
        store.subscribe(move |event, _| sink.borrow_mut().push(event.clone()));
        let before = store.state().clone();

        store.activate_ticket("FITT-3");

        assert_eq!(store.state(), &before);
        assert_eq!(
            *events.borrow(),
            vec![WizardEvent::TicketActivated {
                key: "FITT-3".to_string()
            }]
        );
    }

    #[test]
    fn test_state_round_trips_through_backend() {
        let payload;
        {
            let mut store = WizardStore::open(MemoryBackend::new());
            complete_concept(&mut store);
            store.advance();
            payload = serde_json::to_string(store.state()).unwrap();
        }

        let store = WizardStore::open(MemoryBackend::with_payload(payload));
        assert_eq!(store.state().concept.app_name, "FitTracker");
        assert_eq!(store.state().current_step, 2);
        assert_eq!(store.state().completed_steps, vec![1]);
    }
}
