//! Deterministic derivation of the work-ticket backlog from finalized wizard
//! state.
//!
//! `generate_tickets` is pure: the same state always yields the same backlog.
//! Keys (`{PREFIX}-{n}`) and `order_index` are assigned strictly in emission
//! order; downstream board views sort by `order_index` by default, so the
//! emission order is a contract, not an implementation detail. Missing
//! optional upstream data (no data models, no integrations) just produces
//! fewer tickets.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::schema::{ScreenKind, WizardState};

/// Fallback project-key prefix when the project name has no usable
/// characters.
pub const FALLBACK_PREFIX: &str = "APP";

/// Maximum prefix length.
pub const PREFIX_MAX_LEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum TicketType {
    Epic,
    Story,
    Task,
    Bug,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum TicketPriority {
    Critical,
    High,
    Medium,
    Low,
}

/// Lifecycle status; freshly generated tickets all start at `Todo`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum TicketStatus {
    #[default]
    Todo,
    InProgress,
    Testing,
    Done,
}

/// One derived backlog work item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PlanTicket {
    /// Stable key, `{PREFIX}-{n}` with `n` strictly increasing per run.
    pub key: String,
    pub title: String,
    pub description: String,
    pub ticket_type: TicketType,
    pub priority: TicketPriority,
    pub status: TicketStatus,
    /// Generation order, starting at 0; default board sort.
    pub order_index: u32,
    pub acceptance_criteria: Vec<String>,
    /// Keys of tickets that must land first.
    pub depends_on: Vec<String>,
    /// Originating step-4 screen, when the ticket implements one.
    pub screen_id: Option<String>,
    /// Originating data model, when the ticket implements one.
    pub data_model_id: Option<String>,
    /// Whether the ticket can run in parallel with its siblings.
    pub parallelizable: bool,
}

/// Derive the short project-key prefix: upper-cased alphanumerics of the
/// project name, at most [`PREFIX_MAX_LEN`] chars, falling back to
/// [`FALLBACK_PREFIX`].
pub fn project_key_prefix(project_name: &str) -> String {
    let prefix: String = project_name
        .to_uppercase()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(PREFIX_MAX_LEN)
        .collect();
    if prefix.is_empty() {
        FALLBACK_PREFIX.to_string()
    } else {
        prefix
    }
}

struct TicketBuilder {
    prefix: String,
    next_number: u32,
    next_order: u32,
    tickets: Vec<PlanTicket>,
}

impl TicketBuilder {
    fn new(prefix: String) -> Self {
        Self {
            prefix,
            next_number: 1,
            next_order: 0,
            tickets: Vec::new(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn push(
        &mut self,
        title: String,
        description: String,
        ticket_type: TicketType,
        priority: TicketPriority,
        acceptance_criteria: Vec<String>,
        depends_on: Vec<String>,
        screen_id: Option<String>,
        data_model_id: Option<String>,
        parallelizable: bool,
    ) -> String {
        let key = format!("{}-{}", self.prefix, self.next_number);
        self.next_number += 1;
        let order_index = self.next_order;
        self.next_order += 1;

        self.tickets.push(PlanTicket {
            key: key.clone(),
            title,
            description,
            ticket_type,
            priority,
            status: TicketStatus::Todo,
            order_index,
            acceptance_criteria,
            depends_on,
            screen_id,
            data_model_id,
            parallelizable,
        });
        key
    }
}

/// Generate the ordered backlog for a finalized wizard state.
pub fn generate_tickets(state: &WizardState) -> Vec<PlanTicket> {
    let mut builder = TicketBuilder::new(project_key_prefix(&state.packaging.project_name));

    // 1. Setup epic, always first.
    let mut setup_criteria = vec![
        "Project scaffold builds and runs on the target platform".to_string(),
        "Environment variables and secrets are documented".to_string(),
        "CI pipeline runs on every push".to_string(),
    ];
    if let Some(logo) = &state.branding.logo {
        setup_criteria.push(format!("App icon generated from logo asset {}", logo.url));
    }
    if let Some(splash) = &state.branding.splash_url {
        setup_criteria.push(format!("Splash screen configured from asset {splash}"));
    }
    let setup_key = builder.push(
        "Project setup and asset bootstrap".to_string(),
        format!(
            "Bootstrap the {} project: repository, toolchain, and generated brand assets.",
            display_name(state)
        ),
        TicketType::Epic,
        TicketPriority::Critical,
        setup_criteria,
        Vec::new(),
        None,
        None,
        false,
    );

    // 2. Design system story.
    let design_key = builder.push(
        "Implement design system".to_string(),
        "Tokens for palette, typography, and spacing shared by every screen.".to_string(),
        TicketType::Story,
        TicketPriority::High,
        vec![
            "Color tokens match the selected brand palette".to_string(),
            "Typography scale matches the selected fonts".to_string(),
            "Reusable component primitives exist for buttons, cards, and inputs".to_string(),
        ],
        vec![setup_key],
        None,
        None,
        false,
    );

    // 3. One task per selected generated screen. Screens are independent of
    // one another, so each is flagged parallelizable.
    let mut screen_keys = Vec::new();
    for generated in state.mockups.generated.iter().filter(|g| g.selected) {
        let screen = state.screens.screen(&generated.screen_id);
        let (name, kind) = screen.map_or_else(
            || (format!("Screen {}", generated.screen_id), ScreenKind::Custom),
            |s| (s.name.clone(), s.kind),
        );
        let priority = match kind {
            ScreenKind::Home | ScreenKind::Auth => TicketPriority::High,
            _ => TicketPriority::Medium,
        };
        let key = builder.push(
            format!("Build {name} screen"),
            format!(
                "Implement the {name} screen from the selected mockup {}.",
                generated.image_url
            ),
            TicketType::Task,
            priority,
            vec![
                "Layout matches the selected mockup variation".to_string(),
                "Screen renders with design-system components only".to_string(),
            ],
            vec![design_key.clone()],
            Some(generated.screen_id.clone()),
            None,
            true,
        );
        screen_keys.push(key);
    }

    // 4. Navigation story, once all screens exist.
    if !state.screens.screens.is_empty() {
        builder.push(
            "Wire app navigation".to_string(),
            "Connect every screen through the configured navigation structure.".to_string(),
            TicketType::Story,
            TicketPriority::High,
            vec![
                "Every screen is reachable through the navigation structure".to_string(),
                "The designated initial screen is shown on launch".to_string(),
            ],
            screen_keys,
            None,
            None,
            false,
        );
    }

    // 5. Data model tasks.
    for model in &state.integrations.data_models {
        builder.push(
            format!("Implement {} data model", model.name),
            format!(
                "Schema, persistence, and CRUD access for {} ({} fields).",
                model.name,
                model.fields.len()
            ),
            TicketType::Task,
            TicketPriority::Medium,
            vec![
                "Model fields match the wizard definition".to_string(),
                "CRUD operations are covered by tests".to_string(),
            ],
            Vec::new(),
            None,
            Some(model.id.clone()),
            true,
        );
    }

    // 6. Integration tasks.
    for integration in state.integrations.enabled() {
        let mut description = format!("Wire up the {} integration end to end.", integration.id);
        if let Some(note) = integration.note.as_deref().map(str::trim) {
            if !note.is_empty() {
                description.push_str(&format!(" Note from the wizard: {note}"));
            }
        }
        builder.push(
            format!("Integrate {}", integration.id),
            description,
            TicketType::Task,
            TicketPriority::Medium,
            vec![format!(
                "{} credentials are read from configuration, not source",
                integration.id
            )],
            Vec::new(),
            None,
            None,
            false,
        );
    }

    // 7. Optional testing story.
    if state.packaging.include_test_suite {
        builder.push(
            "Add automated test suite".to_string(),
            "Smoke and regression coverage across generated screens.".to_string(),
            TicketType::Story,
            TicketPriority::Low,
            vec![
                "Each screen has at least one render test".to_string(),
                "Test suite runs in CI".to_string(),
            ],
            Vec::new(),
            None,
            None,
            false,
        );
    }

    builder.tickets
}

fn display_name(state: &WizardState) -> String {
    let name = state.packaging.project_name.trim();
    if name.is_empty() {
        let app = state.concept.app_name.trim();
        if app.is_empty() {
            "new app".to_string()
        } else {
            app.to_string()
        }
    } else {
        name.to_string()
    }
}
