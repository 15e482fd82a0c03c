//! appdraft — wizard state core for an AI-assisted app generator.
//!
//! Seven sequential design steps (concept, mood board, branding, screens,
//! mockups, integrations, packaging) collect the data an app generator needs.
//! This crate owns the state of that flow: the versioned schema, migration of
//! persisted state across releases, an observable store with best-effort
//! persistence, step-gated navigation, and the deterministic derivation of a
//! work-ticket backlog once the flow finishes.
//!
//! The surrounding UI and the external AI/image/storage services are
//! collaborators, not parts of this crate: they call mutators with results
//! and subscribe to [`events::WizardEvent`] values.

pub mod config;
pub mod events;
pub mod flow;
pub mod logging;
pub mod migrate;
pub mod schema;
pub mod store;
pub mod tickets;
