//! Typed events emitted by the store.
//!
//! The surrounding application subscribes to these instead of listening for
//! ad-hoc browser events or storage side-channels; in particular the
//! code-generation chat picks up work via `TicketActivated`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
#[ts(export)]
pub enum WizardEvent {
    /// One step slice was merged with a partial update.
    StepUpdated { step: u8 },
    /// The active step changed via advance, retreat, or jump.
    Navigated { from: u8, to: u8 },
    /// Full-state replace (restoring a saved project).
    StateReplaced,
    /// Session reset; durable storage was cleared.
    SessionCleared,
    /// The server accepted a save and assigned a project id.
    ProjectLinked { project_id: String },
    /// The transient busy flag flipped; UIs disable inputs while it is set.
    ProcessingChanged { processing: bool },
    /// The whole flow finished.
    FlowCompleted,
    /// A derived ticket was handed off to the code-generation chat.
    TicketActivated { key: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_serialize_with_type_tag() {
        let json = serde_json::to_value(WizardEvent::TicketActivated {
            key: "FITT-3".to_string(),
        })
        .unwrap();
        assert_eq!(json["type"], "ticketActivated");
        assert_eq!(json["key"], "FITT-3");

        let json = serde_json::to_value(WizardEvent::Navigated { from: 1, to: 2 }).unwrap();
        assert_eq!(json["type"], "navigated");
        assert_eq!(json["from"], 1);
    }
}
