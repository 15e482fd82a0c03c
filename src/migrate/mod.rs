//! Schema migration for persisted wizard state.
//!
//! `migrate` accepts arbitrary JSON (any prior schema version, hand-edited
//! payloads, corrupt fragments) and always returns a usable `WizardState`.
//! It never errors: a slice or field that cannot be decoded falls back to its
//! schema default, since a failure here would brick the wizard for a
//! returning user.
//!
//! Versioned transforms live in a dispatch table keyed on the persisted
//! `schemaVersion` (missing means 0). Each entry is a pure function over the
//! raw JSON and is applied in order; a final canonicalization pass clamps
//! indices, dedupes completion, coerces the transient busy flag, and
//! re-applies URL normalization so current-version data is a fixed point.

pub mod urls;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::schema::{WizardState, SCHEMA_VERSION, STEP_COUNT};

/// Integration ids that no longer exist in the catalog. Selections referring
/// to them are pruned during migration.
pub const DEPRECATED_INTEGRATIONS: &[&str] = &["convex", "parse", "appcenter"];

/// One entry in the migration dispatch table: applies when the persisted
/// version is `<= from`, producing version `from + 1`.
struct Migration {
    from: u32,
    apply: fn(&mut Map<String, Value>),
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        from: 0,
        apply: backfill_missing_slices,
    },
    Migration {
        from: 1,
        apply: proxy_external_urls,
    },
    Migration {
        from: 2,
        apply: relocate_moved_fields,
    },
    Migration {
        from: 3,
        apply: prune_deprecated_integrations,
    },
];

/// Transform persisted JSON of any prior schema version into a current
/// `WizardState`. Pure and idempotent: `migrate(migrate(x)) == migrate(x)`.
pub fn migrate(raw: Value) -> WizardState {
    let mut map = match raw {
        Value::Object(map) => map,
        _ => return WizardState::default(),
    };

    let version = map
        .get("schemaVersion")
        .and_then(Value::as_u64)
        .map(|v| v as u32)
        .unwrap_or(0);

    for migration in MIGRATIONS {
        if version <= migration.from {
            (migration.apply)(&mut map);
        }
    }

    let mut state = decode_lenient(map);
    canonicalize(&mut state);
    state
}

/// v0 -> v1: inject empty defaults for any missing step slice so later
/// transforms can assume the seven slices exist.
fn backfill_missing_slices(map: &mut Map<String, Value>) {
    for key in ["step1", "step2", "step3", "step4", "step5", "step6", "step7"] {
        let present = matches!(map.get(key), Some(Value::Object(_)));
        if !present {
            map.insert(key.to_string(), Value::Object(Map::new()));
        }
    }
}

/// v1 -> v2: route externally-hosted image URLs through the image proxy.
fn proxy_external_urls(map: &mut Map<String, Value>) {
    for key in ["step2", "step3", "step4", "step5"] {
        if let Some(slice) = map.get_mut(key) {
            urls::rewrite_raw_urls(slice);
        }
    }
}

/// v2 -> v3: move fields whose owning step changed. The destination wins if
/// it already holds a non-empty value, so stale data never clobbers newer
/// edits made after the release that moved the field.
fn relocate_moved_fields(map: &mut Map<String, Value>) {
    // targetPlatform moved from step 6 to step 1.
    let moved = map
        .get_mut("step6")
        .and_then(Value::as_object_mut)
        .and_then(|s| s.remove("targetPlatform"));
    if let Some(value @ Value::String(_)) = moved {
        if let Some(step1) = map.get_mut("step1").and_then(Value::as_object_mut) {
            let dest_empty = step1
                .get("targetPlatform")
                .and_then(Value::as_str)
                .map_or(true, str::is_empty);
            if dest_empty && value.as_str().is_some_and(|s| !s.is_empty()) {
                step1.insert("targetPlatform".to_string(), value);
            }
        }
    }

    // Integration selections briefly lived on step 5 before the dedicated
    // integrations step existed.
    let moved = map
        .get_mut("step5")
        .and_then(Value::as_object_mut)
        .and_then(|s| s.remove("integrations"));
    if let Some(value @ Value::Array(_)) = moved {
        if let Some(step6) = map.get_mut("step6").and_then(Value::as_object_mut) {
            let dest_empty = step6
                .get("integrations")
                .and_then(Value::as_array)
                .map_or(true, Vec::is_empty);
            if dest_empty && value.as_array().is_some_and(|a| !a.is_empty()) {
                step6.insert("integrations".to_string(), value);
            }
        }
    }
}

/// v3 -> v4: drop selections referencing integrations removed from the
/// catalog.
fn prune_deprecated_integrations(map: &mut Map<String, Value>) {
    let Some(list) = map
        .get_mut("step6")
        .and_then(Value::as_object_mut)
        .and_then(|s| s.get_mut("integrations"))
        .and_then(Value::as_array_mut)
    else {
        return;
    };
    list.retain(|entry| {
        entry
            .get("id")
            .and_then(Value::as_str)
            .map_or(true, |id| !DEPRECATED_INTEGRATIONS.contains(&id))
    });
}

/// Decode one field leniently: missing or undecodable values become the
/// schema default instead of failing the whole load.
fn field_or_default<T: DeserializeOwned + Default>(map: &mut Map<String, Value>, key: &str) -> T {
    map.remove(key)
        .map(|v| serde_json::from_value(v).unwrap_or_default())
        .unwrap_or_default()
}

fn decode_lenient(mut map: Map<String, Value>) -> WizardState {
    WizardState {
        schema_version: SCHEMA_VERSION,
        project_id: field_or_default(&mut map, "projectId"),
        session_id: field_or_default(&mut map, "sessionId"),
        concept: field_or_default(&mut map, "step1"),
        moodboard: field_or_default(&mut map, "step2"),
        branding: field_or_default(&mut map, "step3"),
        screens: field_or_default(&mut map, "step4"),
        mockups: field_or_default(&mut map, "step5"),
        integrations: field_or_default(&mut map, "step6"),
        packaging: field_or_default(&mut map, "step7"),
        current_step: map
            .remove("currentStep")
            .and_then(|v| v.as_u64())
            .map(|v| v as u8)
            .unwrap_or(1),
        completed_steps: map
            .remove("completedSteps")
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default(),
        is_complete: map
            .remove("isComplete")
            .and_then(|v| v.as_bool())
            .unwrap_or(false),
        // Coerced to false in canonicalize regardless of persisted value.
        is_processing: false,
    }
}

fn canonicalize(state: &mut WizardState) {
    state.schema_version = SCHEMA_VERSION;
    state.current_step = state.current_step.clamp(1, STEP_COUNT);
    state
        .completed_steps
        .retain(|s| (1..=STEP_COUNT).contains(s));
    state.completed_steps.sort_unstable();
    state.completed_steps.dedup();
    state.is_processing = false;
    urls::normalize_state(state);
}
