use serde::Serialize;

pub const INTENT_VERSION: &str = "1";

/// Machine-legible description of what a command does, independent of its
/// help text. Agents can read `side_effects`/`reversible` without running
/// the command.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IntentDescriptor {
    /// Stable snake_case identifier.
    pub intent: &'static str,
    pub intent_version: &'static str,
    pub scope: &'static [&'static str],
    /// Empty for read-only intents.
    pub side_effects: &'static [&'static str],
    pub reversible: bool,
}

impl IntentDescriptor {
    pub fn is_read_only(&self) -> bool {
        self.side_effects.is_empty()
    }
}

/// Registry keys. Additive only: an id never changes meaning once published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntentId {
    ShowVersion,
    ShowCapabilities,
    CheckHealth,
    RenderLabNote,
    CreateLabNote,
    UpdateLabNote,
    SyncLabNotes,
}

const SHOW_VERSION: IntentDescriptor = IntentDescriptor {
    intent: "show_version",
    intent_version: INTENT_VERSION,
    scope: &["cli"],
    side_effects: &[],
    reversible: true,
};

const SHOW_CAPABILITIES: IntentDescriptor = IntentDescriptor {
    intent: "show_capabilities",
    intent_version: INTENT_VERSION,
    scope: &["cli"],
    side_effects: &[],
    reversible: true,
};

const CHECK_HEALTH: IntentDescriptor = IntentDescriptor {
    intent: "check_health",
    intent_version: INTENT_VERSION,
    scope: &["remote_api"],
    side_effects: &[],
    reversible: true,
};

const RENDER_LAB_NOTE: IntentDescriptor = IntentDescriptor {
    intent: "render_lab_note",
    intent_version: INTENT_VERSION,
    scope: &["lab_notes", "remote_api"],
    side_effects: &[],
    reversible: true,
};

const CREATE_LAB_NOTE: IntentDescriptor = IntentDescriptor {
    intent: "create_lab_note",
    intent_version: INTENT_VERSION,
    scope: &["lab_notes", "remote_api"],
    side_effects: &["write_remote"],
    reversible: false,
};

const UPDATE_LAB_NOTE: IntentDescriptor = IntentDescriptor {
    intent: "update_lab_note",
    intent_version: INTENT_VERSION,
    scope: &["lab_notes", "remote_api"],
    side_effects: &["write_remote"],
    reversible: false,
};

const SYNC_LAB_NOTES: IntentDescriptor = IntentDescriptor {
    intent: "sync_lab_notes",
    intent_version: INTENT_VERSION,
    scope: &["lab_notes", "remote_api", "local_fs"],
    side_effects: &["write_remote"],
    reversible: false,
};

impl IntentId {
    pub const ALL: [IntentId; 7] = [
        IntentId::ShowVersion,
        IntentId::ShowCapabilities,
        IntentId::CheckHealth,
        IntentId::RenderLabNote,
        IntentId::CreateLabNote,
        IntentId::UpdateLabNote,
        IntentId::SyncLabNotes,
    ];

    pub const fn descriptor(self) -> &'static IntentDescriptor {
        match self {
            IntentId::ShowVersion => &SHOW_VERSION,
            IntentId::ShowCapabilities => &SHOW_CAPABILITIES,
            IntentId::CheckHealth => &CHECK_HEALTH,
            IntentId::RenderLabNote => &RENDER_LAB_NOTE,
            IntentId::CreateLabNote => &CREATE_LAB_NOTE,
            IntentId::UpdateLabNote => &UPDATE_LAB_NOTE,
            IntentId::SyncLabNotes => &SYNC_LAB_NOTES,
        }
    }

    pub const fn as_str(self) -> &'static str {
        self.descriptor().intent
    }
}

/// Every alpha-tier intent in registry order. Each call starts a fresh pass.
pub fn list_alpha_intents() -> impl Iterator<Item = &'static IntentDescriptor> + Clone {
    IntentId::ALL.into_iter().map(IntentId::descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique_and_snake_case() {
        let mut seen = HashSet::new();
        for id in IntentId::ALL {
            let name = id.as_str();
            assert!(seen.insert(name), "duplicate intent id {name}");
            assert!(name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c == '_'));
            assert_eq!(id.descriptor().intent_version, "1");
        }
    }

    #[test]
    fn write_intents_are_irreversible() {
        for intent in list_alpha_intents() {
            if intent.is_read_only() {
                assert!(intent.reversible, "{}", intent.intent);
            } else {
                assert!(!intent.reversible, "{}", intent.intent);
                assert!(intent.side_effects.contains(&"write_remote"));
            }
        }
    }

    #[test]
    fn listing_is_restartable() {
        let first: Vec<_> = list_alpha_intents().map(|i| i.intent).collect();
        let second: Vec<_> = list_alpha_intents().map(|i| i.intent).collect();
        assert_eq!(first, second);
        assert_eq!(first.first(), Some(&"show_version"));
    }

    #[test]
    fn descriptor_serializes_camel_case() {
        let value = serde_json::to_value(IntentId::CreateLabNote.descriptor()).expect("json");
        assert_eq!(
            value,
            serde_json::json!({
                "intent": "create_lab_note",
                "intentVersion": "1",
                "scope": ["lab_notes", "remote_api"],
                "sideEffects": ["write_remote"],
                "reversible": false
            })
        );
    }
}
