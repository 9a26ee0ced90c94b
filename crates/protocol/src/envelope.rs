use crate::{ErrorPayload, IntentDescriptor, CLI_SCHEMA_VERSION};
use serde::Serialize;

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CommandStatus {
    Ok,
    Warn,
    Error,
}

/// Wire-format result of a command. Built once through [`ok`], [`warn`] or
/// [`err`] and written out as-is.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub schema_version: &'static str,
    pub command: String,
    pub status: CommandStatus,
    pub intent: IntentDescriptor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorPayload>,
}

impl<T> Envelope<T> {
    pub fn is_error(&self) -> bool {
        matches!(self.status, CommandStatus::Error)
    }
}

pub fn ok<T>(command: impl Into<String>, intent: &IntentDescriptor, data: T) -> Envelope<T> {
    Envelope {
        schema_version: CLI_SCHEMA_VERSION,
        command: command.into(),
        status: CommandStatus::Ok,
        intent: *intent,
        data: Some(data),
        warnings: None,
        error: None,
    }
}

/// `warnings` must be non-empty; a warn envelope without warnings is an `ok`.
pub fn warn<T>(
    command: impl Into<String>,
    intent: &IntentDescriptor,
    warnings: Vec<String>,
    data: Option<T>,
) -> Envelope<T> {
    debug_assert!(!warnings.is_empty(), "warn envelope requires warnings");
    Envelope {
        schema_version: CLI_SCHEMA_VERSION,
        command: command.into(),
        status: CommandStatus::Warn,
        intent: *intent,
        data,
        warnings: Some(warnings),
        error: None,
    }
}

pub fn err<T>(
    command: impl Into<String>,
    intent: &IntentDescriptor,
    error: ErrorPayload,
) -> Envelope<T> {
    Envelope {
        schema_version: CLI_SCHEMA_VERSION,
        command: command.into(),
        status: CommandStatus::Error,
        intent: *intent,
        data: None,
        warnings: None,
        error: Some(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorCode, IntentId};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    #[test]
    fn ok_envelope_carries_data_only() {
        let envelope = ok(
            "version",
            IntentId::ShowVersion.descriptor(),
            json!({ "name": "hpl", "version": "0.1.0" }),
        );
        let value = serde_json::to_value(&envelope).expect("json");
        assert_eq!(
            value,
            json!({
                "schemaVersion": "0.1",
                "command": "version",
                "status": "ok",
                "intent": {
                    "intent": "show_version",
                    "intentVersion": "1",
                    "scope": ["cli"],
                    "sideEffects": [],
                    "reversible": true
                },
                "data": { "name": "hpl", "version": "0.1.0" }
            })
        );
    }

    #[test]
    fn warn_envelope_may_omit_data() {
        let envelope: Envelope<Value> = warn(
            "notes sync",
            IntentId::SyncLabNotes.descriptor(),
            vec!["b.md: boom".to_string()],
            None,
        );
        let value = serde_json::to_value(&envelope).expect("json");
        assert_eq!(value["status"], "warn");
        assert_eq!(value["warnings"], json!(["b.md: boom"]));
        assert!(value.get("data").is_none());
        assert!(value.get("error").is_none());
    }

    #[test]
    fn error_envelope_carries_error_only() {
        let envelope: Envelope<Value> = err(
            "notes get",
            IntentId::RenderLabNote.descriptor(),
            ErrorPayload::new(ErrorCode::NotFound, "No lab note found for slug: x"),
        );
        assert!(envelope.is_error());
        let value = serde_json::to_value(&envelope).expect("json");
        assert_eq!(value["status"], "error");
        assert_eq!(value["error"]["code"], "E_NOT_FOUND");
        assert!(value.get("data").is_none());
        assert!(value.get("warnings").is_none());
        assert_eq!(value["schemaVersion"], crate::CLI_SCHEMA_VERSION);
    }
}
