//! # hpl protocol
//!
//! The machine-readable contract every `hpl` command honours in `--json`
//! mode: one [`Envelope`] per invocation, stamped with
//! [`CLI_SCHEMA_VERSION`], carrying the command's [`IntentDescriptor`] and
//! either data, warnings, or an [`ErrorPayload`].
//!
//! Identifiers published here (schema version, intent ids, error codes, exit
//! codes) evolve additively only.

use serde::{Deserialize, Serialize};

mod envelope;
mod exit;
mod intents;

pub use envelope::{err, ok, warn, CommandStatus, Envelope};
pub use exit::ExitCode;
pub use intents::{list_alpha_intents, IntentDescriptor, IntentId, INTENT_VERSION};

/// Global structured output schema version.
pub const CLI_SCHEMA_VERSION: &str = "0.1";

/// Stable error codes carried in [`ErrorPayload::code`].
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    #[serde(rename = "E_AUTH")]
    Auth,
    #[serde(rename = "E_NOT_FOUND")]
    NotFound,
    #[serde(rename = "E_VALIDATION")]
    Validation,
    #[serde(rename = "E_CONTRACT")]
    Contract,
    #[serde(rename = "E_HTTP")]
    Http,
    #[serde(rename = "E_SERVER")]
    Server,
    #[serde(rename = "E_NETWORK")]
    Network,
    #[serde(rename = "E_IO")]
    Io,
    #[serde(rename = "E_UNKNOWN")]
    Unknown,
}

impl ErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Auth => "E_AUTH",
            ErrorCode::NotFound => "E_NOT_FOUND",
            ErrorCode::Validation => "E_VALIDATION",
            ErrorCode::Contract => "E_CONTRACT",
            ErrorCode::Http => "E_HTTP",
            ErrorCode::Server => "E_SERVER",
            ErrorCode::Network => "E_NETWORK",
            ErrorCode::Io => "E_IO",
            ErrorCode::Unknown => "E_UNKNOWN",
        }
    }

    /// Exit code used when nothing more specific is known about the failure.
    pub const fn default_exit(self) -> ExitCode {
        match self {
            ErrorCode::Auth => ExitCode::Auth,
            ErrorCode::NotFound => ExitCode::NotFound,
            ErrorCode::Validation => ExitCode::Usage,
            ErrorCode::Contract => ExitCode::Contract,
            ErrorCode::Http | ErrorCode::Network => ExitCode::Network,
            ErrorCode::Server => ExitCode::Server,
            ErrorCode::Io | ErrorCode::Unknown => ExitCode::Unknown,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Standard error payload (machine-parseable).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ErrorPayload {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorPayload {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IntentTier {
    Alpha,
    Full,
}

/// Capability disclosure for agents (`show_capabilities`).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    pub intent_tier: IntentTier,
    pub supported_intents: Vec<String>,
    pub schema_versions: Vec<String>,
}

impl Capabilities {
    pub fn alpha() -> Self {
        Self {
            intent_tier: IntentTier::Alpha,
            supported_intents: list_alpha_intents()
                .map(|intent| intent.intent.to_string())
                .collect(),
            schema_versions: vec![CLI_SCHEMA_VERSION.to_string()],
        }
    }
}

pub fn serialize_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn error_codes_serialize_to_stable_identifiers() {
        let payload = ErrorPayload::new(ErrorCode::NotFound, "missing");
        let value = serde_json::to_value(&payload).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({ "code": "E_NOT_FOUND", "message": "missing" })
        );

        for code in [
            ErrorCode::Auth,
            ErrorCode::NotFound,
            ErrorCode::Validation,
            ErrorCode::Contract,
            ErrorCode::Http,
            ErrorCode::Server,
            ErrorCode::Network,
            ErrorCode::Io,
            ErrorCode::Unknown,
        ] {
            let raw = serde_json::to_value(code).expect("serialize");
            assert_eq!(raw, serde_json::Value::String(code.as_str().to_string()));
        }
    }

    #[test]
    fn validation_and_contract_never_share_exit_codes() {
        assert_eq!(ErrorCode::Validation.default_exit(), ExitCode::Usage);
        assert_eq!(ErrorCode::Contract.default_exit(), ExitCode::Contract);
        assert_ne!(
            ErrorCode::Validation.default_exit(),
            ErrorCode::Contract.default_exit()
        );
    }

    #[test]
    fn capabilities_list_every_alpha_intent() {
        let caps = Capabilities::alpha();
        assert_eq!(caps.intent_tier, IntentTier::Alpha);
        assert_eq!(caps.schema_versions, vec!["0.1".to_string()]);
        assert!(caps.supported_intents.contains(&"show_version".to_string()));
        assert!(caps.supported_intents.contains(&"update_lab_note".to_string()));
        assert_eq!(caps.supported_intents.len(), IntentId::ALL.len());

        let value = serde_json::to_value(&caps).expect("serialize");
        assert_eq!(value["intentTier"], "alpha");
        assert!(value["supportedIntents"].is_array());
    }
}
