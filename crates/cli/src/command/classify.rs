use hpl_client::ApiError;
use hpl_protocol::{ErrorCode, ErrorPayload, ExitCode};
use hpl_sync::SyncError;
use serde_json::json;

/// Typed failure ready to be put into an error envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct Classified {
    pub payload: ErrorPayload,
    pub exit: ExitCode,
}

impl Classified {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            payload: ErrorPayload::new(code, message),
            exit: code.default_exit(),
        }
    }

    pub fn with_exit(mut self, exit: ExitCode) -> Self {
        self.exit = exit;
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.payload = self.payload.with_details(details);
        self
    }
}

pub fn classify_api_error(err: &ApiError) -> Classified {
    match err {
        ApiError::Http { status, body, .. } => {
            let details = (!body.is_empty()).then(|| json!({ "status": status, "body": body }));
            let classified = match *status {
                401 => Classified::new(ErrorCode::Auth, "Authentication failed. Check your token."),
                403 => Classified::new(ErrorCode::Auth, "Token is not allowed to do this.")
                    .with_exit(ExitCode::Forbidden),
                404 => Classified::new(ErrorCode::NotFound, err.to_string()),
                500..=599 => Classified::new(
                    ErrorCode::Server,
                    format!("API request failed ({status})"),
                ),
                _ => Classified::new(ErrorCode::Http, format!("API request failed ({status})")),
            };
            match details {
                Some(details) => classified.with_details(details),
                None => classified,
            }
        }
        ApiError::Network { .. } => Classified::new(ErrorCode::Network, err.to_string()),
        ApiError::Contract { detail, .. } => Classified::new(ErrorCode::Contract, err.to_string())
            .with_details(json!({ "detail": detail })),
        ApiError::Validation(message) => Classified::new(ErrorCode::Validation, message.clone()),
        ApiError::InvalidBaseUrl(_) => Classified::new(ErrorCode::Validation, err.to_string()),
    }
}

pub fn classify_sync_error(err: &SyncError) -> Classified {
    match err {
        SyncError::Note { .. } => Classified::new(ErrorCode::Validation, err.to_string()),
        SyncError::Io(_)
        | SyncError::Git { .. }
        | SyncError::ContentSource(_)
        | SyncError::Walk { .. } => Classified::new(ErrorCode::Io, err.to_string()),
    }
}

pub fn classify_anyhow(err: &anyhow::Error) -> Classified {
    if let Some(api) = err.downcast_ref::<ApiError>() {
        return classify_api_error(api);
    }
    if let Some(sync) = err.downcast_ref::<SyncError>() {
        return classify_sync_error(sync);
    }
    if err.downcast_ref::<std::io::Error>().is_some() {
        return Classified::new(ErrorCode::Io, format!("{err:#}"));
    }
    Classified::new(ErrorCode::Unknown, format!("{err:#}"))
}
