//! HTTP adapter for the Lab Notes API.
//!
//! Every request goes through [`ApiClient`]. Responses wrapped as
//! `{ "ok": true, "data": ... }` are unwrapped before decoding, failures are
//! mapped onto [`ApiError`] and never carry more than
//! [`MAX_ERROR_BODY_CHARS`] of the response body.

mod api;
mod error;
mod http;
mod types;

pub use api::{ADMIN_NOTES_PATH, HEALTH_PATH, LAB_NOTES_PATH, UPSERT_PATH};
pub use error::{ApiError, Result, MAX_ERROR_BODY_CHARS};
pub use http::{unwrap_envelope, ApiClient};
pub use types::{
    AuthorKind, HealthStatus, LabNoteAuthor, LabNoteDetail, LabNotePreview, LabNoteStatus,
    LabNoteType, LabNoteUpsert, UpsertAction, UpsertResponse,
};
