use crate::error::{ApiError, Result};
use crate::http::ApiClient;
use crate::types::{HealthStatus, LabNoteDetail, LabNotePreview, LabNoteUpsert, UpsertResponse};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Endpoint paths as URL segments relative to the base URL.
pub const HEALTH_PATH: &[&str] = &["health"];
pub const LAB_NOTES_PATH: &[&str] = &["lab-notes"];
pub const UPSERT_PATH: &[&str] = &["lab-notes", "upsert"];
pub const ADMIN_NOTES_PATH: &[&str] = &["admin", "notes"];

impl ApiClient {
    pub async fn health(&self) -> Result<HealthStatus> {
        let value = self.get_json(HEALTH_PATH).await?;
        decode("health response", value)
    }

    pub async fn list_notes(&self) -> Result<Vec<LabNotePreview>> {
        let value = self.get_json(LAB_NOTES_PATH).await?;
        decode("lab notes list", value)
    }

    pub async fn get_note(&self, slug: &str) -> Result<LabNoteDetail> {
        let path: Vec<&str> = LAB_NOTES_PATH.iter().copied().chain([slug]).collect();
        let value = self.get_json(&path).await?;
        decode("lab note", value)
    }

    /// Create-or-update by slug, the endpoint sync talks to.
    pub async fn upsert_note(
        &self,
        payload: &LabNoteUpsert,
        token: Option<&str>,
    ) -> Result<UpsertResponse> {
        payload.validate()?;
        let value = self.post_json(UPSERT_PATH, payload, token).await?;
        decode("upsert response", value)
    }

    /// Admin create-or-update used by `notes create` / `notes update`.
    /// Requires a token; the server decides between 401 and 403.
    pub async fn admin_upsert_note(
        &self,
        payload: &LabNoteUpsert,
        token: &str,
    ) -> Result<UpsertResponse> {
        payload.validate()?;
        let value = self.post_json(ADMIN_NOTES_PATH, payload, Some(token)).await?;
        decode("admin upsert response", value)
    }
}

fn decode<T: DeserializeOwned>(what: &str, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|err| ApiError::contract(what, err))
}
