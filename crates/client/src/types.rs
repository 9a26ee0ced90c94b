//! Wire types for the Lab Notes API.
//!
//! Incoming types are permissive: unknown keys are kept in `extra` so the API
//! can grow without breaking the CLI. [`LabNoteUpsert`] is the strict
//! outgoing contract.

use crate::error::{ApiError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LabNoteStatus {
    Published,
    Draft,
    Archived,
}

impl LabNoteStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            LabNoteStatus::Published => "published",
            LabNoteStatus::Draft => "draft",
            LabNoteStatus::Archived => "archived",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LabNoteType {
    Labnote,
    Paper,
    Memo,
    Lore,
    Weather,
}

impl LabNoteType {
    pub const fn as_str(self) -> &'static str {
        match self {
            LabNoteType::Labnote => "labnote",
            LabNoteType::Paper => "paper",
            LabNoteType::Memo => "memo",
            LabNoteType::Lore => "lore",
            LabNoteType::Weather => "weather",
        }
    }
}

/// `GET /health`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_path: Option<String>,
}

/// One row of `GET /lab-notes`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LabNotePreview {
    pub id: String,
    pub slug: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<LabNoteStatus>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub note_type: Option<LabNoteType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dept: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow_density: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safer_landing: Option<bool>,
    #[serde(default, rename = "readingTime", skip_serializing_if = "Option::is_none")]
    pub reading_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AuthorKind {
    Human,
    Ai,
    Hybrid,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LabNoteAuthor {
    pub kind: AuthorKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// `GET /lab-notes/:slug`. Markdown is the canonical body for CLI clients.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LabNoteDetail {
    pub id: String,
    pub slug: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<LabNoteStatus>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub note_type: Option<LabNoteType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dept: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<LabNoteAuthor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow_density: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safer_landing: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, rename = "readingTime", skip_serializing_if = "Option::is_none")]
    pub reading_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_markdown: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UpsertAction {
    Created,
    Updated,
    Unchanged,
}

impl UpsertAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            UpsertAction::Created => "created",
            UpsertAction::Updated => "updated",
            UpsertAction::Unchanged => "unchanged",
        }
    }
}

/// Response of both upsert endpoints.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct UpsertResponse {
    #[serde(default)]
    pub ok: bool,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<UpsertAction>,
}

/// Outgoing create-or-update payload, keyed by `slug`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct LabNoteUpsert {
    pub slug: String,
    pub title: String,
    pub content_markdown: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<LabNoteStatus>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub note_type: Option<LabNoteType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dept: Option<String>,
}

/// Front-matter keys the upsert payload understands; everything else in the
/// attribute map is ignored here.
#[derive(Debug, Deserialize, Default)]
struct UpsertAttributes {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    subtitle: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default)]
    published: Option<String>,
    #[serde(default)]
    status: Option<LabNoteStatus>,
    #[serde(default, rename = "type")]
    note_type: Option<LabNoteType>,
    #[serde(default)]
    dept: Option<String>,
}

impl LabNoteUpsert {
    /// Builds a payload from parsed note attributes and validates it.
    pub fn from_attributes(
        slug: &str,
        locale: Option<&str>,
        attributes: &Map<String, Value>,
        markdown: &str,
    ) -> Result<Self> {
        let attrs: UpsertAttributes = serde_json::from_value(Value::Object(attributes.clone()))
            .map_err(|err| ApiError::validation(format!("{slug}: {err}")))?;

        let payload = Self {
            slug: slug.to_string(),
            title: attrs.title.unwrap_or_default(),
            content_markdown: markdown.to_string(),
            locale: locale.map(str::to_string),
            subtitle: attrs.subtitle,
            summary: attrs.summary,
            tags: attrs.tags,
            published: attrs.published,
            status: attrs.status,
            note_type: attrs.note_type,
            dept: attrs.dept,
        };
        payload.validate()?;
        Ok(payload)
    }

    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();
        if self.slug.trim().is_empty() {
            missing.push("slug");
        }
        if self.title.trim().is_empty() {
            missing.push("title");
        }
        if self.content_markdown.trim().is_empty() {
            missing.push("content_markdown");
        }
        if !missing.is_empty() {
            return Err(ApiError::validation(format!(
                "required field(s) empty: {}",
                missing.join(", ")
            )));
        }
        if let Some(tags) = &self.tags {
            if tags.iter().any(|tag| tag.trim().is_empty()) {
                return Err(ApiError::validation("tags must not contain empty values"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn attrs(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("object expected"),
        }
    }

    #[test]
    fn preview_keeps_unknown_fields() {
        let preview: LabNotePreview = serde_json::from_value(json!({
            "id": "1",
            "slug": "hello",
            "title": "Hello",
            "status": "published",
            "type": "memo",
            "readingTime": 3,
            "coherence_score": 0.7
        }))
        .expect("preview");
        assert_eq!(preview.status, Some(LabNoteStatus::Published));
        assert_eq!(preview.note_type, Some(LabNoteType::Memo));
        assert_eq!(preview.reading_time, Some(3.0));
        assert_eq!(preview.extra.get("coherence_score"), Some(&json!(0.7)));

        let back = serde_json::to_value(&preview).expect("json");
        assert_eq!(back["coherence_score"], json!(0.7));
        assert_eq!(back["type"], "memo");
    }

    #[test]
    fn preview_without_required_fields_is_rejected() {
        let missing_title = serde_json::from_value::<LabNotePreview>(json!({
            "id": "1",
            "slug": "hello"
        }));
        assert!(missing_title.is_err());

        let bad_status = serde_json::from_value::<LabNotePreview>(json!({
            "id": "1",
            "slug": "hello",
            "title": "Hello",
            "status": "deleted"
        }));
        assert!(bad_status.is_err());
    }

    #[test]
    fn upsert_uses_content_markdown_and_omits_empty_options() {
        let payload = LabNoteUpsert::from_attributes(
            "hello",
            Some("en"),
            &attrs(json!({ "title": "Hello", "status": "draft", "readingTime": 4 })),
            "# Body",
        )
        .expect("payload");

        assert_eq!(
            serde_json::to_value(&payload).expect("json"),
            json!({
                "slug": "hello",
                "title": "Hello",
                "content_markdown": "# Body",
                "locale": "en",
                "status": "draft"
            })
        );
    }

    #[test]
    fn upsert_validation_rejects_bad_attributes() {
        let err = LabNoteUpsert::from_attributes(
            "hello",
            None,
            &attrs(json!({ "title": "Hello", "status": "deleted" })),
            "body",
        )
        .expect_err("invalid status");
        assert!(matches!(err, ApiError::Validation(_)));

        let err = LabNoteUpsert::from_attributes("hello", None, &attrs(json!({})), "body")
            .expect_err("missing title");
        assert_eq!(
            err,
            ApiError::Validation("required field(s) empty: title".to_string())
        );

        let err = LabNoteUpsert::from_attributes(
            "hello",
            None,
            &attrs(json!({ "title": "Hello" })),
            "   ",
        )
        .expect_err("empty body");
        assert!(err.to_string().contains("content_markdown"));
    }

    #[test]
    fn upsert_rejects_unknown_keys_on_decode() {
        let decoded = serde_json::from_value::<LabNoteUpsert>(json!({
            "slug": "a",
            "title": "A",
            "content_markdown": "x",
            "markdown": "legacy"
        }));
        assert!(decoded.is_err());
    }
}
