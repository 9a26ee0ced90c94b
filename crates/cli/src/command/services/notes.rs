use crate::command::{classify_api_error, Classified, CommandContext, CommandOutput};
use crate::render::{format_tags, render_table, safe_line, Column};
use crate::{ContentArgs, CreateArgs, GetArgs, ListArgs, NoteFieldArgs, UpdateArgs};
use hpl_client::{ApiError, LabNoteDetail, LabNotePreview, LabNoteUpsert, UpsertAction};
use hpl_protocol::{ErrorCode, IntentId};
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Serialize)]
struct NoteList<'a> {
    count: usize,
    notes: &'a [LabNotePreview],
}

#[derive(Debug, Serialize)]
struct WriteResult {
    slug: String,
    action: &'static str,
    message: String,
}

fn status_of(note: &LabNotePreview) -> String {
    note.status.map(|s| s.as_str()).unwrap_or("-").to_string()
}

fn list_columns() -> [Column<LabNotePreview>; 5] {
    [
        Column {
            header: "slug",
            width: 28,
            value: |n| n.slug.clone(),
        },
        Column {
            header: "title",
            width: 36,
            value: |n| safe_line(&n.title),
        },
        Column {
            header: "status",
            width: 10,
            value: status_of,
        },
        Column {
            header: "dept",
            width: 8,
            value: |n| n.dept.clone().unwrap_or_else(|| "-".to_string()),
        },
        Column {
            header: "tags",
            width: 24,
            value: |n| format_tags(n.tags.as_deref()),
        },
    ]
}

pub async fn list(args: ListArgs, ctx: &CommandContext) -> CommandOutput {
    const COMMAND: &str = "notes list";
    const INTENT: IntentId = IntentId::RenderLabNote;

    let config = ctx.config(None);
    let result = match ctx.client(&config) {
        Ok(client) => client.list_notes().await,
        Err(err) => Err(err),
    };
    let notes = match result {
        Ok(notes) => notes,
        Err(err) => return CommandOutput::error(COMMAND, INTENT, classify_api_error(&err)),
    };

    let shown = match args.limit {
        0 => &notes[..],
        n => &notes[..n.min(notes.len())],
    };
    let mut text = render_table(shown, &list_columns());
    if shown.len() < notes.len() {
        text.push(format!("({} of {} notes shown)", shown.len(), notes.len()));
    }

    let data = NoteList {
        count: notes.len(),
        notes: &notes,
    };
    CommandOutput::from_result(COMMAND, INTENT, CommandOutput::ok(COMMAND, INTENT, &data, text))
}

fn detail_text(note: &LabNoteDetail, raw: bool) -> Vec<String> {
    let body = note.content_markdown.as_deref().unwrap_or_default().trim_end();
    if raw {
        return vec![body.to_string()];
    }

    let mut text = vec![safe_line(&note.title)];
    if let Some(subtitle) = &note.subtitle {
        text.push(safe_line(subtitle));
    }
    text.push(format!("slug: {}", note.slug));
    if let Some(status) = note.status {
        text.push(format!("status: {}", status.as_str()));
    }
    if let Some(note_type) = note.note_type {
        text.push(format!("type: {}", note_type.as_str()));
    }
    if let Some(dept) = &note.dept {
        text.push(format!("dept: {dept}"));
    }
    if let Some(published) = &note.published {
        text.push(format!("published: {published}"));
    }
    text.push(format!("tags: {}", format_tags(note.tags.as_deref())));
    text.push(String::new());
    text.push(body.to_string());
    text
}

pub async fn get(args: GetArgs, ctx: &CommandContext) -> CommandOutput {
    const COMMAND: &str = "notes get";
    const INTENT: IntentId = IntentId::RenderLabNote;

    let config = ctx.config(None);
    let result = match ctx.client(&config) {
        Ok(client) => client.get_note(&args.slug).await,
        Err(err) => Err(err),
    };
    match result {
        Ok(note) => {
            let text = detail_text(&note, args.raw);
            CommandOutput::from_result(COMMAND, INTENT, CommandOutput::ok(COMMAND, INTENT, &note, text))
        }
        Err(err) => CommandOutput::error(COMMAND, INTENT, not_found_as_slug(&err, &args.slug)),
    }
}

fn not_found_as_slug(err: &ApiError, slug: &str) -> Classified {
    let classified = classify_api_error(err);
    if classified.payload.code == ErrorCode::NotFound {
        return Classified::new(
            ErrorCode::NotFound,
            format!("No lab note found for slug: {slug}"),
        );
    }
    classified
}

/// Shared shape of `notes create` and `notes update`.
struct WriteRequest<'a> {
    command: &'static str,
    intent: IntentId,
    slug: &'a str,
    title: &'a str,
    content: &'a ContentArgs,
    fields: &'a NoteFieldArgs,
    token: Option<&'a str>,
    /// Status and type sent when the caller gives none.
    defaults: Option<(&'static str, &'static str)>,
}

pub async fn create(args: CreateArgs, ctx: &CommandContext) -> CommandOutput {
    write_note(
        WriteRequest {
            command: "notes create",
            intent: IntentId::CreateLabNote,
            slug: &args.slug,
            title: &args.title,
            content: &args.content,
            fields: &args.fields,
            token: args.token.as_deref(),
            defaults: Some(("draft", "labnote")),
        },
        ctx,
    )
    .await
}

pub async fn update(args: UpdateArgs, ctx: &CommandContext) -> CommandOutput {
    write_note(
        WriteRequest {
            command: "notes update",
            intent: IntentId::UpdateLabNote,
            slug: &args.slug,
            title: &args.title,
            content: &args.content,
            fields: &args.fields,
            token: args.token.as_deref(),
            defaults: None,
        },
        ctx,
    )
    .await
}

async fn read_markdown(content: &ContentArgs) -> Result<String, Classified> {
    if let Some(path) = &content.file {
        return match tokio::fs::read_to_string(path).await {
            Ok(markdown) => Ok(markdown),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(Classified::new(
                ErrorCode::NotFound,
                format!("File not found: {}", path.display()),
            )),
            Err(err) => Err(Classified::new(
                ErrorCode::Io,
                format!("Failed to read {}: {err}", path.display()),
            )),
        };
    }
    match &content.markdown {
        Some(markdown) => Ok(markdown.clone()),
        None => Err(Classified::new(
            ErrorCode::Validation,
            "Either --markdown or --file is required",
        )),
    }
}

fn note_attributes(req: &WriteRequest<'_>) -> Map<String, Value> {
    let fields = req.fields;
    let mut attrs = Map::new();
    let mut put = |key: &str, value: Option<Value>| {
        if let Some(value) = value {
            attrs.insert(key.to_string(), value);
        }
    };

    let (default_status, default_type) = match req.defaults {
        Some((status, note_type)) => (Some(status), Some(note_type)),
        None => (None, None),
    };

    put("title", Some(Value::from(req.title)));
    put("subtitle", fields.subtitle.clone().map(Value::from));
    put("summary", fields.summary.clone().map(Value::from));
    put("tags", fields.tags.clone().map(Value::from));
    put("published", fields.published.clone().map(Value::from));
    put(
        "status",
        fields
            .status
            .as_deref()
            .or(default_status)
            .map(Value::from),
    );
    put(
        "type",
        fields
            .note_type
            .as_deref()
            .or(default_type)
            .map(Value::from),
    );
    put("dept", fields.dept.clone().map(Value::from));
    attrs
}

async fn write_note(req: WriteRequest<'_>, ctx: &CommandContext) -> CommandOutput {
    let (command, intent) = (req.command, req.intent);
    let fail = |classified: Classified| CommandOutput::error(command, intent, classified);

    let config = ctx.config(req.token);
    let Some(token) = config.token.as_deref() else {
        return fail(Classified::new(
            ErrorCode::Auth,
            "Authentication required. Set HPL_TOKEN or add a token to ~/.humanpatternlab/hpl.json",
        ));
    };

    let markdown = match read_markdown(req.content).await {
        Ok(markdown) => markdown,
        Err(classified) => return fail(classified),
    };

    let payload = match LabNoteUpsert::from_attributes(
        req.slug,
        Some(&req.fields.locale),
        &note_attributes(&req),
        &markdown,
    ) {
        Ok(payload) => payload,
        Err(err) => return fail(classify_api_error(&err)),
    };

    let client = match ctx.client(&config) {
        Ok(client) => client,
        Err(err) => return fail(classify_api_error(&err)),
    };

    match client.admin_upsert_note(&payload, token).await {
        Ok(response) => {
            let fallback = if req.defaults.is_some() {
                UpsertAction::Created
            } else {
                UpsertAction::Updated
            };
            let action = response.action.unwrap_or(fallback).as_str();
            let message = format!("Lab Note {action}: {}", response.slug);
            let data = WriteResult {
                slug: response.slug,
                action,
                message: message.clone(),
            };
            CommandOutput::from_result(
                command,
                intent,
                CommandOutput::ok(command, intent, &data, vec![message]),
            )
        }
        Err(err) => fail(not_found_as_slug(&err, req.slug)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn fields() -> NoteFieldArgs {
        NoteFieldArgs {
            locale: "en".to_string(),
            subtitle: None,
            summary: Some("short".to_string()),
            tags: Some(vec!["a".to_string(), "b".to_string()]),
            published: None,
            status: None,
            note_type: None,
            dept: None,
        }
    }

    fn content() -> ContentArgs {
        ContentArgs {
            markdown: Some("# body".to_string()),
            file: None,
        }
    }

    #[test]
    fn create_defaults_status_and_type() {
        let (fields, content) = (fields(), content());
        let req = WriteRequest {
            command: "notes create",
            intent: IntentId::CreateLabNote,
            slug: "s",
            title: "T",
            content: &content,
            fields: &fields,
            token: None,
            defaults: Some(("draft", "labnote")),
        };
        assert_eq!(
            Value::Object(note_attributes(&req)),
            json!({
                "title": "T",
                "summary": "short",
                "tags": ["a", "b"],
                "status": "draft",
                "type": "labnote"
            })
        );
    }

    #[test]
    fn update_sends_only_given_fields() {
        let mut fields = fields();
        fields.status = Some("published".to_string());
        let content = content();
        let req = WriteRequest {
            command: "notes update",
            intent: IntentId::UpdateLabNote,
            slug: "s",
            title: "T",
            content: &content,
            fields: &fields,
            token: None,
            defaults: None,
        };
        let attrs = note_attributes(&req);
        assert_eq!(attrs.get("status"), Some(&json!("published")));
        assert!(attrs.get("type").is_none());
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let content = ContentArgs {
            markdown: None,
            file: Some(dir.path().join("missing.md")),
        };
        let err = read_markdown(&content).await.expect_err("missing");
        assert_eq!(err.payload.code, ErrorCode::NotFound);
        assert_eq!(err.exit.code(), 3);
    }
}
