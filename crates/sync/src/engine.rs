use crate::error::Result;
use crate::note::{read_note, NotePayload};
use crate::report::{build_sync_report, BuildSyncReportArgs, RawSyncResult, SyncReport};
use crate::scanner::{list_markdown_files, select_files};
use async_trait::async_trait;
use hpl_client::{ApiClient, ApiError, LabNoteUpsert, UpsertAction, UpsertResponse};
use std::path::{Path, PathBuf};

/// Where synced notes are written.
#[async_trait]
pub trait NoteUpserter: Send + Sync {
    async fn upsert(&self, payload: &LabNoteUpsert) -> hpl_client::Result<UpsertResponse>;
}

/// Upserts through `POST /lab-notes/upsert`.
pub struct RemoteNotes {
    client: ApiClient,
    token: Option<String>,
}

impl RemoteNotes {
    pub fn new(client: ApiClient, token: Option<String>) -> Self {
        Self { client, token }
    }
}

#[async_trait]
impl NoteUpserter for RemoteNotes {
    async fn upsert(&self, payload: &LabNoteUpsert) -> hpl_client::Result<UpsertResponse> {
        self.client.upsert_note(payload, self.token.as_deref()).await
    }
}

#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub locale: String,
    /// Case-insensitive substring of the file path.
    pub only: Option<String>,
    /// First N files after `only`; zero means all.
    pub limit: Option<usize>,
    pub dry_run: bool,
    /// Recorded in the report only.
    pub base_url: Option<String>,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            locale: "en".to_string(),
            only: None,
            limit: None,
            dry_run: false,
            base_url: None,
        }
    }
}

#[derive(Debug)]
pub enum SyncEvent<'a> {
    Planned { files: &'a [PathBuf] },
    DryRun { file: &'a Path, note: &'a NotePayload },
    Synced { file: &'a Path, slug: &'a str, action: Option<UpsertAction> },
    Failed { file: &'a Path, error: &'a str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Nothing matched the selection. Not an error.
    NoMatch,
    Completed(SyncReport),
}

/// Syncs every selected markdown file under `root`, one at a time, in path
/// order. A failing file is recorded and the run moves on.
pub async fn run_sync(
    root: &Path,
    options: &SyncOptions,
    upserter: &dyn NoteUpserter,
    on_event: &mut (dyn FnMut(SyncEvent<'_>) + Send),
) -> Result<SyncOutcome> {
    let files = select_files(
        list_markdown_files(root)?,
        options.only.as_deref(),
        options.limit,
    );
    if files.is_empty() {
        log::info!("No matching notes under {}", root.display());
        return Ok(SyncOutcome::NoMatch);
    }
    on_event(SyncEvent::Planned { files: &files });

    let mut results = Vec::with_capacity(files.len());
    for file in &files {
        let result = sync_file(file, options, upserter, on_event).await;
        results.push(result);
    }

    Ok(SyncOutcome::Completed(build_sync_report(BuildSyncReportArgs {
        results,
        dry_run: options.dry_run,
        locale: Some(options.locale.clone()),
        base_url: options.base_url.clone(),
    })))
}

async fn sync_file(
    file: &Path,
    options: &SyncOptions,
    upserter: &dyn NoteUpserter,
    on_event: &mut (dyn FnMut(SyncEvent<'_>) + Send),
) -> RawSyncResult {
    let display = file.to_string_lossy().into_owned();

    let note = match read_note(file, &options.locale).await {
        Ok(note) => note,
        Err(err) => return failed(file, display, None, err.to_string(), on_event),
    };

    let payload = match LabNoteUpsert::from_attributes(
        &note.slug,
        Some(&note.locale),
        &note.attributes,
        &note.markdown,
    ) {
        Ok(payload) => payload,
        Err(err) => return failed(file, display, Some(note.slug), err.to_string(), on_event),
    };

    if options.dry_run {
        log::debug!("dry-run: {} ({})", note.slug, display);
        on_event(SyncEvent::DryRun { file, note: &note });
        return RawSyncResult::dry_run(display, note.slug);
    }

    match upserter.upsert(&payload).await {
        Ok(response) => {
            on_event(SyncEvent::Synced {
                file,
                slug: &note.slug,
                action: response.action,
            });
            RawSyncResult::ok(display, note.slug, response.action)
        }
        Err(err) => {
            let message = describe_api_error(&err);
            failed(file, display, Some(note.slug), message, on_event)
        }
    }
}

fn failed(
    file: &Path,
    display: String,
    slug: Option<String>,
    error: String,
    on_event: &mut (dyn FnMut(SyncEvent<'_>) + Send),
) -> RawSyncResult {
    log::debug!("sync failed for {display}: {error}");
    on_event(SyncEvent::Failed {
        file,
        error: &error,
    });
    RawSyncResult::failed(display, slug, error)
}

fn describe_api_error(err: &ApiError) -> String {
    match err {
        ApiError::Http { body, .. } if !body.trim().is_empty() => {
            format!("{err}: {}", body.trim())
        }
        _ => err.to_string(),
    }
}
