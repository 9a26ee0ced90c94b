//! Markdown-to-API sync for Lab Notes.
//!
//! Files come from a local directory or from a cached checkout of a content
//! repository ([`resolve_content_repo`]). Each file is read into a
//! [`NotePayload`], upserted through a [`NoteUpserter`], and the per-file
//! outcomes are reduced into a [`SyncReport`].

mod content_repo;
mod engine;
mod error;
mod note;
mod report;
mod scanner;

pub use content_repo::{
    default_cache_dir, normalize_repo_url, resolve_content_repo, safe_repo_key,
    ResolveContentRepo, ResolvedContentRepo, DEFAULT_CONTENT_REF,
};
pub use engine::{run_sync, NoteUpserter, RemoteNotes, SyncEvent, SyncOptions, SyncOutcome};
pub use error::{Result, SyncError};
pub use note::{parse_front_matter, read_note, slug_from_file_name, NotePayload};
pub use report::{
    build_sync_report, build_sync_summary, BuildSyncReportArgs, RawStatus, RawSyncResult,
    SyncReport, SyncResult, SyncStatus, SyncSummary,
};
pub use scanner::{list_markdown_files, select_files};
