use crate::error::{Result, SyncError};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

fn is_git_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() && entry.file_name() == ".git"
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("mdx"))
        .unwrap_or(false)
}

/// All `.md`/`.mdx` files under `root`, at any depth, sorted by path.
pub fn list_markdown_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !is_git_dir(e))
    {
        let entry = entry.map_err(|err| SyncError::Walk {
            root: root.to_path_buf(),
            message: err.to_string(),
        })?;
        if entry.file_type().is_file() && is_markdown(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort_by(|a, b| a.to_string_lossy().cmp(&b.to_string_lossy()));
    Ok(files)
}

/// Applies `only` (case-insensitive substring of the full path) and then
/// `limit` (first N). A limit of zero means no limit.
pub fn select_files(files: Vec<PathBuf>, only: Option<&str>, limit: Option<usize>) -> Vec<PathBuf> {
    let needle = only
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let filtered = files.into_iter().filter(|path| match &needle {
        Some(needle) => path.to_string_lossy().to_lowercase().contains(needle.as_str()),
        None => true,
    });

    match limit.filter(|n| *n > 0) {
        Some(n) => filtered.take(n).collect(),
        None => filtered.collect(),
    }
}
