use crate::error::{Result, SyncError};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

pub const DEFAULT_CONTENT_REF: &str = "main";

#[derive(Debug, Clone, Default)]
pub struct ResolveContentRepo {
    /// `owner/name`, a clone URL, or a local path.
    pub repo: String,
    /// Branch or tag; defaults to [`DEFAULT_CONTENT_REF`].
    pub git_ref: Option<String>,
    /// Defaults to `~/.hpl/cache/content`.
    pub cache_dir: Option<PathBuf>,
    /// Send all git output to stderr so stdout stays machine-readable.
    pub quiet_stdout: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedContentRepo {
    pub dir: PathBuf,
    pub repo_url: String,
    pub git_ref: String,
}

/// `owner/name` becomes a GitHub HTTPS clone URL; URLs and absolute paths are
/// used as given.
pub fn normalize_repo_url(repo: &str) -> String {
    let raw = repo.trim();
    let passthrough = ["http://", "https://", "git@", "file://"]
        .iter()
        .any(|prefix| raw.starts_with(prefix));
    if passthrough || Path::new(raw).is_absolute() {
        return raw.to_string();
    }
    format!("https://github.com/{raw}.git")
}

/// Filesystem-safe cache folder name for a repo reference.
pub fn safe_repo_key(repo: &str) -> String {
    let mut key = String::with_capacity(repo.len());
    let mut in_run = false;
    for c in repo.trim().chars() {
        if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
            key.push(c.to_ascii_lowercase());
            in_run = false;
        } else if !in_run {
            key.push('_');
            in_run = true;
        }
    }
    key
}

pub fn default_cache_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".hpl").join("cache").join("content"))
}

/// Clones `repo` into the cache on first use, otherwise fetches and
/// fast-forwards the cached checkout to `git_ref`. A diverged cache fails
/// instead of being rewritten.
pub async fn resolve_content_repo(args: ResolveContentRepo) -> Result<ResolvedContentRepo> {
    let repo = args.repo.trim();
    if repo.is_empty() {
        return Err(SyncError::ContentSource("content repo is empty".to_string()));
    }
    let git_ref = args
        .git_ref
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or(DEFAULT_CONTENT_REF)
        .to_string();
    let repo_url = normalize_repo_url(repo);
    let base = match args.cache_dir {
        Some(dir) => dir,
        None => default_cache_dir().ok_or_else(|| {
            SyncError::ContentSource("cannot locate home directory for the cache".to_string())
        })?,
    };
    let dir = base.join(safe_repo_key(repo));

    tokio::fs::create_dir_all(&base).await?;

    if tokio::fs::try_exists(dir.join(".git")).await? {
        log::info!("Updating cached content repo {} @ {git_ref}", dir.display());
        let dir_arg = dir.to_string_lossy().into_owned();
        let quiet = args.quiet_stdout;
        run_git(&["-C", &dir_arg, "fetch", "--all", "--tags", "--prune"], quiet).await?;
        run_git(&["-C", &dir_arg, "checkout", &git_ref], quiet).await?;
        run_git(&["-C", &dir_arg, "pull", "--ff-only"], quiet).await?;
    } else {
        log::info!("Cloning {repo_url} @ {git_ref} into {}", dir.display());
        let dir_arg = dir.to_string_lossy().into_owned();
        run_git(
            &["clone", "--depth", "1", "--branch", &git_ref, &repo_url, &dir_arg],
            args.quiet_stdout,
        )
        .await?;
    }

    Ok(ResolvedContentRepo {
        dir,
        repo_url,
        git_ref,
    })
}

async fn run_git(args: &[&str], quiet_stdout: bool) -> Result<()> {
    log::debug!("git {}", args.join(" "));
    let mut command = Command::new("git");
    command.args(args).stdin(Stdio::null());
    if quiet_stdout {
        command.stdout(std::io::stderr());
    }

    let status = command.status().await?;
    if !status.success() {
        return Err(SyncError::Git {
            args: args.join(" "),
            status: status.to_string(),
        });
    }
    Ok(())
}
