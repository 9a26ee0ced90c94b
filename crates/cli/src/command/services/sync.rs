use crate::command::{
    classify_api_error, classify_sync_error, Classified, CommandContext, CommandOutput,
};
use crate::config::resolve_content_repo_arg;
use crate::SyncArgs;
use hpl_protocol::{ErrorCode, ExitCode, IntentId};
use hpl_sync::{
    resolve_content_repo, run_sync, RemoteNotes, ResolveContentRepo, SyncEvent, SyncOptions,
    SyncOutcome, SyncReport, SyncStatus,
};
use serde::Serialize;
use serde_json::json;
use std::path::{Path, PathBuf};

const COMMAND: &str = "notes sync";
const INTENT: IntentId = IntentId::SyncLabNotes;
const DEFAULT_NOTES_DIR: &str = "./src/labnotes/en";

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum Source {
    Dir {
        dir: String,
    },
    Repo {
        repo: String,
        #[serde(rename = "ref")]
        git_ref: String,
        subdir: String,
        dir: String,
    },
}

#[derive(Debug, Serialize)]
struct Noop<'a> {
    ok: bool,
    action: &'static str,
    message: &'static str,
    matched: usize,
    source: &'a Source,
}

#[derive(Debug, Serialize)]
struct ReportWithSource<'a> {
    #[serde(flatten)]
    report: &'a SyncReport,
    source: &'a Source,
}

fn say(line: &str) {
    if let Err(err) = crate::print_stdout(line) {
        log::warn!("Failed to write progress: {err}");
    }
}

fn fail(classified: Classified) -> CommandOutput {
    CommandOutput::error(COMMAND, INTENT, classified)
}

async fn resolve_source(args: &SyncArgs, ctx: &CommandContext) -> Result<(PathBuf, Source), Classified> {
    let repo = resolve_content_repo_arg(args.content_repo.as_deref(), &|key: &str| ctx.env(key));

    match (&args.dir, repo) {
        (Some(dir), Some(repo)) => Err(Classified::new(
            ErrorCode::Validation,
            "Use only one content source: either --dir or --content-repo (or HPL_CONTENT_REPO), not both.",
        )
        .with_details(json!({ "dir": dir.display().to_string(), "contentRepo": repo }))),
        (_, Some(repo)) => {
            let resolved = resolve_content_repo(ResolveContentRepo {
                repo: repo.clone(),
                git_ref: Some(args.content_ref.clone()),
                cache_dir: args.cache_dir.clone(),
                quiet_stdout: ctx.json,
            })
            .await
            .map_err(|err| {
                let classified = classify_sync_error(&err);
                Classified::new(classified.payload.code, "Failed to resolve content source.")
                    .with_exit(classified.exit)
                    .with_details(json!({
                        "error": err.to_string(),
                        "repo": repo,
                        "ref": args.content_ref,
                    }))
            })?;

            let root = resolved.dir.join(&args.content_subdir);
            let source = Source::Repo {
                repo,
                git_ref: resolved.git_ref,
                subdir: args.content_subdir.display().to_string(),
                dir: root.display().to_string(),
            };
            Ok((root, source))
        }
        (dir, None) => {
            let root = dir
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_NOTES_DIR));
            let source = Source::Dir {
                dir: root.display().to_string(),
            };
            Ok((root, source))
        }
    }
}

fn print_header(count: usize, root: &Path, source: &Source, base_url: &str, args: &SyncArgs) {
    say(&format!("HPL syncing {count} note(s) from {}", root.display()));
    if let Source::Repo {
        repo,
        git_ref,
        subdir,
        ..
    } = source
    {
        say(&format!("Content Repo: {repo} @ {git_ref} ({subdir})"));
    }
    say(&format!("API: {base_url}"));
    say(&format!("Locale: {}", args.locale));
    say(if args.dry_run {
        "Mode: DRY RUN (no writes)"
    } else {
        "Mode: LIVE (writing)"
    });
}

fn closing_line(report: &SyncReport) -> String {
    let summary = report.summary;
    if report.dry_run {
        format!(
            "Done. {} note(s) would be synced (dry-run). Failures: {}",
            summary.dry_run, summary.failed
        )
    } else {
        format!(
            "Done. {} note(s) synced successfully. Failures: {}",
            summary.synced, summary.failed
        )
    }
}

fn failure_warnings(report: &SyncReport) -> Vec<String> {
    report
        .results
        .iter()
        .filter(|r| r.status == SyncStatus::Failed)
        .map(|r| format!("{}: {}", r.file, r.error.as_deref().unwrap_or("failed")))
        .collect()
}

pub async fn run(args: SyncArgs, ctx: &CommandContext) -> CommandOutput {
    let (root, source) = match resolve_source(&args, ctx).await {
        Ok(resolved) => resolved,
        Err(classified) => return fail(classified),
    };

    if !root.is_dir() {
        return fail(
            Classified::new(
                ErrorCode::NotFound,
                format!("Notes directory not found: {}", root.display()),
            )
            .with_details(json!({
                "hint": "In repo mode, check that the repo contains the content subdirectory.",
                "source": source,
            })),
        );
    }

    let config = ctx.config(args.token.as_deref());
    let client = match ctx.client(&config) {
        Ok(client) => client,
        Err(err) => return fail(classify_api_error(&err)),
    };
    let upserter = RemoteNotes::new(client, config.token.clone());
    let options = SyncOptions {
        locale: args.locale.clone(),
        only: args.only.clone(),
        limit: args.limit,
        dry_run: args.dry_run,
        base_url: Some(config.base_url.clone()),
    };

    let human = !ctx.json;
    let mut on_event = |event: SyncEvent<'_>| {
        if !human {
            return;
        }
        match event {
            SyncEvent::Planned { files } => {
                print_header(files.len(), &root, &source, &config.base_url, &args)
            }
            SyncEvent::DryRun { file, note } => {
                let keys: Vec<&str> = note.attributes.keys().map(String::as_str).collect();
                say(&format!(
                    "\n---\n{}\n{}\nfrontmatter keys: {}",
                    note.slug,
                    file.display(),
                    keys.join(", ")
                ));
            }
            SyncEvent::Synced { slug, action, .. } => {
                let action = action.map(|a| a.as_str()).unwrap_or("ok");
                say(&format!("ok {slug} ({action})"));
            }
            // The error itself reaches stderr once, as a warning line.
            SyncEvent::Failed { file, .. } => say(&format!("FAILED {}", file.display())),
        }
    };

    let outcome = match run_sync(&root, &options, &upserter, &mut on_event).await {
        Ok(outcome) => outcome,
        Err(err) => return fail(classify_sync_error(&err)),
    };

    match outcome {
        SyncOutcome::NoMatch => {
            let data = Noop {
                ok: true,
                action: "noop",
                message: "No matching notes found.",
                matched: 0,
                source: &source,
            };
            CommandOutput::from_result(
                COMMAND,
                INTENT,
                CommandOutput::ok(COMMAND, INTENT, &data, vec![data.message.to_string()]),
            )
        }
        SyncOutcome::Completed(report) => {
            let text = vec![String::new(), closing_line(&report)];
            let data = ReportWithSource {
                report: &report,
                source: &source,
            };
            if report.ok {
                return CommandOutput::from_result(
                    COMMAND,
                    INTENT,
                    CommandOutput::ok(COMMAND, INTENT, &data, text),
                );
            }
            match serde_json::to_value(&data) {
                Ok(value) => CommandOutput::warn(
                    COMMAND,
                    INTENT,
                    failure_warnings(&report),
                    value,
                    ExitCode::Unknown,
                    text,
                ),
                Err(err) => fail(Classified::new(ErrorCode::Unknown, err.to_string())),
            }
        }
    }
}
