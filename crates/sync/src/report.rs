//! Reduces per-file sync outcomes into a reconciled report.
//!
//! The summary counts are checked against the result list before a report
//! is returned; a mismatch is a bug in this module and panics.

use hpl_client::UpsertAction;
use serde::{Deserialize, Serialize};

/// Status as recorded while syncing. `fail` is the legacy spelling of
/// `failed`; `dry-run` marks a note that was read but not written.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum RawStatus {
    #[serde(rename = "ok")]
    Ok,
    #[serde(rename = "fail")]
    Fail,
    #[serde(rename = "failed")]
    Failed,
    #[serde(rename = "dry-run")]
    DryRun,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RawSyncResult {
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub status: RawStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<UpsertAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RawSyncResult {
    pub fn ok(file: impl Into<String>, slug: impl Into<String>, action: Option<UpsertAction>) -> Self {
        Self {
            file: file.into(),
            slug: Some(slug.into()),
            status: RawStatus::Ok,
            action,
            error: None,
        }
    }

    pub fn dry_run(file: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            slug: Some(slug.into()),
            status: RawStatus::DryRun,
            action: None,
            error: None,
        }
    }

    pub fn failed(file: impl Into<String>, slug: Option<String>, error: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            slug,
            status: RawStatus::Failed,
            action: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Ok,
    Failed,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SyncResult {
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub status: SyncStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<UpsertAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// True only when remote state was actually changed.
    pub written: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SyncSummary {
    pub synced: usize,
    pub dry_run: usize,
    pub failed: usize,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub ok: bool,
    pub summary: SyncSummary,
    pub results: Vec<SyncResult>,
    /// Effective dry-run: requested, or reported by any result.
    pub dry_run: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct BuildSyncReportArgs {
    pub results: Vec<RawSyncResult>,
    pub dry_run: bool,
    pub locale: Option<String>,
    pub base_url: Option<String>,
}

/// Failed results are always `failed`; every other result is `dry_run` in
/// dry-run mode and `synced` otherwise.
///
/// # Panics
///
/// If the counts do not add up to the number of results, or if anything was
/// counted as synced in dry-run mode.
pub fn build_sync_summary(results: &[SyncResult], dry_run: bool) -> SyncSummary {
    let total = results.len();
    let failed = results
        .iter()
        .filter(|r| r.status == SyncStatus::Failed)
        .count();
    let passed = total - failed;
    let (synced, dry_run_count) = if dry_run { (0, passed) } else { (passed, 0) };

    let summary = SyncSummary {
        synced,
        dry_run: dry_run_count,
        failed,
        total,
    };

    assert_eq!(
        summary.synced + summary.dry_run + summary.failed,
        summary.total,
        "sync summary does not add up: {summary:?}"
    );
    assert!(
        !dry_run || summary.synced == 0,
        "dry-run summary counted synced notes: {summary:?}"
    );
    summary
}

pub fn build_sync_report(args: BuildSyncReportArgs) -> SyncReport {
    let effective_dry_run =
        args.dry_run || args.results.iter().any(|r| r.status == RawStatus::DryRun);

    let results: Vec<SyncResult> = args
        .results
        .into_iter()
        .map(|raw| {
            let status = match raw.status {
                RawStatus::Fail | RawStatus::Failed => SyncStatus::Failed,
                RawStatus::Ok | RawStatus::DryRun => SyncStatus::Ok,
            };
            SyncResult {
                file: raw.file,
                slug: raw.slug,
                status,
                action: raw.action,
                error: raw.error,
                written: status == SyncStatus::Ok && !effective_dry_run,
            }
        })
        .collect();

    let summary = build_sync_summary(&results, effective_dry_run);
    SyncReport {
        ok: summary.failed == 0,
        summary,
        results,
        dry_run: effective_dry_run,
        locale: args.locale,
        base_url: args.base_url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> Vec<RawSyncResult> {
        serde_json::from_value(value).expect("raw results")
    }

    fn summary(synced: usize, dry_run: usize, failed: usize, total: usize) -> SyncSummary {
        SyncSummary {
            synced,
            dry_run,
            failed,
            total,
        }
    }

    #[test]
    fn live_run_counts_everything_as_synced() {
        let report = build_sync_report(BuildSyncReportArgs {
            dry_run: false,
            results: raw(json!([
                { "file": "a.md", "slug": "a", "status": "ok", "action": "updated" },
                { "file": "b.md", "slug": "b", "status": "ok", "action": "created" }
            ])),
            ..BuildSyncReportArgs::default()
        });
        assert!(report.ok);
        assert!(!report.dry_run);
        assert_eq!(report.summary, summary(2, 0, 0, 2));
        assert!(report.results.iter().all(|r| r.written));
        assert_eq!(report.results[1].action, Some(UpsertAction::Created));
    }

    #[test]
    fn dry_run_writes_nothing() {
        let report = build_sync_report(BuildSyncReportArgs {
            dry_run: true,
            results: raw(json!([
                { "file": "a.md", "status": "dry-run" },
                { "file": "b.md", "status": "dry-run" }
            ])),
            ..BuildSyncReportArgs::default()
        });
        assert!(report.ok);
        assert!(report.dry_run);
        assert_eq!(report.summary, summary(0, 2, 0, 2));
        assert!(report.results.iter().all(|r| !r.written));
    }

    #[test]
    fn legacy_fail_is_normalized() {
        let report = build_sync_report(BuildSyncReportArgs {
            dry_run: false,
            results: raw(json!([
                { "file": "a.md", "status": "ok" },
                { "file": "b.md", "status": "fail", "error": "boom" }
            ])),
            ..BuildSyncReportArgs::default()
        });
        assert!(!report.ok);
        assert_eq!(report.summary, summary(1, 0, 1, 2));
        assert_eq!(report.results[1].status, SyncStatus::Failed);
        assert_eq!(report.results[1].error.as_deref(), Some("boom"));
        assert!(!report.results[1].written);
        assert!(report.results[0].written);
    }

    #[test]
    fn one_dry_run_result_makes_the_whole_report_dry() {
        let report = build_sync_report(BuildSyncReportArgs {
            dry_run: false,
            results: raw(json!([
                { "file": "a.md", "status": "ok" },
                { "file": "b.md", "status": "dry-run" }
            ])),
            ..BuildSyncReportArgs::default()
        });
        assert!(report.dry_run);
        assert_eq!(report.summary, summary(0, 2, 0, 2));
        assert!(report.results.iter().all(|r| !r.written));
    }

    #[test]
    fn report_serializes_camel_case() {
        let report = build_sync_report(BuildSyncReportArgs {
            dry_run: true,
            results: vec![RawSyncResult::dry_run("a.md", "a")],
            locale: Some("en".to_string()),
            base_url: Some("http://localhost:8001".to_string()),
        });
        assert_eq!(
            serde_json::to_value(&report).expect("json"),
            json!({
                "ok": true,
                "summary": { "synced": 0, "dryRun": 1, "failed": 0, "total": 1 },
                "results": [{ "file": "a.md", "slug": "a", "status": "ok", "written": false }],
                "dryRun": true,
                "locale": "en",
                "baseUrl": "http://localhost:8001"
            })
        );
    }

    #[test]
    fn empty_input_is_ok() {
        let report = build_sync_report(BuildSyncReportArgs::default());
        assert!(report.ok);
        assert_eq!(report.summary, SyncSummary::default());
    }

    fn any_status() -> impl Strategy<Value = RawStatus> {
        prop_oneof![
            Just(RawStatus::Ok),
            Just(RawStatus::Fail),
            Just(RawStatus::Failed),
            Just(RawStatus::DryRun),
        ]
    }

    proptest! {
        #[test]
        fn summary_invariants_hold(
            statuses in proptest::collection::vec(any_status(), 0..40),
            dry_run in any::<bool>(),
        ) {
            let results: Vec<RawSyncResult> = statuses
                .iter()
                .enumerate()
                .map(|(i, status)| RawSyncResult {
                    file: format!("{i}.md"),
                    slug: None,
                    status: *status,
                    action: None,
                    error: None,
                })
                .collect();
            let report = build_sync_report(BuildSyncReportArgs {
                results,
                dry_run,
                ..BuildSyncReportArgs::default()
            });

            let s = report.summary;
            prop_assert_eq!(s.synced + s.dry_run + s.failed, s.total);
            prop_assert_eq!(s.total, statuses.len());
            prop_assert_eq!(report.ok, s.failed == 0);

            let failed = statuses
                .iter()
                .filter(|s| matches!(s, RawStatus::Fail | RawStatus::Failed))
                .count();
            prop_assert_eq!(s.failed, failed);

            let effective = dry_run || statuses.contains(&RawStatus::DryRun);
            prop_assert_eq!(report.dry_run, effective);
            if effective {
                prop_assert_eq!(s.synced, 0);
            } else {
                prop_assert_eq!(s.dry_run, 0);
                prop_assert_eq!(s.synced, statuses.len() - failed);
            }

            for result in &report.results {
                prop_assert_eq!(
                    result.written,
                    result.status == SyncStatus::Ok && !effective
                );
            }
        }
    }
}
