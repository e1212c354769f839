//! Multi-resource collector
//!
//! Runs the counter for every configured kind against one project and folds
//! the results into a [`ProjectReport`]. A project with any failed kind is
//! reported incomplete and excluded from composed sink writes; the run keeps
//! going with the next project.

use crate::gcp::client::GcpClient;
use crate::report::ProjectReport;
use crate::resource::counter;
use crate::resource::kind::ResourceKind;
use std::time::Duration;

/// Count every kind for one project, in declaration order so sink output is
/// deterministic across runs.
pub async fn collect(
    client: &GcpClient,
    project: &str,
    kinds: &[ResourceKind],
    region: Option<&str>,
) -> ProjectReport {
    let mut records = Vec::with_capacity(kinds.len());
    for &kind in kinds {
        records.push(counter::count(client, project, kind, region).await);
    }

    ProjectReport {
        project: project.to_string(),
        records,
    }
}

/// Collect reports for every target project, with a fixed delay between
/// projects to stay clear of provider rate limits. Incomplete projects are
/// logged and kept in the result; sinks that need composed records skip them.
pub async fn collect_all(
    client: &GcpClient,
    projects: &[String],
    kinds: &[ResourceKind],
    region: Option<&str>,
    delay: Duration,
) -> Vec<ProjectReport> {
    let mut reports = Vec::with_capacity(projects.len());

    for (i, project) in projects.iter().enumerate() {
        if i > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let report = collect(client, project, kinds, region).await;
        if !report.complete() {
            tracing::warn!("Skipping project {} due to errors during counting", project);
        }
        reports.push(report);
    }

    reports
}
