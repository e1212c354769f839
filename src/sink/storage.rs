//! Cloud Storage sink
//!
//! Concatenates the composed lines of every COMPLETE report and overwrites
//! one fixed object with the result, once at the end of a run. This is a
//! full replace, not an append; concurrent runs race and the last writer
//! wins.

use crate::gcp::client::GcpClient;
use crate::report::ProjectReport;
use anyhow::{Context, Result};

/// Build the object payload: one line per (project, kind) for complete
/// reports, in project order then kind order. Incomplete reports contribute
/// nothing.
pub fn compose(reports: &[ProjectReport]) -> String {
    let mut payload = String::new();
    for report in reports.iter().filter(|r| r.complete()) {
        for line in report.lines() {
            payload.push_str(&line);
            payload.push('\n');
        }
    }
    payload
}

/// Overwrite the configured object with the payload.
pub async fn write(client: &GcpClient, bucket: &str, object: &str, payload: String) -> Result<()> {
    let url = client.storage_upload_url(bucket, object);
    client
        .post_text(&url, "text/plain", payload)
        .await
        .with_context(|| format!("Error writing to Cloud Storage object gs://{bucket}/{object}"))?;
    Ok(())
}
