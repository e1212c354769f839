//! Cloud Logging sink
//!
//! Writes the same text lines the console sink emits as `textPayload`
//! entries in a named log, batched one `entries:write` call per report.
//! Successful counts go out at INFO, failures at ERROR.

use crate::gcp::client::GcpClient;
use crate::report::ProjectReport;
use anyhow::{Context, Result};
use serde_json::{json, Value};

/// Build the entries:write request body for one report.
pub fn write_body(log_project: &str, log_name: &str, report: &ProjectReport) -> Value {
    let entries: Vec<Value> = report
        .records
        .iter()
        .map(|record| match record.line() {
            Some(line) => json!({"textPayload": line, "severity": "INFO"}),
            None => json!({
                // error is always present when line is absent
                "textPayload": record.error_line().unwrap_or_default(),
                "severity": "ERROR",
            }),
        })
        .collect();

    json!({
        "logName": format!("projects/{}/logs/{}", log_project, log_name),
        "resource": {"type": "global"},
        "entries": entries,
    })
}

/// Write one report's lines to the named log stream.
pub async fn write_report(
    client: &GcpClient,
    log_project: &str,
    log_name: &str,
    report: &ProjectReport,
) -> Result<()> {
    let body = write_body(log_project, log_name, report);
    client
        .post(&client.logging_write_url(), Some(&body))
        .await
        .with_context(|| format!("Failed to write log entries for {}", report.project))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gcp::http::{ApiError, ApiErrorKind};
    use crate::report::CountRecord;
    use crate::resource::kind::ResourceKind;

    #[test]
    fn body_mixes_info_and_error_entries() {
        let report = ProjectReport {
            project: "mgmt-hst-tst-8".to_string(),
            records: vec![
                CountRecord::ok("mgmt-hst-tst-8", ResourceKind::Vpc, 3),
                CountRecord::failed(
                    "mgmt-hst-tst-8",
                    ResourceKind::DnsZone,
                    ApiError {
                        kind: ApiErrorKind::Auth,
                        status: Some(403),
                        message: "API request failed: 403".to_string(),
                    },
                ),
            ],
        };

        let body = write_body("admin-proj-1", "network-summary", &report);
        assert_eq!(
            body["logName"],
            "projects/admin-proj-1/logs/network-summary"
        );
        assert_eq!(body["resource"]["type"], "global");

        let entries = body["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["severity"], "INFO");
        assert_eq!(entries[0]["textPayload"], "VPC Count in mgmt-hst-tst-8: 3");
        assert_eq!(entries[1]["severity"], "ERROR");
        assert!(entries[1]["textPayload"]
            .as_str()
            .unwrap()
            .starts_with("Error counting DNS Zones in mgmt-hst-tst-8"));
    }
}
