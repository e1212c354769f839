//! Custom metric lifecycle
//!
//! Three independent operations on the `custom.googleapis.com/vpc_count`
//! metric descriptor: create it, write one gauge point with the current VPC
//! count, and delete every custom descriptor in a project.

use crate::gcp::client::{with_page_token, GcpClient};
use crate::resource::counter;
use crate::resource::kind::ResourceKind;
use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};

/// Type of the custom gauge metric this tool manages.
pub const METRIC_TYPE: &str = "custom.googleapis.com/vpc_count";

/// Prefix identifying custom metrics for the delete sweep.
pub const CUSTOM_METRIC_PREFIX: &str = "custom.googleapis.com/";

/// Descriptor body for the VPC count gauge: INT64, one STRING label.
pub fn descriptor_body() -> Value {
    json!({
        "type": METRIC_TYPE,
        "metricKind": "GAUGE",
        "valueType": "INT64",
        "description": "VPC Count in the project",
        "displayName": "VPC Count",
        "labels": [
            {
                "key": "project_id",
                "valueType": "STRING",
                "description": "ID of the GCP Project"
            }
        ]
    })
}

/// Register the metric descriptor. Re-creating an existing descriptor of the
/// same shape is benign; the Monitoring API's conflict answer is logged and
/// swallowed.
pub async fn create(client: &GcpClient, project: &str) -> Result<()> {
    let url = client.monitoring_url(project, "metricDescriptors");

    match client.post(&url, Some(&descriptor_body())).await {
        Ok(descriptor) => {
            let name = descriptor
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or(METRIC_TYPE);
            tracing::info!("Created custom metric: {}", name);
            Ok(())
        }
        Err(err) if err.status == Some(409) => {
            tracing::info!("Custom metric {} already exists", METRIC_TYPE);
            Ok(())
        }
        Err(err) => Err(err).context("Error creating custom metric"),
    }
}

/// Body of a single-gauge-point timeSeries write. GAUGE points require
/// `startTime == endTime`; INT64 values go over the wire as strings.
pub fn time_series_body(project: &str, vpc_count: u64, timestamp: &str) -> Value {
    json!({
        "timeSeries": [
            {
                "metric": {
                    "type": METRIC_TYPE,
                    "labels": {"project_id": project}
                },
                "resource": {"type": "global"},
                "points": [
                    {
                        "interval": {
                            "startTime": timestamp,
                            "endTime": timestamp
                        },
                        "value": {"int64Value": vpc_count.to_string()}
                    }
                ]
            }
        ]
    })
}

/// Count VPCs in the project and write the count as one gauge point.
pub async fn write_vpc_count(client: &GcpClient, project: &str) -> Result<u64> {
    let vpc_count = counter::try_count(client, project, ResourceKind::Vpc, None)
        .await
        .with_context(|| format!("Error counting VPCs in {}", project))?;

    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true);
    let body = time_series_body(project, vpc_count, &now);
    let url = client.monitoring_url(project, "timeSeries");

    client
        .post(&url, Some(&body))
        .await
        .context("Error writing VPC count time series")?;

    tracing::info!("VPC Count in {}: {}", project, vpc_count);
    Ok(vpc_count)
}

/// Pull the names of custom-prefixed descriptors out of one list page.
pub fn custom_descriptor_names(response: &Value) -> Vec<String> {
    response
        .get("metricDescriptors")
        .and_then(|v| v.as_array())
        .map(|descriptors| {
            descriptors
                .iter()
                .filter(|d| {
                    d.get("type")
                        .and_then(|v| v.as_str())
                        .map(|t| t.starts_with(CUSTOM_METRIC_PREFIX))
                        .unwrap_or(false)
                })
                .filter_map(|d| d.get("name").and_then(|v| v.as_str()))
                .map(|s| s.to_string())
                .collect()
        })
        .unwrap_or_default()
}

/// Delete every custom metric descriptor in the project. Returns how many
/// were deleted. Unconditional, no confirmation step.
pub async fn delete_custom_metrics(client: &GcpClient, project: &str) -> Result<usize> {
    let base_url = client.monitoring_url(project, "metricDescriptors");
    let mut names = Vec::new();
    let mut page_token: Option<String> = None;

    loop {
        let url = match page_token.as_deref() {
            Some(token) => with_page_token(&base_url, token),
            None => base_url.clone(),
        };
        let response = client
            .get(&url)
            .await
            .context("Error listing metric descriptors")?;

        names.extend(custom_descriptor_names(&response));

        page_token = response
            .get("nextPageToken")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());
        if page_token.is_none() {
            break;
        }
    }

    for name in &names {
        client
            .delete(&client.monitoring_name_url(name))
            .await
            .with_context(|| format!("Error deleting custom metric {}", name))?;
        tracing::info!("Deleted custom metric: {}", name);
    }

    Ok(names.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_shape() {
        let body = descriptor_body();
        assert_eq!(body["type"], METRIC_TYPE);
        assert_eq!(body["metricKind"], "GAUGE");
        assert_eq!(body["valueType"], "INT64");
        let labels = body["labels"].as_array().unwrap();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0]["key"], "project_id");
        assert_eq!(labels[0]["valueType"], "STRING");
    }

    #[test]
    fn gauge_point_interval_is_instantaneous() {
        let body = time_series_body("proj-a-123456", 4, "2026-08-30T12:00:00Z");
        let point = &body["timeSeries"][0]["points"][0];
        assert_eq!(point["interval"]["startTime"], point["interval"]["endTime"]);
        assert_eq!(point["value"]["int64Value"], "4");
        assert_eq!(
            body["timeSeries"][0]["metric"]["labels"]["project_id"],
            "proj-a-123456"
        );
    }

    #[test]
    fn custom_names_filtered_by_prefix() {
        let response = json!({
            "metricDescriptors": [
                {
                    "name": "projects/p/metricDescriptors/custom.googleapis.com/vpc_count",
                    "type": "custom.googleapis.com/vpc_count"
                },
                {
                    "name": "projects/p/metricDescriptors/custom.googleapis.com/old_gauge",
                    "type": "custom.googleapis.com/old_gauge"
                },
                {
                    "name": "projects/p/metricDescriptors/compute.googleapis.com/instance/uptime",
                    "type": "compute.googleapis.com/instance/uptime"
                }
            ]
        });

        let names = custom_descriptor_names(&response);
        assert_eq!(names.len(), 2);
        assert!(names.iter().all(|n| n.contains("custom.googleapis.com")));
    }

    #[test]
    fn custom_names_of_empty_page() {
        assert!(custom_descriptor_names(&json!({})).is_empty());
    }
}
