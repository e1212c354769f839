//! Resource counter
//!
//! One paginated listing call per (project, kind) pair, reduced to an item
//! count. Provider failures stop here: they are logged and folded into an
//! absent value, never raised to the caller.

use super::kind::{ApiScope, KindSpec, ResourceKind};
use crate::gcp::client::{with_page_token, GcpClient};
use crate::gcp::http::ApiError;
use crate::report::CountRecord;
use serde_json::Value;

/// Count resources of one kind in one project. `region` is required for
/// region-scoped kinds and ignored otherwise. Pagination is drained, so the
/// count covers every page the API returns.
pub async fn count(
    client: &GcpClient,
    project: &str,
    kind: ResourceKind,
    region: Option<&str>,
) -> CountRecord {
    match try_count(client, project, kind, region).await {
        Ok(value) => CountRecord::ok(project, kind, value),
        Err(err) => {
            tracing::error!(
                "Error counting {}s in {}: {}",
                kind.label(),
                project,
                err
            );
            CountRecord::failed(project, kind, err)
        }
    }
}

/// Fallible variant used where the caller wants the error instead of an
/// absent value (the metric write flow).
pub async fn try_count(
    client: &GcpClient,
    project: &str,
    kind: ResourceKind,
    region: Option<&str>,
) -> Result<u64, ApiError> {
    let base_url = list_url(client, project, kind, region)?;
    let spec = kind.spec();

    let mut total = 0u64;
    let mut page_token: Option<String> = None;

    loop {
        let url = match page_token.as_deref() {
            Some(token) => with_page_token(&base_url, token),
            None => base_url.clone(),
        };
        let response = client.get(&url).await?;

        total += count_page(spec, &response);

        page_token = response
            .get("nextPageToken")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());
        if page_token.is_none() {
            return Ok(total);
        }
    }
}

/// Build the listing URL for a kind. Region-scoped kinds without a region
/// are a configuration error, reported like any other failure.
fn list_url(
    client: &GcpClient,
    project: &str,
    kind: ResourceKind,
    region: Option<&str>,
) -> Result<String, ApiError> {
    let spec = kind.spec();
    match spec.scope {
        ApiScope::Regional => {
            let region = region.ok_or_else(|| {
                ApiError::transport(format!("No region configured for {}", kind.label()))
            })?;
            Ok(client.compute_regional_url(project, region, spec.collection))
        }
        ApiScope::Global => Ok(client.compute_global_url(project, spec.collection)),
        ApiScope::Aggregated => Ok(client.compute_aggregated_url(project, spec.collection)),
        ApiScope::Dns => Ok(client.dns_url(project, spec.collection)),
    }
}

/// Count the items in one response page. An empty or missing collection is a
/// successful zero, not a failure.
pub fn count_page(spec: &KindSpec, response: &Value) -> u64 {
    match spec.scope {
        ApiScope::Aggregated => {
            // {"items": {"regions/x": {"subnetworks": [...]}, ...}}
            let Some(buckets) = response.get("items").and_then(|v| v.as_object()) else {
                return 0;
            };
            buckets
                .values()
                .filter_map(|bucket| bucket.get(spec.items_field).and_then(|v| v.as_array()))
                .flatten()
                .filter(|item| matches_predicate(spec, item))
                .count() as u64
        }
        _ => response
            .get(spec.items_field)
            .and_then(|v| v.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter(|item| matches_predicate(spec, item))
                    .count() as u64
            })
            .unwrap_or(0),
    }
}

fn matches_predicate(spec: &KindSpec, item: &Value) -> bool {
    spec.predicate.map(|p| p(item)).unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn counts_compute_items() {
        let response = json!({
            "items": [{"name": "tunnel-1"}, {"name": "tunnel-2"}]
        });
        assert_eq!(count_page(ResourceKind::VpnTunnel.spec(), &response), 2);
    }

    #[test]
    fn empty_collection_counts_zero() {
        assert_eq!(count_page(ResourceKind::Vpc.spec(), &json!({"items": []})), 0);
        // A successful response with no items field at all is also zero
        assert_eq!(count_page(ResourceKind::Vpc.spec(), &json!({"kind": "compute#networkList"})), 0);
    }

    #[test]
    fn counts_dns_managed_zones() {
        let response = json!({
            "managedZones": [{"name": "zone-a"}, {"name": "zone-b"}, {"name": "zone-c"}]
        });
        assert_eq!(count_page(ResourceKind::DnsZone.spec(), &response), 3);
    }

    #[test]
    fn aggregated_count_applies_predicate_across_buckets() {
        let response = json!({
            "items": {
                "regions/us-central1": {
                    "subnetworks": [
                        {"name": "a", "purpose": "PRIVATE_SERVICE_CONNECT"},
                        {"name": "b", "purpose": "PRIVATE"}
                    ]
                },
                "regions/europe-west1": {
                    "subnetworks": [
                        {"name": "c", "purpose": "PRIVATE_SERVICE_CONNECT"}
                    ]
                },
                "regions/asia-east1": {
                    "warning": {"code": "NO_RESULTS_ON_PAGE"}
                }
            }
        });
        assert_eq!(
            count_page(ResourceKind::PrivateServiceAccessRange.spec(), &response),
            2
        );
    }

    #[test]
    fn aggregated_empty_response_counts_zero() {
        assert_eq!(
            count_page(ResourceKind::PrivateServiceAccessRange.spec(), &json!({})),
            0
        );
    }

    #[tokio::test]
    async fn missing_region_yields_absent_value() {
        let client = crate::gcp::client::GcpClient::with_static_token(
            crate::gcp::client::Endpoints::default(),
            "test-token",
        )
        .unwrap();

        let record = count(&client, "proj-a-123456", ResourceKind::VpnTunnel, None).await;
        assert!(record.value.is_none());
        assert!(record
            .error
            .as_ref()
            .unwrap()
            .message
            .contains("No region configured"));
    }
}
