//! GCP Projects
//!
//! Project enumeration for the census run: either a static configured list
//! or discovery of all visible projects filtered by an ID substring.

use super::client::{with_page_token, GcpClient};
use anyhow::{Context, Result};
use serde_json::Value;

/// Project information from Cloud Resource Manager
#[derive(Debug, Clone)]
pub struct Project {
    pub project_id: String,
    pub name: String,
    pub lifecycle_state: String,
}

impl From<&Value> for Project {
    fn from(value: &Value) -> Self {
        Self {
            project_id: value
                .get("projectId")
                .and_then(|v| v.as_str())
                .unwrap_or("-")
                .to_string(),
            name: value
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or("-")
                .to_string(),
            lifecycle_state: value
                .get("lifecycleState")
                .and_then(|v| v.as_str())
                .unwrap_or("UNKNOWN")
                .to_string(),
        }
    }
}

/// List all accessible ACTIVE GCP projects, draining pagination.
/// A failure here is fatal for the run: with no project list there is
/// nothing to count.
pub async fn list_projects(client: &GcpClient) -> Result<Vec<Project>> {
    let base_url = client.resourcemanager_url("projects");
    let mut projects = Vec::new();
    let mut page_token: Option<String> = None;

    loop {
        let url = match page_token.as_deref() {
            Some(token) => with_page_token(&base_url, token),
            None => base_url.clone(),
        };
        let response = client.get(&url).await.context("Failed to list projects")?;

        if let Some(arr) = response.get("projects").and_then(|v| v.as_array()) {
            projects.extend(
                arr.iter()
                    .filter(|p| {
                        p.get("lifecycleState")
                            .and_then(|v| v.as_str())
                            .map(|s| s == "ACTIVE")
                            .unwrap_or(false)
                    })
                    .map(Project::from),
            );
        }

        page_token = response
            .get("nextPageToken")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());
        if page_token.is_none() {
            break;
        }
    }

    Ok(projects)
}

/// Discover target project IDs: all visible projects whose ID contains
/// `name_filter`, in provider-returned order.
pub async fn discover_project_ids(client: &GcpClient, name_filter: &str) -> Result<Vec<String>> {
    let projects = list_projects(client).await?;
    Ok(filter_project_ids(
        projects.into_iter().map(|p| p.project_id),
        name_filter,
    ))
}

/// Keep only IDs containing the filter substring. Order is preserved and no
/// duplicates are introduced; an empty filter keeps everything.
pub fn filter_project_ids<I>(ids: I, name_filter: &str) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    ids.into_iter()
        .filter(|id| id.contains(name_filter))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn project_from_json() {
        let value = json!({
            "projectId": "mgmt-hst-tst-8",
            "name": "Management",
            "lifecycleState": "ACTIVE"
        });
        let project = Project::from(&value);
        assert_eq!(project.project_id, "mgmt-hst-tst-8");
        assert_eq!(project.name, "Management");
        assert_eq!(project.lifecycle_state, "ACTIVE");
    }

    #[test]
    fn project_from_sparse_json() {
        let project = Project::from(&json!({}));
        assert_eq!(project.project_id, "-");
        assert_eq!(project.lifecycle_state, "UNKNOWN");
    }

    #[test]
    fn filter_keeps_matching_ids_in_order() {
        let ids = vec![
            "mgmt-hst-tst-8".to_string(),
            "prod-main-1".to_string(),
            "tfci-hst-tst-6".to_string(),
        ];
        assert_eq!(
            filter_project_ids(ids, "hst-tst"),
            vec!["mgmt-hst-tst-8".to_string(), "tfci-hst-tst-6".to_string()]
        );
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let ids = vec!["a-proj-1".to_string(), "b-proj-2".to_string()];
        assert_eq!(filter_project_ids(ids.clone(), ""), ids);
    }
}
