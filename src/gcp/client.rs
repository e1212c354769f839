//! GCP Client
//!
//! Main client for interacting with GCP APIs, combining authentication
//! and HTTP functionality. Endpoint bases are overridable so tests can
//! point the client at a mock server.

use super::auth::GcpCredentials;
use super::http::{ApiError, GcpHttpClient};
use anyhow::{Context, Result};
use serde_json::Value;

/// Base URLs for the GCP services this tool talks to.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub compute: String,
    pub dns: String,
    pub resourcemanager: String,
    pub monitoring: String,
    pub logging: String,
    pub storage_upload: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            compute: "https://compute.googleapis.com".to_string(),
            dns: "https://dns.googleapis.com".to_string(),
            resourcemanager: "https://cloudresourcemanager.googleapis.com".to_string(),
            monitoring: "https://monitoring.googleapis.com".to_string(),
            logging: "https://logging.googleapis.com".to_string(),
            storage_upload: "https://storage.googleapis.com".to_string(),
        }
    }
}

impl Endpoints {
    /// Point every service at a single base URL (mock server in tests).
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/').to_string();
        Self {
            compute: base.clone(),
            dns: base.clone(),
            resourcemanager: base.clone(),
            monitoring: base.clone(),
            logging: base.clone(),
            storage_upload: base,
        }
    }
}

/// Token source: ambient ADC in production, a fixed string in tests.
#[derive(Clone)]
enum TokenSource {
    Credentials(GcpCredentials),
    Static(String),
}

/// Main GCP client
#[derive(Clone)]
pub struct GcpClient {
    token_source: TokenSource,
    pub http: GcpHttpClient,
    pub endpoints: Endpoints,
}

impl GcpClient {
    /// Create a new GCP client using Application Default Credentials
    pub async fn new() -> Result<Self> {
        let credentials = GcpCredentials::new()
            .await
            .context("Failed to initialize GCP credentials")?;

        let http = GcpHttpClient::new().context("Failed to initialize HTTP client")?;

        Ok(Self {
            token_source: TokenSource::Credentials(credentials),
            http,
            endpoints: Endpoints::default(),
        })
    }

    /// Create a client with a fixed token and custom endpoints.
    /// Used by integration tests against a mock server.
    pub fn with_static_token(endpoints: Endpoints, token: &str) -> Result<Self> {
        let http = GcpHttpClient::new().context("Failed to initialize HTTP client")?;

        Ok(Self {
            token_source: TokenSource::Static(token.to_string()),
            http,
            endpoints,
        })
    }

    /// Get the current access token
    pub async fn get_token(&self) -> Result<String> {
        match &self.token_source {
            TokenSource::Credentials(credentials) => credentials.get_token().await,
            TokenSource::Static(token) => Ok(token.clone()),
        }
    }

    /// Make a GET request to a GCP API
    pub async fn get(&self, url: &str) -> Result<Value, ApiError> {
        let token = self.token().await?;
        self.http.get(url, &token).await
    }

    /// Make a POST request to a GCP API
    pub async fn post(&self, url: &str, body: Option<&Value>) -> Result<Value, ApiError> {
        let token = self.token().await?;
        self.http.post(url, &token, body).await
    }

    /// Upload a text body (Cloud Storage media upload)
    pub async fn post_text(
        &self,
        url: &str,
        content_type: &str,
        body: String,
    ) -> Result<Value, ApiError> {
        let token = self.token().await?;
        self.http.post_text(url, &token, content_type, body).await
    }

    /// Make a DELETE request to a GCP API
    pub async fn delete(&self, url: &str) -> Result<Value, ApiError> {
        let token = self.token().await?;
        self.http.delete(url, &token).await
    }

    async fn token(&self) -> Result<String, ApiError> {
        self.get_token()
            .await
            .map_err(|e| ApiError::transport(format!("Failed to get access token: {e}")))
    }

    // =========================================================================
    // Compute Engine API helpers
    // =========================================================================

    /// Build Compute Engine API URL
    pub fn compute_url(&self, project: &str, path: &str) -> String {
        format!(
            "{}/compute/v1/projects/{}/{}",
            self.endpoints.compute, project, path
        )
    }

    /// Build regional Compute Engine API URL
    pub fn compute_regional_url(&self, project: &str, region: &str, resource: &str) -> String {
        self.compute_url(project, &format!("regions/{}/{}", region, resource))
    }

    /// Build global Compute Engine API URL
    pub fn compute_global_url(&self, project: &str, resource: &str) -> String {
        self.compute_url(project, &format!("global/{}", resource))
    }

    /// Build aggregated Compute Engine API URL (all scopes)
    pub fn compute_aggregated_url(&self, project: &str, resource: &str) -> String {
        self.compute_url(project, &format!("aggregated/{}", resource))
    }

    // =========================================================================
    // Cloud DNS API helpers
    // =========================================================================

    /// Build Cloud DNS API URL
    pub fn dns_url(&self, project: &str, resource: &str) -> String {
        format!("{}/dns/v1/projects/{}/{}", self.endpoints.dns, project, resource)
    }

    // =========================================================================
    // Resource Manager API helpers
    // =========================================================================

    /// Build Resource Manager API URL
    pub fn resourcemanager_url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.endpoints.resourcemanager, path)
    }

    // =========================================================================
    // Cloud Monitoring API helpers
    // =========================================================================

    /// Build Cloud Monitoring API URL for a project-scoped collection
    pub fn monitoring_url(&self, project: &str, resource: &str) -> String {
        format!(
            "{}/v3/projects/{}/{}",
            self.endpoints.monitoring, project, resource
        )
    }

    /// Build Cloud Monitoring API URL for a fully-qualified resource name,
    /// e.g. "projects/p/metricDescriptors/custom.googleapis.com/vpc_count"
    pub fn monitoring_name_url(&self, name: &str) -> String {
        format!("{}/v3/{}", self.endpoints.monitoring, name)
    }

    // =========================================================================
    // Cloud Logging API helpers
    // =========================================================================

    /// Build Cloud Logging entries:write URL
    pub fn logging_write_url(&self) -> String {
        format!("{}/v2/entries:write", self.endpoints.logging)
    }

    // =========================================================================
    // Cloud Storage API helpers
    // =========================================================================

    /// Build Cloud Storage media-upload URL for one object
    pub fn storage_upload_url(&self, bucket: &str, object: &str) -> String {
        format!(
            "{}/upload/storage/v1/b/{}/o?uploadType=media&name={}",
            self.endpoints.storage_upload,
            bucket,
            urlencoding::encode(object)
        )
    }
}

/// Append a `pageToken` query parameter to a listing URL.
pub fn with_page_token(url: &str, token: &str) -> String {
    match url::Url::parse(url) {
        Ok(mut parsed) => {
            parsed.query_pairs_mut().append_pair("pageToken", token);
            parsed.to_string()
        }
        // Listing URLs are built by this crate, so this arm is unreachable
        // in practice; fall back to naive appending.
        Err(_) => {
            let sep = if url.contains('?') { '&' } else { '?' };
            format!("{url}{sep}pageToken={}", urlencoding::encode(token))
        }
    }
}
