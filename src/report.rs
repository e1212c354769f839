//! Count records and per-project reports.

use crate::gcp::http::ApiError;
use crate::resource::kind::ResourceKind;

/// Outcome of one (project, kind) counting call. `value` is absent exactly
/// when the underlying call failed, in which case `error` holds the failure.
#[derive(Debug, Clone)]
pub struct CountRecord {
    pub project: String,
    pub kind: ResourceKind,
    pub value: Option<u64>,
    pub error: Option<ApiError>,
}

impl CountRecord {
    pub fn ok(project: &str, kind: ResourceKind, value: u64) -> Self {
        Self {
            project: project.to_string(),
            kind,
            value: Some(value),
            error: None,
        }
    }

    pub fn failed(project: &str, kind: ResourceKind, error: ApiError) -> Self {
        Self {
            project: project.to_string(),
            kind,
            value: None,
            error: Some(error),
        }
    }

    /// The sink line for a successful count:
    /// `"<Label> Count in <project>: <value>"`. None for failed records.
    pub fn line(&self) -> Option<String> {
        self.value
            .map(|v| format!("{} Count in {}: {}", self.kind.label(), self.project, v))
    }

    /// The error line for a failed count:
    /// `"Error counting <Label>s in <project>: <message>"`. None on success.
    pub fn error_line(&self) -> Option<String> {
        self.error.as_ref().map(|e| {
            format!(
                "Error counting {}s in {}: {}",
                self.kind.label(),
                self.project,
                e
            )
        })
    }
}

/// All counts for one project, in the fixed kind order.
#[derive(Debug, Clone)]
pub struct ProjectReport {
    pub project: String,
    pub records: Vec<CountRecord>,
}

impl ProjectReport {
    /// True iff every configured kind produced a value. Incomplete reports
    /// are excluded from composed-record sinks.
    pub fn complete(&self) -> bool {
        self.records.iter().all(|r| r.value.is_some())
    }

    /// The composed sink payload: one line per kind, in order.
    /// Only meaningful for complete reports.
    pub fn lines(&self) -> Vec<String> {
        self.records.iter().filter_map(|r| r.line()).collect()
    }
}
