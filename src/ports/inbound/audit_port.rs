use crate::shared::Result;
use crate::vulnerability_audit::domain::AuditReport;
use async_trait::async_trait;
use std::path::PathBuf;

/// Request parameters for a project audit
#[derive(Debug, Clone)]
pub struct ProjectAuditRequest {
    /// Path to the resolved dependency manifest (project.assets.json)
    pub manifest_path: PathBuf,
    /// Restrict the audit to these frameworks; empty means all
    pub frameworks: Vec<String>,
}

impl ProjectAuditRequest {
    pub fn new(manifest_path: PathBuf, frameworks: Vec<String>) -> Self {
        Self {
            manifest_path,
            frameworks,
        }
    }
}

/// Response from a project audit
#[derive(Debug, Clone)]
pub struct ProjectAuditResponse {
    pub report: AuditReport,
}

impl ProjectAuditResponse {
    pub fn new(report: AuditReport) -> Self {
        Self { report }
    }
}

/// ProjectAuditPort - Inbound port for the vulnerability audit use case
///
/// This port defines the interface that external adapters (CLI, API, etc.)
/// use to trigger an audit. It represents the application's public API.
///
/// Marked `?Send` because progress reporting adapters may hold
/// single-threaded state; the audit runs on one task.
#[async_trait(?Send)]
pub trait ProjectAuditPort {
    /// Audits the project described by the request's manifest
    ///
    /// # Arguments
    /// * `request` - Request parameters containing the manifest path and options
    ///
    /// # Returns
    /// A response carrying the complete audit report
    ///
    /// # Errors
    /// Returns an error if:
    /// - The manifest does not exist or cannot be parsed
    /// - Registry metadata cannot be fetched
    async fn audit_project(&self, request: ProjectAuditRequest) -> Result<ProjectAuditResponse>;
}
