use crate::vulnerability_audit::domain::Severity;
use std::collections::HashSet;
use std::path::PathBuf;

/// Default number of parallel registry requests
pub const DEFAULT_MAX_PARALLEL: usize = 8;

/// AuditRequest - Internal request DTO for the audit use case
///
/// This DTO represents the internal request structure used within
/// the application layer. It may differ from the external API request.
#[derive(Debug, Clone)]
pub struct AuditRequest {
    /// Path to the resolved dependency manifest (project.assets.json)
    pub manifest_path: PathBuf,
    /// Restrict the audit to these frameworks; empty means all
    pub frameworks: Vec<String>,
    /// Consider pre-release versions as update candidates
    pub include_prerelease: bool,
    /// Upper bound on concurrent registry requests
    pub max_parallel: usize,
    /// Advisory identifiers to exclude from the audit
    pub ignore_advisories: HashSet<String>,
    /// Fail (exit code 1) only at or above this severity
    pub severity_threshold: Option<Severity>,
}

impl AuditRequest {
    pub fn new(manifest_path: PathBuf) -> Self {
        Self {
            manifest_path,
            frameworks: Vec::new(),
            include_prerelease: false,
            max_parallel: DEFAULT_MAX_PARALLEL,
            ignore_advisories: HashSet::new(),
            severity_threshold: None,
        }
    }
}
