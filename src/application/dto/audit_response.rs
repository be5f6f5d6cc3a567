use crate::vulnerability_audit::domain::AuditReport;

/// AuditResponse - Result of the audit use case
#[derive(Debug, Clone)]
pub struct AuditResponse {
    /// The complete audit report
    pub report: AuditReport,
    /// Whether findings at or above the requested severity threshold exist
    pub threshold_exceeded: bool,
}

impl AuditResponse {
    pub fn new(report: AuditReport, threshold_exceeded: bool) -> Self {
        Self {
            report,
            threshold_exceeded,
        }
    }
}
