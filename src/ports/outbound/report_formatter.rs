use crate::shared::Result;
use crate::vulnerability_audit::domain::AuditReport;

/// ReportFormatter port for rendering audit reports
///
/// This port abstracts the formatting logic for different report formats
/// (console text, JSON, etc.).
pub trait ReportFormatter {
    /// Renders the audit report as a string
    ///
    /// # Arguments
    /// * `report` - The complete audit report
    ///
    /// # Errors
    /// Returns an error if formatting or serialization fails
    fn format(&self, report: &AuditReport) -> Result<String>;
}
