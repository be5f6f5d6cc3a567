use crate::ports::outbound::ReportFormatter;
use crate::shared::Result;
use crate::vulnerability_audit::domain::AuditReport;
use chrono::Utc;
use serde::Serialize;

#[derive(Serialize)]
struct JsonDocument<'a> {
    tool: ToolInfo,
    generated_at: String,
    report: &'a AuditReport,
}

#[derive(Serialize)]
struct ToolInfo {
    name: &'static str,
    version: &'static str,
}

/// JsonFormatter adapter for machine-readable output
///
/// This adapter implements the ReportFormatter port, serializing the audit
/// report to pretty-printed JSON with a tool header and timestamp.
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for JsonFormatter {
    fn format(&self, report: &AuditReport) -> Result<String> {
        let document = JsonDocument {
            tool: ToolInfo {
                name: "vulnpath",
                version: env!("CARGO_PKG_VERSION"),
            },
            generated_at: Utc::now().to_rfc3339(),
            report,
        };

        let mut json = serde_json::to_string_pretty(&document)?;
        json.push('\n');
        Ok(json)
    }
}
