use super::advisory::{Advisory, Severity};
use super::attribution::{Action, TopLevelAttribution};
use super::package::{PackageId, PackageVersion};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Severity of a structured problem attached to the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProblemKind {
    Warning,
    Error,
}

/// A problem raised by a collaborator (manifest reading, registry fetch,
/// graph construction) that did not abort the audit. Problems travel with
/// the report instead of being thrown past the core.
#[derive(Debug, Clone, Serialize)]
pub struct ReportProblem {
    pub kind: ProblemKind,
    pub message: String,
}

impl ReportProblem {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: ProblemKind::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ProblemKind::Error,
            message: message.into(),
        }
    }
}

/// A resolved package with at least one advisory, and the frameworks it was
/// observed under.
#[derive(Debug, Clone, Serialize)]
pub struct VulnerablePackage {
    pub id: PackageId,
    pub version: PackageVersion,
    pub advisories: Vec<Advisory>,
    pub frameworks: Vec<String>,
}

/// Attribution forest for one framework.
#[derive(Debug, Clone, Serialize)]
pub struct FrameworkAudit {
    pub framework: String,
    pub top_level: Vec<TopLevelAttribution>,
}

/// The complete audit result handed to the reporting layer.
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub project_name: String,
    pub manifest_path: PathBuf,
    pub problems: Vec<ReportProblem>,
    pub vulnerable_packages: Vec<VulnerablePackage>,
    pub frameworks: Vec<FrameworkAudit>,
    pub actions: BTreeSet<Action>,
}

impl AuditReport {
    pub fn has_findings(&self) -> bool {
        !self.vulnerable_packages.is_empty()
    }

    /// Highest severity among all findings, if any.
    pub fn max_severity(&self) -> Option<Severity> {
        self.vulnerable_packages
            .iter()
            .flat_map(|p| p.advisories.iter().map(|a| a.severity))
            .max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report_with(severities: Vec<Severity>) -> AuditReport {
        AuditReport {
            project_name: "Demo".to_string(),
            manifest_path: PathBuf::from("demo.assets.json"),
            problems: vec![],
            vulnerable_packages: severities
                .into_iter()
                .enumerate()
                .map(|(i, severity)| VulnerablePackage {
                    id: PackageId::new(format!("pkg{}", i)).unwrap(),
                    version: PackageVersion::parse("1.0.0").unwrap(),
                    advisories: vec![Advisory {
                        id: format!("GHSA-{}", i),
                        url: String::new(),
                        severity,
                    }],
                    frameworks: vec!["net8.0".to_string()],
                })
                .collect(),
            frameworks: vec![],
            actions: BTreeSet::new(),
        }
    }

    #[test]
    fn test_empty_report_has_no_findings() {
        let report = report_with(vec![]);
        assert!(!report.has_findings());
        assert!(report.max_severity().is_none());
    }

    #[test]
    fn test_max_severity() {
        let report = report_with(vec![Severity::Low, Severity::Critical, Severity::High]);
        assert_eq!(report.max_severity(), Some(Severity::Critical));
    }
}
