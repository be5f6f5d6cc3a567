use crate::ports::outbound::ReportFormatter;
use crate::shared::Result;
use crate::vulnerability_audit::domain::{
    ActionOwner, AuditReport, ProblemKind, Severity, TopLevelAttribution,
};
use crate::vulnerability_audit::services::ActionDeduper;
use owo_colors::OwoColorize;
use std::fmt::Write;

/// ConsoleFormatter adapter for human-readable terminal output
///
/// This adapter implements the ReportFormatter port, rendering the audit
/// report as colored text: the flat list of vulnerable packages, the
/// per-framework attribution trees and the deduplicated action list.
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    pub fn new() -> Self {
        Self
    }

    fn severity_label(severity: Severity) -> String {
        match severity {
            Severity::Critical => severity.to_string().red().bold().to_string(),
            Severity::High => severity.to_string().red().to_string(),
            Severity::Moderate => severity.to_string().yellow().to_string(),
            Severity::Low | Severity::None => severity.to_string().dimmed().to_string(),
        }
    }

    fn write_problems(out: &mut String, report: &AuditReport) {
        if report.problems.is_empty() {
            return;
        }
        writeln!(out).ok();
        for problem in &report.problems {
            let prefix = match problem.kind {
                ProblemKind::Warning => "⚠️ ".yellow().to_string(),
                ProblemKind::Error => "❌".red().to_string(),
            };
            writeln!(out, "{} {}", prefix, problem.message).ok();
        }
    }

    fn write_vulnerable_packages(out: &mut String, report: &AuditReport) {
        writeln!(out).ok();
        writeln!(out, "{}", "Vulnerable packages:".bold()).ok();
        for package in &report.vulnerable_packages {
            writeln!(
                out,
                "   {} {} [{}]",
                package.id.to_string().bold(),
                package.version,
                package.frameworks.join(", ")
            )
            .ok();
            for advisory in &package.advisories {
                writeln!(
                    out,
                    "      {} ({}) {}",
                    advisory.id,
                    Self::severity_label(advisory.severity),
                    advisory.url.dimmed()
                )
                .ok();
            }
        }
    }

    fn write_attribution(out: &mut String, node: &TopLevelAttribution, depth: usize) {
        let indent = "   ".repeat(depth + 1);
        writeln!(out, "{}{} {}", indent, node.id, node.version).ok();

        for record in node.own_vulnerabilities() {
            writeln!(
                out,
                "{}   {} {} ({})",
                indent,
                "!".red(),
                record.advisory.id,
                Self::severity_label(record.advisory.severity)
            )
            .ok();
        }

        if let Some(update) = &node.best_update {
            let total = node.related.len();
            let line = if update.is_clean_fix() {
                format!(
                    "→ update to {} solves all related vulnerabilities",
                    update.version
                )
                .green()
                .to_string()
            } else {
                let mut line = format!(
                    "→ update to {} solves {} of {} related vulnerabilities",
                    update.version,
                    update.solved.len(),
                    total
                );
                if !update.newly_introduced.is_empty() {
                    line.push_str(&format!(
                        ", introduces {} new",
                        update.newly_introduced.len()
                    ));
                }
                line.yellow().to_string()
            };
            writeln!(out, "{}   {}", indent, line).ok();
        } else if node.own_vulnerabilities().next().is_some() {
            writeln!(out, "{}   {}", indent, "no fixing update available".red()).ok();
        }

        for child in &node.children {
            Self::write_attribution(out, child, depth + 1);
        }
    }

    fn write_frameworks(out: &mut String, report: &AuditReport) {
        for framework in &report.frameworks {
            if framework.top_level.is_empty() {
                continue;
            }
            writeln!(out).ok();
            writeln!(
                out,
                "{}",
                format!("Dependency paths [{}]:", framework.framework).bold()
            )
            .ok();
            for attribution in &framework.top_level {
                Self::write_attribution(out, attribution, 0);
            }
        }
    }

    fn write_actions(out: &mut String, report: &AuditReport) {
        if report.actions.is_empty() {
            return;
        }
        writeln!(out).ok();
        writeln!(out, "{}", "Recommended actions:".bold()).ok();

        for (owner, actions) in ActionDeduper::group_by_owner(&report.actions) {
            match owner {
                ActionOwner::Project => {
                    writeln!(out, "   Update in your solution:").ok();
                }
                ActionOwner::Package(id) => {
                    writeln!(out, "   Contact the author of {}:", id.to_string().bold()).ok();
                }
            }
            for action in actions {
                writeln!(out, "      - {} -> {}", action.dependency, action.version).ok();
            }
        }
    }
}

impl Default for ConsoleFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for ConsoleFormatter {
    fn format(&self, report: &AuditReport) -> Result<String> {
        let mut out = String::new();

        writeln!(
            out,
            "{} {}",
            "🔍 Vulnerability audit for".bold(),
            report.project_name.bold()
        )
        .ok();
        writeln!(out, "   Manifest: {}", report.manifest_path.display()).ok();

        Self::write_problems(&mut out, report);

        if !report.has_findings() {
            writeln!(out).ok();
            writeln!(out, "{}", "✅ No known vulnerabilities found".green()).ok();
            return Ok(out);
        }

        Self::write_vulnerable_packages(&mut out, report);
        Self::write_frameworks(&mut out, report);
        Self::write_actions(&mut out, report);

        Ok(out)
    }
}
