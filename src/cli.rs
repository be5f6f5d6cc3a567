use clap::Parser;
use std::path::PathBuf;

use crate::application::dto::OutputFormat;
use crate::vulnerability_audit::domain::Severity;

/// Strict severity parsing for CLI and config values. Unlike registry data,
/// a typo here should be rejected, not silently treated as `none`.
pub fn parse_severity(s: &str) -> Result<Severity, String> {
    match s.to_lowercase().as_str() {
        "low" => Ok(Severity::Low),
        "moderate" | "medium" => Ok(Severity::Moderate),
        "high" => Ok(Severity::High),
        "critical" => Ok(Severity::Critical),
        _ => Err(format!(
            "Invalid severity: {}. Please specify 'low', 'moderate', 'high' or 'critical'",
            s
        )),
    }
}

/// Audit resolved dependencies for known vulnerabilities
#[derive(Parser, Debug)]
#[command(name = "vulnpath")]
#[command(version)]
#[command(
    about = "Trace vulnerable packages through the dependency graph and recommend updates",
    long_about = None
)]
pub struct Args {
    /// Path to the resolved dependency manifest
    #[arg(default_value = "project.assets.json")]
    pub manifest: PathBuf,

    /// Output format: console or json
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Restrict the audit to a target framework
    /// Can be specified multiple times: --framework net8.0 --framework net6.0
    #[arg(long = "framework", value_name = "TFM")]
    pub frameworks: Vec<String>,

    /// Registry base URL for release and advisory metadata
    #[arg(long, value_name = "URL")]
    pub registry_url: Option<String>,

    /// Local registry snapshot (JSON) for offline audits
    #[arg(long, value_name = "FILE")]
    pub offline_registry: Option<PathBuf>,

    /// Consider pre-release versions as update candidates
    #[arg(long)]
    pub include_prerelease: bool,

    /// Maximum number of parallel registry requests
    #[arg(long, value_name = "N")]
    pub max_parallel: Option<usize>,

    /// Advisory id to exclude from the audit
    /// Can be specified multiple times: --ignore GHSA-xxxx --ignore CVE-2024-1234
    #[arg(long = "ignore", value_name = "ADVISORY")]
    pub ignore_advisories: Vec<String>,

    /// Fail (exit code 1) only for findings at or above this severity
    #[arg(long, value_name = "SEVERITY", value_parser = parse_severity)]
    pub severity_threshold: Option<Severity>,

    /// Path to a config file (defaults to vulnpath.config.yml next to the manifest)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
