//! vulnpath - dependency vulnerability auditor for resolved manifests
//!
//! This library traces vulnerable packages through a project's resolved
//! dependency graph, recommends updates and deduplicates remediation
//! actions, following hexagonal architecture and Domain-Driven Design
//! principles.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`vulnerability_audit`): Pure business logic and domain models
//! - **Application Layer** (`application`): Use cases and application services
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use vulnpath::prelude::*;
//! use std::path::PathBuf;
//!
//! # async fn audit() -> Result<()> {
//! // Create adapters
//! let manifest_reader = AssetsManifestReader::new();
//! let registry = CachingRegistryClient::new(HttpRegistryClient::new(
//!     "https://registry.example.com".to_string(),
//! )?);
//! let progress_reporter = StderrProgressReporter::new();
//!
//! // Create use case
//! let use_case = AuditProjectUseCase::new(manifest_reader, registry, progress_reporter);
//!
//! // Execute
//! let request = AuditRequest::new(PathBuf::from("project.assets.json"));
//! let response = use_case.execute(request).await?;
//!
//! // Format output
//! let formatter = ConsoleFormatter::new();
//! let output = formatter.format(&response.report)?;
//! println!("{}", output);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod cli;
pub mod config;
pub mod ports;
pub mod shared;
pub mod vulnerability_audit;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{
        AssetsManifestReader, FileSystemWriter, OfflineRegistry, StdoutPresenter,
    };
    pub use crate::adapters::outbound::formatters::{ConsoleFormatter, JsonFormatter};
    pub use crate::adapters::outbound::network::{CachingRegistryClient, HttpRegistryClient};
    pub use crate::application::dto::{AuditRequest, AuditResponse, OutputFormat};
    pub use crate::application::use_cases::AuditProjectUseCase;
    pub use crate::ports::outbound::{
        ManifestReader, OutputPresenter, PackageRegistry, ProgressReporter, ReportFormatter,
    };
    pub use crate::shared::Result;
    pub use crate::vulnerability_audit::domain::{
        AdvisoryIndex, AuditReport, DependencyGraph, PackageId, PackageVersion, ProjectManifest,
        Severity,
    };
    pub use crate::vulnerability_audit::services::{
        ActionDeduper, GraphBuilder, RemediationRecommender, VulnerabilityAggregator,
    };
}
