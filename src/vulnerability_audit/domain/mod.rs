pub mod advisory;
pub mod attribution;
pub mod dependency_node;
pub mod package;
pub mod report;

pub use advisory::{
    Advisory, AdvisoryIndex, PackageMetadata, PackageRelease, Severity, VulnerabilityRecord,
};
pub use attribution::{Action, ActionOwner, TopLevelAttribution, UpdateCandidate};
pub use dependency_node::{DependencyGraph, DependencyNode, NodeId};
pub use package::{
    FrameworkManifest, PackageId, PackageKind, PackageVersion, ProjectManifest, ResolvedLibrary,
    TopLevelReference,
};
pub use report::{AuditReport, FrameworkAudit, ProblemKind, ReportProblem, VulnerablePackage};
