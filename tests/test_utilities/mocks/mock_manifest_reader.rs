use std::path::Path;
use vulnpath::prelude::*;
use vulnpath::vulnerability_audit::domain::{
    FrameworkManifest, PackageKind, ResolvedLibrary, TopLevelReference,
};

/// Mock ManifestReader that serves a manifest built in the test
pub struct MockManifestReader {
    manifest: ProjectManifest,
    should_fail: bool,
}

impl MockManifestReader {
    pub fn new(manifest: ProjectManifest) -> Self {
        Self {
            manifest,
            should_fail: false,
        }
    }

    pub fn with_failure() -> Self {
        Self {
            manifest: ProjectManifest {
                project_name: String::new(),
                frameworks: vec![],
            },
            should_fail: true,
        }
    }
}

impl ManifestReader for MockManifestReader {
    fn read_manifest(&self, _manifest_path: &Path) -> Result<ProjectManifest> {
        if self.should_fail {
            anyhow::bail!("Mock manifest reader failure");
        }
        Ok(self.manifest.clone())
    }
}

/// Builds a library entry for manifest fixtures.
pub fn library(id: &str, version: &str, kind: PackageKind, deps: &[&str]) -> ResolvedLibrary {
    ResolvedLibrary {
        id: PackageId::new(id).unwrap(),
        version: PackageVersion::parse(version).unwrap(),
        kind,
        dependencies: deps.iter().map(|d| PackageId::new(*d).unwrap()).collect(),
    }
}

/// Builds a top-level reference for manifest fixtures.
pub fn top_level(id: &str, requested: &str) -> TopLevelReference {
    TopLevelReference {
        id: PackageId::new(id).unwrap(),
        requested_version: Some(requested.to_string()),
    }
}

/// Builds a single-framework manifest for manifest fixtures.
pub fn single_framework_manifest(
    project_name: &str,
    framework: &str,
    top_level_references: Vec<TopLevelReference>,
    libraries: Vec<ResolvedLibrary>,
) -> ProjectManifest {
    ProjectManifest {
        project_name: project_name.to_string(),
        frameworks: vec![FrameworkManifest {
            framework: framework.to_string(),
            top_level_references,
            libraries,
        }],
    }
}
