use crate::ports::outbound::ManifestReader;
use crate::shared::error::AuditError;
use crate::shared::security;
use crate::shared::Result;
use crate::vulnerability_audit::domain::{
    FrameworkManifest, PackageId, PackageKind, PackageVersion, ProjectManifest, ResolvedLibrary,
    TopLevelReference,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Raw shape of a resolved assets manifest (project.assets.json)
///
/// Fields the audit does not need are left out; serde ignores them.
#[derive(Debug, Deserialize)]
struct AssetsFile {
    targets: BTreeMap<String, BTreeMap<String, AssetsTarget>>,
    project: AssetsProject,
}

#[derive(Debug, Deserialize)]
struct AssetsTarget {
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    dependencies: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct AssetsProject {
    restore: AssetsRestore,
    #[serde(default)]
    frameworks: BTreeMap<String, AssetsFramework>,
}

#[derive(Debug, Deserialize)]
struct AssetsRestore {
    #[serde(rename = "projectName")]
    project_name: String,
}

#[derive(Debug, Deserialize)]
struct AssetsFramework {
    #[serde(default)]
    dependencies: BTreeMap<String, AssetsDependency>,
}

#[derive(Debug, Deserialize)]
struct AssetsDependency {
    #[serde(default)]
    version: Option<String>,
}

/// AssetsManifestReader adapter for reading resolved dependency manifests
///
/// This adapter implements the ManifestReader port, parsing the
/// project.assets.json file produced by a restore into the domain manifest.
pub struct AssetsManifestReader;

impl AssetsManifestReader {
    pub fn new() -> Self {
        Self
    }

    fn parse(path: &Path, content: &str) -> Result<ProjectManifest> {
        let assets: AssetsFile =
            serde_json::from_str(content).map_err(|e| AuditError::ManifestParseError {
                path: path.to_path_buf(),
                details: e.to_string(),
            })?;

        let mut frameworks = Vec::new();
        for (framework_name, targets) in &assets.targets {
            // target keys like "net8.0/win-x64" are runtime-specific
            // duplicates of the base framework and are skipped
            if framework_name.contains('/') {
                continue;
            }

            let mut libraries = Vec::new();
            for (key, target) in targets {
                libraries.push(Self::parse_library(path, key, target)?);
            }

            let top_level_references = assets
                .project
                .frameworks
                .get(framework_name)
                .map(|f| {
                    f.dependencies
                        .iter()
                        .map(|(name, dependency)| {
                            Ok(TopLevelReference {
                                id: Self::package_id(path, name)?,
                                requested_version: dependency.version.clone(),
                            })
                        })
                        .collect::<Result<Vec<_>>>()
                })
                .transpose()?
                .unwrap_or_default();

            frameworks.push(FrameworkManifest {
                framework: framework_name.clone(),
                top_level_references,
                libraries,
            });
        }

        Ok(ProjectManifest {
            project_name: assets.project.restore.project_name.clone(),
            frameworks,
        })
    }

    /// Parses one "Name/Version" target entry into a resolved library.
    fn parse_library(path: &Path, key: &str, target: &AssetsTarget) -> Result<ResolvedLibrary> {
        let (name, version) = key.split_once('/').ok_or_else(|| AuditError::ManifestParseError {
            path: path.to_path_buf(),
            details: format!("Target entry \"{}\" is not in Name/Version form", key),
        })?;

        let kind = match target.kind.as_deref() {
            Some("project") => PackageKind::Project,
            _ => PackageKind::Package,
        };

        let dependencies = target
            .dependencies
            .keys()
            .map(|name| Self::package_id(path, name))
            .collect::<Result<Vec<_>>>()?;

        Ok(ResolvedLibrary {
            id: Self::package_id(path, name)?,
            version: PackageVersion::parse(version).map_err(|e| {
                AuditError::ManifestParseError {
                    path: path.to_path_buf(),
                    details: format!("Invalid version for \"{}\": {}", name, e),
                }
            })?,
            kind,
            dependencies,
        })
    }

    fn package_id(path: &Path, name: &str) -> Result<PackageId> {
        PackageId::new(name).map_err(|e| {
            AuditError::ManifestParseError {
                path: path.to_path_buf(),
                details: e.to_string(),
            }
            .into()
        })
    }
}

impl Default for AssetsManifestReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestReader for AssetsManifestReader {
    fn read_manifest(&self, manifest_path: &Path) -> Result<ProjectManifest> {
        if !manifest_path.exists() {
            return Err(AuditError::ManifestNotFound {
                path: manifest_path.to_path_buf(),
                suggestion: format!(
                    "Manifest \"{}\" does not exist.\n   \
                     Restore the project first, or point at the correct project.assets.json.",
                    manifest_path.display()
                ),
            }
            .into());
        }

        security::validate_regular_file(manifest_path, "manifest")?;
        security::validate_file_size(manifest_path, "manifest")?;

        let content = fs::read_to_string(manifest_path).map_err(|e| AuditError::FileReadError {
            path: manifest_path.to_path_buf(),
            details: e.to_string(),
        })?;

        Self::parse(manifest_path, &content)
    }
}
