use crate::ports::outbound::PackageRegistry;
use crate::shared::error::AuditError;
use crate::shared::security;
use crate::shared::Result;
use crate::vulnerability_audit::domain::{
    Advisory, PackageId, PackageMetadata, PackageRelease, PackageVersion, Severity,
};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct SnapshotFile {
    packages: Vec<SnapshotPackage>,
}

#[derive(Debug, Deserialize)]
struct SnapshotPackage {
    id: String,
    #[serde(default)]
    releases: Vec<SnapshotRelease>,
}

#[derive(Debug, Deserialize)]
struct SnapshotRelease {
    version: String,
    #[serde(default)]
    advisories: Vec<SnapshotAdvisory>,
}

#[derive(Debug, Deserialize)]
struct SnapshotAdvisory {
    id: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    severity: Option<String>,
}

/// OfflineRegistry adapter backed by a local JSON snapshot
///
/// This adapter implements the PackageRegistry port without network access,
/// serving release and advisory data from a snapshot file. Used for air-gapped
/// environments and reproducible test runs.
pub struct OfflineRegistry {
    packages: HashMap<PackageId, PackageMetadata>,
}

impl OfflineRegistry {
    /// Loads the snapshot file eagerly so lookups are infallible afterwards.
    pub fn from_file(snapshot_path: &Path) -> Result<Self> {
        security::validate_regular_file(snapshot_path, "registry snapshot")?;
        security::validate_file_size(snapshot_path, "registry snapshot")?;

        let content = fs::read_to_string(snapshot_path).map_err(|e| AuditError::FileReadError {
            path: snapshot_path.to_path_buf(),
            details: e.to_string(),
        })?;

        let snapshot: SnapshotFile =
            serde_json::from_str(&content).map_err(|e| AuditError::FileReadError {
                path: snapshot_path.to_path_buf(),
                details: format!("Invalid registry snapshot: {}", e),
            })?;

        let mut packages = HashMap::new();
        for package in snapshot.packages {
            let metadata = Self::convert(package)?;
            packages.insert(metadata.id.clone(), metadata);
        }

        Ok(Self { packages })
    }

    fn convert(package: SnapshotPackage) -> Result<PackageMetadata> {
        let id = PackageId::new(&package.id)?;
        let releases = package
            .releases
            .into_iter()
            .map(|release| {
                Ok(PackageRelease {
                    version: PackageVersion::parse(&release.version)?,
                    advisories: release
                        .advisories
                        .into_iter()
                        .map(|advisory| Advisory {
                            id: advisory.id,
                            url: advisory.url.unwrap_or_default(),
                            severity: advisory
                                .severity
                                .as_deref()
                                .map(Severity::parse)
                                .unwrap_or(Severity::None),
                        })
                        .collect(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(PackageMetadata { id, releases })
    }

    #[cfg(test)]
    pub fn package_count(&self) -> usize {
        self.packages.len()
    }
}

#[async_trait]
impl PackageRegistry for OfflineRegistry {
    async fn fetch_package(&self, id: &PackageId) -> Result<PackageMetadata> {
        // packages absent from the snapshot have no known advisories
        Ok(self
            .packages
            .get(id)
            .cloned()
            .unwrap_or_else(|| PackageMetadata::empty(id.clone())))
    }
}
