use super::package::{PackageId, PackageVersion};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Advisory severity levels, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    None,
    Low,
    Moderate,
    High,
    Critical,
}

impl Severity {
    /// Lenient parsing of severity strings as they appear in registry data.
    pub fn parse(input: &str) -> Self {
        match input.to_ascii_lowercase().as_str() {
            "low" => Severity::Low,
            "moderate" | "medium" => Severity::Moderate,
            "high" => Severity::High,
            "critical" => Severity::Critical,
            _ => Severity::None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::None => write!(f, "none"),
            Severity::Low => write!(f, "low"),
            Severity::Moderate => write!(f, "moderate"),
            Severity::High => write!(f, "high"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// One security advisory affecting a specific package version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advisory {
    /// Advisory identifier (e.g. "GHSA-xxxx" or "CVE-2024-1234")
    pub id: String,
    pub url: String,
    pub severity: Severity,
}

/// An advisory tied to the package occurrence it was observed on.
///
/// Two records are considered the same vulnerability when their advisory
/// identifiers match; attribution rollups deduplicate on that key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VulnerabilityRecord {
    pub package_id: PackageId,
    pub version: PackageVersion,
    pub advisory: Advisory,
}

/// One known release of a package together with its advisory list.
#[derive(Debug, Clone)]
pub struct PackageRelease {
    pub version: PackageVersion,
    pub advisories: Vec<Advisory>,
}

/// Registry metadata for a package: every known release with its advisories.
#[derive(Debug, Clone)]
pub struct PackageMetadata {
    pub id: PackageId,
    pub releases: Vec<PackageRelease>,
}

impl PackageMetadata {
    pub fn empty(id: PackageId) -> Self {
        Self {
            id,
            releases: Vec::new(),
        }
    }
}

/// In-memory index over pre-fetched registry metadata.
///
/// Supports the two lookups the audit core needs: advisories for an exact
/// (id, version) pair, and the full release list of a package for update
/// candidate evaluation. All keys are case-insensitive through `PackageId`.
#[derive(Debug, Default)]
pub struct AdvisoryIndex {
    advisories: HashMap<PackageId, HashMap<PackageVersion, Vec<Advisory>>>,
    releases: HashMap<PackageId, Vec<PackageRelease>>,
}

impl AdvisoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the index, dropping ignored advisories and (optionally)
    /// pre-release versions from the candidate release lists.
    pub fn from_metadata(
        metadata: Vec<PackageMetadata>,
        ignored_advisories: &HashSet<String>,
        include_prerelease: bool,
    ) -> Self {
        let mut index = Self::new();
        for package in metadata {
            let mut by_version: HashMap<PackageVersion, Vec<Advisory>> = HashMap::new();
            let mut releases: Vec<PackageRelease> = Vec::new();

            for mut release in package.releases {
                release
                    .advisories
                    .retain(|a| !ignored_advisories.contains(&a.id));
                by_version.insert(release.version.clone(), release.advisories.clone());
                if include_prerelease || !release.version.is_prerelease() {
                    releases.push(release);
                }
            }

            releases.sort_by(|a, b| a.version.cmp(&b.version));
            index.advisories.insert(package.id.clone(), by_version);
            index.releases.insert(package.id, releases);
        }
        index
    }

    /// Advisories for an exact (id, version) pair. Unknown packages and
    /// versions yield an empty slice, never an error.
    pub fn advisories_for(&self, id: &PackageId, version: &PackageVersion) -> &[Advisory] {
        self.advisories
            .get(id)
            .and_then(|versions| versions.get(version))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All known releases of a package, sorted by ascending version.
    pub fn releases_for(&self, id: &PackageId) -> &[PackageRelease] {
        self.releases.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Attributable records for a package occurrence.
    pub fn records_for(&self, id: &PackageId, version: &PackageVersion) -> Vec<VulnerabilityRecord> {
        self.advisories_for(id, version)
            .iter()
            .map(|advisory| VulnerabilityRecord {
                package_id: id.clone(),
                version: version.clone(),
                advisory: advisory.clone(),
            })
            .collect()
    }

    pub fn is_vulnerable(&self, id: &PackageId, version: &PackageVersion) -> bool {
        !self.advisories_for(id, version).is_empty()
    }
}
