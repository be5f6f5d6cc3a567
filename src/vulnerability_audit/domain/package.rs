use crate::shared::Result;
use serde::Serializer;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// Maximum length for package ids (security limit)
const MAX_PACKAGE_ID_LENGTH: usize = 255;

/// Maximum length for version strings (security limit)
const MAX_VERSION_LENGTH: usize = 100;

/// Package identity with case-insensitive semantics.
///
/// Every map and set keyed by package id (node cache, visited set, advisory
/// lookup) relies on this type's `Eq`/`Ord`/`Hash`, which all go through the
/// same ASCII-lowercase normalization. The original spelling is preserved
/// for display.
#[derive(Debug, Clone)]
pub struct PackageId(String);

impl PackageId {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            anyhow::bail!("Package id cannot be empty");
        }
        if id.len() > MAX_PACKAGE_ID_LENGTH {
            anyhow::bail!(
                "Package id is too long ({} bytes). Maximum allowed: {} bytes",
                id.len(),
                MAX_PACKAGE_ID_LENGTH
            );
        }
        if !id
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '.')
        {
            anyhow::bail!(
                "Package id '{}' contains invalid characters. Only alphanumeric, hyphens, underscores and dots are allowed.",
                id
            );
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The canonical (lowercased) form used wherever a plain string key is
    /// needed instead of the `PackageId` itself.
    pub fn canonical(&self) -> String {
        self.0.to_ascii_lowercase()
    }
}

impl PartialEq for PackageId {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for PackageId {}

impl Hash for PackageId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for b in self.0.bytes() {
            state.write_u8(b.to_ascii_lowercase());
        }
    }
}

impl PartialOrd for PackageId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PackageId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .bytes()
            .map(|b| b.to_ascii_lowercase())
            .cmp(other.0.bytes().map(|b| b.to_ascii_lowercase()))
    }
}

impl std::fmt::Display for PackageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl serde::Serialize for PackageId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Resolved package version.
///
/// Wraps a semver version for ordering while preserving the original string
/// for display. Parsing is lenient: two-part versions like "9.0" are padded
/// to "9.0.0", and a fourth revision component (common in .NET package
/// versions) is ignored for comparison purposes.
#[derive(Debug, Clone)]
pub struct PackageVersion {
    raw: String,
    parsed: semver::Version,
}

impl PackageVersion {
    pub fn parse(input: &str) -> Result<Self> {
        let raw = input.trim().to_string();
        if raw.is_empty() {
            anyhow::bail!("Package version cannot be empty");
        }
        if raw.len() > MAX_VERSION_LENGTH {
            anyhow::bail!(
                "Package version is too long ({} bytes). Maximum allowed: {} bytes",
                raw.len(),
                MAX_VERSION_LENGTH
            );
        }

        let parsed = match semver::Version::parse(&raw) {
            Ok(v) => v,
            Err(_) => Self::parse_lenient(&raw)?,
        };

        Ok(Self { raw, parsed })
    }

    fn parse_lenient(raw: &str) -> Result<semver::Version> {
        // split off any pre-release / build suffix before padding components
        let (numeric, suffix) = match raw.find(['-', '+']) {
            Some(ix) => (&raw[..ix], &raw[ix..]),
            None => (raw, ""),
        };

        let parts: Vec<&str> = numeric.split('.').collect();
        let padded = match parts.len() {
            1 => format!("{}.0.0{}", parts[0], suffix),
            2 => format!("{}.{}.0{}", parts[0], parts[1], suffix),
            // revision component and beyond are dropped from the comparison key
            n if n > 3 => format!("{}.{}.{}{}", parts[0], parts[1], parts[2], suffix),
            _ => format!("{}{}", numeric, suffix),
        };

        semver::Version::parse(&padded)
            .map_err(|e| anyhow::anyhow!("Invalid package version '{}': {}", raw, e))
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// True for pre-release versions (e.g. "2.0.0-beta1").
    pub fn is_prerelease(&self) -> bool {
        !self.parsed.pre.is_empty()
    }
}

impl PartialEq for PackageVersion {
    fn eq(&self, other: &Self) -> bool {
        self.parsed == other.parsed
    }
}

impl Eq for PackageVersion {}

impl Hash for PackageVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.parsed.hash(state);
    }
}

impl PartialOrd for PackageVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PackageVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.parsed.cmp(&other.parsed)
    }
}

impl std::fmt::Display for PackageVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl serde::Serialize for PackageVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

/// Whether a resolved library is a package reference or an inter-project reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageKind {
    Project,
    Package,
}

impl std::fmt::Display for PackageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PackageKind::Project => write!(f, "project"),
            PackageKind::Package => write!(f, "package"),
        }
    }
}

/// One entry of a framework's flat resolved-library list: the package, the
/// single version selected for it, and its declared direct dependencies.
#[derive(Debug, Clone)]
pub struct ResolvedLibrary {
    pub id: PackageId,
    pub version: PackageVersion,
    pub kind: PackageKind,
    pub dependencies: Vec<PackageId>,
}

/// A package or project reference declared directly by the build target.
/// The requested version string is kept verbatim for display only.
#[derive(Debug, Clone)]
pub struct TopLevelReference {
    pub id: PackageId,
    pub requested_version: Option<String>,
}

/// Everything the manifest resolved for one build framework.
#[derive(Debug, Clone)]
pub struct FrameworkManifest {
    pub framework: String,
    pub top_level_references: Vec<TopLevelReference>,
    pub libraries: Vec<ResolvedLibrary>,
}

impl FrameworkManifest {
    pub fn library(&self, id: &PackageId) -> Option<&ResolvedLibrary> {
        self.libraries.iter().find(|l| &l.id == id)
    }
}

/// A fully resolved dependency manifest for one project.
#[derive(Debug, Clone)]
pub struct ProjectManifest {
    pub project_name: String,
    pub frameworks: Vec<FrameworkManifest>,
}
