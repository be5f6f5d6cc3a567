use super::advisory::VulnerabilityRecord;
use super::package::{PackageId, PackageKind, PackageVersion};
use serde::Serialize;

/// Effect of updating a package to a specific newer version, relative to the
/// vulnerabilities attributed to it.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateCandidate {
    pub version: PackageVersion,
    /// Advisories on this package's current version that the candidate removes.
    pub solved: Vec<VulnerabilityRecord>,
    /// Related advisories the candidate does not remove. Descendant
    /// advisories always land here: updating a package cannot, by itself,
    /// fix a vulnerability inside one of its dependencies.
    pub still_present: Vec<VulnerabilityRecord>,
    /// Advisories present on the candidate but not on the current version.
    pub newly_introduced: Vec<VulnerabilityRecord>,
}

impl UpdateCandidate {
    /// A clean fix removes every related vulnerability without bringing in
    /// new ones. Only clean fixes become deduplicated actions.
    pub fn is_clean_fix(&self) -> bool {
        self.still_present.is_empty() && self.newly_introduced.is_empty()
    }
}

/// Per-package view of the responsibility subgraph: a tree parallel to the
/// dependency graph, pruned to nodes that are vulnerable themselves or have
/// at least one vulnerable descendant.
///
/// A package may appear once per responsible ancestor (reconvergence is kept,
/// unlike in the dependency graph) because remediation actions are
/// ancestor-specific.
#[derive(Debug, Clone, Serialize)]
pub struct TopLevelAttribution {
    pub id: PackageId,
    pub version: PackageVersion,
    pub kind: PackageKind,
    pub framework: String,
    /// Vulnerabilities attributable to this package or any descendant,
    /// deduplicated by advisory identifier and sorted for determinism.
    pub related: Vec<VulnerabilityRecord>,
    pub best_update: Option<UpdateCandidate>,
    pub children: Vec<TopLevelAttribution>,
}

impl TopLevelAttribution {
    /// Advisories on this package's own resolved version (excluding
    /// descendants' advisories).
    pub fn own_vulnerabilities(&self) -> impl Iterator<Item = &VulnerabilityRecord> {
        self.related
            .iter()
            .filter(|r| r.package_id == self.id && r.version == self.version)
    }
}

/// Who has to apply a recommended update.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "package")]
pub enum ActionOwner {
    /// The audited project itself declares the dependency.
    Project,
    /// An upstream package declares it; its maintainer must release first.
    Package(PackageId),
}

impl std::fmt::Display for ActionOwner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionOwner::Project => write!(f, "project"),
            ActionOwner::Package(id) => write!(f, "{}", id),
        }
    }
}

/// A deduplicated remediation recommendation: update `dependency` to
/// `version`, applied by `owner`. Equal tuples produced under different
/// ancestor paths or frameworks collapse into one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Action {
    pub owner: ActionOwner,
    pub dependency: PackageId,
    pub version: PackageVersion,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vulnerability_audit::domain::{Advisory, Severity};
    use std::collections::BTreeSet;

    fn record(package: &str, version: &str, advisory_id: &str) -> VulnerabilityRecord {
        VulnerabilityRecord {
            package_id: PackageId::new(package).unwrap(),
            version: PackageVersion::parse(version).unwrap(),
            advisory: Advisory {
                id: advisory_id.to_string(),
                url: format!("https://github.com/advisories/{}", advisory_id),
                severity: Severity::High,
            },
        }
    }

    #[test]
    fn test_clean_fix() {
        let candidate = UpdateCandidate {
            version: PackageVersion::parse("13.0.3").unwrap(),
            solved: vec![record("Newtonsoft.Json", "9.0.1", "GHSA-1")],
            still_present: vec![],
            newly_introduced: vec![],
        };
        assert!(candidate.is_clean_fix());
    }

    #[test]
    fn test_dirty_fix_is_not_clean() {
        let candidate = UpdateCandidate {
            version: PackageVersion::parse("10.0.0").unwrap(),
            solved: vec![record("pkg", "1.0.0", "GHSA-1")],
            still_present: vec![],
            newly_introduced: vec![record("pkg", "10.0.0", "GHSA-2")],
        };
        assert!(!candidate.is_clean_fix());
    }

    #[test]
    fn test_actions_collapse_in_sets() {
        let action = |owner: ActionOwner| Action {
            owner,
            dependency: PackageId::new("Vuln").unwrap(),
            version: PackageVersion::parse("2.1.0").unwrap(),
        };

        let mut set = BTreeSet::new();
        set.insert(action(ActionOwner::Package(
            PackageId::new("Shared").unwrap(),
        )));
        // same tuple with different id casing collapses
        set.insert(action(ActionOwner::Package(
            PackageId::new("shared").unwrap(),
        )));
        set.insert(action(ActionOwner::Project));

        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_action_owner_ordering_puts_project_first() {
        assert!(ActionOwner::Project < ActionOwner::Package(PackageId::new("a").unwrap()));
    }

    #[test]
    fn test_own_vulnerabilities_excludes_descendants() {
        let attribution = TopLevelAttribution {
            id: PackageId::new("App").unwrap(),
            version: PackageVersion::parse("1.0.0").unwrap(),
            kind: PackageKind::Project,
            framework: "net8.0".to_string(),
            related: vec![
                record("App", "1.0.0", "GHSA-own"),
                record("Dep", "2.0.0", "GHSA-child"),
            ],
            best_update: None,
            children: vec![],
        };

        let own: Vec<&str> = attribution
            .own_vulnerabilities()
            .map(|r| r.advisory.id.as_str())
            .collect();
        assert_eq!(own, vec!["GHSA-own"]);
    }
}
