use crate::vulnerability_audit::domain::{
    AdvisoryIndex, TopLevelAttribution, UpdateCandidate, VulnerabilityRecord,
};
use std::collections::HashSet;

/// Evaluates update candidates for every node of an attribution forest and
/// selects the best one per node.
///
/// This service contains pure business logic with no I/O dependencies.
pub struct RemediationRecommender;

impl RemediationRecommender {
    /// Fills in `best_update` for every node of the forest, depth-first.
    pub fn annotate_forest(forest: &mut [TopLevelAttribution], index: &AdvisoryIndex) {
        for attribution in forest {
            Self::annotate(attribution, index);
        }
    }

    fn annotate(attribution: &mut TopLevelAttribution, index: &AdvisoryIndex) {
        attribution.best_update = Self::recommend(attribution, index);
        for child in &mut attribution.children {
            Self::annotate(child, index);
        }
    }

    /// Picks the best update for one node, if any release improves on the
    /// current version.
    ///
    /// A candidate that introduces no new advisories always wins over one
    /// that does, regardless of how many advisories the latter would solve:
    /// among non-regressing candidates the lowest release solving the most
    /// of the node's own advisories is chosen. Regressing candidates are a
    /// last resort, ranked by solved count then by fewest new advisories.
    /// A candidate that solves nothing is never recommended.
    pub fn recommend(
        attribution: &TopLevelAttribution,
        index: &AdvisoryIndex,
    ) -> Option<UpdateCandidate> {
        let mut safe: Option<UpdateCandidate> = None;
        let mut regressing: Option<UpdateCandidate> = None;

        // releases are sorted ascending, so a strict-improvement scan keeps
        // the lowest version among equally good candidates
        for release in index.releases_for(&attribution.id) {
            if release.version <= attribution.version {
                continue;
            }
            let candidate = Self::evaluate(attribution, &release.version, index);
            if candidate.solved.is_empty() {
                continue;
            }

            if candidate.newly_introduced.is_empty() {
                let better = safe
                    .as_ref()
                    .map(|best| candidate.solved.len() > best.solved.len())
                    .unwrap_or(true);
                if better {
                    safe = Some(candidate);
                }
            } else {
                let better = regressing
                    .as_ref()
                    .map(|best| {
                        candidate.solved.len() > best.solved.len()
                            || (candidate.solved.len() == best.solved.len()
                                && candidate.newly_introduced.len()
                                    < best.newly_introduced.len())
                    })
                    .unwrap_or(true);
                if better {
                    regressing = Some(candidate);
                }
            }
        }

        safe.or(regressing)
    }

    /// Classifies one candidate version against the node's related
    /// vulnerabilities.
    ///
    /// Solved advisories are the node's own that disappear at the candidate.
    /// Descendant advisories can never be solved by updating this node alone,
    /// so they always stay in `still_present`.
    fn evaluate(
        attribution: &TopLevelAttribution,
        candidate_version: &crate::vulnerability_audit::domain::PackageVersion,
        index: &AdvisoryIndex,
    ) -> UpdateCandidate {
        let current_ids: HashSet<&str> = attribution
            .own_vulnerabilities()
            .map(|r| r.advisory.id.as_str())
            .collect();
        let candidate_advisories = index.advisories_for(&attribution.id, candidate_version);
        let candidate_ids: HashSet<&str> =
            candidate_advisories.iter().map(|a| a.id.as_str()).collect();

        let solved: Vec<VulnerabilityRecord> = attribution
            .own_vulnerabilities()
            .filter(|r| !candidate_ids.contains(r.advisory.id.as_str()))
            .cloned()
            .collect();
        let solved_ids: HashSet<&str> = solved.iter().map(|r| r.advisory.id.as_str()).collect();

        let still_present: Vec<VulnerabilityRecord> = attribution
            .related
            .iter()
            .filter(|r| !solved_ids.contains(r.advisory.id.as_str()))
            .cloned()
            .collect();

        let newly_introduced: Vec<VulnerabilityRecord> = candidate_advisories
            .iter()
            .filter(|a| !current_ids.contains(a.id.as_str()))
            .map(|advisory| VulnerabilityRecord {
                package_id: attribution.id.clone(),
                version: candidate_version.clone(),
                advisory: advisory.clone(),
            })
            .collect();

        UpdateCandidate {
            version: candidate_version.clone(),
            solved,
            still_present,
            newly_introduced,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vulnerability_audit::domain::{
        Advisory, PackageId, PackageKind, PackageMetadata, PackageRelease, PackageVersion,
        Severity,
    };
    use std::collections::HashSet as StdHashSet;

    fn id(s: &str) -> PackageId {
        PackageId::new(s).unwrap()
    }

    fn version(s: &str) -> PackageVersion {
        PackageVersion::parse(s).unwrap()
    }

    fn advisory(advisory_id: &str) -> Advisory {
        Advisory {
            id: advisory_id.to_string(),
            url: format!("https://github.com/advisories/{}", advisory_id),
            severity: Severity::High,
        }
    }

    fn release(release_version: &str, advisory_ids: &[&str]) -> PackageRelease {
        PackageRelease {
            version: version(release_version),
            advisories: advisory_ids.iter().map(|a| advisory(a)).collect(),
        }
    }

    fn index_of(package: &str, releases: Vec<PackageRelease>) -> AdvisoryIndex {
        AdvisoryIndex::from_metadata(
            vec![PackageMetadata {
                id: id(package),
                releases,
            }],
            &StdHashSet::new(),
            false,
        )
    }

    fn record(package: &str, record_version: &str, advisory_id: &str) -> VulnerabilityRecord {
        VulnerabilityRecord {
            package_id: id(package),
            version: version(record_version),
            advisory: advisory(advisory_id),
        }
    }

    fn attribution(
        package: &str,
        current: &str,
        related: Vec<VulnerabilityRecord>,
    ) -> TopLevelAttribution {
        TopLevelAttribution {
            id: id(package),
            version: version(current),
            kind: PackageKind::Package,
            framework: "net8.0".to_string(),
            related,
            best_update: None,
            children: vec![],
        }
    }

    #[test]
    fn test_lowest_clean_fix_wins() {
        let index = index_of(
            "Newtonsoft.Json",
            vec![
                release("9.0.1", &["CVE-X"]),
                release("12.0.1", &["CVE-X"]),
                release("13.0.1", &[]),
                release("13.0.3", &[]),
            ],
        );
        let node = attribution(
            "Newtonsoft.Json",
            "9.0.1",
            vec![record("Newtonsoft.Json", "9.0.1", "CVE-X")],
        );

        let best = RemediationRecommender::recommend(&node, &index).unwrap();
        assert_eq!(best.version.as_str(), "13.0.1");
        assert!(best.is_clean_fix());
        assert_eq!(best.solved.len(), 1);
    }

    #[test]
    fn test_descendant_advisory_blocks_clean_fix() {
        let index = index_of("Mid", vec![release("1.0.0", &["GHSA-own"]), release("2.0.0", &[])]);
        let node = attribution(
            "Mid",
            "1.0.0",
            vec![
                record("Mid", "1.0.0", "GHSA-own"),
                record("Leaf", "3.0.0", "GHSA-leaf"),
            ],
        );

        let best = RemediationRecommender::recommend(&node, &index).unwrap();
        assert_eq!(best.version.as_str(), "2.0.0");
        assert_eq!(best.solved.len(), 1);
        assert!(!best.is_clean_fix());
        assert_eq!(best.still_present.len(), 1);
        assert_eq!(best.still_present[0].advisory.id, "GHSA-leaf");
    }

    #[test]
    fn test_non_regressing_update_beats_one_solving_more() {
        // a descendant advisory keeps every candidate from being a clean fix,
        // but that must not let a regressing release outrank a safe one
        let index = index_of(
            "Mid",
            vec![
                release("1.0.0", &["GHSA-1", "GHSA-2"]),
                release("2.0.0", &["GHSA-2"]),
                release("3.0.0", &["GHSA-new"]),
            ],
        );
        let node = attribution(
            "Mid",
            "1.0.0",
            vec![
                record("Mid", "1.0.0", "GHSA-1"),
                record("Mid", "1.0.0", "GHSA-2"),
                record("Leaf", "4.0.0", "GHSA-leaf"),
            ],
        );

        let best = RemediationRecommender::recommend(&node, &index).unwrap();
        // 3.0.0 solves both own advisories but introduces GHSA-new;
        // 2.0.0 solves only GHSA-1 without regression and must win
        assert_eq!(best.version.as_str(), "2.0.0");
        assert_eq!(best.solved.len(), 1);
        assert!(best.newly_introduced.is_empty());
        assert!(!best.is_clean_fix());
    }

    #[test]
    fn test_dirty_fallback_minimizes_new_vulnerabilities() {
        let index = index_of(
            "pkg",
            vec![
                release("1.0.0", &["GHSA-1", "GHSA-2"]),
                release("2.0.0", &["GHSA-2", "GHSA-new-a", "GHSA-new-b"]),
                release("3.0.0", &["GHSA-2", "GHSA-new-a"]),
            ],
        );
        let node = attribution(
            "pkg",
            "1.0.0",
            vec![record("pkg", "1.0.0", "GHSA-1"), record("pkg", "1.0.0", "GHSA-2")],
        );

        let best = RemediationRecommender::recommend(&node, &index).unwrap();
        // both solve only GHSA-1; 3.0.0 introduces fewer new advisories
        assert_eq!(best.version.as_str(), "3.0.0");
        assert_eq!(best.solved.len(), 1);
        assert_eq!(best.newly_introduced.len(), 1);
    }

    #[test]
    fn test_clean_fix_preferred_over_dirty_solving_more() {
        let index = index_of(
            "pkg",
            vec![
                release("1.0.0", &["GHSA-1"]),
                release("2.0.0", &["GHSA-swap"]),
                release("3.0.0", &[]),
            ],
        );
        let node = attribution("pkg", "1.0.0", vec![record("pkg", "1.0.0", "GHSA-1")]);

        let best = RemediationRecommender::recommend(&node, &index).unwrap();
        assert_eq!(best.version.as_str(), "3.0.0");
        assert!(best.is_clean_fix());
    }

    #[test]
    fn test_no_candidate_solving_anything_yields_none() {
        let index = index_of(
            "pkg",
            vec![release("1.0.0", &["GHSA-1"]), release("2.0.0", &["GHSA-1"])],
        );
        let node = attribution("pkg", "1.0.0", vec![record("pkg", "1.0.0", "GHSA-1")]);

        assert!(RemediationRecommender::recommend(&node, &index).is_none());
    }

    #[test]
    fn test_releases_below_current_are_skipped() {
        let index = index_of(
            "pkg",
            vec![release("0.9.0", &[]), release("1.0.0", &["GHSA-1"])],
        );
        let node = attribution("pkg", "1.0.0", vec![record("pkg", "1.0.0", "GHSA-1")]);

        assert!(RemediationRecommender::recommend(&node, &index).is_none());
    }

    #[test]
    fn test_annotate_forest_reaches_children() {
        let index = index_of("Leaf", vec![release("1.0.0", &["GHSA-1"]), release("2.0.0", &[])]);

        let mut forest = vec![TopLevelAttribution {
            id: id("App"),
            version: version("1.0.0"),
            kind: PackageKind::Project,
            framework: "net8.0".to_string(),
            related: vec![record("Leaf", "1.0.0", "GHSA-1")],
            best_update: None,
            children: vec![attribution(
                "Leaf",
                "1.0.0",
                vec![record("Leaf", "1.0.0", "GHSA-1")],
            )],
        }];

        RemediationRecommender::annotate_forest(&mut forest, &index);

        // the project has no own advisories so nothing to recommend for it
        assert!(forest[0].best_update.is_none());
        let leaf_update = forest[0].children[0].best_update.as_ref().unwrap();
        assert_eq!(leaf_update.version.as_str(), "2.0.0");
        assert!(leaf_update.is_clean_fix());
    }
}
