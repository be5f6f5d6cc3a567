use crate::vulnerability_audit::domain::{
    AdvisoryIndex, DependencyGraph, NodeId, PackageId, TopLevelAttribution, VulnerabilityRecord,
};
use std::collections::{BTreeMap, HashSet};

/// Rolls per-target dependency graphs up into an attribution forest.
///
/// Each target package produces its own graph; this service merges them per
/// top-level root so a package depending on several vulnerable targets gets
/// one attribution tree carrying all of them.
///
/// This service contains pure business logic with no I/O dependencies.
pub struct VulnerabilityAggregator;

impl VulnerabilityAggregator {
    /// Merges the framework's per-target graphs and attributes every
    /// vulnerability to the subgraph that reaches it.
    ///
    /// The result is pruned: a node appears only when it is vulnerable
    /// itself or has a vulnerable descendant. Roots are ordered by first
    /// appearance across the input graphs, children by package id.
    pub fn attribute(
        framework: &str,
        graphs: &[&DependencyGraph],
        index: &AdvisoryIndex,
    ) -> Vec<TopLevelAttribution> {
        // group roots across graphs by package id, keeping first-seen order
        let mut order: Vec<PackageId> = Vec::new();
        let mut groups: BTreeMap<PackageId, Vec<(&DependencyGraph, NodeId)>> = BTreeMap::new();

        for graph in graphs {
            for &root in graph.roots() {
                let id = graph.node(root).id.clone();
                if !groups.contains_key(&id) {
                    order.push(id.clone());
                }
                groups.entry(id).or_default().push((graph, root));
            }
        }

        order
            .into_iter()
            .filter_map(|id| {
                let occurrences = groups.remove(&id).unwrap_or_default();
                Self::attribute_node(framework, &occurrences, index, &mut HashSet::new())
            })
            .collect()
    }

    /// Builds the attribution for one package, merging every graph occurrence
    /// of it. All occurrences share one resolved version because graphs are
    /// framework-scoped.
    ///
    /// `path` holds the package ids on the current descent; revisiting one
    /// means the declared dependencies are cyclic, and the re-entry is pruned
    /// rather than followed.
    fn attribute_node(
        framework: &str,
        occurrences: &[(&DependencyGraph, NodeId)],
        index: &AdvisoryIndex,
        path: &mut HashSet<PackageId>,
    ) -> Option<TopLevelAttribution> {
        let (first_graph, first_node) = occurrences.first()?;
        let data = first_graph.node(*first_node);

        if !path.insert(data.id.clone()) {
            return None;
        }

        // merge children across occurrences by package id, ordered by id
        let mut child_groups: BTreeMap<PackageId, Vec<(&DependencyGraph, NodeId)>> =
            BTreeMap::new();
        for &(graph, node) in occurrences {
            for &child in graph.node(node).children() {
                child_groups
                    .entry(graph.node(child).id.clone())
                    .or_default()
                    .push((graph, child));
            }
        }

        let children: Vec<TopLevelAttribution> = child_groups
            .values()
            .filter_map(|group| Self::attribute_node(framework, group, index, path))
            .collect();

        path.remove(&data.id);

        // related = own advisories plus everything the children carry,
        // deduplicated by advisory identifier
        let mut related: BTreeMap<String, VulnerabilityRecord> = BTreeMap::new();
        for record in index.records_for(&data.id, &data.version) {
            related.insert(record.advisory.id.clone(), record);
        }
        for child in &children {
            for record in &child.related {
                related
                    .entry(record.advisory.id.clone())
                    .or_insert_with(|| record.clone());
            }
        }

        if related.is_empty() {
            return None;
        }

        Some(TopLevelAttribution {
            id: data.id.clone(),
            version: data.version.clone(),
            kind: data.kind,
            framework: framework.to_string(),
            related: related.into_values().collect(),
            best_update: None,
            children,
        })
    }
}
