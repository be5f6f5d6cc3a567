use super::package::{PackageId, PackageKind, PackageVersion};
use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};

/// Handle to a node inside a [`DependencyGraph`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// One package occurrence in a framework-scoped dependency graph.
///
/// Children are handles into the owning arena and are deduplicated by
/// package id: a framework's resolved graph carries exactly one version per
/// id, so id alone is sufficient identity within one graph. Graphs are never
/// merged across frameworks, which is what keeps that invariant safe.
#[derive(Debug, Clone)]
pub struct DependencyNode {
    pub id: PackageId,
    pub version: PackageVersion,
    pub kind: PackageKind,
    children: Vec<NodeId>,
}

impl DependencyNode {
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Path-preserving dependency graph for one (framework, target) traversal.
///
/// The arena owns every node; parents hold non-owning `NodeId` handles.
/// The id-keyed index doubles as the node cache: any two paths converging on
/// the same package share one node instance, so diamond-shaped graphs stay
/// linear in nodes and edges rather than exponential in paths.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    framework: String,
    nodes: Vec<DependencyNode>,
    index: HashMap<PackageId, NodeId>,
    roots: Vec<NodeId>,
}

impl DependencyGraph {
    pub fn new(framework: impl Into<String>) -> Self {
        Self {
            framework: framework.into(),
            nodes: Vec::new(),
            index: HashMap::new(),
            roots: Vec::new(),
        }
    }

    pub fn framework(&self) -> &str {
        &self.framework
    }

    pub fn contains(&self, id: &PackageId) -> bool {
        self.index.contains_key(id)
    }

    pub fn lookup(&self, id: &PackageId) -> Option<NodeId> {
        self.index.get(id).copied()
    }

    /// Returns the cached node for `id`, creating it if absent.
    pub fn intern(
        &mut self,
        id: PackageId,
        version: PackageVersion,
        kind: PackageKind,
    ) -> NodeId {
        if let Some(&existing) = self.index.get(&id) {
            return existing;
        }
        let node_id = NodeId(self.nodes.len());
        self.nodes.push(DependencyNode {
            id: id.clone(),
            version,
            kind,
            children: Vec::new(),
        });
        self.index.insert(id, node_id);
        node_id
    }

    /// Adds `child` to `parent`'s children unless a child with the same
    /// package id is already present.
    pub fn link(&mut self, parent: NodeId, child: NodeId) {
        let child_pkg = &self.nodes[child.0].id;
        let duplicate = self.nodes[parent.0]
            .children
            .iter()
            .any(|&c| &self.nodes[c.0].id == child_pkg);
        if !duplicate {
            self.nodes[parent.0].children.push(child);
        }
    }

    pub fn add_root(&mut self, root: NodeId) {
        if !self.roots.contains(&root) {
            self.roots.push(root);
        }
    }

    pub fn node(&self, id: NodeId) -> &DependencyNode {
        &self.nodes[id.0]
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Order-independent structural hash of a subtree.
    ///
    /// Child hashes are folded with XOR so two structurally identical
    /// subtrees hash the same regardless of discovery order. Revisited nodes
    /// on the current path contribute nothing, keeping cyclic graphs finite.
    pub fn subtree_hash(&self, node: NodeId) -> u64 {
        self.subtree_hash_inner(node, &mut HashSet::new())
    }

    fn subtree_hash_inner(&self, node: NodeId, path: &mut HashSet<NodeId>) -> u64 {
        if !path.insert(node) {
            return 0;
        }
        let data = self.node(node);
        let mut hasher = DefaultHasher::new();
        data.id.hash(&mut hasher);
        data.version.hash(&mut hasher);
        let mut combined = hasher.finish();
        for &child in data.children() {
            combined ^= self.subtree_hash_inner(child, path);
        }
        path.remove(&node);
        combined
    }

    /// Structural equality between subtrees, possibly across graphs built by
    /// independent traversals. Children are matched by package id, so the
    /// comparison is insensitive to insertion order.
    pub fn subtree_eq(&self, node: NodeId, other: &DependencyGraph, other_node: NodeId) -> bool {
        self.subtree_eq_inner(node, other, other_node, &mut HashSet::new())
    }

    fn subtree_eq_inner(
        &self,
        node: NodeId,
        other: &DependencyGraph,
        other_node: NodeId,
        path: &mut HashSet<NodeId>,
    ) -> bool {
        let a = self.node(node);
        let b = other.node(other_node);
        if a.id != b.id || a.version != b.version {
            return false;
        }
        if !path.insert(node) {
            // reconverged on a node already being compared on this path
            return true;
        }

        let mut a_children: Vec<NodeId> = a.children().to_vec();
        let mut b_children: Vec<NodeId> = b.children().to_vec();
        a_children.sort_by(|x, y| self.node(*x).id.cmp(&self.node(*y).id));
        b_children.sort_by(|x, y| other.node(*x).id.cmp(&other.node(*y).id));

        let equal = a_children.len() == b_children.len()
            && a_children
                .iter()
                .zip(b_children.iter())
                .all(|(&ca, &cb)| self.subtree_eq_inner(ca, other, cb, path));

        path.remove(&node);
        equal
    }

    /// Renders every root-to-leaf path, one per line, for diagnostics.
    pub fn paths(&self, root: NodeId) -> Vec<String> {
        let mut paths = Vec::new();
        self.build_paths(root, &mut Vec::new(), &mut paths);
        paths
    }

    fn build_paths(&self, node: NodeId, current: &mut Vec<String>, paths: &mut Vec<String>) {
        let data = self.node(node);
        let label = format!("{} ({},{})", data.id, data.kind, data.version);
        if current.contains(&label) {
            paths.push(format!("{} -> {} (cycle)", current.join(" -> "), data.id));
            return;
        }
        current.push(label);
        if data.children().is_empty() {
            paths.push(current.join(" -> "));
        } else {
            for &child in data.children() {
                self.build_paths(child, current, paths);
            }
        }
        current.pop();
    }
}
