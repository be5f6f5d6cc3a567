use crate::vulnerability_audit::domain::{
    DependencyGraph, FrameworkManifest, PackageId, ProjectManifest, ResolvedLibrary,
};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Builds path-preserving dependency graphs from a flat resolved-library
/// list, filtered down to the paths that reach a designated target package.
///
/// This service contains pure business logic with no I/O dependencies.
pub struct GraphBuilder;

/// One DFS frame: the package under inspection and a back-pointer to the
/// frame it was reached from. Frames live in a flat arena so back-pointer
/// chains can be walked after a frame is retired.
struct Frame {
    id: PackageId,
    parent: Option<usize>,
}

impl GraphBuilder {
    /// Finds all dependency graphs leading to `target` across the
    /// manifest's frameworks.
    ///
    /// Frameworks with no library matching the target are omitted entirely:
    /// absence of the target means no vulnerability path can exist there.
    /// A framework that resolves the target but has no top-level path to it
    /// maps to `None`.
    pub fn build_graphs(
        manifest: &ProjectManifest,
        target: &PackageId,
    ) -> BTreeMap<String, Option<DependencyGraph>> {
        let mut graphs = BTreeMap::new();

        for framework in &manifest.frameworks {
            if framework.library(target).is_none() {
                continue;
            }
            graphs.insert(
                framework.framework.clone(),
                Self::build_framework_graph(framework, target),
            );
        }

        graphs
    }

    /// Finds all dependency paths from the framework's top-level references
    /// to the target package.
    ///
    /// The `visited` set and the graph's node cache are shared across all
    /// top-level references: a subtree explored from one root is never
    /// re-expanded from another, which caps the work at O(edges) and makes
    /// reconverging paths share node instances.
    fn build_framework_graph(
        framework: &FrameworkManifest,
        target: &PackageId,
    ) -> Option<DependencyGraph> {
        let libraries: HashMap<&PackageId, &ResolvedLibrary> =
            framework.libraries.iter().map(|l| (&l.id, l)).collect();

        let mut graph = DependencyGraph::new(framework.framework.clone());
        let mut visited: HashSet<PackageId> = HashSet::new();

        for reference in &framework.top_level_references {
            Self::find_path_to_target(&reference.id, &libraries, &mut visited, &mut graph, target);

            if let Some(root) = graph.lookup(&reference.id) {
                graph.add_root(root);
            }
        }

        if graph.roots().is_empty() {
            None
        } else {
            Some(graph)
        }
    }

    /// Depth-first search from one top-level reference, using an explicit
    /// stack of frames instead of recursion so traversal depth stays bounded
    /// for arbitrarily deep dependency chains.
    fn find_path_to_target(
        root: &PackageId,
        libraries: &HashMap<&PackageId, &ResolvedLibrary>,
        visited: &mut HashSet<PackageId>,
        graph: &mut DependencyGraph,
        target: &PackageId,
    ) {
        let mut frames: Vec<Frame> = vec![Frame {
            id: root.clone(),
            parent: None,
        }];
        let mut stack: Vec<usize> = vec![0];

        while let Some(frame_ix) = stack.pop() {
            let current = frames[frame_ix].id.clone();

            // reaching the target, or reconverging on a package already in
            // the graph, retires this frame and links its path into the graph
            if &current == target || graph.contains(&current) {
                Self::materialize_path(frame_ix, &frames, libraries, graph);
                continue;
            }

            // already expanded without reaching the target: dead end
            if !visited.insert(current.clone()) {
                continue;
            }

            // a dependency id with no matching library is a recoverable gap;
            // the subtree is simply not expanded further
            if let Some(library) = libraries.get(&current) {
                for dependency in &library.dependencies {
                    frames.push(Frame {
                        id: dependency.clone(),
                        parent: Some(frame_ix),
                    });
                    stack.push(frames.len() - 1);
                }
            }
        }
    }

    /// Walks a retired frame's back-pointer chain from the target up to the
    /// top-level root, creating missing nodes and linking each consecutive
    /// (child, parent) pair. Because the node cache is keyed by id, a
    /// package discovered via two different roots produces one shared node
    /// with two inbound edges, not two subtrees.
    fn materialize_path(
        frame_ix: usize,
        frames: &[Frame],
        libraries: &HashMap<&PackageId, &ResolvedLibrary>,
        graph: &mut DependencyGraph,
    ) {
        // collect the chain first: if any id on it has no resolved library,
        // the whole path is dropped rather than partially linked
        let mut chain: Vec<&ResolvedLibrary> = Vec::new();
        let mut cursor = Some(frame_ix);
        while let Some(ix) = cursor {
            let frame = &frames[ix];
            match libraries.get(&frame.id) {
                Some(library) => chain.push(library),
                None => return,
            }
            cursor = frame.parent;
        }

        let mut child = None;
        for library in chain {
            let node = graph.intern(library.id.clone(), library.version.clone(), library.kind);
            if let Some(child) = child {
                graph.link(node, child);
            }
            child = Some(node);
        }
    }
}
