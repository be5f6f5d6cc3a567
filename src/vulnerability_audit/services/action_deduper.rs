use crate::vulnerability_audit::domain::{
    Action, ActionOwner, PackageKind, TopLevelAttribution,
};
use std::collections::BTreeMap;
use std::collections::BTreeSet;

/// Collapses annotated attribution forests into the minimal set of concrete
/// remediation actions.
///
/// This service contains pure business logic with no I/O dependencies.
pub struct ActionDeduper;

impl ActionDeduper {
    /// Walks every forest node and emits one action per (owner, dependency,
    /// version) tuple whose recommended update is a clean fix.
    ///
    /// The same vulnerable package reached through two ancestors, two roots
    /// or two frameworks collapses into one action because the set is keyed
    /// by the full tuple. Dirty recommendations stay in the report narrative
    /// but never become actions.
    pub fn collapse(forests: &[&[TopLevelAttribution]]) -> BTreeSet<Action> {
        let mut actions = BTreeSet::new();
        for forest in forests {
            for attribution in *forest {
                Self::walk(attribution, None, &mut actions);
            }
        }
        actions
    }

    fn walk(
        node: &TopLevelAttribution,
        parent: Option<&TopLevelAttribution>,
        actions: &mut BTreeSet<Action>,
    ) {
        if let Some(update) = &node.best_update {
            if update.is_clean_fix() && !update.solved.is_empty() {
                actions.insert(Action {
                    owner: Self::owner_of(parent),
                    dependency: node.id.clone(),
                    version: update.version.clone(),
                });
            }
        }
        for child in &node.children {
            Self::walk(child, Some(node), actions);
        }
    }

    /// The dependency's declaring side. A top-level node or a project-kind
    /// parent means the audited solution declares it directly.
    fn owner_of(parent: Option<&TopLevelAttribution>) -> ActionOwner {
        match parent {
            None => ActionOwner::Project,
            Some(p) if p.kind == PackageKind::Project => ActionOwner::Project,
            Some(p) => ActionOwner::Package(p.id.clone()),
        }
    }

    /// Groups actions by owner for presentation, project-owned first.
    pub fn group_by_owner(actions: &BTreeSet<Action>) -> BTreeMap<ActionOwner, Vec<&Action>> {
        let mut grouped: BTreeMap<ActionOwner, Vec<&Action>> = BTreeMap::new();
        for action in actions {
            grouped.entry(action.owner.clone()).or_default().push(action);
        }
        grouped
    }
}
