use serde::{Deserialize, Serialize};
use thiserror::Error;

use construct_ops::BodyKey;
use rig_kernel::{KernelError, KernelId};
use rig_types::TopoKind;

#[derive(Debug, Error)]
pub enum ClassificationError {
    #[error("a selection group named `{0}` already exists")]
    DuplicateGroup(String),
    #[error("selection `{name}` matched no entities")]
    EmptyGroup { name: String },
    #[error("selection `{name}` expected exactly one entity, matched {matched}")]
    Ambiguous { name: String, matched: usize },
    #[error("body {0:?} is not registered")]
    UnknownBody(BodyKey),
    #[error(transparent)]
    Kernel(#[from] KernelError),
}

/// Member of a selection group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Body(BodyKey),
    Face(KernelId),
    Edge(KernelId),
}

/// One named selection, ready for export to a mesher.
#[derive(Debug, Clone)]
pub struct SelectionGroup {
    pub name: String,
    pub kind: TopoKind,
    pub members: Vec<EntityRef>,
}

/// All named selections of a session, in creation order. Names are unique.
#[derive(Debug, Default)]
pub struct GroupStore {
    groups: Vec<SelectionGroup>,
}

impl GroupStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, group: SelectionGroup) -> Result<(), ClassificationError> {
        if self.groups.iter().any(|g| g.name == group.name) {
            return Err(ClassificationError::DuplicateGroup(group.name));
        }
        self.groups.push(group);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&SelectionGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SelectionGroup> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Face ids referenced by any face group.
    pub fn classified_faces(&self) -> impl Iterator<Item = KernelId> + '_ {
        self.groups
            .iter()
            .filter(|g| g.kind == TopoKind::Face)
            .flat_map(|g| {
                g.members.iter().filter_map(|m| match m {
                    EntityRef::Face(id) => Some(*id),
                    _ => None,
                })
            })
    }
}

/// Per-group member count, for reports and documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSummary {
    pub name: String,
    pub kind: TopoKind,
    pub members: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_names_are_rejected() {
        let mut store = GroupStore::new();
        store
            .insert(SelectionGroup {
                name: "inlet".into(),
                kind: TopoKind::Face,
                members: vec![],
            })
            .unwrap();
        let err = store
            .insert(SelectionGroup {
                name: "inlet".into(),
                kind: TopoKind::Face,
                members: vec![],
            })
            .unwrap_err();
        assert!(matches!(err, ClassificationError::DuplicateGroup(_)));
        assert_eq!(store.len(), 1);
    }
}
