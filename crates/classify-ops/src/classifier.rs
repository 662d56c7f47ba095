use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use construct_ops::{BodyKey, BodyRegistry};
use rig_kernel::{KernelId, KernelIntrospect, SolidHandle};
use rig_types::TopoKind;

use crate::groups::{ClassificationError, EntityRef, GroupStore, GroupSummary, SelectionGroup};
use crate::predicate::{EntitySignature, Predicate};

/// Tolerance-based selection of faces, edges, and bodies into named groups.
///
/// Selections are resolved against live kernel signatures, so the classifier
/// runs after assembly and topology unification. Shared faces are seen once
/// per body with that body's outward normal; group membership is
/// deduplicated by entity, so a face matched through two bodies appears once.
pub struct SelectionClassifier<'a> {
    introspect: &'a dyn KernelIntrospect,
    registry: &'a BodyRegistry,
    rel_tol: f64,
    store: GroupStore,
}

impl<'a> SelectionClassifier<'a> {
    pub fn new(
        introspect: &'a dyn KernelIntrospect,
        registry: &'a BodyRegistry,
        rel_tol: f64,
    ) -> Self {
        Self {
            introspect,
            registry,
            rel_tol,
            store: GroupStore::new(),
        }
    }

    pub fn store(&self) -> &GroupStore {
        &self.store
    }

    pub fn into_store(self) -> GroupStore {
        self.store
    }

    fn handle(&self, body: BodyKey) -> Result<SolidHandle, ClassificationError> {
        self.registry
            .get(body)
            .map(|r| r.handle.clone())
            .ok_or(ClassificationError::UnknownBody(body))
    }

    /// Creates a face group from all faces of `bodies` matching `predicate`.
    /// Returns the member count.
    pub fn classify_faces(
        &mut self,
        name: &str,
        bodies: &[BodyKey],
        predicate: &Predicate,
    ) -> Result<usize, ClassificationError> {
        let mut seen: HashSet<KernelId> = HashSet::new();
        let mut members = Vec::new();
        for body in bodies {
            let handle = self.handle(*body)?;
            for face in self.introspect.solid_faces(&handle)? {
                let Some(sig) = self.introspect.face_signature(&handle, face) else {
                    continue;
                };
                if predicate.matches(&EntitySignature::Face(sig), self.rel_tol)
                    && seen.insert(face)
                {
                    members.push(EntityRef::Face(face));
                }
            }
        }
        self.finish_group(name, TopoKind::Face, members)
    }

    /// Like [`classify_faces`](Self::classify_faces), but for selections
    /// that must resolve to exactly one face, e.g. a probe location. Any
    /// other match count is a [`ClassificationError::Ambiguous`] error.
    pub fn classify_unique_face(
        &mut self,
        name: &str,
        bodies: &[BodyKey],
        predicate: &Predicate,
    ) -> Result<(), ClassificationError> {
        let mut seen: HashSet<KernelId> = HashSet::new();
        for body in bodies {
            let handle = self.handle(*body)?;
            for face in self.introspect.solid_faces(&handle)? {
                let Some(sig) = self.introspect.face_signature(&handle, face) else {
                    continue;
                };
                if predicate.matches(&EntitySignature::Face(sig), self.rel_tol) {
                    seen.insert(face);
                }
            }
        }
        if seen.len() != 1 {
            return Err(ClassificationError::Ambiguous {
                name: name.into(),
                matched: seen.len(),
            });
        }
        let members = seen.into_iter().map(EntityRef::Face).collect();
        self.finish_group(name, TopoKind::Face, members)?;
        Ok(())
    }

    /// Creates an edge group from all edges of `bodies` matching `predicate`.
    pub fn classify_edges(
        &mut self,
        name: &str,
        bodies: &[BodyKey],
        predicate: &Predicate,
    ) -> Result<usize, ClassificationError> {
        let mut seen: HashSet<KernelId> = HashSet::new();
        let mut members = Vec::new();
        for body in bodies {
            let handle = self.handle(*body)?;
            for face in self.introspect.solid_faces(&handle)? {
                for edge in self.introspect.face_edges(face)? {
                    let Some(sig) = self.introspect.edge_signature(edge) else {
                        continue;
                    };
                    if predicate.matches(&EntitySignature::Edge(sig), self.rel_tol)
                        && seen.insert(edge)
                    {
                        members.push(EntityRef::Edge(edge));
                    }
                }
            }
        }
        self.finish_group(name, TopoKind::Edge, members)
    }

    /// Creates a body group from an explicit key list.
    pub fn classify_bodies(
        &mut self,
        name: &str,
        bodies: Vec<BodyKey>,
    ) -> Result<usize, ClassificationError> {
        for body in &bodies {
            if !self.registry.contains(*body) {
                return Err(ClassificationError::UnknownBody(*body));
            }
        }
        let members = bodies.into_iter().map(EntityRef::Body).collect();
        self.finish_group(name, TopoKind::Body, members)
    }

    fn finish_group(
        &mut self,
        name: &str,
        kind: TopoKind,
        members: Vec<EntityRef>,
    ) -> Result<usize, ClassificationError> {
        if members.is_empty() {
            return Err(ClassificationError::EmptyGroup { name: name.into() });
        }
        let count = members.len();
        debug!(name, ?kind, count, "classified group");
        self.store.insert(SelectionGroup {
            name: name.to_string(),
            kind,
            members,
        })?;
        Ok(count)
    }

    /// Coverage report over `bodies`: every exterior boundary face of the
    /// model should be claimed by some face group, so
    /// `unclassified_boundary_faces` of a complete classification is zero.
    pub fn report(&self, bodies: &[BodyKey]) -> Result<ClassificationReport, ClassificationError> {
        let mut faces: HashSet<KernelId> = HashSet::new();
        for body in bodies {
            let handle = self.handle(*body)?;
            faces.extend(self.introspect.solid_faces(&handle)?);
        }
        let boundary: Vec<KernelId> = faces
            .iter()
            .copied()
            .filter(|f| self.introspect.face_use_count(*f) == 1)
            .collect();
        let classified: HashSet<KernelId> = self.store.classified_faces().collect();
        let unclassified = boundary.iter().filter(|f| !classified.contains(f)).count();

        Ok(ClassificationReport {
            groups: self
                .store
                .iter()
                .map(|g| GroupSummary {
                    name: g.name.clone(),
                    kind: g.kind,
                    members: g.members.len(),
                })
                .collect(),
            total_faces: faces.len(),
            boundary_faces: boundary.len(),
            unclassified_boundary_faces: unclassified,
        })
    }
}

/// What the classifier produced, plus boundary coverage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub groups: Vec<GroupSummary>,
    /// Distinct faces across the inspected bodies.
    pub total_faces: usize,
    /// Faces used by exactly one body (the model's exterior).
    pub boundary_faces: usize,
    /// Exterior faces no face group claimed.
    pub unclassified_boundary_faces: usize,
}

impl ClassificationReport {
    pub fn group(&self, name: &str) -> Option<&GroupSummary> {
        self.groups.iter().find(|g| g.name == name)
    }
}
