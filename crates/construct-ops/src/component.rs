use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::registry::{BodyKey, BodyRegistry};
use crate::types::ConstructionError;

/// Structural role of a component in the rig assembly. Downstream code
/// addresses components by role and order, never by absolute index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ComponentKind {
    /// One periodic cell of the working section.
    Cell,
    /// Smooth entry or exit section.
    Stabilizer,
}

/// Named group of bodies.
#[derive(Debug, Clone)]
pub struct Component {
    pub id: Uuid,
    pub name: String,
    pub kind: ComponentKind,
    pub bodies: Vec<BodyKey>,
}

/// Flat assembly tree: a list of components plus whatever is still at the
/// registry root.
#[derive(Debug, Default)]
pub struct ComponentTree {
    components: Vec<Component>,
}

impl ComponentTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves every root body of the registry into a new component.
    pub fn group_root(
        &mut self,
        registry: &mut BodyRegistry,
        name: &str,
        kind: ComponentKind,
    ) -> Result<usize, ConstructionError> {
        let bodies = registry.take_root();
        if bodies.is_empty() {
            return Err(ConstructionError::NoRootBodies);
        }
        debug!(name, count = bodies.len(), "grouped root bodies");
        self.components.push(Component {
            id: Uuid::new_v4(),
            name: name.to_string(),
            kind,
            bodies,
        });
        Ok(self.components.len() - 1)
    }

    pub fn push(&mut self, component: Component) -> usize {
        self.components.push(component);
        self.components.len() - 1
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn component(&self, index: usize) -> Result<&Component, ConstructionError> {
        self.components
            .get(index)
            .ok_or(ConstructionError::UnknownComponent(index))
    }

    /// Indices of components of one kind, in creation order.
    pub fn by_kind(&self, kind: ComponentKind) -> Vec<usize> {
        self.components
            .iter()
            .enumerate()
            .filter(|(_, c)| c.kind == kind)
            .map(|(i, _)| i)
            .collect()
    }

    /// Total number of bodies across all components.
    pub fn body_count(&self) -> usize {
        self.components.iter().map(|c| c.bodies.len()).sum()
    }

    /// Every body key in every component, in tree order.
    pub fn all_bodies(&self) -> impl Iterator<Item = BodyKey> + '_ {
        self.components.iter().flat_map(|c| c.bodies.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rig_kernel::{Kernel, MergeMode, PrismKernel};
    use rig_types::{CurveLoop, CurveSegment, Frame, Material, Point3, Profile, Vec3};

    use crate::registry::{BodyRecord, OpKind, Provenance};

    fn record(kernel: &mut PrismKernel) -> BodyRecord {
        let pts = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let segments = (0..4)
            .map(|i| CurveSegment::Line {
                start: pts[i],
                end: pts[(i + 1) % 4],
            })
            .collect();
        let face = kernel
            .planar_face(&Profile {
                plane: Frame::xy_at(0.0),
                loops: vec![CurveLoop { segments }],
            })
            .unwrap();
        let handle = kernel
            .extrude_face(face, Vec3::new(0.0, 0.0, 1.0), 1.0, MergeMode::ForceIndependent)
            .unwrap();
        BodyRecord {
            handle,
            material: Material::Fluid,
            provenance: Provenance::created(OpKind::Extrude),
        }
    }

    #[test]
    fn grouping_empties_the_root() {
        let mut kernel = PrismKernel::new();
        let mut registry = BodyRegistry::new();
        let mut tree = ComponentTree::new();
        let a = registry.append_root(record(&mut kernel));
        let b = registry.append_root(record(&mut kernel));

        let idx = tree
            .group_root(&mut registry, "test", ComponentKind::Cell)
            .unwrap();
        assert!(registry.root_bodies().is_empty());
        assert_eq!(tree.component(idx).unwrap().bodies, vec![a, b]);
        assert!(matches!(
            tree.group_root(&mut registry, "again", ComponentKind::Cell),
            Err(ConstructionError::NoRootBodies)
        ));
    }

    #[test]
    fn components_are_found_by_kind_in_order() {
        let mut kernel = PrismKernel::new();
        let mut registry = BodyRegistry::new();
        let mut tree = ComponentTree::new();
        registry.append_root(record(&mut kernel));
        tree.group_root(&mut registry, "test", ComponentKind::Cell)
            .unwrap();
        registry.append_root(record(&mut kernel));
        let stab = tree
            .group_root(&mut registry, "stab", ComponentKind::Stabilizer)
            .unwrap();
        assert_eq!(tree.by_kind(ComponentKind::Stabilizer), vec![stab]);
        assert_eq!(tree.by_kind(ComponentKind::Cell), vec![0]);
    }
}
