use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};

use rig_kernel::SolidHandle;
use rig_types::Material;

new_key_type! {
    /// Stable key of a body in the [`BodyRegistry`].
    pub struct BodyKey;
}

/// How a body came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OpKind {
    Extrude,
    Revolve,
    Sweep,
    Split,
    Copy,
    Merge,
}

/// Construction history of one body. `parent` refers to the body this one
/// was derived from; the parent key may itself have been retired by a later
/// split, so it is a historical record, not a live reference.
#[derive(Debug, Clone, Copy)]
pub struct Provenance {
    pub op: OpKind,
    pub parent: Option<BodyKey>,
}

impl Provenance {
    pub fn created(op: OpKind) -> Provenance {
        Provenance { op, parent: None }
    }

    pub fn derived(op: OpKind, parent: BodyKey) -> Provenance {
        Provenance {
            op,
            parent: Some(parent),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BodyRecord {
    pub handle: SolidHandle,
    pub material: Material,
    pub provenance: Provenance,
}

/// Owns every body of the session and mirrors the modeling tree's root body
/// list. Bodies grouped into components leave the root list but stay in the
/// registry.
///
/// The root list order is load-bearing during construction: a split replaces
/// the input body in its slot and appends the other fragment at the end, so
/// scripted body indices stay meaningful through a cut sequence.
#[derive(Debug, Default)]
pub struct BodyRegistry {
    bodies: SlotMap<BodyKey, BodyRecord>,
    root: Vec<BodyKey>,
}

impl BodyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a body and appends it to the root list.
    pub fn append_root(&mut self, record: BodyRecord) -> BodyKey {
        let key = self.bodies.insert(record);
        self.root.push(key);
        key
    }

    /// Registers a body without putting it in the root list, for bodies born
    /// directly into a component.
    pub fn register_detached(&mut self, record: BodyRecord) -> BodyKey {
        self.bodies.insert(record)
    }

    /// Retires `old` and puts `record` in its place. If `old` occupied a
    /// root slot the new body takes that exact slot.
    pub fn replace(&mut self, old: BodyKey, record: BodyRecord) -> Option<BodyKey> {
        if !self.bodies.contains_key(old) {
            return None;
        }
        let key = self.bodies.insert(record);
        if let Some(slot) = self.root.iter_mut().find(|k| **k == old) {
            *slot = key;
        }
        self.bodies.remove(old);
        Some(key)
    }

    pub fn get(&self, key: BodyKey) -> Option<&BodyRecord> {
        self.bodies.get(key)
    }

    pub fn contains(&self, key: BodyKey) -> bool {
        self.bodies.contains_key(key)
    }

    pub fn root_bodies(&self) -> &[BodyKey] {
        &self.root
    }

    /// Empties the root list, leaving the bodies registered. Used when a
    /// component takes ownership of everything currently at the root.
    pub fn take_root(&mut self) -> Vec<BodyKey> {
        std::mem::take(&mut self.root)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyKey, &BodyRecord)> {
        self.bodies.iter()
    }

    /// Keys of all registered bodies with the given material, in registry order.
    pub fn material_bodies(&self, material: Material) -> Vec<BodyKey> {
        self.bodies
            .iter()
            .filter(|(_, r)| r.material == material)
            .map(|(k, _)| k)
            .collect()
    }
}
