use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque reference to a solid owned by the kernel. Handles stay valid until
/// the solid is consumed by a split, merge, or delete.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SolidHandle(pub(crate) u64);

impl SolidHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Opaque reference to a face or edge entity inside the kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KernelId(pub(crate) u64);

impl KernelId {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Whether a sweep result merges into touching material or stays its own body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MergeMode {
    /// Always produce an independent body, even when it touches others.
    ForceIndependent,
    /// Fuse with an existing abutting body of the same cross-section.
    Add,
}

/// The two fragments a planar split produces, named by the side of the cutter
/// normal they fall on.
#[derive(Debug, Clone)]
pub struct SplitResult {
    pub negative: SolidHandle,
    pub positive: SolidHandle,
}

/// What a topology-unification pass did.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct UnifyStats {
    /// Number of coincident face pairs fused into shared faces.
    pub merged_faces: usize,
}

#[derive(Debug, Error)]
pub enum KernelError {
    #[error("solid {0} not found")]
    SolidNotFound(u64),
    #[error("face {0} not found")]
    FaceNotFound(u64),
    #[error("degenerate profile: {reason}")]
    DegenerateProfile { reason: String },
    #[error("cutter plane does not intersect the solid")]
    CutMissesSolid,
    #[error("invalid parameter: {reason}")]
    InvalidParameter { reason: String },
    #[error("unsupported operation: {reason}")]
    Unsupported { reason: String },
}
