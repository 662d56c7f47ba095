use thiserror::Error;

use rig_kernel::KernelError;

use crate::registry::BodyKey;

#[derive(Debug, Error)]
pub enum ConstructionError {
    #[error(transparent)]
    Kernel(#[from] KernelError),
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error("body {0:?} is not registered")]
    UnknownBody(BodyKey),
    #[error("component index {0} is out of range")]
    UnknownComponent(usize),
    #[error("no root bodies to group into a component")]
    NoRootBodies,
    #[error("replica count must be at least 1, got {0}")]
    BadReplicaCount(usize),
}

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("profile has no segments")]
    Empty,
    #[error("segment {index} does not lie in the profile plane")]
    OffPlane { index: usize },
    #[error("segment {index} does not connect to the open loop")]
    Disconnected { index: usize },
    #[error("last loop does not close")]
    Unclosed,
    #[error("segment {index} has zero length")]
    DegenerateSegment { index: usize },
    #[error("straight edges {first} and {second} cross each other")]
    SelfIntersecting { first: usize, second: usize },
}

#[derive(Debug, Error)]
pub enum PartitionError {
    #[error("body {0:?} is not registered")]
    UnknownBody(BodyKey),
    #[error("cutter plane misses body {body:?}")]
    Missed { body: BodyKey },
    #[error(transparent)]
    Kernel(#[from] KernelError),
}
