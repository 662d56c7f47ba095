use classify_ops::ClassificationError;
use construct_ops::{ConstructionError, PartitionError, ProfileError};
use rig_kernel::KernelError;
use rig_types::ParamError;

/// Errors from rig assembly and classification.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid parameters: {0}")]
    Params(#[from] ParamError),

    #[error("profile construction failed: {0}")]
    Profile(#[from] ProfileError),

    #[error("construction failed: {0}")]
    Construction(#[from] ConstructionError),

    #[error("partition failed: {0}")]
    Partition(#[from] PartitionError),

    #[error("classification failed: {0}")]
    Classification(#[from] ClassificationError),

    #[error("kernel error: {0}")]
    Kernel(#[from] KernelError),

    #[error("cut addresses root slot {slot}, but only {available} bodies exist")]
    BadCutSlot { slot: usize, available: usize },

    #[error("{stage} left {actual} bodies, expected {expected}")]
    UnexpectedBodyCount {
        stage: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("solid fin fragments sit at root slots {actual:?}, expected {expected:?}")]
    FinLayout {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("{count} exterior faces matched no selection group")]
    UncoveredBoundary { count: usize },
}
