use classify_ops::GroupStore;
use construct_ops::{BodyRegistry, ComponentTree};
use rig_kernel::{KernelBundle, PrismKernel};

/// Everything one rig build accumulates: the kernel holding the geometry,
/// the body registry, the component tree, and the selection groups produced
/// by classification.
pub struct BuildSession {
    pub kernel: Box<dyn KernelBundle>,
    pub registry: BodyRegistry,
    pub tree: ComponentTree,
    pub groups: GroupStore,
}

impl BuildSession {
    pub fn new(kernel: Box<dyn KernelBundle>) -> Self {
        Self {
            kernel,
            registry: BodyRegistry::new(),
            tree: ComponentTree::new(),
            groups: GroupStore::new(),
        }
    }

    /// A session backed by the analytic prism kernel.
    pub fn with_prism_kernel() -> Self {
        Self::new(Box::new(PrismKernel::new()))
    }

    /// Total bodies across all registered components and roots.
    pub fn body_count(&self) -> usize {
        self.registry.len()
    }
}
