pub mod planar;
pub mod prism_kernel;
pub mod traits;
pub mod types;

pub use prism_kernel::PrismKernel;
pub use traits::{Kernel, KernelBundle, KernelIntrospect};
pub use types::*;
