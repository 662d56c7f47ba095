pub mod classifier;
pub mod groups;
pub mod predicate;

pub use classifier::*;
pub use groups::*;
pub use predicate::*;
