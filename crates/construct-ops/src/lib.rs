pub mod component;
pub mod partition;
pub mod profile;
pub mod registry;
pub mod replicate;
pub mod solid;
pub mod types;
pub mod unify;

pub use component::*;
pub use partition::*;
pub use profile::*;
pub use registry::*;
pub use replicate::*;
pub use solid::*;
pub use types::*;
pub use unify::*;
