pub mod corrugation;
pub mod error;
pub mod finned_tube;
pub mod session;
pub mod sweep;

pub use error::EngineError;
pub use finned_tube::{assemble, build_rig, build_stabilizer, build_unit_cell, classify};
pub use session::BuildSession;
pub use sweep::{run_sweep, RunOutcome, RunRecord, SweepGrid};
