pub mod approx;
pub mod curve;
pub mod geom;
pub mod params;
pub mod tags;
pub mod topo;

pub use approx::*;
pub use curve::*;
pub use geom::*;
pub use params::*;
pub use tags::*;
pub use topo::*;
