use serde::{Deserialize, Serialize};

/// Physical medium a body belongs to. Assigned when the body is created and
/// inherited by every fragment a partition produces, so downstream
/// classification never has to re-derive it from position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Material {
    Fluid,
    Solid,
}

impl Material {
    pub fn label(&self) -> &'static str {
        match self {
            Material::Fluid => "fluid",
            Material::Solid => "solid",
        }
    }
}
