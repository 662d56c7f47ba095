use classify_ops::ClassificationReport;
use construct_ops::{BodyRegistry, ComponentKind, ComponentTree};
use rig_types::{Material, ParameterSet};
use serde::{Deserialize, Serialize};

use crate::errors::ExportError;
use crate::metadata::DocumentMetadata;

/// Current document format version.
pub const FORMAT_VERSION: u32 = 1;

/// Format identifier written into every document.
pub const FORMAT_NAME: &str = "rig-geometry";

/// The top-level document structure.
#[derive(Debug, Clone, Serialize)]
pub struct RigDocument {
    /// Format identifier.
    pub format: String,
    /// Format version number.
    pub version: u32,
    /// Document metadata.
    pub metadata: DocumentMetadata,
    /// The parameter set the geometry was built from.
    pub params: ParameterSet,
    /// Per-component body counts.
    pub components: Vec<ComponentSummary>,
    /// All named selection groups.
    pub report: ClassificationReport,
}

/// Condensed view of one assembly component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentSummary {
    pub name: String,
    pub kind: ComponentKind,
    /// Total bodies in the component.
    pub bodies: usize,
    /// How many of those carry the solid material tag.
    pub solid_bodies: usize,
}

/// Summarize every component of the tree, counting solid-tagged bodies
/// through the registry.
pub fn summarize_components(tree: &ComponentTree, registry: &BodyRegistry) -> Vec<ComponentSummary> {
    tree.components()
        .iter()
        .map(|component| {
            let solid_bodies = component
                .bodies
                .iter()
                .filter(|key| {
                    registry
                        .get(**key)
                        .is_some_and(|record| record.material == Material::Solid)
                })
                .count();
            ComponentSummary {
                name: component.name.clone(),
                kind: component.kind,
                bodies: component.bodies.len(),
                solid_bodies,
            }
        })
        .collect()
}

/// File stem encoding fin height and pitch, e.g. `20-050` for
/// height 0.2 and pitch 5.0.
pub fn document_stem(height: f64, pitch: f64) -> String {
    format!(
        "{:02}-{:03}",
        (height * 100.0).round() as i64,
        (pitch * 10.0).round() as i64
    )
}

/// Serialize a rig document to a pretty-printed JSON string.
pub fn save_document(document: &RigDocument) -> String {
    serde_json::to_string_pretty(document).expect("RigDocument serialization should never fail")
}

/// Write a rig document into `dir` under its parameter-derived stem.
pub fn write_document(document: &RigDocument, dir: &std::path::Path) -> Result<std::path::PathBuf, ExportError> {
    let stem = document_stem(document.params.height, document.params.pitch);
    let path = dir.join(format!("{stem}.json"));
    std::fs::write(&path, save_document(document))?;
    Ok(path)
}

impl RigDocument {
    /// Assemble a document from the build artifacts.
    pub fn new(
        metadata: DocumentMetadata,
        params: ParameterSet,
        tree: &ComponentTree,
        registry: &BodyRegistry,
        report: ClassificationReport,
    ) -> Self {
        Self {
            format: FORMAT_NAME.to_string(),
            version: FORMAT_VERSION,
            metadata,
            params,
            components: summarize_components(tree, registry),
            report,
        }
    }

    /// Count cell components, ignoring stabilizers.
    pub fn cell_count(&self) -> usize {
        self.components
            .iter()
            .filter(|c| c.kind == ComponentKind::Cell)
            .count()
    }
}
