use classify_ops::ClassificationReport;
use rig_types::ParameterSet;
use serde::Deserialize;

use crate::errors::LoadError;
use crate::metadata::DocumentMetadata;
use crate::save::{ComponentSummary, FORMAT_NAME, FORMAT_VERSION};

/// The top-level document structure for deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct RigDocumentRaw {
    pub format: String,
    pub version: u32,
    pub metadata: DocumentMetadata,
    pub params: ParameterSet,
    pub components: Vec<ComponentSummary>,
    pub report: ClassificationReport,
}

/// Deserialize a rig document from a JSON string.
///
/// Validates the format identifier and version.
pub fn load_document(json: &str) -> Result<RigDocumentRaw, LoadError> {
    let raw: RigDocumentRaw =
        serde_json::from_str(json).map_err(|e| LoadError::ParseError(e.to_string()))?;

    if raw.format != FORMAT_NAME {
        return Err(LoadError::UnknownFormat(raw.format));
    }

    if raw.version > FORMAT_VERSION {
        return Err(LoadError::FutureVersion {
            file_version: raw.version,
            supported_version: FORMAT_VERSION,
        });
    }

    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::DocumentMetadata;
    use crate::save::{document_stem, save_document, RigDocument};
    use construct_ops::{BodyRegistry, ComponentTree};

    fn empty_report() -> ClassificationReport {
        ClassificationReport {
            groups: Vec::new(),
            total_faces: 0,
            boundary_faces: 0,
            unclassified_boundary_faces: 0,
        }
    }

    #[test]
    fn save_then_load_round_trips_params() {
        let params = ParameterSet::default();
        let mut doc = RigDocument::new(
            DocumentMetadata::new("rig"),
            params.clone(),
            &ComponentTree::default(),
            &BodyRegistry::default(),
            empty_report(),
        );
        doc.metadata.touch();
        let json = save_document(&doc);
        let raw = load_document(&json).unwrap();
        assert_eq!(raw.format, FORMAT_NAME);
        assert_eq!(raw.version, FORMAT_VERSION);
        assert_eq!(raw.params, params);
        assert!(raw.components.is_empty());
        assert!(raw.metadata.modified >= raw.metadata.created);
    }

    #[test]
    fn unknown_format_is_rejected() {
        let doc = RigDocument::new(
            DocumentMetadata::new("rig"),
            ParameterSet::default(),
            &ComponentTree::default(),
            &BodyRegistry::default(),
            empty_report(),
        );
        let json = save_document(&doc).replace("rig-geometry", "not-a-rig");
        match load_document(&json) {
            Err(LoadError::UnknownFormat(found)) => assert_eq!(found, "not-a-rig"),
            other => panic!("expected UnknownFormat, got {other:?}"),
        }
    }

    #[test]
    fn future_version_is_rejected() {
        let doc = RigDocument::new(
            DocumentMetadata::new("rig"),
            ParameterSet::default(),
            &ComponentTree::default(),
            &BodyRegistry::default(),
            empty_report(),
        );
        let json = save_document(&doc).replace("\"version\": 1", "\"version\": 99");
        match load_document(&json) {
            Err(LoadError::FutureVersion { file_version, .. }) => assert_eq!(file_version, 99),
            other => panic!("expected FutureVersion, got {other:?}"),
        }
    }

    #[test]
    fn stem_encodes_height_and_pitch() {
        assert_eq!(document_stem(0.2, 5.0), "20-050");
        assert_eq!(document_stem(0.15, 12.5), "15-125");
        assert_eq!(document_stem(0.05, 2.0), "05-020");
    }
}
