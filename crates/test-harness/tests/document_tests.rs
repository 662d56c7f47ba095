//! Document export round trip over a real build.

use doc_format::{document_stem, load_document, write_document, DocumentMetadata, RigDocument};
use rig_engine::{build_rig, BuildSession};
use rig_types::ParameterSet;

#[test]
fn built_rig_exports_and_reloads() {
    let mut session = BuildSession::with_prism_kernel();
    let params = ParameterSet::default();
    let report = build_rig(&mut session, &params).unwrap();

    let stem = document_stem(params.height, params.pitch);
    assert_eq!(stem, "20-050");

    let doc = RigDocument::new(
        DocumentMetadata::new(stem),
        params.clone(),
        &session.tree,
        &session.registry,
        report,
    );
    assert_eq!(doc.cell_count(), 24);
    assert_eq!(doc.components.len(), 26);
    let stab = doc
        .components
        .iter()
        .find(|c| c.name == "stab")
        .expect("stabilizer summary present");
    assert_eq!(stab.bodies, 9);
    assert_eq!(stab.solid_bodies, 0);

    let dir = std::env::temp_dir().join("rig-document-tests");
    std::fs::create_dir_all(&dir).unwrap();
    let path = write_document(&doc, &dir).unwrap();
    assert_eq!(path.file_name().unwrap(), "20-050.json");

    let json = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["format"], "rig-geometry");
    assert_eq!(value["version"], 1);

    let raw = load_document(&json).unwrap();
    assert_eq!(raw.params, params);
    assert_eq!(raw.report.unclassified_boundary_faces, 0);
    let _ = std::fs::remove_file(&path);
}
