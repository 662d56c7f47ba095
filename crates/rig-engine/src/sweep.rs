//! Batch generation over a grid of fin heights and pitches. Each
//! combination gets a fresh kernel; one bad combination is recorded and
//! skipped rather than aborting the sweep.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use doc_format::{document_stem, write_document, DocumentMetadata, RigDocument};
use rig_types::ParameterSet;

use crate::finned_tube::build_rig;
use crate::session::BuildSession;

/// The cartesian grid of fin heights and pitches to generate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepGrid {
    pub heights: Vec<f64>,
    pub pitches: Vec<f64>,
}

impl SweepGrid {
    pub fn len(&self) -> usize {
        self.heights.len() * self.pitches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Combinations in height-major order.
    pub fn combinations(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.heights
            .iter()
            .flat_map(|h| self.pitches.iter().map(move |p| (*h, *p)))
    }
}

/// Result of one grid combination.
#[derive(Debug, Clone, Serialize)]
pub struct RunRecord {
    pub height: f64,
    pub pitch: f64,
    /// Parameter-derived file stem, also used as the run label.
    pub stem: String,
    pub outcome: RunOutcome,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum RunOutcome {
    Completed {
        bodies: usize,
        boundary_faces: usize,
        /// Where the document was written, when an output directory was
        /// given.
        document: Option<PathBuf>,
    },
    /// The geometry built and classified, but the document could not be
    /// written. The document is the deliverable, so this is not a success.
    ExportFailed {
        bodies: usize,
        boundary_faces: usize,
        error: String,
    },
    Failed {
        error: String,
    },
}

impl RunRecord {
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, RunOutcome::Completed { .. })
    }
}

/// Builds every combination of the grid on top of `base`, optionally
/// writing one document per successful run into `out_dir`.
pub fn run_sweep(base: &ParameterSet, grid: &SweepGrid, out_dir: Option<&Path>) -> Vec<RunRecord> {
    let mut records = Vec::with_capacity(grid.len());
    for (height, pitch) in grid.combinations() {
        let params = base.with_height(height).with_pitch(pitch);
        let stem = document_stem(height, pitch);
        let mut session = BuildSession::with_prism_kernel();
        let outcome = match build_rig(&mut session, &params) {
            Ok(report) => {
                let bodies = session.body_count();
                let boundary_faces = report.boundary_faces;
                let document = match out_dir {
                    Some(dir) => {
                        let doc = RigDocument::new(
                            DocumentMetadata::new(stem.clone()),
                            params.clone(),
                            &session.tree,
                            &session.registry,
                            report,
                        );
                        write_document(&doc, dir).map(Some)
                    }
                    None => Ok(None),
                };
                match document {
                    Ok(document) => {
                        info!(stem, bodies, "run completed");
                        RunOutcome::Completed {
                            bodies,
                            boundary_faces,
                            document,
                        }
                    }
                    Err(e) => {
                        warn!(stem, error = %e, "document export failed");
                        RunOutcome::ExportFailed {
                            bodies,
                            boundary_faces,
                            error: e.to_string(),
                        }
                    }
                }
            }
            Err(e) => {
                warn!(stem, error = %e, "run failed");
                RunOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };
        records.push(RunRecord {
            height,
            pitch,
            stem,
            outcome,
        });
    }
    records
}
