/// Relative comparison of a measured quantity against a reference value.
///
/// The tolerance scales with the reference: `|measured - reference|` must not
/// exceed `rel_tol * |reference|`. When the reference is zero the comparison
/// degenerates to an absolute check against `rel_tol` itself, so selecting
/// entities "at coordinate zero" still works.
pub fn approx_eq(measured: f64, reference: f64, rel_tol: f64) -> bool {
    if reference == 0.0 {
        measured.abs() <= rel_tol
    } else {
        (measured - reference).abs() <= rel_tol * reference.abs()
    }
}

/// Relative tolerance used by the finned-tube selection predicates.
pub const DEFAULT_REL_TOL: f64 = 1e-3;
