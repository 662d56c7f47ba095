//! Assertion helpers with diagnostics for geometry checks.

use classify_ops::ClassificationReport;
use rig_types::approx_eq;

/// Panics when `actual` is not within `rel_tol` of `expected`, reporting
/// both values.
pub fn assert_close(actual: f64, expected: f64, rel_tol: f64, what: &str) {
    assert!(
        approx_eq(actual, expected, rel_tol),
        "{what}: got {actual}, expected {expected} (rel_tol {rel_tol})"
    );
}

/// Panics unless the report contains a group of the given name and size.
pub fn assert_group_size(report: &ClassificationReport, name: &str, members: usize) {
    let group = report
        .group(name)
        .unwrap_or_else(|| panic!("group `{name}` missing from report"));
    assert_eq!(
        group.members, members,
        "group `{name}` has {} members, expected {members}",
        group.members
    );
}
