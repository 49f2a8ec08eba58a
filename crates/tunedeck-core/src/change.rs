use std::collections::BTreeMap;

use crate::record::{SettingsRecord, with_defaults};

/// Serialization used for structural comparison: defaults filled, keys sorted.
pub fn canonical_form(record: &SettingsRecord) -> String {
    with_defaults(record).canonical_json()
}

/// Structural equality. A field that default-filling would supply compares equal to
/// the same field holding its default value.
pub fn records_equal(left: &SettingsRecord, right: &SettingsRecord) -> bool {
    canonical_form(left) == canonical_form(right)
}

/// Dotted leaf paths whose values differ between two records, in sorted order.
pub fn changed_paths(before: &SettingsRecord, after: &SettingsRecord) -> Vec<String> {
    let before: BTreeMap<String, _> = with_defaults(before).flatten().into_iter().collect();
    let after: BTreeMap<String, _> = with_defaults(after).flatten().into_iter().collect();

    let mut paths: Vec<String> = before
        .keys()
        .chain(after.keys())
        .filter(|path| before.get(*path) != after.get(*path))
        .cloned()
        .collect();
    paths.sort();
    paths.dedup();
    paths
}
