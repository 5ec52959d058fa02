// ── Baseline/overlay merge ──
//
// Concatenate baseline then overlay and keep the first record seen for
// each identity. Baseline entries therefore shadow overlay entries that
// reuse their id.

use std::collections::HashSet;

use crate::model::Record;

/// Merge two sources, baseline first, keeping the first record per id.
pub fn merge_sources(baseline: Vec<Record>, overlay: Vec<Record>) -> Vec<Record> {
    dedup_first_by_id(baseline.into_iter().chain(overlay))
}

/// Drop every record whose identity was already seen, preserving order.
pub fn dedup_first_by_id(records: impl IntoIterator<Item = Record>) -> Vec<Record> {
    let mut seen: HashSet<Option<String>> = HashSet::new();
    records
        .into_iter()
        .filter(|r| seen.insert(r.identity()))
        .collect()
}
