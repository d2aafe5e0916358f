use crate::records::RawRecord;
use std::collections::HashSet;
use tracing::debug;

/// Outcome of the deduplication stage.
#[derive(Debug)]
pub struct DedupOutcome {
    pub records: Vec<RawRecord>,
    pub removed: usize,
}

/// Removes exact duplicates over the full nine-attribute tuple, keeping the
/// first occurrence in source order.
///
/// Records that agree on some attributes but differ on any other are not
/// duplicates: the same company can appear with different dates or locations
/// and every such row is preserved. Since all members of a duplicate group
/// are attribute-identical, the choice of survivor loses no information.
pub fn dedup(records: Vec<RawRecord>) -> DedupOutcome {
    let before = records.len();
    let mut seen: HashSet<RawRecord> = HashSet::with_capacity(before);
    let mut kept = Vec::with_capacity(before);

    for record in records {
        if seen.insert(record.clone()) {
            kept.push(record);
        }
    }

    let removed = before - kept.len();
    debug!("Deduplication removed {} of {} records", removed, before);

    DedupOutcome {
        records: kept,
        removed,
    }
}
