//! Field mapper — source field names to canonical names.

use cg_core::Record;

/// Apply `renames` to one record, in order. Fields not named in the table
/// pass through; renames whose source field is absent are no-ops.
///
/// Returns the number of fields renamed.
pub fn map_fields(record: &mut Record, renames: &[(String, String)]) -> usize {
    renames
        .iter()
        .filter(|(from, to)| record.rename(from, to))
        .count()
}

/// Apply `renames` to every record. Returns the total number of renames.
pub fn map_all(records: &mut [Record], renames: &[(String, String)]) -> usize {
    records.iter_mut().map(|r| map_fields(r, renames)).sum()
}
