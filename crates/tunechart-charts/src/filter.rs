//! Year/country filtering of the record set.

use tracing::debug;
use tunechart_common::{FilterCriteria, Record};

/// Returns the records matching `criteria`, preserving their order.
pub fn filter_records(records: &[Record], criteria: &FilterCriteria) -> Vec<Record> {
    if criteria.is_unconstrained() {
        return records.to_vec();
    }

    let filtered: Vec<Record> = records
        .iter()
        .filter(|record| criteria.matches(record))
        .cloned()
        .collect();

    debug!(
        criteria = %criteria,
        total = records.len(),
        retained = filtered.len(),
        "Filtered records"
    );
    filtered
}
