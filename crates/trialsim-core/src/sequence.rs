//! Sequence numbering for vital-sign rows.

use std::cmp::Ordering;

use tracing::debug;
use trialsim_model::VitalSignRecord;

/// Stable-sort rows by subject, test code and visit, then number them from 1
/// within each subject.
///
/// Ties keep their generation order. The counter restarts whenever the
/// subject key changes in the sorted table.
pub fn sort_and_sequence(records: &mut [VitalSignRecord]) {
    records.sort_by(compare_observations);

    let mut subjects = 0usize;
    let mut counter = 0u32;
    for index in 0..records.len() {
        let new_subject =
            index == 0 || records[index].subject_key != records[index - 1].subject_key;
        if new_subject {
            counter = 0;
            subjects += 1;
        }
        counter += 1;
        records[index].sequence = counter;
    }
    debug!(rows = records.len(), subjects, "sequence numbers assigned");
}

fn compare_observations(a: &VitalSignRecord, b: &VitalSignRecord) -> Ordering {
    a.observation_key().cmp(&b.observation_key())
}
