//! Per-arm listing of randomized subjects' demographics.

use chrono::NaiveDate;
use trialsim_model::{DemographicRecord, TreatmentArm};

/// One listed subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRow {
    /// `SITEID-SUBJID`.
    pub site_subject: String,
    pub birth_date: Option<NaiveDate>,
    pub age: Option<u32>,
    pub sex: Option<String>,
    pub race: Option<String>,
}

/// Subjects of one treatment arm, in table order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArmListing {
    pub arm: TreatmentArm,
    /// Arm name as recorded on the first listed subject.
    pub label: String,
    pub rows: Vec<ListingRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectListing {
    pub screened: usize,
    pub screen_failures: usize,
    /// Arms with at least one randomized subject, placebo first.
    pub arms: Vec<ArmListing>,
}

impl SubjectListing {
    pub fn from_demographics(records: &[DemographicRecord]) -> Self {
        let mut listing = Self {
            screened: records.len(),
            ..Self::default()
        };
        for arm in [TreatmentArm::Placebo, TreatmentArm::Active] {
            let subjects: Vec<&DemographicRecord> = records
                .iter()
                .filter(|record| record.arm_code == Some(arm))
                .collect();
            let Some(first) = subjects.first() else {
                continue;
            };
            let label = first
                .arm_name
                .clone()
                .unwrap_or_else(|| arm.default_name().to_string());
            let rows = subjects.iter().map(|record| listing_row(record)).collect();
            listing.arms.push(ArmListing { arm, label, rows });
        }
        listing.screen_failures = records.iter().filter(|r| !r.is_randomized()).count();
        listing
    }

    pub fn listed(&self) -> usize {
        self.arms.iter().map(|arm| arm.rows.len()).sum()
    }
}

fn listing_row(record: &DemographicRecord) -> ListingRow {
    ListingRow {
        site_subject: record.subject_key.site_subject(&record.study_id).to_string(),
        birth_date: record.birth_date,
        age: record.age,
        sex: record.sex.clone(),
        race: record.race.clone(),
    }
}
