use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::enums::TreatmentArm;
use crate::ids::SubjectKey;

pub const DM_DOMAIN: &str = "DM";
pub const AGE_UNITS: &str = "Years";
/// Demographics are collected at screening, study day 0.
pub const DM_STUDY_DAY: i64 = 0;

/// Demographic attributes of one subject.
///
/// Timeline and arm fields are copied from the disposition record; age, sex
/// and race may be missing for any subject, screen failures included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemographicRecord {
    pub study_id: String,
    pub domain: String,
    pub subject_id: String,
    pub site_id: String,
    pub subject_key: SubjectKey,
    pub treatment_start: Option<NaiveDate>,
    pub treatment_end: Option<NaiveDate>,
    pub enrollment_date: NaiveDate,
    pub investigator_code: String,
    pub investigator_name: String,
    pub country: String,
    pub age: Option<u32>,
    pub age_units: String,
    pub birth_date: Option<NaiveDate>,
    pub sex: Option<String>,
    pub race: Option<String>,
    pub arm_code: Option<TreatmentArm>,
    pub arm_name: Option<String>,
    pub study_day: i64,
}

impl DemographicRecord {
    pub fn is_randomized(&self) -> bool {
        self.arm_code.is_some()
    }
}
