use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::enums::{DispositionClass, TreatmentArm};
use crate::ids::SubjectKey;

/// One subject's disposition: screening outcome, timeline and arm.
///
/// This is the shared template for the demographic and vital-sign tables.
/// Both are derived from the persisted disposition table, never from each
/// other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispositionRecord {
    pub study_id: String,
    pub subject_id: String,
    pub site_id: String,
    pub subject_key: SubjectKey,
    pub class: DispositionClass,
    pub enrollment_date: NaiveDate,
    /// Last visit attended. Screen failures stop at visit 0.
    pub last_visit: u32,
    pub treatment_start: Option<NaiveDate>,
    pub treatment_end: Option<NaiveDate>,
    pub arm_code: Option<TreatmentArm>,
    pub arm_name: Option<String>,
}

impl DispositionRecord {
    pub fn is_screen_failure(&self) -> bool {
        matches!(self.class, DispositionClass::ScreenFail)
    }

    /// Number of visits attended, including screening (visit 0).
    pub fn visit_count(&self) -> u64 {
        u64::from(self.last_visit) + 1
    }
}
