use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ids::{ObservationKey, SubjectKey};

pub const VS_DOMAIN: &str = "VS";

/// One vital-sign measurement of one subject at one visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalSignRecord {
    pub study_id: String,
    pub domain: String,
    pub subject_id: String,
    pub site_id: String,
    pub subject_key: SubjectKey,
    /// Per-subject running number; 0 until the table has been sequenced.
    pub sequence: u32,
    pub visit: u32,
    /// Blank for screen failures.
    pub test_code: String,
    pub test_name: String,
    pub original_result: Option<f64>,
    pub original_units: String,
    pub standardized_result: Option<f64>,
    pub standardized_result_text: Option<String>,
    pub standardized_units: String,
    /// Set on visit 1 only.
    pub baseline_flag: bool,
    pub visit_date: NaiveDate,
    pub study_day: i64,
}

impl VitalSignRecord {
    pub fn observation_key(&self) -> ObservationKey<'_> {
        ObservationKey {
            subject_key: &self.subject_key,
            test_code: &self.test_code,
            visit: self.visit,
        }
    }
}

/// Render a standardized result as text with two decimals.
pub fn result_text(value: f64) -> String {
    format!("{value:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_text_uses_two_decimals() {
        assert_eq!(result_text(133.0), "133.00");
        assert_eq!(result_text(128.456), "128.46");
    }
}
