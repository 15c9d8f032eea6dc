//! Study design parameters for data generation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ModelError;
use crate::dates::add_days;

/// Probability that an optional attribute is left missing.
pub const DEFAULT_MISSING_RATE: f64 = 0.05;

/// Characters that would split a table cell or row.
pub const TABLE_DELIMITERS: [char; 3] = [',', '\n', '\r'];

pub fn contains_delimiter(value: &str) -> bool {
    value.contains(TABLE_DELIMITERS)
}

/// Parameters shared by all generators.
///
/// Every field has a default, so a design file only needs the values it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyDesign {
    pub study_id: String,
    pub subject_count: u32,
    /// Candidate sites; each subject is assigned one uniformly.
    pub site_ids: Vec<String>,
    pub subject_id_width: usize,
    pub site_id_width: usize,
    /// First possible enrollment date.
    pub enrollment_start: NaiveDate,
    /// Length of the enrollment window in days.
    pub enrollment_window_days: u32,
    /// Final scheduled visit; completers attend visits 0 through this value.
    pub max_visit: u32,
    /// Days between consecutive visits.
    pub visit_interval_days: u32,
    /// Probability in [0, 1] that age, sex or race is missing.
    pub missing_rate: f64,
}

impl Default for StudyDesign {
    fn default() -> Self {
        Self {
            study_id: "XYZ123".to_string(),
            subject_count: 100,
            site_ids: ["1", "2", "3", "4", "5"]
                .into_iter()
                .map(String::from)
                .collect(),
            subject_id_width: 6,
            site_id_width: 4,
            enrollment_start: NaiveDate::from_ymd_opt(2010, 1, 1).unwrap_or_default(),
            enrollment_window_days: 364,
            max_visit: 14,
            visit_interval_days: 14,
            missing_rate: DEFAULT_MISSING_RATE,
        }
    }
}

impl StudyDesign {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.study_id.trim().is_empty() {
            return Err(ModelError::InvalidDesign("study id is empty".to_string()));
        }
        if contains_delimiter(&self.study_id) {
            return Err(ModelError::InvalidDesign(format!(
                "study id {:?} contains a delimiter or line break",
                self.study_id
            )));
        }
        if self.site_ids.is_empty() {
            return Err(ModelError::InvalidDesign("no site ids".to_string()));
        }
        if let Some(site) = self.site_ids.iter().find(|site| contains_delimiter(site)) {
            return Err(ModelError::InvalidDesign(format!(
                "site id {site:?} contains a delimiter or line break"
            )));
        }
        if self.enrollment_window_days == 0 {
            return Err(ModelError::InvalidDesign(
                "enrollment window must be at least one day".to_string(),
            ));
        }
        // Withdrawers need at least one visit strictly between screening and the last visit.
        if self.max_visit < 2 {
            return Err(ModelError::InvalidDesign(format!(
                "max visit must be at least 2, got {}",
                self.max_visit
            )));
        }
        let last_day = u64::from(self.enrollment_window_days)
            + u64::from(self.max_visit) * u64::from(self.visit_interval_days);
        let fits = i64::try_from(last_day)
            .ok()
            .is_some_and(|days| add_days(self.enrollment_start, days).is_ok());
        if !fits {
            return Err(ModelError::InvalidDesign(format!(
                "last visit falls {last_day} days after {}, outside the calendar",
                self.enrollment_start
            )));
        }
        if !(0.0..=1.0).contains(&self.missing_rate) {
            return Err(ModelError::InvalidDesign(format!(
                "missing rate must be within [0, 1], got {}",
                self.missing_rate
            )));
        }
        Ok(())
    }

    /// Study day of a visit, counted from enrollment.
    pub fn study_day(&self, visit: u32) -> i64 {
        i64::from(visit) * i64::from(self.visit_interval_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_design_is_valid() {
        let design = StudyDesign::default();
        assert!(design.validate().is_ok());
        assert_eq!(design.study_day(5), 70);
        assert_eq!(
            design.enrollment_start,
            NaiveDate::from_ymd_opt(2010, 1, 1).unwrap()
        );
    }

    #[test]
    fn rejects_unusable_designs() {
        let no_sites = StudyDesign {
            site_ids: Vec::new(),
            ..StudyDesign::default()
        };
        assert!(no_sites.validate().is_err());

        let short = StudyDesign {
            max_visit: 1,
            ..StudyDesign::default()
        };
        assert!(short.validate().is_err());

        let bad_rate = StudyDesign {
            missing_rate: 1.5,
            ..StudyDesign::default()
        };
        assert!(bad_rate.validate().is_err());

        let endless = StudyDesign {
            max_visit: u32::MAX,
            visit_interval_days: u32::MAX,
            ..StudyDesign::default()
        };
        assert!(endless.validate().is_err());
    }

    #[test]
    fn rejects_ids_that_would_split_a_row() {
        for study_id in ["XYZ,123", "XYZ\n123", "XYZ\r123"] {
            let design = StudyDesign {
                study_id: study_id.to_string(),
                ..StudyDesign::default()
            };
            let err = design.validate().unwrap_err();
            assert!(err.to_string().contains("study id"), "{err}");
        }

        let design = StudyDesign {
            site_ids: vec!["1".to_string(), "2,3".to_string()],
            ..StudyDesign::default()
        };
        let err = design.validate().unwrap_err();
        assert!(err.to_string().contains("site id"), "{err}");
    }
}
