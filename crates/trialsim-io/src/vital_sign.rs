use trialsim_model::VitalSignRecord;

use crate::disposition::parse_subject_key;
use crate::error::Result;
use crate::fields::{FieldReader, date_cell, optional_float_cell, optional_text_cell};
use crate::table::TableRecord;

/// Decimals kept for the numeric result columns.
const RESULT_DECIMALS: usize = 1;

impl TableRecord for VitalSignRecord {
    const TABLE: &'static str = "vital-sign";
    const COLUMNS: &'static [&'static str] = &[
        "StudyId",
        "Domain",
        "SubjectId",
        "SiteId",
        "SubjectKey",
        "SequenceNumber",
        "VisitNumber",
        "TestCode",
        "TestName",
        "OriginalResult",
        "StandardizedResult",
        "StandardizedResultText",
        "OriginalUnits",
        "StandardizedUnits",
        "BaselineFlag",
        "VisitDate",
        "StudyDay",
    ];

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.study_id.clone(),
            self.domain.clone(),
            self.subject_id.clone(),
            self.site_id.clone(),
            self.subject_key.to_string(),
            self.sequence.to_string(),
            self.visit.to_string(),
            self.test_code.clone(),
            self.test_name.clone(),
            optional_float_cell(self.original_result, RESULT_DECIMALS),
            optional_float_cell(self.standardized_result, RESULT_DECIMALS),
            optional_text_cell(self.standardized_result_text.as_deref()),
            self.original_units.clone(),
            self.standardized_units.clone(),
            self.baseline_flag.to_string(),
            date_cell(self.visit_date),
            self.study_day.to_string(),
        ]
    }

    fn from_fields(fields: &FieldReader<'_>) -> Result<Self> {
        Ok(Self {
            study_id: fields.required_text(0)?,
            domain: fields.required_text(1)?,
            subject_id: fields.required_text(2)?,
            site_id: fields.required_text(3)?,
            subject_key: fields.parse_with(4, parse_subject_key)?,
            sequence: fields.required(5)?,
            visit: fields.required(6)?,
            test_code: fields.text(7),
            test_name: fields.text(8),
            original_result: fields.optional(9)?,
            standardized_result: fields.optional(10)?,
            standardized_result_text: fields.optional_text(11),
            original_units: fields.text(12),
            standardized_units: fields.text(13),
            baseline_flag: fields.required(14)?,
            visit_date: fields.date(15)?,
            study_day: fields.required(16)?,
        })
    }
}
