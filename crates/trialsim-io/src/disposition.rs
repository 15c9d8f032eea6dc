use trialsim_model::{DispositionClass, DispositionRecord, ModelError, SubjectKey, TreatmentArm};

use crate::error::Result;
use crate::fields::{
    FieldReader, date_cell, optional_date_cell, optional_int_cell, optional_text_cell,
};
use crate::table::TableRecord;

impl TableRecord for DispositionRecord {
    const TABLE: &'static str = "disposition";
    const COLUMNS: &'static [&'static str] = &[
        "StudyId",
        "SubjectId",
        "SiteId",
        "SubjectKey",
        "DispositionClass",
        "EnrollmentDate",
        "LastVisit",
        "TreatmentStartDate",
        "TreatmentEndDate",
        "ArmCode",
        "ArmName",
    ];

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.study_id.clone(),
            self.subject_id.clone(),
            self.site_id.clone(),
            self.subject_key.to_string(),
            self.class.code().to_string(),
            date_cell(self.enrollment_date),
            self.last_visit.to_string(),
            optional_date_cell(self.treatment_start),
            optional_date_cell(self.treatment_end),
            optional_int_cell(self.arm_code.map(TreatmentArm::code)),
            optional_text_cell(self.arm_name.as_deref()),
        ]
    }

    fn from_fields(fields: &FieldReader<'_>) -> Result<Self> {
        Ok(Self {
            study_id: fields.required_text(0)?,
            subject_id: fields.required_text(1)?,
            site_id: fields.required_text(2)?,
            subject_key: fields.parse_with(3, parse_subject_key)?,
            class: fields.parse_with(4, parse_class)?,
            enrollment_date: fields.date(5)?,
            last_visit: fields.required(6)?,
            treatment_start: fields.optional_date(7)?,
            treatment_end: fields.optional_date(8)?,
            arm_code: fields.parse_optional_with(9, parse_arm)?,
            arm_name: fields.optional_text(10),
        })
    }
}

pub(crate) fn parse_subject_key(value: &str) -> std::result::Result<SubjectKey, ModelError> {
    SubjectKey::new(value)
}

pub(crate) fn parse_class(value: &str) -> std::result::Result<DispositionClass, String> {
    let code = value.parse::<i64>().map_err(|err| err.to_string())?;
    DispositionClass::from_code(code).map_err(|err| err.to_string())
}

pub(crate) fn parse_arm(value: &str) -> std::result::Result<TreatmentArm, String> {
    let code = value.parse::<i64>().map_err(|err| err.to_string())?;
    TreatmentArm::from_code(code).map_err(|err| err.to_string())
}
