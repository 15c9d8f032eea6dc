use trialsim_model::{DemographicRecord, TreatmentArm};

use crate::disposition::{parse_arm, parse_subject_key};
use crate::error::Result;
use crate::fields::{
    FieldReader, date_cell, optional_date_cell, optional_int_cell, optional_text_cell,
};
use crate::table::TableRecord;

impl TableRecord for DemographicRecord {
    const TABLE: &'static str = "demographic";
    const COLUMNS: &'static [&'static str] = &[
        "StudyId",
        "Domain",
        "SubjectId",
        "SiteId",
        "SubjectKey",
        "TreatmentStartDate",
        "TreatmentEndDate",
        "EnrollmentDate",
        "InvestigatorCode",
        "InvestigatorName",
        "Country",
        "Age",
        "AgeUnits",
        "BirthDate",
        "Sex",
        "Race",
        "ArmCode",
        "ArmName",
        "StudyDay",
    ];

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.study_id.clone(),
            self.domain.clone(),
            self.subject_id.clone(),
            self.site_id.clone(),
            self.subject_key.to_string(),
            optional_date_cell(self.treatment_start),
            optional_date_cell(self.treatment_end),
            date_cell(self.enrollment_date),
            self.investigator_code.clone(),
            self.investigator_name.clone(),
            self.country.clone(),
            optional_int_cell(self.age),
            self.age_units.clone(),
            optional_date_cell(self.birth_date),
            optional_text_cell(self.sex.as_deref()),
            optional_text_cell(self.race.as_deref()),
            optional_int_cell(self.arm_code.map(TreatmentArm::code)),
            optional_text_cell(self.arm_name.as_deref()),
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
            treatment_start: fields.optional_date(5)?,
            treatment_end: fields.optional_date(6)?,
            enrollment_date: fields.date(7)?,
            investigator_code: fields.required_text(8)?,
            investigator_name: fields.required_text(9)?,
            country: fields.required_text(10)?,
            age: fields.optional(11)?,
            age_units: fields.text(12),
            birth_date: fields.optional_date(13)?,
            sex: fields.optional_text(14),
            race: fields.optional_text(15),
            arm_code: fields.parse_optional_with(16, parse_arm)?,
            arm_name: fields.optional_text(17),
            study_day: fields.required(18)?,
        })
    }
}
