//! Data model for synthetic clinical-trial tables.
//!
//! Three record types share one subject timeline: [`DispositionRecord`]
//! (one per subject), [`DemographicRecord`] (one per subject) and
//! [`VitalSignRecord`] (one per subject, test and visit).

pub mod catalog;
pub mod dates;
pub mod demographic;
pub mod design;
pub mod disposition;
pub mod enums;
pub mod error;
pub mod ids;
pub mod lookup;
pub mod vital_sign;

pub use catalog::{TestCatalog, TestDefinition, is_blood_pressure_code};
pub use dates::{DATE_FORMAT, add_days, format_date, sub_years};
pub use demographic::{AGE_UNITS, DM_DOMAIN, DM_STUDY_DAY, DemographicRecord};
pub use design::{DEFAULT_MISSING_RATE, StudyDesign, TABLE_DELIMITERS, contains_delimiter};
pub use disposition::DispositionRecord;
pub use enums::{DispositionClass, TreatmentArm};
pub use error::{ModelError, Result};
pub use ids::{ObservationKey, SubjectKey, zero_pad};
pub use lookup::{ArmEntry, Investigator, LookupTables};
pub use vital_sign::{VS_DOMAIN, VitalSignRecord, result_text};
