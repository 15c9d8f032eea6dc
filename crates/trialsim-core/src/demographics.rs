//! Demographic generator.

use tracing::{debug, info};
use trialsim_model::{
    AGE_UNITS, DM_DOMAIN, DM_STUDY_DAY, DemographicRecord, DispositionRecord, LookupTables,
    StudyDesign, add_days, sub_years,
};

use crate::error::Result;
use crate::random::{RandomSource, pick};

pub const MIN_AGE: u32 = 20;
pub const MAX_AGE: u32 = 80;
/// Birth dates fall up to this many days before the last birthday.
const BIRTHDAY_SPREAD_DAYS: i64 = 364;

/// Derive one demographic record per disposition record, in input order.
///
/// Draw order per subject: investigator, country, age presence, age, birth
/// date offset (only with an age), sex presence, sex, race presence, race.
pub fn generate_demographics<R: RandomSource + ?Sized>(
    dispositions: &[DispositionRecord],
    tables: &LookupTables,
    design: &StudyDesign,
    rng: &mut R,
) -> Result<Vec<DemographicRecord>> {
    tables.validate()?;
    let rate = design.missing_rate;

    let mut records = Vec::with_capacity(dispositions.len());
    for disposition in dispositions {
        let investigator = pick(rng, &tables.investigators, "investigator")?.clone();
        let country = pick(rng, &tables.countries, "country")?.clone();

        let age = if rng.is_missing(rate) {
            None
        } else {
            Some(rng.uniform_int(i64::from(MIN_AGE), i64::from(MAX_AGE)) as u32)
        };
        let birth_date = match age {
            Some(age) => {
                let last_birthday = sub_years(disposition.enrollment_date, age)?;
                let offset = rng.uniform_int(0, BIRTHDAY_SPREAD_DAYS - 1);
                Some(add_days(last_birthday, -offset)?)
            }
            None => None,
        };

        let sex = if rng.is_missing(rate) {
            None
        } else {
            Some(pick(rng, &tables.sexes, "sex")?.clone())
        };
        let race = if rng.is_missing(rate) {
            None
        } else {
            Some(pick(rng, &tables.races, "race")?.clone())
        };

        debug!(
            subject = %disposition.subject_key,
            age = ?age,
            sex = ?sex,
            race = ?race,
            "subject demographics"
        );
        records.push(DemographicRecord {
            study_id: disposition.study_id.clone(),
            domain: DM_DOMAIN.to_string(),
            subject_id: disposition.subject_id.clone(),
            site_id: disposition.site_id.clone(),
            subject_key: disposition.subject_key.clone(),
            treatment_start: disposition.treatment_start,
            treatment_end: disposition.treatment_end,
            enrollment_date: disposition.enrollment_date,
            investigator_code: investigator.code,
            investigator_name: investigator.name,
            country,
            age,
            age_units: AGE_UNITS.to_string(),
            birth_date,
            sex,
            race,
            arm_code: disposition.arm_code,
            arm_name: disposition.arm_name.clone(),
            study_day: DM_STUDY_DAY,
        });
    }

    info!(
        subjects = records.len(),
        missing_age = records.iter().filter(|r| r.age.is_none()).count(),
        missing_sex = records.iter().filter(|r| r.sex.is_none()).count(),
        missing_race = records.iter().filter(|r| r.race.is_none()).count(),
        "demographics generated"
    );
    Ok(records)
}
