//! Vital-sign generator.

use tracing::{debug, info};
use trialsim_model::{
    DispositionRecord, StudyDesign, TestCatalog, TestDefinition, VS_DOMAIN, VitalSignRecord,
    add_days, result_text,
};

use crate::error::{GenerateError, Result};
use crate::random::RandomSource;
use crate::sequence::sort_and_sequence;
use crate::trend::result_for_visit;

/// Visit that carries the baseline flag.
pub const BASELINE_VISIT: u32 = 1;

/// Generate every vital-sign row for the given subjects.
///
/// For each subject and test a whole-number baseline is drawn once, then one
/// row is produced per visit from 0 through the subject's last visit. Screen
/// failures keep their visit rows with a blank test; results exist only for
/// subjects with an arm. The finished table is sorted and sequenced.
///
/// A subject whose last visit lies beyond `design.max_visit` is rejected.
pub fn generate_vital_signs<R: RandomSource + ?Sized>(
    dispositions: &[DispositionRecord],
    catalog: &TestCatalog,
    design: &StudyDesign,
    rng: &mut R,
) -> Result<Vec<VitalSignRecord>> {
    design.validate()?;
    if let Some(disposition) = dispositions
        .iter()
        .find(|record| record.last_visit > design.max_visit)
    {
        return Err(GenerateError::VisitOutOfRange {
            subject: disposition.subject_key.to_string(),
            last_visit: disposition.last_visit,
            max_visit: design.max_visit,
        });
    }

    let mut records = Vec::new();
    for disposition in dispositions {
        let before = records.len();
        for test in catalog.tests() {
            let baseline = draw_baseline(test, rng) as f64;
            for visit in 0..=disposition.last_visit {
                records.push(build_row(disposition, test, baseline, visit, design, rng)?);
            }
        }
        debug!(
            subject = %disposition.subject_key,
            rows = records.len() - before,
            "subject vital signs"
        );
    }
    sort_and_sequence(&mut records);
    info!(
        subjects = dispositions.len(),
        rows = records.len(),
        tests = catalog.len(),
        "vital signs generated"
    );
    Ok(records)
}

fn draw_baseline<R: RandomSource + ?Sized>(test: &TestDefinition, rng: &mut R) -> i64 {
    rng.uniform_int(
        i64::from(test.baseline_low),
        i64::from(test.baseline_high) - 1,
    )
}

fn build_row<R: RandomSource + ?Sized>(
    disposition: &DispositionRecord,
    test: &TestDefinition,
    baseline: f64,
    visit: u32,
    design: &StudyDesign,
    rng: &mut R,
) -> Result<VitalSignRecord> {
    let study_day = design.study_day(visit);
    let visit_date = add_days(disposition.enrollment_date, study_day)?;
    let result = disposition
        .arm_code
        .map(|arm| result_for_visit(baseline, visit, arm, rng));

    let (test_code, test_name, units) = if disposition.class.is_treated() {
        (test.code.clone(), test.name.clone(), test.units.clone())
    } else {
        (String::new(), String::new(), String::new())
    };

    Ok(VitalSignRecord {
        study_id: disposition.study_id.clone(),
        domain: VS_DOMAIN.to_string(),
        subject_id: disposition.subject_id.clone(),
        site_id: disposition.site_id.clone(),
        subject_key: disposition.subject_key.clone(),
        sequence: 0,
        visit,
        test_code,
        test_name,
        original_result: result,
        original_units: units.clone(),
        standardized_result: result,
        standardized_result_text: result.map(result_text),
        standardized_units: units,
        baseline_flag: visit == BASELINE_VISIT,
        visit_date,
        study_day,
    })
}
