//! Disposition generator: the subject timeline every other table follows.

use tracing::{debug, info};
use trialsim_model::{
    DispositionClass, DispositionRecord, LookupTables, StudyDesign, SubjectKey, add_days,
    zero_pad,
};

use crate::error::Result;
use crate::random::{RandomSource, pick};

/// Draws at or below this value are screen failures.
pub const SCREEN_FAIL_CUTOFF: f64 = 0.05;
/// Draws strictly between the two cutoffs are withdrawals.
pub const WITHDRAWN_CUTOFF: f64 = 0.40;

/// Map one uniform `[0, 1)` draw to a disposition class.
pub fn classify(x: f64) -> DispositionClass {
    if x <= SCREEN_FAIL_CUTOFF {
        DispositionClass::ScreenFail
    } else if x < WITHDRAWN_CUTOFF {
        DispositionClass::Withdrawn
    } else {
        DispositionClass::Completer
    }
}

/// Generate one disposition record per subject.
///
/// Draw order per subject: site, class, enrollment offset, last visit (for
/// withdrawals only), arm (treated subjects only).
pub fn generate_dispositions<R: RandomSource + ?Sized>(
    design: &StudyDesign,
    tables: &LookupTables,
    rng: &mut R,
) -> Result<Vec<DispositionRecord>> {
    design.validate()?;
    tables.validate()?;

    let mut records = Vec::with_capacity(design.subject_count as usize);
    for index in 1..=design.subject_count {
        let site = pick(rng, &design.site_ids, "site")?;
        let site_id = zero_pad(site, design.site_id_width);
        let subject_id = zero_pad(&index.to_string(), design.subject_id_width);
        let subject_key = SubjectKey::compose(&design.study_id, &site_id, &subject_id);

        let class = classify(rng.unit());
        let offset = rng.uniform_int(0, i64::from(design.enrollment_window_days) - 1);
        let enrollment_date = add_days(design.enrollment_start, offset)?;

        let last_visit = match class {
            DispositionClass::ScreenFail => 0,
            DispositionClass::Withdrawn => {
                rng.uniform_int(1, i64::from(design.max_visit) - 1) as u32
            }
            DispositionClass::Completer => design.max_visit,
        };

        let (treatment_start, treatment_end, arm_code, arm_name) = if class.is_treated() {
            let start = add_days(enrollment_date, design.study_day(1))?;
            let end = add_days(enrollment_date, design.study_day(last_visit))?;
            let arm = pick(rng, &tables.arms, "arm")?;
            (Some(start), Some(end), Some(arm.arm), Some(arm.name.clone()))
        } else {
            (None, None, None, None)
        };

        debug!(
            subject = %subject_key,
            class = %class,
            last_visit,
            "subject disposition"
        );
        records.push(DispositionRecord {
            study_id: design.study_id.clone(),
            subject_id,
            site_id,
            subject_key,
            class,
            enrollment_date,
            last_visit,
            treatment_start,
            treatment_end,
            arm_code,
            arm_name,
        });
    }

    let count = |class: DispositionClass| records.iter().filter(|r| r.class == class).count();
    info!(
        subjects = records.len(),
        screen_failures = count(DispositionClass::ScreenFail),
        withdrawn = count(DispositionClass::Withdrawn),
        completers = count(DispositionClass::Completer),
        "dispositions generated"
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::StudyRng;

    #[test]
    fn classify_boundaries() {
        assert_eq!(classify(0.0), DispositionClass::ScreenFail);
        assert_eq!(classify(0.05), DispositionClass::ScreenFail);
        assert_eq!(classify(0.050_001), DispositionClass::Withdrawn);
        assert_eq!(classify(0.399_999), DispositionClass::Withdrawn);
        assert_eq!(classify(0.40), DispositionClass::Completer);
        assert_eq!(classify(0.999), DispositionClass::Completer);
    }

    #[test]
    fn ids_are_zero_padded_and_keyed() {
        let mut rng = StudyRng::seeded(3);
        let records =
            generate_dispositions(&StudyDesign::default(), &LookupTables::default(), &mut rng)
                .unwrap();
        assert_eq!(records.len(), 100);
        assert_eq!(records[0].subject_id, "000001");
        assert_eq!(records[99].subject_id, "000100");
        for record in &records {
            assert_eq!(record.site_id.len(), 4);
            assert!(record.subject_key.matches_parts(
                &record.study_id,
                &record.site_id,
                &record.subject_id
            ));
        }
    }

    #[test]
    fn rejects_empty_site_list() {
        let design = StudyDesign {
            site_ids: Vec::new(),
            ..StudyDesign::default()
        };
        let mut rng = StudyRng::seeded(3);
        assert!(generate_dispositions(&design, &LookupTables::default(), &mut rng).is_err());
    }

    #[test]
    fn zero_subjects_yields_empty_table() {
        let design = StudyDesign {
            subject_count: 0,
            ..StudyDesign::default()
        };
        let mut rng = StudyRng::seeded(3);
        let records = generate_dispositions(&design, &LookupTables::default(), &mut rng).unwrap();
        assert!(records.is_empty());
    }
}
