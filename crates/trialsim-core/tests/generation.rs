//! End-to-end generation scenarios.

use chrono::NaiveDate;
use trialsim_core::{
    CheckContext, RandomSource, StudyRng, check_consistency, generate_demographics,
    generate_dispositions, generate_vital_signs,
};
use trialsim_model::{
    DispositionClass, DispositionRecord, LookupTables, StudyDesign, SubjectKey, TestCatalog,
    TestDefinition, TreatmentArm,
};

/// Wraps a seeded source and records every real-valued draw.
struct RecordingRng {
    inner: StudyRng,
    reals: Vec<f64>,
}

impl RecordingRng {
    fn new(seed: u64) -> Self {
        Self {
            inner: StudyRng::seeded(seed),
            reals: Vec::new(),
        }
    }
}

impl RandomSource for RecordingRng {
    fn uniform_int(&mut self, low: i64, high: i64) -> i64 {
        self.inner.uniform_int(low, high)
    }

    fn uniform_real(&mut self, low: f64, high: f64) -> f64 {
        let value = self.inner.uniform_real(low, high);
        self.reals.push(value);
        value
    }

    fn unit(&mut self) -> f64 {
        self.inner.unit()
    }

    fn pick_index(&mut self, len: usize) -> usize {
        self.inner.pick_index(len)
    }

    fn is_missing(&mut self, rate: f64) -> bool {
        self.inner.is_missing(rate)
    }
}

fn subject(
    class: DispositionClass,
    last_visit: u32,
    arm: Option<TreatmentArm>,
) -> DispositionRecord {
    let enrollment = NaiveDate::from_ymd_opt(2010, 6, 1).unwrap();
    DispositionRecord {
        study_id: "XYZ123".to_string(),
        subject_id: "000001".to_string(),
        site_id: "0001".to_string(),
        subject_key: SubjectKey::compose("XYZ123", "0001", "000001"),
        class,
        enrollment_date: enrollment,
        last_visit,
        treatment_start: arm.map(|_| enrollment),
        treatment_end: arm.map(|_| enrollment),
        arm_code: arm,
        arm_name: arm.map(|a| a.default_name().to_string()),
    }
}

#[test]
fn active_systolic_at_visit_five_follows_the_trend() {
    let sc = subject(DispositionClass::Withdrawn, 6, Some(TreatmentArm::Active));
    // A one-value range pins the baseline at 140.
    let catalog = TestCatalog::new(vec![TestDefinition::new(
        "SBP",
        "Systolic Blood Pressure",
        "mmHg",
        (140, 141),
    )]);
    let mut rng = RecordingRng::new(21);
    let rows = generate_vital_signs(&[sc], &catalog, &StudyDesign::default(), &mut rng).unwrap();

    assert_eq!(rows.len(), 7);
    assert_eq!(rows[0].original_result, Some(140.0));
    // Visits 1 through 6 each take one offset draw, in visit order.
    assert_eq!(rng.reals.len(), 6);
    let r = rng.reals[4];
    assert!((-5.0..1.0).contains(&r));

    let visit5 = rows.iter().find(|row| row.visit == 5).unwrap();
    let value = visit5.original_result.unwrap();
    assert!((value - (140.0 * 0.95 + r)).abs() < 1e-9);
    assert!((128.0..134.0).contains(&value));
}

#[test]
fn screen_failure_rows_have_no_test_or_result() {
    let sc = subject(DispositionClass::ScreenFail, 0, None);
    let catalog = TestCatalog::default();
    let mut rng = StudyRng::seeded(5);
    let rows = generate_vital_signs(&[sc], &catalog, &StudyDesign::default(), &mut rng).unwrap();

    assert_eq!(rows.len(), catalog.len());
    for (index, row) in rows.iter().enumerate() {
        assert_eq!(row.test_code, "");
        assert_eq!(row.test_name, "");
        assert_eq!(row.original_result, None);
        assert_eq!(row.standardized_result, None);
        assert_eq!(row.visit, 0);
        assert!(!row.baseline_flag);
        assert_eq!(row.sequence, index as u32 + 1);
    }
}

#[test]
fn screen_failure_share_is_about_five_percent() {
    let design = StudyDesign {
        subject_count: 10_000,
        ..StudyDesign::default()
    };
    let mut rng = StudyRng::seeded(2024);
    let records = generate_dispositions(&design, &LookupTables::default(), &mut rng).unwrap();
    let failures = records.iter().filter(|r| r.is_screen_failure()).count();
    let share = failures as f64 / records.len() as f64;
    assert!((0.04..0.06).contains(&share), "screen failure share {share}");

    let withdrawn = records
        .iter()
        .filter(|r| r.class == DispositionClass::Withdrawn)
        .count() as f64
        / records.len() as f64;
    assert!((0.32..0.38).contains(&withdrawn), "withdrawn share {withdrawn}");
}

#[test]
fn full_pipeline_is_consistent() {
    let design = StudyDesign::default();
    let tables = LookupTables::default();
    let catalog = TestCatalog::default();
    let mut rng = StudyRng::seeded(99);

    let dispositions = generate_dispositions(&design, &tables, &mut rng).unwrap();
    let demographics = generate_demographics(&dispositions, &tables, &design, &mut rng).unwrap();
    let vital_signs = generate_vital_signs(&dispositions, &catalog, &design, &mut rng).unwrap();

    let context = CheckContext {
        max_visit: design.max_visit,
        visit_interval_days: design.visit_interval_days,
        catalog: &catalog,
    };
    let report = check_consistency(&dispositions, &demographics, &vital_signs, &context);
    assert!(report.is_clean(), "{:#?}", report.issues);
}

#[test]
fn same_seed_reproduces_every_table() {
    let design = StudyDesign::default();
    let tables = LookupTables::default();
    let catalog = TestCatalog::default();
    let run = |seed| {
        let mut rng = StudyRng::seeded(seed);
        let sc = generate_dispositions(&design, &tables, &mut rng).unwrap();
        let dm = generate_demographics(&sc, &tables, &design, &mut rng).unwrap();
        let vs = generate_vital_signs(&sc, &catalog, &design, &mut rng).unwrap();
        (sc, dm, vs)
    };
    assert_eq!(run(7), run(7));
    assert_ne!(run(7).0, run(8).0);
}
