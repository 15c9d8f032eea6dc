//! Integration tests for the command layer.

use std::fs;
use std::path::Path;

use tempfile::tempdir;
use trialsim_cli::cli::{
    CheckArgs, DemographicsArgs, DesignArgs, DispositionArgs, GenerateArgs, ListArgs, SeedArg,
    TableArgs, VitalSignsArgs,
};
use trialsim_cli::commands::{
    load_design, run_check, run_demographics, run_disposition, run_generate, run_list,
    run_summary, run_vital_signs,
};
use trialsim_core::ArmGroup;

fn seed(value: u64) -> SeedArg {
    SeedArg { seed: Some(value) }
}

fn table_args(dir: &Path) -> TableArgs {
    TableArgs {
        disposition: dir.join("sc3.csv"),
        demographics: dir.join("dm3.csv"),
        vital_signs: dir.join("vs3.csv"),
    }
}

fn generate_into(dir: &Path, seed_value: u64, subjects: u32) {
    let args = GenerateArgs {
        output_dir: dir.to_path_buf(),
        seed: seed(seed_value),
        design: DesignArgs {
            design: None,
            subjects: Some(subjects),
        },
    };
    run_generate(&args).unwrap();
}

#[test]
fn generate_writes_three_consistent_tables() {
    let dir = tempdir().unwrap();
    let args = GenerateArgs {
        output_dir: dir.path().to_path_buf(),
        seed: seed(42),
        design: DesignArgs::default(),
    };
    let result = run_generate(&args).unwrap();

    assert_eq!(result.seed, 42);
    assert_eq!(result.study_id, "XYZ123");
    assert_eq!(result.tables.len(), 3);
    assert_eq!(result.tables[0].records, 100);
    assert_eq!(result.tables[1].records, 100);
    let classes = result.classes.unwrap();
    assert_eq!(classes.values().sum::<usize>(), 100);

    for name in ["sc3.csv", "dm3.csv", "vs3.csv"] {
        assert!(dir.path().join(name).is_file(), "{name} missing");
    }

    let report = run_check(&CheckArgs {
        tables: table_args(dir.path()),
        design: None,
    })
    .unwrap();
    assert!(report.is_clean(), "{:#?}", report.issues);
    assert_eq!(report.subjects_checked, 100);
}

#[test]
fn same_seed_writes_identical_files() {
    let first = tempdir().unwrap();
    let second = tempdir().unwrap();
    generate_into(first.path(), 7, 20);
    generate_into(second.path(), 7, 20);
    for name in ["sc3.csv", "dm3.csv", "vs3.csv"] {
        assert_eq!(
            fs::read(first.path().join(name)).unwrap(),
            fs::read(second.path().join(name)).unwrap(),
            "{name} differs"
        );
    }
}

#[test]
fn step_by_step_commands_chain_through_files() {
    let dir = tempdir().unwrap();
    let sc = dir.path().join("sc3.csv");
    run_disposition(&DispositionArgs {
        output: sc.clone(),
        seed: seed(3),
        design: DesignArgs {
            design: None,
            subjects: Some(15),
        },
    })
    .unwrap();

    let dm = run_demographics(&DemographicsArgs {
        input: sc.clone(),
        output: dir.path().join("dm3.csv"),
        seed: seed(4),
        design: None,
    })
    .unwrap();
    assert_eq!(dm.tables[0].records, 15);
    assert!(dm.classes.is_none());

    run_vital_signs(&VitalSignsArgs {
        input: sc,
        output: dir.path().join("vs3.csv"),
        seed: seed(5),
        design: None,
    })
    .unwrap();

    let report = run_check(&CheckArgs {
        tables: table_args(dir.path()),
        design: None,
    })
    .unwrap();
    assert!(report.is_clean(), "{:#?}", report.issues);
}

#[test]
fn summary_counts_match_generated_tables() {
    let dir = tempdir().unwrap();
    generate_into(dir.path(), 11, 40);
    let report = run_summary(&table_args(dir.path())).unwrap();

    assert_eq!(report.counts.screened, 40);
    assert_eq!(
        report.counts.randomized(ArmGroup::Overall) + report.counts.screen_failures,
        40
    );
    if report.counts.randomized(ArmGroup::Overall) > 0 {
        assert!(!report.blood_pressure.is_empty());
        assert!(
            report
                .blood_pressure
                .means
                .keys()
                .all(|key| key.test_code == "SBP" || key.test_code == "DBP")
        );
    }
}

#[test]
fn list_covers_every_randomized_subject() {
    let dir = tempdir().unwrap();
    generate_into(dir.path(), 23, 30);
    let listing = run_list(&ListArgs {
        demographics: dir.path().join("dm3.csv"),
    })
    .unwrap();
    let summary = run_summary(&table_args(dir.path())).unwrap();

    assert_eq!(listing.screened, 30);
    assert_eq!(listing.screen_failures, summary.counts.screen_failures);
    assert_eq!(listing.listed(), summary.counts.randomized(ArmGroup::Overall));
    for arm in &listing.arms {
        assert_eq!(
            arm.rows.len(),
            summary.counts.randomized(ArmGroup::Arm(arm.arm))
        );
        assert!(arm.rows.iter().all(|row| !row.site_subject.starts_with("XYZ123")));
    }
}

#[test]
fn check_reports_tampered_demographics() {
    let dir = tempdir().unwrap();
    generate_into(dir.path(), 19, 10);
    let dm_path = dir.path().join("dm3.csv");
    let text = fs::read_to_string(&dm_path).unwrap();
    // Drop the last subject.
    let kept: Vec<&str> = text.lines().collect();
    let truncated = format!("{}\n", kept[..kept.len() - 1].join("\n"));
    fs::write(&dm_path, truncated).unwrap();

    let report = run_check(&CheckArgs {
        tables: table_args(dir.path()),
        design: None,
    })
    .unwrap();
    assert_eq!(report.issues.len(), 1);
    assert!(report.issues[0].message.contains("demographic"));
}

#[test]
fn malformed_input_names_file_and_line() {
    let dir = tempdir().unwrap();
    let sc = dir.path().join("sc3.csv");
    fs::write(
        &sc,
        "XYZ123,000001,0001,XYZ123-0001-000001,9,2010-01-05,0,,,,\n",
    )
    .unwrap();

    let err = run_vital_signs(&VitalSignsArgs {
        input: sc,
        output: dir.path().join("vs3.csv"),
        seed: seed(1),
        design: None,
    })
    .unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("sc3.csv"), "{message}");
    assert!(message.contains("line 1"), "{message}");
    assert!(message.contains("DispositionClass"), "{message}");
    assert!(!dir.path().join("vs3.csv").exists());
}

#[test]
fn design_file_overrides_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("design.json");
    fs::write(&path, r#"{ "study_id": "ABC999", "subject_count": 12 }"#).unwrap();

    let design = load_design(Some(&path), None).unwrap();
    assert_eq!(design.study_id, "ABC999");
    assert_eq!(design.subject_count, 12);
    assert_eq!(design.max_visit, 14);

    let overridden = load_design(Some(&path), Some(3)).unwrap();
    assert_eq!(overridden.subject_count, 3);
}

#[test]
fn invalid_design_file_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("design.json");
    fs::write(&path, r#"{ "site_ids": [] }"#).unwrap();
    let err = load_design(Some(&path), None).unwrap_err();
    assert!(format!("{err:#}").contains("no site ids"));

    fs::write(&path, "{ not json").unwrap();
    assert!(load_design(Some(&path), None).is_err());
}

#[test]
fn study_id_with_a_comma_is_rejected_before_writing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("design.json");
    fs::write(&path, r#"{ "study_id": "XYZ,123" }"#).unwrap();

    let err = run_disposition(&DispositionArgs {
        output: dir.path().join("sc3.csv"),
        seed: seed(5),
        design: DesignArgs {
            design: Some(path),
            subjects: Some(4),
        },
    })
    .unwrap_err();
    assert!(format!("{err:#}").contains("delimiter"), "{err:#}");
    assert!(!dir.path().join("sc3.csv").exists());
}
