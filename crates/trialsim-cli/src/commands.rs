use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, info_span};

use trialsim_core::{
    AgeSummary, ArmCounts, CategoryCounts, CheckContext, ConsistencyReport, StudyRng,
    SubjectListing, TestFilter, VitalSignMeans, check_consistency, generate_demographics, generate_dispositions,
    generate_vital_signs,
};
use trialsim_io::{TableRecord, read_table, write_table};
use trialsim_model::{
    DemographicRecord, DispositionClass, DispositionRecord, LookupTables, StudyDesign,
    TestCatalog, VitalSignRecord,
};

use crate::cli::{
    CheckArgs, DemographicsArgs, DesignArgs, DispositionArgs, GenerateArgs, ListArgs, SeedArg,
    TableArgs, VitalSignsArgs,
};
use crate::types::{GenerationResult, SummaryReport, TableOutput};

pub const DISPOSITION_FILE: &str = "sc3.csv";
pub const DEMOGRAPHIC_FILE: &str = "dm3.csv";
pub const VITAL_SIGN_FILE: &str = "vs3.csv";

/// Load the study design from an optional JSON file and apply CLI overrides.
pub fn load_design(path: Option<&Path>, subjects: Option<u32>) -> Result<StudyDesign> {
    let mut design = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("read design file {}", path.display()))?;
            serde_json::from_str::<StudyDesign>(&text)
                .with_context(|| format!("parse design file {}", path.display()))?
        }
        None => StudyDesign::default(),
    };
    if let Some(subjects) = subjects {
        design.subject_count = subjects;
    }
    design.validate().context("validate study design")?;
    Ok(design)
}

/// Seeded generator; a missing seed is drawn from entropy and logged.
pub fn make_rng(seed: SeedArg) -> StudyRng {
    match seed.seed {
        Some(seed) => StudyRng::seeded(seed),
        None => {
            let rng = StudyRng::from_entropy();
            info!(seed = rng.seed(), "no seed given, drew one");
            rng
        }
    }
}

pub fn run_disposition(args: &DispositionArgs) -> Result<GenerationResult> {
    let design = design_from_args(&args.design)?;
    let mut rng = make_rng(args.seed);
    let span = info_span!("disposition", study_id = %design.study_id, seed = rng.seed());
    let _guard = span.enter();

    let records = generate_dispositions(&design, &LookupTables::default(), &mut rng)
        .context("generate dispositions")?;
    let output = write_output(&args.output, &records)?;
    Ok(GenerationResult {
        study_id: design.study_id,
        seed: rng.seed(),
        classes: Some(class_counts(&records)),
        tables: vec![output],
    })
}

pub fn run_demographics(args: &DemographicsArgs) -> Result<GenerationResult> {
    let design = load_design(args.design.as_deref(), None)?;
    let mut rng = make_rng(args.seed);
    let span = info_span!("demographics", seed = rng.seed());
    let _guard = span.enter();

    let dispositions = read_input::<DispositionRecord>(&args.input)?;
    let records =
        generate_demographics(&dispositions, &LookupTables::default(), &design, &mut rng)
            .context("generate demographics")?;
    let output = write_output(&args.output, &records)?;
    Ok(GenerationResult {
        study_id: study_id_of(&dispositions, &design),
        seed: rng.seed(),
        classes: None,
        tables: vec![output],
    })
}

pub fn run_vital_signs(args: &VitalSignsArgs) -> Result<GenerationResult> {
    let design = load_design(args.design.as_deref(), None)?;
    let mut rng = make_rng(args.seed);
    let span = info_span!("vital_signs", seed = rng.seed());
    let _guard = span.enter();

    let dispositions = read_input::<DispositionRecord>(&args.input)?;
    let records =
        generate_vital_signs(&dispositions, &TestCatalog::default(), &design, &mut rng)
            .context("generate vital signs")?;
    let output = write_output(&args.output, &records)?;
    Ok(GenerationResult {
        study_id: study_id_of(&dispositions, &design),
        seed: rng.seed(),
        classes: None,
        tables: vec![output],
    })
}

/// Generate all three tables. The downstream generators read the disposition
/// table back from disk, as the single-table commands do.
pub fn run_generate(args: &GenerateArgs) -> Result<GenerationResult> {
    let design = design_from_args(&args.design)?;
    let tables = LookupTables::default();
    let mut rng = make_rng(args.seed);
    let span = info_span!("generate", study_id = %design.study_id, seed = rng.seed());
    let _guard = span.enter();

    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("create output dir {}", args.output_dir.display()))?;
    let sc_path = args.output_dir.join(DISPOSITION_FILE);
    let dm_path = args.output_dir.join(DEMOGRAPHIC_FILE);
    let vs_path = args.output_dir.join(VITAL_SIGN_FILE);

    let generated =
        generate_dispositions(&design, &tables, &mut rng).context("generate dispositions")?;
    let mut outputs = vec![write_output(&sc_path, &generated)?];

    let dispositions = read_input::<DispositionRecord>(&sc_path)?;
    let demographics = generate_demographics(&dispositions, &tables, &design, &mut rng)
        .context("generate demographics")?;
    outputs.push(write_output(&dm_path, &demographics)?);

    let vital_signs =
        generate_vital_signs(&dispositions, &TestCatalog::default(), &design, &mut rng)
            .context("generate vital signs")?;
    outputs.push(write_output(&vs_path, &vital_signs)?);

    info!(
        subjects = dispositions.len(),
        vital_sign_rows = vital_signs.len(),
        "study generated"
    );
    Ok(GenerationResult {
        study_id: design.study_id,
        seed: rng.seed(),
        classes: Some(class_counts(&dispositions)),
        tables: outputs,
    })
}

pub fn run_summary(args: &TableArgs) -> Result<SummaryReport> {
    let span = info_span!("summary");
    let _guard = span.enter();

    let dispositions = read_input::<DispositionRecord>(&args.disposition)?;
    let demographics = read_input::<DemographicRecord>(&args.demographics)?;
    let vital_signs = read_input::<VitalSignRecord>(&args.vital_signs)?;

    Ok(SummaryReport {
        counts: ArmCounts::from_demographics(&demographics),
        ages: AgeSummary::by_arm(&demographics),
        sexes: CategoryCounts::sex_by_arm(&demographics),
        races: CategoryCounts::race_by_arm(&demographics),
        blood_pressure: VitalSignMeans::from_tables(
            &dispositions,
            &vital_signs,
            TestFilter::BloodPressure,
        ),
    })
}

pub fn run_list(args: &ListArgs) -> Result<SubjectListing> {
    let span = info_span!("list");
    let _guard = span.enter();

    let demographics = read_input::<DemographicRecord>(&args.demographics)?;
    let listing = SubjectListing::from_demographics(&demographics);
    info!(
        listed = listing.listed(),
        screen_failures = listing.screen_failures,
        "listing built"
    );
    Ok(listing)
}

pub fn run_check(args: &CheckArgs) -> Result<ConsistencyReport> {
    let design = load_design(args.design.as_deref(), None)?;
    let span = info_span!("check");
    let _guard = span.enter();

    let dispositions = read_input::<DispositionRecord>(&args.tables.disposition)?;
    let demographics = read_input::<DemographicRecord>(&args.tables.demographics)?;
    let vital_signs = read_input::<VitalSignRecord>(&args.tables.vital_signs)?;

    let catalog = TestCatalog::default();
    let context = CheckContext {
        max_visit: design.max_visit,
        visit_interval_days: design.visit_interval_days,
        catalog: &catalog,
    };
    Ok(check_consistency(
        &dispositions,
        &demographics,
        &vital_signs,
        &context,
    ))
}

fn design_from_args(args: &DesignArgs) -> Result<StudyDesign> {
    load_design(args.design.as_deref(), args.subjects)
}

fn read_input<T: TableRecord>(path: &Path) -> Result<Vec<T>> {
    read_table(path).with_context(|| format!("read {} table {}", T::TABLE, path.display()))
}

fn write_output<T: TableRecord>(path: &Path, records: &[T]) -> Result<TableOutput> {
    write_table(path, records)
        .with_context(|| format!("write {} table {}", T::TABLE, path.display()))?;
    info!(
        table = T::TABLE,
        path = %path.display(),
        records = records.len(),
        "table written"
    );
    Ok(TableOutput {
        table: T::TABLE,
        path: PathBuf::from(path),
        records: records.len(),
    })
}

fn class_counts(records: &[DispositionRecord]) -> BTreeMap<DispositionClass, usize> {
    let mut counts: BTreeMap<DispositionClass, usize> =
        DispositionClass::ALL.into_iter().map(|class| (class, 0)).collect();
    for record in records {
        *counts.entry(record.class).or_default() += 1;
    }
    counts
}

/// Study id as recorded in the input table, falling back to the design.
fn study_id_of(dispositions: &[DispositionRecord], design: &StudyDesign) -> String {
    dispositions
        .first()
        .map_or_else(|| design.study_id.clone(), |record| record.study_id.clone())
}
