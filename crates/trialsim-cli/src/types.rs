use std::collections::BTreeMap;
use std::path::PathBuf;

use trialsim_core::{AgeSummary, ArmCounts, CategoryCounts, VitalSignMeans};
use trialsim_model::DispositionClass;

/// Outcome of a generating command.
#[derive(Debug)]
pub struct GenerationResult {
    pub study_id: String,
    pub seed: u64,
    pub tables: Vec<TableOutput>,
    /// Present when the run generated dispositions.
    pub classes: Option<BTreeMap<DispositionClass, usize>>,
}

#[derive(Debug)]
pub struct TableOutput {
    pub table: &'static str,
    pub path: PathBuf,
    pub records: usize,
}

/// Aggregations printed by the `summary` command.
#[derive(Debug)]
pub struct SummaryReport {
    pub counts: ArmCounts,
    pub ages: AgeSummary,
    pub sexes: CategoryCounts,
    pub races: CategoryCounts,
    pub blood_pressure: VitalSignMeans,
}
