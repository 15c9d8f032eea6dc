//! Cross-table consistency checks over persisted tables.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use tracing::{debug, info};
use trialsim_model::{
    DemographicRecord, DispositionClass, DispositionRecord, SubjectKey, TestCatalog,
    VitalSignRecord, add_days,
};

use crate::vital_signs::BASELINE_VISIT;

/// Which table an issue was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TableKind {
    Disposition,
    Demographic,
    VitalSign,
}

impl TableKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TableKind::Disposition => "disposition",
            TableKind::Demographic => "demographic",
            TableKind::VitalSign => "vital-sign",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsistencyIssue {
    pub table: TableKind,
    pub subject_key: SubjectKey,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsistencyReport {
    pub issues: Vec<ConsistencyIssue>,
    pub subjects_checked: usize,
}

impl ConsistencyReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issue counts per table.
    pub fn counts(&self) -> BTreeMap<TableKind, usize> {
        let mut counts = BTreeMap::new();
        for issue in &self.issues {
            *counts.entry(issue.table).or_default() += 1;
        }
        counts
    }

    fn push(&mut self, table: TableKind, subject_key: &SubjectKey, message: impl Into<String>) {
        let message = message.into();
        debug!(table = %table, subject = %subject_key, %message, "consistency issue");
        self.issues.push(ConsistencyIssue {
            table,
            subject_key: subject_key.clone(),
            message,
        });
    }
}

/// Study parameters the checks compare against.
#[derive(Debug, Clone)]
pub struct CheckContext<'a> {
    pub max_visit: u32,
    pub visit_interval_days: u32,
    pub catalog: &'a TestCatalog,
}

/// Check the three tables against the disposition invariants and against
/// each other.
pub fn check_consistency(
    dispositions: &[DispositionRecord],
    demographics: &[DemographicRecord],
    vital_signs: &[VitalSignRecord],
    context: &CheckContext<'_>,
) -> ConsistencyReport {
    let mut report = ConsistencyReport {
        subjects_checked: dispositions.len(),
        ..ConsistencyReport::default()
    };

    for record in dispositions {
        check_disposition(record, context, &mut report);
    }

    let by_key: HashMap<&SubjectKey, &DispositionRecord> = dispositions
        .iter()
        .map(|record| (&record.subject_key, record))
        .collect();

    check_demographics(demographics, dispositions, &by_key, &mut report);
    check_vital_signs(vital_signs, dispositions, &by_key, context, &mut report);

    info!(
        subjects = report.subjects_checked,
        issues = report.issues.len(),
        "consistency check complete"
    );
    report
}

fn check_disposition(
    record: &DispositionRecord,
    context: &CheckContext<'_>,
    report: &mut ConsistencyReport,
) {
    let key = &record.subject_key;
    let table = TableKind::Disposition;
    if !key.matches_parts(&record.study_id, &record.site_id, &record.subject_id) {
        report.push(table, key, "subject key does not match study, site and subject ids");
    }

    match record.class {
        DispositionClass::ScreenFail => {
            if record.last_visit != 0 {
                report.push(
                    table,
                    key,
                    format!("screen failure with last visit {}", record.last_visit),
                );
            }
            if record.treatment_start.is_some()
                || record.treatment_end.is_some()
                || record.arm_code.is_some()
                || record.arm_name.is_some()
            {
                report.push(table, key, "screen failure with treatment dates or arm");
            }
            return;
        }
        DispositionClass::Withdrawn => {
            if record.last_visit == 0 || record.last_visit >= context.max_visit {
                report.push(
                    table,
                    key,
                    format!(
                        "withdrawn subject with last visit {} outside 1..={}",
                        record.last_visit,
                        context.max_visit.saturating_sub(1)
                    ),
                );
            }
        }
        DispositionClass::Completer => {
            if record.last_visit != context.max_visit {
                report.push(
                    table,
                    key,
                    format!(
                        "completer with last visit {}, expected {}",
                        record.last_visit, context.max_visit
                    ),
                );
            }
        }
    }

    if record.arm_code.is_none() || record.arm_name.is_none() {
        report.push(table, key, "treated subject without an arm");
    }
    let interval = i64::from(context.visit_interval_days);
    let expected_start = add_days(record.enrollment_date, interval).ok();
    let expected_end = interval
        .checked_mul(i64::from(record.last_visit))
        .and_then(|days| add_days(record.enrollment_date, days).ok());
    if record.treatment_start != expected_start {
        report.push(table, key, "treatment start is not one visit after enrollment");
    }
    if record.treatment_end != expected_end {
        report.push(table, key, "treatment end does not match the last visit");
    }
}

fn check_demographics(
    demographics: &[DemographicRecord],
    dispositions: &[DispositionRecord],
    by_key: &HashMap<&SubjectKey, &DispositionRecord>,
    report: &mut ConsistencyReport,
) {
    let table = TableKind::Demographic;
    for record in demographics {
        let key = &record.subject_key;
        if !key.matches_parts(&record.study_id, &record.site_id, &record.subject_id) {
            report.push(table, key, "subject key does not match study, site and subject ids");
        }
        let Some(disposition) = by_key.get(key) else {
            report.push(table, key, "subject missing from the disposition table");
            continue;
        };
        if record.enrollment_date != disposition.enrollment_date
            || record.treatment_start != disposition.treatment_start
            || record.treatment_end != disposition.treatment_end
        {
            report.push(table, key, "dates differ from the disposition table");
        }
        if record.arm_code != disposition.arm_code || record.arm_name != disposition.arm_name {
            report.push(table, key, "arm differs from the disposition table");
        }
        if record.birth_date.is_some() && record.age.is_none() {
            report.push(table, key, "birth date without an age");
        }
    }
    let present: HashSet<&SubjectKey> = demographics.iter().map(|r| &r.subject_key).collect();
    for disposition in dispositions {
        if !present.contains(&disposition.subject_key) {
            report.push(
                table,
                &disposition.subject_key,
                "subject missing from the demographic table",
            );
        }
    }
}

fn check_vital_signs(
    vital_signs: &[VitalSignRecord],
    dispositions: &[DispositionRecord],
    by_key: &HashMap<&SubjectKey, &DispositionRecord>,
    context: &CheckContext<'_>,
    report: &mut ConsistencyReport,
) {
    let table = TableKind::VitalSign;
    let mut rows: HashMap<&SubjectKey, Vec<&VitalSignRecord>> = HashMap::new();
    for row in vital_signs {
        let key = &row.subject_key;
        if !key.matches_parts(&row.study_id, &row.site_id, &row.subject_id) {
            report.push(table, key, "subject key does not match study, site and subject ids");
        }
        rows.entry(key).or_default().push(row);

        let Some(disposition) = by_key.get(key) else {
            continue;
        };
        if row.original_result.is_some() != disposition.arm_code.is_some() {
            report.push(
                table,
                key,
                format!(
                    "visit {} {}: result presence does not match arm assignment",
                    row.visit, row.test_code
                ),
            );
        }
        if row.baseline_flag != (row.visit == BASELINE_VISIT) {
            report.push(
                table,
                key,
                format!("visit {}: baseline flag is {}", row.visit, row.baseline_flag),
            );
        }
    }

    let mut unknown: HashSet<&SubjectKey> = HashSet::new();
    for row in vital_signs {
        let key = &row.subject_key;
        if !by_key.contains_key(key) && unknown.insert(key) {
            report.push(table, key, "subject missing from the disposition table");
        }
    }

    let tests = context.catalog.len() as u64;
    for disposition in dispositions {
        let key = &disposition.subject_key;
        let subject_rows = rows.get(key).map(Vec::as_slice).unwrap_or_default();
        let expected = disposition.visit_count().saturating_mul(tests);
        if subject_rows.len() as u64 != expected {
            report.push(
                table,
                key,
                format!("{} rows, expected {expected}", subject_rows.len()),
            );
        }

        let mut sequences: Vec<u32> = subject_rows.iter().map(|row| row.sequence).collect();
        sequences.sort_unstable();
        let contiguous = sequences
            .iter()
            .enumerate()
            .all(|(index, &sequence)| sequence as usize == index + 1);
        if !contiguous {
            report.push(table, key, "sequence numbers are not exactly 1..n");
        }
    }
}
