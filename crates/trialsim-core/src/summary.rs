//! Aggregations over the persisted tables.
//!
//! Demographic summaries cover randomized subjects only; screen failures are
//! counted separately in [`ArmCounts`].

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use trialsim_model::{
    DemographicRecord, DispositionRecord, SubjectKey, TreatmentArm, VitalSignRecord,
    is_blood_pressure_code,
};

/// A summary column: one treatment arm or all randomized subjects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArmGroup {
    Arm(TreatmentArm),
    Overall,
}

impl ArmGroup {
    pub const ALL: [ArmGroup; 3] = [
        ArmGroup::Arm(TreatmentArm::Placebo),
        ArmGroup::Arm(TreatmentArm::Active),
        ArmGroup::Overall,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ArmGroup::Arm(arm) => arm.default_name(),
            ArmGroup::Overall => "Overall",
        }
    }

    /// The arm's own column plus Overall.
    fn for_arm(arm: TreatmentArm) -> [ArmGroup; 2] {
        [ArmGroup::Arm(arm), ArmGroup::Overall]
    }
}

impl fmt::Display for ArmGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Subject counts by screening outcome and arm.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArmCounts {
    pub screened: usize,
    pub screen_failures: usize,
    pub randomized: BTreeMap<ArmGroup, usize>,
}

impl ArmCounts {
    pub fn from_demographics(records: &[DemographicRecord]) -> Self {
        let mut counts = Self {
            screened: records.len(),
            ..Self::default()
        };
        for record in records {
            match record.arm_code {
                Some(arm) => {
                    for group in ArmGroup::for_arm(arm) {
                        *counts.randomized.entry(group).or_default() += 1;
                    }
                }
                None => counts.screen_failures += 1,
            }
        }
        counts
    }

    /// Randomized subjects in `group`; zero when the group is empty.
    pub fn randomized(&self, group: ArmGroup) -> usize {
        self.randomized.get(&group).copied().unwrap_or(0)
    }
}

/// Descriptive statistics of a non-empty sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgeStatistics {
    pub n: usize,
    pub mean: f64,
    /// Population standard deviation.
    pub sd: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

impl AgeStatistics {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len();
        let mean = values.iter().sum::<f64>() / n as f64;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let median = if n % 2 == 1 {
            sorted[n / 2]
        } else {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        };

        Some(Self {
            n,
            mean,
            sd: variance.sqrt(),
            median,
            min: sorted[0],
            max: sorted[n - 1],
        })
    }
}

/// Age statistics per arm group over non-missing ages, plus the number of
/// randomized subjects whose age is missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgeSummary {
    pub groups: BTreeMap<ArmGroup, AgeStatistics>,
    pub missing: BTreeMap<ArmGroup, usize>,
}

impl AgeSummary {
    pub fn by_arm(records: &[DemographicRecord]) -> Self {
        let mut samples: BTreeMap<ArmGroup, Vec<f64>> = BTreeMap::new();
        let mut missing: BTreeMap<ArmGroup, usize> = BTreeMap::new();
        for record in records {
            let Some(arm) = record.arm_code else {
                continue;
            };
            for group in ArmGroup::for_arm(arm) {
                match record.age {
                    Some(age) => samples.entry(group).or_default().push(f64::from(age)),
                    None => *missing.entry(group).or_default() += 1,
                }
            }
        }
        let groups = samples
            .into_iter()
            .filter_map(|(group, values)| {
                AgeStatistics::from_values(&values).map(|stats| (group, stats))
            })
            .collect();
        Self { groups, missing }
    }

    pub fn get(&self, group: ArmGroup) -> Option<&AgeStatistics> {
        self.groups.get(&group)
    }

    /// Randomized subjects in `group` without an age.
    pub fn missing(&self, group: ArmGroup) -> usize {
        self.missing.get(&group).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryCount {
    pub count: usize,
    /// Share of the arm group's randomized subjects, in percent.
    pub percent: f64,
}

/// Counts of a categorical attribute keyed by `(value, arm group)`.
///
/// Missing values are not counted but stay in the denominator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryCounts {
    pub counts: BTreeMap<(String, ArmGroup), CategoryCount>,
}

impl CategoryCounts {
    pub fn sex_by_arm(records: &[DemographicRecord]) -> Self {
        Self::by_arm(records, |record| record.sex.as_deref())
    }

    pub fn race_by_arm(records: &[DemographicRecord]) -> Self {
        Self::by_arm(records, |record| record.race.as_deref())
    }

    fn by_arm<F>(records: &[DemographicRecord], value_of: F) -> Self
    where
        F: Fn(&DemographicRecord) -> Option<&str>,
    {
        let totals = ArmCounts::from_demographics(records);
        let mut tallies: BTreeMap<(String, ArmGroup), usize> = BTreeMap::new();
        for record in records {
            let (Some(arm), Some(value)) = (record.arm_code, value_of(record)) else {
                continue;
            };
            for group in ArmGroup::for_arm(arm) {
                *tallies.entry((value.to_string(), group)).or_default() += 1;
            }
        }
        let counts = tallies
            .into_iter()
            .map(|((value, group), count)| {
                let total = totals.randomized(group);
                let percent = if total == 0 {
                    0.0
                } else {
                    count as f64 * 100.0 / total as f64
                };
                ((value, group), CategoryCount { count, percent })
            })
            .collect();
        Self { counts }
    }

    /// Distinct values in sorted order.
    pub fn values(&self) -> Vec<&str> {
        let mut values: Vec<&str> = self.counts.keys().map(|(value, _)| value.as_str()).collect();
        values.dedup();
        values
    }

    pub fn get(&self, value: &str, group: ArmGroup) -> Option<&CategoryCount> {
        self.counts.get(&(value.to_string(), group))
    }
}

/// Key of a mean vital-sign result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeanKey {
    pub group: ArmGroup,
    pub test_code: String,
    pub visit: u32,
}

/// Which tests [`VitalSignMeans::from_tables`] includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TestFilter {
    #[default]
    All,
    BloodPressure,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanResult {
    pub n: usize,
    pub mean: f64,
}

/// Mean standardized result per arm, test and visit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VitalSignMeans {
    pub means: BTreeMap<MeanKey, MeanResult>,
}

impl VitalSignMeans {
    /// Join vital signs to the disposition arm by subject key and average the
    /// results. Rows without an arm, a test code or a result are skipped.
    pub fn from_tables(
        dispositions: &[DispositionRecord],
        vital_signs: &[VitalSignRecord],
        filter: TestFilter,
    ) -> Self {
        let arms: HashMap<&SubjectKey, TreatmentArm> = dispositions
            .iter()
            .filter_map(|record| record.arm_code.map(|arm| (&record.subject_key, arm)))
            .collect();

        let mut sums: BTreeMap<MeanKey, (usize, f64)> = BTreeMap::new();
        for row in vital_signs {
            let Some(arm) = arms.get(&row.subject_key) else {
                continue;
            };
            let Some(result) = row.standardized_result else {
                continue;
            };
            if row.test_code.is_empty() {
                continue;
            }
            if filter == TestFilter::BloodPressure && !is_blood_pressure_code(&row.test_code) {
                continue;
            }
            let key = MeanKey {
                group: ArmGroup::Arm(*arm),
                test_code: row.test_code.clone(),
                visit: row.visit,
            };
            let entry = sums.entry(key).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += result;
        }

        let means = sums
            .into_iter()
            .map(|(key, (n, total))| {
                (
                    key,
                    MeanResult {
                        n,
                        mean: total / n as f64,
                    },
                )
            })
            .collect();
        Self { means }
    }

    pub fn get(&self, group: ArmGroup, test_code: &str, visit: u32) -> Option<&MeanResult> {
        self.means.get(&MeanKey {
            group,
            test_code: test_code.to_string(),
            visit,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.means.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statistics_of_small_sample() {
        let stats = AgeStatistics::from_values(&[30.0, 40.0, 50.0, 60.0]).unwrap();
        assert_eq!(stats.n, 4);
        assert!((stats.mean - 45.0).abs() < 1e-9);
        assert!((stats.sd - 125.0_f64.sqrt()).abs() < 1e-9);
        assert!((stats.median - 45.0).abs() < 1e-9);
        assert_eq!(stats.min, 30.0);
        assert_eq!(stats.max, 60.0);
    }

    #[test]
    fn odd_sample_median_is_middle_value() {
        let stats = AgeStatistics::from_values(&[70.0, 20.0, 50.0]).unwrap();
        assert_eq!(stats.median, 50.0);
    }

    #[test]
    fn empty_sample_has_no_statistics() {
        assert!(AgeStatistics::from_values(&[]).is_none());
    }

    #[test]
    fn groups_order_arms_before_overall() {
        let mut groups = vec![
            ArmGroup::Overall,
            ArmGroup::Arm(TreatmentArm::Active),
            ArmGroup::Arm(TreatmentArm::Placebo),
        ];
        groups.sort();
        assert_eq!(groups, ArmGroup::ALL.to_vec());
        assert_eq!(ArmGroup::Overall.to_string(), "Overall");
    }
}
