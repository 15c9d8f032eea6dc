//! Vital-sign test catalog.

use serde::{Deserialize, Serialize};

/// A measured test with its units and the range baselines are drawn from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestDefinition {
    pub code: String,
    pub name: String,
    pub units: String,
    /// Inclusive lower bound of the baseline draw.
    pub baseline_low: u32,
    /// Exclusive upper bound of the baseline draw.
    pub baseline_high: u32,
}

impl TestDefinition {
    pub fn new(code: &str, name: &str, units: &str, baseline: (u32, u32)) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            units: units.to_string(),
            baseline_low: baseline.0,
            baseline_high: baseline.1,
        }
    }

    pub fn is_blood_pressure(&self) -> bool {
        is_blood_pressure_code(&self.code)
    }
}

pub fn is_blood_pressure_code(code: &str) -> bool {
    matches!(code, "SBP" | "DBP")
}

/// Ordered list of tests generated per subject and visit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCatalog {
    tests: Vec<TestDefinition>,
}

impl TestCatalog {
    pub fn new(tests: Vec<TestDefinition>) -> Self {
        Self { tests }
    }

    pub fn tests(&self) -> &[TestDefinition] {
        &self.tests
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    pub fn get(&self, code: &str) -> Option<&TestDefinition> {
        self.tests.iter().find(|test| test.code == code)
    }
}

impl Default for TestCatalog {
    /// Systolic and diastolic blood pressure, then heart rate.
    fn default() -> Self {
        Self::new(vec![
            TestDefinition::new("SBP", "Systolic Blood Pressure", "mmHg", (120, 160)),
            TestDefinition::new("DBP", "Diastolic Blood Pressure", "mmHg", (90, 120)),
            TestDefinition::new("HR", "Heart Rate", "bpm", (70, 120)),
        ])
    }
}
