//! Fixed lookup tables used for categorical draws.
//!
//! The tables are plain configuration data. Generators borrow them and never
//! mutate them.

use serde::{Deserialize, Serialize};

use crate::enums::TreatmentArm;
use crate::ModelError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Investigator {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmEntry {
    pub arm: TreatmentArm,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupTables {
    pub investigators: Vec<Investigator>,
    /// ISO 3166 alpha-3 country codes.
    pub countries: Vec<String>,
    pub sexes: Vec<String>,
    pub races: Vec<String>,
    pub arms: Vec<ArmEntry>,
}

impl Default for LookupTables {
    fn default() -> Self {
        let investigators = [
            ("AAA", "Smith"),
            ("BBB", "Jones"),
            ("CCC", "Robinson"),
            ("DDD", "Brown"),
            ("EEE", "Green"),
        ]
        .into_iter()
        .map(|(code, name)| Investigator {
            code: code.to_string(),
            name: name.to_string(),
        })
        .collect();
        Self {
            investigators,
            countries: to_strings(&["GBR", "USA", "FRA", "GER", "SWE"]),
            sexes: to_strings(&["M", "F"]),
            races: to_strings(&["White", "Black", "Asian"]),
            arms: vec![
                ArmEntry {
                    arm: TreatmentArm::Placebo,
                    name: TreatmentArm::Placebo.default_name().to_string(),
                },
                ArmEntry {
                    arm: TreatmentArm::Active,
                    name: TreatmentArm::Active.default_name().to_string(),
                },
            ],
        }
    }
}

impl LookupTables {
    /// Every table must offer at least one value to draw from.
    pub fn validate(&self) -> Result<(), ModelError> {
        let empty = [
            ("investigators", self.investigators.is_empty()),
            ("countries", self.countries.is_empty()),
            ("sexes", self.sexes.is_empty()),
            ("races", self.races.is_empty()),
            ("arms", self.arms.is_empty()),
        ];
        for (name, is_empty) in empty {
            if is_empty {
                return Err(ModelError::InvalidLookup(format!("{name} table is empty")));
            }
        }
        Ok(())
    }

    pub fn arm_name(&self, arm: TreatmentArm) -> Option<&str> {
        self.arms
            .iter()
            .find(|entry| entry.arm == arm)
            .map(|entry| entry.name.as_str())
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}
