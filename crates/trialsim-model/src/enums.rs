//! Type-safe enumerations for subject disposition and treatment arms.
//!
//! Both are persisted as small integer codes. The codes are part of the
//! table format and must not change.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ModelError;

/// Trial outcome classification of a subject.
///
/// - **ScreenFail** (0): excluded at screening, never treated
/// - **Withdrawn** (1): treated, left before the final visit
/// - **Completer** (2): attended every scheduled visit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DispositionClass {
    ScreenFail,
    Withdrawn,
    Completer,
}

impl DispositionClass {
    pub const ALL: [DispositionClass; 3] = [
        DispositionClass::ScreenFail,
        DispositionClass::Withdrawn,
        DispositionClass::Completer,
    ];

    /// Integer code used in the disposition table.
    pub fn code(self) -> u8 {
        match self {
            DispositionClass::ScreenFail => 0,
            DispositionClass::Withdrawn => 1,
            DispositionClass::Completer => 2,
        }
    }

    pub fn from_code(code: i64) -> Result<Self, ModelError> {
        match code {
            0 => Ok(DispositionClass::ScreenFail),
            1 => Ok(DispositionClass::Withdrawn),
            2 => Ok(DispositionClass::Completer),
            other => Err(ModelError::InvalidDispositionCode(other)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DispositionClass::ScreenFail => "Screen Failure",
            DispositionClass::Withdrawn => "Withdrawn",
            DispositionClass::Completer => "Completer",
        }
    }

    /// True for subjects that received study treatment.
    pub fn is_treated(self) -> bool {
        !matches!(self, DispositionClass::ScreenFail)
    }
}

impl fmt::Display for DispositionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Randomized treatment arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TreatmentArm {
    Placebo,
    Active,
}

impl TreatmentArm {
    pub fn code(self) -> u8 {
        match self {
            TreatmentArm::Placebo => 0,
            TreatmentArm::Active => 1,
        }
    }

    pub fn from_code(code: i64) -> Result<Self, ModelError> {
        match code {
            0 => Ok(TreatmentArm::Placebo),
            1 => Ok(TreatmentArm::Active),
            other => Err(ModelError::InvalidArmCode(other)),
        }
    }

    pub fn default_name(self) -> &'static str {
        match self {
            TreatmentArm::Placebo => "Placebo",
            TreatmentArm::Active => "Active",
        }
    }
}

impl fmt::Display for TreatmentArm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.default_name())
    }
}
