#![deny(unsafe_code)]

use std::fmt;

use crate::ModelError;

/// Unique subject identifier, rendered as `STUDYID-SITEID-SUBJID`.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct SubjectKey(String);

impl SubjectKey {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ModelError::EmptySubjectKey);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Join the three identifier parts with `-`.
    pub fn compose(study_id: &str, site_id: &str, subject_id: &str) -> Self {
        Self(format!("{study_id}-{site_id}-{subject_id}"))
    }

    /// True when the key is exactly the composition of the given parts.
    pub fn matches_parts(&self, study_id: &str, site_id: &str, subject_id: &str) -> bool {
        *self == Self::compose(study_id, site_id, subject_id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The key with its leading study id removed, `SITEID-SUBJID`.
    ///
    /// Falls back to dropping everything up to the first `-` when the key
    /// does not start with `study_id`.
    pub fn site_subject(&self, study_id: &str) -> &str {
        self.0
            .strip_prefix(study_id)
            .and_then(|rest| rest.strip_prefix('-'))
            .or_else(|| self.0.split_once('-').map(|(_, rest)| rest))
            .unwrap_or(&self.0)
    }
}

impl fmt::Display for SubjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Composite sort key for vital-sign rows.
///
/// Field order defines the ordering: subject, then test code, then visit.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObservationKey<'a> {
    pub subject_key: &'a SubjectKey,
    pub test_code: &'a str,
    pub visit: u32,
}

/// Left-pad `value` with zeros up to `width` characters.
pub fn zero_pad(value: &str, width: usize) -> String {
    format!("{value:0>width$}")
}
