//! Error types for data generation.

use thiserror::Error;
use trialsim_model::ModelError;

#[derive(Debug, Error)]
pub enum GenerateError {
    /// A categorical draw was requested from an empty table.
    #[error("cannot draw from empty {0} table")]
    EmptyTable(&'static str),

    /// A disposition row runs past the design's final visit.
    #[error("subject {subject}: last visit {last_visit} exceeds the final visit {max_visit}")]
    VisitOutOfRange {
        subject: String,
        last_visit: u32,
        max_visit: u32,
    },

    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, GenerateError>;
