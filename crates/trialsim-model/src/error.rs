use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("unknown disposition code: {0}")]
    InvalidDispositionCode(i64),
    #[error("unknown arm code: {0}")]
    InvalidArmCode(i64),
    #[error("subject key must not be empty")]
    EmptySubjectKey,
    #[error("invalid study design: {0}")]
    InvalidDesign(String),
    #[error("invalid lookup table: {0}")]
    InvalidLookup(String),
    #[error("date out of range: {0}")]
    DateOutOfRange(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
