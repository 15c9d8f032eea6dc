//! Generators for the disposition, demographic and vital-sign tables.
//!
//! The disposition table is generated first and persisted. The demographic
//! and vital-sign generators each derive their table from it independently.
//! All generators draw from one caller-owned [`RandomSource`].

pub mod consistency;
pub mod demographics;
pub mod disposition;
pub mod error;
pub mod listing;
pub mod random;
pub mod sequence;
pub mod summary;
pub mod trend;
pub mod vital_signs;

pub use consistency::{
    CheckContext, ConsistencyIssue, ConsistencyReport, TableKind, check_consistency,
};
pub use demographics::generate_demographics;
pub use disposition::{classify, generate_dispositions};
pub use error::{GenerateError, Result};
pub use listing::{ArmListing, ListingRow, SubjectListing};
pub use random::{RandomSource, StudyRng, pick};
pub use sequence::sort_and_sequence;
pub use summary::{
    AgeStatistics, AgeSummary, ArmCounts, ArmGroup, CategoryCount, CategoryCounts, MeanKey,
    MeanResult, TestFilter, VitalSignMeans,
};
pub use trend::{ACTIVE_WINDOWS, TrendWindow, active_window, result_for_visit};
pub use vital_signs::generate_vital_signs;
