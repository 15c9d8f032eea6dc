//! Delimited-text codec for the disposition, demographic and vital-sign
//! tables.
//!
//! Tables carry no header row and no quoting. Column order is fixed per
//! record type by [`TableRecord::COLUMNS`].

pub mod demographic;
pub mod disposition;
pub mod error;
pub mod fields;
pub mod table;
pub mod vital_sign;

pub use error::{CodecError, Result};
pub use fields::FieldReader;
pub use table::{TableRecord, decode_table, encode_table, read_table, write_table};
