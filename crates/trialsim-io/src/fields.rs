//! Field-level conversions between typed values and table cells.
//!
//! A missing value is an empty cell. Parsing is strict: a non-empty cell that
//! does not parse is an error, never a default.

use std::fmt::Display;
use std::str::FromStr;

use chrono::NaiveDate;
use csv::StringRecord;

use trialsim_model::DATE_FORMAT;

use crate::error::{CodecError, Result};

pub fn date_cell(value: NaiveDate) -> String {
    value.format(DATE_FORMAT).to_string()
}

pub fn optional_date_cell(value: Option<NaiveDate>) -> String {
    value.map(date_cell).unwrap_or_default()
}

pub fn optional_int_cell<T: Display>(value: Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

pub fn optional_text_cell(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

/// Fixed-point rendering with `decimals` digits after the point.
pub fn optional_float_cell(value: Option<f64>, decimals: usize) -> String {
    value
        .map(|v| format!("{v:.decimals$}"))
        .unwrap_or_default()
}

/// Typed access to the cells of one row.
pub struct FieldReader<'a> {
    table: &'static str,
    columns: &'static [&'static str],
    record: &'a StringRecord,
    line: u64,
}

impl<'a> FieldReader<'a> {
    pub fn new(
        table: &'static str,
        columns: &'static [&'static str],
        record: &'a StringRecord,
        line: u64,
    ) -> Result<Self> {
        if record.len() != columns.len() {
            return Err(CodecError::FieldCount {
                table,
                line,
                expected: columns.len(),
                found: record.len(),
            });
        }
        Ok(Self {
            table,
            columns,
            record,
            line,
        })
    }

    pub fn line(&self) -> u64 {
        self.line
    }

    fn raw(&self, index: usize) -> &'a str {
        self.record.get(index).unwrap_or("")
    }

    pub fn invalid(&self, index: usize, reason: impl Display) -> CodecError {
        CodecError::InvalidField {
            table: self.table,
            line: self.line,
            column: self.columns.get(index).copied().unwrap_or("?"),
            value: self.raw(index).to_string(),
            reason: reason.to_string(),
        }
    }

    /// Cell text as-is; empty cells yield an empty string.
    pub fn text(&self, index: usize) -> String {
        self.raw(index).to_string()
    }

    /// Cell text that must be present.
    pub fn required_text(&self, index: usize) -> Result<String> {
        let value = self.raw(index);
        if value.is_empty() {
            return Err(self.invalid(index, "value is required"));
        }
        Ok(value.to_string())
    }

    pub fn optional_text(&self, index: usize) -> Option<String> {
        let value = self.raw(index);
        (!value.is_empty()).then(|| value.to_string())
    }

    /// Parse a required cell with a custom conversion.
    pub fn parse_with<T, E, F>(&self, index: usize, convert: F) -> Result<T>
    where
        E: Display,
        F: FnOnce(&str) -> std::result::Result<T, E>,
    {
        let value = self.raw(index);
        if value.is_empty() {
            return Err(self.invalid(index, "value is required"));
        }
        convert(value).map_err(|err| self.invalid(index, err))
    }

    /// Parse an optional cell with a custom conversion.
    pub fn parse_optional_with<T, E, F>(&self, index: usize, convert: F) -> Result<Option<T>>
    where
        E: Display,
        F: FnOnce(&str) -> std::result::Result<T, E>,
    {
        let value = self.raw(index);
        if value.is_empty() {
            return Ok(None);
        }
        convert(value)
            .map(Some)
            .map_err(|err| self.invalid(index, err))
    }

    pub fn required<T>(&self, index: usize) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.parse_with(index, str::parse::<T>)
    }

    pub fn optional<T>(&self, index: usize) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.parse_optional_with(index, str::parse::<T>)
    }

    pub fn date(&self, index: usize) -> Result<NaiveDate> {
        self.parse_with(index, parse_date)
    }

    pub fn optional_date(&self, index: usize) -> Result<Option<NaiveDate>> {
        self.parse_optional_with(index, parse_date)
    }
}

fn parse_date(value: &str) -> std::result::Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLUMNS: &[&str] = &["A", "B", "C"];

    #[test]
    fn encodes_missing_values_as_empty_cells() {
        assert_eq!(optional_date_cell(None), "");
        assert_eq!(optional_int_cell::<u32>(None), "");
        assert_eq!(optional_text_cell(None), "");
        assert_eq!(optional_float_cell(None, 1), "");
        assert_eq!(optional_float_cell(Some(133.456), 1), "133.5");
        assert_eq!(optional_float_cell(Some(140.0), 2), "140.00");
    }

    #[test]
    fn reads_typed_cells() {
        let record = StringRecord::from(vec!["2010-02-03", "", "7"]);
        let reader = FieldReader::new("test", COLUMNS, &record, 4).unwrap();
        assert_eq!(
            reader.date(0).unwrap(),
            NaiveDate::from_ymd_opt(2010, 2, 3).unwrap()
        );
        assert_eq!(reader.optional_date(1).unwrap(), None);
        assert_eq!(reader.optional::<u32>(2).unwrap(), Some(7));
        assert_eq!(reader.optional_text(1), None);
    }

    #[test]
    fn reports_line_and_column_on_bad_value() {
        let record = StringRecord::from(vec!["x", "", "seven"]);
        let reader = FieldReader::new("test", COLUMNS, &record, 12).unwrap();
        let err = reader.required::<u32>(2).unwrap_err();
        assert_eq!(err.line(), Some(12));
        assert_eq!(err.column(), Some("C"));
        assert!(err.to_string().contains("seven"));

        let err = reader.required::<u32>(1).unwrap_err();
        assert!(err.to_string().contains("required"));
    }

    #[test]
    fn rejects_wrong_field_count() {
        let record = StringRecord::from(vec!["a", "b"]);
        let err = FieldReader::new("test", COLUMNS, &record, 1)
            .err()
            .expect("field count error");
        assert!(matches!(
            err,
            CodecError::FieldCount {
                expected: 3,
                found: 2,
                ..
            }
        ));
    }
}
