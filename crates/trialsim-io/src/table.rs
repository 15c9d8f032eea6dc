use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::{QuoteStyle, ReaderBuilder, StringRecord, WriterBuilder};
use tempfile::NamedTempFile;
use tracing::debug;
use trialsim_model::contains_delimiter;

use crate::error::{CodecError, Result};
use crate::fields::FieldReader;

/// A record type with a fixed column layout.
///
/// Tables have no header row; `COLUMNS` names the fields for diagnostics and
/// fixes their order.
pub trait TableRecord: Sized {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];

    fn to_fields(&self) -> Vec<String>;

    fn from_fields(fields: &FieldReader<'_>) -> Result<Self>;
}

/// Decode every row of a table from `reader`.
pub fn decode_table<T: TableRecord, R: Read>(reader: R) -> Result<Vec<T>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(reader);
    let mut records = Vec::new();
    let mut record = StringRecord::new();
    loop {
        let line = reader.position().line();
        match reader.read_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            Err(source) => {
                return Err(CodecError::Csv {
                    table: T::TABLE,
                    line,
                    source,
                });
            }
        }
        let line = record.position().map_or(line, csv::Position::line);
        let fields = FieldReader::new(T::TABLE, T::COLUMNS, &record, line)?;
        records.push(T::from_fields(&fields)?);
    }
    Ok(records)
}

/// Encode `records` to `writer`, one line per record.
///
/// Fields are never quoted, so a field containing a comma or line break is
/// rejected before anything of its row is written.
pub fn encode_table<T: TableRecord, W: Write>(writer: W, records: &[T]) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Never)
        .from_writer(writer);
    for (index, record) in records.iter().enumerate() {
        let fields = record.to_fields();
        if let Some(column) = fields.iter().position(|field| contains_delimiter(field)) {
            return Err(CodecError::UnencodableField {
                table: T::TABLE,
                line: index as u64 + 1,
                column: T::COLUMNS.get(column).copied().unwrap_or("?"),
                value: fields[column].clone(),
            });
        }
        writer
            .write_record(&fields)
            .map_err(|source| CodecError::Write {
                table: T::TABLE,
                source,
            })?;
    }
    writer.flush().map_err(|err| CodecError::Write {
        table: T::TABLE,
        source: err.into(),
    })?;
    Ok(())
}

/// Read a whole table from disk.
pub fn read_table<T: TableRecord>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path).map_err(|source| CodecError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records = decode_table(file)?;
    debug!(
        table = T::TABLE,
        path = %path.display(),
        record_count = records.len(),
        "table read"
    );
    Ok(records)
}

/// Write a whole table to disk.
///
/// Rows go to a temporary file next to `path`, which is renamed into place
/// only after every row has been written. A failure leaves any existing file
/// untouched.
pub fn write_table<T: TableRecord>(path: &Path, records: &[T]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let io_error = |source| CodecError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut staged = NamedTempFile::new_in(dir).map_err(io_error)?;
    encode_table(&mut staged, records)?;
    staged.as_file().sync_all().map_err(io_error)?;
    staged.persist(path).map_err(|err| io_error(err.error))?;
    debug!(
        table = T::TABLE,
        path = %path.display(),
        record_count = records.len(),
        "table written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Pair {
        name: String,
        count: Option<u32>,
    }

    impl TableRecord for Pair {
        const TABLE: &'static str = "pair";
        const COLUMNS: &'static [&'static str] = &["Name", "Count"];

        fn to_fields(&self) -> Vec<String> {
            vec![
                self.name.clone(),
                crate::fields::optional_int_cell(self.count),
            ]
        }

        fn from_fields(fields: &FieldReader<'_>) -> Result<Self> {
            Ok(Self {
                name: fields.required_text(0)?,
                count: fields.optional(1)?,
            })
        }
    }

    #[test]
    fn encodes_without_header_or_quotes() {
        let rows = vec![
            Pair {
                name: "a".to_string(),
                count: Some(3),
            },
            Pair {
                name: "b".to_string(),
                count: None,
            },
        ];
        let mut out = Vec::new();
        encode_table(&mut out, &rows).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a,3\nb,\n");
    }

    #[test]
    fn refuses_fields_that_would_split_a_row() {
        for name in ["a,b", "a\nb", "a\rb"] {
            let rows = vec![
                Pair {
                    name: "ok".to_string(),
                    count: None,
                },
                Pair {
                    name: name.to_string(),
                    count: Some(1),
                },
            ];
            let err = encode_table(Vec::new(), &rows).unwrap_err();
            assert!(matches!(err, CodecError::UnencodableField { .. }), "{err}");
            assert_eq!(err.line(), Some(2));
            assert_eq!(err.column(), Some("Name"));
        }
    }

    #[test]
    fn decodes_rows_in_order() {
        let rows: Vec<Pair> = decode_table("a,3\nb,\n".as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].count, None);
    }

    #[test]
    fn reports_the_offending_line() {
        let err = decode_table::<Pair, _>("a,3\nb,x\n".as_bytes()).unwrap_err();
        assert_eq!(err.line(), Some(2));
        assert_eq!(err.column(), Some("Count"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = read_table::<Pair>(Path::new("/nonexistent/dir/table.csv")).unwrap_err();
        assert!(matches!(err, CodecError::Io { .. }));
    }
}
