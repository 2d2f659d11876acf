//! CSV encoding of record sets for the blob store, and decoding of what is already stored.

use crate::error::{IntakeError, IntakeResult};
use crate::types::{DataSet, Value};

/// UTF-8 byte order mark, written so spreadsheet tools detect the encoding.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Render a record set as comma-delimited CSV with a header row.
pub fn encode_csv(data: &DataSet, with_bom: bool) -> IntakeResult<Vec<u8>> {
    let mut buf = Vec::new();
    if with_bom {
        buf.extend_from_slice(UTF8_BOM);
    }

    let mut wtr = csv::WriterBuilder::new().has_headers(true).from_writer(buf);
    wtr.write_record(data.schema.field_names())?;
    for row in &data.rows {
        wtr.write_record(row.iter().map(Value::to_text))?;
    }
    wtr.into_inner()
        .map_err(|e| IntakeError::Io(e.into_error()))
}

/// A stored CSV blob, decoded as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredTable {
    /// Header row.
    pub headers: csv::StringRecord,
    /// Data rows in file order.
    pub rows: Vec<csv::StringRecord>,
}

impl StoredTable {
    /// Index of a header, matched after trimming.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name)
    }
}

/// Decode a stored CSV blob, tolerating a leading byte order mark.
///
/// `key` is only used to name the blob in errors.
pub fn decode_csv(key: &str, bytes: &[u8]) -> IntakeResult<StoredTable> {
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let malformed = |e: csv::Error| IntakeError::MalformedStoredObject {
        key: key.to_string(),
        message: e.to_string(),
    };

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(body);
    let headers = rdr.headers().map_err(malformed)?.clone();
    let rows = rdr
        .records()
        .collect::<Result<Vec<_>, _>>()
        .map_err(malformed)?;

    Ok(StoredTable { headers, rows })
}
