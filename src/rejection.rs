//! Cumulative rejection log: one CSV blob, appended to on every failed submission.
//!
//! Appends are read-modify-write against the store with no locking; two concurrent appends
//! can lose an entry (last writer wins).

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clock::Clock;
use crate::error::{IntakeError, IntakeResult};
use crate::records::UTF8_BOM;
use crate::store::BlobStore;

/// One logged failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectionRecord {
    /// Date of the rejection, `%Y-%m-%d`.
    #[serde(rename = "Fecha")]
    pub date: String,
    /// Time of the rejection, `%H:%M`.
    #[serde(rename = "Hora")]
    pub time: String,
    /// Rejection message.
    #[serde(rename = "Error")]
    pub error: String,
    /// Uploaded filename.
    #[serde(rename = "NombreArchivo")]
    pub filename: String,
}

/// Handle to the rejection log blob at `key`.
pub struct RejectionLog<'a, S: BlobStore + ?Sized> {
    store: &'a S,
    key: &'a str,
}

impl<'a, S: BlobStore + ?Sized> RejectionLog<'a, S> {
    pub fn new(store: &'a S, key: &'a str) -> Self {
        Self { store, key }
    }

    /// All entries, oldest first. A missing log reads as empty.
    pub fn entries(&self) -> IntakeResult<Vec<RejectionRecord>> {
        match self.store.get(self.key)? {
            Some(bytes) => decode(self.key, &bytes),
            None => Ok(Vec::new()),
        }
    }

    /// Append one entry stamped with `clock`'s current date and time.
    pub fn append(&self, clock: &dyn Clock, error: &str, filename: &str) -> IntakeResult<()> {
        let now = clock.now();
        let mut entries = self.entries()?;
        entries.push(RejectionRecord {
            date: now.format("%Y-%m-%d").to_string(),
            time: now.format("%H:%M").to_string(),
            error: error.to_string(),
            filename: filename.to_string(),
        });

        let bytes = encode(&entries)?;
        self.store.put(self.key, &bytes)?;
        debug!(key = self.key, entries = entries.len(), "rejection logged");
        Ok(())
    }
}

fn decode(key: &str, bytes: &[u8]) -> IntakeResult<Vec<RejectionRecord>> {
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    csv::Reader::from_reader(body)
        .deserialize()
        .collect::<Result<Vec<RejectionRecord>, _>>()
        .map_err(|e| IntakeError::MalformedStoredObject {
            key: key.to_string(),
            message: e.to_string(),
        })
}

fn encode(entries: &[RejectionRecord]) -> IntakeResult<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(UTF8_BOM.to_vec());
    if entries.is_empty() {
        wtr.write_record(["Fecha", "Hora", "Error", "NombreArchivo"])?;
    }
    for entry in entries {
        wtr.serialize(entry)?;
    }
    wtr.into_inner()
        .map_err(|e| IntakeError::Io(e.into_error()))
}
