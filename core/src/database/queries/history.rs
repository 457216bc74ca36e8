use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    database::{models::conversion::ConversionRecord, KeyValueStore},
    services::{
        errors::StorageError,
        shared::constants::{HISTORY_CAPACITY, HISTORY_KEY},
    },
};

/// Most-recent-first log of conversions, mirrored into a [`KeyValueStore`] after every
/// mutation. The in-memory log is authoritative: a failed write is reported but never
/// rolls the mutation back.
pub struct HistoryStore {
    storage: Arc<dyn KeyValueStore>,
    records: Vec<ConversionRecord>,
}

impl HistoryStore {
    /// Missing history starts empty, and so does history that isn't a JSON array.
    /// Entries that don't decode are skipped on their own.
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let records = match storage.get(HISTORY_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
                Ok(entries) => {
                    let mut records = decode_entries(entries);
                    records.truncate(HISTORY_CAPACITY);
                    records
                }
                Err(e) => {
                    warn!("Stored history is malformed, starting with an empty history: {}", e);
                    vec![]
                }
            },
            Ok(None) => vec![],
            Err(e) => {
                warn!("Couldn't read stored history, starting with an empty history: {}", e);
                vec![]
            }
        };
        debug!("Loaded {} history records", records.len());

        HistoryStore { storage, records }
    }

    pub fn records(&self) -> &[ConversionRecord] {
        &self.records
    }

    pub fn append(&mut self, record: ConversionRecord) -> Result<(), StorageError> {
        self.records.insert(0, record);
        self.records.truncate(HISTORY_CAPACITY);
        self.persist()
    }

    /// Drops the stored key instead of writing an empty list.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.records.clear();
        self.storage.remove(HISTORY_KEY).inspect_err(|e| {
            warn!("Couldn't remove stored history: {}", e);
        })
    }

    fn persist(&self) -> Result<(), StorageError> {
        let write = serde_json::to_string(&self.records)
            .map_err(StorageError::from)
            .and_then(|json| self.storage.set(HISTORY_KEY, &json));
        write.inspect_err(|e| warn!("Couldn't persist history: {}", e))
    }
}

fn decode_entries(entries: Vec<serde_json::Value>) -> Vec<ConversionRecord> {
    entries
        .into_iter()
        .filter_map(|entry| {
            serde_json::from_value::<ConversionRecord>(entry)
                .inspect_err(|e| warn!("Skipping unreadable history entry: {}", e))
                .ok()
        })
        .collect()
}
