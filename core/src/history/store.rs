use crate::history::storage::Storage;
use crate::history::summary::summarize;
use crate::model::{SimulationParameters, SimulationResult};
use crate::navigation::SimulationId;
use crate::prelude::{epoch_millis, CoreResult};
use crate::telemetry::LogManager;
use serde::{Deserialize, Serialize};

/// Storage key holding the JSON-encoded history list.
pub const HISTORY_KEY: &str = "wirelessSimHistory";

/// Maximum number of runs kept; older runs are evicted first.
pub const MAX_HISTORY: usize = 20;

/// One completed simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: SimulationId,
    /// Epoch milliseconds at which the run was recorded.
    pub timestamp: u64,
    pub form_data: SimulationParameters,
    pub result: SimulationResult,
    pub summary: String,
}

impl HistoryEntry {
    pub fn new(id: SimulationId, form_data: SimulationParameters, result: SimulationResult) -> Self {
        let summary = summarize(&form_data, &result);
        Self {
            id,
            timestamp: epoch_millis(),
            form_data,
            result,
            summary,
        }
    }
}

/// Bounded, most-recent-first history backed by a [`Storage`].
///
/// Entries are cached in memory and written through on every change.
pub struct HistoryStore<S: Storage> {
    storage: S,
    entries: Vec<HistoryEntry>,
    logger: LogManager,
}

impl<S: Storage> HistoryStore<S> {
    /// Loads the persisted list. Unreadable or corrupt data yields an empty
    /// history.
    pub fn load(storage: S) -> Self {
        let logger = LogManager::scoped("history");
        let entries = match storage.read(HISTORY_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
                Ok(mut entries) => {
                    entries.truncate(MAX_HISTORY);
                    entries
                }
                Err(err) => {
                    logger.warn(&format!("discarding corrupt history: {}", err));
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                logger.warn(&format!("history unavailable: {}", err));
                Vec::new()
            }
        };
        logger.debug(&format!("loaded {} history entries", entries.len()));

        Self {
            storage,
            entries,
            logger,
        }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &SimulationId) -> bool {
        self.entries.iter().any(|entry| &entry.id == id)
    }

    pub fn get(&self, id: &SimulationId) -> Option<&HistoryEntry> {
        self.entries.iter().find(|entry| &entry.id == id)
    }

    /// Prepends `entry` unless its id is already present. Returns whether the
    /// list changed. The in-memory list only changes once the write succeeds.
    pub fn append_if_absent(&mut self, entry: HistoryEntry) -> CoreResult<bool> {
        if self.contains(&entry.id) {
            return Ok(false);
        }
        self.logger
            .record(&format!("recording {} ({})", entry.id, entry.summary));
        let mut next = Vec::with_capacity(MAX_HISTORY);
        next.push(entry);
        next.extend(self.entries.iter().take(MAX_HISTORY - 1).cloned());
        self.persist(&next)?;
        self.entries = next;
        Ok(true)
    }

    /// Removes the persisted list first; memory is kept if that fails.
    pub fn clear(&mut self) -> CoreResult<()> {
        self.storage.remove(HISTORY_KEY)?;
        self.entries.clear();
        Ok(())
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn persist(&mut self, entries: &[HistoryEntry]) -> CoreResult<()> {
        let encoded = serde_json::to_string(entries)?;
        self.storage.write(HISTORY_KEY, &encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::storage::{FileStorage, MemoryStorage};
    use crate::prelude::CoreError;
    use tempfile::tempdir;

    /// Memory storage whose writes and removals fail while `offline` is set.
    #[derive(Default)]
    struct FlakyStorage {
        inner: MemoryStorage,
        offline: bool,
    }

    impl Storage for FlakyStorage {
        fn read(&self, key: &str) -> CoreResult<Option<String>> {
            self.inner.read(key)
        }

        fn write(&mut self, key: &str, value: &str) -> CoreResult<()> {
            if self.offline {
                return Err(CoreError::Storage("disk full".into()));
            }
            self.inner.write(key, value)
        }

        fn remove(&mut self, key: &str) -> CoreResult<()> {
            if self.offline {
                return Err(CoreError::Storage("read-only".into()));
            }
            self.inner.remove(key)
        }
    }

    fn entry(id: &str) -> HistoryEntry {
        HistoryEntry::new(
            SimulationId::from(id),
            SimulationParameters::default(),
            SimulationResult::default(),
        )
    }

    #[test]
    fn append_is_idempotent_by_id() {
        let mut store = HistoryStore::load(MemoryStorage::new());
        assert!(store.append_if_absent(entry("sim-1")).unwrap());
        assert!(!store.append_if_absent(entry("sim-1")).unwrap());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn caps_at_twenty_and_evicts_oldest() {
        let mut store = HistoryStore::load(MemoryStorage::new());
        for idx in 0..=MAX_HISTORY {
            store.append_if_absent(entry(&format!("sim-{}", idx))).unwrap();
        }
        assert_eq!(store.len(), MAX_HISTORY);
        assert_eq!(store.entries()[0].id.as_str(), "sim-20");
        assert!(!store.contains(&SimulationId::from("sim-0")));
        assert!(store.contains(&SimulationId::from("sim-1")));
    }

    #[test]
    fn persists_newest_first_and_reloads() {
        let dir = tempdir().unwrap();
        {
            let mut store = HistoryStore::load(FileStorage::new(dir.path()));
            store.append_if_absent(entry("sim-a")).unwrap();
            store.append_if_absent(entry("sim-b")).unwrap();
        }
        let store = HistoryStore::load(FileStorage::new(dir.path()));
        let ids: Vec<&str> = store.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["sim-b", "sim-a"]);
        assert!(store.get(&SimulationId::from("sim-a")).is_some());
    }

    #[test]
    fn corrupt_payload_loads_as_empty() {
        let mut storage = MemoryStorage::new();
        storage.write(HISTORY_KEY, "{not json").unwrap();
        let store = HistoryStore::load(storage);
        assert!(store.is_empty());
    }

    #[test]
    fn clear_removes_persisted_list() {
        let mut store = HistoryStore::load(MemoryStorage::new());
        store.append_if_absent(entry("sim-x")).unwrap();
        store.clear().unwrap();
        assert!(store.is_empty());
        assert_eq!(store.storage().read(HISTORY_KEY).unwrap(), None);
    }

    #[test]
    fn failed_write_leaves_list_unchanged_and_retry_records() {
        let mut store = HistoryStore::load(FlakyStorage {
            offline: true,
            ..Default::default()
        });
        assert!(matches!(
            store.append_if_absent(entry("sim-1")),
            Err(CoreError::Storage(_))
        ));
        assert!(store.is_empty());
        assert!(!store.contains(&SimulationId::from("sim-1")));

        store.storage.offline = false;
        assert!(store.append_if_absent(entry("sim-1")).unwrap());
        assert_eq!(store.len(), 1);
        let reloaded = HistoryStore::load(store.storage().inner.clone());
        assert!(reloaded.contains(&SimulationId::from("sim-1")));
    }

    #[test]
    fn failed_clear_keeps_entries() {
        let mut store = HistoryStore::load(FlakyStorage::default());
        store.append_if_absent(entry("sim-1")).unwrap();

        store.storage.offline = true;
        assert!(store.clear().is_err());
        assert_eq!(store.len(), 1);
        assert!(store.storage().read(HISTORY_KEY).unwrap().is_some());

        store.storage.offline = false;
        store.clear().unwrap();
        assert!(store.is_empty());
        assert_eq!(store.storage().read(HISTORY_KEY).unwrap(), None);
    }

    #[test]
    fn wire_layout_uses_camel_case() {
        let value = serde_json::to_value(entry("sim-9")).unwrap();
        assert_eq!(value["id"], "sim-9");
        assert!(value.get("formData").is_some());
        assert!(value["formData"].get("numberOfAccessPoints").is_some());
        assert_eq!(value["summary"], "3 users, 3 APs, 30s");
    }
}
