pub mod storage;
pub mod store;
pub mod summary;

pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::{HistoryEntry, HistoryStore, HISTORY_KEY, MAX_HISTORY};
pub use summary::{summarize, ERROR_SUMMARY};
