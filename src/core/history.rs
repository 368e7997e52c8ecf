// SocLookup - core/history.rs
//
// Bounded, deduplicating search history.
//
// Records are kept most-recent first. Order is insertion order, never
// timestamp order. A repeat of a search already among the last few records
// moves to the top instead of appearing twice; repeats further back are
// kept, so this is a recency window, not a global dedup.
//
// Every mutation persists the full list through the store.

use crate::core::export;
use crate::core::model::{ArtifactType, SearchRecord};
use crate::core::store::{self, KeyValueStore};
use crate::util::constants::{HISTORY_DEDUP_WINDOW, MIN_MAX_HISTORY, STORE_KEY_HISTORY};
use crate::util::error::ExportError;
use std::sync::Arc;
use uuid::Uuid;

/// The process-wide search history.
pub struct HistoryStore {
    records: Vec<SearchRecord>,
    max_size: usize,
    store: Arc<dyn KeyValueStore>,
}

impl HistoryStore {
    /// Load persisted history, bounded at `max_size` records.
    ///
    /// Missing or malformed data yields an empty history.
    pub fn load(store: Arc<dyn KeyValueStore>, max_size: usize) -> Self {
        let max_size = max_size.max(MIN_MAX_HISTORY);
        let mut records: Vec<SearchRecord> =
            store::load_json(store.as_ref(), STORE_KEY_HISTORY).unwrap_or_default();

        if records.len() > max_size {
            tracing::debug!(
                loaded = records.len(),
                max_size,
                "Persisted history exceeds bound; truncating"
            );
            records.truncate(max_size);
        }

        tracing::info!(records = records.len(), max_size, "Search history loaded");
        Self {
            records,
            max_size,
            store,
        }
    }

    /// Record a search at the front of the history.
    ///
    /// An identical `(value, kind)` among the most recent
    /// `HISTORY_DEDUP_WINDOW` records is removed first. The oldest records
    /// are evicted if the bound is exceeded.
    pub fn add_search(&mut self, value: &str, kind: ArtifactType) -> &SearchRecord {
        let window = self.records.len().min(HISTORY_DEDUP_WINDOW);
        if let Some(pos) = self.records[..window]
            .iter()
            .position(|r| r.value == value && r.kind == kind)
        {
            self.records.remove(pos);
            tracing::trace!(kind = %kind, "Repeat search moved to top");
        }

        self.records.insert(0, SearchRecord::new(value, kind));
        self.evict();
        self.persist();
        &self.records[0]
    }

    /// Remove the record with `id`. Returns false if no such record exists.
    pub fn delete_search(&mut self, id: Uuid) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        let removed = self.records.len() != before;
        if removed {
            self.persist();
        }
        removed
    }

    /// Remove every record.
    pub fn clear(&mut self) {
        self.records.clear();
        tracing::info!("Search history cleared");
        self.persist();
    }

    /// Case-insensitive substring match over value and type label.
    ///
    /// An empty query returns every record in current order.
    pub fn search(&self, query: &str) -> Vec<&SearchRecord> {
        if query.is_empty() {
            return self.records.iter().collect();
        }

        let query = query.to_lowercase();
        self.records
            .iter()
            .filter(|r| {
                r.value.to_lowercase().contains(&query)
                    || r.display_type().to_lowercase().contains(&query)
            })
            .collect()
    }

    /// The `limit` most recent records.
    pub fn recent(&self, limit: usize) -> &[SearchRecord] {
        &self.records[..limit.min(self.records.len())]
    }

    /// All records, most recent first.
    pub fn records(&self) -> &[SearchRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Change the bound, evicting the oldest records if needed.
    pub fn set_max_size(&mut self, max_size: usize) {
        self.max_size = max_size.max(MIN_MAX_HISTORY);
        if self.records.len() > self.max_size {
            self.evict();
            self.persist();
        }
    }

    /// CSV export, most recent first.
    pub fn export_csv(&self) -> Result<String, ExportError> {
        export::csv_string(&self.records)
    }

    /// Pretty-printed JSON export, most recent first.
    pub fn export_json(&self) -> Result<String, ExportError> {
        export::json_string(&self.records)
    }

    fn evict(&mut self) {
        if self.records.len() > self.max_size {
            let evicted = self.records.len() - self.max_size;
            self.records.truncate(self.max_size);
            tracing::debug!(evicted, "Evicted oldest history records");
        }
    }

    fn persist(&self) {
        store::save_json(self.store.as_ref(), STORE_KEY_HISTORY, &self.records);
    }
}
