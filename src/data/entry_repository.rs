use crate::domain::entry::{Entry, EntryFilter};
use crate::domain::repository::EntryRepository;
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};
use uuid::Uuid;

#[derive(Clone)]
pub struct InMemoryEntryRepository {
    storage: Arc<RwLock<HashMap<Uuid, Entry>>>,
}

impl InMemoryEntryRepository {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryEntryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EntryRepository for InMemoryEntryRepository {
    #[instrument(skip(self, entry), fields(entry_id = ?entry.id))]
    async fn save(&self, mut entry: Entry) -> Result<Entry> {
        let id = *entry.id.get_or_insert_with(Uuid::new_v4);
        entry
            .registered_on
            .get_or_insert_with(|| Utc::now().date_naive());
        let mut storage = self.storage.write().await;
        storage.insert(id, entry.clone());
        debug!(entry_id = %id, "Entry saved to memory storage");
        Ok(entry)
    }

    #[instrument(skip(self), fields(entry_id = %id))]
    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut storage = self.storage.write().await;
        if storage.remove(&id).is_some() {
            debug!("Entry removed from memory storage");
        }
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Entry>> {
        let storage = self.storage.read().await;
        Ok(storage.get(&id).cloned())
    }

    #[instrument(skip(self))]
    async fn find(&self, filter: &EntryFilter) -> Result<Vec<Entry>> {
        let storage = self.storage.read().await;
        let mut entries: Vec<Entry> = storage
            .values()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        entries.sort_by(|a, b| (a.year, a.month).cmp(&(b.year, b.month)));
        debug!(count = entries.len(), "Entries matched filter");
        Ok(entries)
    }
}
