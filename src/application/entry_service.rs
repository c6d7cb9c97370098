use crate::domain::entry::{Entry, EntryFilter, EntryStatus};
use crate::domain::error::DomainError;
use crate::domain::repository::EntryRepository;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

pub struct EntryService<R: EntryRepository> {
    repository: Arc<R>,
}

fn rule(msg: &str) -> anyhow::Error {
    warn!(reason = msg, "Entry rejected");
    DomainError::business_rule(msg).into()
}

fn require_id(entry: &Entry) -> Result<Uuid> {
    entry
        .id
        .ok_or_else(|| rule("entry must have an id for this operation"))
}

impl<R: EntryRepository> EntryService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn validate(&self, entry: &Entry) -> Result<()> {
        if entry.description.trim().is_empty() {
            return Err(rule("enter a valid description"));
        }
        if !(1..=12).contains(&entry.month) {
            return Err(rule("enter a valid month"));
        }
        if !(1000..=9999).contains(&entry.year) {
            return Err(rule("enter a valid year"));
        }
        if entry.user_id.is_none() {
            return Err(rule("enter a user"));
        }
        if entry.amount.inner() == 0 {
            return Err(rule("enter a valid amount"));
        }
        if entry.kind.is_none() {
            return Err(rule("enter an entry kind"));
        }
        Ok(())
    }

    /// New entries always start out pending.
    #[instrument(skip(self, entry), fields(user_id = ?entry.user_id))]
    pub async fn save(&self, mut entry: Entry) -> Result<Entry> {
        self.validate(&entry)?;
        entry.status = Some(EntryStatus::Pending);
        let saved = self.repository.save(entry).await?;
        info!(entry_id = ?saved.id, "Entry created");
        Ok(saved)
    }

    #[instrument(skip(self, entry), fields(entry_id = ?entry.id))]
    pub async fn update(&self, entry: Entry) -> Result<Entry> {
        require_id(&entry)?;
        self.validate(&entry)?;
        let saved = self.repository.save(entry).await?;
        info!("Entry updated");
        Ok(saved)
    }

    #[instrument(skip(self, entry), fields(entry_id = ?entry.id))]
    pub async fn delete(&self, entry: &Entry) -> Result<()> {
        let id = require_id(entry)?;
        self.repository.delete(id).await?;
        info!("Entry deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn search(&self, filter: &EntryFilter) -> Result<Vec<Entry>> {
        let entries = self.repository.find(filter).await?;
        debug!(count = entries.len(), "Search finished");
        Ok(entries)
    }

    pub async fn update_status(&self, mut entry: Entry, status: EntryStatus) -> Result<Entry> {
        entry.status = Some(status);
        self.update(entry).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Entry>> {
        self.repository.find_by_id(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::entry_repository::InMemoryEntryRepository;
    use crate::domain::entry::{Amount, EntryKind};

    fn service() -> EntryService<InMemoryEntryRepository> {
        EntryService::new(Arc::new(InMemoryEntryRepository::new()))
    }

    fn valid_entry() -> Entry {
        Entry {
            description: "Groceries".to_string(),
            month: 5,
            year: 2024,
            user_id: Some(Uuid::new_v4()),
            amount: Amount::new(4250),
            kind: Some(EntryKind::Expense),
            ..Default::default()
        }
    }

    fn rule_message(err: &anyhow::Error) -> Option<&str> {
        match err.downcast_ref::<DomainError>() {
            Some(DomainError::BusinessRule(msg)) => Some(msg.as_str()),
            _ => None,
        }
    }

    #[test]
    fn test_validate_accepts_complete_entry() {
        assert!(service().validate(&valid_entry()).is_ok());
    }

    #[test]
    fn test_validate_rejects_each_missing_field() {
        let service = service();
        let cases: Vec<(Entry, &str)> = vec![
            (
                Entry {
                    description: "  ".to_string(),
                    ..valid_entry()
                },
                "enter a valid description",
            ),
            (Entry { month: 0, ..valid_entry() }, "enter a valid month"),
            (Entry { month: 13, ..valid_entry() }, "enter a valid month"),
            (Entry { year: 24, ..valid_entry() }, "enter a valid year"),
            (Entry { user_id: None, ..valid_entry() }, "enter a user"),
            (
                Entry {
                    amount: Amount::new(0),
                    ..valid_entry()
                },
                "enter a valid amount",
            ),
            (Entry { kind: None, ..valid_entry() }, "enter an entry kind"),
        ];

        for (entry, expected) in cases {
            let err = service.validate(&entry).unwrap_err();
            assert_eq!(rule_message(&err), Some(expected));
        }
    }

    #[tokio::test]
    async fn test_save_sets_pending_status() {
        let service = service();
        let entry = Entry {
            status: Some(EntryStatus::Settled),
            ..valid_entry()
        };

        let saved = service.save(entry).await.unwrap();

        assert!(saved.id.is_some());
        assert_eq!(saved.status, Some(EntryStatus::Pending));
    }

    #[tokio::test]
    async fn test_save_invalid_entry_is_not_persisted() {
        let service = service();

        assert!(service.save(Entry::default()).await.is_err());
        let all = service.search(&EntryFilter::default()).await.unwrap();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn test_update_requires_id() {
        let err = service().update(valid_entry()).await.unwrap_err();
        assert!(rule_message(&err).is_some());
    }

    #[tokio::test]
    async fn test_delete_requires_id() {
        let err = service().delete(&valid_entry()).await.unwrap_err();
        assert!(rule_message(&err).is_some());
    }

    #[tokio::test]
    async fn test_delete_removes_entry() {
        let service = service();
        let saved = service.save(valid_entry()).await.unwrap();

        service.delete(&saved).await.unwrap();

        assert!(service.find_by_id(saved.id.unwrap()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_status() {
        let service = service();
        let saved = service.save(valid_entry()).await.unwrap();

        let updated = service
            .update_status(saved.clone(), EntryStatus::Settled)
            .await
            .unwrap();

        assert_eq!(updated.id, saved.id);
        let stored = service.find_by_id(saved.id.unwrap()).await.unwrap().unwrap();
        assert_eq!(stored.status, Some(EntryStatus::Settled));
    }

    #[tokio::test]
    async fn test_search_by_user_and_description() {
        let service = service();
        let owner = Uuid::new_v4();
        service
            .save(Entry {
                user_id: Some(owner),
                description: "Internet bill".to_string(),
                ..valid_entry()
            })
            .await
            .unwrap();
        service
            .save(Entry {
                user_id: Some(owner),
                description: "Gym".to_string(),
                ..valid_entry()
            })
            .await
            .unwrap();
        service.save(valid_entry()).await.unwrap();

        let filter = EntryFilter {
            user_id: Some(owner),
            description: Some("bill".to_string()),
            ..Default::default()
        };
        let found = service.search(&filter).await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].description, "Internet bill");
    }
}
