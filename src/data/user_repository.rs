use crate::domain::repository::{UserRepository, UserTransaction};
use crate::domain::user::User;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{OwnedRwLockWriteGuard, RwLock};
use tracing::{debug, instrument, trace};
use uuid::Uuid;

type UserTable = HashMap<Uuid, User>;

#[derive(Clone)]
pub struct InMemoryUserRepository {
    storage: Arc<RwLock<UserTable>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn with_id(mut user: User) -> User {
    if user.id.is_none() {
        user.id = Some(Uuid::new_v4());
    }
    user
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self), fields(email = email))]
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        trace!("Acquiring read lock for user storage");
        let storage = self.storage.read().await;
        let user = storage.values().find(|u| u.email == email).cloned();
        match &user {
            Some(u) => debug!(user_id = ?u.id, "User found in storage"),
            None => trace!("User not found in storage"),
        }
        Ok(user)
    }

    #[instrument(skip(self), fields(email = email))]
    async fn exists_by_email(&self, email: &str) -> Result<bool> {
        let storage = self.storage.read().await;
        Ok(storage.values().any(|u| u.email == email))
    }

    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn save(&self, user: User) -> Result<User> {
        let user = with_id(user);
        let mut storage = self.storage.write().await;
        if let Some(id) = user.id {
            storage.insert(id, user.clone());
        }
        debug!(user_id = ?user.id, "User saved to memory storage");
        Ok(user)
    }

    #[instrument(skip(self), fields(user_id = %id))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let storage = self.storage.read().await;
        Ok(storage.get(&id).cloned())
    }

    #[instrument(skip(self))]
    async fn begin(&self) -> Result<Box<dyn UserTransaction>> {
        trace!("Acquiring write lock for user transaction");
        let guard = self.storage.clone().write_owned().await;
        Ok(Box::new(InMemoryUserTransaction {
            guard,
            staged: Vec::new(),
            committed: false,
        }))
    }
}

/// Holds the write lock for its whole lifetime, so concurrent transactions
/// on the same repository run one after another.
pub struct InMemoryUserTransaction {
    guard: OwnedRwLockWriteGuard<UserTable>,
    staged: Vec<User>,
    committed: bool,
}

#[async_trait]
impl UserTransaction for InMemoryUserTransaction {
    async fn exists_by_email(&mut self, email: &str) -> Result<bool> {
        Ok(self.staged.iter().any(|u| u.email == email)
            || self.guard.values().any(|u| u.email == email))
    }

    async fn save(&mut self, user: User) -> Result<User> {
        let user = with_id(user);
        self.staged.retain(|staged| staged.id != user.id);
        self.staged.push(user.clone());
        trace!(user_id = ?user.id, "User staged in transaction");
        Ok(user)
    }

    async fn commit(&mut self) -> Result<()> {
        for user in self.staged.drain(..) {
            if let Some(id) = user.id {
                self.guard.insert(id, user);
            }
        }
        self.committed = true;
        debug!("User transaction committed");
        Ok(())
    }
}

impl Drop for InMemoryUserTransaction {
    fn drop(&mut self) {
        if !self.committed && !self.staged.is_empty() {
            debug!(discarded = self.staged.len(), "User transaction rolled back");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str) -> User {
        User::new("usuario", email, "senha")
    }

    #[tokio::test]
    async fn test_save_assigns_id() {
        let repo = InMemoryUserRepository::new();

        let saved = repo.save(user("usuario@email.com")).await.unwrap();

        assert!(saved.id.is_some());
        let retrieved = repo.find_by_id(saved.id.unwrap()).await.unwrap().unwrap();
        assert_eq!(retrieved, saved);
    }

    #[tokio::test]
    async fn test_save_overwrites_existing_user() {
        let repo = InMemoryUserRepository::new();
        let mut saved = repo.save(user("first@example.com")).await.unwrap();
        let id = saved.id;

        saved.email = "second@example.com".to_string();
        let updated = repo.save(saved).await.unwrap();

        assert_eq!(updated.id, id);
        let retrieved = repo.find_by_id(id.unwrap()).await.unwrap().unwrap();
        assert_eq!(retrieved.email, "second@example.com");
        assert!(!repo.exists_by_email("first@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_exists_by_email() {
        let repo = InMemoryUserRepository::new();
        repo.save(user("usuario@gmail.com")).await.unwrap();

        assert!(repo.exists_by_email("usuario@gmail.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_exists_by_email_false_for_empty_store() {
        let repo = InMemoryUserRepository::new();

        assert!(!repo.exists_by_email("usuario@gmail.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_find_by_email() {
        let repo = InMemoryUserRepository::new();
        repo.save(user("usuario@email.com")).await.unwrap();

        let found = repo.find_by_email("usuario@email.com").await.unwrap();
        assert_eq!(found.unwrap().email, "usuario@email.com");
    }

    #[tokio::test]
    async fn test_find_by_email_returns_none_for_nonexistent_email() {
        let repo = InMemoryUserRepository::new();

        let found = repo.find_by_email("usuario@email.com").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_find_by_email_case_sensitive() {
        let repo = InMemoryUserRepository::new();
        repo.save(user("Test@Example.com")).await.unwrap();

        assert!(repo.find_by_email("Test@Example.com").await.unwrap().is_some());
        assert!(repo.find_by_email("test@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_committed_transaction_is_visible() {
        let repo = InMemoryUserRepository::new();

        let saved = {
            let mut tx = repo.begin().await.unwrap();
            let saved = tx.save(user("tx@example.com")).await.unwrap();
            assert!(tx.exists_by_email("tx@example.com").await.unwrap());
            tx.commit().await.unwrap();
            saved
        };

        let found = repo.find_by_email("tx@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, saved.id);
    }

    #[tokio::test]
    async fn test_dropped_transaction_rolls_back() {
        let repo = InMemoryUserRepository::new();

        {
            let mut tx = repo.begin().await.unwrap();
            tx.save(user("rollback@example.com")).await.unwrap();
        }

        assert!(!repo.exists_by_email("rollback@example.com").await.unwrap());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_transactions_are_serialized() {
        let repo = InMemoryUserRepository::new();

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    let mut tx = repo.begin().await.unwrap();
                    if tx.exists_by_email("race@example.com").await.unwrap() {
                        return false;
                    }
                    // Give other registrations a chance to run between check and save
                    tokio::task::yield_now().await;
                    tx.save(User::new("racer", "race@example.com", "p"))
                        .await
                        .unwrap();
                    tx.commit().await.unwrap();
                    true
                })
            })
            .collect();

        let mut written = 0;
        for handle in handles {
            if handle.await.unwrap() {
                written += 1;
            }
        }
        assert_eq!(written, 1);
    }
}
