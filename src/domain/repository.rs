use crate::domain::entry::{Entry, EntryFilter};
use crate::domain::user::User;
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn exists_by_email(&self, email: &str) -> Result<bool>;
    /// Assigns an id when `user.id` is `None`, otherwise overwrites the record.
    async fn save(&self, user: User) -> Result<User>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn begin(&self) -> Result<Box<dyn UserTransaction>>;
}

/// A unit of work against the user store.
///
/// Writes are staged until `commit`. Dropping a transaction that was never
/// committed discards everything it staged.
#[async_trait]
pub trait UserTransaction: Send {
    async fn exists_by_email(&mut self, email: &str) -> Result<bool>;
    async fn save(&mut self, user: User) -> Result<User>;
    async fn commit(&mut self) -> Result<()>;
}

#[async_trait]
pub trait EntryRepository: Send + Sync {
    async fn save(&self, entry: Entry) -> Result<Entry>;
    async fn delete(&self, id: Uuid) -> Result<()>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Entry>>;
    async fn find(&self, filter: &EntryFilter) -> Result<Vec<Entry>>;
}
