use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Monetary value in minor units (cents).
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Amount(u64);

impl Amount {
    pub fn new(value: u64) -> Self {
        Amount(value)
    }

    pub fn inner(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryKind {
    Income,
    Expense,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryStatus {
    Pending,
    Cancelled,
    Settled,
}

/// A bookkeeping entry owned by a user.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct Entry {
    pub id: Option<Uuid>,
    pub description: String,
    pub month: u32,
    pub year: i32,
    pub user_id: Option<Uuid>,
    pub amount: Amount,
    pub kind: Option<EntryKind>,
    pub status: Option<EntryStatus>,
    pub registered_on: Option<NaiveDate>,
}

/// Search criteria. Unset fields match anything.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct EntryFilter {
    pub user_id: Option<Uuid>,
    pub description: Option<String>,
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub kind: Option<EntryKind>,
    pub status: Option<EntryStatus>,
}

impl EntryFilter {
    pub fn matches(&self, entry: &Entry) -> bool {
        if let Some(user_id) = self.user_id {
            if entry.user_id != Some(user_id) {
                return false;
            }
        }
        if let Some(description) = &self.description {
            let needle = description.to_lowercase();
            if !entry.description.to_lowercase().contains(&needle) {
                return false;
            }
        }
        self.month.is_none_or(|m| entry.month == m)
            && self.year.is_none_or(|y| entry.year == y)
            && self.kind.is_none_or(|k| entry.kind == Some(k))
            && self.status.is_none_or(|s| entry.status == Some(s))
    }
}

/// Request body for creating or updating an entry.
#[derive(Debug, Serialize, Deserialize)]
pub struct EntryRequest {
    pub description: String,
    pub month: u32,
    pub year: i32,
    pub user_id: Uuid,
    pub amount: Amount,
    pub kind: Option<EntryKind>,
    pub status: Option<EntryStatus>,
}

impl From<EntryRequest> for Entry {
    fn from(req: EntryRequest) -> Self {
        Entry {
            id: None,
            description: req.description,
            month: req.month,
            year: req.year,
            user_id: Some(req.user_id),
            amount: req.amount,
            kind: req.kind,
            status: req.status,
            registered_on: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: EntryStatus,
}
