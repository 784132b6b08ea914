use crate::memory_store::{InMemoryGroupStore, StoreSnapshot};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use whopays_application::{GroupStore, StoreError};
use whopays_domain::{
    Expense, Group, Money, NewExpense, NewGroup,
    model::{ExpenseId, GroupId},
};

/// On-disk document. Amounts are kept as decimal strings so they reload exactly.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    groups: Vec<Group>,
    expenses: Vec<StoredExpense>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredExpense {
    id: ExpenseId,
    group_id: GroupId,
    #[serde(with = "rust_decimal::serde::str")]
    amount: Decimal,
    description: String,
    sender: String,
    created_at: DateTime<Utc>,
}

impl From<Expense> for StoredExpense {
    fn from(expense: Expense) -> Self {
        Self {
            id: expense.id,
            group_id: expense.group_id,
            amount: expense.amount.as_decimal(),
            description: expense.description,
            sender: expense.sender,
            created_at: expense.created_at,
        }
    }
}

impl From<StoredExpense> for Expense {
    fn from(stored: StoredExpense) -> Self {
        Self {
            id: stored.id,
            group_id: stored.group_id,
            amount: Money::from_decimal(stored.amount),
            description: stored.description,
            sender: stored.sender,
            created_at: stored.created_at,
        }
    }
}

impl From<StoreSnapshot> for StoreDocument {
    fn from(snapshot: StoreSnapshot) -> Self {
        Self {
            groups: snapshot.groups,
            expenses: snapshot.expenses.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<StoreDocument> for StoreSnapshot {
    fn from(document: StoreDocument) -> Self {
        Self {
            groups: document.groups,
            expenses: document.expenses.into_iter().map(Into::into).collect(),
        }
    }
}

/// Group store persisted as a single JSON document.
///
/// Reads are served from memory; every insert rewrites the document. An insert
/// whose write fails is rolled back before the error is returned.
pub struct JsonFileStore {
    path: PathBuf,
    inner: InMemoryGroupStore,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Opens the store at `path`; a missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let document = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice::<StoreDocument>(&bytes)
                .map_err(|e| StoreError::Serialization(e.to_string()))?,
            Err(err) if err.kind() == ErrorKind::NotFound => StoreDocument::default(),
            Err(err) => return Err(StoreError::Io(err)),
        };

        tracing::debug!(
            path = %path.display(),
            group_count = document.groups.len(),
            expense_count = document.expenses.len(),
            "Opened JSON group store"
        );

        Ok(Self {
            path,
            inner: InMemoryGroupStore::from_snapshot(document.into()),
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the current state. Callers hold `write_lock`.
    fn persist(&self) -> Result<(), StoreError> {
        let document = StoreDocument::from(self.inner.snapshot());
        let bytes = serde_json::to_vec_pretty(&document)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl GroupStore for JsonFileStore {
    fn group(&self, id: GroupId) -> Result<Option<Group>, StoreError> {
        self.inner.group(id)
    }

    fn groups(&self, ids: &[GroupId]) -> Result<Vec<Group>, StoreError> {
        self.inner.groups(ids)
    }

    fn expenses(&self, group_id: GroupId) -> Result<Vec<Expense>, StoreError> {
        self.inner.expenses(group_id)
    }

    fn insert_group(&self, group: NewGroup) -> Result<Group, StoreError> {
        let _guard = self.write_lock.lock();
        let group = self.inner.insert_group(group)?;
        if let Err(err) = self.persist() {
            self.inner.remove_group(group.id);
            tracing::warn!(
                path = %self.path.display(),
                group_id = %group.id,
                error = %err,
                "Rolled back group insert"
            );
            return Err(err);
        }
        Ok(group)
    }

    fn insert_expense(&self, expense: NewExpense) -> Result<Expense, StoreError> {
        let _guard = self.write_lock.lock();
        let expense = self.inner.insert_expense(expense)?;
        if let Err(err) = self.persist() {
            self.inner.remove_expense(expense.group_id, expense.id);
            tracing::warn!(
                path = %self.path.display(),
                expense_id = %expense.id,
                error = %err,
                "Rolled back expense insert"
            );
            return Err(err);
        }
        Ok(expense)
    }
}
