use chrono::Utc;
use dashmap::DashMap;
use indexmap::IndexMap;
use std::sync::atomic::{AtomicU64, Ordering};
use whopays_application::{GroupStore, StoreError};
use whopays_domain::{
    Expense, Group, NewExpense, NewGroup,
    model::{ExpenseId, GroupId},
};

/// Serializable copy of a store's full state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoreSnapshot {
    pub groups: Vec<Group>,
    pub expenses: Vec<Expense>,
}

pub struct InMemoryGroupStore {
    groups: DashMap<GroupId, Group>,
    expenses: DashMap<GroupId, IndexMap<ExpenseId, Expense>>,
    next_group_id: AtomicU64,
    next_expense_id: AtomicU64,
}

impl InMemoryGroupStore {
    pub fn new() -> Self {
        Self {
            groups: DashMap::new(),
            expenses: DashMap::new(),
            next_group_id: AtomicU64::new(1),
            next_expense_id: AtomicU64::new(1),
        }
    }

    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let store = Self::new();
        let mut max_group = 0;
        let mut max_expense = 0;

        for group in snapshot.groups {
            max_group = max_group.max(group.id.0);
            store.groups.insert(group.id, group);
        }
        for expense in snapshot.expenses {
            max_expense = max_expense.max(expense.id.0);
            store
                .expenses
                .entry(expense.group_id)
                .or_default()
                .insert(expense.id, expense);
        }

        store.next_group_id.store(max_group + 1, Ordering::Relaxed);
        store
            .next_expense_id
            .store(max_expense + 1, Ordering::Relaxed);
        store
    }

    /// State ordered by id, expenses grouped by group in insertion order.
    pub fn snapshot(&self) -> StoreSnapshot {
        let mut groups: Vec<Group> = self.groups.iter().map(|g| g.value().clone()).collect();
        groups.sort_by_key(|g| g.id);

        let mut expenses = Vec::new();
        for group in &groups {
            if let Some(entries) = self.expenses.get(&group.id) {
                expenses.extend(entries.values().cloned());
            }
        }

        StoreSnapshot { groups, expenses }
    }

    /// Drops a group and its expenses; used to undo an insert that could not be persisted.
    pub(crate) fn remove_group(&self, id: GroupId) {
        self.groups.remove(&id);
        self.expenses.remove(&id);
    }

    pub(crate) fn remove_expense(&self, group_id: GroupId, id: ExpenseId) {
        if let Some(mut entries) = self.expenses.get_mut(&group_id) {
            entries.shift_remove(&id);
        }
    }
}

impl Default for InMemoryGroupStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupStore for InMemoryGroupStore {
    fn group(&self, id: GroupId) -> Result<Option<Group>, StoreError> {
        Ok(self.groups.get(&id).map(|g| g.value().clone()))
    }

    fn groups(&self, ids: &[GroupId]) -> Result<Vec<Group>, StoreError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.groups.get(id).map(|g| g.value().clone()))
            .collect())
    }

    fn expenses(&self, group_id: GroupId) -> Result<Vec<Expense>, StoreError> {
        Ok(self
            .expenses
            .get(&group_id)
            .map(|entries| entries.values().cloned().collect())
            .unwrap_or_default())
    }

    fn insert_group(&self, group: NewGroup) -> Result<Group, StoreError> {
        let id = GroupId(self.next_group_id.fetch_add(1, Ordering::Relaxed));
        let group = group.into_group(id, Utc::now());
        self.groups.insert(id, group.clone());
        Ok(group)
    }

    fn insert_expense(&self, expense: NewExpense) -> Result<Expense, StoreError> {
        let group_id = expense.group_id();
        if !self.groups.contains_key(&group_id) {
            return Err(StoreError::Backend(format!(
                "expense references missing group {group_id}"
            )));
        }

        let id = ExpenseId(self.next_expense_id.fetch_add(1, Ordering::Relaxed));
        let expense = expense.into_expense(id, Utc::now());
        self.expenses
            .entry(group_id)
            .or_default()
            .insert(id, expense.clone());
        Ok(expense)
    }
}
