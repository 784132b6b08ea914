use crate::error::StoreError;
use whopays_domain::{Expense, Group, NewExpense, NewGroup, model::GroupId};

/// Persistence for groups and their expenses.
pub trait GroupStore: Send + Sync {
    fn group(&self, id: GroupId) -> Result<Option<Group>, StoreError>;

    /// Groups for `ids` that exist, in the order of `ids`.
    fn groups(&self, ids: &[GroupId]) -> Result<Vec<Group>, StoreError>;

    /// Expenses of a group in insertion order.
    fn expenses(&self, group_id: GroupId) -> Result<Vec<Expense>, StoreError>;

    fn insert_group(&self, group: NewGroup) -> Result<Group, StoreError>;

    fn insert_expense(&self, expense: NewExpense) -> Result<Expense, StoreError>;
}
