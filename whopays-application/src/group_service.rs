use crate::{error::GroupServiceError, model::SettlementOptions, ports::GroupStore};
use rand::Rng;
use whopays_domain::{
    Expense, Group, GroupSummary, Money, NewExpense, NewGroup, SettlementEngine, member_balance,
    model::GroupId, total_expenses,
};

/// Group and expense use cases on top of a [`GroupStore`].
#[derive(Clone, Copy)]
pub struct GroupService<'a> {
    store: &'a dyn GroupStore,
    engine: SettlementEngine,
}

impl<'a> GroupService<'a> {
    pub fn new(store: &'a dyn GroupStore, options: SettlementOptions) -> Self {
        Self {
            store,
            engine: options.engine(),
        }
    }

    pub fn engine(&self) -> &SettlementEngine {
        &self.engine
    }

    pub fn create_group<I, S>(&self, name: &str, members: I) -> Result<Group, GroupServiceError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let draft = NewGroup::try_new(name, members)?;
        let group = self.store.insert_group(draft)?;
        tracing::info!(
            group_id = %group.id,
            member_count = group.members.len(),
            "Group created"
        );
        Ok(group)
    }

    pub fn group(&self, group_id: GroupId) -> Result<Group, GroupServiceError> {
        self.store
            .group(group_id)?
            .ok_or(GroupServiceError::GroupNotFound(group_id))
    }

    pub fn groups_by_ids(&self, ids: &[GroupId]) -> Result<Vec<Group>, GroupServiceError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.store.groups(ids)?)
    }

    pub fn add_expense(
        &self,
        group_id: GroupId,
        amount: Money,
        description: &str,
        sender: &str,
    ) -> Result<Expense, GroupServiceError> {
        let group = self.group(group_id)?;
        let draft = NewExpense::try_new(&group, amount, description, sender).inspect_err(|err| {
            tracing::warn!(group_id = %group_id, sender, error = %err, "Rejected expense");
        })?;
        let expense = self.store.insert_expense(draft)?;
        tracing::info!(
            group_id = %group_id,
            expense_id = %expense.id,
            amount = %expense.amount,
            "Expense added"
        );
        Ok(expense)
    }

    pub fn group_summary(&self, group_id: GroupId) -> Result<GroupSummary, GroupServiceError> {
        self.group_summary_with_rng(group_id, &mut rand::thread_rng())
    }

    /// Loads the group and its expenses and settles them in one pass.
    pub fn group_summary_with_rng<R>(
        &self,
        group_id: GroupId,
        rng: &mut R,
    ) -> Result<GroupSummary, GroupServiceError>
    where
        R: Rng + ?Sized,
    {
        let group = self.group(group_id)?;
        let expenses = self.store.expenses(group_id)?;
        Ok(self.engine.summarize_with_rng(group.members, expenses, rng))
    }

    /// Sum of every stored expense of the group, attributable or not.
    pub fn total_expenses(&self, group_id: GroupId) -> Result<Money, GroupServiceError> {
        let _ = self.group(group_id)?;
        let expenses = self.store.expenses(group_id)?;
        Ok(total_expenses(&expenses))
    }

    pub fn member_balance(
        &self,
        group_id: GroupId,
        member: &str,
    ) -> Result<Money, GroupServiceError> {
        let group = self.group(group_id)?;
        let expenses = self.store.expenses(group_id)?;
        let balances = self.engine.calculator().calculate(&group.members, &expenses);
        Ok(member_balance(&balances, member))
    }
}
