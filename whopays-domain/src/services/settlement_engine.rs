use crate::{
    model::{Expense, GroupSummary},
    services::{BalanceCalculator, MoneyContext, NextPayerSelector, TieBreakPolicy, attributable_total},
};
use rand::Rng;

/// Balance calculation plus next-payer selection for one group snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SettlementEngine {
    calculator: BalanceCalculator,
    selector: NextPayerSelector,
}

impl SettlementEngine {
    pub fn new(context: MoneyContext, tie_break: TieBreakPolicy) -> Self {
        Self {
            calculator: BalanceCalculator::new(context),
            selector: NextPayerSelector::new(tie_break),
        }
    }

    pub fn calculator(&self) -> &BalanceCalculator {
        &self.calculator
    }

    pub fn selector(&self) -> &NextPayerSelector {
        &self.selector
    }

    pub fn summarize(&self, members: Vec<String>, expenses: Vec<Expense>) -> GroupSummary {
        self.summarize_with_rng(members, expenses, &mut rand::thread_rng())
    }

    /// Builds the summary for a snapshot of `members` and `expenses`.
    ///
    /// `total` is the attributable total, the same amount the balances are split from.
    pub fn summarize_with_rng<R>(
        &self,
        members: Vec<String>,
        expenses: Vec<Expense>,
        rng: &mut R,
    ) -> GroupSummary
    where
        R: Rng + ?Sized,
    {
        let total = attributable_total(&members, &expenses);
        let balances = self.calculator.calculate(&members, &expenses);
        let next_payer = self
            .selector
            .select_with_rng(&balances, rng)
            .map(|balance| balance.member.clone());

        tracing::debug!(
            member_count = members.len(),
            expense_count = expenses.len(),
            total = %total,
            next_payer = next_payer.as_deref(),
            "Group settlement computed"
        );

        GroupSummary {
            members,
            expenses,
            total,
            balances,
            next_payer,
        }
    }
}
