use crate::{
    model::{Balance, ExpenseEntry, Money},
    services::MoneyContext,
};
use fxhash::FxBuildHasher;
use indexmap::IndexMap;
use rust_decimal::Decimal;

/// Paid totals per member, in member order, plus their overall sum.
pub(crate) struct PaidTotals<'m> {
    pub(crate) by_member: IndexMap<&'m str, Money, FxBuildHasher>,
    pub(crate) total: Money,
}

impl PaidTotals<'_> {
    pub(crate) fn paid_by(&self, member: &str) -> Money {
        self.by_member.get(member).copied().unwrap_or(Money::ZERO)
    }
}

/// Computes each member's net position against an equal split of the group total.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BalanceCalculator {
    context: MoneyContext,
}

impl BalanceCalculator {
    pub fn new(context: MoneyContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> MoneyContext {
        self.context
    }

    /// Calculate balances for `members`
    ///
    /// Expenses whose sender is not in `members` are ignored: they count
    /// towards nobody's paid total and are left out of the average. So is an
    /// expense that would push the group total past the representable range.
    ///
    /// # Returns
    /// One balance per member, in the order of `members`, rounded with the
    /// calculator's money context.
    pub fn calculate<M, E>(&self, members: &[M], expenses: &[E]) -> Vec<Balance>
    where
        M: AsRef<str>,
        E: ExpenseEntry,
    {
        if members.is_empty() {
            return Vec::new();
        }

        let paid = paid_totals(members, expenses);
        let average = paid.total.as_decimal() / Decimal::from(members.len());

        members
            .iter()
            .map(|member| {
                let member = member.as_ref();
                Balance {
                    member: member.to_owned(),
                    balance: self
                        .context
                        .round(paid.paid_by(member) - Money::from_decimal(average)),
                }
            })
            .collect()
    }
}

pub(crate) fn paid_totals<'m, M, E>(members: &'m [M], expenses: &[E]) -> PaidTotals<'m>
where
    M: AsRef<str>,
    E: ExpenseEntry,
{
    let mut by_member =
        IndexMap::with_capacity_and_hasher(members.len(), FxBuildHasher::default());
    for member in members {
        by_member.entry(member.as_ref()).or_insert(Money::ZERO);
    }

    let mut total = Money::ZERO;
    let mut skipped = 0usize;
    for expense in expenses {
        let Some(paid) = by_member.get_mut(expense.sender()) else {
            skipped += 1;
            tracing::debug!(
                sender = expense.sender(),
                amount = %expense.amount(),
                "Expense sender is not a group member; excluded from settlement"
            );
            continue;
        };

        // Members' totals never exceed the group total, so checking it covers both.
        match total.checked_add(expense.amount()) {
            Some(next) => {
                total = next;
                *paid += expense.amount();
            }
            None => {
                skipped += 1;
                tracing::warn!(
                    sender = expense.sender(),
                    amount = %expense.amount(),
                    "Expense overflows the group total; excluded from settlement"
                );
            }
        }
    }

    if skipped > 0 {
        tracing::debug!(
            skipped,
            member_count = members.len(),
            expense_count = expenses.len(),
            "Unattributed expenses excluded from balances"
        );
    }

    PaidTotals { by_member, total }
}

/// Balances with the default context (cents, half away from zero).
pub fn calculate_balances<M, E>(members: &[M], expenses: &[E]) -> Vec<Balance>
where
    M: AsRef<str>,
    E: ExpenseEntry,
{
    BalanceCalculator::default().calculate(members, expenses)
}

/// Sum of every expense amount, including ones whose sender is not a member.
///
/// Saturates at the largest representable amount.
pub fn total_expenses<E: ExpenseEntry>(expenses: &[E]) -> Money {
    expenses
        .iter()
        .fold(Money::ZERO, |acc, expense| acc.saturating_add(expense.amount()))
}

/// Sum of the expenses attributable to a member; the group total used for the split.
pub fn attributable_total<M, E>(members: &[M], expenses: &[E]) -> Money
where
    M: AsRef<str>,
    E: ExpenseEntry,
{
    paid_totals(members, expenses).total
}

/// Balance of a single member, zero if the member is not listed.
pub fn member_balance(balances: &[Balance], member: &str) -> Money {
    balances
        .iter()
        .find(|balance| balance.member == member)
        .map(|balance| balance.balance)
        .unwrap_or(Money::ZERO)
}
