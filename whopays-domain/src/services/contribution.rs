use crate::{
    model::{Contribution, ExpenseEntry},
    services::balance_calculator::paid_totals,
};
use rust_decimal::{Decimal, RoundingStrategy};

/// Share of the group total paid by each member, in member order.
///
/// Percentages are rounded to one decimal place and are zero when nothing
/// attributable has been spent yet.
pub fn member_contributions<M, E>(members: &[M], expenses: &[E]) -> Vec<Contribution>
where
    M: AsRef<str>,
    E: ExpenseEntry,
{
    let paid = paid_totals(members, expenses);
    let total = paid.total;

    members
        .iter()
        .map(|member| {
            let member = member.as_ref();
            let member_paid = paid.paid_by(member);
            let percentage = if total.is_zero() {
                Decimal::ZERO
            } else {
                (member_paid.as_decimal() / total.as_decimal() * Decimal::ONE_HUNDRED)
                    .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
            };
            Contribution {
                member: member.to_owned(),
                paid: member_paid,
                percentage,
            }
        })
        .collect()
}
