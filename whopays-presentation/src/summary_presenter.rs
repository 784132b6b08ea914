use crate::text_table::{Alignment, TextTableBuilder};
use std::{borrow::Cow, fmt::Write as _};
use whopays_domain::{
    Balance, Contribution, Expense, GroupSummary, Money, MoneyContext, member_contributions,
};

const MEMBER: &str = "Member";
const BALANCE: &str = "Balance";
const PAID: &str = "Paid";
const SHARE: &str = "Share";
const DATE: &str = "Date";
const DESCRIPTION: &str = "Description";
const PAID_BY: &str = "Paid by";
const AMOUNT: &str = "Amount";

/// Renders group summaries as plain text, showing amounts at the settlement scale.
#[derive(Clone, Copy, Debug)]
pub struct SummaryPresenter {
    scale: u32,
}

impl Default for SummaryPresenter {
    fn default() -> Self {
        Self::new(MoneyContext::default())
    }
}

impl SummaryPresenter {
    pub fn new(context: MoneyContext) -> Self {
        Self {
            scale: context.scale,
        }
    }

    pub fn render(&self, summary: &GroupSummary) -> String {
        let mut reply = String::with_capacity(512);

        let _ = writeln!(&mut reply, "Total spent: {}", self.format_amount(summary.total));
        reply.push('\n');

        if summary.expenses.is_empty() {
            reply.push_str("No expenses yet\n");
        } else {
            reply.push_str(&self.build_expense_table(&summary.expenses));
        }
        reply.push('\n');

        reply.push_str(&self.build_balance_table(&summary.balances));
        reply.push('\n');

        let contributions = member_contributions(&summary.members, &summary.expenses);
        reply.push_str(&self.build_contribution_table(&contributions));
        reply.push('\n');

        match summary
            .next_payer
            .as_deref()
            .and_then(|name| summary.balances.iter().find(|b| b.member == name))
        {
            Some(payer) => {
                let _ = writeln!(
                    &mut reply,
                    "Next payer: {} (owes {})",
                    payer.member,
                    self.format_amount(payer.balance.abs())
                );
            }
            None => reply.push_str("Next payer: nobody owes anything\n"),
        }

        reply
    }

    /// Expense history in recorded order. Amounts keep any precision beyond the scale.
    pub fn build_expense_table(&self, expenses: &[Expense]) -> String {
        TextTableBuilder::new()
            .alignments(&[
                Alignment::Left,
                Alignment::Left,
                Alignment::Left,
                Alignment::Right,
            ])
            .headers(&[
                Cow::Borrowed(DATE),
                Cow::Borrowed(DESCRIPTION),
                Cow::Borrowed(PAID_BY),
                Cow::Borrowed(AMOUNT),
            ])
            .rows(expenses.iter().map(|expense| {
                let scale = self.scale.max(expense.amount.as_decimal().scale());
                [
                    Cow::Owned(expense.created_at.format("%Y-%m-%d").to_string()),
                    Cow::Borrowed(expense.description.as_str()),
                    Cow::Borrowed(expense.sender.as_str()),
                    Cow::Owned(format_with_scale(expense.amount, scale)),
                ]
            }))
            .build()
    }

    pub fn build_balance_table(&self, balances: &[Balance]) -> String {
        TextTableBuilder::new()
            .alignments(&[Alignment::Left, Alignment::Right])
            .headers(&[Cow::Borrowed(MEMBER), Cow::Borrowed(BALANCE)])
            .rows(balances.iter().map(|balance| {
                [
                    Cow::Borrowed(balance.member.as_str()),
                    Cow::Owned(self.format_signed(balance.balance)),
                ]
            }))
            .build()
    }

    pub fn build_contribution_table(&self, contributions: &[Contribution]) -> String {
        TextTableBuilder::new()
            .alignments(&[Alignment::Left, Alignment::Right, Alignment::Right])
            .headers(&[
                Cow::Borrowed(MEMBER),
                Cow::Borrowed(PAID),
                Cow::Borrowed(SHARE),
            ])
            .rows(contributions.iter().map(|contribution| {
                [
                    Cow::Borrowed(contribution.member.as_str()),
                    Cow::Owned(self.format_amount(contribution.paid)),
                    Cow::Owned(format!("{:.1}%", contribution.percentage)),
                ]
            }))
            .build()
    }

    pub fn format_amount(&self, amount: Money) -> String {
        format_with_scale(amount, self.scale)
    }

    fn format_signed(&self, amount: Money) -> String {
        let sign = if amount.is_negative() { "" } else { "+" };
        format!("{sign}{}", self.format_amount(amount))
    }
}

fn format_with_scale(amount: Money, scale: u32) -> String {
    format!("{:.*}", scale as usize, amount.as_decimal())
}
