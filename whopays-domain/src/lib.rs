#![warn(clippy::uninlined_format_args)]

pub mod model;
pub mod services;

pub use model::{
    Balance, Contribution, Expense, ExpenseBuildError, ExpenseEntry, ExpenseId, Group,
    GroupBuildError, GroupId, GroupSummary, Money, NewExpense, NewGroup,
};
pub use services::{
    BalanceCalculator, MoneyContext, MoneyContextError, NextPayerSelector, RoundingMode,
    SettlementEngine, TieBreakPolicy, UnknownTieBreakPolicy, attributable_total,
    calculate_balances, member_balance, member_contributions, total_expenses, who_pays,
};
