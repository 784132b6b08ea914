pub mod balance_calculator;
pub mod contribution;
pub mod money_context;
pub mod next_payer;
pub mod settlement_engine;

pub use balance_calculator::{
    BalanceCalculator, attributable_total, calculate_balances, member_balance, total_expenses,
};
pub use contribution::member_contributions;
pub use money_context::{MoneyContext, MoneyContextError, RoundingMode};
pub use next_payer::{
    NextPayerSelector, TieBreakPolicy, UnknownTieBreakPolicy, most_indebted, who_pays,
};
pub use settlement_engine::SettlementEngine;
