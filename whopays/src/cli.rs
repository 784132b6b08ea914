//! Command-line interface definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use whopays_domain::{Money, RoundingMode, TieBreakPolicy};

/// whopays - shared expenses and who should pay next.
#[derive(Parser, Debug)]
#[command(name = "whopays")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub overrides: ConfigOverrides,

    #[command(subcommand)]
    pub command: Command,
}

/// Flags that take precedence over the environment.
#[derive(Args, Debug, Default)]
pub struct ConfigOverrides {
    /// Path to the JSON data file
    #[arg(long, global = true)]
    pub data_file: Option<PathBuf>,

    /// Tie-break for the next payer (stable, random)
    #[arg(long, global = true)]
    pub tie_break: Option<TieBreakPolicy>,

    /// Rounding mode for balances (half-up, half-even)
    #[arg(long, global = true)]
    pub rounding: Option<RoundingMode>,

    /// Decimal places of the monetary unit
    #[arg(long, global = true)]
    pub scale: Option<u32>,

    /// Use JSON log format instead of pretty
    #[arg(long, global = true)]
    pub json_logs: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a group
    CreateGroup(CreateGroupArgs),
    /// Record an expense paid by a member
    AddExpense(AddExpenseArgs),
    /// Show balances and the next payer
    Summary(SummaryArgs),
    /// Show the amount spent in a group
    Total(GroupArg),
    /// Show one member's balance
    Balance(BalanceArgs),
}

#[derive(Args, Debug)]
pub struct GroupArg {
    /// Group id
    #[arg(short, long)]
    pub group: u64,
}

#[derive(Args, Debug)]
pub struct CreateGroupArgs {
    /// Group name
    #[arg(short, long)]
    pub name: String,

    /// Member name, repeat for each member
    #[arg(short, long = "member", required = true)]
    pub members: Vec<String>,
}

#[derive(Args, Debug)]
pub struct AddExpenseArgs {
    /// Group id
    #[arg(short, long)]
    pub group: u64,

    /// Amount paid
    #[arg(short, long)]
    pub amount: Money,

    /// What the expense was for
    #[arg(short, long)]
    pub description: String,

    /// Member who paid
    #[arg(short, long)]
    pub sender: String,
}

#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Group id
    #[arg(short, long)]
    pub group: u64,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct BalanceArgs {
    /// Group id
    #[arg(short, long)]
    pub group: u64,

    /// Member name
    #[arg(short, long)]
    pub member: String,
}
