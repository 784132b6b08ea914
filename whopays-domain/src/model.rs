use chrono::{DateTime, Utc};
use fxhash::FxHashSet;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(pub u64);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monetary amount backed by a fixed-point decimal.
///
/// Serialized as a plain JSON number so the wire shape stays `{"balance": 15.0}`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Largest amount accepted for a single expense (10^18).
    pub const MAX_EXPENSE: Self = Self(Decimal::from_parts(0xA764_0000, 0x0DE0_B6B3, 0, false, 0));

    pub fn new(num: i64, scale: u32) -> Self {
        Self(Decimal::new(num, scale))
    }

    pub fn from_i64(value: i64) -> Self {
        Self(Decimal::from(value))
    }

    pub fn from_decimal(value: Decimal) -> Self {
        Self(value)
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn saturating_add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn is_positive(self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Self)
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Anything the settlement engine can read an amount and a payer from.
pub trait ExpenseEntry {
    fn amount(&self) -> Money;
    fn sender(&self) -> &str;
}

impl<S: AsRef<str>> ExpenseEntry for (S, Money) {
    fn amount(&self) -> Money {
        self.1
    }

    fn sender(&self) -> &str {
        self.0.as_ref()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub members: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Group {
    pub fn has_member(&self, name: &str) -> bool {
        self.members.iter().any(|member| member == name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub group_id: GroupId,
    pub amount: Money,
    pub description: String,
    pub sender: String,
    pub created_at: DateTime<Utc>,
}

impl ExpenseEntry for Expense {
    fn amount(&self) -> Money {
        self.amount
    }

    fn sender(&self) -> &str {
        &self.sender
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroupBuildError {
    #[error("group name must not be empty")]
    EmptyName,
    #[error("group must have at least one member")]
    MissingMembers,
    #[error("member names must not be blank")]
    BlankMember,
    #[error("member {name} appears more than once")]
    DuplicateMember { name: String },
}

/// Validated group draft, ready to be stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewGroup {
    name: String,
    members: Vec<String>,
}

impl NewGroup {
    pub fn try_new<I, S>(name: &str, members: I) -> Result<Self, GroupBuildError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.trim();
        if name.is_empty() {
            return Err(GroupBuildError::EmptyName);
        }

        let members: Vec<String> = members.into_iter().map(Into::into).collect();
        if members.is_empty() {
            return Err(GroupBuildError::MissingMembers);
        }

        let mut seen = FxHashSet::default();
        for member in &members {
            if member.trim().is_empty() {
                return Err(GroupBuildError::BlankMember);
            }
            if !seen.insert(member.as_str()) {
                return Err(GroupBuildError::DuplicateMember {
                    name: member.clone(),
                });
            }
        }

        Ok(Self {
            name: name.to_owned(),
            members,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub fn into_group(self, id: GroupId, created_at: DateTime<Utc>) -> Group {
        Group {
            id,
            name: self.name,
            members: self.members,
            created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpenseBuildError {
    #[error("expense amount must be greater than zero (got {0})")]
    NonPositiveAmount(Money),
    #[error("expense amount {amount} exceeds the maximum of {max}")]
    AmountTooLarge { amount: Money, max: Money },
    #[error("expense description must not be empty")]
    EmptyDescription,
    #[error("{sender} is not a member of this group")]
    UnknownSender { sender: String },
}

/// Validated expense draft for a specific group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewExpense {
    group_id: GroupId,
    amount: Money,
    description: String,
    sender: String,
}

impl NewExpense {
    pub fn try_new(
        group: &Group,
        amount: Money,
        description: &str,
        sender: &str,
    ) -> Result<Self, ExpenseBuildError> {
        if !amount.is_positive() {
            return Err(ExpenseBuildError::NonPositiveAmount(amount));
        }
        if amount > Money::MAX_EXPENSE {
            return Err(ExpenseBuildError::AmountTooLarge {
                amount,
                max: Money::MAX_EXPENSE,
            });
        }

        let description = description.trim();
        if description.is_empty() {
            return Err(ExpenseBuildError::EmptyDescription);
        }

        if !group.has_member(sender) {
            return Err(ExpenseBuildError::UnknownSender {
                sender: sender.to_owned(),
            });
        }

        Ok(Self {
            group_id: group.id,
            amount,
            description: description.to_owned(),
            sender: sender.to_owned(),
        })
    }

    pub fn group_id(&self) -> GroupId {
        self.group_id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn into_expense(self, id: ExpenseId, created_at: DateTime<Utc>) -> Expense {
        Expense {
            id,
            group_id: self.group_id,
            amount: self.amount,
            description: self.description,
            sender: self.sender,
            created_at,
        }
    }
}

impl ExpenseEntry for NewExpense {
    fn amount(&self) -> Money {
        self.amount
    }

    fn sender(&self) -> &str {
        &self.sender
    }
}

/// A member's net position: positive is owed by the group, negative owes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    #[serde(rename = "nombre")]
    pub member: String,
    pub balance: Money,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    pub member: String,
    pub paid: Money,
    #[serde(with = "rust_decimal::serde::float")]
    pub percentage: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub members: Vec<String>,
    pub expenses: Vec<Expense>,
    pub total: Money,
    pub balances: Vec<Balance>,
    pub next_payer: Option<String>,
}
