use crate::model::Balance;
use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// How to pick among members tied for the most negative balance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreakPolicy {
    /// First tied member in member order.
    #[default]
    Stable,
    /// Uniformly random tied member.
    Random,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown tie-break policy: {0}")]
pub struct UnknownTieBreakPolicy(pub String);

impl FromStr for TieBreakPolicy {
    type Err = UnknownTieBreakPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stable" | "first" => Ok(TieBreakPolicy::Stable),
            "random" => Ok(TieBreakPolicy::Random),
            other => Err(UnknownTieBreakPolicy(other.to_owned())),
        }
    }
}

/// Picks the member who should pay next.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NextPayerSelector {
    policy: TieBreakPolicy,
}

impl NextPayerSelector {
    pub fn new(policy: TieBreakPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> TieBreakPolicy {
        self.policy
    }

    pub fn select<'b>(&self, balances: &'b [Balance]) -> Option<&'b Balance> {
        self.select_with_rng(balances, &mut rand::thread_rng())
    }

    /// Select the next payer, drawing from `rng` when the policy is random.
    ///
    /// Returns `None` when nobody has a negative balance.
    pub fn select_with_rng<'b, R>(&self, balances: &'b [Balance], rng: &mut R) -> Option<&'b Balance>
    where
        R: Rng + ?Sized,
    {
        let candidates = most_indebted(balances);
        let selected = match self.policy {
            TieBreakPolicy::Stable => candidates.first().copied(),
            TieBreakPolicy::Random => candidates.choose(rng).copied(),
        }?;

        if candidates.len() > 1 {
            tracing::debug!(
                tied = candidates.len(),
                policy = ?self.policy,
                selected = %selected.member,
                "Resolved tie for next payer"
            );
        }

        Some(selected)
    }
}

/// Members sharing the minimum balance, in member order. Empty if that minimum is not negative.
pub fn most_indebted(balances: &[Balance]) -> Vec<&Balance> {
    let Some(minimum) = balances.iter().map(|b| b.balance).min() else {
        return Vec::new();
    };
    if !minimum.is_negative() {
        return Vec::new();
    }

    balances.iter().filter(|b| b.balance == minimum).collect()
}

/// Next payer with the stable tie-break.
pub fn who_pays(balances: &[Balance]) -> Option<&Balance> {
    NextPayerSelector::default().select(balances)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Money;
    use rand::{SeedableRng, rngs::StdRng};
    use rstest::rstest;
    use std::collections::HashSet;

    fn balances(items: &[(&str, i64)]) -> Vec<Balance> {
        items
            .iter()
            .map(|&(member, amount)| Balance {
                member: member.to_owned(),
                balance: Money::from_i64(amount),
            })
            .collect()
    }

    #[rstest]
    #[case::empty(&[], None)]
    #[case::all_even(&[("a", 0), ("b", 0)], None)]
    #[case::single_debtor(&[("user2", 15), ("user4", -15)], Some("user4"))]
    #[case::most_negative_wins(
        &[("user2", 50), ("user4", 0), ("user3", -20), ("user5", -30)],
        Some("user5")
    )]
    #[case::stable_tie_takes_first(&[("a", 20), ("b", -10), ("c", -10)], Some("b"))]
    fn stable_selection(#[case] input: &[(&str, i64)], #[case] expected: Option<&str>) {
        let balances = balances(input);
        assert_eq!(who_pays(&balances).map(|b| b.member.as_str()), expected);
    }

    #[test]
    fn random_tie_break_stays_within_tied_members() {
        let balances = balances(&[("a", -10), ("b", 20), ("c", -10)]);
        let selector = NextPayerSelector::new(TieBreakPolicy::Random);
        let mut rng = StdRng::seed_from_u64(7);

        let mut seen = HashSet::new();
        for _ in 0..200 {
            let payer = selector.select_with_rng(&balances, &mut rng).unwrap();
            seen.insert(payer.member.clone());
        }

        let expected: HashSet<String> = ["a", "c"].iter().map(|s| s.to_string()).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn seeded_random_selection_is_reproducible() {
        let balances = balances(&[("a", -5), ("b", -5), ("c", -5), ("d", 15)]);
        let selector = NextPayerSelector::new(TieBreakPolicy::Random);

        let draw = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..10)
                .map(|_| selector.select_with_rng(&balances, &mut rng).unwrap().member.clone())
                .collect::<Vec<_>>()
        };

        assert_eq!(draw(42), draw(42));
    }

    #[test]
    fn random_policy_returns_none_without_debtors() {
        let balances = balances(&[("a", 0), ("b", 0)]);
        let selector = NextPayerSelector::new(TieBreakPolicy::Random);
        assert!(selector.select(&balances).is_none());
    }

    #[rstest]
    #[case("stable", TieBreakPolicy::Stable)]
    #[case("RANDOM", TieBreakPolicy::Random)]
    fn parses_policy(#[case] input: &str, #[case] expected: TieBreakPolicy) {
        assert_eq!(input.parse::<TieBreakPolicy>(), Ok(expected));
    }

    #[test]
    fn rejects_unknown_policy() {
        assert_eq!(
            "sometimes".parse::<TieBreakPolicy>(),
            Err(UnknownTieBreakPolicy("sometimes".to_owned()))
        );
    }
}
