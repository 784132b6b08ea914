use serde::{Deserialize, Serialize};
use whopays_domain::{MoneyContext, SettlementEngine, TieBreakPolicy};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementOptions {
    pub money: MoneyContext,
    pub tie_break: TieBreakPolicy,
}

impl SettlementOptions {
    pub fn engine(self) -> SettlementEngine {
        SettlementEngine::new(self.money, self.tie_break)
    }
}
