use pte_core::{Chips, PlayerId};
use std::collections::BTreeSet;

/// A main or side pot, produced by the commitment-level algorithm.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pot {
    amount: Chips,
    eligible: BTreeSet<PlayerId>,
    /// Commitment level this pot was cut at; `None` for a table with only
    /// a single commitment level (the plain main pot).
    cap: Option<Chips>,
}

impl Pot {
    pub fn new(amount: Chips, eligible: BTreeSet<PlayerId>, cap: Option<Chips>) -> Self {
        Self {
            amount,
            eligible,
            cap,
        }
    }
    pub fn amount(&self) -> Chips {
        self.amount
    }
    pub fn eligible(&self) -> &BTreeSet<PlayerId> {
        &self.eligible
    }
    pub fn cap(&self) -> Option<Chips> {
        self.cap
    }
    pub fn is_eligible(&self, player: &PlayerId) -> bool {
        self.eligible.contains(player)
    }
    pub fn add(&mut self, amount: Chips) {
        self.amount += amount;
    }
}
