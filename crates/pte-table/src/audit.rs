use crate::table::Table;
use pte_core::Chips;
use std::collections::HashSet;

/// A structured record of an invariant check or a recovery taken in
/// response to one. Operator-visible, not part of the replayable event
/// log.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AuditRecord {
    InvariantViolated { description: String },
    HandForceEnded { reason: String },
}

impl std::fmt::Display for AuditRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            AuditRecord::InvariantViolated { description } => {
                write!(f, "invariant violated: {description}")
            }
            AuditRecord::HandForceEnded { reason } => write!(f, "hand force-ended: {reason}"),
        }
    }
}

/// Checks every post-reducer invariant the table must hold, returning
/// every violation found (empty means the table is consistent).
pub fn check_invariants(table: &Table) -> Vec<AuditRecord> {
    let mut violations = Vec::new();

    // 1. chips >= 0, committed >= street_committed >= 0.
    for seat in table.seats() {
        if seat.chips() < 0 || seat.committed() < 0 || seat.street_committed() < 0 {
            violations.push(AuditRecord::InvariantViolated {
                description: format!("seat {} has a negative chip field", seat.id()),
            });
        }
        if seat.committed() < seat.street_committed() {
            violations.push(AuditRecord::InvariantViolated {
                description: format!(
                    "seat {} committed ({}) < streetCommitted ({})",
                    seat.id(),
                    seat.committed(),
                    seat.street_committed()
                ),
            });
        }
    }

    // 2. currentBet == max street_committed among in-hand seats.
    let max_in_hand: Chips = table
        .seats()
        .iter()
        .filter(|s| s.in_hand())
        .map(|s| s.street_committed())
        .max()
        .unwrap_or(0);
    if table.current_bet() != max_in_hand && !table.in_hand_seats().is_empty() {
        violations.push(AuditRecord::InvariantViolated {
            description: format!(
                "currentBet ({}) != max in-hand streetCommitted ({})",
                table.current_bet(),
                max_in_hand
            ),
        });
    }

    // 3. card uniqueness and range across community, burns, hole cards.
    let mut seen = HashSet::new();
    let mut all_codes = Vec::new();
    all_codes.extend(table.community().iter().map(|c| c.code()));
    for street in [
        crate::table::Street::Flop,
        crate::table::Street::Turn,
        crate::table::Street::River,
    ] {
        if let Some(card) = table.burn(street) {
            all_codes.push(card.code());
        }
    }
    for seat in table.seats() {
        if let Some((a, b)) = seat.hand() {
            all_codes.push(a.code());
            all_codes.push(b.code());
        }
    }
    for code in all_codes {
        if code > 51 {
            violations.push(AuditRecord::InvariantViolated {
                description: format!("card code {code} out of range"),
            });
        }
        if !seen.insert(code) {
            violations.push(AuditRecord::InvariantViolated {
                description: format!("duplicate card code {code}"),
            });
        }
    }

    // 4. deckIndex in [0, 52].
    if let Some(deck) = table.deck() {
        if deck.index() > 52 {
            violations.push(AuditRecord::InvariantViolated {
                description: format!("deck index {} out of range", deck.index()),
            });
        }
    }

    // 5. community length in {0, 3, 4, 5}.
    if !matches!(table.community().len(), 0 | 3 | 4 | 5) {
        violations.push(AuditRecord::InvariantViolated {
            description: format!(
                "community card count {} not in {{0,3,4,5}}",
                table.community().len()
            ),
        });
    }

    // 6. pots have strictly ascending caps, positive amounts, non-empty eligibility.
    let mut prev_cap = None;
    for pot in table.pots() {
        if pot.amount() <= 0 {
            violations.push(AuditRecord::InvariantViolated {
                description: "pot has non-positive amount".into(),
            });
        }
        if pot.eligible().is_empty() {
            violations.push(AuditRecord::InvariantViolated {
                description: "pot has empty eligible set".into(),
            });
        }
        if let (Some(prev), Some(cap)) = (prev_cap, pot.cap()) {
            if cap <= prev {
                violations.push(AuditRecord::InvariantViolated {
                    description: "pot caps are not strictly ascending".into(),
                });
            }
        }
        prev_cap = pot.cap();
    }

    // 7. actor, if set, indexes an active seat.
    if let Some(actor) = table.actor() {
        if table
            .seat(actor)
            .map(|s| s.status() != crate::seat::SeatStatus::Active)
            .unwrap_or(true)
        {
            violations.push(AuditRecord::InvariantViolated {
                description: format!("actor seat {actor} is not active"),
            });
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seat::SeatStatus;
    use crate::table::Stakes;
    use pte_core::PlayerId;

    fn stakes() -> Stakes {
        Stakes {
            small_blind: 5,
            big_blind: 10,
            ante: None,
        }
    }

    #[test]
    fn fresh_table_has_no_violations() {
        let table = Table::new(stakes());
        assert!(check_invariants(&table).is_empty());
    }

    #[test]
    fn detects_current_bet_mismatch() {
        let mut table = Table::new(stakes());
        table
            .seat_mut(0)
            .unwrap()
            .set_player(PlayerId::new("p0"), 100, None);
        table.seat_mut(0).unwrap().set_status(SeatStatus::Active);
        table.seat_mut(0).unwrap().commit(10);
        table.set_current_bet(999);
        assert!(!check_invariants(&table).is_empty());
    }
}
