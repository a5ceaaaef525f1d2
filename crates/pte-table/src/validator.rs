use crate::error::ValidationError;
use crate::event::ActionKind;
use crate::ring;
use crate::table::{Street, Table};
use pte_core::{Chips, SeatIndex};

/// A validated, normalised action ready for the `Action` reducer:
/// the amount has already been clamped/derived from the raw request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalisedAction {
    pub kind: ActionKind,
    pub amount: Chips,
}

/// How much more `seat` owes to match the current bet.
pub fn to_call(table: &Table, seat: SeatIndex) -> Chips {
    let committed = table.seat(seat).map(|s| s.street_committed()).unwrap_or(0);
    (table.current_bet() - committed).max(0)
}

fn precondition(table: &Table, seat: SeatIndex) -> Result<(), ValidationError> {
    let s = table
        .seat(seat)
        .ok_or(ValidationError::SeatOutOfRange(seat))?;
    if !matches!(s.status(), crate::seat::SeatStatus::Active) {
        return Err(ValidationError::SeatNotActor(seat));
    }
    if table.actor() != Some(seat) {
        return Err(ValidationError::SeatNotActor(seat));
    }
    match table.street() {
        Some(Street::Preflop | Street::Flop | Street::Turn | Street::River) => Ok(()),
        None => Err(ValidationError::WrongPhase),
    }
}

/// Validates and normalises a raw client action against the legality table
/// below.
/// Amounts must be non-negative finite integers; `Chips` being an integer
/// type already rules out NaN/infinity, so only sign and bound checks
/// remain.
pub fn validate(
    table: &Table,
    seat: SeatIndex,
    kind: ActionKind,
    amount: Option<Chips>,
) -> Result<NormalisedAction, ValidationError> {
    precondition(table, seat)?;
    let s = table.seat(seat).expect("checked by precondition");
    let chips = s.chips();
    let to_call = to_call(table, seat);
    let bb_option = ring::bb_option_holds(table, Some(seat));

    match kind {
        ActionKind::Fold => Ok(NormalisedAction {
            kind,
            amount: 0,
        }),
        ActionKind::Check => {
            if to_call == 0 || bb_option {
                Ok(NormalisedAction { kind, amount: 0 })
            } else {
                Err(ValidationError::IllegalAction {
                    reason: "cannot check facing a bet".into(),
                })
            }
        }
        ActionKind::Call => {
            if to_call <= 0 {
                return Err(ValidationError::IllegalAction {
                    reason: "nothing to call".into(),
                });
            }
            Ok(NormalisedAction {
                kind,
                amount: to_call.min(chips),
            })
        }
        ActionKind::Bet => {
            let amount = require_amount(amount)?;
            if table.current_bet() != 0 {
                return Err(ValidationError::IllegalAction {
                    reason: "cannot bet, a bet is already live".into(),
                });
            }
            if amount > chips {
                return Err(ValidationError::InvalidAmount);
            }
            if amount < table.stakes().big_blind && amount != chips {
                return Err(ValidationError::IllegalAction {
                    reason: "bet below the minimum".into(),
                });
            }
            Ok(NormalisedAction { kind, amount })
        }
        ActionKind::Raise => {
            let amount = require_amount(amount)?;
            if table.current_bet() == 0 {
                return Err(ValidationError::IllegalAction {
                    reason: "cannot raise, no bet is live".into(),
                });
            }
            let total_required = to_call + amount;
            if amount < table.last_raise_size() && total_required != chips {
                return Err(ValidationError::IllegalAction {
                    reason: "raise below the minimum".into(),
                });
            }
            if total_required > chips {
                return Err(ValidationError::InvalidAmount);
            }
            Ok(NormalisedAction {
                kind,
                amount: total_required,
            })
        }
        ActionKind::AllIn => {
            if chips <= 0 {
                return Err(ValidationError::IllegalAction {
                    reason: "no chips to push".into(),
                });
            }
            Ok(NormalisedAction { kind, amount: chips })
        }
    }
}

fn require_amount(amount: Option<Chips>) -> Result<Chips, ValidationError> {
    match amount {
        Some(a) if a >= 0 => Ok(a),
        _ => Err(ValidationError::InvalidAmount),
    }
}

/// The set of actions a client may offer as buttons, independent
/// of validating any one of them.
pub fn available_actions(table: &Table, seat: SeatIndex) -> Vec<ActionKind> {
    let Some(s) = table.seat(seat) else {
        return Vec::new();
    };
    let chips = s.chips();
    let to_call = to_call(table, seat);
    let bb_option = ring::bb_option_holds(table, Some(seat));
    let mut actions = vec![ActionKind::Fold];

    if to_call == 0 || bb_option {
        actions.push(ActionKind::Check);
    }
    if to_call > 0 && chips > 0 {
        actions.push(ActionKind::Call);
    }
    if table.current_bet() == 0 && chips >= table.stakes().big_blind {
        actions.push(ActionKind::Bet);
    }
    if table.current_bet() > 0 && chips > to_call + table.last_raise_size() {
        actions.push(ActionKind::Raise);
    }
    if chips > 0 {
        actions.push(ActionKind::AllIn);
    }
    actions
}

/// Whether an all-in's increment reopens betting: it reopens iff the
/// increment over the pre-action `currentBet` is at least the last
/// full raise size.
pub fn is_full_reopen(increment_over_current_bet: Chips, last_raise_size: Chips) -> bool {
    increment_over_current_bet >= last_raise_size
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seat::SeatStatus;
    use crate::table::Stakes;
    use pte_core::PlayerId;

    fn table_with_actor(chips: i64, current_bet: i64, street_committed: i64) -> Table {
        let mut table = Table::new(Stakes {
            small_blind: 5,
            big_blind: 10,
            ante: None,
        });
        table
            .seat_mut(0)
            .unwrap()
            .set_player(PlayerId::new("p0"), chips + street_committed, None);
        table.seat_mut(0).unwrap().set_status(SeatStatus::Active);
        table.seat_mut(0).unwrap().commit(street_committed);
        table.set_phase(crate::table::Phase::Preflop);
        table.set_current_bet(current_bet);
        table.set_actor(Some(0));
        table
    }

    #[test]
    fn check_illegal_when_facing_a_bet() {
        let table = table_with_actor(100, 10, 0);
        let err = validate(&table, 0, ActionKind::Check, None).unwrap_err();
        assert!(matches!(err, ValidationError::IllegalAction { .. }));
    }

    #[test]
    fn call_clamped_to_chips() {
        let table = table_with_actor(5, 10, 0);
        let normalised = validate(&table, 0, ActionKind::Call, None).unwrap();
        assert_eq!(normalised.amount, 5);
    }

    #[test]
    fn bet_below_minimum_rejected_unless_allin() {
        let table = table_with_actor(100, 0, 0);
        let err = validate(&table, 0, ActionKind::Bet, Some(3)).unwrap_err();
        assert!(matches!(err, ValidationError::IllegalAction { .. }));
    }

    #[test]
    fn available_actions_exclude_raise_when_short_stacked() {
        let table = table_with_actor(5, 10, 0);
        let actions = available_actions(&table, 0);
        assert!(!actions.contains(&ActionKind::Raise));
        assert!(actions.contains(&ActionKind::Call));
    }
}
