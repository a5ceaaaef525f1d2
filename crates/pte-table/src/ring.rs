use crate::table::{Street, Table};
use pte_core::{SeatIndex, MAX_SEATS};

/// Why the current betting round is (or isn't) complete, surfaced
/// for audit logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundCompletion {
    Ongoing,
    FoldToOne,
    AllPlayersAllIn,
    ActionClosedOnAggressor,
    AllActedAndMatched,
}

impl RoundCompletion {
    pub fn is_complete(&self) -> bool {
        !matches!(self, RoundCompletion::Ongoing)
    }
}

/// Seat `i` has a connected player and can still act (glossary
/// "actionable").
pub fn is_actionable(table: &Table, i: SeatIndex) -> bool {
    table.seat(i).map(|s| s.actionable()).unwrap_or(false)
}

/// Walks 1..9 steps clockwise from `from`, returning the first actionable
/// seat, or `None` if none exists.
pub fn next_actionable_from(table: &Table, from: SeatIndex) -> Option<SeatIndex> {
    (1..=MAX_SEATS)
        .map(|step| (from + step) % MAX_SEATS)
        .find(|&i| is_actionable(table, i))
}

/// First seat in dealing order (one past the button, clockwise, in-hand
/// only) — used by `DealHole`, distinct from the *acting* order.
pub fn dealing_order(table: &Table) -> Vec<SeatIndex> {
    let Some(button) = table.button() else {
        return Vec::new();
    };
    (1..=MAX_SEATS)
        .map(|step| (button + step) % MAX_SEATS)
        .filter(|&i| table.seat(i).map(|s| s.in_hand()).unwrap_or(false))
        .collect()
}

/// First actor to act on the current street.
///
/// Heads-up and multi-way are handled as one rule, not a special case, so
/// that an SB who is all-in preflop falls out correctly: if the button
/// (SB in heads-up) isn't actionable, `next_actionable_from` walks
/// forward and lands on the only remaining actionable seat — the BB,
/// who becomes the sole actor.
pub fn first_actor(table: &Table, is_preflop: bool) -> Option<SeatIndex> {
    let in_hand = table.in_hand_seats();
    let button = table.button()?;
    let heads_up = in_hand.len() == 2;

    let candidate = if heads_up {
        if is_preflop {
            button
        } else {
            (button + 1) % MAX_SEATS
        }
    } else if is_preflop {
        // UTG: next actionable after the big blind.
        let bb = table.bb_seat().unwrap_or((button + 2) % MAX_SEATS);
        return next_actionable_from(table, bb);
    } else {
        (button + 1) % MAX_SEATS
    };

    if is_actionable(table, candidate) {
        Some(candidate)
    } else {
        next_actionable_from(table, candidate)
    }
}

/// Next actor after `current` — just the next actionable seat clockwise.
pub fn next_actor(table: &Table, current: SeatIndex) -> Option<SeatIndex> {
    next_actionable_from(table, current)
}

/// Whether the BB-option still holds: preflop, BB hasn't acted yet,
/// no one has raised over the big blind, and the proposed next actor is
/// the BB itself.
pub fn bb_option_holds(table: &Table, proposed_next: Option<SeatIndex>) -> bool {
    table.street() == Some(Street::Preflop)
        && !table.bb_has_acted()
        && table.current_bet() == table.stakes().big_blind
        && table.bb_seat().is_some()
        && proposed_next == table.bb_seat()
}

/// Pure predicate over the table determining whether the current betting
/// round is complete.
pub fn round_completion(table: &Table) -> RoundCompletion {
    let in_hand = table.in_hand_seats();
    if in_hand.len() <= 1 {
        return RoundCompletion::FoldToOne;
    }

    let actionable = table.actionable_seats();
    if actionable.is_empty() {
        return RoundCompletion::AllPlayersAllIn;
    }

    // BB option precludes completion even if everyone else has acted and
    // matched — the BB specifically has not been given their turn yet.
    if let Some(actor) = table.actor() {
        if let Some(next) = next_actor(table, actor) {
            if bb_option_holds(table, Some(next)) {
                return RoundCompletion::Ongoing;
            }
        }
    } else if bb_option_holds(table, table.bb_seat()) {
        return RoundCompletion::Ongoing;
    }

    let all_acted = actionable
        .iter()
        .all(|s| table.acted_this_round().contains(s));
    if !all_acted {
        return RoundCompletion::Ongoing;
    }

    if let Some(aggressor) = table.last_aggressor() {
        let matched = in_hand.iter().all(|&s| {
            s == aggressor
                || table.seat(s).map(|seat| {
                    seat.status() == crate::seat::SeatStatus::AllIn
                        || seat.street_committed() == table.current_bet()
                }).unwrap_or(true)
        });
        if matched {
            return RoundCompletion::ActionClosedOnAggressor;
        }
        return RoundCompletion::Ongoing;
    }

    let all_matched = in_hand.iter().all(|&s| {
        table.seat(s).map(|seat| {
            seat.status() == crate::seat::SeatStatus::AllIn
                || seat.street_committed() == table.current_bet()
        }).unwrap_or(true)
    });
    if all_matched {
        RoundCompletion::AllActedAndMatched
    } else {
        RoundCompletion::Ongoing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seat::SeatStatus;
    use crate::table::{Stakes, Table};
    use pte_core::PlayerId;

    fn stakes() -> Stakes {
        Stakes {
            small_blind: 5,
            big_blind: 10,
            ante: None,
        }
    }

    fn seat_player(table: &mut Table, i: usize, chips: i64) {
        table
            .seat_mut(i)
            .unwrap()
            .set_player(PlayerId::new(format!("p{i}")), chips, None);
        table.seat_mut(i).unwrap().set_status(SeatStatus::Active);
    }

    #[test]
    fn heads_up_preflop_first_actor_is_button() {
        let mut table = Table::new(stakes());
        seat_player(&mut table, 0, 1000);
        seat_player(&mut table, 1, 1000);
        table.set_button(0);
        assert_eq!(first_actor(&table, true), Some(0));
    }

    #[test]
    fn heads_up_postflop_first_actor_is_bb() {
        let mut table = Table::new(stakes());
        seat_player(&mut table, 0, 1000);
        seat_player(&mut table, 1, 1000);
        table.set_button(0);
        assert_eq!(first_actor(&table, false), Some(1));
    }

    #[test]
    fn multiway_preflop_first_actor_is_utg() {
        let mut table = Table::new(stakes());
        seat_player(&mut table, 0, 1000);
        seat_player(&mut table, 1, 1000);
        seat_player(&mut table, 2, 1000);
        table.set_button(0);
        table.set_bb_seat(Some(2));
        assert_eq!(first_actor(&table, true), Some(0));
    }

    #[test]
    fn bb_is_sole_actor_when_sb_allin_preflop_heads_up() {
        let mut table = Table::new(stakes());
        seat_player(&mut table, 0, 1000);
        seat_player(&mut table, 1, 1000);
        table.set_button(0);
        table.seat_mut(0).unwrap().set_status(SeatStatus::AllIn);
        assert_eq!(first_actor(&table, true), Some(1));
    }

    #[test]
    fn fold_to_one_completes_round() {
        let mut table = Table::new(stakes());
        seat_player(&mut table, 0, 1000);
        seat_player(&mut table, 1, 1000);
        table.seat_mut(1).unwrap().set_status(SeatStatus::Folded);
        assert_eq!(round_completion(&table), RoundCompletion::FoldToOne);
    }

    #[test]
    fn all_allin_completes_round() {
        let mut table = Table::new(stakes());
        seat_player(&mut table, 0, 1000);
        seat_player(&mut table, 1, 1000);
        table.seat_mut(0).unwrap().set_status(SeatStatus::AllIn);
        table.seat_mut(1).unwrap().set_status(SeatStatus::AllIn);
        assert_eq!(
            round_completion(&table),
            RoundCompletion::AllPlayersAllIn
        );
    }
}
