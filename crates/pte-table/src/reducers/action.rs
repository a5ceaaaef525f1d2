use crate::error::ValidationError;
use crate::event::{ActionKind, Event, SideEffect};
use crate::ring;
use crate::seat::SeatStatus;
use crate::table::{Street, Table};
use crate::validator;
use pte_core::{Config, SeatIndex};

/// `Action(seat, type, amount?)`, gated by validator legality checks.
pub fn action(
    table: &mut Table,
    seat: SeatIndex,
    kind: ActionKind,
    amount: Option<i64>,
    config: &Config,
) -> Result<Vec<SideEffect>, ValidationError> {
    let normalised = validator::validate(table, seat, kind, amount)?;
    apply_mutation(table, seat, normalised.kind, normalised.amount);
    Ok(advance(table, seat, config))
}

/// `TimeoutAutoFold(seat)`: forced fold bypassing client
/// validation. A no-op (not an error) if `seat` is no longer the actor —
/// the timer that fired has already been superseded.
pub fn timeout_auto_fold(
    table: &mut Table,
    seat: SeatIndex,
    config: &Config,
) -> Result<Vec<SideEffect>, ValidationError> {
    if table.actor() != Some(seat) {
        return Ok(Vec::new());
    }
    apply_mutation(table, seat, ActionKind::Fold, 0);
    Ok(advance(table, seat, config))
}

fn apply_mutation(table: &mut Table, seat: SeatIndex, kind: ActionKind, amount: i64) {
    let current_bet_before = table.current_bet();
    let last_raise_size = table.last_raise_size();
    let to_call_before = validator::to_call(table, seat);

    match kind {
        ActionKind::Fold => {
            let s = table.seat_mut(seat).unwrap();
            s.set_status(SeatStatus::Folded);
            s.set_last_action("FOLD");
        }
        ActionKind::Check => {
            table.seat_mut(seat).unwrap().set_last_action("CHECK");
        }
        ActionKind::Call => {
            let s = table.seat_mut(seat).unwrap();
            let (delta, _) = s.commit(amount);
            s.set_last_action(format!("CALL {delta}"));
        }
        ActionKind::Bet => {
            let s = table.seat_mut(seat).unwrap();
            let (delta, _) = s.commit(amount);
            s.set_last_action(format!("BET {delta}"));
            table.set_current_bet(amount);
            table.set_last_raise_size(delta);
            table.set_last_aggressor(Some(seat));
        }
        ActionKind::Raise => {
            let s = table.seat_mut(seat).unwrap();
            let (delta, _) = s.commit(amount);
            s.set_last_action(format!("RAISE {delta}"));
            let raise_increment = amount - to_call_before;
            table.set_current_bet(current_bet_before + raise_increment);
            table.set_last_raise_size(raise_increment);
            table.set_last_aggressor(Some(seat));
        }
        ActionKind::AllIn => {
            let s = table.seat_mut(seat).unwrap();
            let (delta, _) = s.commit(amount);
            s.set_last_action(format!("ALLIN {delta}"));
            let new_street_committed = s.street_committed();
            if new_street_committed > current_bet_before {
                let increment = new_street_committed - current_bet_before;
                table.set_current_bet(new_street_committed);
                if current_bet_before == 0 || validator::is_full_reopen(increment, last_raise_size)
                {
                    table.set_last_raise_size(increment);
                    table.set_last_aggressor(Some(seat));
                }
                // else: short all-in. currentBet rises but lastAggressor /
                // lastRaiseSize are preserved — a short all-in.
            }
        }
    }
}

/// Shared tail for every action path: records the act, rolls
/// the BB-option flag, and either closes the street or hands off to the
/// next actor.
fn advance(table: &mut Table, seat: SeatIndex, config: &Config) -> Vec<SideEffect> {
    table.mark_acted(seat);
    if Some(seat) == table.bb_seat() && table.street() == Some(Street::Preflop) {
        table.set_bb_has_acted(true);
    }

    let completion = ring::round_completion(table);
    if completion.is_complete() {
        table.set_actor(None);
        return vec![
            SideEffect::ClearTimers,
            SideEffect::DispatchEvent {
                event: Event::CloseStreet,
                delay: None,
            },
        ];
    }

    let next = ring::next_actor(table, seat);
    table.set_actor(next);
    match next {
        Some(next_seat) => {
            let player = table.seat(next_seat).and_then(|s| s.player().cloned());
            vec![SideEffect::StartTimer {
                player,
                seat: next_seat,
                duration: config.action_timeout,
            }]
        }
        None => vec![SideEffect::ClearTimers],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Stakes;
    use pte_core::PlayerId;

    fn heads_up_preflop(bb_chips: i64) -> Table {
        let mut table = Table::new(Stakes {
            small_blind: 5,
            big_blind: 10,
            ante: None,
        });
        table
            .seat_mut(0)
            .unwrap()
            .set_player(PlayerId::new("p0"), 1000, None);
        table.seat_mut(0).unwrap().set_status(SeatStatus::Active);
        table.seat_mut(0).unwrap().commit(5);
        table
            .seat_mut(1)
            .unwrap()
            .set_player(PlayerId::new("p1"), bb_chips, None);
        table.seat_mut(1).unwrap().set_status(SeatStatus::Active);
        table.seat_mut(1).unwrap().commit(10);
        table.set_button(0);
        table.set_current_bet(10);
        table.set_last_raise_size(10);
        table.set_bb_seat(Some(1));
        table.set_bb_has_acted(false);
        table.set_phase(crate::table::Phase::Preflop);
        table.set_actor(Some(0));
        table
    }

    #[test]
    fn short_all_in_does_not_reopen_betting() {
        // BB has only 15 chips total (10 already posted, 5 behind) — an
        // all-in over the SB's call raises currentBet by just 5, short of
        // the 10-chip lastRaiseSize, so it must not reopen the action.
        let mut table = heads_up_preflop(15);
        let config = Config::default();
        action(&mut table, 0, ActionKind::Call, None, &config).unwrap();
        action(&mut table, 1, ActionKind::AllIn, None, &config).unwrap();
        assert_eq!(table.current_bet(), 15);
        assert_eq!(table.last_raise_size(), 10);
        assert_eq!(table.last_aggressor(), None);
    }

    #[test]
    fn bet_sets_aggressor_and_raise_size() {
        let mut table = Table::new(Stakes {
            small_blind: 5,
            big_blind: 10,
            ante: None,
        });
        table
            .seat_mut(0)
            .unwrap()
            .set_player(PlayerId::new("p0"), 1000, None);
        table.seat_mut(0).unwrap().set_status(SeatStatus::Active);
        table
            .seat_mut(1)
            .unwrap()
            .set_player(PlayerId::new("p1"), 1000, None);
        table.seat_mut(1).unwrap().set_status(SeatStatus::Active);
        table.set_phase(crate::table::Phase::Flop);
        table.set_actor(Some(0));
        table.set_last_raise_size(10);
        let config = Config::default();
        action(&mut table, 0, ActionKind::Bet, Some(50), &config).unwrap();
        assert_eq!(table.current_bet(), 50);
        assert_eq!(table.last_aggressor(), Some(0));
        assert_eq!(table.last_raise_size(), 50);
    }
}
