use crate::error::ValidationError;
use crate::event::{Distribution, Event, SideEffect};
use crate::pot::Pot;
use crate::potmanager;
use crate::table::{Phase, Street, Table};
use pte_core::Config;

/// `CloseStreet`: settles uncalled bets, cuts pots by
/// commitment level, then routes to the next stage of the hand.
pub fn close_street(table: &mut Table) -> Result<Vec<SideEffect>, ValidationError> {
    if let Some((seat, refund)) = potmanager::uncalled_bet_refund(table) {
        table.seat_mut(seat).unwrap().refund(refund);
    }

    let fresh = potmanager::collect_pots(table);
    let mut pots: Vec<Pot> = table.pots().to_vec();
    potmanager::merge_pots(&mut pots, fresh);
    table.set_pots(pots);
    table.set_actor(None);

    let in_hand = table.in_hand_seats();
    let mut effects = vec![SideEffect::ClearTimers];

    if in_hand.len() <= 1 {
        let distributions: Vec<Distribution> = table
            .pots()
            .iter()
            .enumerate()
            .filter_map(|(pot_index, pot)| {
                let &seat = in_hand.first()?;
                let player = table.seat(seat)?.player()?;
                pot.is_eligible(player).then_some(Distribution {
                    seat,
                    amount: pot.amount(),
                    pot_index,
                })
            })
            .collect();
        effects.push(SideEffect::DispatchEvent {
            event: Event::Payout { distributions },
            delay: None,
        });
        return Ok(effects);
    }

    // When everyone remaining is all-in, the next `EnterStreet` call finds
    // its own round already complete and immediately re-dispatches
    // `CloseStreet` — the board still gets dealt out one street at
    // a time, it just never waits on a timer.
    let board_complete = table.street() == Some(Street::River);
    if board_complete {
        effects.push(SideEffect::DispatchEvent {
            event: Event::Showdown,
            delay: None,
        });
    } else {
        let next_street = table.street().and_then(|s| s.next()).unwrap_or(Street::Flop);
        effects.push(SideEffect::DispatchEvent {
            event: Event::EnterStreet {
                street: next_street,
                cards: None,
                is_auto_dealt: true,
            },
            delay: None,
        });
    }
    Ok(effects)
}

/// `Showdown`: the reducer itself does not evaluate hands —
/// it asks the loop to, via `EVALUATE_HANDS`, which folds the result into
/// a `Payout` event.
pub fn showdown(_table: &mut Table) -> Result<Vec<SideEffect>, ValidationError> {
    Ok(vec![SideEffect::EvaluateHands])
}

/// `Payout(distributions)`.
pub fn payout(
    table: &mut Table,
    distributions: &[Distribution],
    config: &Config,
) -> Result<Vec<SideEffect>, ValidationError> {
    for d in distributions {
        table
            .seat_mut(d.seat)
            .ok_or(ValidationError::SeatOutOfRange(d.seat))?
            .credit(d.amount);
    }
    table.clear_pots();
    table.set_phase(Phase::HandEnd);

    Ok(vec![SideEffect::DispatchEvent {
        event: Event::HandEnd,
        delay: Some(config.new_hand_delay),
    }])
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
    fn close_street_after_fold_to_one_pays_out_directly() {
        let mut table = Table::new(stakes());
        table
            .seat_mut(0)
            .unwrap()
            .set_player(PlayerId::new("p0"), 1000, None);
        table.seat_mut(0).unwrap().set_status(SeatStatus::Active);
        table.seat_mut(0).unwrap().commit(40);
        table
            .seat_mut(1)
            .unwrap()
            .set_player(PlayerId::new("p1"), 1000, None);
        table.seat_mut(1).unwrap().commit(10);
        table.seat_mut(1).unwrap().set_status(SeatStatus::Folded);

        let effects = close_street(&mut table).unwrap();
        assert_eq!(table.seat(0).unwrap().chips(), 1000 - 40 + 30);
        assert!(matches!(
            effects.last(),
            Some(SideEffect::DispatchEvent {
                event: Event::Payout { .. },
                ..
            })
        ));
    }

    #[test]
    fn payout_credits_seats_and_schedules_hand_end() {
        let mut table = Table::new(stakes());
        table
            .seat_mut(0)
            .unwrap()
            .set_player(PlayerId::new("p0"), 500, None);
        let config = Config::default();
        let distributions = vec![Distribution {
            seat: 0,
            amount: 100,
            pot_index: 0,
        }];
        let effects = payout(&mut table, &distributions, &config).unwrap();
        assert_eq!(table.seat(0).unwrap().chips(), 600);
        assert_eq!(table.phase(), Phase::HandEnd);
        assert_eq!(effects.len(), 1);
    }
}
