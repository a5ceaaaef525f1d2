use crate::error::ValidationError;
use crate::event::{Event, SideEffect};
use crate::ring;
use crate::table::{Phase, Street, Table};
use pte_cards::Card;
use pte_core::Config;

/// `DealHole`: two rounds of one card per seat, round-robin,
/// starting one seat past the button.
pub fn deal_hole(table: &mut Table) -> Result<Vec<SideEffect>, ValidationError> {
    let order = ring::dealing_order(table);
    if order.len() < pte_core::MIN_SEATS_TO_DEAL {
        return Err(ValidationError::NotEnoughActiveSeats);
    }

    let drawn = {
        let deck = table.deck_mut().ok_or(ValidationError::WrongPhase)?;
        deck.deal_hole(order.len())
            .map_err(|_| ValidationError::IllegalAction {
                reason: "deck exhausted dealing hole cards".into(),
            })?
    };

    for (round, &seat) in order.iter().enumerate() {
        let first = drawn[round];
        let second = drawn[order.len() + round];
        table.seat_mut(seat).unwrap().set_hand(Some((first, second)));
    }

    table.set_phase(Phase::Preflop);
    Ok(Vec::new())
}

/// `EnterStreet(street, cards?, isAutoDealt?)`. `cards` lets
/// deterministic replay/tests pin the board instead of drawing from the
/// deck; `None` draws fresh.
pub fn enter_street(
    table: &mut Table,
    street: Street,
    cards: Option<Vec<Card>>,
    is_auto_dealt: bool,
    config: &Config,
) -> Result<Vec<SideEffect>, ValidationError> {
    let already_dealt = table.community().len() >= street.community_len();

    if street != Street::Preflop {
        if !already_dealt {
            match cards {
                Some(cards) => table.push_community(&cards),
                None => {
                    let deck = table.deck_mut().ok_or(ValidationError::WrongPhase)?;
                    match street {
                        Street::Flop => {
                            let (burn, flop) = deck
                                .deal_flop()
                                .map_err(|_| ValidationError::IllegalAction {
                                    reason: "deck exhausted dealing the flop".into(),
                                })?;
                            table.set_burn(street, burn);
                            table.push_community(&flop);
                        }
                        Street::Turn | Street::River => {
                            let (burn, card) =
                                deck.deal_turn_or_river().map_err(|_| {
                                    ValidationError::IllegalAction {
                                        reason: "deck exhausted dealing a street".into(),
                                    }
                                })?;
                            table.set_burn(street, burn);
                            table.push_community(&[card]);
                        }
                        Street::Preflop => unreachable!(),
                    }
                }
            }
        }

        for seat in table.seats_mut() {
            seat.reset_street_committed();
        }
        table.set_current_bet(0);
        table.set_last_raise_size(table.stakes().big_blind);
        table.set_last_aggressor(None);
    }

    log::debug!("entering {street:?} (auto_dealt={is_auto_dealt})");

    table.set_phase(match street {
        Street::Preflop => Phase::Preflop,
        Street::Flop => Phase::Flop,
        Street::Turn => Phase::Turn,
        Street::River => Phase::River,
    });

    let is_preflop = street == Street::Preflop;
    let actor = ring::first_actor(table, is_preflop);
    table.set_actor(actor);
    table.reset_acted();
    table.set_round_start_actor(actor);

    let completion = ring::round_completion(table);
    if completion.is_complete() {
        table.set_actor(None);
        return Ok(vec![
            SideEffect::ClearTimers,
            SideEffect::DispatchEvent {
                event: Event::CloseStreet,
                delay: None,
            },
        ]);
    }

    let Some(actor_seat) = actor else {
        return Err(ValidationError::NotEnoughActiveSeats);
    };
    let player = table
        .seat(actor_seat)
        .and_then(|s| s.player().cloned());
    Ok(vec![SideEffect::StartTimer {
        player,
        seat: actor_seat,
        duration: config.action_timeout,
    }])
}
