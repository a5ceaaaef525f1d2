use crate::error::ValidationError;
use crate::event::SideEffect;
use crate::ring;
use crate::seat::SeatStatus;
use crate::sitout::SitOutController;
use crate::table::{Phase, Table};
use pte_cards::Deck;
use pte_core::SeatIndex;

/// Seats eligible to be dealt into the next hand: occupied, funded, and not
/// currently sitting out.
fn eligible_seats(table: &Table, sitout: &SitOutController) -> Vec<SeatIndex> {
    table
        .seats()
        .iter()
        .enumerate()
        .filter(|(_, s)| {
            s.player()
                .map(|p| s.chips() > 0 && !sitout.is_sitting_out(p))
                .unwrap_or(false)
        })
        .map(|(i, _)| i)
        .collect()
}

/// `StartHand(n, t)`. On the very first hand the button is chosen
/// deterministically from `timestamp`; every later hand inherits the
/// button `HandEnd` already advanced.
pub fn start_hand(
    table: &mut Table,
    timestamp: u64,
    random_suffix: String,
    sitout: &SitOutController,
) -> Result<Vec<SideEffect>, ValidationError> {
    let eligible = eligible_seats(table, sitout);
    if eligible.len() < pte_core::MIN_SEATS_TO_DEAL {
        return Err(ValidationError::NotEnoughActiveSeats);
    }

    if table.hand_number() == 0 {
        let button = eligible[(timestamp as usize) % eligible.len()];
        table.set_button(button);
    }

    let hand_number = table.next_hand_number();
    table.reset_hand_scoped();
    table.set_hand_started_at(timestamp);

    for seat in table.seats_mut() {
        if seat.player().is_some() {
            seat.apply_pending_rebuy();
        }
    }
    for i in 0..pte_core::MAX_SEATS {
        let is_eligible = eligible.contains(&i);
        let seat = &mut table.seats_mut()[i];
        if is_eligible {
            seat.reset_hand_scoped();
            seat.set_status(SeatStatus::Active);
        } else if seat.player().is_some() {
            // Still seated (e.g. sitting out) but not dealt in: clear the
            // previous hand's cards/commitments too, or stale hole cards
            // collide with the freshly shuffled deck under the card-uniqueness
            // invariant.
            seat.reset_hand_scoped();
            seat.set_status(SeatStatus::Empty);
        }
    }

    let seed = format!("hand-{hand_number}-{timestamp}-{random_suffix}");
    table.set_deck(Deck::shuffle(seed));
    table.set_phase(Phase::Deal);

    Ok(vec![SideEffect::DispatchEvent {
        event: crate::event::Event::PostBlinds,
        delay: None,
    }])
}

/// `PostBlinds(sb, bb, ante?)`.
pub fn post_blinds(table: &mut Table) -> Result<Vec<SideEffect>, ValidationError> {
    let in_hand = table.in_hand_seats();
    if in_hand.len() < pte_core::MIN_SEATS_TO_DEAL {
        return Err(ValidationError::NotEnoughActiveSeats);
    }

    let button = match table.button() {
        Some(b) if table.seat(b).map(|s| s.in_hand()).unwrap_or(false) => b,
        _ => ring::next_actionable_from(table, table.button().unwrap_or(0))
            .ok_or(ValidationError::NotEnoughActiveSeats)?,
    };
    table.set_button(button);

    let (sb_seat, bb_seat) = if in_hand.len() == 2 {
        (button, ring::next_actionable_from(table, button).ok_or(ValidationError::NotEnoughActiveSeats)?)
    } else {
        let sb = ring::next_actionable_from(table, button).ok_or(ValidationError::NotEnoughActiveSeats)?;
        let bb = ring::next_actionable_from(table, sb).ok_or(ValidationError::NotEnoughActiveSeats)?;
        (sb, bb)
    };

    let stakes = table.stakes();
    table.seat_mut(sb_seat).unwrap().commit(stakes.small_blind);
    table.seat_mut(bb_seat).unwrap().commit(stakes.big_blind);
    if let Some(ante) = stakes.ante {
        for &seat in &in_hand {
            table.seat_mut(seat).unwrap().commit(ante);
        }
    }

    table.set_current_bet(stakes.big_blind);
    table.set_last_raise_size(stakes.big_blind);
    table.set_bb_seat(Some(bb_seat));
    table.set_bb_has_acted(false);

    Ok(vec![
        SideEffect::DispatchEvent {
            event: crate::event::Event::DealHole,
            delay: None,
        },
        SideEffect::DispatchEvent {
            event: crate::event::Event::EnterStreet {
                street: crate::table::Street::Preflop,
                cards: None,
                is_auto_dealt: true,
            },
            delay: None,
        },
    ])
}

/// `HandEnd`: sweeps broke players, advances the button, and asks
/// the loop to re-evaluate whether a fresh hand can start.
pub fn hand_end(table: &mut Table) -> Result<Vec<SideEffect>, ValidationError> {
    for seat in table.seats_mut() {
        if seat.player().is_some() && seat.chips() <= 0 && seat.rebuy_pending().is_none() {
            seat.clear();
        }
    }

    if let Some(button) = table.button() {
        let next = (1..=pte_core::MAX_SEATS)
            .map(|step| (button + step) % pte_core::MAX_SEATS)
            .find(|&i| table.seat(i).map(|s| s.chips() > 0).unwrap_or(false));
        if let Some(next) = next {
            table.set_button(next);
        }
    }

    table.reset_hand_scoped();

    Ok(vec![SideEffect::CheckGameStart { delay: None }])
}
