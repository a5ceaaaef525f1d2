use crate::error::ValidationError;
use crate::event::{SideEffect, SitOutReason};
use crate::sitout::SitOutController;
use crate::table::Table;
use pte_core::{Chips, PlayerId, SeatIndex, MAX_BUYIN_BB, MIN_BUYIN_BB};

/// `PlayerJoin`.
pub fn player_join(
    table: &mut Table,
    seat: SeatIndex,
    player: PlayerId,
    chips: Chips,
    nickname: Option<String>,
    sitout: &mut SitOutController,
) -> Result<Vec<SideEffect>, ValidationError> {
    if seat >= pte_core::MAX_SEATS {
        return Err(ValidationError::SeatOutOfRange(seat));
    }
    if table.seats().iter().any(|s| s.player() == Some(&player)) {
        return Err(ValidationError::PlayerAlreadySeated);
    }
    if !table.seat(seat).map(|s| s.is_empty()).unwrap_or(false) {
        return Err(ValidationError::SeatTaken(seat));
    }
    let bb = table.stakes().big_blind;
    if chips < MIN_BUYIN_BB * bb || chips > MAX_BUYIN_BB * bb {
        return Err(ValidationError::InvalidBuyIn);
    }

    table.seat_mut(seat).unwrap().set_player(player.clone(), chips, nickname);
    sitout.mark_sit_in(&player);

    Ok(vec![
        SideEffect::EmitStateChange {
            reason: "player joined".into(),
        },
        SideEffect::CheckGameStart { delay: None },
    ])
}

/// `PlayerLeave`.
pub fn player_leave(
    table: &mut Table,
    player: &PlayerId,
    sitout: &mut SitOutController,
) -> Result<Vec<SideEffect>, ValidationError> {
    let seat = table
        .seats()
        .iter()
        .position(|s| s.player() == Some(player))
        .ok_or(ValidationError::UnknownPlayer)?;
    table.seat_mut(seat).unwrap().clear();
    sitout.handle_player_leave(player);

    Ok(vec![SideEffect::EmitStateChange {
        reason: "player left".into(),
    }])
}

/// `PlayerSitOut(reason)`: updates only the external
/// controller — the seat's own status is untouched, since sitting-out is
/// a derived flag.
pub fn player_sit_out(
    player: PlayerId,
    reason: SitOutReason,
    now: u64,
    sitout: &mut SitOutController,
) -> Vec<SideEffect> {
    sitout.mark_sit_out(player, reason, now, pte_core::AUTO_LEAVE_TIMEOUT.as_secs());
    vec![SideEffect::EmitStateChange {
        reason: "player sat out".into(),
    }]
}

/// `PlayerSitIn`.
pub fn player_sit_in(player: &PlayerId, sitout: &mut SitOutController) -> Vec<SideEffect> {
    sitout.mark_sit_in(player);
    vec![
        SideEffect::EmitStateChange {
            reason: "player sat in".into(),
        },
        SideEffect::CheckGameStart { delay: None },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Stakes;

    fn table() -> Table {
        Table::new(Stakes {
            small_blind: 5,
            big_blind: 10,
            ante: None,
        })
    }

    #[test]
    fn join_rejects_buyin_out_of_bounds() {
        let mut table = table();
        let mut sitout = SitOutController::default();
        let err = player_join(&mut table, 0, PlayerId::new("p0"), 50, None, &mut sitout)
            .unwrap_err();
        assert_eq!(err, ValidationError::InvalidBuyIn);
    }

    #[test]
    fn join_rejects_double_seating() {
        let mut table = table();
        let mut sitout = SitOutController::default();
        player_join(&mut table, 0, PlayerId::new("p0"), 1000, None, &mut sitout).unwrap();
        let err = player_join(&mut table, 1, PlayerId::new("p0"), 1000, None, &mut sitout)
            .unwrap_err();
        assert_eq!(err, ValidationError::PlayerAlreadySeated);
    }

    #[test]
    fn leave_clears_the_seat() {
        let mut table = table();
        let mut sitout = SitOutController::default();
        let player = PlayerId::new("p0");
        player_join(&mut table, 0, player.clone(), 1000, None, &mut sitout).unwrap();
        player_leave(&mut table, &player, &mut sitout).unwrap();
        assert!(table.seat(0).unwrap().is_empty());
    }
}
