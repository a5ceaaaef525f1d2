//! The reducer set: one module per concern, all converging on
//! [`apply`] as the single entry point the event loop calls.

pub mod action;
pub mod dealing;
pub mod lifecycle;
pub mod membership;
pub mod pot;

use crate::error::ValidationError;
use crate::event::{Event, SideEffect};
use crate::sitout::SitOutController;
use crate::table::Table;
use pte_core::Config;

/// Everything a reducer needs besides the event itself and the table:
/// the runtime configuration (action timeout, delays) and the per-table
/// sit-out controller, which lives outside `Table` by design — sitting
/// out is a derived flag, never stored on the table itself.
pub struct ReducerContext<'a> {
    pub config: &'a Config,
    pub sitout: &'a mut SitOutController,
}

/// Applies one event to `table`, returning the side effects for the event
/// loop to execute. On `Err`, the table is left exactly as it
/// was — every reducer validates before it mutates.
pub fn apply(
    table: &mut Table,
    event: Event,
    ctx: &mut ReducerContext<'_>,
) -> Result<Vec<SideEffect>, ValidationError> {
    match event {
        Event::StartHand {
            timestamp,
            random_suffix,
        } => lifecycle::start_hand(table, timestamp, random_suffix, ctx.sitout),
        Event::PostBlinds => lifecycle::post_blinds(table),
        Event::DealHole => dealing::deal_hole(table),
        Event::EnterStreet {
            street,
            cards,
            is_auto_dealt,
        } => dealing::enter_street(table, street, cards, is_auto_dealt, ctx.config),
        Event::Action {
            seat,
            kind,
            amount,
        } => {
            let effects = action::action(table, seat, kind, amount, ctx.config)?;
            if let Some(player) = table.seat(seat).and_then(|s| s.player().cloned()) {
                ctx.sitout.record_voluntary_action(&player);
            }
            Ok(effects)
        }
        Event::TimeoutAutoFold { seat } => {
            let was_actor = table.actor() == Some(seat);
            let player = table.seat(seat).and_then(|s| s.player().cloned());
            let mut effects = action::timeout_auto_fold(table, seat, ctx.config)?;
            if was_actor {
                if let Some(player) = player {
                    if ctx.sitout.handle_timeout(&player) == crate::sitout::SitOutEffect::AutoSatOut
                    {
                        let now = table.hand_started_at().unwrap_or(0);
                        effects.extend(membership::player_sit_out(
                            player,
                            crate::event::SitOutReason::Timeout,
                            now,
                            ctx.sitout,
                        ));
                    }
                }
            }
            Ok(effects)
        }
        Event::CloseStreet => pot::close_street(table),
        Event::Showdown => pot::showdown(table),
        Event::Payout { distributions } => pot::payout(table, &distributions, ctx.config),
        Event::HandEnd => lifecycle::hand_end(table),
        Event::PlayerJoin {
            seat,
            player,
            chips,
            nickname,
        } => membership::player_join(table, seat, player, chips, nickname, ctx.sitout),
        Event::PlayerLeave { player } => membership::player_leave(table, &player, ctx.sitout),
        Event::PlayerSitOut {
            player,
            reason,
            timestamp,
        } => Ok(membership::player_sit_out(player, reason, timestamp, ctx.sitout)),
        Event::PlayerSitIn { player } => Ok(membership::player_sit_in(&player, ctx.sitout)),
    }
}
